use std::fmt;
use thiserror::Error;

/// A boxed error produced by a handler.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The result type returned by handlers.
pub type HandlerResult<T> = std::result::Result<T, BoxError>;

/// The kind of handler a lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    /// A request handler.
    Request,
    /// A notification handler.
    Notification,
}

impl HandlerKind {
    /// Returns the description of the handler kind.
    pub fn as_str(&self) -> &'static str {
        match *self {
            HandlerKind::Request => "request",
            HandlerKind::Notification => "notification",
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Handler not found.
    NotFound,
    /// A second handler claimed an already served request type.
    DuplicateHandler,
    /// The handler itself failed.
    Handler,
}

impl ErrorKind {
    /// Returns the description of the error kind.
    pub fn as_str(&self) -> &'static str {
        match *self {
            ErrorKind::NotFound => "handler not found",
            ErrorKind::DuplicateHandler => "duplicate handler",
            ErrorKind::Handler => "handler error",
        }
    }
}

/// Error type for the mediator.
///
/// Routing errors (`NotFound`, `DuplicateHandler`) are configuration bugs.
/// `Handler` carries the handler's own error untouched: its `Display` and
/// `source` are forwarded, and the original value can be recovered with
/// [`Error::downcast_handler_error`].
#[derive(Debug, Error)]
pub enum Error {
    /// No handler is registered for the dispatched type.
    #[error("handler not found: no {kind} handler registered for `{type_name}`")]
    NotFound {
        kind: HandlerKind,
        type_name: &'static str,
    },

    /// A request type was claimed by more than one handler.
    #[error("duplicate handler: `{rejected}` cannot serve `{type_name}`, already served by `{existing}`")]
    DuplicateHandler {
        type_name: &'static str,
        existing: &'static str,
        rejected: &'static str,
    },

    /// The error returned by a handler.
    #[error(transparent)]
    Handler(BoxError),
}

impl Error {
    pub(crate) fn not_found<T: ?Sized>(kind: HandlerKind) -> Self {
        Error::NotFound {
            kind,
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::DuplicateHandler { .. } => ErrorKind::DuplicateHandler,
            Error::Handler(_) => ErrorKind::Handler,
        }
    }

    /// Returns the handler's error, if this error came from a handler.
    pub fn handler_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Error::Handler(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    /// Attempts to recover the concrete error a handler returned.
    ///
    /// Gives back `self` unchanged when this is not a handler error or the
    /// handler error is not an `E`.
    pub fn downcast_handler_error<E>(self) -> std::result::Result<E, Self>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Error::Handler(err) => err.downcast::<E>().map(|e| *e).map_err(Error::Handler),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error, PartialEq)]
    #[error("out of stock: {0}")]
    struct OutOfStock(u32);

    #[test]
    fn handler_error_is_forwarded_verbatim() {
        let err = Error::Handler(Box::new(OutOfStock(7)));

        assert_eq!(ErrorKind::Handler, err.kind());
        assert_eq!("out of stock: 7", err.to_string());
        assert!(err.handler_error().is_some());
        assert_eq!(Ok(OutOfStock(7)), err.downcast_handler_error::<OutOfStock>().map_err(|e| e.kind()));
    }

    #[test]
    fn downcast_to_wrong_type_returns_original() {
        let err = Error::Handler("plain message".into());
        let err = err.downcast_handler_error::<OutOfStock>().unwrap_err();
        assert_eq!("plain message", err.to_string());
    }

    #[test]
    fn routing_errors_display() {
        let err = Error::not_found::<u8>(HandlerKind::Request);
        assert_eq!(ErrorKind::NotFound, err.kind());
        assert_eq!(
            "handler not found: no request handler registered for `u8`",
            err.to_string()
        );
        assert!(err.handler_error().is_none());

        let err = Error::DuplicateHandler {
            type_name: "Ping",
            existing: "PingHandler",
            rejected: "OtherPingHandler",
        };
        assert_eq!(ErrorKind::DuplicateHandler, err.kind());
        assert_eq!(
            "duplicate handler: `OtherPingHandler` cannot serve `Ping`, already served by `PingHandler`",
            err.to_string()
        );
    }
}
