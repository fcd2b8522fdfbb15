use crate::error::{Error, HandlerKind};
use crate::registry::{Slot, UniqueRegistry};
use crate::{Request, RequestHandler};
use std::any::type_name;

#[cfg(feature = "async")]
use crate::AsyncRequestHandler;

type BoxedRequestHandler<R> = Box<dyn RequestHandler<Request = R>>;

#[cfg(feature = "async")]
type BoxedAsyncRequestHandler<R> = Box<dyn AsyncRequestHandler<Request = R>>;

/// Routes each request type to the one handler that serves it.
///
/// Registration happens once, before dispatch. A second handler for a request
/// type that is already served is rejected with
/// [`Error::DuplicateHandler`] and the first handler stays in place.
#[derive(Default)]
pub struct RequestRouter {
    handlers: UniqueRegistry,
}

impl RequestRouter {
    /// Constructs an empty router.
    pub fn new() -> Self {
        RequestRouter::default()
    }

    /// Registers the handler for the request type it declares.
    pub fn register<H>(&mut self, handler: H) -> crate::Result<()>
    where
        H: RequestHandler,
    {
        let handler: BoxedRequestHandler<H::Request> = Box::new(handler);
        register_slot::<H::Request>(&mut self.handlers, Slot::new(handler, type_name::<H>()))
    }

    /// Returns the handler registered for `R`.
    pub fn resolve<R: Request>(&self) -> crate::Result<&dyn RequestHandler<Request = R>> {
        self.handlers
            .get::<R>()
            .and_then(Slot::downcast_ref::<BoxedRequestHandler<R>>)
            .map(|handler| &**handler)
            .ok_or_else(|| Error::not_found::<R>(HandlerKind::Request))
    }

    /// Sends the request to its handler and returns the handler's response.
    ///
    /// A handler failure is returned as [`Error::Handler`] carrying the
    /// handler's own error.
    pub fn send<R: Request>(&self, req: R) -> crate::Result<R::Response> {
        let handler = self.resolve::<R>()?;
        log::trace!("sending `{}`", type_name::<R>());
        handler.handle(req).map_err(Error::Handler)
    }

    /// Returns `true` if a handler is registered for `R`.
    pub fn contains<R: Request>(&self) -> bool {
        self.handlers.contains::<R>()
    }

    /// Number of request types with a registered handler.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn register_slot<R: Request>(handlers: &mut UniqueRegistry, slot: Slot) -> crate::Result<()> {
    let handler_name = slot.handler_name();
    match handlers.insert::<R>(slot) {
        Ok(()) => {
            log::debug!(
                "registered request handler `{}` for `{}`",
                handler_name,
                type_name::<R>()
            );
            Ok(())
        }
        Err(err) => {
            log::error!("{}", err);
            Err(err)
        }
    }
}

/// Routes each request type to the one async handler that serves it.
///
/// Same registration rules as [`RequestRouter`].
#[cfg(feature = "async")]
#[derive(Default)]
pub struct AsyncRequestRouter {
    handlers: UniqueRegistry,
}

#[cfg(feature = "async")]
impl AsyncRequestRouter {
    /// Constructs an empty router.
    pub fn new() -> Self {
        AsyncRequestRouter::default()
    }

    /// Registers the handler for the request type it declares.
    pub fn register<H>(&mut self, handler: H) -> crate::Result<()>
    where
        H: AsyncRequestHandler,
    {
        let handler: BoxedAsyncRequestHandler<H::Request> = Box::new(handler);
        register_slot::<H::Request>(&mut self.handlers, Slot::new(handler, type_name::<H>()))
    }

    /// Returns the handler registered for `R`.
    pub fn resolve<R: Request>(&self) -> crate::Result<&dyn AsyncRequestHandler<Request = R>> {
        self.handlers
            .get::<R>()
            .and_then(Slot::downcast_ref::<BoxedAsyncRequestHandler<R>>)
            .map(|handler| &**handler)
            .ok_or_else(|| Error::not_found::<R>(HandlerKind::Request))
    }

    /// Sends the request to its handler and awaits the handler's response.
    pub async fn send<R: Request>(&self, req: R) -> crate::Result<R::Response> {
        let handler = self.resolve::<R>()?;
        log::trace!("sending `{}`", type_name::<R>());
        handler.handle(req).await.map_err(Error::Handler)
    }

    /// Returns `true` if a handler is registered for `R`.
    pub fn contains<R: Request>(&self) -> bool {
        self.handlers.contains::<R>()
    }

    /// Number of request types with a registered handler.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
