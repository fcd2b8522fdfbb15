//! # typed-mediator
//! An in-process implementation of the Mediator pattern in Rust.
//!
//! Callers `send` a typed request and get back the response declared by that
//! request, without knowing which handler serves it. Callers `publish` a typed
//! notification and every handler subscribed to that notification type reacts
//! to it, one after another.
//!
//! * A request type is served by exactly one handler. Registering a second one
//!   is a startup error ([`Error::DuplicateHandler`]).
//! * A notification type may have any number of handlers, invoked in
//!   registration order. The first failing handler stops the publish.
//! * Routing errors and handler errors are returned to the caller as they
//!   are; nothing is retried or swallowed.
//!
//! ## Mediator Pattern
//! https://en.wikipedia.org/wiki/Mediator_pattern
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use typed_mediator::{
//!     DefaultMediator, ErrorKind, HandlerResult, Mediator, Notification, NotificationHandler,
//!     Request, RequestHandler,
//! };
//!
//! struct Ping;
//! impl Request for Ping {
//!     type Response = &'static str;
//! }
//!
//! struct PingHandler;
//! impl RequestHandler for PingHandler {
//!     type Request = Ping;
//!
//!     fn handle(&self, _: Ping) -> HandlerResult<&'static str> {
//!         Ok("pong")
//!     }
//! }
//!
//! struct Unknown;
//! impl Request for Unknown {
//!     type Response = ();
//! }
//!
//! struct UserCreated {
//!     id: u64,
//! }
//! impl Notification for UserCreated {}
//!
//! type Outbox = Arc<Mutex<Vec<String>>>;
//!
//! struct AuditHandler(Outbox);
//! impl NotificationHandler for AuditHandler {
//!     type Notification = UserCreated;
//!
//!     fn handle(&self, event: &UserCreated) -> HandlerResult<()> {
//!         self.0.lock().unwrap().push(format!("audit {}", event.id));
//!         Ok(())
//!     }
//! }
//!
//! struct EmailHandler(Outbox);
//! impl NotificationHandler for EmailHandler {
//!     type Notification = UserCreated;
//!
//!     fn handle(&self, event: &UserCreated) -> HandlerResult<()> {
//!         self.0.lock().unwrap().push(format!("email {}", event.id));
//!         Ok(())
//!     }
//! }
//!
//! let outbox = Outbox::default();
//! let mediator = DefaultMediator::builder()
//!     .add_handler(PingHandler)
//!     .subscribe(AuditHandler(outbox.clone()))
//!     .subscribe(EmailHandler(outbox.clone()))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!("pong", mediator.send(Ping).unwrap());
//! assert_eq!(ErrorKind::NotFound, mediator.send(Unknown).unwrap_err().kind());
//!
//! mediator.publish(UserCreated { id: 1 }).unwrap();
//! assert_eq!(vec!["audit 1", "email 1"], *outbox.lock().unwrap());
//! ```

/// A convenient result type.
pub type Result<T> = std::result::Result<T, error::Error>;

/// Module for the mediator requests and request handlers.
mod request;
pub use request::*;

/// Module for the mediator notifications and notification handlers.
mod notification;
pub use notification::*;

/// Module for the errors.
mod error;
pub use error::*;

/// Module for the mediator configuration.
mod config;
pub use config::*;

mod registry;

/// Module for the request router.
mod router;
pub use router::*;

/// Module for the notification dispatcher.
mod dispatcher;
pub use dispatcher::*;

/// Module for the handler discovery.
mod discovery;
pub use discovery::*;

/// Module for the mediator.
mod mediator;
pub use crate::mediator::*;

/// Provides default implementations.
mod impls;
pub use impls::*;

#[cfg(feature = "async")]
pub use async_trait::async_trait;

#[cfg(feature = "inventory")]
#[doc(hidden)]
pub use inventory;
