use crate::config::{Config, UnhandledNotification};
use crate::discovery::HandlerDiscovery;
use crate::error::Error;
use crate::{
    notification_fn, request_fn, HandlerResult, Mediator, Notification, NotificationDispatcher,
    NotificationHandler, Request, RequestHandler, RequestRouter,
};
use std::fmt;
use std::sync::Arc;

struct Inner {
    requests: RequestRouter,
    notifications: NotificationDispatcher,
}

/// A default implementation for the [Mediator] trait.
///
/// The routing tables are built once by [`MediatorBuilder`] and never change
/// afterwards. Cloning a `DefaultMediator` is cheap and every clone shares
/// the same tables, so one instance can be handed to every caller and used
/// from any thread.
///
/// # Examples
///
/// ## Request handler
/// ```
/// use std::sync::atomic::{AtomicU64, Ordering};
/// use typed_mediator::{DefaultMediator, HandlerResult, Mediator, Request, RequestHandler};
///
/// struct GetNextId;
/// impl Request for GetNextId {
///     type Response = u64;
/// }
///
/// #[derive(Default)]
/// struct GetNextIdHandler(AtomicU64);
/// impl RequestHandler for GetNextIdHandler {
///     type Request = GetNextId;
///
///     fn handle(&self, _: GetNextId) -> HandlerResult<u64> {
///         Ok(self.0.fetch_add(1, Ordering::SeqCst) + 1)
///     }
/// }
///
/// let mediator = DefaultMediator::builder()
///     .add_handler(GetNextIdHandler::default())
///     .build()
///     .unwrap();
///
/// assert_eq!(1, mediator.send(GetNextId).unwrap());
/// assert_eq!(2, mediator.send(GetNextId).unwrap());
/// assert_eq!(3, mediator.send(GetNextId).unwrap());
/// ```
///
/// ## Notification handler
/// ```
/// use typed_mediator::{DefaultMediator, Mediator, Notification};
///
/// struct ProductAdded(String);
/// impl Notification for ProductAdded {}
///
/// let mediator = DefaultMediator::builder()
///     .subscribe_fn(|event: &ProductAdded| {
///         println!("Product added: {}", event.0);
///         Ok(())
///     })
///     .build()
///     .unwrap();
///
/// mediator.publish(ProductAdded("Microwave".to_owned())).unwrap();
/// ```
#[derive(Clone)]
pub struct DefaultMediator {
    inner: Arc<Inner>,
}

impl DefaultMediator {
    /// Gets a [DefaultMediator] builder.
    pub fn builder() -> MediatorBuilder {
        MediatorBuilder::new()
    }
}

impl Mediator for DefaultMediator {
    fn send<Req>(&self, req: Req) -> crate::Result<Req::Response>
    where
        Req: Request,
    {
        self.inner.requests.send(req)
    }

    fn publish<N>(&self, notification: N) -> crate::Result<()>
    where
        N: Notification,
    {
        self.inner.notifications.publish(notification)
    }
}

impl fmt::Debug for DefaultMediator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultMediator")
            .field("requests", &self.inner.requests.len())
            .field("notifications", &self.inner.notifications.len())
            .finish()
    }
}

/// A builder for the [DefaultMediator].
///
/// Registration methods chain; the first registration error is kept and
/// returned from [`build`](MediatorBuilder::build).
pub struct MediatorBuilder {
    requests: RequestRouter,
    notifications: NotificationDispatcher,
    config: Config,
    error: Option<Error>,
}

impl MediatorBuilder {
    /// Constructs a new `MediatorBuilder`.
    pub fn new() -> Self {
        MediatorBuilder {
            requests: RequestRouter::new(),
            notifications: NotificationDispatcher::new(),
            config: Config::default(),
            error: None,
        }
    }

    /// Registers a request handler.
    pub fn add_handler<H>(mut self, handler: H) -> Self
    where
        H: RequestHandler,
    {
        if let Err(err) = self.requests.register(handler) {
            self.error.get_or_insert(err);
        }
        self
    }

    /// Registers a request handler from a function.
    pub fn add_handler_fn<Req, F>(self, handler: F) -> Self
    where
        Req: Request,
        F: Fn(Req) -> HandlerResult<Req::Response> + Send + Sync + 'static,
    {
        self.add_handler(request_fn(handler))
    }

    /// Registers a notification handler.
    pub fn subscribe<H>(mut self, handler: H) -> Self
    where
        H: NotificationHandler,
    {
        self.notifications.register(handler);
        self
    }

    /// Registers a notification handler from a function.
    pub fn subscribe_fn<N, F>(self, handler: F) -> Self
    where
        N: Notification,
        F: Fn(&N) -> HandlerResult<()> + Send + Sync + 'static,
    {
        self.subscribe(notification_fn(handler))
    }

    /// Registers every handler supplied by the discovery.
    pub fn discover<D>(self, discovery: D) -> Self
    where
        D: HandlerDiscovery<MediatorBuilder>,
    {
        let registrations = discovery.discover();
        log::debug!("discovered {} handler(s)", registrations.len());
        registrations
            .into_iter()
            .fold(self, |builder, registration| registration.apply(builder))
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sets what `publish` does for a notification without handlers.
    pub fn on_unhandled_notification(mut self, policy: UnhandledNotification) -> Self {
        self.config.unhandled_notification = policy;
        self
    }

    /// Builds the `DefaultMediator`.
    ///
    /// Fails with the first registration error, so an ambiguous routing
    /// table never serves a request.
    pub fn build(self) -> crate::Result<DefaultMediator> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let MediatorBuilder {
            requests,
            mut notifications,
            config,
            ..
        } = self;
        notifications.set_policy(config.unhandled_notification);

        log::debug!(
            "mediator built with {} request type(s) and {} notification type(s)",
            requests.len(),
            notifications.len()
        );

        Ok(DefaultMediator {
            inner: Arc::new(Inner {
                requests,
                notifications,
            }),
        })
    }
}

impl Default for MediatorBuilder {
    fn default() -> Self {
        MediatorBuilder::new()
    }
}
