use crate::config::{Config, UnhandledNotification};
use crate::discovery::HandlerDiscovery;
use crate::error::Error;
use crate::{
    async_notification_fn, async_request_fn, AsyncMediator, AsyncNotificationDispatcher,
    AsyncNotificationHandler, AsyncRequestHandler, AsyncRequestRouter, HandlerResult,
    Notification, Request,
};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

struct Inner {
    requests: AsyncRequestRouter,
    notifications: AsyncNotificationDispatcher,
}

/// A default implementation for the [AsyncMediator] trait.
///
/// Same guarantees as [`DefaultMediator`](crate::DefaultMediator): the
/// routing tables are fixed at build time and shared by every clone.
/// `publish` awaits each handler before starting the next one.
///
/// # Examples
/// ```
/// use typed_mediator::{AsyncMediator, AsyncRequestHandler, DefaultAsyncMediator, HandlerResult, Request};
///
/// struct Greet(&'static str);
/// impl Request for Greet {
///     type Response = String;
/// }
///
/// struct GreetHandler;
///
/// #[typed_mediator::async_trait]
/// impl AsyncRequestHandler for GreetHandler {
///     type Request = Greet;
///
///     async fn handle(&self, req: Greet) -> HandlerResult<String> {
///         Ok(format!("Hello, {}!", req.0))
///     }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mediator = DefaultAsyncMediator::builder()
///     .add_handler(GreetHandler)
///     .build()
///     .unwrap();
///
/// assert_eq!("Hello, Rust!", mediator.send(Greet("Rust")).await.unwrap());
/// # }
/// ```
#[derive(Clone)]
pub struct DefaultAsyncMediator {
    inner: Arc<Inner>,
}

impl DefaultAsyncMediator {
    /// Gets a [DefaultAsyncMediator] builder.
    pub fn builder() -> AsyncMediatorBuilder {
        AsyncMediatorBuilder::new()
    }
}

#[async_trait::async_trait]
impl AsyncMediator for DefaultAsyncMediator {
    async fn send<Req>(&self, req: Req) -> crate::Result<Req::Response>
    where
        Req: Request,
    {
        self.inner.requests.send(req).await
    }

    async fn publish<N>(&self, notification: N) -> crate::Result<()>
    where
        N: Notification,
    {
        self.inner.notifications.publish(notification).await
    }
}

impl fmt::Debug for DefaultAsyncMediator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultAsyncMediator")
            .field("requests", &self.inner.requests.len())
            .field("notifications", &self.inner.notifications.len())
            .finish()
    }
}

/// A builder for the [DefaultAsyncMediator].
pub struct AsyncMediatorBuilder {
    requests: AsyncRequestRouter,
    notifications: AsyncNotificationDispatcher,
    config: Config,
    error: Option<Error>,
}

impl AsyncMediatorBuilder {
    /// Constructs a new `AsyncMediatorBuilder`.
    pub fn new() -> Self {
        AsyncMediatorBuilder {
            requests: AsyncRequestRouter::new(),
            notifications: AsyncNotificationDispatcher::new(),
            config: Config::default(),
            error: None,
        }
    }

    /// Registers a request handler.
    pub fn add_handler<H>(mut self, handler: H) -> Self
    where
        H: AsyncRequestHandler,
    {
        if let Err(err) = self.requests.register(handler) {
            self.error.get_or_insert(err);
        }
        self
    }

    /// Registers a request handler from a function returning a future.
    pub fn add_handler_fn<Req, F, Fut>(self, handler: F) -> Self
    where
        Req: Request,
        F: Fn(Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult<Req::Response>> + Send + 'static,
    {
        self.add_handler(async_request_fn(handler))
    }

    /// Registers a notification handler.
    pub fn subscribe<H>(mut self, handler: H) -> Self
    where
        H: AsyncNotificationHandler,
    {
        self.notifications.register(handler);
        self
    }

    /// Registers a notification handler from a function returning a future.
    ///
    /// The returned future cannot borrow the notification.
    pub fn subscribe_fn<N, F, Fut>(self, handler: F) -> Self
    where
        N: Notification,
        F: Fn(&N) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult<()>> + Send + 'static,
    {
        self.subscribe(async_notification_fn(handler))
    }

    /// Registers every handler supplied by the discovery.
    pub fn discover<D>(self, discovery: D) -> Self
    where
        D: HandlerDiscovery<AsyncMediatorBuilder>,
    {
        let registrations = discovery.discover();
        log::debug!("discovered {} async handler(s)", registrations.len());
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

    /// Builds the `DefaultAsyncMediator`, failing with the first registration
    /// error.
    pub fn build(self) -> crate::Result<DefaultAsyncMediator> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let AsyncMediatorBuilder {
            requests,
            mut notifications,
            config,
            ..
        } = self;
        notifications.set_policy(config.unhandled_notification);

        log::debug!(
            "async mediator built with {} request type(s) and {} notification type(s)",
            requests.len(),
            notifications.len()
        );

        Ok(DefaultAsyncMediator {
            inner: Arc::new(Inner {
                requests,
                notifications,
            }),
        })
    }
}

impl Default for AsyncMediatorBuilder {
    fn default() -> Self {
        AsyncMediatorBuilder::new()
    }
}

#[allow(dead_code)]
fn _assert_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DefaultAsyncMediator>();
    assert_send_sync::<crate::DefaultMediator>();
}

#[cfg(test)]
mod tests {
    use crate::{
        AsyncHandlerRegistration, AsyncMediator, AsyncNotificationHandler, AsyncRequestHandler,
        Config, DefaultAsyncMediator, ErrorKind, HandlerResult, Notification, Request,
        UnhandledNotification,
    };
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    struct WaitAndGet<T>(u64, T);
    impl<T: Send + 'static> Request for WaitAndGet<T> {
        type Response = T;
    }

    struct WaitAndGetHandler;

    #[async_trait::async_trait]
    impl AsyncRequestHandler for WaitAndGetHandler {
        type Request = WaitAndGet<&'static str>;

        async fn handle(&self, req: WaitAndGet<&'static str>) -> HandlerResult<&'static str> {
            tokio::time::sleep(Duration::from_millis(req.0)).await;
            Ok(req.1)
        }
    }

    struct Deposited(u32);
    impl Notification for Deposited {}

    struct Ledger(Arc<Mutex<Vec<String>>>, &'static str);

    #[async_trait::async_trait]
    impl AsyncNotificationHandler for Ledger {
        type Notification = Deposited;

        async fn handle(&self, event: &Deposited) -> HandlerResult<()> {
            tokio::task::yield_now().await;
            self.0.lock().unwrap().push(format!("{}:{}", self.1, event.0));
            Ok(())
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn send_test() {
        let mediator = DefaultAsyncMediator::builder()
            .add_handler(WaitAndGetHandler)
            .build()
            .unwrap();

        assert_eq!("done", mediator.send(WaitAndGet(10, "done")).await.unwrap());
        assert_eq!(
            ErrorKind::NotFound,
            mediator.send(WaitAndGet(0, 1_u8)).await.unwrap_err().kind()
        );
    }

    #[tokio::test]
    async fn publish_test() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mediator = DefaultAsyncMediator::builder()
            .discover(vec![
                AsyncHandlerRegistration::notification(Ledger(log.clone(), "first")),
                AsyncHandlerRegistration::notification(Ledger(log.clone(), "second")),
            ])
            .build()
            .unwrap();

        mediator.publish(Deposited(5)).await.unwrap();
        assert_eq!(vec!["first:5", "second:5"], *log.lock().unwrap());
    }

    #[tokio::test]
    async fn duplicate_and_policy_test() {
        let err = DefaultAsyncMediator::builder()
            .add_handler(WaitAndGetHandler)
            .add_handler(WaitAndGetHandler)
            .build()
            .unwrap_err();
        assert_eq!(ErrorKind::DuplicateHandler, err.kind());

        let mediator = DefaultAsyncMediator::builder()
            .with_config(Config::new().unhandled_notification(UnhandledNotification::Reject))
            .build()
            .unwrap();
        assert_eq!(
            ErrorKind::NotFound,
            mediator.publish(Deposited(1)).await.unwrap_err().kind()
        );
    }

    #[tokio::test]
    async fn fn_handlers_test() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let first = log.clone();
        let second = log.clone();

        let mediator = DefaultAsyncMediator::builder()
            .add_handler_fn(|req: WaitAndGet<u32>| async move {
                tokio::time::sleep(Duration::from_millis(req.0)).await;
                Ok(req.1 + 1)
            })
            .subscribe_fn(move |event: &Deposited| {
                let (log, amount) = (first.clone(), event.0);
                async move {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    log.lock().unwrap().push(format!("slow:{}", amount));
                    Ok(())
                }
            })
            .subscribe_fn(move |event: &Deposited| {
                let (log, amount) = (second.clone(), event.0);
                async move {
                    log.lock().unwrap().push(format!("fast:{}", amount));
                    Ok(())
                }
            })
            .build()
            .unwrap();

        assert_eq!(42, mediator.send(WaitAndGet(1, 41_u32)).await.unwrap());

        mediator.publish(Deposited(3)).await.unwrap();
        assert_eq!(vec!["slow:3", "fast:3"], *log.lock().unwrap());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn shared_across_tasks_test() {
        let mediator = DefaultAsyncMediator::builder()
            .add_handler(WaitAndGetHandler)
            .build()
            .unwrap();

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let mediator = mediator.clone();
                tokio::spawn(async move { mediator.send(WaitAndGet(5, "ok")).await })
            })
            .collect();

        for task in tasks {
            assert_eq!("ok", task.await.unwrap().unwrap());
        }
    }
}
