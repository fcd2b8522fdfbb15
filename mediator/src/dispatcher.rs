use crate::config::UnhandledNotification;
use crate::error::{Error, HandlerKind};
use crate::registry::{MultiRegistry, Slot};
use crate::{Notification, NotificationHandler};
use std::any::type_name;

#[cfg(feature = "async")]
use crate::AsyncNotificationHandler;

type BoxedNotificationHandler<N> = Box<dyn NotificationHandler<Notification = N>>;

#[cfg(feature = "async")]
type BoxedAsyncNotificationHandler<N> = Box<dyn AsyncNotificationHandler<Notification = N>>;

/// Fans a notification out to every handler registered for its type.
///
/// Handlers run one after another in registration order. Dispatch is
/// fail-fast: the first handler error is returned from
/// [`publish`](NotificationDispatcher::publish) and the handlers after it
/// are never invoked, so a failed publish may have been partially delivered.
#[derive(Default)]
pub struct NotificationDispatcher {
    handlers: MultiRegistry,
    unhandled: UnhandledNotification,
}

impl NotificationDispatcher {
    /// Constructs an empty dispatcher that ignores unhandled notifications.
    pub fn new() -> Self {
        NotificationDispatcher::default()
    }

    /// Constructs an empty dispatcher with the given policy for notifications
    /// that have no handler.
    pub fn with_policy(unhandled: UnhandledNotification) -> Self {
        NotificationDispatcher {
            handlers: MultiRegistry::default(),
            unhandled,
        }
    }

    pub(crate) fn set_policy(&mut self, unhandled: UnhandledNotification) {
        self.unhandled = unhandled;
    }

    /// Appends the handler to the list for the notification type it declares.
    pub fn register<H>(&mut self, handler: H)
    where
        H: NotificationHandler,
    {
        let handler: BoxedNotificationHandler<H::Notification> = Box::new(handler);
        register_slot::<H::Notification>(&mut self.handlers, Slot::new(handler, type_name::<H>()));
    }

    /// Returns the handlers registered for `N`, in registration order.
    pub fn resolve<N: Notification>(
        &self,
    ) -> crate::Result<Vec<&dyn NotificationHandler<Notification = N>>> {
        let slots = checked_slots::<N>(&self.handlers, self.unhandled)?;
        downcast_all::<N, dyn NotificationHandler<Notification = N>>(slots)
    }

    /// Publishes the notification to each of its handlers in order.
    pub fn publish<N: Notification>(&self, notification: N) -> crate::Result<()> {
        let slots = checked_slots::<N>(&self.handlers, self.unhandled)?;
        log::trace!("publishing `{}` to {} handler(s)", type_name::<N>(), slots.len());

        let handlers = downcast_all::<N, dyn NotificationHandler<Notification = N>>(slots)?;

        for (index, (slot, handler)) in slots.iter().zip(handlers).enumerate() {
            log::trace!("`{}` -> `{}`", type_name::<N>(), slot.handler_name());
            if let Err(err) = handler.handle(&notification) {
                log_abandoned::<N>(slot, slots.len() - index - 1);
                return Err(Error::Handler(err));
            }
        }

        Ok(())
    }

    /// Number of handlers registered for `N`.
    pub fn handler_count<N: Notification>(&self) -> usize {
        self.handlers.get::<N>().len()
    }

    /// Number of notification types with at least one handler.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn register_slot<N: Notification>(handlers: &mut MultiRegistry, slot: Slot) {
    log::debug!(
        "registered notification handler `{}` for `{}`",
        slot.handler_name(),
        type_name::<N>()
    );
    handlers.push::<N>(slot);
}

fn checked_slots<N: Notification>(
    handlers: &MultiRegistry,
    unhandled: UnhandledNotification,
) -> crate::Result<&[Slot]> {
    let slots = handlers.get::<N>();
    if slots.is_empty() && unhandled == UnhandledNotification::Reject {
        return Err(Error::not_found::<N>(HandlerKind::Notification));
    }
    Ok(slots)
}

// Every slot under `N` holds a `Box<H>`. A slot that does not is reported
// before any handler runs, so a publish is never silently short one handler.
fn downcast_all<N, H>(slots: &[Slot]) -> crate::Result<Vec<&H>>
where
    N: Notification,
    H: ?Sized + 'static,
{
    slots
        .iter()
        .map(|slot| {
            slot.downcast_ref::<Box<H>>()
                .map(|handler| &**handler)
                .ok_or_else(|| Error::not_found::<N>(HandlerKind::Notification))
        })
        .collect()
}

fn log_abandoned<N>(failed: &Slot, skipped: usize) {
    log::debug!(
        "publishing `{}` stopped: `{}` failed, {} handler(s) not invoked",
        type_name::<N>(),
        failed.handler_name(),
        skipped
    );
}

/// Fans a notification out to every async handler registered for its type.
///
/// Each handler is awaited before the next one starts; same ordering and
/// fail-fast rules as [`NotificationDispatcher`].
#[cfg(feature = "async")]
#[derive(Default)]
pub struct AsyncNotificationDispatcher {
    handlers: MultiRegistry,
    unhandled: UnhandledNotification,
}

#[cfg(feature = "async")]
impl AsyncNotificationDispatcher {
    /// Constructs an empty dispatcher that ignores unhandled notifications.
    pub fn new() -> Self {
        AsyncNotificationDispatcher::default()
    }

    /// Constructs an empty dispatcher with the given policy for notifications
    /// that have no handler.
    pub fn with_policy(unhandled: UnhandledNotification) -> Self {
        AsyncNotificationDispatcher {
            handlers: MultiRegistry::default(),
            unhandled,
        }
    }

    pub(crate) fn set_policy(&mut self, unhandled: UnhandledNotification) {
        self.unhandled = unhandled;
    }

    /// Appends the handler to the list for the notification type it declares.
    pub fn register<H>(&mut self, handler: H)
    where
        H: AsyncNotificationHandler,
    {
        let handler: BoxedAsyncNotificationHandler<H::Notification> = Box::new(handler);
        register_slot::<H::Notification>(&mut self.handlers, Slot::new(handler, type_name::<H>()));
    }

    /// Returns the handlers registered for `N`, in registration order.
    pub fn resolve<N: Notification>(
        &self,
    ) -> crate::Result<Vec<&dyn AsyncNotificationHandler<Notification = N>>> {
        let slots = checked_slots::<N>(&self.handlers, self.unhandled)?;
        downcast_all::<N, dyn AsyncNotificationHandler<Notification = N>>(slots)
    }

    /// Publishes the notification to each of its handlers in order.
    pub async fn publish<N: Notification>(&self, notification: N) -> crate::Result<()> {
        let slots = checked_slots::<N>(&self.handlers, self.unhandled)?;
        log::trace!("publishing `{}` to {} handler(s)", type_name::<N>(), slots.len());

        let handlers = downcast_all::<N, dyn AsyncNotificationHandler<Notification = N>>(slots)?;

        for (index, (slot, handler)) in slots.iter().zip(handlers).enumerate() {
            log::trace!("`{}` -> `{}`", type_name::<N>(), slot.handler_name());
            if let Err(err) = handler.handle(&notification).await {
                log_abandoned::<N>(slot, slots.len() - index - 1);
                return Err(Error::Handler(err));
            }
        }

        Ok(())
    }

    /// Number of handlers registered for `N`.
    pub fn handler_count<N: Notification>(&self) -> usize {
        self.handlers.get::<N>().len()
    }

    /// Number of notification types with at least one handler.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{notification_fn, ErrorKind, HandlerResult};
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    struct UserCreated {
        id: u32,
    }
    impl Notification for UserCreated {}

    struct UserDeleted;
    impl Notification for UserDeleted {}

    struct Recorder {
        name: &'static str,
        log: Log,
        fail: bool,
    }

    impl NotificationHandler for Recorder {
        type Notification = UserCreated;

        fn handle(&self, event: &UserCreated) -> HandlerResult<()> {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.name, event.id));

            if self.fail {
                return Err(format!("{} failed", self.name).into());
            }
            Ok(())
        }
    }

    fn recorder(name: &'static str, log: &Log, fail: bool) -> Recorder {
        Recorder {
            name,
            log: log.clone(),
            fail,
        }
    }

    #[test]
    fn publish_invokes_handlers_in_registration_order() {
        let log = Log::default();
        let mut dispatcher = NotificationDispatcher::new();
        dispatcher.register(recorder("h1", &log, false));
        dispatcher.register(recorder("h2", &log, false));
        dispatcher.register(recorder("h3", &log, false));

        dispatcher.publish(UserCreated { id: 1 }).unwrap();

        assert_eq!(vec!["h1:1", "h2:1", "h3:1"], *log.lock().unwrap());
        assert_eq!(3, dispatcher.handler_count::<UserCreated>());
    }

    #[test]
    fn publish_stops_at_first_failure() {
        let log = Log::default();
        let mut dispatcher = NotificationDispatcher::new();
        dispatcher.register(recorder("h1", &log, false));
        dispatcher.register(recorder("h2", &log, true));
        dispatcher.register(recorder("h3", &log, false));

        let err = dispatcher.publish(UserCreated { id: 7 }).unwrap_err();

        assert_eq!(ErrorKind::Handler, err.kind());
        assert_eq!("h2 failed", err.to_string());
        assert_eq!(vec!["h1:7", "h2:7"], *log.lock().unwrap());
    }

    #[test]
    fn publish_without_handlers_is_ignored_by_default() {
        let dispatcher = NotificationDispatcher::new();

        dispatcher.publish(UserDeleted).unwrap();
        assert!(dispatcher.resolve::<UserDeleted>().unwrap().is_empty());
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn publish_without_handlers_is_rejected_when_configured() {
        let mut dispatcher = NotificationDispatcher::with_policy(UnhandledNotification::Reject);
        dispatcher.register(notification_fn(|_: &UserCreated| Ok(())));

        let err = dispatcher.publish(UserDeleted).unwrap_err();
        assert!(matches!(
            err,
            Error::NotFound {
                kind: HandlerKind::Notification,
                ..
            }
        ));
        assert_eq!(
            ErrorKind::NotFound,
            dispatcher.resolve::<UserDeleted>().err().unwrap().kind()
        );
        dispatcher.publish(UserCreated { id: 1 }).unwrap();
    }

    #[test]
    fn mistyped_slot_fails_before_any_handler_runs() {
        let log = Log::default();
        let mut dispatcher = NotificationDispatcher::new();
        dispatcher.register(recorder("h1", &log, false));
        dispatcher.handlers.push::<UserCreated>(Slot::new(42_u32, "u32"));

        let err = dispatcher.publish(UserCreated { id: 1 }).unwrap_err();
        assert!(matches!(
            err,
            Error::NotFound {
                kind: HandlerKind::Notification,
                ..
            }
        ));
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(
            ErrorKind::NotFound,
            dispatcher.resolve::<UserCreated>().err().unwrap().kind()
        );
    }

    #[test]
    fn resolve_returns_handlers_in_order() {
        let log = Log::default();
        let mut dispatcher = NotificationDispatcher::new();
        dispatcher.register(recorder("first", &log, false));
        dispatcher.register(recorder("second", &log, false));

        for handler in dispatcher.resolve::<UserCreated>().unwrap() {
            handler.handle(&UserCreated { id: 3 }).unwrap();
        }

        assert_eq!(vec!["first:3", "second:3"], *log.lock().unwrap());
    }

    #[cfg(feature = "async")]
    mod async_tests {
        use super::*;
        use std::time::Duration;

        struct SlowRecorder {
            name: &'static str,
            delay: u64,
            log: Log,
            fail: bool,
        }

        #[async_trait::async_trait]
        impl AsyncNotificationHandler for SlowRecorder {
            type Notification = UserCreated;

            async fn handle(&self, event: &UserCreated) -> HandlerResult<()> {
                tokio::time::sleep(Duration::from_millis(self.delay)).await;
                self.log
                    .lock()
                    .unwrap()
                    .push(format!("{}:{}", self.name, event.id));

                if self.fail {
                    return Err(format!("{} failed", self.name).into());
                }
                Ok(())
            }
        }

        fn slow(name: &'static str, delay: u64, log: &Log, fail: bool) -> SlowRecorder {
            SlowRecorder {
                name,
                delay,
                log: log.clone(),
                fail,
            }
        }

        #[tokio::test]
        async fn async_publish_is_sequential() {
            let log = Log::default();
            let mut dispatcher = AsyncNotificationDispatcher::new();
            // A slower first handler must still finish before the second starts.
            dispatcher.register(slow("h1", 30, &log, false));
            dispatcher.register(slow("h2", 0, &log, false));

            dispatcher.publish(UserCreated { id: 2 }).await.unwrap();
            assert_eq!(vec!["h1:2", "h2:2"], *log.lock().unwrap());
        }

        #[tokio::test]
        async fn async_publish_stops_at_first_failure() {
            let log = Log::default();
            let mut dispatcher = AsyncNotificationDispatcher::with_policy(UnhandledNotification::Reject);
            dispatcher.register(slow("h1", 0, &log, true));
            dispatcher.register(slow("h2", 0, &log, false));

            let err = dispatcher.publish(UserCreated { id: 5 }).await.unwrap_err();
            assert_eq!("h1 failed", err.to_string());
            assert_eq!(vec!["h1:5"], *log.lock().unwrap());

            assert_eq!(
                ErrorKind::NotFound,
                dispatcher.publish(UserDeleted).await.unwrap_err().kind()
            );
        }
    }
}
