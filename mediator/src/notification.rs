use crate::HandlerResult;
use std::fmt;
use std::marker::PhantomData;

#[cfg(feature = "async")]
use std::future::Future;

/// Represents an application notification.
///
/// Notifications have no response and may be observed by any number of
/// handlers, including none.
pub trait Notification: Send + Sync + 'static {}

/// A handler for application notifications.
pub trait NotificationHandler: Send + Sync + 'static {
    /// Type of the notification handled by this handler.
    type Notification: Notification;

    /// Handles a notification.
    fn handle(&self, notification: &Self::Notification) -> HandlerResult<()>;
}

/// A [`NotificationHandler`] backed by a function.
///
/// Created with [`notification_fn`].
pub struct NotificationHandlerFn<N, F> {
    f: F,
    _marker: PhantomData<fn(&N)>,
}

/// Wraps a function into a [`NotificationHandler`] for the notification `N`.
pub fn notification_fn<N, F>(f: F) -> NotificationHandlerFn<N, F>
where
    N: Notification,
    F: Fn(&N) -> HandlerResult<()> + Send + Sync + 'static,
{
    NotificationHandlerFn {
        f,
        _marker: PhantomData,
    }
}

impl<N, F> NotificationHandler for NotificationHandlerFn<N, F>
where
    N: Notification,
    F: Fn(&N) -> HandlerResult<()> + Send + Sync + 'static,
{
    type Notification = N;

    fn handle(&self, notification: &N) -> HandlerResult<()> {
        (self.f)(notification)
    }
}

impl<N, F> fmt::Debug for NotificationHandlerFn<N, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationHandlerFn")
            .field("notification", &std::any::type_name::<N>())
            .finish()
    }
}

/// An async handler for application notifications.
#[cfg(feature = "async")]
#[cfg_attr(feature = "async", async_trait::async_trait)]
pub trait AsyncNotificationHandler: Send + Sync + 'static {
    /// Type of the notification handled by this handler.
    type Notification: Notification;

    /// Handles a notification.
    async fn handle(&self, notification: &Self::Notification) -> HandlerResult<()>;
}

/// An [`AsyncNotificationHandler`] backed by a function returning a future.
///
/// The future must not borrow the notification; copy what the handler needs
/// out of it before the `async` block. Created with [`async_notification_fn`].
#[cfg(feature = "async")]
pub struct AsyncNotificationHandlerFn<N, F, Fut> {
    f: F,
    _marker: PhantomData<fn(&N) -> Fut>,
}

/// Wraps a function returning a future into an [`AsyncNotificationHandler`]
/// for the notification `N`.
#[cfg(feature = "async")]
pub fn async_notification_fn<N, F, Fut>(f: F) -> AsyncNotificationHandlerFn<N, F, Fut>
where
    N: Notification,
    F: Fn(&N) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult<()>> + Send + 'static,
{
    AsyncNotificationHandlerFn {
        f,
        _marker: PhantomData,
    }
}

#[cfg(feature = "async")]
#[async_trait::async_trait]
impl<N, F, Fut> AsyncNotificationHandler for AsyncNotificationHandlerFn<N, F, Fut>
where
    N: Notification,
    F: Fn(&N) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult<()>> + Send + 'static,
{
    type Notification = N;

    async fn handle(&self, notification: &N) -> HandlerResult<()> {
        (self.f)(notification).await
    }
}

#[cfg(feature = "async")]
impl<N, F, Fut> fmt::Debug for AsyncNotificationHandlerFn<N, F, Fut> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncNotificationHandlerFn")
            .field("notification", &std::any::type_name::<N>())
            .finish()
    }
}
