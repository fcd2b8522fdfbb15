use crate::{Notification, Request};

/// A mediator is a central hub for communication between components.
///
/// Callers only ever see these two operations; the registries behind them
/// are owned by the implementation.
pub trait Mediator {
    /// Sends a request to the one handler that serves it and returns the
    /// handler's response.
    fn send<Req>(&self, req: Req) -> crate::Result<Req::Response>
    where
        Req: Request;

    /// Publish a notification to every handler subscribed to it.
    fn publish<N>(&self, notification: N) -> crate::Result<()>
    where
        N: Notification;
}

/// A mediator whose handlers run asynchronously.
#[cfg(feature = "async")]
#[cfg_attr(feature = "async", async_trait::async_trait)]
pub trait AsyncMediator {
    /// Sends a request to the one handler that serves it and awaits the
    /// handler's response.
    async fn send<Req>(&self, req: Req) -> crate::Result<Req::Response>
    where
        Req: Request;

    /// Publish a notification to every handler subscribed to it, awaiting
    /// each handler in turn.
    async fn publish<N>(&self, notification: N) -> crate::Result<()>
    where
        N: Notification;
}
