use crate::HandlerResult;
use std::fmt;
use std::marker::PhantomData;

#[cfg(feature = "async")]
use std::future::Future;

/// Represents a request to the mediator.
///
/// A request is routed by its type, never by its value, and declares the
/// single response type its handler produces.
pub trait Request: Send + 'static {
    /// Type of the response produced for this request.
    type Response: Send + 'static;
}

/// The response type of the request `R`.
pub type Response<R> = <R as Request>::Response;

/// Handles a request to the mediator.
///
/// The `Request` associated type is the one request type this handler serves.
pub trait RequestHandler: Send + Sync + 'static {
    /// Type of the request handled by this handler.
    type Request: Request;

    /// Handle a request and returns the response.
    fn handle(&self, req: Self::Request) -> HandlerResult<Response<Self::Request>>;
}

/// A [`RequestHandler`] backed by a function.
///
/// Created with [`request_fn`].
pub struct RequestHandlerFn<Req, F> {
    f: F,
    _marker: PhantomData<fn(Req)>,
}

/// Wraps a function into a [`RequestHandler`] for the request `Req`.
pub fn request_fn<Req, F>(f: F) -> RequestHandlerFn<Req, F>
where
    Req: Request,
    F: Fn(Req) -> HandlerResult<Req::Response> + Send + Sync + 'static,
{
    RequestHandlerFn {
        f,
        _marker: PhantomData,
    }
}

impl<Req, F> RequestHandler for RequestHandlerFn<Req, F>
where
    Req: Request,
    F: Fn(Req) -> HandlerResult<Req::Response> + Send + Sync + 'static,
{
    type Request = Req;

    fn handle(&self, req: Req) -> HandlerResult<Req::Response> {
        (self.f)(req)
    }
}

impl<Req, F> fmt::Debug for RequestHandlerFn<Req, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestHandlerFn")
            .field("request", &std::any::type_name::<Req>())
            .finish()
    }
}

/// Handles a request to the mediator asynchronously.
#[cfg(feature = "async")]
#[cfg_attr(feature = "async", async_trait::async_trait)]
pub trait AsyncRequestHandler: Send + Sync + 'static {
    /// Type of the request handled by this handler.
    type Request: Request;

    /// Handle a request and returns the response.
    async fn handle(&self, req: Self::Request) -> HandlerResult<Response<Self::Request>>;
}

/// An [`AsyncRequestHandler`] backed by a function returning a future.
///
/// Created with [`async_request_fn`].
#[cfg(feature = "async")]
pub struct AsyncRequestHandlerFn<Req, F, Fut> {
    f: F,
    _marker: PhantomData<fn(Req) -> Fut>,
}

/// Wraps a function returning a future into an [`AsyncRequestHandler`] for
/// the request `Req`.
#[cfg(feature = "async")]
pub fn async_request_fn<Req, F, Fut>(f: F) -> AsyncRequestHandlerFn<Req, F, Fut>
where
    Req: Request,
    F: Fn(Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult<Req::Response>> + Send + 'static,
{
    AsyncRequestHandlerFn {
        f,
        _marker: PhantomData,
    }
}

#[cfg(feature = "async")]
#[async_trait::async_trait]
impl<Req, F, Fut> AsyncRequestHandler for AsyncRequestHandlerFn<Req, F, Fut>
where
    Req: Request,
    F: Fn(Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult<Req::Response>> + Send + 'static,
{
    type Request = Req;

    async fn handle(&self, req: Req) -> HandlerResult<Req::Response> {
        (self.f)(req).await
    }
}

#[cfg(feature = "async")]
impl<Req, F, Fut> fmt::Debug for AsyncRequestHandlerFn<Req, F, Fut> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncRequestHandlerFn")
            .field("request", &std::any::type_name::<Req>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Double(i64);
    impl Request for Double {
        type Response = i64;
    }

    struct DoubleHandler;
    impl RequestHandler for DoubleHandler {
        type Request = Double;

        fn handle(&self, req: Double) -> HandlerResult<i64> {
            Ok(req.0 * 2)
        }
    }

    #[test]
    fn handler_returns_declared_response() {
        assert_eq!(8, DoubleHandler.handle(Double(4)).unwrap());
    }

    #[test]
    fn request_fn_wraps_closure() {
        let handler = request_fn(|req: Double| {
            if req.0 < 0 {
                return Err("negative input".into());
            }
            Ok(req.0 * 2)
        });

        assert_eq!(6, handler.handle(Double(3)).unwrap());
        assert_eq!("negative input", handler.handle(Double(-1)).unwrap_err().to_string());
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn async_request_fn_awaits_future() {
        let handler = async_request_fn(|req: Double| async move {
            tokio::task::yield_now().await;
            Ok(req.0 * 2)
        });

        assert_eq!(10, handler.handle(Double(5)).await.unwrap());
    }
}
