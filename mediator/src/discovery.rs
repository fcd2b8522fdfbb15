use crate::{MediatorBuilder, NotificationHandler, RequestHandler};
use std::any::type_name;
use std::fmt;

#[cfg(feature = "async")]
use crate::{AsyncMediatorBuilder, AsyncNotificationHandler, AsyncRequestHandler};

/// A discovered handler instance, ready to be registered on a builder `B`.
///
/// The handler's served type comes from its own `Request` or `Notification`
/// associated type, so a registration only has to carry the instance.
pub struct Registration<B> {
    handler_name: &'static str,
    apply: Box<dyn FnOnce(B) -> B>,
}

/// A registration for [`MediatorBuilder`].
pub type HandlerRegistration = Registration<MediatorBuilder>;

/// A registration for [`AsyncMediatorBuilder`].
#[cfg(feature = "async")]
pub type AsyncHandlerRegistration = Registration<AsyncMediatorBuilder>;

impl<B> Registration<B> {
    /// Name of the handler's concrete type.
    pub fn handler_name(&self) -> &'static str {
        self.handler_name
    }

    pub(crate) fn apply(self, builder: B) -> B {
        (self.apply)(builder)
    }
}

impl<B> fmt::Debug for Registration<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("handler", &self.handler_name)
            .finish()
    }
}

impl Registration<MediatorBuilder> {
    /// Registration of a request handler.
    pub fn request<H: RequestHandler>(handler: H) -> Self {
        Registration {
            handler_name: type_name::<H>(),
            apply: Box::new(move |builder: MediatorBuilder| builder.add_handler(handler)),
        }
    }

    /// Registration of a notification handler.
    pub fn notification<H: NotificationHandler>(handler: H) -> Self {
        Registration {
            handler_name: type_name::<H>(),
            apply: Box::new(move |builder: MediatorBuilder| builder.subscribe(handler)),
        }
    }
}

#[cfg(feature = "async")]
impl Registration<AsyncMediatorBuilder> {
    /// Registration of an async request handler.
    pub fn request<H: AsyncRequestHandler>(handler: H) -> Self {
        Registration {
            handler_name: type_name::<H>(),
            apply: Box::new(move |builder: AsyncMediatorBuilder| builder.add_handler(handler)),
        }
    }

    /// Registration of an async notification handler.
    pub fn notification<H: AsyncNotificationHandler>(handler: H) -> Self {
        Registration {
            handler_name: type_name::<H>(),
            apply: Box::new(move |builder: AsyncMediatorBuilder| builder.subscribe(handler)),
        }
    }
}

/// Supplies every handler instance available at startup.
///
/// How the instances are found is up to the implementor: a hand-written
/// composition root, a generated table, or [`InventoryDiscovery`] when the
/// `inventory` feature is enabled. Notification handlers are registered in
/// the order they are returned.
pub trait HandlerDiscovery<B> {
    /// Returns the registrations of all discovered handlers.
    fn discover(self) -> Vec<Registration<B>>;
}

impl<B, I> HandlerDiscovery<B> for I
where
    I: IntoIterator<Item = Registration<B>>,
{
    fn discover(self) -> Vec<Registration<B>> {
        self.into_iter().collect()
    }
}

/// A [`HandlerDiscovery`] backed by a function, created with [`discover_fn`].
pub struct DiscoverFn<F>(F);

/// Uses a function returning the registrations as the composition root.
///
/// The function runs once, when the builder's `discover` is called.
pub fn discover_fn<B, F>(f: F) -> DiscoverFn<F>
where
    F: FnOnce() -> Vec<Registration<B>>,
{
    DiscoverFn(f)
}

impl<B, F> HandlerDiscovery<B> for DiscoverFn<F>
where
    F: FnOnce() -> Vec<Registration<B>>,
{
    fn discover(self) -> Vec<Registration<B>> {
        (self.0)()
    }
}

impl<F> fmt::Debug for DiscoverFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DiscoverFn")
    }
}

/// A handler registration collected at link time.
///
/// Submitted with [`register_handler!`](crate::register_handler) and
/// enumerated by [`InventoryDiscovery`].
#[cfg(feature = "inventory")]
pub struct StaticRegistration {
    make: fn() -> HandlerRegistration,
}

#[cfg(feature = "inventory")]
impl StaticRegistration {
    /// Wraps the function that creates the registration on discovery.
    pub const fn new(make: fn() -> HandlerRegistration) -> Self {
        StaticRegistration { make }
    }
}

#[cfg(feature = "inventory")]
inventory::collect!(StaticRegistration);

/// Discovers every handler submitted with [`register_handler!`](crate::register_handler).
///
/// The order of the registrations is the order `inventory` yields them,
/// which depends on link order.
#[cfg(feature = "inventory")]
#[derive(Debug, Default, Clone, Copy)]
pub struct InventoryDiscovery;

#[cfg(feature = "inventory")]
impl HandlerDiscovery<MediatorBuilder> for InventoryDiscovery {
    fn discover(self) -> Vec<HandlerRegistration> {
        let mut registrations = Vec::new();
        for entry in inventory::iter::<StaticRegistration> {
            registrations.push((entry.make)());
        }
        registrations
    }
}

/// Submits a handler to the link-time registry read by [`InventoryDiscovery`].
///
/// ```ignore
/// typed_mediator::register_handler!(request: PingHandler);
/// typed_mediator::register_handler!(notification: AuditHandler::default());
/// ```
#[cfg(feature = "inventory")]
#[macro_export]
macro_rules! register_handler {
    (request: $handler:expr) => {
        $crate::inventory::submit! {
            $crate::StaticRegistration::new({
                fn __register() -> $crate::HandlerRegistration {
                    $crate::HandlerRegistration::request($handler)
                }
                __register
            })
        }
    };
    (notification: $handler:expr) => {
        $crate::inventory::submit! {
            $crate::StaticRegistration::new({
                fn __register() -> $crate::HandlerRegistration {
                    $crate::HandlerRegistration::notification($handler)
                }
                __register
            })
        }
    };
}
