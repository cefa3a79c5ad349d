//! Typed event stores built from [`Topic`]s.
//!
//! Each event is a zero-sized marker type implementing [`EventName`], which
//! fixes the payload type for that name. A store lists the events it carries
//! by implementing [`Emits`] once per name; asking a store for an event it
//! does not carry is a compile error rather than a runtime lookup miss.

use super::topic::{Listener, Subscription, Topic};
use tracing::debug;

/// A named event with a fixed payload type.
pub trait EventName: 'static {
    type Payload: 'static;

    const NAME: &'static str;
}

/// Declares that a store carries event `N`.
pub trait Emits<N: EventName> {
    fn topic(&self) -> &Topic<N::Payload>;
}

/// `on`/`off`/`emit` for every event a store [`Emits`].
pub trait EventStore {
    /// Register `listener` for `N`; returns a handle that unsubscribes it.
    fn on<N>(&self, listener: Listener<N::Payload>) -> Subscription<N::Payload>
    where
        N: EventName,
        Self: Emits<N>,
    {
        debug!(event = N::NAME, "subscribe");
        <Self as Emits<N>>::topic(self).subscribe(listener)
    }

    /// Convenience for registering a closure.
    fn on_fn<N, F>(&self, callback: F) -> Subscription<N::Payload>
    where
        N: EventName,
        Self: Emits<N>,
        F: Fn(&N::Payload) + Send + Sync + 'static,
    {
        self.on::<N>(Listener::new(callback))
    }

    /// Remove `listener` from `N`; a no-op when it is not registered.
    fn off<N>(&self, listener: &Listener<N::Payload>)
    where
        N: EventName,
        Self: Emits<N>,
    {
        debug!(event = N::NAME, "unsubscribe");
        <Self as Emits<N>>::topic(self).unsubscribe(listener)
    }

    /// Deliver `payload` synchronously to the listeners of `N`.
    fn emit<N>(&self, payload: &N::Payload) -> usize
    where
        N: EventName,
        Self: Emits<N>,
    {
        let delivered = <Self as Emits<N>>::topic(self).emit(payload);
        debug!(event = N::NAME, delivered, "emit");
        delivered
    }

    fn listener_count<N>(&self) -> usize
    where
        N: EventName,
        Self: Emits<N>,
    {
        <Self as Emits<N>>::topic(self).listener_count()
    }
}

/// Declare a store struct with one [`Topic`] per event.
///
/// ```ignore
/// event_store! {
///     /// Events about widgets.
///     pub struct WidgetEvents {
///         created: WidgetCreated,
///         removed: WidgetRemoved,
///     }
/// }
/// ```
#[macro_export]
macro_rules! event_store {
    (
        $(#[$meta:meta])*
        $vis:vis struct $store:ident {
            $($field:ident : $event:ty),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        $vis struct $store {
            $($field: $crate::events::Topic<<$event as $crate::events::EventName>::Payload>,)+
        }

        impl $store {
            pub fn new() -> Self {
                Self {
                    $($field: $crate::events::Topic::new(
                        <$event as $crate::events::EventName>::NAME,
                    ),)+
                }
            }

            /// Drop every listener of every event.
            pub fn clear(&self) {
                $(self.$field.clear();)+
            }
        }

        impl Default for $store {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $crate::events::EventStore for $store {}

        $(
            impl $crate::events::Emits<$event> for $store {
                fn topic(&self) -> &$crate::events::Topic<<$event as $crate::events::EventName>::Payload> {
                    &self.$field
                }
            }
        )+
    };
}
