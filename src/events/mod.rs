//! Typed publish/subscribe primitives.
//!
//! Feature stores (sensor events, discovery reactions) are declared with
//! [`event_store!`](crate::event_store) over a closed set of event names.
//! Delivery is synchronous: `emit` returns once every listener has run.
//!
//! ## Example
//! ```rust,ignore
//! use ferthe::events::EventStore;
//! use ferthe::sensor::{ScanCompleted, SensorEvents};
//!
//! let events = SensorEvents::new();
//! let subscription = events.on_fn::<ScanCompleted, _>(|scan| {
//!     println!("scan {} found {} clues", scan.id(), scan.clues().len());
//! });
//! // ...
//! subscription.unsubscribe();
//! ```

mod store;
mod topic;

pub use store::{Emits, EventName, EventStore};
pub use topic::{Listener, Subscription, Topic};
