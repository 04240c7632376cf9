//! Domain events and the synchronous in-process event bus.
//!
//! Publishers record **what happened**; subscribers declare **what they care
//! about**. Neither side imports the other, which is what keeps the feature
//! modules free of circular dependencies.

pub mod bus;
pub mod envelope;
pub mod handler;

pub use bus::{DeliveryObserver, EventBus, EventBusBuilder, PublishError};
pub use envelope::{DomainEvent, EventKind};
pub use handler::EventHandler;
