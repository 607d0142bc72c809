//! `conveyor-events` — event publishing/subscription.
//!
//! The bus decouples synchronous job submission from asynchronous worker
//! pickup: the admission path publishes a lifecycle-advance notification and
//! returns immediately; a dispatch task consumes it on its own schedule.

pub mod bus;
pub mod event;
pub mod in_memory_bus;
pub mod job_event;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use job_event::JobAdvanceEvent;
