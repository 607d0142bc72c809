//! Event publishing/subscription abstraction (mechanics only).
//!
//! The bus is intentionally lightweight and transport-agnostic: it works with
//! in-memory channels today and could be backed by a broker without changing
//! the publishing side. Delivery is at-least-once and fire-and-forget — the
//! publisher does not block on, and has no visibility into, consumer success
//! or failure. Consumers must therefore be idempotent.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A subscription to an event stream.
///
/// Each subscription receives a copy of every message published to the bus
/// (broadcast semantics). Subscriptions are designed for single-threaded
/// consumption; give each consumer thread its own.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    ///
    /// Consumers poll with a timeout so they can interleave shutdown checks.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Domain-agnostic event bus (pub/sub abstraction).
///
/// `publish()` can fail (bus full, broker unreachable); failures surface to
/// the caller, which decides whether they matter. For job creation they never
/// roll back the committed record — the record is durable first, the
/// notification is best-effort.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
