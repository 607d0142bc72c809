use chrono::{DateTime, Utc};

/// A domain-agnostic event.
///
/// Events are immutable facts: once published they are never edited, only
/// superseded by later events.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "job.advance").
    fn event_type(&self) -> &'static str;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
