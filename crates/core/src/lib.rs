//! `conveyor-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! typed identifiers, the domain error model, and the job lifecycle state
//! machine.

pub mod error;
pub mod id;
pub mod lifecycle;

pub use error::{DomainError, DomainResult};
pub use id::{JobId, PrincipalId};
pub use lifecycle::JobState;
