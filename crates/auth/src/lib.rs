//! `conveyor-auth` — caller identity for ownership scoping.
//!
//! Token validation and permission checks happen at the transport boundary;
//! the core only carries the resolved [`Principal`] through to the registry
//! for visibility filtering.

pub mod principal;

pub use principal::Principal;
