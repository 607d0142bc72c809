//! `conveyor-jobs` — the job admission/lifecycle/artifact subsystem.
//!
//! A submission enters [`service::JobService`], is validated, gated by the
//! [`admission::AdmissionController`], recorded through a [`registry::JobRegistry`]
//! in state `CREATED`, and an advance-to-`IN_QUEUE` event is published before the
//! call returns. A [`dispatch::JobDispatcher`] consumes those events on its own
//! thread and applies the transitions back through the registry.
//!
//! ## Components
//!
//! - `types`: `Job`, `JobArtifact`, and submission shapes
//! - `registry`: the durable-storage boundary (trait + in-memory implementation)
//! - `admission`: bounded-capacity gate for unprocessed jobs
//! - `artifact`: inline/attachment rendering of stored artifacts
//! - `service`: orchestration and principal-scoped read/delete operations
//! - `dispatch`: the asynchronous consumer of lifecycle-advance events
//! - `plugins`: provider/publisher strategy registry keyed by identifier
//! - `config`: process-start configuration

pub mod admission;
pub mod artifact;
pub mod config;
pub mod dispatch;
pub mod plugins;
pub mod registry;
pub mod service;
pub mod types;

pub use admission::{AdmissionController, AdmissionDecision};
pub use artifact::{ArtifactContent, ArtifactView};
pub use config::JobsConfig;
pub use dispatch::{DispatcherConfig, JobDispatcher, JobDispatcherHandle};
pub use plugins::{PluginRegistry, Provider, Publisher};
pub use registry::{InMemoryJobRegistry, JobRegistry, OrderDirection, RegistryError};
pub use service::{JobService, ServiceError};
pub use types::{ArtifactKind, Job, JobArtifact, JobSubmission, NewJob, PluginSpec};
