//! Job service orchestration.
//!
//! Creation path: validate → admission gate → registry create (`CREATED`) →
//! publish advance-to-`IN_QUEUE` event → return the created record. The
//! response reflects `CREATED`; the queue transition is applied asynchronously
//! by the dispatcher, so callers must not assume the returned state stays
//! accurate past the instant of response.

use tracing::{info, warn};

use conveyor_auth::Principal;
use conveyor_core::{DomainError, JobId, JobState};
use conveyor_events::{EventBus, JobAdvanceEvent};

use crate::admission::{AdmissionController, AdmissionDecision};
use crate::artifact::{self, ArtifactContent, ArtifactView};
use crate::registry::{JobRegistry, OrderDirection, RegistryError};
use crate::types::{ArtifactKind, Job, JobSubmission, NewJob};

/// Error surface of the job service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Missing required submission fields, unrecognized state value, or an
    /// unrecognized view modifier. Reported immediately, no side effects.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Unknown job id, or a job present but lacking the requested artifact.
    #[error("not found")]
    NotFound,

    /// Admission rejected: the queue is over its limit. A "try again later"
    /// signal, not a client error.
    #[error("queue limit reached; the server is not accepting new jobs")]
    QueueFull,

    /// The storage operation itself failed. Fatal for this operation.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound => ServiceError::NotFound,
            other => ServiceError::Validation(other.to_string()),
        }
    }
}

/// Orchestrates admission, lifecycle, and artifact access over a registry and
/// an event bus.
pub struct JobService<R, B>
where
    R: JobRegistry,
    B: EventBus<JobAdvanceEvent>,
{
    registry: R,
    bus: B,
    admission: AdmissionController,
}

impl<R, B> JobService<R, B>
where
    R: JobRegistry,
    B: EventBus<JobAdvanceEvent>,
{
    pub fn new(registry: R, bus: B, admission: AdmissionController) -> Self {
        Self {
            registry,
            bus,
            admission,
        }
    }

    /// Validate and admit a submission, create the job, and request its queue
    /// transition.
    pub fn create_job(
        &self,
        submission: &JobSubmission,
        owner: Option<&Principal>,
    ) -> Result<Job, ServiceError> {
        // No side effects before validation and admission both pass.
        let new_job = validate(submission, owner)?;

        let unprocessed = self.registry.count_unprocessed_jobs()?;
        if self.admission.try_admit(unprocessed) == AdmissionDecision::Rejected {
            warn!(
                unprocessed,
                limit = self.admission.limit(),
                "queue limit reached; rejecting submission"
            );
            return Err(ServiceError::QueueFull);
        }

        let job = self.registry.create_job(new_job)?;
        info!(job_id = %job.id, provider = %job.provider, name = %job.name, "job created");

        // Fire-and-forget: the record is durable regardless of whether the
        // notification makes it out.
        let event = JobAdvanceEvent::new(job.id, JobState::InQueue);
        if let Err(e) = self.bus.publish(event) {
            warn!(job_id = %job.id, error = ?e, "failed to publish advance event");
        }

        Ok(job)
    }

    /// All jobs visible to the principal, most recently created first.
    pub fn list_jobs(&self, principal: Option<&Principal>) -> Result<Vec<Job>, ServiceError> {
        Ok(self.registry.list_jobs(OrderDirection::Desc, principal)?)
    }

    pub fn get_job(&self, id: JobId, principal: Option<&Principal>) -> Result<Job, ServiceError> {
        self.registry
            .get_job(id, principal)?
            .ok_or(ServiceError::NotFound)
    }

    /// The free-text status message of a job.
    pub fn get_job_message(
        &self,
        id: JobId,
        principal: Option<&Principal>,
    ) -> Result<String, ServiceError> {
        Ok(self.get_job(id, principal)?.message)
    }

    /// Read an artifact in the requested view mode.
    ///
    /// `modifier` is validated before any lookup. Not-found covers both an
    /// unknown job and a job lacking the artifact kind; the two are not
    /// distinguished at this surface.
    pub fn get_artifact(
        &self,
        id: JobId,
        kind: ArtifactKind,
        modifier: i32,
        principal: Option<&Principal>,
    ) -> Result<ArtifactContent, ServiceError> {
        let view = ArtifactView::from_modifier(modifier)?;
        let artifact = self
            .registry
            .get_artifact(id, kind, principal)?
            .ok_or(ServiceError::NotFound)?;
        Ok(artifact::render(&artifact, view))
    }

    /// Delete a job. Unknown ids are an idempotent no-op.
    pub fn delete_job(&self, id: JobId, principal: Option<&Principal>) -> Result<(), ServiceError> {
        Ok(self.registry.delete_job(id, principal)?)
    }

    /// Delete all visible jobs in the given state (wire form). Unrecognized
    /// values are a validation error, never a silent no-op.
    pub fn delete_jobs_by_state(
        &self,
        state: &str,
        principal: Option<&Principal>,
    ) -> Result<(), ServiceError> {
        let state: JobState = state.parse().map_err(ServiceError::from)?;
        Ok(self.registry.delete_jobs_by_state(state, principal)?)
    }

    /// Delete every job visible to the principal.
    pub fn delete_all_jobs(&self, principal: Option<&Principal>) -> Result<(), ServiceError> {
        Ok(self.registry.delete_all_jobs(principal)?)
    }
}

/// Check the submission preconditions and serialize payloads.
///
/// Name, provider id, and provider payload are required; the publisher
/// id/payload must be supplied together or not at all.
fn validate(
    submission: &JobSubmission,
    owner: Option<&Principal>,
) -> Result<NewJob, ServiceError> {
    let name = submission
        .name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ServiceError::Validation("name is required".to_string()))?;

    let provider = submission
        .provider
        .as_ref()
        .ok_or_else(|| ServiceError::Validation("provider is required".to_string()))?;
    let provider_id = provider
        .id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ServiceError::Validation("provider id is required".to_string()))?;
    let provider_payload = provider
        .payload
        .as_ref()
        .ok_or_else(|| ServiceError::Validation("provider payload is required".to_string()))?;
    let provider_payload = serde_json::to_string(provider_payload)
        .map_err(|e| ServiceError::Validation(format!("provider payload: {e}")))?;

    let (publisher, publisher_payload) = match &submission.publisher {
        None => (None, None),
        Some(spec) => {
            let pair_error = || {
                ServiceError::Validation(
                    "publisher id and payload must be supplied together".to_string(),
                )
            };
            let id = spec
                .id
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(pair_error)?;
            let payload = spec.payload.as_ref().ok_or_else(pair_error)?;
            let payload = serde_json::to_string(payload)
                .map_err(|e| ServiceError::Validation(format!("publisher payload: {e}")))?;
            (Some(id.to_string()), Some(payload))
        }
    };

    Ok(NewJob {
        name: name.to_string(),
        provider: provider_id.to_string(),
        provider_payload,
        publisher,
        publisher_payload,
        owner: owner.map(Principal::id),
    })
}
