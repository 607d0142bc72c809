//! Job registry: the durable-storage boundary.
//!
//! The trait is what the core consumes; durable engines live behind it as
//! external collaborators. The in-memory implementation here serves tests and
//! single-process deployments. Every operation is one unit of work: a lock is
//! acquired, the operation runs, and the lock is released on every exit path.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;

use conveyor_auth::Principal;
use conveyor_core::{JobId, JobState};

use crate::types::{ArtifactKind, Job, JobArtifact, NewJob};

/// Sort direction for creation-time ordered listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

/// Registry failure. Fatal for the current operation; never retried here.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryError {
    #[error("job not found: {0}")]
    NotFound(JobId),
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
    #[error("storage error: {0}")]
    Storage(String),
}

/// Durable storage and principal-scoped querying of jobs and artifacts.
///
/// Visibility filtering happens here, uniformly for every operation: callers
/// pass the requesting principal through unmodified and apply no authorization
/// logic of their own.
pub trait JobRegistry: Send + Sync {
    /// List visible jobs ordered by creation time.
    fn list_jobs(
        &self,
        order: OrderDirection,
        principal: Option<&Principal>,
    ) -> Result<Vec<Job>, RegistryError>;

    /// Fetch a job by id, if it exists and is visible to the principal.
    fn get_job(&self, id: JobId, principal: Option<&Principal>)
    -> Result<Option<Job>, RegistryError>;

    /// Create a job in state `CREATED`, storing its payload artifacts.
    fn create_job(&self, new_job: NewJob) -> Result<Job, RegistryError>;

    /// Delete a job and its artifacts. Unknown or invisible ids are a no-op.
    fn delete_job(&self, id: JobId, principal: Option<&Principal>) -> Result<(), RegistryError>;

    /// Delete every visible job currently in `state`.
    fn delete_jobs_by_state(
        &self,
        state: JobState,
        principal: Option<&Principal>,
    ) -> Result<(), RegistryError>;

    /// Delete every visible job.
    fn delete_all_jobs(&self, principal: Option<&Principal>) -> Result<(), RegistryError>;

    /// Number of jobs not yet picked up by a worker, across all principals.
    fn count_unprocessed_jobs(&self) -> Result<usize, RegistryError>;

    /// Fetch an artifact of a visible job. `None` covers both "no such job"
    /// and "job has no artifact of this kind".
    fn get_artifact(
        &self,
        id: JobId,
        kind: ArtifactKind,
        principal: Option<&Principal>,
    ) -> Result<Option<JobArtifact>, RegistryError>;

    /// Apply a forward lifecycle transition. Backward or sideways writes are
    /// rejected with [`RegistryError::InvalidTransition`].
    fn advance_job(&self, id: JobId, target: JobState) -> Result<(), RegistryError>;

    /// Store an artifact, replacing any existing one of the same kind.
    fn store_artifact(
        &self,
        id: JobId,
        kind: ArtifactKind,
        content: Vec<u8>,
        filename: Option<String>,
    ) -> Result<(), RegistryError>;
}

impl<R> JobRegistry for Arc<R>
where
    R: JobRegistry + ?Sized,
{
    fn list_jobs(
        &self,
        order: OrderDirection,
        principal: Option<&Principal>,
    ) -> Result<Vec<Job>, RegistryError> {
        (**self).list_jobs(order, principal)
    }

    fn get_job(
        &self,
        id: JobId,
        principal: Option<&Principal>,
    ) -> Result<Option<Job>, RegistryError> {
        (**self).get_job(id, principal)
    }

    fn create_job(&self, new_job: NewJob) -> Result<Job, RegistryError> {
        (**self).create_job(new_job)
    }

    fn delete_job(&self, id: JobId, principal: Option<&Principal>) -> Result<(), RegistryError> {
        (**self).delete_job(id, principal)
    }

    fn delete_jobs_by_state(
        &self,
        state: JobState,
        principal: Option<&Principal>,
    ) -> Result<(), RegistryError> {
        (**self).delete_jobs_by_state(state, principal)
    }

    fn delete_all_jobs(&self, principal: Option<&Principal>) -> Result<(), RegistryError> {
        (**self).delete_all_jobs(principal)
    }

    fn count_unprocessed_jobs(&self) -> Result<usize, RegistryError> {
        (**self).count_unprocessed_jobs()
    }

    fn get_artifact(
        &self,
        id: JobId,
        kind: ArtifactKind,
        principal: Option<&Principal>,
    ) -> Result<Option<JobArtifact>, RegistryError> {
        (**self).get_artifact(id, kind, principal)
    }

    fn advance_job(&self, id: JobId, target: JobState) -> Result<(), RegistryError> {
        (**self).advance_job(id, target)
    }

    fn store_artifact(
        &self,
        id: JobId,
        kind: ArtifactKind,
        content: Vec<u8>,
        filename: Option<String>,
    ) -> Result<(), RegistryError> {
        (**self).store_artifact(id, kind, content, filename)
    }
}

#[derive(Debug, Clone)]
struct JobRecord {
    job: Job,
    artifacts: HashMap<ArtifactKind, JobArtifact>,
}

/// In-memory job registry.
#[derive(Debug, Default)]
pub struct InMemoryJobRegistry {
    jobs: RwLock<HashMap<JobId, JobRecord>>,
}

impl InMemoryJobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// The single place the visibility rule lives: unowned jobs are visible to
    /// everyone; owned jobs only to their owner; anonymous callers see only
    /// unowned jobs.
    fn visible_to(job: &Job, principal: Option<&Principal>) -> bool {
        match (&job.owner, principal) {
            (None, _) => true,
            (Some(owner), Some(p)) => *owner == p.id(),
            (Some(_), None) => false,
        }
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<JobId, JobRecord>>, RegistryError> {
        self.jobs
            .read()
            .map_err(|_| RegistryError::Storage("job table lock poisoned".to_string()))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<JobId, JobRecord>>, RegistryError> {
        self.jobs
            .write()
            .map_err(|_| RegistryError::Storage("job table lock poisoned".to_string()))
    }
}

impl JobRegistry for InMemoryJobRegistry {
    fn list_jobs(
        &self,
        order: OrderDirection,
        principal: Option<&Principal>,
    ) -> Result<Vec<Job>, RegistryError> {
        let jobs = self.read()?;
        let mut result: Vec<_> = jobs
            .values()
            .filter(|r| Self::visible_to(&r.job, principal))
            .map(|r| r.job.clone())
            .collect();

        result.sort_by_key(|j| j.created_at);
        if order == OrderDirection::Desc {
            result.reverse();
        }
        Ok(result)
    }

    fn get_job(
        &self,
        id: JobId,
        principal: Option<&Principal>,
    ) -> Result<Option<Job>, RegistryError> {
        let jobs = self.read()?;
        Ok(jobs
            .get(&id)
            .filter(|r| Self::visible_to(&r.job, principal))
            .map(|r| r.job.clone()))
    }

    fn create_job(&self, new_job: NewJob) -> Result<Job, RegistryError> {
        let job = Job {
            id: JobId::new(),
            name: new_job.name,
            provider: new_job.provider,
            publisher: new_job.publisher,
            state: JobState::Created,
            message: String::new(),
            created_at: Utc::now(),
            owner: new_job.owner,
        };

        let mut artifacts = HashMap::new();
        artifacts.insert(
            ArtifactKind::ProviderPayload,
            JobArtifact {
                job_id: job.id,
                kind: ArtifactKind::ProviderPayload,
                content: new_job.provider_payload.into_bytes(),
                filename: None,
            },
        );
        if let Some(payload) = new_job.publisher_payload {
            artifacts.insert(
                ArtifactKind::PublisherPayload,
                JobArtifact {
                    job_id: job.id,
                    kind: ArtifactKind::PublisherPayload,
                    content: payload.into_bytes(),
                    filename: None,
                },
            );
        }

        let mut jobs = self.write()?;
        jobs.insert(
            job.id,
            JobRecord {
                job: job.clone(),
                artifacts,
            },
        );
        Ok(job)
    }

    fn delete_job(&self, id: JobId, principal: Option<&Principal>) -> Result<(), RegistryError> {
        let mut jobs = self.write()?;
        if let Some(record) = jobs.get(&id) {
            if Self::visible_to(&record.job, principal) {
                jobs.remove(&id);
            }
        }
        Ok(())
    }

    fn delete_jobs_by_state(
        &self,
        state: JobState,
        principal: Option<&Principal>,
    ) -> Result<(), RegistryError> {
        let mut jobs = self.write()?;
        jobs.retain(|_, r| !(r.job.state == state && Self::visible_to(&r.job, principal)));
        Ok(())
    }

    fn delete_all_jobs(&self, principal: Option<&Principal>) -> Result<(), RegistryError> {
        let mut jobs = self.write()?;
        jobs.retain(|_, r| !Self::visible_to(&r.job, principal));
        Ok(())
    }

    fn count_unprocessed_jobs(&self) -> Result<usize, RegistryError> {
        let jobs = self.read()?;
        Ok(jobs.values().filter(|r| r.job.state.is_unprocessed()).count())
    }

    fn get_artifact(
        &self,
        id: JobId,
        kind: ArtifactKind,
        principal: Option<&Principal>,
    ) -> Result<Option<JobArtifact>, RegistryError> {
        let jobs = self.read()?;
        Ok(jobs
            .get(&id)
            .filter(|r| Self::visible_to(&r.job, principal))
            .and_then(|r| r.artifacts.get(&kind))
            .cloned())
    }

    fn advance_job(&self, id: JobId, target: JobState) -> Result<(), RegistryError> {
        let mut jobs = self.write()?;
        let record = jobs.get_mut(&id).ok_or(RegistryError::NotFound(id))?;

        record.job.state = record
            .job
            .state
            .advance_to(target)
            .map_err(|e| RegistryError::InvalidTransition(e.to_string()))?;
        Ok(())
    }

    fn store_artifact(
        &self,
        id: JobId,
        kind: ArtifactKind,
        content: Vec<u8>,
        filename: Option<String>,
    ) -> Result<(), RegistryError> {
        let mut jobs = self.write()?;
        let record = jobs.get_mut(&id).ok_or(RegistryError::NotFound(id))?;

        record.artifacts.insert(
            kind,
            JobArtifact {
                job_id: id,
                kind,
                content,
                filename,
            },
        );
        Ok(())
    }
}
