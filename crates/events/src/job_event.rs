use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use conveyor_core::{JobId, JobState};

use crate::event::Event;

/// Notification that a job should advance to a new lifecycle state.
///
/// Published by the admission path immediately after a job is created
/// (targeting [`JobState::InQueue`]) and consumed by the worker-dispatch
/// task, which applies the transition through the registry. The persisted
/// state is eventually, not immediately, consistent with this event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobAdvanceEvent {
    job_id: JobId,
    target_state: JobState,
    occurred_at: DateTime<Utc>,
}

impl JobAdvanceEvent {
    pub fn new(job_id: JobId, target_state: JobState) -> Self {
        Self {
            job_id,
            target_state,
            occurred_at: Utc::now(),
        }
    }

    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    pub fn target_state(&self) -> JobState {
        self.target_state
    }
}

impl Event for JobAdvanceEvent {
    fn event_type(&self) -> &'static str {
        "job.advance"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carries_job_id_and_target_state() {
        let id = JobId::new();
        let event = JobAdvanceEvent::new(id, JobState::InQueue);

        assert_eq!(event.job_id(), id);
        assert_eq!(event.target_state(), JobState::InQueue);
        assert_eq!(event.event_type(), "job.advance");
    }
}
