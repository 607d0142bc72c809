//! Job lifecycle state machine.
//!
//! A job moves forward through a single linear lifecycle; no operation may set
//! a state earlier in the lifecycle than the job's current one. Deletion is
//! allowed from any state and is not a transition.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Lifecycle state of a job.
///
/// `Created` is set exactly once, at record creation. `InQueue` is requested
/// immediately afterwards via the event bus and applied asynchronously.
/// `InProgress` and the terminal states are written by the worker subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Created,
    InQueue,
    InProgress,
    Completed,
    Failed,
}

impl JobState {
    /// Position in the lifecycle. Transitions must strictly increase this.
    ///
    /// `Completed` and `Failed` share the terminal position, which also makes
    /// them unreachable from each other.
    pub fn position(&self) -> u8 {
        match self {
            JobState::Created => 0,
            JobState::InQueue => 1,
            JobState::InProgress => 2,
            JobState::Completed | JobState::Failed => 3,
        }
    }

    /// Whether a forward transition from `self` to `target` is permitted.
    pub fn can_advance_to(&self, target: JobState) -> bool {
        target.position() > self.position()
    }

    /// Validate a requested transition, for callers that need the error.
    pub fn advance_to(&self, target: JobState) -> Result<JobState, DomainError> {
        if self.can_advance_to(target) {
            Ok(target)
        } else {
            Err(DomainError::invariant(format!(
                "cannot move job from {self} to {target}"
            )))
        }
    }

    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }

    /// A job is unprocessed until a worker has picked it up.
    pub fn is_unprocessed(&self) -> bool {
        matches!(self, JobState::Created | JobState::InQueue)
    }

    /// Stable wire form (matches the serde representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Created => "CREATED",
            JobState::InQueue => "IN_QUEUE",
            JobState::InProgress => "IN_PROGRESS",
            JobState::Completed => "COMPLETED",
            JobState::Failed => "FAILED",
        }
    }
}

impl core::fmt::Display for JobState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATED" => Ok(JobState::Created),
            "IN_QUEUE" => Ok(JobState::InQueue),
            "IN_PROGRESS" => Ok(JobState::InProgress),
            "COMPLETED" => Ok(JobState::Completed),
            "FAILED" => Ok(JobState::Failed),
            other => Err(DomainError::validation(format!(
                "unrecognized job state: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_increase_along_the_lifecycle() {
        let order = [
            JobState::Created,
            JobState::InQueue,
            JobState::InProgress,
            JobState::Completed,
        ];
        for pair in order.windows(2) {
            assert!(pair[0].position() < pair[1].position());
            assert!(pair[0].can_advance_to(pair[1]));
        }
    }

    #[test]
    fn backward_transitions_are_rejected() {
        assert!(!JobState::InQueue.can_advance_to(JobState::Created));
        assert!(!JobState::InProgress.can_advance_to(JobState::InQueue));
        assert!(!JobState::Completed.can_advance_to(JobState::InProgress));

        let err = JobState::InQueue.advance_to(JobState::Created).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn self_transitions_are_rejected() {
        assert!(!JobState::InQueue.can_advance_to(JobState::InQueue));
    }

    #[test]
    fn terminal_states_are_not_interchangeable() {
        assert!(!JobState::Completed.can_advance_to(JobState::Failed));
        assert!(!JobState::Failed.can_advance_to(JobState::Completed));
        assert!(JobState::Completed.is_terminal());
        assert!(JobState::Failed.is_terminal());
    }

    #[test]
    fn unprocessed_covers_created_and_in_queue() {
        assert!(JobState::Created.is_unprocessed());
        assert!(JobState::InQueue.is_unprocessed());
        assert!(!JobState::InProgress.is_unprocessed());
        assert!(!JobState::Completed.is_unprocessed());
    }

    #[test]
    fn wire_form_round_trips() {
        for state in [
            JobState::Created,
            JobState::InQueue,
            JobState::InProgress,
            JobState::Completed,
            JobState::Failed,
        ] {
            assert_eq!(state.as_str().parse::<JobState>().unwrap(), state);
        }
    }

    #[test]
    fn unknown_wire_form_is_a_validation_error() {
        let err = "PAUSED".parse::<JobState>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
