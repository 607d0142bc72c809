//! Capacity gate bounding the number of unprocessed jobs.

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDecision {
    Admitted,
    /// The queue is over its limit. Not a client error; the caller should
    /// surface a "try again later" signal.
    Rejected,
}

/// Best-effort capacity gate.
///
/// The limit is injected at construction and held for the process lifetime.
/// The check is intentionally non-atomic with respect to job creation:
/// concurrent submissions may race past the limit before the count is
/// re-observed. That bounds steady-state queue depth without taking a global
/// lock on every submission; it does not guarantee a hard ceiling under
/// bursts.
#[derive(Debug, Clone, Copy)]
pub struct AdmissionController {
    max_queue_size: usize,
}

impl AdmissionController {
    pub fn new(max_queue_size: usize) -> Self {
        Self { max_queue_size }
    }

    pub fn limit(&self) -> usize {
        self.max_queue_size
    }

    /// Reject when the unprocessed count strictly exceeds the limit at the
    /// moment of the check.
    pub fn try_admit(&self, unprocessed_count: usize) -> AdmissionDecision {
        if unprocessed_count > self.max_queue_size {
            AdmissionDecision::Rejected
        } else {
            AdmissionDecision::Admitted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_below_the_limit() {
        let gate = AdmissionController::new(5);
        assert_eq!(gate.try_admit(0), AdmissionDecision::Admitted);
        assert_eq!(gate.try_admit(4), AdmissionDecision::Admitted);
    }

    #[test]
    fn admits_exactly_at_the_limit() {
        // Rejection requires strictly exceeding the limit.
        let gate = AdmissionController::new(5);
        assert_eq!(gate.try_admit(5), AdmissionDecision::Admitted);
    }

    #[test]
    fn rejects_above_the_limit() {
        let gate = AdmissionController::new(5);
        assert_eq!(gate.try_admit(6), AdmissionDecision::Rejected);
        assert_eq!(gate.try_admit(100), AdmissionDecision::Rejected);
    }

    #[test]
    fn zero_limit_still_admits_an_empty_queue() {
        let gate = AdmissionController::new(0);
        assert_eq!(gate.try_admit(0), AdmissionDecision::Admitted);
        assert_eq!(gate.try_admit(1), AdmissionDecision::Rejected);
    }
}
