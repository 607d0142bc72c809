//! Process-start configuration.

use tracing::warn;

/// Maximum tolerated unprocessed-job count when none is configured.
pub const DEFAULT_MAX_QUEUE_SIZE: usize = 100;

const MAX_QUEUE_SIZE_VAR: &str = "CONVEYOR_MAX_QUEUE_SIZE";

/// Configuration for the job subsystem.
///
/// Read once at process start and injected where needed (the admission
/// controller takes the limit at construction); nothing reads the environment
/// after startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobsConfig {
    pub max_queue_size: usize,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            max_queue_size: DEFAULT_MAX_QUEUE_SIZE,
        }
    }
}

impl JobsConfig {
    /// Load from the environment, falling back to defaults on missing or
    /// malformed values.
    pub fn from_env() -> Self {
        Self::from_raw(std::env::var(MAX_QUEUE_SIZE_VAR).ok().as_deref())
    }

    fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None => Self::default(),
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(max_queue_size) => Self { max_queue_size },
                Err(_) => {
                    warn!(
                        var = MAX_QUEUE_SIZE_VAR,
                        value = raw,
                        "malformed queue size; using default"
                    );
                    Self::default()
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        assert_eq!(JobsConfig::from_raw(None).max_queue_size, DEFAULT_MAX_QUEUE_SIZE);
    }

    #[test]
    fn parses_a_configured_limit() {
        assert_eq!(JobsConfig::from_raw(Some("25")).max_queue_size, 25);
        assert_eq!(JobsConfig::from_raw(Some(" 7 ")).max_queue_size, 7);
    }

    #[test]
    fn malformed_values_fall_back_to_the_default() {
        assert_eq!(
            JobsConfig::from_raw(Some("lots")).max_queue_size,
            DEFAULT_MAX_QUEUE_SIZE
        );
        assert_eq!(
            JobsConfig::from_raw(Some("-3")).max_queue_size,
            DEFAULT_MAX_QUEUE_SIZE
        );
    }
}
