//! Worker-dispatch task: the asynchronous consumer of advance events.
//!
//! Creation publishes fire-and-forget; this task owns the other end of the
//! channel. It applies each requested transition through the registry, so the
//! persisted state converges with what was requested. Failures are logged and
//! dropped — there is no retry and nothing to report back to the submitter.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use conveyor_events::{JobAdvanceEvent, Subscription};

use crate::registry::{JobRegistry, RegistryError};

/// Dispatcher configuration.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// How long to wait for an event before re-checking for shutdown.
    pub poll_interval: Duration,
    /// Name for logging.
    pub name: String,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            name: "job-dispatcher".to_string(),
        }
    }
}

/// Handle to control a running dispatcher.
#[derive(Debug)]
pub struct JobDispatcherHandle {
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
}

impl JobDispatcherHandle {
    /// Request graceful shutdown and wait for the thread to finish.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }
}

/// Consumes [`JobAdvanceEvent`]s from a bus subscription on a dedicated
/// thread.
pub struct JobDispatcher;

impl JobDispatcher {
    /// Spawn the dispatcher in a background thread.
    pub fn spawn<R>(
        registry: R,
        subscription: Subscription<JobAdvanceEvent>,
        config: DispatcherConfig,
    ) -> JobDispatcherHandle
    where
        R: JobRegistry + 'static,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let name = config.name.clone();
        let join = thread::Builder::new()
            .name(name)
            .spawn(move || {
                dispatch_loop(registry, subscription, config, shutdown_rx);
            })
            .expect("failed to spawn job dispatcher thread");

        JobDispatcherHandle {
            shutdown: shutdown_tx,
            join: Some(join),
        }
    }
}

fn dispatch_loop<R: JobRegistry>(
    registry: R,
    subscription: Subscription<JobAdvanceEvent>,
    config: DispatcherConfig,
    shutdown_rx: mpsc::Receiver<()>,
) {
    info!(dispatcher = %config.name, "job dispatcher started");

    loop {
        if shutdown_rx.try_recv().is_ok() {
            break;
        }

        match subscription.recv_timeout(config.poll_interval) {
            Ok(event) => apply_event(&registry, &event),
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                // Bus is gone; nothing further will arrive.
                break;
            }
        }
    }

    info!(dispatcher = %config.name, "job dispatcher stopped");
}

/// Apply a single advance event through the registry.
///
/// Unknown jobs (deleted between publish and pickup) and non-forward
/// transitions (duplicate delivery) are dropped with a warning.
pub fn apply_event<R: JobRegistry>(registry: &R, event: &JobAdvanceEvent) {
    debug!(job_id = %event.job_id(), target = %event.target_state(), "applying advance event");

    match registry.advance_job(event.job_id(), event.target_state()) {
        Ok(()) => {}
        Err(RegistryError::NotFound(_)) => {
            warn!(job_id = %event.job_id(), "advance event for unknown job; dropping");
        }
        Err(RegistryError::InvalidTransition(reason)) => {
            warn!(job_id = %event.job_id(), %reason, "dropping non-forward advance event");
        }
        Err(e) => {
            error!(job_id = %event.job_id(), error = %e, "failed to apply advance event");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Instant;

    use conveyor_core::{JobId, JobState};
    use conveyor_events::{EventBus, InMemoryEventBus};

    use super::*;
    use crate::registry::InMemoryJobRegistry;
    use crate::types::NewJob;

    fn new_job() -> NewJob {
        NewJob {
            name: "scan".to_string(),
            provider: "nmap".to_string(),
            provider_payload: "{}".to_string(),
            publisher: None,
            publisher_payload: None,
            owner: None,
        }
    }

    #[test]
    fn apply_event_advances_the_job() {
        let registry = InMemoryJobRegistry::new();
        let job = registry.create_job(new_job()).unwrap();

        apply_event(
            &registry,
            &JobAdvanceEvent::new(job.id, JobState::InQueue),
        );

        let fetched = registry.get_job(job.id, None).unwrap().unwrap();
        assert_eq!(fetched.state, JobState::InQueue);
    }

    #[test]
    fn unknown_and_backward_events_are_dropped_quietly() {
        let registry = InMemoryJobRegistry::new();

        // Unknown job: no panic, no record created.
        apply_event(
            &registry,
            &JobAdvanceEvent::new(JobId::new(), JobState::InQueue),
        );

        // Duplicate delivery of the same advance: state stays put.
        let job = registry.create_job(new_job()).unwrap();
        let event = JobAdvanceEvent::new(job.id, JobState::InQueue);
        apply_event(&registry, &event);
        apply_event(&registry, &event);

        let fetched = registry.get_job(job.id, None).unwrap().unwrap();
        assert_eq!(fetched.state, JobState::InQueue);
    }

    #[test]
    fn spawned_dispatcher_applies_published_events() {
        let registry = InMemoryJobRegistry::arc();
        let bus: InMemoryEventBus<JobAdvanceEvent> = InMemoryEventBus::new();

        let handle = JobDispatcher::spawn(
            registry.clone(),
            bus.subscribe(),
            DispatcherConfig {
                poll_interval: Duration::from_millis(10),
                ..Default::default()
            },
        );

        let job = registry.create_job(new_job()).unwrap();
        bus.publish(JobAdvanceEvent::new(job.id, JobState::InQueue))
            .unwrap();

        // The transition is eventually consistent; poll with a deadline.
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let state = registry.get_job(job.id, None).unwrap().unwrap().state;
            if state == JobState::InQueue {
                break;
            }
            assert!(Instant::now() < deadline, "dispatcher never applied the event");
            thread::sleep(Duration::from_millis(10));
        }

        handle.shutdown();
    }

    #[test]
    fn shutdown_stops_the_dispatcher() {
        let registry = Arc::new(InMemoryJobRegistry::new());
        let bus: InMemoryEventBus<JobAdvanceEvent> = InMemoryEventBus::new();

        let handle = JobDispatcher::spawn(
            registry,
            bus.subscribe(),
            DispatcherConfig {
                poll_interval: Duration::from_millis(10),
                ..Default::default()
            },
        );
        handle.shutdown();
    }
}
