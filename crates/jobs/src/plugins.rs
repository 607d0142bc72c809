//! Provider/publisher plugin registration and resolution.
//!
//! Plugins are resolved through an explicit registry keyed by string
//! identifier, populated once at startup. The execution runtime itself lives
//! in the worker subsystem; this module only defines the strategy seams and
//! the lookup.

use std::collections::HashMap;
use std::sync::Arc;

use conveyor_core::DomainResult;

use crate::types::Job;

/// A data-acquisition plugin: produces the job's primary data from its
/// payload.
pub trait Provider: Send + Sync {
    fn acquire(&self, job: &Job, payload: &[u8]) -> DomainResult<Vec<u8>>;
}

/// A delivery plugin: hands a produced result onward.
pub trait Publisher: Send + Sync {
    fn publish(&self, job: &Job, result: &[u8]) -> DomainResult<()>;
}

/// Registry of available plugins, keyed by identifier.
#[derive(Default)]
pub struct PluginRegistry {
    providers: HashMap<String, Arc<dyn Provider>>,
    publishers: HashMap<String, Arc<dyn Publisher>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_provider(&mut self, id: impl Into<String>, provider: Arc<dyn Provider>) {
        self.providers.insert(id.into(), provider);
    }

    pub fn register_publisher(&mut self, id: impl Into<String>, publisher: Arc<dyn Publisher>) {
        self.publishers.insert(id.into(), publisher);
    }

    pub fn provider(&self, id: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(id).cloned()
    }

    pub fn publisher(&self, id: &str) -> Option<Arc<dyn Publisher>> {
        self.publishers.get(id).cloned()
    }

    pub fn provider_ids(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    pub fn publisher_ids(&self) -> impl Iterator<Item = &str> {
        self.publishers.keys().map(String::as_str)
    }
}

impl core::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("providers", &self.providers.keys())
            .field("publishers", &self.publishers.keys())
            .finish()
    }
}
