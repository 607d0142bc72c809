//! Core job data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use conveyor_core::{JobId, JobState, PrincipalId};

/// Kind of stored artifact.
///
/// At most one artifact exists per (job, kind); payload artifacts are written
/// at creation, the result artifact by the worker subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArtifactKind {
    ProviderPayload,
    PublisherPayload,
    ProviderResult,
}

impl ArtifactKind {
    /// Stem used when synthesizing an attachment filename from a job id.
    pub fn file_stem(&self) -> &'static str {
        match self {
            ArtifactKind::ProviderPayload => "provider-payload",
            ArtifactKind::PublisherPayload => "publisher-payload",
            ArtifactKind::ProviderResult => "provider-result",
        }
    }
}

/// A tracked job.
///
/// The provider/publisher payloads are not carried on the record itself; they
/// are stored as artifacts keyed by [`ArtifactKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    /// Human-readable name supplied at submission.
    pub name: String,
    /// Provider plugin identifier (a key into the plugin registry).
    pub provider: String,
    /// Publisher plugin identifier, when a delivery step was requested.
    pub publisher: Option<String>,
    /// Current lifecycle state. Only ever moves forward.
    pub state: JobState,
    /// Free-text status produced as the job progresses.
    pub message: String,
    pub created_at: DateTime<Utc>,
    /// Owning principal, when the submission carried one.
    pub owner: Option<PrincipalId>,
}

/// Stored byte content associated with a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobArtifact {
    pub job_id: JobId,
    pub kind: ArtifactKind,
    pub content: Vec<u8>,
    /// Declared filename used for attachment downloads. Result artifacts
    /// usually carry one; payload artifacts never do.
    pub filename: Option<String>,
}

/// Provider or publisher half of a submission.
///
/// Fields are optional so that missing input surfaces as a validation error
/// rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSpec {
    /// Plugin identifier, resolved through the plugin registry.
    pub id: Option<String>,
    /// Opaque plugin configuration; serialized to text when stored.
    pub payload: Option<serde_json::Value>,
}

impl PluginSpec {
    pub fn new(id: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            id: Some(id.into()),
            payload: Some(payload),
        }
    }
}

/// An unvalidated job submission, as decoded from the request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSubmission {
    pub name: Option<String>,
    pub provider: Option<PluginSpec>,
    pub publisher: Option<PluginSpec>,
}

impl JobSubmission {
    pub fn new(
        name: impl Into<String>,
        provider_id: impl Into<String>,
        provider_payload: serde_json::Value,
    ) -> Self {
        Self {
            name: Some(name.into()),
            provider: Some(PluginSpec::new(provider_id, provider_payload)),
            publisher: None,
        }
    }

    pub fn with_publisher(
        mut self,
        publisher_id: impl Into<String>,
        publisher_payload: serde_json::Value,
    ) -> Self {
        self.publisher = Some(PluginSpec::new(publisher_id, publisher_payload));
        self
    }
}

/// Validated creation parameters handed to the registry.
///
/// Invariants are established by [`crate::service::JobService`] before this is
/// built: name and provider fields are present and non-empty, and the
/// publisher pair is either fully present or fully absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJob {
    pub name: String,
    pub provider: String,
    pub provider_payload: String,
    pub publisher: Option<String>,
    pub publisher_payload: Option<String>,
    pub owner: Option<PrincipalId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_builder_fills_provider_pair() {
        let submission = JobSubmission::new("scan", "nmap", serde_json::json!({"t": "host"}));
        let provider = submission.provider.unwrap();
        assert_eq!(provider.id.as_deref(), Some("nmap"));
        assert!(provider.payload.is_some());
        assert!(submission.publisher.is_none());
    }

    #[test]
    fn artifact_kind_serializes_to_wire_form() {
        let json = serde_json::to_string(&ArtifactKind::ProviderPayload).unwrap();
        assert_eq!(json, "\"PROVIDER_PAYLOAD\"");
    }

    #[test]
    fn file_stems_are_distinct() {
        assert_eq!(ArtifactKind::ProviderPayload.file_stem(), "provider-payload");
        assert_eq!(ArtifactKind::PublisherPayload.file_stem(), "publisher-payload");
        assert_eq!(ArtifactKind::ProviderResult.file_stem(), "provider-result");
    }
}
