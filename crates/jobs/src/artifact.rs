//! Artifact read rendering: inline text vs. downloadable attachment.

use conveyor_core::DomainError;

use crate::types::{ArtifactKind, JobArtifact};

/// Response mode for artifact reads, selected by an integer modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactView {
    /// Raw content suitable for direct viewing; no filename metadata.
    Inline,
    /// Opaque binary stream tagged as a downloadable attachment, with a
    /// filename.
    Attachment,
}

impl ArtifactView {
    /// Parse the wire modifier: `0` = inline, `1` = attachment. Anything else
    /// is a validation failure, distinct from not-found.
    pub fn from_modifier(modifier: i32) -> Result<Self, DomainError> {
        match modifier {
            0 => Ok(ArtifactView::Inline),
            1 => Ok(ArtifactView::Attachment),
            other => Err(DomainError::validation(format!(
                "unrecognized view modifier: {other}"
            ))),
        }
    }
}

/// Rendered artifact content, ready for the transport layer to serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactContent {
    pub content: Vec<u8>,
    /// Present only in attachment mode.
    pub filename: Option<String>,
}

/// Attachment filename for an artifact.
///
/// Payload artifacts synthesize their name from the job id and kind; the
/// result artifact uses its stored filename when one exists.
fn attachment_filename(artifact: &JobArtifact) -> String {
    let synthesized = || format!("{}-{}", artifact.job_id, artifact.kind.file_stem());
    match artifact.kind {
        ArtifactKind::ProviderResult => artifact.filename.clone().unwrap_or_else(synthesized),
        _ => synthesized(),
    }
}

/// Render an artifact in the requested view mode.
pub fn render(artifact: &JobArtifact, view: ArtifactView) -> ArtifactContent {
    match view {
        ArtifactView::Inline => ArtifactContent {
            content: artifact.content.clone(),
            filename: None,
        },
        ArtifactView::Attachment => ArtifactContent {
            filename: Some(attachment_filename(artifact)),
            content: artifact.content.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use conveyor_core::JobId;

    use super::*;

    fn artifact(kind: ArtifactKind, filename: Option<&str>) -> JobArtifact {
        JobArtifact {
            job_id: JobId::new(),
            kind,
            content: vec![0x00, 0xff, 0x42],
            filename: filename.map(str::to_string),
        }
    }

    #[test]
    fn modifier_parsing() {
        assert_eq!(ArtifactView::from_modifier(0).unwrap(), ArtifactView::Inline);
        assert_eq!(ArtifactView::from_modifier(1).unwrap(), ArtifactView::Attachment);
        for bad in [-1, 2, 42] {
            let err = ArtifactView::from_modifier(bad).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
    }

    #[test]
    fn inline_returns_bytes_without_filename() {
        let artifact = artifact(ArtifactKind::ProviderPayload, None);
        let rendered = render(&artifact, ArtifactView::Inline);
        assert_eq!(rendered.content, artifact.content);
        assert!(rendered.filename.is_none());
    }

    #[test]
    fn payload_attachment_synthesizes_filename_from_job_id() {
        let artifact = artifact(ArtifactKind::ProviderPayload, None);
        let rendered = render(&artifact, ArtifactView::Attachment);
        assert_eq!(rendered.content, artifact.content);
        assert_eq!(
            rendered.filename.unwrap(),
            format!("{}-provider-payload", artifact.job_id)
        );
    }

    #[test]
    fn publisher_attachment_uses_its_own_stem() {
        let artifact = artifact(ArtifactKind::PublisherPayload, None);
        let rendered = render(&artifact, ArtifactView::Attachment);
        assert_eq!(
            rendered.filename.unwrap(),
            format!("{}-publisher-payload", artifact.job_id)
        );
    }

    #[test]
    fn result_attachment_prefers_stored_filename() {
        let artifact = artifact(ArtifactKind::ProviderResult, Some("report.xml"));
        let rendered = render(&artifact, ArtifactView::Attachment);
        assert_eq!(rendered.filename.as_deref(), Some("report.xml"));
    }

    #[test]
    fn result_attachment_without_stored_filename_falls_back() {
        let artifact = artifact(ArtifactKind::ProviderResult, None);
        let rendered = render(&artifact, ArtifactView::Attachment);
        assert_eq!(
            rendered.filename.unwrap(),
            format!("{}-provider-result", artifact.job_id)
        );
    }
}
