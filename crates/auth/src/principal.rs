use serde::{Deserialize, Serialize};

use conveyor_core::PrincipalId;

/// Identity of the caller that initiated a request (an API key, a human user,
/// a service account).
///
/// The core never makes authorization decisions with this; it is forwarded
/// unmodified to the registry, which applies ownership/visibility filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    id: PrincipalId,
    /// Display name for logs and audit trails (e.g. the API key label).
    name: String,
}

impl Principal {
    pub fn new(id: PrincipalId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> PrincipalId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn principals_with_the_same_id_compare_equal() {
        let id = PrincipalId::new();
        assert_eq!(Principal::new(id, "key-a"), Principal::new(id, "key-a"));
        assert_ne!(
            Principal::new(PrincipalId::new(), "key-a"),
            Principal::new(PrincipalId::new(), "key-a")
        );
    }
}
