//! Types for the registry module.

use serde::{Deserialize, Serialize};

/// A single build artifact as listed by the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Artifact {
    /// Registry-assigned identifier.
    pub id: u64,
    /// Artifact name. Not unique across time.
    pub name: String,
    /// Canonical API reference.
    pub url: String,
    /// Reference that redirects to the archive download.
    pub archive_download_url: String,
    /// Whether the registry has expired this artifact.
    pub expired: bool,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
}

/// An artifact list response.
///
/// `total_count` is informational: `artifacts` may be a single page of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactList {
    pub total_count: u64,
    pub artifacts: Vec<Artifact>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_artifact_list() {
        let json = r#"{
            "total_count": 2,
            "artifacts": [
                {
                    "id": 11,
                    "node_id": "MDg6QXJ0aWZhY3QxMQ==",
                    "name": "app",
                    "size_in_bytes": 556,
                    "url": "https://api.github.com/repos/o/r/actions/artifacts/11",
                    "archive_download_url": "https://api.github.com/repos/o/r/actions/artifacts/11/zip",
                    "expired": false,
                    "created_at": "2024-01-01T00:00:00Z"
                },
                {
                    "id": 12,
                    "name": "app",
                    "url": "https://api.github.com/repos/o/r/actions/artifacts/12",
                    "archive_download_url": "https://api.github.com/repos/o/r/actions/artifacts/12/zip",
                    "expired": true,
                    "created_at": "2024-02-01T00:00:00Z"
                }
            ]
        }"#;

        let list: ArtifactList = serde_json::from_str(json).unwrap();
        assert_eq!(list.total_count, 2);
        assert_eq!(list.artifacts.len(), 2);
        assert_eq!(list.artifacts[0].id, 11);
        assert!(!list.artifacts[0].expired);
        assert!(list.artifacts[1].expired);
        assert!(list.artifacts[1].archive_download_url.ends_with("/12/zip"));
    }

    #[test]
    fn test_deserialize_missing_fields_use_defaults() {
        let list: ArtifactList =
            serde_json::from_str(r#"{"artifacts": [{"name": "app"}]}"#).unwrap();
        assert_eq!(list.total_count, 0);
        assert_eq!(list.artifacts[0].name, "app");
        assert!(list.artifacts[0].created_at.is_empty());
    }
}
