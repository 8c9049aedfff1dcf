//! Artifact selection.
//!
//! Picks the one artifact to install out of a registry listing: exact name
//! match, not expired, newest `created_at` wins. Ties keep the candidate that
//! appeared first.

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

use crate::registry::Artifact;

/// Errors that can occur while choosing an artifact.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No non-expired artifact carries the requested name.
    #[error("Can't find artifact with name {name} or all artifacts expired")]
    NotFound { name: String },

    /// A candidate's creation timestamp is not RFC 3339.
    #[error("Artifact {id} has malformed created_at {value:?}: {reason}")]
    MalformedTimestamp {
        id: u64,
        value: String,
        reason: String,
    },
}

/// Selects the newest non-expired artifact named exactly `name`.
///
/// Single pass over the candidates: the running latest is only replaced by a
/// candidate whose timestamp is strictly after it. Every candidate's
/// timestamp must parse, otherwise the whole resolution fails.
pub fn resolve_artifact<'a>(
    artifacts: &'a [Artifact],
    name: &str,
) -> Result<&'a Artifact, ResolveError> {
    let mut latest: Option<(&'a Artifact, DateTime<FixedOffset>)> = None;

    for candidate in artifacts.iter().filter(|a| a.name == name && !a.expired) {
        let created_at = parse_created_at(candidate)?;
        match latest {
            Some((_, current)) if created_at <= current => {}
            _ => latest = Some((candidate, created_at)),
        }
    }

    latest
        .map(|(artifact, _)| artifact)
        .ok_or_else(|| ResolveError::NotFound {
            name: name.to_string(),
        })
}

fn parse_created_at(artifact: &Artifact) -> Result<DateTime<FixedOffset>, ResolveError> {
    DateTime::parse_from_rfc3339(&artifact.created_at).map_err(|e| {
        ResolveError::MalformedTimestamp {
            id: artifact.id,
            value: artifact.created_at.clone(),
            reason: e.to_string(),
        }
    })
}
