// ⚠️ Pipeline Errors - what can escape the load boundary
//
// Row and field problems never show up here: they are FieldWarnings.
// A SourceError is recovered per kind into an empty collection; only
// LoadError reaches the caller.

use crate::dataset::RecordKind;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain raw text for one record kind
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{origin} did not return text: {reason}")]
    NotText { origin: String, reason: String },

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// In-memory or test sources with nothing configured for a kind
    #[error("no source configured for {0}")]
    Unavailable(RecordKind),
}

/// One failed fetch, kept for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    pub kind: RecordKind,
    pub message: String,
}

/// The only failure the load pipeline surfaces
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("all {} sources failed", failures.len())]
    AllSourcesFailed { failures: Vec<SourceFailure> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_messages() {
        let status = SourceError::Status {
            url: "https://example.com/clientes".to_string(),
            status: 404,
        };
        assert_eq!(status.to_string(), "https://example.com/clientes answered HTTP 404");

        let missing = SourceError::Unavailable(RecordKind::Account);
        assert_eq!(missing.to_string(), "no source configured for accounts");
    }

    #[test]
    fn test_load_error_counts_failures() {
        let failures = RecordKind::ALL
            .iter()
            .map(|kind| SourceFailure {
                kind: *kind,
                message: SourceError::Unavailable(*kind).to_string(),
            })
            .collect();
        let error = LoadError::AllSourcesFailed { failures };

        assert_eq!(error.to_string(), "all 3 sources failed");
    }
}
