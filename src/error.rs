use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading an index document or running a query.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The index document does not exist at the expected location
    #[error("routing.json not found at {}", path.display())]
    MissingDocument { path: PathBuf },

    /// No positive tag group was supplied
    #[error("At least one positive tag group is required")]
    NoPositiveGroups,

    /// Every positive tag normalized to nothing
    #[error("At least one valid tag is required")]
    NoValidTags,

    /// Reading or writing the index document failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The index document is not valid JSON
    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serializing a document or report failed
    #[error("Serialization error: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl SearchError {
    /// Returns true for errors caused by the operator's input rather than
    /// by the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::MissingDocument { .. } | Self::NoPositiveGroups | Self::NoValidTags
        )
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_document_message_includes_path() {
        let err = SearchError::MissingDocument {
            path: PathBuf::from("ctx/routing.json"),
        };
        assert_eq!(err.to_string(), "routing.json not found at ctx/routing.json");
        assert!(err.is_user_error());
    }

    #[test]
    fn empty_query_errors_are_user_errors() {
        assert!(SearchError::NoPositiveGroups.is_user_error());
        assert!(SearchError::NoValidTags.is_user_error());
    }

    #[test]
    fn io_errors_are_internal() {
        let err = SearchError::Io {
            path: PathBuf::from("x"),
            source: std::io::Error::other("disk full"),
        };
        assert!(!err.is_user_error());
        assert!(err.to_string().contains("disk full"));
    }
}
