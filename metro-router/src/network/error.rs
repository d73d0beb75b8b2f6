//! Network document errors.

use std::path::PathBuf;

use crate::domain::GraphError;

/// Error loading a network document.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// The document could not be read
    #[error("failed to read network document {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or has mistyped fields
    #[error("failed to parse network document: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document describes a structurally invalid graph
    #[error("invalid network: {0}")]
    Graph(#[from] GraphError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StationId;

    #[test]
    fn error_display() {
        let err = NetworkError::Graph(GraphError::DuplicateStation(StationId(3)));
        assert_eq!(err.to_string(), "invalid network: duplicate station id 3");

        let err = NetworkError::Io {
            path: PathBuf::from("/data/tube.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(
            err.to_string(),
            "failed to read network document /data/tube.json: gone"
        );
    }
}
