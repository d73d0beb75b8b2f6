//! Graph construction and lookup errors.
//!
//! These errors represent structural problems with the network itself or
//! references to stations it does not contain. They are distinct from the
//! search errors in the planner.

use super::StationId;

/// Errors raised while building or querying a [`Graph`](super::Graph).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A connection is structurally invalid (unknown endpoint or self-loop).
    #[error("invalid connection #{index} ({node1} - {node2}): {reason}")]
    InvalidConnection {
        index: usize,
        node1: StationId,
        node2: StationId,
        reason: &'static str,
    },

    /// Two stations share the same id.
    #[error("duplicate station id {0}")]
    DuplicateStation(StationId),

    /// The station id is not part of the graph.
    #[error("unknown station {0}")]
    UnknownStation(StationId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = GraphError::InvalidConnection {
            index: 3,
            node1: StationId(1),
            node2: StationId(1),
            reason: "self-loop",
        };
        assert_eq!(err.to_string(), "invalid connection #3 (1 - 1): self-loop");

        let err = GraphError::DuplicateStation(StationId(4));
        assert_eq!(err.to_string(), "duplicate station id 4");

        let err = GraphError::UnknownStation(StationId(99));
        assert_eq!(err.to_string(), "unknown station 99");
    }
}
