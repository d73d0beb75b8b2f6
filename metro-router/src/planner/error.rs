//! Planner error types.

use crate::domain::{GraphError, StationId};

/// Error from a route or patrol query.
///
/// Every variant is a recoverable, typed result: the planner never
/// substitutes a partial answer for a failed query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// The query references a station absent from the graph
    #[error("unknown station {0}")]
    UnknownStation(StationId),

    /// No path joins the two stations
    #[error("station {to} is unreachable from station {from}")]
    Unreachable { from: StationId, to: StationId },

    /// A patrol was requested with no required stations
    #[error("patrol requires at least one station to visit")]
    EmptyRequiredSet,

    /// A patrol was requested with more stations than the configured cap
    #[error("patrol requested {requested} stations, maximum is {max}")]
    TooManyRequiredStations { requested: usize, max: usize },

    /// The caller cancelled the patrol search
    #[error("patrol search cancelled")]
    Cancelled,

    /// The patrol search ran past its deadline
    #[error("patrol search exceeded its deadline")]
    DeadlineExceeded,

    /// A graph error other than a failed lookup
    #[error("invalid graph: {0}")]
    Graph(GraphError),
}

impl From<GraphError> for PlanError {
    fn from(e: GraphError) -> Self {
        match e {
            GraphError::UnknownStation(id) => PlanError::UnknownStation(id),
            other => PlanError::Graph(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PlanError::UnknownStation(StationId(12));
        assert_eq!(err.to_string(), "unknown station 12");

        let err = PlanError::Unreachable {
            from: StationId(1),
            to: StationId(5),
        };
        assert_eq!(err.to_string(), "station 5 is unreachable from station 1");

        let err = PlanError::EmptyRequiredSet;
        assert_eq!(
            err.to_string(),
            "patrol requires at least one station to visit"
        );

        let err = PlanError::TooManyRequiredStations {
            requested: 12,
            max: 8,
        };
        assert_eq!(err.to_string(), "patrol requested 12 stations, maximum is 8");
    }

    #[test]
    fn lookup_failures_become_unknown_station() {
        let err = PlanError::from(GraphError::UnknownStation(StationId(4)));
        assert_eq!(err, PlanError::UnknownStation(StationId(4)));

        let err = PlanError::from(GraphError::DuplicateStation(StationId(4)));
        assert_eq!(err, PlanError::Graph(GraphError::DuplicateStation(StationId(4))));
        assert_eq!(err.to_string(), "invalid graph: duplicate station id 4");
    }
}
