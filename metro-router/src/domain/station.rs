//! Station types.

use std::collections::BTreeMap;
use std::fmt;

/// Open set of extension attributes carried by stations and connections.
///
/// Known fields (ids, positions, lines, weights) are typed fields on the
/// owning struct; anything else a network document supplies lands here.
pub type Attributes = BTreeMap<String, String>;

/// Caller-assigned station identifier.
///
/// Ids are opaque: they need not be dense or start at zero. The graph maps
/// them onto dense indices internally.
///
/// # Examples
///
/// ```
/// use metro_router::domain::StationId;
///
/// let id = StationId(42);
/// assert_eq!(id.to_string(), "42");
/// assert_eq!(format!("{:?}", id), "StationId(42)");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StationId(pub u32);

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for StationId {
    fn from(id: u32) -> Self {
        StationId(id)
    }
}

/// Display/geographic position of a station.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Creates a new position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A station (graph vertex).
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: StationId,
    pub position: Position,
    /// Extension attributes such as `name` or `zone`.
    pub attributes: Attributes,
}

impl Station {
    /// Creates a station with no extension attributes.
    pub fn new(id: u32, x: f64, y: f64) -> Self {
        Self {
            id: StationId(id),
            position: Position::new(x, y),
            attributes: Attributes::new(),
        }
    }

    /// Adds an extension attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Returns the `name` attribute, if present.
    pub fn name(&self) -> Option<&str> {
        self.attributes.get("name").map(String::as_str)
    }
}
