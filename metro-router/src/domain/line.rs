//! Line identifiers and the descriptive line catalogue.

use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a transit line.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineId(pub u32);

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineId({})", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for LineId {
    fn from(id: u32) -> Self {
        LineId(id)
    }
}

/// Display metadata for a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMeta {
    pub name: String,
    /// Display colour, typically a hex string such as `"AE6017"`.
    pub colour: String,
}

impl LineMeta {
    pub fn new(name: impl Into<String>, colour: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            colour: colour.into(),
        }
    }
}

/// Line id → display metadata.
///
/// Purely descriptive: consulted when summarising routes, never when
/// computing costs. Lines that appear on connections but not in the
/// catalogue are allowed.
#[derive(Debug, Clone, Default)]
pub struct LineCatalog {
    lines: BTreeMap<LineId, LineMeta>,
}

impl LineCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a line's metadata.
    pub fn insert(&mut self, id: LineId, meta: LineMeta) {
        self.lines.insert(id, meta);
    }

    pub fn get(&self, id: LineId) -> Option<&LineMeta> {
        self.lines.get(&id)
    }

    /// Returns the line's display name, if catalogued.
    pub fn name(&self, id: LineId) -> Option<&str> {
        self.lines.get(&id).map(|m| m.name.as_str())
    }

    /// Iterates lines in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (LineId, &LineMeta)> {
        self.lines.iter().map(|(id, meta)| (*id, meta))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl FromIterator<(LineId, LineMeta)> for LineCatalog {
    fn from_iter<I: IntoIterator<Item = (LineId, LineMeta)>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}
