//! A single navigation step: a field name or a list index.

use std::fmt;

use crate::case::fold;

/// One step of a [`Path`](crate::Path).
///
/// Accessors are immutable once built and hold no reference to the data they
/// are applied to, so a parsed path can be reused against any number of values.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Accessor {
    /// Access by name: a map key, a record member, or a named capability lookup.
    Field(String),
    /// Access by position in an ordered list.
    Index(usize),
}

impl Accessor {
    /// Create a field accessor.
    pub fn field(name: impl Into<String>) -> Self {
        Accessor::Field(name.into())
    }

    /// Create an index accessor.
    pub fn index(index: usize) -> Self {
        Accessor::Index(index)
    }

    /// Check if this is a field accessor.
    pub fn is_field(&self) -> bool {
        matches!(self, Accessor::Field(_))
    }

    /// Check if this is an index accessor.
    pub fn is_index(&self) -> bool {
        matches!(self, Accessor::Index(_))
    }

    /// The field name, if this is a field accessor.
    pub fn as_field(&self) -> Option<&str> {
        match self {
            Accessor::Field(name) => Some(name),
            Accessor::Index(_) => None,
        }
    }

    /// The index, if this is an index accessor.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Accessor::Field(_) => None,
            Accessor::Index(index) => Some(*index),
        }
    }

    /// The member name a record lookup uses for this field (`last_name` -> `LastName`).
    ///
    /// Returns `None` for index accessors.
    pub fn folded(&self) -> Option<String> {
        self.as_field().map(fold)
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Accessor::Field(_) => "field",
            Accessor::Index(_) => "index",
        }
    }
}

/// Renders the accessor on its own: `name` or `[n]`.
///
/// The leading `.` of a non-initial field belongs to the path rendering, not here.
impl fmt::Display for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Field(name) => f.write_str(name),
            Accessor::Index(index) => write!(f, "[{}]", index),
        }
    }
}

impl From<&str> for Accessor {
    fn from(name: &str) -> Self {
        Accessor::Field(name.to_string())
    }
}

impl From<String> for Accessor {
    fn from(name: String) -> Self {
        Accessor::Field(name)
    }
}

impl From<usize> for Accessor {
    fn from(index: usize) -> Self {
        Accessor::Index(index)
    }
}
