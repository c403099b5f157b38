//! Path type and the dot/bracket expression parser.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use crate::accessor::Accessor;
use crate::error::Error;

lazy_static! {
    // One segment: optional field name, optional bracketed index, optional trailing dot.
    static ref SEGMENT: Regex =
        Regex::new(r"(?i)^(?P<field>(?-u:\w)+)?(?P<index>\[[0-9]+\])?(?P<dot>\.)?").unwrap();
}

/// An ordered sequence of [`Accessor`]s describing a route through a value.
///
/// The empty path is legal and denotes the value itself.
///
/// # Path Syntax
///
/// - A field is a run of ASCII letters, digits and underscores: `title`, `gloss_div`
/// - An index is a bracketed non-negative integer: `[2]`
/// - A field that is not the first step must be introduced by a `.`
/// - Indexes may follow each other directly: `matrix[0][1]`
///
/// ```rust
/// use propath_core::{Accessor, Path};
///
/// let path = Path::parse("glossary.gloss_div[1].abbrev").unwrap();
/// assert_eq!(path.len(), 4);
/// assert_eq!(path[2], Accessor::Index(1));
/// assert_eq!(path.to_string(), "glossary.gloss_div[1].abbrev");
/// ```
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Path {
    accessors: Vec<Accessor>,
}

impl Path {
    /// The empty path.
    pub fn empty() -> Self {
        Path {
            accessors: Vec::new(),
        }
    }

    /// Parse a path expression.
    ///
    /// Surrounding whitespace is ignored. An empty expression, a leading or
    /// dangling dot, a field directly after an index, and a non-numeric index
    /// are all rejected with [`Error::MalformedPath`].
    pub fn parse(expression: &str) -> Result<Self, Error> {
        let trimmed = expression.trim();
        if trimmed.is_empty() {
            return Err(Error::malformed(expression, trimmed, "empty path"));
        }

        let mut accessors = Vec::new();
        let mut rest = trimmed;
        // Only a leading bracket may stand in for the first field.
        let mut field_expected = !rest.starts_with('[');

        while !rest.is_empty() {
            let captures = SEGMENT
                .captures(rest)
                .ok_or_else(|| Error::malformed(expression, rest, "unexpected input"))?;

            let field = captures.name("field").map(|m| m.as_str());
            let index = captures.name("index").map(|m| m.as_str());
            let dot = captures.name("dot").is_some();
            let consumed = captures.get(0).map_or(0, |m| m.end());

            if field.is_none() && field_expected {
                return Err(Error::malformed(expression, rest, "field expected"));
            }
            if field.is_some() && !field_expected {
                return Err(Error::malformed(expression, rest, "field not expected"));
            }
            if field.is_none() && index.is_none() {
                return Err(Error::malformed(expression, rest, "field or index expected"));
            }

            if let Some(name) = field {
                accessors.push(Accessor::Field(name.to_string()));
            }
            if let Some(bracketed) = index {
                let digits = &bracketed[1..bracketed.len() - 1];
                let index = digits
                    .parse::<usize>()
                    .map_err(|_| Error::malformed(expression, rest, "numeric index expected"))?;
                accessors.push(Accessor::Index(index));
            }

            rest = &rest[consumed..];
            field_expected = false;

            if dot {
                if rest.is_empty() {
                    return Err(Error::malformed(expression, rest, "unexpected trailing dot"));
                }
                field_expected = true;
            }
        }

        Ok(Path { accessors })
    }

    /// Check if this path is empty (the value itself).
    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }

    /// Get the number of accessors.
    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    /// Iterate over accessors.
    pub fn iter(&self) -> std::slice::Iter<'_, Accessor> {
        self.accessors.iter()
    }

    /// The accessors as a slice.
    pub fn accessors(&self) -> &[Accessor] {
        &self.accessors
    }

    /// The first step, if any.
    pub fn first(&self) -> Option<&Accessor> {
        self.accessors.first()
    }

    /// Join this path with another.
    #[must_use]
    pub fn join(&self, other: &Path) -> Path {
        let mut accessors = self.accessors.clone();
        accessors.extend(other.accessors.iter().cloned());
        Path { accessors }
    }

    /// This path extended by one step.
    #[must_use]
    pub fn child(&self, accessor: impl Into<Accessor>) -> Path {
        let mut accessors = self.accessors.clone();
        accessors.push(accessor.into());
        Path { accessors }
    }

    /// Get a slice of accessors as a new path.
    pub fn slice(&self, start: usize, end: usize) -> Path {
        Path {
            accessors: self.accessors[start..end].to_vec(),
        }
    }
}

/// Canonical rendering: `field[0].field2[1]`.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, accessor) in self.accessors.iter().enumerate() {
            if accessor.is_field() && i != 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", accessor)?;
        }
        Ok(())
    }
}

impl std::ops::Index<usize> for Path {
    type Output = Accessor;

    fn index(&self, i: usize) -> &Self::Output {
        &self.accessors[i]
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Accessor;
    type IntoIter = std::slice::Iter<'a, Accessor>;

    fn into_iter(self) -> Self::IntoIter {
        self.accessors.iter()
    }
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl From<Vec<Accessor>> for Path {
    fn from(accessors: Vec<Accessor>) -> Self {
        Path { accessors }
    }
}

impl From<Accessor> for Path {
    fn from(accessor: Accessor) -> Self {
        Path {
            accessors: vec![accessor],
        }
    }
}

/// A single integer is a one-step index path.
impl From<usize> for Path {
    fn from(index: usize) -> Self {
        Path {
            accessors: vec![Accessor::Index(index)],
        }
    }
}

impl FromIterator<Accessor> for Path {
    fn from_iter<I: IntoIterator<Item = Accessor>>(iter: I) -> Self {
        Path {
            accessors: iter.into_iter().collect(),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Path {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Path {
    fn deserialize<D>(deserializer: D) -> Result<Path, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;

        let s: String = serde::Deserialize::deserialize(deserializer)?;
        if s.is_empty() {
            return Ok(Path::empty());
        }
        Path::parse(&s).map_err(D::Error::custom)
    }
}

/// Anything that can name a path: an expression, an index, or accessors.
///
/// Every entry point takes `impl IntoPath`, so callers holding a structured
/// key never have to render it to text first.
pub trait IntoPath {
    fn into_path(self) -> Result<Path, Error>;
}

impl IntoPath for Path {
    fn into_path(self) -> Result<Path, Error> {
        Ok(self)
    }
}

impl IntoPath for &Path {
    fn into_path(self) -> Result<Path, Error> {
        Ok(self.clone())
    }
}

impl IntoPath for &str {
    fn into_path(self) -> Result<Path, Error> {
        Path::parse(self)
    }
}

impl IntoPath for String {
    fn into_path(self) -> Result<Path, Error> {
        Path::parse(&self)
    }
}

impl IntoPath for &String {
    fn into_path(self) -> Result<Path, Error> {
        Path::parse(self)
    }
}

impl IntoPath for usize {
    fn into_path(self) -> Result<Path, Error> {
        Ok(Path::from(self))
    }
}

impl IntoPath for Accessor {
    fn into_path(self) -> Result<Path, Error> {
        Ok(Path::from(self))
    }
}

impl IntoPath for Vec<Accessor> {
    fn into_path(self) -> Result<Path, Error> {
        Ok(Path::from(self))
    }
}

impl IntoPath for &[Accessor] {
    fn into_path(self) -> Result<Path, Error> {
        Ok(Path::from(self.to_vec()))
    }
}

/// Macro for creating paths from literals.
///
/// # Example
///
/// ```rust
/// use propath_core::path;
///
/// let p = path!("users[3].name");
/// assert_eq!(p.len(), 3);
/// ```
#[macro_export]
macro_rules! path {
    ($s:expr) => {
        $crate::Path::parse($s).expect("invalid path literal")
    };
}
