//! Error types for parsing and traversal.

use crate::accessor::Accessor;
use crate::path::Path;

/// Errors raised while parsing a path or resolving it against a value.
///
/// Every traversal variant carries a `context`: the sub-path, starting at the
/// root handed to the entry point, that ends with the step which failed. A
/// failure three levels down therefore reports all three steps, never only the
/// last one.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The expression does not match the path grammar.
    #[error("malformed path `{path}` at `{remainder}`: {message}")]
    MalformedPath {
        path: String,
        remainder: String,
        message: String,
    },

    /// A record (or field capability) has no member with this name.
    #[error("no field `{field}` in {type_name} at `{context}`")]
    NoSuchField {
        field: String,
        type_name: String,
        context: Path,
    },

    /// A mapping has no entry under this key.
    #[error("key `{key}` not found at `{context}`")]
    KeyNotFound { key: String, context: Path },

    /// The index is not below the current length.
    #[error("index {index} out of range for length {len} at `{context}`")]
    IndexOutOfRange {
        index: usize,
        len: usize,
        context: Path,
    },

    /// The new value's type does not fit the destination's declared type.
    #[error("cannot assign {found} to {expected} at `{context}`")]
    NotAssignable {
        expected: String,
        found: String,
        context: Path,
    },

    /// The destination exists but cannot be mutated.
    #[error("not addressable at `{context}`: {message}")]
    NotAddressable { message: String, context: Path },

    /// Neither a capability nor a native kind handles this kind of step.
    #[error("{accessor} access is not supported on {type_name} at `{context}`")]
    UnsupportedTarget {
        accessor: &'static str,
        type_name: String,
        context: Path,
    },

    /// A failure raised by a capability, a hook, or a method body.
    #[error("{message} at `{context}`")]
    Custom { message: String, context: Path },
}

/// Fieldless mirror of [`Error`] for matching on the failure class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedPath,
    NoSuchField,
    KeyNotFound,
    IndexOutOfRange,
    NotAssignable,
    NotAddressable,
    UnsupportedTarget,
    Custom,
}

impl Error {
    /// Create a custom error, typically from inside a capability implementation.
    ///
    /// The context is filled in by the engine.
    pub fn custom(message: impl Into<String>) -> Self {
        Error::Custom {
            message: message.into(),
            context: Path::empty(),
        }
    }

    pub(crate) fn malformed(path: &str, remainder: &str, message: &str) -> Self {
        Error::MalformedPath {
            path: path.to_string(),
            remainder: remainder.to_string(),
            message: message.to_string(),
        }
    }

    pub(crate) fn no_such_field(field: &str, type_name: impl Into<String>) -> Self {
        Error::NoSuchField {
            field: field.to_string(),
            type_name: type_name.into(),
            context: Path::empty(),
        }
    }

    pub(crate) fn key_not_found(key: &str) -> Self {
        Error::KeyNotFound {
            key: key.to_string(),
            context: Path::empty(),
        }
    }

    pub(crate) fn index_out_of_range(index: usize, len: usize) -> Self {
        Error::IndexOutOfRange {
            index,
            len,
            context: Path::empty(),
        }
    }

    pub(crate) fn not_assignable(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Error::NotAssignable {
            expected: expected.into(),
            found: found.into(),
            context: Path::empty(),
        }
    }

    pub(crate) fn not_addressable(message: impl Into<String>) -> Self {
        Error::NotAddressable {
            message: message.into(),
            context: Path::empty(),
        }
    }

    pub(crate) fn unsupported(accessor: &Accessor, type_name: impl Into<String>) -> Self {
        Error::UnsupportedTarget {
            accessor: accessor.kind(),
            type_name: type_name.into(),
            context: Path::empty(),
        }
    }

    /// The failure class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MalformedPath { .. } => ErrorKind::MalformedPath,
            Error::NoSuchField { .. } => ErrorKind::NoSuchField,
            Error::KeyNotFound { .. } => ErrorKind::KeyNotFound,
            Error::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            Error::NotAssignable { .. } => ErrorKind::NotAssignable,
            Error::NotAddressable { .. } => ErrorKind::NotAddressable,
            Error::UnsupportedTarget { .. } => ErrorKind::UnsupportedTarget,
            Error::Custom { .. } => ErrorKind::Custom,
        }
    }

    /// The sub-path at which a traversal failed.
    ///
    /// Returns `None` for parse errors, which happen before any traversal.
    pub fn context(&self) -> Option<&Path> {
        match self {
            Error::MalformedPath { .. } => None,
            Error::NoSuchField { context, .. }
            | Error::KeyNotFound { context, .. }
            | Error::IndexOutOfRange { context, .. }
            | Error::NotAssignable { context, .. }
            | Error::NotAddressable { context, .. }
            | Error::UnsupportedTarget { context, .. }
            | Error::Custom { context, .. } => Some(context),
        }
    }

    fn context_mut(&mut self) -> Option<&mut Path> {
        match self {
            Error::MalformedPath { .. } => None,
            Error::NoSuchField { context, .. }
            | Error::KeyNotFound { context, .. }
            | Error::IndexOutOfRange { context, .. }
            | Error::NotAssignable { context, .. }
            | Error::NotAddressable { context, .. }
            | Error::UnsupportedTarget { context, .. }
            | Error::Custom { context, .. } => Some(context),
        }
    }

    /// Prepend the steps that led to the place where this error was raised.
    #[must_use]
    pub fn within(mut self, prefix: &[Accessor]) -> Self {
        if let Some(context) = self.context_mut() {
            *context = Path::from(prefix.to_vec()).join(context);
        }
        self
    }

    /// Replace the context with the steps up to and including `step`.
    ///
    /// Used for errors coming out of per-step capabilities and method bodies,
    /// whose own notion of position is not meaningful to the caller.
    #[must_use]
    pub(crate) fn anchored(mut self, steps: &[Accessor]) -> Self {
        if let Some(context) = self.context_mut() {
            *context = Path::from(steps.to_vec());
        }
        self
    }

    /// True for failures that mean "nothing is stored there yet".
    pub(crate) fn is_absent(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::NoSuchField | ErrorKind::KeyNotFound | ErrorKind::IndexOutOfRange
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use std::error::Error as StdError;

    #[test]
    fn within_prepends_steps() {
        let e = Error::index_out_of_range(5, 2).within(&[Accessor::index(5)]);
        let e = e.within(path!("a.b").accessors());
        assert_eq!(e.context().unwrap().to_string(), "a.b[5]");
        assert_eq!(e.kind(), ErrorKind::IndexOutOfRange);
    }

    #[test]
    fn anchored_replaces_context() {
        let e = Error::key_not_found("x").within(path!("deep.inside").accessors());
        let e = e.anchored(path!("outer").accessors());
        assert_eq!(e.context().unwrap().to_string(), "outer");
    }

    #[test]
    fn malformed_has_no_context() {
        let e = Error::malformed("a.", "", "unexpected trailing dot");
        assert!(e.context().is_none());
        assert_eq!(e.clone().within(path!("x").accessors()), e);
    }

    #[test]
    fn display_mentions_context() {
        let e = Error::key_not_found("k").within(&[Accessor::field("k")]);
        let display = format!("{}", e);
        assert!(display.contains("key `k` not found"));
        assert!(display.contains("`k`"));

        let e = Error::not_assignable("int", "string").within(path!("rec.count").accessors());
        let display = format!("{}", e);
        assert!(display.contains("cannot assign string to int"));
        assert!(display.contains("rec.count"));
    }

    #[test]
    fn custom_errors_have_no_source() {
        let e = Error::custom("boom");
        assert_eq!(e.kind(), ErrorKind::Custom);
        assert!(StdError::source(&e).is_none());
    }

    #[test]
    fn absent_failures() {
        assert!(Error::key_not_found("k").is_absent());
        assert!(Error::index_out_of_range(1, 0).is_absent());
        assert!(!Error::custom("x").is_absent());
    }
}
