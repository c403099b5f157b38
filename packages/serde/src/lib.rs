//! Serde integration for propath.
//!
//! This layer connects the dynamic [`Value`] model to serde. It adds:
//! - `from_json` / `to_json`: conversion to and from `serde_json::Value`
//! - `to_value` / `from_value`: any `Serialize` / `DeserializeOwned` type
//! - `parse_json`: decode a JSON document straight into a `Value`
//! - `TypedPath`: read into and write from Rust types through a path
//!
//! # Example
//!
//! ```rust
//! use propath_serde::{parse_json, read_as};
//!
//! let doc = parse_json(r#"{"glossary": {"title": "example glossary"}}"#).unwrap();
//! let title: String = read_as("glossary.title", &doc).unwrap();
//! assert_eq!(title, "example glossary");
//! ```

mod convert;
mod typed;

pub use convert::{from_json, from_value, parse_json, to_json, to_value};
pub use typed::{read_as, write_from, TypedPath};

// Re-export core types for convenience
pub use propath_core::{Error, Path, Value};
