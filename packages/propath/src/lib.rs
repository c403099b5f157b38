//! Propath: read and write loosely-typed data through paths such as `a.b[2].c`.
//!
//! Paths navigate maps, lists, declared records and host objects alike. Writes
//! build missing intermediate containers on the way down, so
//! `write("a.b.c", &mut v, x)` works against an empty value.
//!
//! - [`propath_core`] holds the path parser, the value model and the engine.
//! - [`propath_serde`] converts between values, JSON and Rust types.
//!
//! ```rust
//! use propath::{must_read, parse_json, write};
//!
//! let mut doc = parse_json(r#"{"hello": {"world": "!"}}"#).unwrap();
//! assert_eq!(must_read("hello.world", &doc).as_str(), Some("!"));
//!
//! write("hello.list[1]", &mut doc, 2i64).unwrap();
//! assert_eq!(must_read("hello.list", &doc).as_array().map(Vec::len), Some(2));
//! ```

pub use propath_core::*;
pub use propath_serde::{
    from_json, from_value, parse_json, read_as, to_json, to_value, write_from, TypedPath,
};
