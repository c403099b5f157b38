//! Propath core: dynamic dot/bracket access into loosely-typed values.
//!
//! This crate provides:
//! - `Path`: a parsed `a.b[2].c` expression, a sequence of [`Accessor`]s
//! - `Value`: the data a path is resolved against (maps, lists, records,
//!   pointer cells, and host objects)
//! - `RecordType`: declared records with member tables and getter/setter methods
//! - Capability traits a host type implements to take over traversal
//! - `read`, `write` and `must_read`: the traversal engine
//!
//! Writes create missing intermediate maps and lists, grow lists to reach
//! the index being written, and fill empty pointers with fresh cells.
//! Failures carry the sub-path at which they happened.
//!
//! # Example
//!
//! ```rust
//! use propath_core::{read, write, Value};
//!
//! let mut doc = Value::Null;
//! write("glossary.title", &mut doc, "example glossary").unwrap();
//! write("glossary.entries[1].abbrev", &mut doc, "ISO 8879:1986").unwrap();
//!
//! assert_eq!(
//!     read("glossary.entries[1].abbrev", &doc).unwrap().as_str(),
//!     Some("ISO 8879:1986")
//! );
//! assert!(read("glossary.entries[2]", &doc).is_err());
//! ```

mod accessor;
mod capability;
mod case;
mod error;
mod indirect;
mod path;
mod read;
mod record;
mod types;
mod value;
mod write;

pub use accessor::Accessor;
pub use capability::{
    FieldReader, FieldWriter, IndexReader, IndexWriter, Object, ObjectBase, PathReader,
    PathWriter,
};
pub use case::fold;
pub use error::{Error, ErrorKind};
pub use path::{IntoPath, Path};
pub use read::{must_read, must_read_or, read};
pub use record::{FieldDecl, Method, MethodBody, Record, RecordType, RecordTypeBuilder};
pub use types::ValueType;
pub use value::Value;
pub use write::write;
