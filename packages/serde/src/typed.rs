//! Typed read and write extension traits.

use serde::de::DeserializeOwned;
use serde::Serialize;

use propath_core::{Error, IntoPath, Path, Value};

use crate::convert::{from_value, to_value};

/// Extension trait for typed reads and writes through a [`Path`].
///
/// # Example
///
/// ```rust
/// use propath_core::{path, Value};
/// use propath_serde::TypedPath;
///
/// let mut doc = Value::Null;
/// path!("server.ports").write_from(&mut doc, &vec![80u16, 443]).unwrap();
///
/// let ports: Vec<u16> = path!("server.ports").read_as(&doc).unwrap();
/// assert_eq!(ports, vec![80, 443]);
/// ```
pub trait TypedPath {
    /// Read the value at this path and deserialize it into a Rust type.
    ///
    /// Decode failures are reported at the path that was read.
    fn read_as<T: DeserializeOwned>(&self, value: &Value) -> Result<T, Error>;

    /// Serialize a Rust type and write it at this path.
    fn write_from<T: Serialize>(&self, target: &mut Value, data: &T) -> Result<(), Error>;
}

impl TypedPath for Path {
    fn read_as<T: DeserializeOwned>(&self, value: &Value) -> Result<T, Error> {
        let found = self.read(value)?;
        from_value(&found).map_err(|e| e.within(self.accessors()))
    }

    fn write_from<T: Serialize>(&self, target: &mut Value, data: &T) -> Result<(), Error> {
        let value = to_value(data).map_err(|e| e.within(self.accessors()))?;
        self.write(target, value)
    }
}

/// Parse `path` and read a Rust type from it.
pub fn read_as<T: DeserializeOwned>(path: impl IntoPath, value: &Value) -> Result<T, Error> {
    path.into_path()?.read_as(value)
}

/// Parse `path` and write a Rust type at it.
pub fn write_from<T: Serialize>(
    path: impl IntoPath,
    target: &mut Value,
    data: &T,
) -> Result<(), Error> {
    path.into_path()?.write_from(target, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use propath_core::ErrorKind;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Endpoint {
        host: String,
        port: u16,
    }

    #[test]
    fn write_then_read_struct() {
        let mut doc = Value::Null;
        let endpoint = Endpoint {
            host: "localhost".to_string(),
            port: 8080,
        };
        write_from("services[1].endpoint", &mut doc, &endpoint).unwrap();

        let back: Endpoint = read_as("services[1].endpoint", &doc).unwrap();
        assert_eq!(back, endpoint);
        let port: u16 = read_as("services[1].endpoint.port", &doc).unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn decode_errors_carry_the_path() {
        let doc = crate::parse_json(r#"{"a": {"b": "not a number"}}"#).unwrap();
        let err = read_as::<u32>("a.b", &doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Custom);
        assert_eq!(err.context().unwrap().to_string(), "a.b");
    }

    #[test]
    fn traversal_errors_pass_through() {
        let doc = crate::parse_json(r#"{"a": []}"#).unwrap();
        let err = read_as::<u32>("a[0]", &doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
    }
}
