//! Host objects and hooked records taking over traversal.

use propath::{
    must_read, path, read, write, Error, ErrorKind, FieldReader, FieldWriter, Object, Path,
    PathReader, PathWriter, RecordType, Value, ValueType,
};

/// Field access backed by a plain map.
#[derive(Clone, Debug, PartialEq)]
struct Fields {
    map: Value,
}

impl FieldReader for Fields {
    fn read_field(&self, name: &str) -> Result<Value, Error> {
        Ok(read(name, &self.map)?.into_owned())
    }
}

impl FieldWriter for Fields {
    fn write_field(&mut self, name: &str, value: Value) -> Result<(), Error> {
        write(name, &mut self.map, value)
    }
}

impl Object for Fields {
    fn field_reader(&self) -> Option<&dyn FieldReader> {
        Some(self)
    }

    fn field_writer(&mut self) -> Option<&mut dyn FieldWriter> {
        Some(self)
    }
}

/// Whole-path access delegated to an inner list.
#[derive(Clone, Debug, PartialEq)]
struct Indexes {
    slice: Value,
}

impl PathReader for Indexes {
    fn read_path(&self, path: &Path) -> Result<Value, Error> {
        Ok(path.read(&self.slice)?.into_owned())
    }
}

impl PathWriter for Indexes {
    fn write_path(&mut self, path: &Path, value: Value) -> Result<(), Error> {
        path.write(&mut self.slice, value)
    }
}

impl Object for Indexes {
    fn path_reader(&self) -> Option<&dyn PathReader> {
        Some(self)
    }

    fn path_writer(&mut self) -> Option<&mut dyn PathWriter> {
        Some(self)
    }
}

/// Readable by field, but not writable.
#[derive(Clone, Debug, PartialEq)]
struct Frozen;

impl FieldReader for Frozen {
    fn read_field(&self, name: &str) -> Result<Value, Error> {
        Ok(Value::from(name))
    }
}

impl Object for Frozen {
    fn field_reader(&self) -> Option<&dyn FieldReader> {
        Some(self)
    }
}

fn names() -> Value {
    Value::from(vec!["Eugeny", "Tsarykau", "Universe"])
}

fn fields() -> Value {
    Value::object(Fields {
        map: [("firstname", "hello")].into_iter().collect(),
    })
}

#[test]
fn field_capability_reads_and_writes() {
    let mut f = fields();
    assert_eq!(must_read("firstname", &f), Value::from("hello"));

    write("firstname", &mut f, "foo").unwrap();
    write("Lastname", &mut f, "boo").unwrap();
    let inner = &f.downcast_ref::<Fields>().unwrap().map;
    assert_eq!(must_read("firstname", inner), Value::from("foo"));
    assert_eq!(must_read("Lastname", inner), Value::from("boo"));
}

#[test]
fn field_capability_nested_write_vivifies() {
    let mut f = fields();
    write("profile.tags[1]", &mut f, "x").unwrap();
    assert_eq!(must_read("profile.tags[1]", &f), Value::from("x"));
    assert_eq!(must_read("profile.tags[0]", &f), Value::Null);

    write("profile.name", &mut f, "n").unwrap();
    assert_eq!(must_read("profile.tags[1]", &f), Value::from("x"));
}

#[test]
fn field_capability_errors_are_anchored() {
    let root: Value = [("f", fields())].into_iter().collect();
    let err = read("f.missing.deeper", &root).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::KeyNotFound);
    assert_eq!(err.context().unwrap().to_string(), "f.missing");
}

#[test]
fn reader_without_writer_is_not_addressable() {
    let mut root: Value = [("frozen", Value::object(Frozen))].into_iter().collect();
    assert_eq!(must_read("frozen.anything", &root), Value::from("anything"));

    let err = write("frozen.x", &mut root, 1i64).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotAddressable);
    assert_eq!(err.context().unwrap().to_string(), "frozen.x");
}

#[test]
fn index_reads() {
    let list = names();
    let pointed = Value::pointer(names());
    let ir = Value::object(Indexes { slice: names() });
    let pointed_ir = Value::pointer(ir.clone());

    for v in [&list, &pointed, &ir, &pointed_ir] {
        assert_eq!(read(0usize, v).unwrap().as_str(), Some("Eugeny"));
        assert_eq!(read(1usize, v).unwrap().as_str(), Some("Tsarykau"));
        assert_eq!(read(2usize, v).unwrap().as_str(), Some("Universe"));
        assert_eq!(read(3usize, v).unwrap_err().kind(), ErrorKind::IndexOutOfRange);
    }
}

#[test]
fn index_writes() {
    let mut list = names();
    write("[0]", &mut list, "Aleksandra").unwrap();
    assert_eq!(must_read(0usize, &list), Value::from("Aleksandra"));

    let mut ir = Value::object(Indexes { slice: list.clone() });
    write("[1]", &mut ir, "Yudina").unwrap();
    let slice = &ir.downcast_ref::<Indexes>().unwrap().slice;
    assert_eq!(must_read(1usize, slice), Value::from("Yudina"));
    assert_eq!(must_read(0usize, slice), Value::from("Aleksandra"));
}

#[test]
fn whole_path_errors_keep_the_prefix() {
    let root: Value = [("ir", Value::object(Indexes { slice: names() }))]
        .into_iter()
        .collect();
    let err = read("ir[7]", &root).unwrap_err();
    assert!(matches!(err, Error::IndexOutOfRange { index: 7, len: 3, .. }));
    assert_eq!(err.context().unwrap(), &path!("ir[7]"));
}

#[test]
fn capabilities_shadow_native_members() {
    let ty = RecordType::builder("Audited")
        .field("Name", ValueType::String)
        .private_field("writes", ValueType::list(ValueType::String))
        .read_field_with(|_, name| Ok(Value::from(format!("hooked:{}", name))))
        .write_field_with(|r, name, _| {
            let writes = r
                .get_mut("writes")
                .ok_or_else(|| Error::custom("no log"))?;
            let len = writes.as_array().map_or(0, Vec::len);
            write(len, writes, name)
        })
        .build();
    let mut v = Value::from(ty.instantiate());

    assert_eq!(must_read("name", &v), Value::from("hooked:name"));
    write("name", &mut v, "x").unwrap();

    let record = v.as_record().unwrap();
    assert_eq!(record.get("Name"), Some(&Value::from("")));
    assert_eq!(record.get("writes"), Some(&Value::from(vec!["name"])));
}

#[test]
fn hooked_records_delegate_whole_paths() {
    let ty = RecordType::builder("Mirror")
        .private_field("data", ValueType::Any)
        .read_path_with(|r, path| match r.get("data") {
            Some(data) => Ok(path.read(data)?.into_owned()),
            None => Err(Error::custom("no data")),
        })
        .write_path_with(|r, path, value| {
            let data = r.get_mut("data").ok_or_else(|| Error::custom("no data"))?;
            path.write(data, value)
        })
        .build();
    let mut root: Value = [("m", Value::from(ty.instantiate()))].into_iter().collect();

    write("m.a.b[0]", &mut root, 1i64).unwrap();
    assert_eq!(must_read("m.a.b[0]", &root), Value::Integer(1));

    let err = read("m.a.c", &root).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::KeyNotFound);
    assert_eq!(err.context().unwrap().to_string(), "m.a.c");
}
