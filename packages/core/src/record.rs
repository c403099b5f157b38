//! Declared record types: members, accessor methods and capability hooks.
//!
//! A [`RecordType`] is registered once and shared between all its instances.
//! It carries everything the traversal engine needs to resolve a field by
//! name: the member table, getter/setter methods, and optional hooks that
//! turn the record into a field, index or whole-path capability.

use std::fmt;
use std::sync::Arc;

use crate::case::{fold, same_member};
use crate::error::Error;
use crate::path::Path;
use crate::types::ValueType;
use crate::value::Value;

type SharedFn = dyn Fn(&Record, Vec<Value>) -> Result<Vec<Value>, Error> + Send + Sync;
type ExclusiveFn = dyn Fn(&mut Record, Vec<Value>) -> Result<Vec<Value>, Error> + Send + Sync;

pub(crate) type ReadFieldHook = Box<dyn Fn(&Record, &str) -> Result<Value, Error> + Send + Sync>;
pub(crate) type WriteFieldHook =
    Box<dyn Fn(&mut Record, &str, Value) -> Result<(), Error> + Send + Sync>;
pub(crate) type ReadIndexHook = Box<dyn Fn(&Record, usize) -> Result<Value, Error> + Send + Sync>;
pub(crate) type WriteIndexHook =
    Box<dyn Fn(&mut Record, usize, Value) -> Result<(), Error> + Send + Sync>;
pub(crate) type ReadPathHook = Box<dyn Fn(&Record, &Path) -> Result<Value, Error> + Send + Sync>;
pub(crate) type WritePathHook =
    Box<dyn Fn(&mut Record, &Path, Value) -> Result<(), Error> + Send + Sync>;

/// One declared member of a record.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: ValueType,
    pub public: bool,
}

/// The receiver a method body runs against.
#[derive(Clone)]
pub enum MethodBody {
    /// Callable from reads and writes.
    Shared(Arc<SharedFn>),
    /// Needs a mutable receiver, so it is only callable while writing.
    Exclusive(Arc<ExclusiveFn>),
}

/// A named method on a record type.
///
/// Getters and setters are methods of a particular shape: a getter takes no
/// parameters and returns at least one value; a setter takes one parameter,
/// optionally followed by a variadic one.
#[derive(Clone)]
pub struct Method {
    name: String,
    params: Vec<ValueType>,
    variadic: bool,
    results: Vec<ValueType>,
    body: MethodBody,
}

impl Method {
    /// A method with a shared receiver and no declared parameters or results.
    pub fn shared<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&Record, Vec<Value>) -> Result<Vec<Value>, Error> + Send + Sync + 'static,
    {
        Method {
            name: name.into(),
            params: Vec::new(),
            variadic: false,
            results: Vec::new(),
            body: MethodBody::Shared(Arc::new(body)),
        }
    }

    /// A method with an exclusive receiver and no declared parameters or results.
    pub fn exclusive<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut Record, Vec<Value>) -> Result<Vec<Value>, Error> + Send + Sync + 'static,
    {
        Method {
            name: name.into(),
            params: Vec::new(),
            variadic: false,
            results: Vec::new(),
            body: MethodBody::Exclusive(Arc::new(body)),
        }
    }

    /// Append a parameter.
    pub fn param(mut self, ty: ValueType) -> Self {
        self.params.push(ty);
        self
    }

    /// Append a trailing variadic parameter of element type `ty`.
    pub fn variadic(mut self, ty: ValueType) -> Self {
        self.params.push(ty);
        self.variadic = true;
        self
    }

    /// Append a result.
    pub fn returns(mut self, ty: ValueType) -> Self {
        self.results.push(ty);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[ValueType] {
        &self.params
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    pub fn results(&self) -> &[ValueType] {
        &self.results
    }

    pub fn is_shared(&self) -> bool {
        matches!(self.body, MethodBody::Shared(_))
    }

    fn is_getter(&self) -> bool {
        self.params.is_empty() && !self.results.is_empty()
    }

    fn is_setter(&self) -> bool {
        self.params.len() == 1 || (self.params.len() == 2 && self.variadic)
    }

    /// Call through a shared receiver. Fails for exclusive methods.
    pub fn call(&self, record: &Record, args: Vec<Value>) -> Result<Vec<Value>, Error> {
        match &self.body {
            MethodBody::Shared(body) => body(record, args),
            MethodBody::Exclusive(_) => Err(Error::not_addressable(format!(
                "method `{}` needs a mutable receiver",
                self.name
            ))),
        }
    }

    /// Call through an exclusive receiver.
    pub fn call_mut(&self, record: &mut Record, args: Vec<Value>) -> Result<Vec<Value>, Error> {
        match &self.body {
            MethodBody::Shared(body) => body(record, args),
            MethodBody::Exclusive(body) => body(record, args),
        }
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("variadic", &self.variadic)
            .field("results", &self.results)
            .field("shared", &self.is_shared())
            .finish()
    }
}

#[derive(Default)]
pub(crate) struct Hooks {
    pub(crate) read_field: Option<ReadFieldHook>,
    pub(crate) write_field: Option<WriteFieldHook>,
    pub(crate) read_index: Option<ReadIndexHook>,
    pub(crate) write_index: Option<WriteIndexHook>,
    pub(crate) read_path: Option<ReadPathHook>,
    pub(crate) write_path: Option<WritePathHook>,
}

/// Outcome of looking up a setter for a value.
pub(crate) enum SetterLookup<'a> {
    Found(&'a Method),
    /// A setter with the right name and arity exists but rejects the value.
    Rejected(&'a ValueType),
    Missing,
}

/// A registered record type.
pub struct RecordType {
    name: String,
    fields: Vec<FieldDecl>,
    methods: Vec<Method>,
    pub(crate) hooks: Hooks,
}

impl RecordType {
    /// Start declaring a record type.
    pub fn builder(name: impl Into<String>) -> RecordTypeBuilder {
        RecordTypeBuilder {
            ty: RecordType {
                name: name.into(),
                fields: Vec::new(),
                methods: Vec::new(),
                hooks: Hooks::default(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// A fresh record with every member at its zero value.
    pub fn instantiate(self: &Arc<Self>) -> Record {
        Record::new(self)
    }

    /// The public member a query name folds to.
    pub(crate) fn member(&self, query: &str) -> Option<(usize, &FieldDecl)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, decl)| decl.public && same_member(query, &decl.name))
    }

    /// True when a private member folds to the query name.
    pub(crate) fn has_private(&self, query: &str) -> bool {
        self.fields
            .iter()
            .any(|decl| !decl.public && same_member(query, &decl.name))
    }

    fn method_named(&self, folded: &str) -> Option<&Method> {
        self.methods.iter().find(|m| fold(&m.name) == folded)
    }

    /// Resolve a getter: `Norm`, then `GetNorm`.
    ///
    /// Candidates with parameters or without results are skipped, as are
    /// exclusive methods unless `exclusive` is set.
    pub(crate) fn getter(&self, query: &str, exclusive: bool) -> Option<&Method> {
        let norm = fold(query);
        let candidates = [norm.clone(), format!("Get{}", norm)];
        for candidate in &candidates {
            match self.method_named(candidate) {
                Some(method) if method.is_getter() && (exclusive || method.is_shared()) => {
                    return Some(method)
                }
                _ => continue,
            }
        }
        None
    }

    /// Resolve a setter for `value`: `Norm`, then `SetNorm`.
    ///
    /// Candidates of the wrong arity are skipped. The first candidate of the
    /// right arity decides: it is found when its parameter admits the value,
    /// and rejects the write otherwise.
    pub(crate) fn setter(&self, query: &str, value: &Value) -> SetterLookup<'_> {
        let norm = fold(query);
        let candidates = [norm.clone(), format!("Set{}", norm)];
        for candidate in &candidates {
            let Some(method) = self.method_named(candidate) else {
                continue;
            };
            if !method.is_setter() {
                continue;
            }
            let param = &method.params[0];
            if param.admits(value) {
                return SetterLookup::Found(method);
            }
            return SetterLookup::Rejected(param);
        }
        SetterLookup::Missing
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordType")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("methods", &self.methods)
            .finish()
    }
}

/// Builder for [`RecordType`].
///
/// ```rust
/// use propath_core::{RecordType, Value, ValueType};
///
/// let person = RecordType::builder("Person")
///     .field("Firstname", ValueType::String)
///     .private_field("lastname", ValueType::String)
///     .getter("LastName", ValueType::String, |r| {
///         r.get("lastname").cloned().unwrap_or_default()
///     })
///     .build();
///
/// let p = person.instantiate().with("lastname", "Doe").unwrap();
/// assert_eq!(propath_core::read("last_name", &Value::from(p)).unwrap().as_str(), Some("Doe"));
/// ```
pub struct RecordTypeBuilder {
    ty: RecordType,
}

impl RecordTypeBuilder {
    /// Declare a public member.
    pub fn field(mut self, name: impl Into<String>, ty: ValueType) -> Self {
        self.ty.fields.push(FieldDecl {
            name: name.into(),
            ty,
            public: true,
        });
        self
    }

    /// Declare a member reachable only through methods and hooks.
    pub fn private_field(mut self, name: impl Into<String>, ty: ValueType) -> Self {
        self.ty.fields.push(FieldDecl {
            name: name.into(),
            ty,
            public: false,
        });
        self
    }

    /// Declare a zero-argument accessor with a shared receiver.
    pub fn getter<F>(self, name: impl Into<String>, ty: ValueType, getter: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        self.method(Method::shared(name, move |record, _| Ok(vec![getter(record)])).returns(ty))
    }

    /// Declare a one-argument mutator.
    pub fn setter<F>(self, name: impl Into<String>, ty: ValueType, setter: F) -> Self
    where
        F: Fn(&mut Record, Value) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.method(
            Method::exclusive(name, move |record, args| {
                let value = args.into_iter().next().unwrap_or_default();
                setter(record, value)?;
                Ok(Vec::new())
            })
            .param(ty),
        )
    }

    /// Declare an arbitrary method.
    pub fn method(mut self, method: Method) -> Self {
        self.ty.methods.push(method);
        self
    }

    /// Resolve field steps through `hook` instead of the member table.
    pub fn read_field_with<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Record, &str) -> Result<Value, Error> + Send + Sync + 'static,
    {
        self.ty.hooks.read_field = Some(Box::new(hook));
        self
    }

    pub fn write_field_with<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Record, &str, Value) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.ty.hooks.write_field = Some(Box::new(hook));
        self
    }

    pub fn read_index_with<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Record, usize) -> Result<Value, Error> + Send + Sync + 'static,
    {
        self.ty.hooks.read_index = Some(Box::new(hook));
        self
    }

    pub fn write_index_with<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Record, usize, Value) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.ty.hooks.write_index = Some(Box::new(hook));
        self
    }

    /// Take over traversal of every path that reaches this record.
    pub fn read_path_with<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Record, &Path) -> Result<Value, Error> + Send + Sync + 'static,
    {
        self.ty.hooks.read_path = Some(Box::new(hook));
        self
    }

    pub fn write_path_with<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Record, &Path, Value) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.ty.hooks.write_path = Some(Box::new(hook));
        self
    }

    pub fn build(self) -> Arc<RecordType> {
        Arc::new(self.ty)
    }
}

/// An instance of a [`RecordType`]: one value per declared member.
#[derive(Clone)]
pub struct Record {
    ty: Arc<RecordType>,
    values: Vec<Value>,
}

impl Record {
    pub fn new(ty: &Arc<RecordType>) -> Self {
        Record {
            ty: Arc::clone(ty),
            values: ty.fields.iter().map(|decl| decl.ty.zero()).collect(),
        }
    }

    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.ty
    }

    pub fn type_name(&self) -> &str {
        &self.ty.name
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.ty.fields.iter().position(|decl| decl.name == name)
    }

    /// Raw member access by declared name, private members included.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.position(name).map(|i| &self.values[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.position(name).map(move |i| &mut self.values[i])
    }

    /// Store a member by declared name, checked against its declared type.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), Error> {
        let value = value.into();
        let i = self
            .position(name)
            .ok_or_else(|| Error::no_such_field(name, self.ty.name.clone()))?;
        let decl = &self.ty.fields[i];
        if !decl.ty.accepts(&value) {
            return Err(Error::not_assignable(decl.ty.to_string(), value.type_name()));
        }
        self.values[i] = value;
        Ok(())
    }

    /// Builder-style [`Record::set`].
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self, Error> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Public members with their values, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.ty
            .fields
            .iter()
            .zip(self.values.iter())
            .filter(|(decl, _)| decl.public)
            .map(|(decl, value)| (decl.name.as_str(), value))
    }

    pub(crate) fn slot_mut(&mut self, i: usize) -> &mut Value {
        &mut self.values[i]
    }

    pub(crate) fn slot(&self, i: usize) -> &Value {
        &self.values[i]
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.ty.name == other.ty.name && self.values == other.values
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(&self.ty.name);
        for (decl, value) in self.ty.fields.iter().zip(self.values.iter()) {
            s.field(&decl.name, value);
        }
        s.finish()
    }
}
