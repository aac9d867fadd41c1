//! Dynamic values exchanged with catalog invokers

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::TypeName;

/// A runtime value passed to or returned from an invoker
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent value
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Integer (all integral primitives)
    Int(i64),
    /// Floating point
    Float(f64),
    /// Text
    Text(String),
    /// Non-scalar sequence
    List(Vec<Value>),
    /// Domain object or parameter tuple
    Object(ObjectHandle),
}

impl Value {
    /// Check for null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get as list
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get as object
    pub fn as_object(&self) -> Option<&ObjectHandle> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Short name of the value kind, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Object(_) => "object",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Option<String>> for Value {
    fn from(s: Option<String>) -> Self {
        s.map(Value::Text).unwrap_or(Value::Null)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<ObjectHandle> for Value {
    fn from(obj: ObjectHandle) -> Self {
        Value::Object(obj)
    }
}

/// Shared handle to an object's field state.
///
/// Cloning the handle aliases the same object.
#[derive(Clone)]
pub struct ObjectHandle {
    type_name: TypeName,
    state: Arc<RwLock<FxHashMap<String, Value>>>,
}

impl ObjectHandle {
    /// Create an empty object of the given type
    pub fn new(type_name: impl Into<TypeName>) -> Self {
        Self {
            type_name: type_name.into(),
            state: Arc::new(RwLock::new(FxHashMap::default())),
        }
    }

    /// Builder-style field initialisation
    pub fn with(self, field: &str, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// The object's type
    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    /// Read a field, `Null` if unset
    pub fn get(&self, field: &str) -> Value {
        self.state.read().get(field).cloned().unwrap_or_default()
    }

    /// Write a field
    pub fn set(&self, field: &str, value: impl Into<Value>) {
        self.state.write().insert(field.to_string(), value.into());
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &ObjectHandle) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        let mut keys: Vec<&String> = state.keys().collect();
        keys.sort();
        f.debug_struct("ObjectHandle")
            .field("type", &self.type_name.as_str())
            .field("fields", &keys)
            .finish()
    }
}
