//! Type references used by the class catalog
//!
//! The catalog describes every field, parameter and return type with a
//! [`TypeRef`]. The engine never inspects Rust types directly; it only
//! compares these structural references.

mod value;

pub use value::{ObjectHandle, Value};

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Fully qualified name of a catalog class, e.g. `demo.Order`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName(Arc<str>);

impl TypeName {
    /// Create a type name
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The full name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name without the namespace, e.g. `Order` for `demo.Order`
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// Namespace part, e.g. `demo` for `demo.Order`
    pub fn namespace(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(ns, _)| ns)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TypeName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl Borrow<str> for TypeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Scalar primitive kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Boolean
    Bool,
    /// 8-bit integer
    Byte,
    /// 16-bit integer
    Short,
    /// 32-bit integer
    Int,
    /// 64-bit integer
    Long,
    /// 32-bit float
    Float,
    /// 64-bit float
    Double,
    /// Single character
    Char,
}

impl PrimitiveKind {
    fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Char => "char",
        }
    }
}

/// Structural type reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// No value (method return only)
    Void,
    /// Non-nullable primitive
    Primitive(PrimitiveKind),
    /// Nullable wrapper around a primitive
    Boxed(PrimitiveKind),
    /// Text
    Text,
    /// Standard-library value type (dates, decimals, identifiers, ...)
    Stdlib(Arc<str>),
    /// Catalog class
    Class(TypeName),
    /// Non-scalar container of elements
    Collection(Box<TypeRef>),
}

impl TypeRef {
    /// Shorthand for `TypeRef::Class`
    pub fn class(name: impl AsRef<str>) -> Self {
        TypeRef::Class(TypeName::new(name))
    }

    /// Shorthand for `TypeRef::Collection`
    pub fn collection_of(element: TypeRef) -> Self {
        TypeRef::Collection(Box::new(element))
    }

    /// Shorthand for `TypeRef::Stdlib`
    pub fn stdlib(name: &str) -> Self {
        TypeRef::Stdlib(Arc::from(name))
    }

    /// Shorthand for the primitive boolean
    pub const fn boolean() -> Self {
        TypeRef::Primitive(PrimitiveKind::Bool)
    }

    /// Shorthand for the primitive int
    pub const fn int() -> Self {
        TypeRef::Primitive(PrimitiveKind::Int)
    }

    /// Check for `Void`
    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Void)
    }

    /// Primitive or boxed boolean
    pub fn is_boolean_like(&self) -> bool {
        matches!(
            self,
            TypeRef::Primitive(PrimitiveKind::Bool) | TypeRef::Boxed(PrimitiveKind::Bool)
        )
    }

    /// Text
    pub fn is_text_like(&self) -> bool {
        matches!(self, TypeRef::Text)
    }

    /// Collection of any element type
    pub fn is_collection(&self) -> bool {
        matches!(self, TypeRef::Collection(_))
    }

    /// Primitive, boxed, text or stdlib value type.
    ///
    /// Such types can never act as a parameter tuple.
    pub fn is_scalar_value(&self) -> bool {
        matches!(
            self,
            TypeRef::Primitive(_) | TypeRef::Boxed(_) | TypeRef::Text | TypeRef::Stdlib(_)
        )
    }

    /// Element type for collections
    pub fn element_type(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::Collection(elem) => Some(elem),
            _ => None,
        }
    }

    /// Class name for class references
    pub fn class_name(&self) -> Option<&TypeName> {
        match self {
            TypeRef::Class(name) => Some(name),
            _ => None,
        }
    }

    /// Equality modulo boxing (`int` matches `Integer`)
    pub fn matches_boxed(&self, other: &TypeRef) -> bool {
        match (self, other) {
            (TypeRef::Primitive(a), TypeRef::Boxed(b)) | (TypeRef::Boxed(a), TypeRef::Primitive(b)) => {
                a == b
            }
            (TypeRef::Collection(a), TypeRef::Collection(b)) => a.matches_boxed(b),
            _ => self == other,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Void => f.write_str("void"),
            TypeRef::Primitive(kind) => f.write_str(kind.name()),
            TypeRef::Boxed(kind) => {
                let name = kind.name();
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) => write!(f, "{}{}", first.to_ascii_uppercase(), chars.as_str()),
                    None => Ok(()),
                }
            }
            TypeRef::Text => f.write_str("String"),
            TypeRef::Stdlib(name) => f.write_str(name),
            TypeRef::Class(name) => f.write_str(name.simple_name()),
            TypeRef::Collection(elem) => write!(f, "List<{}>", elem),
        }
    }
}

/// Render a parameter list as `(A, B, C)`
pub fn format_signature(types: &[TypeRef]) -> String {
    let parts: Vec<String> = types.iter().map(|t| t.to_string()).collect();
    format!("({})", parts.join(", "))
}
