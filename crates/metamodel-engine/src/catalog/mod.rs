//! Class Catalog
//!
//! Structural descriptors of every introspectable class. The catalog stands
//! in for runtime reflection: each class is registered once with its fields,
//! methods, constructors and markers, and each method carries an invoker
//! closure so supporting methods can be called after introspection.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let order = ClassBuilder::new("demo.Order")
//!     .property("status", TypeRef::Text)
//!     .method(
//!         MethodBuilder::new("disableStatus")
//!             .returns(TypeRef::Text)
//!             .invoker(|_, _| Ok(Value::from("already shipped"))),
//!     )
//!     .build();
//! catalog.register(order);
//! ```

mod builder;
mod registry;

pub use builder::{ClassBuilder, MethodBuilder};
pub use registry::ClassCatalog;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{InvocationError, InvocationResult};
use crate::policy::IntrospectionPolicy;
use crate::types::{format_signature, ObjectHandle, TypeName, TypeRef, Value};

/// Invoker closure for a method: `(target, args) -> result`
pub type Invoker =
    Arc<dyn Fn(&ObjectHandle, &[Value]) -> InvocationResult<Value> + Send + Sync>;

/// Factory closure for a constructor: `(args) -> instance`
pub type ConstructorFn = Arc<dyn Fn(&[Value]) -> InvocationResult<Value> + Send + Sync>;

/// Member visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Public
    #[default]
    Public,
    /// Protected
    Protected,
    /// Package-private
    PackagePrivate,
    /// Private
    Private,
}

impl Visibility {
    /// Check for public visibility
    pub fn is_public(self) -> bool {
        self == Visibility::Public
    }
}

/// Markers ("annotations") attached to classes, members and parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// Class is a domain object; may pin its introspection policy
    DomainObject {
        /// Explicit policy for this class
        introspection: Option<IntrospectionPolicy>,
    },
    /// Method is an action
    Action,
    /// Method (or field) is a property
    Property {
        /// Explicit editability
        editable: Option<bool>,
    },
    /// Method (or field) is a collection
    Collection,
    /// Method is a supporting method and must be claimed by a member
    MemberSupport,
    /// Method is excluded from the metamodel
    Programmatic,
    /// Method runs after instantiation
    PostConstruct,
    /// Friendly name
    Named(String),
    /// Description
    Description(String),
    /// Always hidden
    Hidden,
    /// Always disabled, with reason
    Disabled(String),
    /// Domain event emitted when the member is interacted with
    DomainEvent(String),
    /// Application-specific marker (used for meta-marker policy resolution)
    Custom(String),
}

/// Marker discriminant for presence checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// `Marker::DomainObject`
    DomainObject,
    /// `Marker::Action`
    Action,
    /// `Marker::Property`
    Property,
    /// `Marker::Collection`
    Collection,
    /// `Marker::MemberSupport`
    MemberSupport,
    /// `Marker::Programmatic`
    Programmatic,
    /// `Marker::PostConstruct`
    PostConstruct,
    /// `Marker::Named`
    Named,
    /// `Marker::Description`
    Description,
    /// `Marker::Hidden`
    Hidden,
    /// `Marker::Disabled`
    Disabled,
    /// `Marker::DomainEvent`
    DomainEvent,
    /// `Marker::Custom`
    Custom,
}

impl Marker {
    /// Discriminant of this marker
    pub fn kind(&self) -> MarkerKind {
        match self {
            Marker::DomainObject { .. } => MarkerKind::DomainObject,
            Marker::Action => MarkerKind::Action,
            Marker::Property { .. } => MarkerKind::Property,
            Marker::Collection => MarkerKind::Collection,
            Marker::MemberSupport => MarkerKind::MemberSupport,
            Marker::Programmatic => MarkerKind::Programmatic,
            Marker::PostConstruct => MarkerKind::PostConstruct,
            Marker::Named(_) => MarkerKind::Named,
            Marker::Description(_) => MarkerKind::Description,
            Marker::Hidden => MarkerKind::Hidden,
            Marker::Disabled(_) => MarkerKind::Disabled,
            Marker::DomainEvent(_) => MarkerKind::DomainEvent,
            Marker::Custom(_) => MarkerKind::Custom,
        }
    }

    /// Markers that oblige some factory to claim the annotated method
    pub fn requires_contribution(&self) -> bool {
        matches!(
            self.kind(),
            MarkerKind::Action | MarkerKind::Property | MarkerKind::Collection | MarkerKind::MemberSupport
        )
    }
}

fn find_marker(markers: &[Marker], kind: MarkerKind) -> Option<&Marker> {
    markers.iter().find(|m| m.kind() == kind)
}

/// A single method parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDescriptor {
    /// Parameter name
    pub name: String,
    /// Declared type
    pub type_ref: TypeRef,
    /// Parameter markers
    pub markers: Vec<Marker>,
}

/// Stable identity of a method: declaring type, name and parameter types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodId {
    /// Declaring type
    pub declaring_type: TypeName,
    /// Method name
    pub name: String,
    /// Parameter types
    pub params: Vec<TypeRef>,
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}{}",
            self.declaring_type,
            self.name,
            format_signature(&self.params)
        )
    }
}

/// A declared method
#[derive(Clone)]
pub struct MethodDescriptor {
    /// Method name
    pub name: String,
    /// Type that declares the method
    pub declaring_type: TypeName,
    /// Parameters in order
    pub params: Vec<ParamDescriptor>,
    /// Return type
    pub return_type: TypeRef,
    /// Visibility
    pub visibility: Visibility,
    /// Static (class-level) method
    pub is_static: bool,
    /// Method markers
    pub markers: Vec<Marker>,
    invoker: Option<Invoker>,
}

impl MethodDescriptor {
    /// Identity of this method
    pub fn id(&self) -> MethodId {
        MethodId {
            declaring_type: self.declaring_type.clone(),
            name: self.name.clone(),
            params: self.param_types(),
        }
    }

    /// Parameter types in order
    pub fn param_types(&self) -> Vec<TypeRef> {
        self.params.iter().map(|p| p.type_ref.clone()).collect()
    }

    /// Number of parameters
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Check for a marker
    pub fn has_marker(&self, kind: MarkerKind) -> bool {
        find_marker(&self.markers, kind).is_some()
    }

    /// Get a marker by kind
    pub fn marker(&self, kind: MarkerKind) -> Option<&Marker> {
        find_marker(&self.markers, kind)
    }

    /// Same name and parameter types (ignoring the declaring type)
    pub fn same_signature(&self, other: &MethodDescriptor) -> bool {
        self.name == other.name
            && self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .zip(&other.params)
                .all(|(a, b)| a.type_ref == b.type_ref)
    }

    /// Call the method on `target` with exactly `arity()` arguments
    pub fn invoke(&self, target: &ObjectHandle, args: &[Value]) -> InvocationResult<Value> {
        if args.len() != self.params.len() {
            return Err(InvocationError::ArityMismatch {
                method: self.id().to_string(),
                expected: self.params.len(),
                actual: args.len(),
            });
        }
        let invoker = self.invoker.as_ref().ok_or_else(|| InvocationError::NotInvocable {
            method: self.id().to_string(),
        })?;
        invoker(target, args)
    }
}

impl PartialEq for MethodDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.declaring_type == other.declaring_type && self.same_signature(other)
    }
}

impl Eq for MethodDescriptor {}

impl Hash for MethodDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.declaring_type.hash(state);
        self.name.hash(state);
        for p in &self.params {
            p.type_ref.hash(state);
        }
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("id", &self.id().to_string())
            .field("return_type", &self.return_type)
            .field("visibility", &self.visibility)
            .field("markers", &self.markers)
            .field("invocable", &self.invoker.is_some())
            .finish()
    }
}

/// A declared field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name
    pub name: String,
    /// Declaring type
    pub declaring_type: TypeName,
    /// Declared type
    pub type_ref: TypeRef,
    /// Visibility
    pub visibility: Visibility,
    /// Field markers
    pub markers: Vec<Marker>,
}

impl FieldDescriptor {
    /// Check for a marker
    pub fn has_marker(&self, kind: MarkerKind) -> bool {
        find_marker(&self.markers, kind).is_some()
    }

    /// Get a marker by kind
    pub fn marker(&self, kind: MarkerKind) -> Option<&Marker> {
        find_marker(&self.markers, kind)
    }
}

/// A declared constructor
#[derive(Clone)]
pub struct ConstructorDescriptor {
    /// Parameter types in order
    pub params: Vec<TypeRef>,
    /// Visibility
    pub visibility: Visibility,
    factory: ConstructorFn,
}

impl ConstructorDescriptor {
    /// Create a constructor descriptor
    pub fn new(params: Vec<TypeRef>, visibility: Visibility, factory: ConstructorFn) -> Self {
        Self {
            params,
            visibility,
            factory,
        }
    }

    /// Build an instance from `args`
    pub fn construct(&self, type_name: &TypeName, args: &[Value]) -> InvocationResult<Value> {
        if args.len() != self.params.len() {
            return Err(InvocationError::TupleConstruction {
                type_name: type_name.to_string(),
                message: format!("expected {} value(s), got {}", self.params.len(), args.len()),
            });
        }
        (self.factory)(args)
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("params", &format_signature(&self.params))
            .field("visibility", &self.visibility)
            .finish()
    }
}

/// What role a class plays in the metamodel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassKind {
    /// Entity or view model; fully introspected
    DomainObject,
    /// Contributes its main method to the mixee type
    Mixin {
        /// Type the mixin contributes to
        mixee: TypeName,
        /// Name of the main method
        main: String,
    },
    /// Plain value or parameter tuple; never introspected as a domain object
    Value,
}

/// A registered class
#[derive(Debug, Clone)]
pub struct ClassDescriptor {
    /// Fully qualified name
    pub name: TypeName,
    /// Direct superclass, if registered
    pub superclass: Option<TypeName>,
    /// Role of the class
    pub kind: ClassKind,
    /// Class markers
    pub markers: Vec<Marker>,
    /// Declared fields
    pub fields: Vec<FieldDescriptor>,
    /// Declared methods (own declarations only)
    pub methods: Vec<Arc<MethodDescriptor>>,
    /// Declared constructors
    pub constructors: Vec<Arc<ConstructorDescriptor>>,
}

impl ClassDescriptor {
    /// Check for a marker
    pub fn has_marker(&self, kind: MarkerKind) -> bool {
        find_marker(&self.markers, kind).is_some()
    }

    /// Get a marker by kind
    pub fn marker(&self, kind: MarkerKind) -> Option<&Marker> {
        find_marker(&self.markers, kind)
    }

    /// Public constructor with exactly these parameter types
    pub fn public_constructor(&self, params: &[TypeRef]) -> Option<&Arc<ConstructorDescriptor>> {
        self.constructors
            .iter()
            .find(|c| c.visibility.is_public() && c.params.as_slice() == params)
    }

    /// Whether the class is introspected as a domain object or mixin
    pub fn is_introspectable(&self) -> bool {
        !matches!(self.kind, ClassKind::Value)
    }
}
