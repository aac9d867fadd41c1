//! Fluent builders for class descriptors

use std::sync::Arc;

use super::{
    ClassDescriptor, ClassKind, ConstructorDescriptor, FieldDescriptor, Invoker, Marker,
    MethodDescriptor, ParamDescriptor, Visibility,
};
use crate::error::InvocationResult;
use crate::finder::naming;
use crate::types::{ObjectHandle, TypeName, TypeRef, Value};

/// Definition of a method to be added to a class
#[derive(Clone)]
pub struct MethodBuilder {
    name: String,
    params: Vec<ParamDescriptor>,
    return_type: TypeRef,
    visibility: Visibility,
    is_static: bool,
    markers: Vec<Marker>,
    invoker: Option<Invoker>,
}

impl MethodBuilder {
    /// New public, void, parameterless method
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type: TypeRef::Void,
            visibility: Visibility::Public,
            is_static: false,
            markers: Vec::new(),
            invoker: None,
        }
    }

    /// Add a parameter
    pub fn param(mut self, name: impl Into<String>, type_ref: TypeRef) -> Self {
        self.params.push(ParamDescriptor {
            name: name.into(),
            type_ref,
            markers: Vec::new(),
        });
        self
    }

    /// Add a parameter carrying markers
    pub fn param_with_markers(
        mut self,
        name: impl Into<String>,
        type_ref: TypeRef,
        markers: Vec<Marker>,
    ) -> Self {
        self.params.push(ParamDescriptor {
            name: name.into(),
            type_ref,
            markers,
        });
        self
    }

    /// Set return type
    pub fn returns(mut self, type_ref: TypeRef) -> Self {
        self.return_type = type_ref;
        self
    }

    /// Set visibility
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Mark as static
    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Attach a marker
    pub fn marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    /// Set the invoker closure
    pub fn invoker<F>(mut self, f: F) -> Self
    where
        F: Fn(&ObjectHandle, &[Value]) -> InvocationResult<Value> + Send + Sync + 'static,
    {
        self.invoker = Some(Arc::new(f));
        self
    }

    /// Finish the descriptor for the given declaring type
    pub fn build(self, declaring_type: &TypeName) -> MethodDescriptor {
        MethodDescriptor {
            name: self.name,
            declaring_type: declaring_type.clone(),
            params: self.params,
            return_type: self.return_type,
            visibility: self.visibility,
            is_static: self.is_static,
            markers: self.markers,
            invoker: self.invoker,
        }
    }
}

/// Fluent description of a class
pub struct ClassBuilder {
    name: TypeName,
    superclass: Option<TypeName>,
    kind: ClassKind,
    markers: Vec<Marker>,
    fields: Vec<FieldDescriptor>,
    methods: Vec<MethodBuilder>,
    constructors: Vec<ConstructorDescriptor>,
}

impl ClassBuilder {
    /// New domain-object class
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            superclass: None,
            kind: ClassKind::DomainObject,
            markers: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
        }
    }

    /// New value class (parameter tuples, records)
    pub fn value(name: impl Into<TypeName>) -> Self {
        Self::new(name).kind(ClassKind::Value)
    }

    /// New mixin contributing `main` to `mixee`
    pub fn mixin(name: impl Into<TypeName>, mixee: impl Into<TypeName>, main: &str) -> Self {
        Self::new(name).kind(ClassKind::Mixin {
            mixee: mixee.into(),
            main: main.to_string(),
        })
    }

    /// Set the class kind
    pub fn kind(mut self, kind: ClassKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the superclass
    pub fn extends(mut self, superclass: impl Into<TypeName>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Attach a class marker
    pub fn marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    /// Declare a field without accessors
    pub fn field(self, name: &str, type_ref: TypeRef, visibility: Visibility) -> Self {
        self.field_with_markers(name, type_ref, visibility, Vec::new())
    }

    /// Declare a field carrying markers
    pub fn field_with_markers(
        mut self,
        name: &str,
        type_ref: TypeRef,
        visibility: Visibility,
        markers: Vec<Marker>,
    ) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.to_string(),
            declaring_type: self.name.clone(),
            type_ref,
            visibility,
            markers,
        });
        self
    }

    /// Declare a private field plus public `getX`/`setX` accessors backed by
    /// the object's field state.
    pub fn property(self, name: &str, type_ref: TypeRef) -> Self {
        self.property_with_markers(name, type_ref, Vec::new())
    }

    /// Like [`property`](Self::property) with field markers
    pub fn property_with_markers(self, name: &str, type_ref: TypeRef, markers: Vec<Marker>) -> Self {
        let cap = naming::capitalize(name);
        let getter_prefix = if type_ref.is_boolean_like() { "is" } else { "get" };
        let read = name.to_string();
        let write = name.to_string();
        self.field_with_markers(name, type_ref.clone(), Visibility::Private, markers)
            .method(
                MethodBuilder::new(format!("{}{}", getter_prefix, cap))
                    .returns(type_ref.clone())
                    .invoker(move |target, _| Ok(target.get(&read))),
            )
            .method(
                MethodBuilder::new(format!("set{}", cap))
                    .param(name, type_ref)
                    .invoker(move |target, args| {
                        target.set(&write, args[0].clone());
                        Ok(Value::Null)
                    }),
            )
    }

    /// Declare a method
    pub fn method(mut self, method: MethodBuilder) -> Self {
        self.methods.push(method);
        self
    }

    /// Declare a public constructor
    pub fn constructor<F>(self, params: Vec<TypeRef>, factory: F) -> Self
    where
        F: Fn(&[Value]) -> InvocationResult<Value> + Send + Sync + 'static,
    {
        self.constructor_with_visibility(params, Visibility::Public, factory)
    }

    /// Declare a constructor with explicit visibility
    pub fn constructor_with_visibility<F>(
        mut self,
        params: Vec<TypeRef>,
        visibility: Visibility,
        factory: F,
    ) -> Self
    where
        F: Fn(&[Value]) -> InvocationResult<Value> + Send + Sync + 'static,
    {
        self.constructors
            .push(ConstructorDescriptor::new(params, visibility, Arc::new(factory)));
        self
    }

    /// Declare a public record-style constructor that stores each argument in
    /// the named field of a fresh object of this type.
    pub fn record_constructor(self, fields: &[(&str, TypeRef)]) -> Self {
        let type_name = self.name.clone();
        let names: Vec<String> = fields.iter().map(|(n, _)| n.to_string()).collect();
        let params: Vec<TypeRef> = fields.iter().map(|(_, t)| t.clone()).collect();
        self.constructor(params, move |args| {
            let obj = ObjectHandle::new(type_name.clone());
            for (name, value) in names.iter().zip(args) {
                obj.set(name, value.clone());
            }
            Ok(Value::Object(obj))
        })
    }

    /// Finish the class descriptor
    pub fn build(self) -> ClassDescriptor {
        let name = self.name;
        let methods = self
            .methods
            .into_iter()
            .map(|m| Arc::new(m.build(&name)))
            .collect();
        ClassDescriptor {
            name,
            superclass: self.superclass,
            kind: self.kind,
            markers: self.markers,
            fields: self.fields,
            methods,
            constructors: self.constructors.into_iter().map(Arc::new).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MarkerKind;

    #[test]
    fn test_property_generates_accessors() {
        let class = ClassBuilder::new("demo.Order")
            .property("status", TypeRef::Text)
            .property("paid", TypeRef::boolean())
            .build();

        let names: Vec<&str> = class.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["getStatus", "setStatus", "isPaid", "setPaid"]);
        assert_eq!(class.fields.len(), 2);
        assert_eq!(class.fields[0].visibility, Visibility::Private);
    }

    #[test]
    fn test_property_accessors_read_and_write_state() {
        let class = ClassBuilder::new("demo.Order")
            .property("status", TypeRef::Text)
            .build();
        let target = ObjectHandle::new("demo.Order");

        class.methods[1]
            .invoke(&target, &[Value::from("SHIPPED")])
            .unwrap();
        assert_eq!(
            class.methods[0].invoke(&target, &[]).unwrap(),
            Value::from("SHIPPED")
        );
    }

    #[test]
    fn test_record_constructor() {
        let class = ClassBuilder::value("demo.PlaceOrderParams")
            .record_constructor(&[("quantity", TypeRef::int()), ("note", TypeRef::Text)])
            .build();

        let ctor = class
            .public_constructor(&[TypeRef::int(), TypeRef::Text])
            .expect("record constructor");
        let tuple = ctor
            .construct(&class.name, &[Value::Int(3), Value::from("rush")])
            .unwrap();
        let obj = tuple.as_object().unwrap();
        assert_eq!(obj.get("quantity"), Value::Int(3));
        assert_eq!(obj.type_name().as_str(), "demo.PlaceOrderParams");
        assert!(!class.is_introspectable());
    }

    #[test]
    fn test_mixin_kind_and_markers() {
        let class = ClassBuilder::mixin("demo.Order_cancel", "demo.Order", "act")
            .marker(Marker::DomainObject { introspection: None })
            .build();
        assert!(class.has_marker(MarkerKind::DomainObject));
        assert!(matches!(class.kind, ClassKind::Mixin { ref main, .. } if main == "act"));
    }
}
