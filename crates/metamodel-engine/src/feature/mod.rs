//! Features and object specifications
//!
//! A feature is anything facets attach to: a type, property, collection,
//! action or action parameter. Each has a stable [`Identifier`] and its own
//! [`FacetHolder`]. An [`ObjectSpecification`] bundles the features of one
//! introspected class and is published as an immutable `Arc`.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::catalog::{ClassKind, MethodDescriptor};
use crate::error::InvocationResult;
use crate::facet::{
    DescribedFacet, DisableForContextFacet, DisabledFacet, FacetHolder, FacetKind, HiddenFacet,
    HideForContextFacet, NamedFacet,
};
use crate::policy::IntrospectionPolicy;
use crate::types::{format_signature, ObjectHandle, TypeName, TypeRef, Value};

/// Kind of feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureType {
    /// A class
    Type,
    /// Scalar property
    Property,
    /// Collection
    Collection,
    /// Action
    Action,
    /// Parameter of an action
    ActionParameter,
}

/// Stable identity of a feature: owning type, member, signature and
/// parameter index
///
/// Actions and their parameters carry the action's parameter type list, so
/// overloads such as `placeOrder(int)` and `placeOrder(String)` stay
/// distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    /// Owning type
    pub owner: TypeName,
    /// Member name; `None` for the type itself
    pub member: Option<String>,
    /// Rendered parameter types of an action, e.g. `(int, String)`
    pub signature: Option<String>,
    /// Parameter index for action parameters
    pub param_index: Option<usize>,
    /// Kind of feature
    pub feature_type: FeatureType,
}

impl Identifier {
    /// Identifier of a type
    pub fn type_level(owner: impl Into<TypeName>) -> Self {
        Self {
            owner: owner.into(),
            member: None,
            signature: None,
            param_index: None,
            feature_type: FeatureType::Type,
        }
    }

    /// Identifier of a property or collection
    pub fn member(owner: impl Into<TypeName>, member: &str, feature_type: FeatureType) -> Self {
        Self {
            owner: owner.into(),
            member: Some(member.to_string()),
            signature: None,
            param_index: None,
            feature_type,
        }
    }

    /// Identifier of an action with the given parameter types
    pub fn action(owner: impl Into<TypeName>, action: &str, param_types: &[TypeRef]) -> Self {
        Self {
            owner: owner.into(),
            member: Some(action.to_string()),
            signature: Some(format_signature(param_types)),
            param_index: None,
            feature_type: FeatureType::Action,
        }
    }

    /// Identifier of parameter `index` of an action
    pub fn parameter(owner: impl Into<TypeName>, action: &str, param_types: &[TypeRef], index: usize) -> Self {
        Self {
            param_index: Some(index),
            feature_type: FeatureType::ActionParameter,
            ..Self::action(owner, action, param_types)
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.owner)?;
        if let Some(member) = &self.member {
            write!(f, "#{}", member)?;
        }
        if let Some(signature) = &self.signature {
            f.write_str(signature)?;
        }
        if let Some(index) = self.param_index {
            write!(f, "[{}]", index)?;
        }
        Ok(())
    }
}

/// Common read access to a feature's facets
pub trait Feature {
    /// The feature's facets
    fn holder(&self) -> &FacetHolder;

    /// Stable identity
    fn identifier(&self) -> &Identifier {
        self.holder().identifier()
    }

    /// Winning facet of a kind
    fn facet<T: FacetKind>(&self) -> Option<&T>
    where
        Self: Sized,
    {
        self.holder().facet::<T>()
    }

    /// Friendly name, if one was contributed
    fn friendly_name(&self) -> Option<&str> {
        self.holder().facet::<NamedFacet>().map(|f| f.text.as_str())
    }

    /// Description, if one was contributed
    fn description(&self) -> Option<&str> {
        self.holder().facet::<DescribedFacet>().map(|f| f.text.as_str())
    }

    /// Whether the feature is hidden for `target` given `args`
    fn is_hidden(&self, target: &ObjectHandle, args: &[Value]) -> InvocationResult<bool> {
        if self.holder().facet::<HiddenFacet>().is_some() {
            return Ok(true);
        }
        match self.holder().facet::<HideForContextFacet>() {
            Some(facet) => facet.hides(target, args),
            None => Ok(false),
        }
    }

    /// Reason the feature is disabled for `target`, or `None` if enabled
    fn disabled_reason(&self, target: &ObjectHandle, args: &[Value]) -> InvocationResult<Option<String>> {
        if let Some(facet) = self.holder().facet::<DisabledFacet>() {
            return Ok(Some(facet.reason.clone()));
        }
        match self.holder().facet::<DisableForContextFacet>() {
            Some(facet) => facet.disabled_reason(target, args),
            None => Ok(None),
        }
    }
}

/// A scalar property
#[derive(Debug, Clone)]
pub struct PropertySpec {
    /// Facets
    pub holder: FacetHolder,
    /// Property name
    pub name: String,
    /// Value type
    pub type_ref: TypeRef,
    /// Getter
    pub getter: Arc<MethodDescriptor>,
}

/// A collection
#[derive(Debug, Clone)]
pub struct CollectionSpec {
    /// Facets
    pub holder: FacetHolder,
    /// Collection name
    pub name: String,
    /// Element type
    pub element_type: TypeRef,
    /// Getter
    pub getter: Arc<MethodDescriptor>,
}

/// An action parameter
#[derive(Debug, Clone)]
pub struct ActionParameterSpec {
    /// Facets
    pub holder: FacetHolder,
    /// Zero-based position
    pub index: usize,
    /// Parameter name
    pub name: String,
    /// Declared type
    pub type_ref: TypeRef,
}

/// An action
#[derive(Debug, Clone)]
pub struct ActionSpec {
    /// Facets
    pub holder: FacetHolder,
    /// Action name
    pub name: String,
    /// The action method
    pub method: Arc<MethodDescriptor>,
    /// Parameters in order
    pub params: Vec<ActionParameterSpec>,
    /// Whether this is the main method of a mixin
    pub is_mixin_main: bool,
}

impl ActionSpec {
    /// Parameter by position
    pub fn param(&self, index: usize) -> Option<&ActionParameterSpec> {
        self.params.get(index)
    }
}

impl Feature for PropertySpec {
    fn holder(&self) -> &FacetHolder {
        &self.holder
    }
}

impl Feature for CollectionSpec {
    fn holder(&self) -> &FacetHolder {
        &self.holder
    }
}

impl Feature for ActionSpec {
    fn holder(&self) -> &FacetHolder {
        &self.holder
    }
}

impl Feature for ActionParameterSpec {
    fn holder(&self) -> &FacetHolder {
        &self.holder
    }
}

/// The introspected metamodel of one class
#[derive(Debug, Clone)]
pub struct ObjectSpecification {
    /// Type-level facets
    pub holder: FacetHolder,
    /// Role of the class
    pub kind: ClassKind,
    /// Resolved introspection policy
    pub policy: IntrospectionPolicy,
    /// Properties in discovery order
    pub properties: Vec<PropertySpec>,
    /// Collections in discovery order
    pub collections: Vec<CollectionSpec>,
    /// Actions in discovery order
    pub actions: Vec<ActionSpec>,
    /// Methods no factory claimed
    pub unclaimed_methods: Vec<Arc<MethodDescriptor>>,
}

impl ObjectSpecification {
    /// Empty specification for a class
    pub fn new(type_name: &TypeName, kind: ClassKind, policy: IntrospectionPolicy) -> Self {
        Self {
            holder: FacetHolder::new(Identifier::type_level(type_name.clone())),
            kind,
            policy,
            properties: Vec::new(),
            collections: Vec::new(),
            actions: Vec::new(),
            unclaimed_methods: Vec::new(),
        }
    }

    /// The specified type
    pub fn type_name(&self) -> &TypeName {
        &self.holder.identifier().owner
    }

    /// Property by name
    pub fn property(&self, name: &str) -> Option<&PropertySpec> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Collection by name
    pub fn collection(&self, name: &str) -> Option<&CollectionSpec> {
        self.collections.iter().find(|c| c.name == name)
    }

    /// First action discovered with this name
    ///
    /// Use [`ObjectSpecification::action_overload`] to pick one of several
    /// overloads.
    pub fn action(&self, name: &str) -> Option<&ActionSpec> {
        self.actions.iter().find(|a| a.name == name)
    }

    /// Action with this name and exactly these parameter types
    pub fn action_overload(&self, name: &str, param_types: &[TypeRef]) -> Option<&ActionSpec> {
        self.actions
            .iter()
            .find(|a| a.name == name && a.method.params.iter().map(|p| &p.type_ref).eq(param_types.iter()))
    }

    /// Every overload of an action, in discovery order
    pub fn actions_named<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s ActionSpec> + 's {
        self.actions.iter().filter(move |a| a.name == name)
    }

    /// Action by its full identifier
    pub fn action_by_identifier(&self, identifier: &Identifier) -> Option<&ActionSpec> {
        self.actions.iter().find(|a| a.holder.identifier() == identifier)
    }

    /// Whether this is a mixin's specification
    pub fn is_mixin(&self) -> bool {
        matches!(self.kind, ClassKind::Mixin { .. })
    }

    /// Every member-level facet holder (properties, collections, actions,
    /// parameters) in discovery order
    pub fn member_holders(&self) -> Vec<&FacetHolder> {
        let mut holders: Vec<&FacetHolder> = Vec::new();
        holders.extend(self.properties.iter().map(|p| &p.holder));
        holders.extend(self.collections.iter().map(|c| &c.holder));
        for action in &self.actions {
            holders.push(&action.holder);
            holders.extend(action.params.iter().map(|p| &p.holder));
        }
        holders
    }
}

impl Feature for ObjectSpecification {
    fn holder(&self) -> &FacetHolder {
        &self.holder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facet::Precedence;

    #[test]
    fn test_identifier_display() {
        assert_eq!(Identifier::type_level("demo.Order").to_string(), "demo.Order");
        assert_eq!(
            Identifier::member("demo.Order", "status", FeatureType::Property).to_string(),
            "demo.Order#status"
        );
        let params = [TypeRef::class("demo.Customer"), TypeRef::int()];
        assert_eq!(
            Identifier::action("demo.Order", "placeOrder", &params).to_string(),
            "demo.Order#placeOrder(Customer, int)"
        );
        assert_eq!(
            Identifier::parameter("demo.Order", "placeOrder", &params, 1).to_string(),
            "demo.Order#placeOrder(Customer, int)[1]"
        );
        assert_eq!(Identifier::action("demo.Order", "ship", &[]).to_string(), "demo.Order#ship()");
    }

    #[test]
    fn test_overloads_have_distinct_identifiers() {
        let by_int = Identifier::action("demo.Order", "placeOrder", &[TypeRef::int()]);
        let by_text = Identifier::action("demo.Order", "placeOrder", &[TypeRef::Text]);
        assert_ne!(by_int, by_text);
        assert_ne!(
            Identifier::parameter("demo.Order", "placeOrder", &[TypeRef::int()], 0),
            Identifier::parameter("demo.Order", "placeOrder", &[TypeRef::Text], 0)
        );
    }

    #[test]
    fn test_static_hidden_and_disabled() {
        let mut spec = ObjectSpecification::new(
            &TypeName::new("demo.Order"),
            ClassKind::DomainObject,
            IntrospectionPolicy::AnnotationOptional,
        );
        spec.holder.add_facet(HiddenFacet {
            precedence: Precedence::High,
        });
        spec.holder.add_facet(DisabledFacet {
            precedence: Precedence::High,
            reason: "archived".into(),
        });

        let target = ObjectHandle::new("demo.Order");
        assert!(spec.is_hidden(&target, &[]).unwrap());
        assert_eq!(spec.disabled_reason(&target, &[]).unwrap(), Some("archived".to_string()));
        assert_eq!(spec.type_name().as_str(), "demo.Order");
    }
}
