//! Concrete facets of the default programming model

use std::any::Any;

use super::{Facet, FacetKind, FacetType, ImperativeAspect, Precedence};
use crate::catalog::MethodDescriptor;
use crate::error::{InvocationError, InvocationResult};
use crate::policy::{IntrospectionPolicy, PolicySource};
use crate::types::{ObjectHandle, TypeName, TypeRef, Value};

/// Implement [`Facet`] and [`FacetKind`] for a struct with a `precedence`
/// field. Semantic equality compares the listed fields; an optional trailing
/// field name exposes an [`ImperativeAspect`].
macro_rules! impl_facet {
    ($ty:ident, $id:literal, [$($field:ident),*] $(, $aspect:ident)?) => {
        impl FacetKind for $ty {
            const TYPE: FacetType = FacetType::new($id);
        }

        impl Facet for $ty {
            fn facet_type(&self) -> FacetType {
                <Self as FacetKind>::TYPE
            }

            fn precedence(&self) -> Precedence {
                self.precedence
            }

            fn semantically_equal(&self, other: &dyn Facet) -> bool {
                other
                    .as_any()
                    .downcast_ref::<Self>()
                    .is_some_and(|_other| true $(&& self.$field == _other.$field)*)
            }

            $(
                fn imperative(&self) -> Option<&ImperativeAspect> {
                    Some(&self.$aspect)
                }
            )?

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

fn unexpected(method: &MethodDescriptor, expected: &'static str, actual: &Value) -> InvocationError {
    InvocationError::UnexpectedReturn {
        method: method.id().to_string(),
        expected,
        actual: actual.kind_name(),
    }
}

/// Boolean result; a null boxed boolean reads as `false`
fn as_flag(method: &MethodDescriptor, value: Value) -> InvocationResult<bool> {
    match value {
        Value::Bool(b) => Ok(b),
        Value::Null => Ok(false),
        other => Err(unexpected(method, "boolean", &other)),
    }
}

/// Reason result; null means "no objection"
fn as_reason(method: &MethodDescriptor, value: Value) -> InvocationResult<Option<String>> {
    match value {
        Value::Text(s) => Ok(Some(s)),
        Value::Null => Ok(None),
        other => Err(unexpected(method, "text", &other)),
    }
}

/// Non-scalar result; null reads as empty
fn as_list(method: &MethodDescriptor, value: Value) -> InvocationResult<Vec<Value>> {
    match value {
        Value::List(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        other => Err(unexpected(method, "list", &other)),
    }
}

/// Feature is always hidden
#[derive(Debug, Clone)]
pub struct HiddenFacet {
    /// Precedence
    pub precedence: Precedence,
}
impl_facet!(HiddenFacet, "hidden", []);

/// Visibility decided by a `hideX` method
#[derive(Debug, Clone)]
pub struct HideForContextFacet {
    /// Precedence
    pub precedence: Precedence,
    /// The hide method
    pub aspect: ImperativeAspect,
}
impl_facet!(HideForContextFacet, "hide-for-context", [aspect], aspect);

impl HideForContextFacet {
    /// Whether the feature is hidden for `target`
    pub fn hides(&self, target: &ObjectHandle, args: &[Value]) -> InvocationResult<bool> {
        let value = self.aspect.invoke(target, args, &[])?;
        as_flag(&self.aspect.method, value)
    }
}

/// Feature is always disabled
#[derive(Debug, Clone)]
pub struct DisabledFacet {
    /// Precedence
    pub precedence: Precedence,
    /// Why
    pub reason: String,
}
impl_facet!(DisabledFacet, "disabled", [reason]);

/// Enablement decided by a `disableX` method
#[derive(Debug, Clone)]
pub struct DisableForContextFacet {
    /// Precedence
    pub precedence: Precedence,
    /// The disable method
    pub aspect: ImperativeAspect,
}
impl_facet!(DisableForContextFacet, "disable-for-context", [aspect], aspect);

impl DisableForContextFacet {
    /// Reason the feature is disabled for `target`, or `None` if enabled
    pub fn disabled_reason(&self, target: &ObjectHandle, args: &[Value]) -> InvocationResult<Option<String>> {
        let value = self.aspect.invoke(target, args, &[])?;
        as_reason(&self.aspect.method, value)
    }
}

/// Proposed values checked by a `validateX` method
#[derive(Debug, Clone)]
pub struct ValidateFacet {
    /// Precedence
    pub precedence: Precedence,
    /// The validate method
    pub aspect: ImperativeAspect,
}
impl_facet!(ValidateFacet, "validate", [aspect], aspect);

impl ValidateFacet {
    /// Reason the proposed arguments are invalid, or `None` if valid
    pub fn invalid_reason(&self, target: &ObjectHandle, args: &[Value]) -> InvocationResult<Option<String>> {
        let value = self.aspect.invoke(target, args, &[])?;
        as_reason(&self.aspect.method, value)
    }
}

/// Default value from a `defaultX` method
#[derive(Debug, Clone)]
pub struct DefaultedFacet {
    /// Precedence
    pub precedence: Precedence,
    /// The default method
    pub aspect: ImperativeAspect,
}
impl_facet!(DefaultedFacet, "defaulted", [aspect], aspect);

impl DefaultedFacet {
    /// Compute the default given the arguments entered so far
    pub fn default_value(&self, target: &ObjectHandle, args: &[Value]) -> InvocationResult<Value> {
        self.aspect.invoke(target, args, &[])
    }
}

/// Fixed choices from a `choicesX` method
#[derive(Debug, Clone)]
pub struct ChoicesFacet {
    /// Precedence
    pub precedence: Precedence,
    /// The choices method
    pub aspect: ImperativeAspect,
}
impl_facet!(ChoicesFacet, "choices", [aspect], aspect);

impl ChoicesFacet {
    /// Choices given the arguments entered so far
    pub fn choices(&self, target: &ObjectHandle, args: &[Value]) -> InvocationResult<Vec<Value>> {
        let value = self.aspect.invoke(target, args, &[])?;
        as_list(&self.aspect.method, value)
    }
}

/// Choices matching a search term, from an `autoCompleteX` method
#[derive(Debug, Clone)]
pub struct AutoCompleteFacet {
    /// Precedence
    pub precedence: Precedence,
    /// The auto-complete method
    pub aspect: ImperativeAspect,
    /// Shortest search term worth querying
    pub min_length: usize,
}
impl_facet!(AutoCompleteFacet, "auto-complete", [aspect], aspect);

impl AutoCompleteFacet {
    /// Matches for `search`; empty when the term is shorter than `min_length`
    pub fn auto_complete(&self, target: &ObjectHandle, args: &[Value], search: &str) -> InvocationResult<Vec<Value>> {
        if search.chars().count() < self.min_length {
            return Ok(Vec::new());
        }
        let value = self.aspect.invoke(target, args, &[Value::from(search)])?;
        as_list(&self.aspect.method, value)
    }
}

/// Value read through a getter
#[derive(Debug, Clone)]
pub struct AccessorFacet {
    /// Precedence
    pub precedence: Precedence,
    /// The getter
    pub aspect: ImperativeAspect,
}
impl_facet!(AccessorFacet, "accessor", [aspect], aspect);

impl AccessorFacet {
    /// Read the value from `target`
    pub fn get(&self, target: &ObjectHandle) -> InvocationResult<Value> {
        self.aspect.invoke(target, &[], &[])
    }
}

/// Element type of a collection
#[derive(Debug, Clone)]
pub struct ElementTypeFacet {
    /// Precedence
    pub precedence: Precedence,
    /// Element type
    pub element: TypeRef,
}
impl_facet!(ElementTypeFacet, "element-type", [element]);

/// Value written through `setX` (DEFAULT) or `modifyX` (HIGH)
#[derive(Debug, Clone)]
pub struct PropertySetterFacet {
    /// Precedence
    pub precedence: Precedence,
    /// The setter
    pub aspect: ImperativeAspect,
}
impl_facet!(PropertySetterFacet, "property-setter", [aspect], aspect);

impl PropertySetterFacet {
    /// Write `value` to `target`
    pub fn set(&self, target: &ObjectHandle, value: Value) -> InvocationResult<()> {
        self.aspect.invoke(target, &[value], &[]).map(|_| ())
    }
}

/// Value cleared through `clearX`
#[derive(Debug, Clone)]
pub struct PropertyClearFacet {
    /// Precedence
    pub precedence: Precedence,
    /// The clear method
    pub aspect: ImperativeAspect,
}
impl_facet!(PropertyClearFacet, "property-clear", [aspect], aspect);

impl PropertyClearFacet {
    /// Clear the value on `target`
    pub fn clear(&self, target: &ObjectHandle) -> InvocationResult<()> {
        self.aspect.invoke(target, &[], &[]).map(|_| ())
    }
}

/// Action body
#[derive(Debug, Clone)]
pub struct ActionInvocationFacet {
    /// Precedence
    pub precedence: Precedence,
    /// The action method
    pub aspect: ImperativeAspect,
    /// Declared return type
    pub return_type: TypeRef,
}
impl_facet!(ActionInvocationFacet, "action-invocation", [aspect, return_type], aspect);

impl ActionInvocationFacet {
    /// Run the action
    pub fn invoke(&self, target: &ObjectHandle, args: &[Value]) -> InvocationResult<Value> {
        self.aspect.invoke(target, args, &[])
    }
}

/// Friendly name; derived names rank LOW, markers HIGH
#[derive(Debug, Clone)]
pub struct NamedFacet {
    /// Precedence
    pub precedence: Precedence,
    /// The name
    pub text: String,
}
impl_facet!(NamedFacet, "named", [text]);

/// Description
#[derive(Debug, Clone)]
pub struct DescribedFacet {
    /// Precedence
    pub precedence: Precedence,
    /// The description
    pub text: String,
}
impl_facet!(DescribedFacet, "described", [text]);

/// Post-construct hook
#[derive(Debug, Clone)]
pub struct InitializationFacet {
    /// Precedence
    pub precedence: Precedence,
    /// The hook
    pub aspect: ImperativeAspect,
}
impl_facet!(InitializationFacet, "initialization", [aspect], aspect);

impl InitializationFacet {
    /// Run the hook on a fresh instance
    pub fn initialize(&self, target: &ObjectHandle) -> InvocationResult<()> {
        self.aspect.invoke(target, &[], &[]).map(|_| ())
    }
}

/// Domain event emitted on interaction with the feature
#[derive(Debug, Clone)]
pub struct DomainEventFacet {
    /// Precedence: EVENT when declared, LOW when inherited from the class
    pub precedence: Precedence,
    /// Event type name
    pub event: String,
}
impl_facet!(DomainEventFacet, "domain-event", [event]);

/// Whether a property can be edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Editing {
    /// Editable
    Enabled,
    /// Read-only
    Disabled,
}

/// Editability of a property
#[derive(Debug, Clone)]
pub struct EditabilityFacet {
    /// Precedence
    pub precedence: Precedence,
    /// Editing mode
    pub editing: Editing,
}
impl_facet!(EditabilityFacet, "editability", [editing]);

/// Class is a mixin contributing its main method to another type
#[derive(Debug, Clone)]
pub struct MixinFacet {
    /// Precedence
    pub precedence: Precedence,
    /// Type the mixin contributes to
    pub mixee: TypeName,
    /// Main method
    pub main: String,
}
impl_facet!(MixinFacet, "mixin", [mixee, main]);

/// Resolved introspection policy of a class
#[derive(Debug, Clone)]
pub struct IntrospectionPolicyFacet {
    /// Precedence
    pub precedence: Precedence,
    /// The policy
    pub policy: IntrospectionPolicy,
    /// Where it came from
    pub source: PolicySource,
}
impl_facet!(IntrospectionPolicyFacet, "introspection-policy", [policy]);

/// Class-level UI hints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiHint {
    /// `title()`
    Title,
    /// `iconName()`
    IconName,
    /// `cssClass()`
    CssClass,
    /// `layout()`
    Layout,
}

impl UiHint {
    /// Every hint
    pub const ALL: [UiHint; 4] = [UiHint::Title, UiHint::IconName, UiHint::CssClass, UiHint::Layout];

    /// Conventional method name
    pub fn method_name(self) -> &'static str {
        match self {
            UiHint::Title => "title",
            UiHint::IconName => "iconName",
            UiHint::CssClass => "cssClass",
            UiHint::Layout => "layout",
        }
    }

    /// Facet type for this hint
    pub fn facet_type(self) -> FacetType {
        match self {
            UiHint::Title => FacetType::new("ui.title"),
            UiHint::IconName => FacetType::new("ui.icon-name"),
            UiHint::CssClass => FacetType::new("ui.css-class"),
            UiHint::Layout => FacetType::new("ui.layout"),
        }
    }
}

/// UI hint computed by a class method; one facet type per [`UiHint`]
#[derive(Debug, Clone)]
pub struct UiHintFacet {
    /// Precedence
    pub precedence: Precedence,
    /// Which hint
    pub hint: UiHint,
    /// The hint method
    pub aspect: ImperativeAspect,
}

impl UiHintFacet {
    /// Hint text for `target`
    pub fn text(&self, target: &ObjectHandle) -> InvocationResult<Option<String>> {
        let value = self.aspect.invoke(target, &[], &[])?;
        as_reason(&self.aspect.method, value)
    }
}

impl Facet for UiHintFacet {
    fn facet_type(&self) -> FacetType {
        self.hint.facet_type()
    }

    fn precedence(&self) -> Precedence {
        self.precedence
    }

    fn semantically_equal(&self, other: &dyn Facet) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|o| o.hint == self.hint && o.aspect == self.aspect)
    }

    fn imperative(&self) -> Option<&ImperativeAspect> {
        Some(&self.aspect)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Persistence lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// Instance created
    Created,
    /// Instance loaded from storage
    Loaded,
    /// About to be persisted
    Persisting,
    /// Persisted
    Persisted,
    /// About to be updated
    Updating,
    /// Updated
    Updated,
    /// About to be removed
    Removing,
}

impl LifecycleEvent {
    /// Every event
    pub const ALL: [LifecycleEvent; 7] = [
        LifecycleEvent::Created,
        LifecycleEvent::Loaded,
        LifecycleEvent::Persisting,
        LifecycleEvent::Persisted,
        LifecycleEvent::Updating,
        LifecycleEvent::Updated,
        LifecycleEvent::Removing,
    ];

    /// Conventional callback method name
    pub fn method_name(self) -> &'static str {
        match self {
            LifecycleEvent::Created => "created",
            LifecycleEvent::Loaded => "loaded",
            LifecycleEvent::Persisting => "persisting",
            LifecycleEvent::Persisted => "persisted",
            LifecycleEvent::Updating => "updating",
            LifecycleEvent::Updated => "updated",
            LifecycleEvent::Removing => "removing",
        }
    }

    /// Facet type for this event
    pub fn facet_type(self) -> FacetType {
        match self {
            LifecycleEvent::Created => FacetType::new("lifecycle.created"),
            LifecycleEvent::Loaded => FacetType::new("lifecycle.loaded"),
            LifecycleEvent::Persisting => FacetType::new("lifecycle.persisting"),
            LifecycleEvent::Persisted => FacetType::new("lifecycle.persisted"),
            LifecycleEvent::Updating => FacetType::new("lifecycle.updating"),
            LifecycleEvent::Updated => FacetType::new("lifecycle.updated"),
            LifecycleEvent::Removing => FacetType::new("lifecycle.removing"),
        }
    }
}

/// Lifecycle callback; one facet type per [`LifecycleEvent`]
#[derive(Debug, Clone)]
pub struct LifecycleCallbackFacet {
    /// Precedence
    pub precedence: Precedence,
    /// Which event
    pub event: LifecycleEvent,
    /// The callback
    pub aspect: ImperativeAspect,
}

impl LifecycleCallbackFacet {
    /// Run the callback
    pub fn invoke(&self, target: &ObjectHandle) -> InvocationResult<()> {
        self.aspect.invoke(target, &[], &[]).map(|_| ())
    }
}

impl Facet for LifecycleCallbackFacet {
    fn facet_type(&self) -> FacetType {
        self.event.facet_type()
    }

    fn precedence(&self) -> Precedence {
        self.precedence
    }

    fn semantically_equal(&self, other: &dyn Facet) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|o| o.event == self.event && o.aspect == self.aspect)
    }

    fn imperative(&self) -> Option<&ImperativeAspect> {
        Some(&self.aspect)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
