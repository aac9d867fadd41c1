//! Facets
//!
//! A facet is one atomic fact about a feature ("is hidden", "choices come
//! from `choices0PlaceOrder`"). Facets carry a [`FacetType`], a
//! [`Precedence`] and a semantic-equality test; several factories may
//! contribute facets of the same type and the [`FacetHolder`] picks one
//! winner per type.
//!
//! Facets backed by a supporting method expose an [`ImperativeAspect`]
//! naming the method(s) and the [`Intent`] they serve.

mod facets;
mod holder;

pub use facets::*;
pub use holder::{FacetHolder, FacetRanking};

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::catalog::MethodDescriptor;
use crate::error::InvocationResult;
use crate::support::{CallingConvention, SupportHit};
use crate::types::{ObjectHandle, Value};

/// Contribution precedence; higher wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    /// Inferred or fallback facts
    Low,
    /// Ordinary contributions
    Default,
    /// Explicit markers
    High,
    /// Domain-event facts
    Event,
}

/// Facet type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FacetType(&'static str);

impl FacetType {
    /// Create a facet type
    pub const fn new(id: &'static str) -> Self {
        Self(id)
    }

    /// Identifier string
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FacetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A fact about one feature
pub trait Facet: Any + Send + Sync + fmt::Debug {
    /// Type of this facet
    fn facet_type(&self) -> FacetType;

    /// Ranking precedence
    fn precedence(&self) -> Precedence;

    /// Whether `other` states the same fact, ignoring precedence
    fn semantically_equal(&self, other: &dyn Facet) -> bool;

    /// Supporting method(s) behind this facet, if any
    fn imperative(&self) -> Option<&ImperativeAspect> {
        None
    }

    /// Downcast support
    fn as_any(&self) -> &dyn Any;
}

/// Facets with a fixed type, enabling typed lookup via
/// [`FacetHolder::facet`]
pub trait FacetKind: Facet {
    /// The facet type
    const TYPE: FacetType;
}

/// What a supporting method is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Intent {
    /// `hideX`
    VisibilityCheck,
    /// `disableX`
    EnablementCheck,
    /// `validateX`
    ValidityCheck,
    /// `getX`
    Accessor,
    /// Action body
    Executor,
    /// `setX` / `modifyX` / `clearX`
    MutateProperty,
    /// `choicesX` / `autoCompleteX`
    ChoicesOrAutoComplete,
    /// `defaultX`
    Defaulting,
    /// Post-construct hook
    Initialization,
    /// `created`, `persisted`, ...
    LifecycleCallback,
    /// `title`, `iconName`, ...
    UiHint,
}

impl Intent {
    /// Short name used in diagnostics
    pub fn name(self) -> &'static str {
        match self {
            Intent::VisibilityCheck => "visibility-check",
            Intent::EnablementCheck => "enablement-check",
            Intent::ValidityCheck => "validity-check",
            Intent::Accessor => "accessor",
            Intent::Executor => "executor",
            Intent::MutateProperty => "mutate-property",
            Intent::ChoicesOrAutoComplete => "choices-or-auto-complete",
            Intent::Defaulting => "defaulting",
            Intent::Initialization => "initialization",
            Intent::LifecycleCallback => "lifecycle-callback",
            Intent::UiHint => "ui-hint",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Supporting method(s) referenced by a facet, tagged with their intent
#[derive(Debug, Clone)]
pub struct ImperativeAspect {
    /// The method invoked
    pub method: Arc<MethodDescriptor>,
    /// Further methods found for the same intent (ambiguity)
    pub also_found: Vec<Arc<MethodDescriptor>>,
    /// What the method is used for
    pub intent: Intent,
    /// How live arguments map onto the method's parameters
    pub convention: CallingConvention,
}

impl ImperativeAspect {
    /// Aspect for a method called with arguments passed through unchanged
    pub fn new(method: Arc<MethodDescriptor>, intent: Intent) -> Self {
        Self {
            method,
            also_found: Vec::new(),
            intent,
            convention: CallingConvention::Direct,
        }
    }

    /// Aspect for the hits of a support search; `None` if there were none.
    /// The first hit is invoked, the rest are kept for the ambiguity check.
    pub fn from_hits(hits: Vec<SupportHit>, intent: Intent) -> Option<Self> {
        let mut hits = hits.into_iter();
        let first = hits.next()?;
        Some(Self {
            method: first.method,
            also_found: hits.map(|h| h.method).collect(),
            intent,
            convention: first.convention,
        })
    }

    /// Every method referenced, primary first
    pub fn methods(&self) -> impl Iterator<Item = &Arc<MethodDescriptor>> {
        std::iter::once(&self.method).chain(self.also_found.iter())
    }

    /// Invoke the primary method with live arguments
    pub fn invoke(&self, target: &ObjectHandle, args: &[Value], trailing: &[Value]) -> InvocationResult<Value> {
        let args = self.convention.build_args(args, trailing)?;
        self.method.invoke(target, &args)
    }
}

impl PartialEq for ImperativeAspect {
    fn eq(&self, other: &Self) -> bool {
        self.intent == other.intent && self.method == other.method && self.also_found == other.also_found
    }
}

/// A well-known facet type and what it means
#[derive(Debug, Clone, Copy)]
pub struct FacetTypeInfo {
    /// Identifier
    pub facet_type: FacetType,
    /// Feature kinds it appears on
    pub applies_to: &'static str,
    /// Description for downstream consumers
    pub description: &'static str,
}

/// Registry of the facet types the default programming model produces
pub static WELL_KNOWN_FACET_TYPES: Lazy<Vec<FacetTypeInfo>> = Lazy::new(|| {
    let info = |facet_type: FacetType, applies_to: &'static str, description: &'static str| FacetTypeInfo {
        facet_type,
        applies_to,
        description,
    };
    let mut types = vec![
        info(HiddenFacet::TYPE, "member, parameter", "always hidden"),
        info(HideForContextFacet::TYPE, "member, parameter", "visibility decided by a hide method"),
        info(DisabledFacet::TYPE, "member, parameter", "always disabled, with reason"),
        info(DisableForContextFacet::TYPE, "member, parameter", "enablement decided by a disable method"),
        info(ValidateFacet::TYPE, "property, action, parameter", "proposed values checked by a validate method"),
        info(DefaultedFacet::TYPE, "property, parameter", "default value from a default method"),
        info(ChoicesFacet::TYPE, "property, parameter", "fixed choices from a choices method"),
        info(AutoCompleteFacet::TYPE, "property, parameter", "choices matching a search term"),
        info(AccessorFacet::TYPE, "property, collection", "value read through a getter"),
        info(ElementTypeFacet::TYPE, "collection", "element type of a collection"),
        info(PropertySetterFacet::TYPE, "property", "value written through a setter or modify method"),
        info(PropertyClearFacet::TYPE, "property", "value cleared through a clear method"),
        info(ActionInvocationFacet::TYPE, "action", "action body"),
        info(NamedFacet::TYPE, "any", "friendly name"),
        info(DescribedFacet::TYPE, "any", "description"),
        info(InitializationFacet::TYPE, "type", "post-construct hook"),
        info(DomainEventFacet::TYPE, "type, member", "domain event emitted on interaction"),
        info(EditabilityFacet::TYPE, "property", "whether the property can be edited"),
        info(MixinFacet::TYPE, "type", "mixin contributing to another type"),
        info(IntrospectionPolicyFacet::TYPE, "type", "resolved introspection policy"),
    ];
    for hint in UiHint::ALL {
        types.push(info(hint.facet_type(), "type", "UI hint from a class method"));
    }
    for event in LifecycleEvent::ALL {
        types.push(info(event.facet_type(), "type", "lifecycle callback"));
    }
    types
});

/// Look up a well-known facet type by identifier
pub fn well_known(id: &str) -> Option<&'static FacetTypeInfo> {
    WELL_KNOWN_FACET_TYPES.iter().find(|i| i.facet_type.as_str() == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_order() {
        assert!(Precedence::Low < Precedence::Default);
        assert!(Precedence::Default < Precedence::High);
        assert!(Precedence::High < Precedence::Event);
    }

    #[test]
    fn test_registry_lookup() {
        assert_eq!(well_known("hidden").map(|i| i.facet_type), Some(HiddenFacet::TYPE));
        assert!(well_known("lifecycle.persisted").is_some());
        assert!(well_known("ui.title").is_some());
        assert!(well_known("nonsense").is_none());
    }

    #[test]
    fn test_registry_identifiers_unique() {
        let mut ids: Vec<&str> = WELL_KNOWN_FACET_TYPES.iter().map(|i| i.facet_type.as_str()).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}
