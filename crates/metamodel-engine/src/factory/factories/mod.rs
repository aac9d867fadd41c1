//! Factory registry: the default programming model's facet factories.

pub mod accessor;
pub mod action;
pub mod domain_event;
pub mod editability;
pub mod hide_disable;
pub mod lifecycle;
pub mod markers;
pub mod named;
pub mod param_support;
pub mod programmatic;
pub mod property_support;
pub mod setter;
pub mod ui_hints;

use std::sync::Arc;

use super::FacetFactory;
use crate::catalog::MethodDescriptor;
use crate::facet::{ImperativeAspect, Intent};
use crate::support::CallingConvention;

/// Aspect over claimed member-level supporting methods, called with the
/// first `arity` caller arguments
pub(crate) fn prefix_aspect(
    methods: Vec<Arc<MethodDescriptor>>,
    intent: Intent,
    arity: usize,
) -> Option<ImperativeAspect> {
    let mut methods = methods.into_iter();
    let method = methods.next()?;
    Some(ImperativeAspect {
        method,
        also_found: methods.collect(),
        intent,
        convention: CallingConvention::Prefix { arity },
    })
}

/// Returns the default factories in processing order.
pub fn all_factories() -> Vec<Box<dyn FacetFactory>> {
    vec![
        // Class level
        Box::new(programmatic::RemoveProgrammatic),
        Box::new(lifecycle::LifecycleCallbacks),
        Box::new(ui_hints::UiHints),
        // Accessors and mutators
        Box::new(accessor::PropertyAccessor),
        Box::new(accessor::CollectionAccessor),
        Box::new(setter::PropertySetter),
        // Naming and static markers
        Box::new(named::MemberNamed),
        Box::new(markers::HiddenMarker),
        Box::new(markers::DisabledMarker),
        // Supporting methods
        Box::new(hide_disable::HideMethod),
        Box::new(hide_disable::DisableMethod),
        Box::new(property_support::PropertyValidate),
        Box::new(property_support::PropertyDefault),
        Box::new(property_support::PropertyChoices),
        Box::new(property_support::PropertyAutoComplete),
        Box::new(action::ActionInvocation),
        Box::new(action::ActionValidate),
        Box::new(param_support::ParameterSupport),
        // Derived facts
        Box::new(domain_event::DomainEvent),
        Box::new(editability::Editability),
    ]
}
