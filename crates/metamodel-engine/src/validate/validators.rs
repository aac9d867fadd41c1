//! Built-in validators of the default programming model.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use super::{FailureKind, MetaModelValidator, ValidationContext, ValidationFailure, ValidatorMeta};
use crate::catalog::{MethodDescriptor, Visibility};
use crate::feature::ObjectSpecification;
use crate::finder::{naming, MethodFinder, SearchScope};
use crate::policy::MemberMarkerPolicy;

/// Returns the default validators in run order.
pub fn all_validators() -> Vec<Box<dyn MetaModelValidator>> {
    vec![
        Box::new(MarkerConstraint),
        Box::new(OrphanMethod),
        Box::new(Ambiguity),
        Box::new(UnmarkedMember),
    ]
}

fn visibility_name(visibility: Visibility) -> &'static str {
    match visibility {
        Visibility::Public => "public",
        Visibility::Protected => "protected",
        Visibility::PackagePrivate => "package-private",
        Visibility::Private => "private",
    }
}

/// Methods carrying `Action`, `Property`, `Collection` or `MemberSupport`
/// that no factory claimed.
pub struct MarkerConstraint;

static MARKER_CONSTRAINT_META: ValidatorMeta = ValidatorMeta {
    name: "marker-constraint",
    code: "M1001",
    description: "Marked members must contribute to the metamodel",
};

impl MarkerConstraint {
    fn unmet_constraint(spec: &ObjectSpecification, method: &MethodDescriptor) -> String {
        if !spec.policy.allows_visibility(method.visibility) {
            return format!(
                "is {} but policy {} only introspects public members",
                visibility_name(method.visibility),
                spec.policy
            );
        }
        if method.is_static {
            return "is static".to_string();
        }
        "has a shape no factory recognizes".to_string()
    }
}

impl MetaModelValidator for MarkerConstraint {
    fn meta(&self) -> &ValidatorMeta {
        &MARKER_CONSTRAINT_META
    }

    fn validate(&self, spec: &ObjectSpecification, _ctx: &ValidationContext<'_>) -> Vec<ValidationFailure> {
        spec.unclaimed_methods
            .iter()
            .filter_map(|method| {
                let marker = method.markers.iter().find(|m| m.requires_contribution())?;
                Some(self.failure(
                    spec,
                    method.id().to_string(),
                    FailureKind::Configuration,
                    format!(
                        "{} is marked {:?} but {}",
                        method.id(),
                        marker.kind(),
                        Self::unmet_constraint(spec, method)
                    ),
                ))
            })
            .collect()
    }
}

/// Methods shaped like supporting methods or mutators (`hideX`, `setX`, ...)
/// that no factory claimed.
pub struct OrphanMethod;

static ORPHAN_META: ValidatorMeta = ValidatorMeta {
    name: "orphan-method",
    code: "M1002",
    description: "Convention-named methods must support a member",
};

impl MetaModelValidator for OrphanMethod {
    fn meta(&self) -> &ValidatorMeta {
        &ORPHAN_META
    }

    fn validate(&self, spec: &ObjectSpecification, ctx: &ValidationContext<'_>) -> Vec<ValidationFailure> {
        let finder = MethodFinder::new(ctx.index, spec.policy);
        let convention_named: Vec<Arc<MethodDescriptor>> = naming::SUPPORT_PREFIXES
            .iter()
            .chain(naming::MUTATOR_PREFIXES)
            .flat_map(|prefix| finder.find_prefixed(spec.type_name(), prefix, SearchScope::Support))
            .collect();

        spec.unclaimed_methods
            .iter()
            .filter(|m| !m.is_static && convention_named.contains(*m))
            // Marked methods are reported by the marker constraint
            .filter(|m| !m.markers.iter().any(|k| k.requires_contribution()))
            .map(|method| {
                self.failure(
                    spec,
                    method.id().to_string(),
                    FailureKind::Orphan,
                    format!(
                        "{} looks like a supporting method but matches no member of {}",
                        method.name,
                        spec.type_name()
                    ),
                )
            })
            .collect()
    }
}

/// Several supporting methods found for one intent, or one method bound to
/// aspects with different intents.
pub struct Ambiguity;

static AMBIGUITY_META: ValidatorMeta = ValidatorMeta {
    name: "ambiguity",
    code: "M1003",
    description: "Each intent must resolve to a single supporting method",
};

impl MetaModelValidator for Ambiguity {
    fn meta(&self) -> &ValidatorMeta {
        &AMBIGUITY_META
    }

    fn validate(&self, spec: &ObjectSpecification, _ctx: &ValidationContext<'_>) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();
        let mut holders = vec![&spec.holder];
        holders.extend(spec.member_holders());

        for holder in holders {
            let origin = holder.identifier().to_string();
            let mut checked = FxHashSet::default();
            for (facet_type, aspect) in holder.imperative_aspects() {
                if !aspect.also_found.is_empty() {
                    let names: Vec<String> = aspect.methods().map(|m| m.name.clone()).collect();
                    failures.push(self.failure(
                        spec,
                        origin.clone(),
                        FailureKind::Ambiguity,
                        format!(
                            "{} candidates for {} ({}): {}",
                            names.len(),
                            aspect.intent,
                            facet_type,
                            names.join(", ")
                        ),
                    ));
                }
                for method in aspect.methods() {
                    if !checked.insert(method.id()) {
                        continue;
                    }
                    if let Err(e) = holder.imperative_intent(method) {
                        failures.push(self.failure(spec, origin.clone(), FailureKind::Ambiguity, e.to_string()));
                    }
                }
            }
        }
        failures
    }
}

/// Public methods ignored because the policy requires member markers.
/// Only active when `report-unmarked-members` is configured.
pub struct UnmarkedMember;

static UNMARKED_META: ValidatorMeta = ValidatorMeta {
    name: "unmarked-member",
    code: "M1004",
    description: "Public methods that look like actions but carry no marker",
};

impl MetaModelValidator for UnmarkedMember {
    fn meta(&self) -> &ValidatorMeta {
        &UNMARKED_META
    }

    fn validate(&self, spec: &ObjectSpecification, ctx: &ValidationContext<'_>) -> Vec<ValidationFailure> {
        if !ctx.config.report_unmarked_members || spec.policy.member_markers() != MemberMarkerPolicy::Required {
            return Vec::new();
        }
        spec.unclaimed_methods
            .iter()
            .filter(|m| m.visibility.is_public() && !m.is_static)
            .filter(|m| !naming::is_reserved(&m.name))
            .filter(|m| !m.markers.iter().any(|k| k.requires_contribution()))
            .map(|method| {
                self.failure(
                    spec,
                    method.id().to_string(),
                    FailureKind::Configuration,
                    format!(
                        "{} is public but ignored: policy {} requires an Action, Property or Collection marker",
                        method.name, spec.policy
                    ),
                )
            })
            .collect()
    }
}
