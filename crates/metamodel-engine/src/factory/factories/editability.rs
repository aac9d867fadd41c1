//! Factory: editability
//!
//! `Property{editable}` on the getter or backing field decides at HIGH
//! precedence. Otherwise a property with a setter is editable and one
//! without is read-only.

use crate::catalog::Marker;
use crate::error::FactoryResult;
use crate::facet::{EditabilityFacet, Editing, Precedence, PropertySetterFacet};
use crate::factory::{FacetFactory, FactoryMeta, MethodContext};
use crate::feature::FeatureType;

use super::markers::member_markers;

/// Editable or read-only, from markers or the presence of a setter.
pub struct Editability;

static META: FactoryMeta = FactoryMeta {
    name: "editability",
    description: "Whether a property is editable",
    feature_types: &[FeatureType::Property],
};

impl FacetFactory for Editability {
    fn meta(&self) -> &FactoryMeta {
        &META
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) -> FactoryResult {
        if ctx.feature_type != FeatureType::Property {
            return Ok(());
        }
        let explicit = member_markers(ctx).into_iter().find_map(|m| match m {
            Marker::Property { editable } => editable,
            _ => None,
        });
        let (precedence, editing) = match explicit {
            Some(true) => (Precedence::High, Editing::Enabled),
            Some(false) => (Precedence::High, Editing::Disabled),
            None if ctx.holder.facet::<PropertySetterFacet>().is_some() => (Precedence::Default, Editing::Enabled),
            None => (Precedence::Low, Editing::Disabled),
        };
        ctx.holder.add_facet(EditabilityFacet { precedence, editing });
        Ok(())
    }
}
