//! Factories: hidden-marker, disabled-marker
//!
//! Static `Hidden` / `Disabled(reason)` markers on the member's method, its
//! backing field or a parameter.

use crate::catalog::{Marker, MarkerKind};
use crate::error::FactoryResult;
use crate::facet::{DisabledFacet, HiddenFacet, Precedence};
use crate::factory::{FacetFactory, FactoryMeta, MethodContext, ParamContext};
use crate::feature::FeatureType;

/// Markers of the member's method plus those of its backing field
pub(super) fn member_markers(ctx: &MethodContext<'_>) -> Vec<Marker> {
    let mut markers = ctx.method.markers.clone();
    if ctx.feature_type != FeatureType::Action {
        if let Some(field) = ctx.finder.index().field_for_getter(&ctx.class.name, ctx.method) {
            markers.extend(field.markers);
        }
    }
    markers
}

/// `Hidden` marker on a member, its field or a parameter.
pub struct HiddenMarker;

static HIDDEN_META: FactoryMeta = FactoryMeta {
    name: "hidden-marker",
    description: "Members and parameters marked Hidden",
    feature_types: &[
        FeatureType::Property,
        FeatureType::Collection,
        FeatureType::Action,
        FeatureType::ActionParameter,
    ],
};

impl FacetFactory for HiddenMarker {
    fn meta(&self) -> &FactoryMeta {
        &HIDDEN_META
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) -> FactoryResult {
        if member_markers(ctx).iter().any(|m| m.kind() == MarkerKind::Hidden) {
            ctx.holder.add_facet(HiddenFacet {
                precedence: Precedence::High,
            });
        }
        Ok(())
    }

    fn process_param(&self, ctx: &mut ParamContext<'_>) -> FactoryResult {
        if ctx.param.markers.iter().any(|m| m.kind() == MarkerKind::Hidden) {
            ctx.holder.add_facet(HiddenFacet {
                precedence: Precedence::High,
            });
        }
        Ok(())
    }
}

/// `Disabled(reason)` marker on a member or its field.
pub struct DisabledMarker;

static DISABLED_META: FactoryMeta = FactoryMeta {
    name: "disabled-marker",
    description: "Members marked Disabled with a fixed reason",
    feature_types: &[FeatureType::Property, FeatureType::Collection, FeatureType::Action],
};

impl FacetFactory for DisabledMarker {
    fn meta(&self) -> &FactoryMeta {
        &DISABLED_META
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) -> FactoryResult {
        let reason = member_markers(ctx).into_iter().find_map(|m| match m {
            Marker::Disabled(reason) => Some(reason),
            _ => None,
        });
        if let Some(reason) = reason {
            ctx.holder.add_facet(DisabledFacet {
                precedence: Precedence::High,
                reason,
            });
        }
        Ok(())
    }
}
