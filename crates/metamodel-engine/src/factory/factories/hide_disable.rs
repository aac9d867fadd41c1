//! Factories: hide-method, disable-method
//!
//! `hideX()` returning a boolean hides member `X` for the current target;
//! `disableX()` returning a text gives the reason it is disabled (null means
//! enabled). Mixin main methods also accept bare `hide()` / `disable()`.

use crate::error::FactoryResult;
use crate::facet::{DisableForContextFacet, HideForContextFacet, Intent, Precedence};
use crate::factory::{FacetFactory, FactoryMeta, MethodContext};
use crate::feature::FeatureType;
use crate::finder::naming::{self, DISABLE, HIDE};
use crate::finder::{MethodQuery, ReturnRequirement};

use super::prefix_aspect;

fn query(ctx: &MethodContext<'_>, prefix: &'static str, returns: ReturnRequirement) -> MethodQuery {
    let conventions = naming::member_conventions(prefix, ctx.member_name, ctx.is_mixin_main);
    MethodQuery::support(&ctx.class.name)
        .names(naming::candidates(&conventions))
        .returns(returns)
}

/// Binds `hideX()` to the member.
pub struct HideMethod;

static HIDE_META: FactoryMeta = FactoryMeta {
    name: "hide-method",
    description: "hideX() supporting methods",
    feature_types: &[FeatureType::Property, FeatureType::Collection, FeatureType::Action],
};

impl FacetFactory for HideMethod {
    fn meta(&self) -> &FactoryMeta {
        &HIDE_META
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) -> FactoryResult {
        let query = query(ctx, HIDE, ReturnRequirement::BooleanLike);
        let found = ctx.claim(&query);
        if let Some(aspect) = prefix_aspect(found, Intent::VisibilityCheck, 0) {
            ctx.holder.add_facet(HideForContextFacet {
                precedence: Precedence::Default,
                aspect,
            });
        }
        Ok(())
    }
}

/// Binds `disableX()` to the member.
pub struct DisableMethod;

static DISABLE_META: FactoryMeta = FactoryMeta {
    name: "disable-method",
    description: "disableX() supporting methods",
    feature_types: &[FeatureType::Property, FeatureType::Collection, FeatureType::Action],
};

impl FacetFactory for DisableMethod {
    fn meta(&self) -> &FactoryMeta {
        &DISABLE_META
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) -> FactoryResult {
        let query = query(ctx, DISABLE, ReturnRequirement::TextLike);
        let found = ctx.claim(&query);
        if let Some(aspect) = prefix_aspect(found, Intent::EnablementCheck, 0) {
            ctx.holder.add_facet(DisableForContextFacet {
                precedence: Precedence::Default,
                aspect,
            });
        }
        Ok(())
    }
}
