//! Factory: property-setter
//!
//! `setX(T)` contributes a setter facet at DEFAULT precedence, `modifyX(T)`
//! one at HIGH precedence so it wins when both exist. `clearX()` contributes
//! the clear facet.

use crate::error::FactoryResult;
use crate::facet::{ImperativeAspect, Intent, Precedence, PropertyClearFacet, PropertySetterFacet};
use crate::factory::{FacetFactory, FactoryMeta, MethodContext};
use crate::feature::FeatureType;
use crate::finder::naming::{self, CLEAR, MODIFY, SET};
use crate::finder::{MethodQuery, ReturnRequirement};

/// Binds `setX` / `modifyX` / `clearX` mutators to a property.
pub struct PropertySetter;

static META: FactoryMeta = FactoryMeta {
    name: "property-setter",
    description: "setX / modifyX / clearX mutators of a property",
    feature_types: &[FeatureType::Property],
};

impl FacetFactory for PropertySetter {
    fn meta(&self) -> &FactoryMeta {
        &META
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) -> FactoryResult {
        if ctx.feature_type != FeatureType::Property {
            return Ok(());
        }
        let owner = ctx.class.name.clone();
        let cap = naming::capitalize(ctx.member_name);
        let value_type = ctx.method.return_type.clone();

        for (prefix, precedence) in [(SET, Precedence::Default), (MODIFY, Precedence::High)] {
            let query = MethodQuery::support(&owner)
                .name(format!("{}{}", prefix, cap))
                .returns(ReturnRequirement::Void)
                .params(vec![value_type.clone()]);
            if let Some(method) = ctx.claim(&query).into_iter().next() {
                ctx.holder.add_facet(PropertySetterFacet {
                    precedence,
                    aspect: ImperativeAspect::new(method, Intent::MutateProperty),
                });
            }
        }

        let clear = MethodQuery::support(&owner)
            .name(format!("{}{}", CLEAR, cap))
            .returns(ReturnRequirement::Void);
        if let Some(method) = ctx.claim(&clear).into_iter().next() {
            ctx.holder.add_facet(PropertyClearFacet {
                precedence: Precedence::Default,
                aspect: ImperativeAspect::new(method, Intent::MutateProperty),
            });
        }
        Ok(())
    }
}
