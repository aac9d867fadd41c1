//! Factories: action-invocation, action-validate

use crate::error::FactoryResult;
use crate::facet::{ActionInvocationFacet, ImperativeAspect, Intent, Precedence, ValidateFacet};
use crate::factory::{FacetFactory, FactoryMeta, MethodContext};
use crate::feature::FeatureType;
use crate::finder::naming::{self, VALIDATE};
use crate::finder::ReturnRequirement;
use crate::support::{SearchAlgorithm, SupportRequest};

/// Makes the action method invocable.
pub struct ActionInvocation;

static INVOCATION_META: FactoryMeta = FactoryMeta {
    name: "action-invocation",
    description: "Executor facet for actions",
    feature_types: &[FeatureType::Action],
};

impl FacetFactory for ActionInvocation {
    fn meta(&self) -> &FactoryMeta {
        &INVOCATION_META
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) -> FactoryResult {
        if ctx.feature_type != FeatureType::Action {
            return Ok(());
        }
        ctx.holder.add_facet(ActionInvocationFacet {
            precedence: Precedence::Default,
            aspect: ImperativeAspect::new(ctx.method.clone(), Intent::Executor),
            return_type: ctx.method.return_type.clone(),
        });
        Ok(())
    }
}

/// `validateAct(..)` taking the action's full signature, or a tuple of it.
/// Returns a text reason; null means the arguments are valid.
pub struct ActionValidate;

static VALIDATE_META: FactoryMeta = FactoryMeta {
    name: "action-validate",
    description: "validateX(..) supporting methods of actions",
    feature_types: &[FeatureType::Action],
};

impl FacetFactory for ActionValidate {
    fn meta(&self) -> &FactoryMeta {
        &VALIDATE_META
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) -> FactoryResult {
        if ctx.feature_type != FeatureType::Action {
            return Ok(());
        }
        let params = ctx.method.param_types();
        let algorithms: &[SearchAlgorithm] = if params.is_empty() {
            &[SearchAlgorithm::Sweep]
        } else {
            &[SearchAlgorithm::Tuple, SearchAlgorithm::Sweep]
        };
        let conventions = naming::member_conventions(VALIDATE, ctx.member_name, ctx.is_mixin_main);
        let request = SupportRequest::new(&ctx.class.name, &params)
            .names(naming::candidates(&conventions))
            .returns(ReturnRequirement::TextLike)
            .algorithms(algorithms);

        let hits = ctx.claim_support(&request);
        if let Some(aspect) = ImperativeAspect::from_hits(hits, Intent::ValidityCheck) {
            ctx.holder.add_facet(ValidateFacet {
                precedence: Precedence::Default,
                aspect,
            });
        }
        Ok(())
    }
}
