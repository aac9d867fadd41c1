//! Factory: param-support
//!
//! Parameter-level supporting methods, located with the support search. For
//! parameter `N` of action `act`:
//!
//! - `defaultNAct`, `choicesNAct`, `hideNAct`, `disableNAct`: tuple or sweep
//! - `autoCompleteNAct`: tuple or sweep, with the search term as a trailing
//!   text parameter
//! - `validateNAct`: tuple or the parameter's own value
//!
//! Mixin main methods additionally accept `{prefix}{Param}`, `{prefix}{N}`.

use crate::error::FactoryResult;
use crate::facet::{
    AutoCompleteFacet, ChoicesFacet, DefaultedFacet, DisableForContextFacet, FacetHolder, HideForContextFacet,
    ImperativeAspect, Intent, Precedence, ValidateFacet,
};
use crate::factory::{FacetFactory, FactoryMeta, ParamContext};
use crate::feature::FeatureType;
use crate::finder::naming::{self, AUTO_COMPLETE, CHOICES, DEFAULT, DISABLE, HIDE, VALIDATE};
use crate::finder::ReturnRequirement;
use crate::support::{SearchAlgorithm, SupportRequest};
use crate::types::TypeRef;

/// Minimum search length for parameter auto-complete
const AUTO_COMPLETE_MIN_LENGTH: usize = 1;

const TUPLE_OR_SWEEP: &[SearchAlgorithm] = &[SearchAlgorithm::Tuple, SearchAlgorithm::Sweep];
const TUPLE_OR_SINGLE: &[SearchAlgorithm] = &[SearchAlgorithm::Tuple, SearchAlgorithm::SingleArgument];

/// One parameter-level support lookup
struct Lookup {
    prefix: &'static str,
    intent: Intent,
    returns: ReturnRequirement,
    algorithms: &'static [SearchAlgorithm],
    trailing: Vec<TypeRef>,
}

/// Parameter-level supporting methods.
pub struct ParameterSupport;

static META: FactoryMeta = FactoryMeta {
    name: "param-support",
    description: "default/choices/autoComplete/validate/hide/disable of action parameters",
    feature_types: &[FeatureType::ActionParameter],
};

impl ParameterSupport {
    fn lookups(param_type: &TypeRef) -> Vec<Lookup> {
        let element = param_type.element_type().unwrap_or(param_type).clone();
        vec![
            Lookup {
                prefix: DEFAULT,
                intent: Intent::Defaulting,
                returns: ReturnRequirement::Exact(param_type.clone()),
                algorithms: TUPLE_OR_SWEEP,
                trailing: Vec::new(),
            },
            Lookup {
                prefix: CHOICES,
                intent: Intent::ChoicesOrAutoComplete,
                returns: ReturnRequirement::ElementsOf(element.clone()),
                algorithms: TUPLE_OR_SWEEP,
                trailing: Vec::new(),
            },
            Lookup {
                prefix: AUTO_COMPLETE,
                intent: Intent::ChoicesOrAutoComplete,
                returns: ReturnRequirement::ElementsOf(element),
                algorithms: TUPLE_OR_SWEEP,
                trailing: vec![TypeRef::Text],
            },
            Lookup {
                prefix: VALIDATE,
                intent: Intent::ValidityCheck,
                returns: ReturnRequirement::TextLike,
                algorithms: TUPLE_OR_SINGLE,
                trailing: Vec::new(),
            },
            Lookup {
                prefix: HIDE,
                intent: Intent::VisibilityCheck,
                returns: ReturnRequirement::BooleanLike,
                algorithms: TUPLE_OR_SWEEP,
                trailing: Vec::new(),
            },
            Lookup {
                prefix: DISABLE,
                intent: Intent::EnablementCheck,
                returns: ReturnRequirement::TextLike,
                algorithms: TUPLE_OR_SWEEP,
                trailing: Vec::new(),
            },
        ]
    }
}

fn add(holder: &mut FacetHolder, prefix: &str, aspect: ImperativeAspect) {
    let precedence = Precedence::Default;
    match prefix {
        DEFAULT => holder.add_facet(DefaultedFacet { precedence, aspect }),
        CHOICES => holder.add_facet(ChoicesFacet { precedence, aspect }),
        AUTO_COMPLETE => holder.add_facet(AutoCompleteFacet {
            precedence,
            aspect,
            min_length: AUTO_COMPLETE_MIN_LENGTH,
        }),
        VALIDATE => holder.add_facet(ValidateFacet { precedence, aspect }),
        HIDE => holder.add_facet(HideForContextFacet { precedence, aspect }),
        _ => holder.add_facet(DisableForContextFacet { precedence, aspect }),
    };
}

impl FacetFactory for ParameterSupport {
    fn meta(&self) -> &FactoryMeta {
        &META
    }

    fn process_param(&self, ctx: &mut ParamContext<'_>) -> FactoryResult {
        let action_params = ctx.action.param_types();
        let owner = ctx.class.name.clone();

        for lookup in Self::lookups(&ctx.param.type_ref) {
            let conventions = naming::param_conventions(
                lookup.prefix,
                ctx.index,
                ctx.action_name,
                &ctx.param.name,
                ctx.is_mixin_main,
            );
            let request = SupportRequest::new(&owner, &action_params)
                .names(naming::candidates(&conventions))
                .target(ctx.index)
                .returns(lookup.returns)
                .algorithms(lookup.algorithms)
                .trailing(lookup.trailing);

            let hits = ctx.claim_support(&request);
            if let Some(aspect) = ImperativeAspect::from_hits(hits, lookup.intent) {
                add(ctx.holder, lookup.prefix, aspect);
            }
        }
        Ok(())
    }
}
