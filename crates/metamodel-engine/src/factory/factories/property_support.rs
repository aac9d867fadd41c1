//! Factories: property-validate, property-default, property-choices,
//! property-autocomplete
//!
//! Property-level supporting methods:
//!
//! | method              | parameters | returns              |
//! |---------------------|------------|----------------------|
//! | `validateX(T)`      | value      | text (null = valid)  |
//! | `defaultX()`        | none       | `T`                  |
//! | `choicesX()`        | none       | collection of `T`    |
//! | `autoCompleteX(s)`  | search     | collection of `T`    |

use crate::error::FactoryResult;
use crate::facet::{AutoCompleteFacet, ChoicesFacet, DefaultedFacet, Intent, Precedence, ValidateFacet};
use crate::factory::{FacetFactory, FactoryMeta, MethodContext};
use crate::feature::FeatureType;
use crate::finder::naming::{self, AUTO_COMPLETE, CHOICES, DEFAULT, VALIDATE};
use crate::finder::{MethodQuery, ReturnRequirement};
use crate::types::TypeRef;

use super::prefix_aspect;

/// Minimum search length for property auto-complete
const AUTO_COMPLETE_MIN_LENGTH: usize = 1;

fn query(ctx: &MethodContext<'_>, prefix: &'static str, returns: ReturnRequirement) -> MethodQuery {
    let conventions = naming::member_conventions(prefix, ctx.member_name, ctx.is_mixin_main);
    MethodQuery::support(&ctx.class.name)
        .names(naming::candidates(&conventions))
        .returns(returns)
}

/// `validateX(value)`
pub struct PropertyValidate;

static VALIDATE_META: FactoryMeta = FactoryMeta {
    name: "property-validate",
    description: "validateX(value) supporting methods",
    feature_types: &[FeatureType::Property],
};

impl FacetFactory for PropertyValidate {
    fn meta(&self) -> &FactoryMeta {
        &VALIDATE_META
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) -> FactoryResult {
        if ctx.feature_type != FeatureType::Property {
            return Ok(());
        }
        let value_type = ctx.method.return_type.clone();
        let query = query(ctx, VALIDATE, ReturnRequirement::TextLike).params(vec![value_type]);
        let found = ctx.claim(&query);
        if let Some(aspect) = prefix_aspect(found, Intent::ValidityCheck, 1) {
            ctx.holder.add_facet(ValidateFacet {
                precedence: Precedence::Default,
                aspect,
            });
        }
        Ok(())
    }
}

/// `defaultX()`
pub struct PropertyDefault;

static DEFAULT_META: FactoryMeta = FactoryMeta {
    name: "property-default",
    description: "defaultX() supporting methods",
    feature_types: &[FeatureType::Property],
};

impl FacetFactory for PropertyDefault {
    fn meta(&self) -> &FactoryMeta {
        &DEFAULT_META
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) -> FactoryResult {
        if ctx.feature_type != FeatureType::Property {
            return Ok(());
        }
        let value_type = ctx.method.return_type.clone();
        let query = query(ctx, DEFAULT, ReturnRequirement::Exact(value_type));
        let found = ctx.claim(&query);
        if let Some(aspect) = prefix_aspect(found, Intent::Defaulting, 0) {
            ctx.holder.add_facet(DefaultedFacet {
                precedence: Precedence::Default,
                aspect,
            });
        }
        Ok(())
    }
}

/// `choicesX()`
pub struct PropertyChoices;

static CHOICES_META: FactoryMeta = FactoryMeta {
    name: "property-choices",
    description: "choicesX() supporting methods",
    feature_types: &[FeatureType::Property],
};

impl FacetFactory for PropertyChoices {
    fn meta(&self) -> &FactoryMeta {
        &CHOICES_META
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) -> FactoryResult {
        if ctx.feature_type != FeatureType::Property {
            return Ok(());
        }
        let value_type = ctx.method.return_type.clone();
        let query = query(ctx, CHOICES, ReturnRequirement::ElementsOf(value_type));
        let found = ctx.claim(&query);
        if let Some(aspect) = prefix_aspect(found, Intent::ChoicesOrAutoComplete, 0) {
            ctx.holder.add_facet(ChoicesFacet {
                precedence: Precedence::Default,
                aspect,
            });
        }
        Ok(())
    }
}

/// `autoCompleteX(search)`
pub struct PropertyAutoComplete;

static AUTO_COMPLETE_META: FactoryMeta = FactoryMeta {
    name: "property-autocomplete",
    description: "autoCompleteX(search) supporting methods",
    feature_types: &[FeatureType::Property],
};

impl FacetFactory for PropertyAutoComplete {
    fn meta(&self) -> &FactoryMeta {
        &AUTO_COMPLETE_META
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) -> FactoryResult {
        if ctx.feature_type != FeatureType::Property {
            return Ok(());
        }
        let value_type = ctx.method.return_type.clone();
        let query = query(ctx, AUTO_COMPLETE, ReturnRequirement::ElementsOf(value_type)).params(vec![TypeRef::Text]);
        let found = ctx.claim(&query);
        // The search term is appended as a trailing argument
        if let Some(aspect) = prefix_aspect(found, Intent::ChoicesOrAutoComplete, 0) {
            ctx.holder.add_facet(AutoCompleteFacet {
                precedence: Precedence::Default,
                aspect,
                min_length: AUTO_COMPLETE_MIN_LENGTH,
            });
        }
        Ok(())
    }
}
