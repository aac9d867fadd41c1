//! Factory: ui-hints
//!
//! `title()`, `iconName()`, `cssClass()` and `layout()` returning text become
//! UI-hint facets. The class name and `Named`/`Description` class markers
//! become the type's name and description.

use crate::catalog::Marker;
use crate::error::FactoryResult;
use crate::facet::{DescribedFacet, ImperativeAspect, Intent, NamedFacet, Precedence, UiHint, UiHintFacet};
use crate::factory::{ClassContext, FacetFactory, FactoryMeta};
use crate::feature::FeatureType;
use crate::finder::naming;
use crate::finder::{MethodQuery, ReturnRequirement};

/// Title, icon, CSS class and layout hints of a type.
pub struct UiHints;

static META: FactoryMeta = FactoryMeta {
    name: "ui-hints",
    description: "Title, icon, CSS class and layout methods; class naming",
    feature_types: &[FeatureType::Type],
};

impl FacetFactory for UiHints {
    fn meta(&self) -> &FactoryMeta {
        &META
    }

    fn process_class(&self, ctx: &mut ClassContext<'_>) -> FactoryResult {
        let owner = ctx.class.name.clone();

        for hint in UiHint::ALL {
            let query = MethodQuery::support(&owner)
                .name(hint.method_name())
                .returns(ReturnRequirement::TextLike);
            if let Some(method) = ctx.claim(&query).into_iter().next() {
                ctx.holder.add_facet(UiHintFacet {
                    precedence: Precedence::Default,
                    hint,
                    aspect: ImperativeAspect::new(method, Intent::UiHint),
                });
            }
        }

        ctx.holder.add_facet(NamedFacet {
            precedence: Precedence::Low,
            text: naming::friendly_name(owner.simple_name()),
        });
        for marker in &ctx.class.markers {
            match marker {
                Marker::Named(text) => {
                    ctx.holder.add_facet(NamedFacet {
                        precedence: Precedence::High,
                        text: text.clone(),
                    });
                }
                Marker::Description(text) => {
                    ctx.holder.add_facet(DescribedFacet {
                        precedence: Precedence::High,
                        text: text.clone(),
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }
}
