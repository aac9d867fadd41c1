//! Factory: member-named
//!
//! Every member and parameter gets a name derived from its identifier at LOW
//! precedence. `Named` / `Description` markers (on the method, the backing
//! field or the parameter) contribute at HIGH precedence and win.

use crate::catalog::Marker;
use crate::error::FactoryResult;
use crate::facet::{DescribedFacet, FacetHolder, NamedFacet, Precedence};
use crate::factory::{FacetFactory, FactoryMeta, MethodContext, ParamContext};
use crate::feature::FeatureType;
use crate::finder::naming;

use super::markers::member_markers;

/// Friendly names: explicit markers win over names derived from the member.
pub struct MemberNamed;

static META: FactoryMeta = FactoryMeta {
    name: "member-named",
    description: "Friendly names and descriptions of members and parameters",
    feature_types: &[
        FeatureType::Property,
        FeatureType::Collection,
        FeatureType::Action,
        FeatureType::ActionParameter,
    ],
};

fn contribute(holder: &mut FacetHolder, identifier: &str, markers: &[Marker]) {
    holder.add_facet(NamedFacet {
        precedence: Precedence::Low,
        text: naming::friendly_name(identifier),
    });
    for marker in markers {
        match marker {
            Marker::Named(text) => {
                holder.add_facet(NamedFacet {
                    precedence: Precedence::High,
                    text: text.clone(),
                });
            }
            Marker::Description(text) => {
                holder.add_facet(DescribedFacet {
                    precedence: Precedence::High,
                    text: text.clone(),
                });
            }
            _ => {}
        }
    }
}

impl FacetFactory for MemberNamed {
    fn meta(&self) -> &FactoryMeta {
        &META
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) -> FactoryResult {
        let markers = member_markers(ctx);
        // A mixin's main method is named after the mixin class: `Order_cancel` -> `cancel`
        let identifier = if ctx.is_mixin_main {
            let simple = ctx.class.name.simple_name();
            simple.rsplit('_').next().unwrap_or(simple).to_string()
        } else {
            ctx.member_name.to_string()
        };
        contribute(ctx.holder, &identifier, &markers);
        Ok(())
    }

    fn process_param(&self, ctx: &mut ParamContext<'_>) -> FactoryResult {
        contribute(ctx.holder, &ctx.param.name, &ctx.param.markers);
        Ok(())
    }
}
