//! Factory: lifecycle-callbacks
//!
//! `created()`, `loaded()`, `persisting()`, ... become lifecycle callback
//! facets; a method marked `PostConstruct` becomes the initialization facet.

use crate::catalog::MarkerKind;
use crate::error::{FactoryError, FactoryResult};
use crate::facet::{ImperativeAspect, InitializationFacet, Intent, LifecycleCallbackFacet, LifecycleEvent, Precedence};
use crate::factory::{ClassContext, FacetFactory, FactoryMeta};
use crate::feature::FeatureType;
use crate::finder::MethodQuery;

/// Type-level lifecycle callbacks (`created`, `loaded`, ...) and post-construct methods.
pub struct LifecycleCallbacks;

static META: FactoryMeta = FactoryMeta {
    name: "lifecycle-callbacks",
    description: "Lifecycle callback and post-construct methods",
    feature_types: &[FeatureType::Type],
};

impl FacetFactory for LifecycleCallbacks {
    fn meta(&self) -> &FactoryMeta {
        &META
    }

    fn process_class(&self, ctx: &mut ClassContext<'_>) -> FactoryResult {
        let owner = ctx.class.name.clone();

        for event in LifecycleEvent::ALL {
            let query = MethodQuery::support(&owner).name(event.method_name());
            if let Some(method) = ctx.claim(&query).into_iter().next() {
                ctx.holder.add_facet(LifecycleCallbackFacet {
                    precedence: Precedence::Default,
                    event,
                    aspect: ImperativeAspect::new(method, Intent::LifecycleCallback),
                });
            }
        }

        let hooks = ctx.pool.remove_where(|m| m.has_marker(MarkerKind::PostConstruct));
        match hooks.as_slice() {
            [] => {}
            [hook] if hook.params.is_empty() => {
                ctx.holder.add_facet(InitializationFacet {
                    precedence: Precedence::High,
                    aspect: ImperativeAspect::new(hook.clone(), Intent::Initialization),
                });
            }
            [hook] => {
                return Err(FactoryError::Rejected(format!(
                    "post-construct method {} must not take parameters",
                    hook.id()
                )));
            }
            many => {
                return Err(FactoryError::Rejected(format!(
                    "{} methods are marked PostConstruct; at most one is allowed",
                    many.len()
                )));
            }
        }
        Ok(())
    }
}
