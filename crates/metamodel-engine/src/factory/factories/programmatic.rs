//! Factory: remove-programmatic
//!
//! Drops methods marked `Programmatic` from the pool so no other factory can
//! claim them and the validators ignore them.

use crate::catalog::MarkerKind;
use crate::error::FactoryResult;
use crate::factory::{ClassContext, FacetFactory, FactoryMeta};
use crate::feature::FeatureType;

/// Claims methods marked `Programmatic` so nothing else sees them.
pub struct RemoveProgrammatic;

static META: FactoryMeta = FactoryMeta {
    name: "remove-programmatic",
    description: "Exclude methods marked Programmatic from the metamodel",
    feature_types: &[FeatureType::Type],
};

impl FacetFactory for RemoveProgrammatic {
    fn meta(&self) -> &FactoryMeta {
        &META
    }

    fn process_class(&self, ctx: &mut ClassContext<'_>) -> FactoryResult {
        let removed = ctx.pool.remove_where(|m| m.has_marker(MarkerKind::Programmatic));
        if !removed.is_empty() {
            tracing::trace!(
                class = %ctx.class.name,
                count = removed.len(),
                "removed programmatic methods"
            );
        }
        Ok(())
    }
}
