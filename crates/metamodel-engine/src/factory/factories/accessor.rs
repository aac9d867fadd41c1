//! Factories: property-accessor, collection-accessor
//!
//! The getter discovered for a property or collection becomes its accessor
//! facet. Collections additionally record their element type.

use crate::error::{FactoryError, FactoryResult};
use crate::facet::{AccessorFacet, ElementTypeFacet, ImperativeAspect, Intent, Precedence};
use crate::factory::{FacetFactory, FactoryMeta, MethodContext};
use crate::feature::FeatureType;

/// Accessor facet for `getX()` / `isX()` properties.
pub struct PropertyAccessor;

static PROPERTY_META: FactoryMeta = FactoryMeta {
    name: "property-accessor",
    description: "Getter of a scalar property",
    feature_types: &[FeatureType::Property],
};

impl FacetFactory for PropertyAccessor {
    fn meta(&self) -> &FactoryMeta {
        &PROPERTY_META
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) -> FactoryResult {
        if ctx.feature_type != FeatureType::Property {
            return Ok(());
        }
        if ctx.method.return_type.is_void() {
            return Err(FactoryError::Rejected(format!(
                "getter {} of property '{}' returns void",
                ctx.method.id(),
                ctx.member_name
            )));
        }
        ctx.holder.add_facet(AccessorFacet {
            precedence: Precedence::Default,
            aspect: ImperativeAspect::new(ctx.method.clone(), Intent::Accessor),
        });
        Ok(())
    }
}

/// Accessor and element-type facets for collections; rejects unknown element types.
pub struct CollectionAccessor;

static COLLECTION_META: FactoryMeta = FactoryMeta {
    name: "collection-accessor",
    description: "Getter and element type of a collection",
    feature_types: &[FeatureType::Collection],
};

impl FacetFactory for CollectionAccessor {
    fn meta(&self) -> &FactoryMeta {
        &COLLECTION_META
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) -> FactoryResult {
        if ctx.feature_type != FeatureType::Collection {
            return Ok(());
        }
        let Some(element) = ctx.method.return_type.element_type().cloned() else {
            return Err(FactoryError::Rejected(format!(
                "collection '{}' getter {} does not return a collection",
                ctx.member_name,
                ctx.method.id()
            )));
        };
        if let Some(name) = element.class_name() {
            if !ctx.finder.index().catalog().contains(name) {
                return Err(FactoryError::MissingType(name.clone()));
            }
        }
        ctx.holder.add_facet(AccessorFacet {
            precedence: Precedence::Default,
            aspect: ImperativeAspect::new(ctx.method.clone(), Intent::Accessor),
        });
        ctx.holder.add_facet(ElementTypeFacet {
            precedence: Precedence::Default,
            element,
        });
        Ok(())
    }
}
