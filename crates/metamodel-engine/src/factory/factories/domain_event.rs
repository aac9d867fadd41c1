//! Factory: domain-event
//!
//! A `DomainEvent(name)` marker on a member, or on the field behind a
//! property or collection, contributes at EVENT precedence.
//! A class-level marker names the default event for the type and every
//! member, at LOW precedence.

use crate::catalog::Marker;
use crate::error::FactoryResult;
use crate::facet::{DomainEventFacet, Precedence};
use crate::factory::{ClassContext, FacetFactory, FactoryMeta, MethodContext};
use crate::feature::FeatureType;

use super::markers::member_markers;

fn event_of(markers: &[Marker]) -> Option<String> {
    markers.iter().find_map(|m| match m {
        Marker::DomainEvent(name) => Some(name.clone()),
        _ => None,
    })
}

/// Domain events from type- and member-level markers.
pub struct DomainEvent;

static META: FactoryMeta = FactoryMeta {
    name: "domain-event",
    description: "Domain events published by members",
    feature_types: &[
        FeatureType::Type,
        FeatureType::Property,
        FeatureType::Collection,
        FeatureType::Action,
    ],
};

impl FacetFactory for DomainEvent {
    fn meta(&self) -> &FactoryMeta {
        &META
    }

    fn process_class(&self, ctx: &mut ClassContext<'_>) -> FactoryResult {
        if let Some(event) = event_of(&ctx.class.markers) {
            ctx.holder.add_facet(DomainEventFacet {
                precedence: Precedence::Low,
                event,
            });
        }
        Ok(())
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) -> FactoryResult {
        if let Some(event) = event_of(&member_markers(ctx)) {
            ctx.holder.add_facet(DomainEventFacet {
                precedence: Precedence::Event,
                event,
            });
        }
        let class_default = ctx.type_holder.facet::<DomainEventFacet>().map(|f| f.event.clone());
        if let Some(event) = class_default {
            ctx.holder.add_facet(DomainEventFacet {
                precedence: Precedence::Low,
                event,
            });
        }
        Ok(())
    }
}
