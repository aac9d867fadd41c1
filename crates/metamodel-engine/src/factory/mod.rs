//! Facet factory trait and processing contexts.
//!
//! Each factory implements `FacetFactory`, provides metadata
//! (`FactoryMeta`) and overrides the `process_*` hooks for the feature kinds
//! it handles. Default implementations contribute nothing, so factories only
//! override what is relevant to them.
//!
//! Factories share a per-class [`MethodPool`]. Claiming a supporting method
//! removes it from the pool; the first factory to claim a method keeps it,
//! and whatever is left at the end is checked by the validators.

pub mod factories;

use std::sync::Arc;

use crate::catalog::{ClassDescriptor, MethodDescriptor, ParamDescriptor};
use crate::error::FactoryResult;
use crate::facet::FacetHolder;
use crate::feature::FeatureType;
use crate::finder::{MethodFinder, MethodQuery};
use crate::policy::IntrospectionPolicy;
use crate::support::{SupportHit, SupportRequest, SupportSearch};

/// Static metadata for a facet factory.
pub struct FactoryMeta {
    /// Factory name, e.g. "hide-method"
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Feature kinds the factory processes
    pub feature_types: &'static [FeatureType],
}

/// Methods of one class not yet claimed by any factory
#[derive(Debug, Clone, Default)]
pub struct MethodPool {
    methods: Vec<Arc<MethodDescriptor>>,
}

impl MethodPool {
    /// Pool over the given methods
    pub fn new(methods: impl IntoIterator<Item = Arc<MethodDescriptor>>) -> Self {
        Self {
            methods: methods.into_iter().collect(),
        }
    }

    /// Whether the method is still unclaimed
    pub fn contains(&self, method: &MethodDescriptor) -> bool {
        self.methods.iter().any(|m| m.as_ref() == method)
    }

    /// Remove a method; `false` if it was already claimed
    pub fn remove(&mut self, method: &MethodDescriptor) -> bool {
        let before = self.methods.len();
        self.methods.retain(|m| m.as_ref() != method);
        self.methods.len() != before
    }

    /// Remove every method matching `predicate`, returning them
    pub fn remove_where<P>(&mut self, predicate: P) -> Vec<Arc<MethodDescriptor>>
    where
        P: Fn(&MethodDescriptor) -> bool,
    {
        let (removed, kept): (Vec<_>, Vec<_>) = self.methods.drain(..).partition(|m| predicate(m.as_ref()));
        self.methods = kept;
        removed
    }

    /// Keep the methods still in the pool and remove them
    pub fn claim(&mut self, methods: Vec<Arc<MethodDescriptor>>) -> Vec<Arc<MethodDescriptor>> {
        methods.into_iter().filter(|m| self.remove(m)).collect()
    }

    /// Keep the support hits whose method is still in the pool and remove them
    pub fn claim_hits(&mut self, hits: Vec<SupportHit>) -> Vec<SupportHit> {
        hits.into_iter().filter(|h| self.remove(&h.method)).collect()
    }

    /// Unclaimed methods in declared order
    pub fn remaining(&self) -> &[Arc<MethodDescriptor>] {
        &self.methods
    }

    /// Consume the pool
    pub fn into_remaining(self) -> Vec<Arc<MethodDescriptor>> {
        self.methods
    }

    /// Number of unclaimed methods
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Whether every method was claimed
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

/// Context passed to class-level processing.
pub struct ClassContext<'a> {
    /// The class
    pub class: &'a ClassDescriptor,
    /// Finder under the class's policy
    pub finder: MethodFinder<'a>,
    /// Unclaimed methods
    pub pool: &'a mut MethodPool,
    /// Type-level facets
    pub holder: &'a mut FacetHolder,
}

impl ClassContext<'_> {
    /// Active policy
    pub fn policy(&self) -> IntrospectionPolicy {
        self.finder.policy()
    }

    /// Find and claim supporting methods
    pub fn claim(&mut self, query: &MethodQuery) -> Vec<Arc<MethodDescriptor>> {
        let found = self.finder.find(query);
        self.pool.claim(found)
    }
}

/// Context passed to member-level processing (properties, collections,
/// actions).
pub struct MethodContext<'a> {
    /// Owning class
    pub class: &'a ClassDescriptor,
    /// The member's method (getter or action)
    pub method: &'a Arc<MethodDescriptor>,
    /// Member name (`status` for `getStatus`, the method name for actions)
    pub member_name: &'a str,
    /// Kind of member
    pub feature_type: FeatureType,
    /// Main method of a mixin
    pub is_mixin_main: bool,
    /// Finder under the class's policy
    pub finder: MethodFinder<'a>,
    /// Unclaimed methods
    pub pool: &'a mut MethodPool,
    /// The member's facets
    pub holder: &'a mut FacetHolder,
    /// Type-level facets, read-only
    pub type_holder: &'a FacetHolder,
}

impl MethodContext<'_> {
    /// Active policy
    pub fn policy(&self) -> IntrospectionPolicy {
        self.finder.policy()
    }

    /// Find and claim supporting methods
    pub fn claim(&mut self, query: &MethodQuery) -> Vec<Arc<MethodDescriptor>> {
        let found = self.finder.find(query);
        self.pool.claim(found)
    }

    /// Run a support search and claim the hits
    pub fn claim_support(&mut self, request: &SupportRequest) -> Vec<SupportHit> {
        let hits = SupportSearch::new(self.finder).search(request);
        self.pool.claim_hits(hits)
    }
}

/// Context passed to parameter-level processing.
pub struct ParamContext<'a> {
    /// Owning class
    pub class: &'a ClassDescriptor,
    /// The action method
    pub action: &'a Arc<MethodDescriptor>,
    /// Action name
    pub action_name: &'a str,
    /// Parameter position
    pub index: usize,
    /// The parameter
    pub param: &'a ParamDescriptor,
    /// Main method of a mixin
    pub is_mixin_main: bool,
    /// Finder under the class's policy
    pub finder: MethodFinder<'a>,
    /// Unclaimed methods
    pub pool: &'a mut MethodPool,
    /// The parameter's facets
    pub holder: &'a mut FacetHolder,
}

impl ParamContext<'_> {
    /// Run a support search and claim the hits
    pub fn claim_support(&mut self, request: &SupportRequest) -> Vec<SupportHit> {
        let hits = SupportSearch::new(self.finder).search(request);
        self.pool.claim_hits(hits)
    }
}

/// Trait that every facet factory implements.
///
/// Factories are stateless and shared between introspection threads.
pub trait FacetFactory: Send + Sync {
    /// Static metadata for this factory.
    fn meta(&self) -> &FactoryMeta;

    /// Contribute type-level facets.
    fn process_class(&self, _ctx: &mut ClassContext<'_>) -> FactoryResult {
        Ok(())
    }

    /// Contribute facets to a property, collection or action.
    fn process_method(&self, _ctx: &mut MethodContext<'_>) -> FactoryResult {
        Ok(())
    }

    /// Contribute facets to an action parameter.
    fn process_param(&self, _ctx: &mut ParamContext<'_>) -> FactoryResult {
        Ok(())
    }

    /// Whether the factory handles this kind of feature.
    fn handles(&self, feature_type: FeatureType) -> bool {
        self.meta().feature_types.contains(&feature_type)
    }
}
