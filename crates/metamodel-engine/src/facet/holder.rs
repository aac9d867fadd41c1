//! Facet holder and per-type rankings

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::{Facet, FacetKind, FacetType, ImperativeAspect, Intent};
use crate::catalog::MethodDescriptor;
use crate::error::{MetaModelError, MetaModelResult};
use crate::feature::Identifier;

/// Every contribution of one facet type to one feature, in contribution
/// order. Exactly one contribution wins.
#[derive(Debug, Clone)]
pub struct FacetRanking {
    facet_type: FacetType,
    contributions: Vec<Arc<dyn Facet>>,
}

impl FacetRanking {
    fn new(facet_type: FacetType) -> Self {
        Self {
            facet_type,
            contributions: Vec::new(),
        }
    }

    /// The ranked facet type
    pub fn facet_type(&self) -> FacetType {
        self.facet_type
    }

    /// Contributions in the order they were added
    pub fn contributions(&self) -> &[Arc<dyn Facet>] {
        &self.contributions
    }

    /// Highest precedence; ties go to the earliest contribution
    pub fn winner(&self) -> Option<&Arc<dyn Facet>> {
        let mut best: Option<&Arc<dyn Facet>> = None;
        for facet in &self.contributions {
            match best {
                Some(current) if facet.precedence() <= current.precedence() => {}
                _ => best = Some(facet),
            }
        }
        best
    }

    fn add(&mut self, facet: Arc<dyn Facet>) -> bool {
        let redundant = self
            .contributions
            .iter()
            .any(|c| c.semantically_equal(facet.as_ref()) && c.precedence() >= facet.precedence());
        if redundant {
            return false;
        }
        self.contributions.push(facet);
        true
    }

    fn is_empty(&self) -> bool {
        self.contributions.is_empty()
    }
}

/// Per-feature facet container.
///
/// Mutated only while its class is being introspected; read-only once the
/// owning specification is published.
#[derive(Debug, Clone)]
pub struct FacetHolder {
    identifier: Identifier,
    rankings: FxHashMap<FacetType, FacetRanking>,
}

impl FacetHolder {
    /// Empty holder for a feature
    pub fn new(identifier: Identifier) -> Self {
        Self {
            identifier,
            rankings: FxHashMap::default(),
        }
    }

    /// Feature this holder belongs to
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// Add a facet. Returns `false` if a semantically equal facet of equal or
    /// higher precedence was already present.
    pub fn add_facet<F: Facet>(&mut self, facet: F) -> bool {
        self.add_shared(Arc::new(facet))
    }

    /// Add an already shared facet
    pub fn add_shared(&mut self, facet: Arc<dyn Facet>) -> bool {
        let facet_type = facet.facet_type();
        self.rankings
            .entry(facet_type)
            .or_insert_with(|| FacetRanking::new(facet_type))
            .add(facet)
    }

    /// Winning facet of a type
    pub fn get_facet(&self, facet_type: FacetType) -> Option<&Arc<dyn Facet>> {
        self.rankings.get(&facet_type).and_then(FacetRanking::winner)
    }

    /// Winning facet of a statically typed kind
    pub fn facet<T: FacetKind>(&self) -> Option<&T> {
        self.get_as::<T>(T::TYPE)
    }

    /// Winning facet of `facet_type`, downcast to `T`
    pub fn get_as<T: Facet>(&self, facet_type: FacetType) -> Option<&T> {
        self.get_facet(facet_type)
            .and_then(|f| f.as_any().downcast_ref::<T>())
    }

    /// Whether any facet of the type is present
    pub fn contains(&self, facet_type: FacetType) -> bool {
        self.rankings.contains_key(&facet_type)
    }

    /// Replace every facet of `facet_type` matching `predicate` with
    /// `replacement` (placed where the first match was), or remove them when
    /// `replacement` is `None`. A ranking left empty is dropped.
    pub fn update_facet<P>(&mut self, facet_type: FacetType, predicate: P, replacement: Option<Arc<dyn Facet>>)
    where
        P: Fn(&dyn Facet) -> bool,
    {
        let Some(ranking) = self.rankings.get_mut(&facet_type) else {
            return;
        };
        let first_match = ranking.contributions.iter().position(|f| predicate(f.as_ref()));
        let Some(position) = first_match else {
            return;
        };
        ranking.contributions.retain(|f| !predicate(f.as_ref()));
        if let Some(replacement) = replacement {
            let position = position.min(ranking.contributions.len());
            ranking.contributions.insert(position, replacement);
        }
        if ranking.is_empty() {
            self.rankings.remove(&facet_type);
        }
    }

    /// Facet types present, sorted
    pub fn facet_types(&self) -> Vec<FacetType> {
        let mut types: Vec<FacetType> = self.rankings.keys().copied().collect();
        types.sort();
        types
    }

    /// Full ranking of a type, for diagnostics
    pub fn ranking(&self, facet_type: FacetType) -> Option<&FacetRanking> {
        self.rankings.get(&facet_type)
    }

    /// Number of facet types present
    pub fn len(&self) -> usize {
        self.rankings.len()
    }

    /// Whether no facets are present
    pub fn is_empty(&self) -> bool {
        self.rankings.is_empty()
    }

    /// Every imperative aspect of every contribution, sorted by facet type
    pub fn imperative_aspects(&self) -> Vec<(FacetType, &ImperativeAspect)> {
        let mut aspects: Vec<(FacetType, &ImperativeAspect)> = self
            .rankings
            .values()
            .flat_map(|r| r.contributions.iter())
            .filter_map(|f| f.imperative().map(|a| (f.facet_type(), a)))
            .collect();
        aspects.sort_by_key(|(t, _)| *t);
        aspects
    }

    /// Intent under which `method` is used by this feature.
    ///
    /// Fails with [`MetaModelError::AmbiguousIntent`] if two aspects claim the
    /// method with different intents.
    pub fn imperative_intent(&self, method: &MethodDescriptor) -> MetaModelResult<Option<Intent>> {
        let mut intents: Vec<Intent> = self
            .imperative_aspects()
            .into_iter()
            .filter(|(_, a)| a.methods().any(|m| m.as_ref() == method))
            .map(|(_, a)| a.intent)
            .collect();
        intents.sort();
        intents.dedup();
        match intents.as_slice() {
            [] => Ok(None),
            [intent] => Ok(Some(*intent)),
            many => Err(MetaModelError::AmbiguousIntent {
                feature: self.identifier.to_string(),
                method: method.id().to_string(),
                intents: many.iter().map(|i| i.name()).collect::<Vec<_>>().join(", "),
            }),
        }
    }
}
