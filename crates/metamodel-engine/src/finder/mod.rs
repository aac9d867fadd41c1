//! Method Finder
//!
//! Stateless search over the [`ClassIndex`]. A [`MethodQuery`] names one or
//! more candidate method names, a return-type requirement and a parameter
//! signature; the finder filters by
//!
//! 1. name membership,
//! 2. introspection policy (visibility, marker requirement),
//! 3. return-type compatibility,
//! 4. parameter-signature match.
//!
//! Candidates are tried in declared order and every hit is returned; callers
//! decide what multiple hits mean.

pub mod naming;

use std::sync::Arc;

use crate::catalog::MethodDescriptor;
use crate::index::ClassIndex;
use crate::policy::IntrospectionPolicy;
use crate::types::{TypeName, TypeRef};

/// Required return type of a searched method
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnRequirement {
    /// Anything, including void
    Any,
    /// Must return nothing
    Void,
    /// Primitive or boxed boolean
    BooleanLike,
    /// Text
    TextLike,
    /// Assignable to the given type
    Exact(TypeRef),
    /// Collection whose elements are assignable to the given type
    ElementsOf(TypeRef),
}

impl ReturnRequirement {
    /// Check `actual` against this requirement
    pub fn accepts(&self, actual: &TypeRef, index: &ClassIndex) -> bool {
        match self {
            ReturnRequirement::Any => true,
            ReturnRequirement::Void => actual.is_void(),
            ReturnRequirement::BooleanLike => actual.is_boolean_like(),
            ReturnRequirement::TextLike => actual.is_text_like(),
            ReturnRequirement::Exact(required) => index.is_assignable(actual, required),
            ReturnRequirement::ElementsOf(element) => actual
                .element_type()
                .is_some_and(|e| index.is_assignable(e, element)),
        }
    }
}

/// Required parameter signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamRequirement {
    /// Any parameters
    Any,
    /// Exactly these parameter types (boxing-insensitive)
    Exact(Vec<TypeRef>),
}

impl ParamRequirement {
    /// No parameters
    pub fn none() -> Self {
        ParamRequirement::Exact(Vec::new())
    }

    fn accepts(&self, method: &MethodDescriptor) -> bool {
        match self {
            ParamRequirement::Any => true,
            ParamRequirement::Exact(types) => {
                types.len() == method.params.len()
                    && types
                        .iter()
                        .zip(&method.params)
                        .all(|(t, p)| t.matches_boxed(&p.type_ref))
            }
        }
    }
}

/// Which marker rule of the policy applies to the search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    /// Members (actions, properties, collections)
    Member,
    /// Supporting methods
    Support,
}

/// One method lookup
#[derive(Debug, Clone)]
pub struct MethodQuery {
    /// Type whose methods are searched
    pub owner: TypeName,
    /// Candidate names in priority order
    pub names: Vec<String>,
    /// Return requirement
    pub returns: ReturnRequirement,
    /// Parameter requirement
    pub params: ParamRequirement,
    /// Marker rule
    pub scope: SearchScope,
    /// Whether static methods qualify
    pub include_static: bool,
}

impl MethodQuery {
    /// Supporting-method query with no names yet, any return, no parameters
    pub fn support(owner: &TypeName) -> Self {
        Self {
            owner: owner.clone(),
            names: Vec::new(),
            returns: ReturnRequirement::Any,
            params: ParamRequirement::none(),
            scope: SearchScope::Support,
            include_static: false,
        }
    }

    /// Member query
    pub fn member(owner: &TypeName) -> Self {
        Self {
            scope: SearchScope::Member,
            ..Self::support(owner)
        }
    }

    /// Add a candidate name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    /// Add several candidate names
    pub fn names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Set the return requirement
    pub fn returns(mut self, returns: ReturnRequirement) -> Self {
        self.returns = returns;
        self
    }

    /// Require exactly these parameter types
    pub fn params(mut self, params: Vec<TypeRef>) -> Self {
        self.params = ParamRequirement::Exact(params);
        self
    }

    /// Accept any parameters
    pub fn any_params(mut self) -> Self {
        self.params = ParamRequirement::Any;
        self
    }
}

/// Stateless finder bound to an index and the owning class's policy
#[derive(Debug, Clone, Copy)]
pub struct MethodFinder<'a> {
    index: &'a ClassIndex,
    policy: IntrospectionPolicy,
}

impl<'a> MethodFinder<'a> {
    /// Create a finder
    pub fn new(index: &'a ClassIndex, policy: IntrospectionPolicy) -> Self {
        Self { index, policy }
    }

    /// The index searched
    pub fn index(&self) -> &'a ClassIndex {
        self.index
    }

    /// The active policy
    pub fn policy(&self) -> IntrospectionPolicy {
        self.policy
    }

    /// All matches, grouped by candidate name in declared order
    pub fn find(&self, query: &MethodQuery) -> Vec<Arc<MethodDescriptor>> {
        let methods = self.index.declared_methods(&query.owner);
        let mut found: Vec<Arc<MethodDescriptor>> = Vec::new();

        for name in &query.names {
            for method in methods.iter().filter(|m| &m.name == name) {
                if self.matches(method, query) && !found.iter().any(|f| f == method) {
                    found.push(method.clone());
                }
            }
        }
        found
    }

    /// Methods whose name carries the given convention prefix, eligible under
    /// the policy for `scope`
    pub fn find_prefixed(
        &self,
        owner: &TypeName,
        prefix: &str,
        scope: SearchScope,
    ) -> Vec<Arc<MethodDescriptor>> {
        self.index
            .declared_methods(owner)
            .iter()
            .filter(|m| naming::has_prefix(&m.name, prefix) && self.is_eligible(m, scope))
            .cloned()
            .collect()
    }

    /// Policy check for a single method
    pub fn is_eligible(&self, method: &MethodDescriptor, scope: SearchScope) -> bool {
        match scope {
            SearchScope::Member => self.policy.is_member_eligible(method),
            SearchScope::Support => self.policy.is_support_eligible(method),
        }
    }

    fn matches(&self, method: &MethodDescriptor, query: &MethodQuery) -> bool {
        (query.include_static || !method.is_static)
            && self.is_eligible(method, query.scope)
            && query.returns.accepts(&method.return_type, self.index)
            && query.params.accepts(method)
    }
}
