//! Action/Parameter Support Search
//!
//! Locates supporting methods (`hide0PlaceOrder`, `choices1PlaceOrder`,
//! `validatePlaceOrder`, ...) for an action or one of its parameters. Three
//! calling conventions are layered over the [`MethodFinder`]:
//!
//! | Algorithm        | Signature searched                                   |
//! |------------------|------------------------------------------------------|
//! | `Tuple`          | one aggregate argument built from all action args     |
//! | `Sweep`          | leading prefixes of length `i+1, i, ..., 0`           |
//! | `SingleArgument` | exactly the target parameter's own type               |
//!
//! Every algorithm that fires is reported. Deciding what several hits mean is
//! left to the ambiguity validator.

use std::sync::Arc;

use crate::catalog::{ConstructorDescriptor, MethodDescriptor};
use crate::error::{InvocationError, InvocationResult};
use crate::finder::{MethodFinder, MethodQuery, ReturnRequirement};
use crate::types::{ObjectHandle, TypeName, TypeRef, Value};

/// Calling-convention search algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchAlgorithm {
    /// Single parameter-tuple argument
    Tuple,
    /// Arity-reducing sweep over leading parameter prefixes
    Sweep,
    /// The target parameter's own type only
    SingleArgument,
}

impl SearchAlgorithm {
    /// Short name used in diagnostics
    pub fn name(self) -> &'static str {
        match self {
            SearchAlgorithm::Tuple => "tuple",
            SearchAlgorithm::Sweep => "sweep",
            SearchAlgorithm::SingleArgument => "single-argument",
        }
    }
}

/// One support lookup: owner, candidate names, algorithms and trailing types.
///
/// Built per lookup and consumed by [`SupportSearch::search`].
#[derive(Debug, Clone)]
pub struct SupportRequest {
    /// Type declaring the action
    pub owner: TypeName,
    /// Candidate method names in priority order
    pub names: Vec<String>,
    /// The action's full parameter signature
    pub action_params: Vec<TypeRef>,
    /// Target parameter index; `None` for action-level support
    pub target: Option<usize>,
    /// Return requirement
    pub returns: ReturnRequirement,
    /// Algorithms to try, in order
    pub algorithms: Vec<SearchAlgorithm>,
    /// Intent-specific trailing parameter types (e.g. the search term)
    pub trailing: Vec<TypeRef>,
}

impl SupportRequest {
    /// New request for an action with the given signature
    pub fn new(owner: &TypeName, action_params: &[TypeRef]) -> Self {
        Self {
            owner: owner.clone(),
            names: Vec::new(),
            action_params: action_params.to_vec(),
            target: None,
            returns: ReturnRequirement::Any,
            algorithms: vec![SearchAlgorithm::Tuple, SearchAlgorithm::Sweep],
            trailing: Vec::new(),
        }
    }

    /// Set candidate names
    pub fn names(mut self, names: Vec<String>) -> Self {
        self.names = names;
        self
    }

    /// Target one parameter
    pub fn target(mut self, index: usize) -> Self {
        self.target = Some(index);
        self
    }

    /// Set the return requirement
    pub fn returns(mut self, returns: ReturnRequirement) -> Self {
        self.returns = returns;
        self
    }

    /// Set the algorithms to try
    pub fn algorithms(mut self, algorithms: &[SearchAlgorithm]) -> Self {
        self.algorithms = algorithms.to_vec();
        self
    }

    /// Set the trailing parameter types
    pub fn trailing(mut self, trailing: Vec<TypeRef>) -> Self {
        self.trailing = trailing;
        self
    }
}

/// How live action arguments are turned into a supporting method's arguments
#[derive(Debug, Clone)]
pub enum CallingConvention {
    /// Construct the tuple from all action arguments and pass it first
    Tuple {
        /// Tuple type
        tuple_type: TypeName,
        /// Public constructor matching the action signature
        constructor: Arc<ConstructorDescriptor>,
    },
    /// Pass the first `arity` action arguments
    Prefix {
        /// Number of leading arguments
        arity: usize,
    },
    /// Pass only the argument at `index`
    SingleArgument {
        /// Parameter index
        index: usize,
    },
    /// Pass supplied arguments through unchanged
    Direct,
}

impl CallingConvention {
    /// Build the argument list for the supporting method
    pub fn build_args(&self, args: &[Value], trailing: &[Value]) -> InvocationResult<Vec<Value>> {
        let mut out = match self {
            CallingConvention::Tuple {
                tuple_type,
                constructor,
            } => vec![constructor.construct(tuple_type, args)?],
            CallingConvention::Prefix { arity } => {
                if args.len() < *arity {
                    return Err(InvocationError::ArityMismatch {
                        method: format!("prefix({})", arity),
                        expected: *arity,
                        actual: args.len(),
                    });
                }
                args[..*arity].to_vec()
            }
            CallingConvention::SingleArgument { index } => match args.get(*index) {
                Some(arg) => vec![arg.clone()],
                None => {
                    return Err(InvocationError::ArityMismatch {
                        method: format!("single-argument({})", index),
                        expected: index + 1,
                        actual: args.len(),
                    })
                }
            },
            CallingConvention::Direct => args.to_vec(),
        };
        out.extend_from_slice(trailing);
        Ok(out)
    }
}

/// A supporting method found by one algorithm
#[derive(Debug, Clone)]
pub struct SupportHit {
    /// The method found
    pub method: Arc<MethodDescriptor>,
    /// Algorithm that fired
    pub algorithm: SearchAlgorithm,
    /// How to call it
    pub convention: CallingConvention,
}

impl SupportHit {
    /// Call the supporting method with live action arguments
    pub fn invoke(&self, target: &ObjectHandle, args: &[Value], trailing: &[Value]) -> InvocationResult<Value> {
        let args = self.convention.build_args(args, trailing)?;
        self.method.invoke(target, &args)
    }
}

/// Signature prefixes tried by the sweep for target index `target`:
/// lengths `target+1` down to `0`.
pub fn sweep_signatures(params: &[TypeRef], target: usize) -> Vec<Vec<TypeRef>> {
    let longest = (target + 1).min(params.len());
    (0..=longest).rev().map(|len| params[..len].to_vec()).collect()
}

/// Support search bound to a method finder
#[derive(Debug, Clone, Copy)]
pub struct SupportSearch<'a> {
    finder: MethodFinder<'a>,
}

impl<'a> SupportSearch<'a> {
    /// Create a search over the finder's index and policy
    pub fn new(finder: MethodFinder<'a>) -> Self {
        Self { finder }
    }

    /// Run every requested algorithm; hits are unique per method, the first
    /// algorithm to find a method keeps it
    pub fn search(&self, request: &SupportRequest) -> Vec<SupportHit> {
        let mut hits: Vec<SupportHit> = Vec::new();
        for algorithm in &request.algorithms {
            let found = match algorithm {
                SearchAlgorithm::Tuple => self.tuple(request),
                SearchAlgorithm::Sweep => self.sweep(request),
                SearchAlgorithm::SingleArgument => self.single_argument(request),
            };
            for hit in found {
                if hits.iter().any(|h| h.method == hit.method) {
                    continue;
                }
                tracing::trace!(
                    algorithm = algorithm.name(),
                    method = %hit.method.id(),
                    "supporting method found"
                );
                hits.push(hit);
            }
        }
        hits
    }

    fn base_query(&self, request: &SupportRequest) -> MethodQuery {
        MethodQuery::support(&request.owner)
            .names(request.names.iter().cloned())
            .returns(request.returns.clone())
    }

    fn tuple(&self, request: &SupportRequest) -> Vec<SupportHit> {
        let index = self.finder.index();
        let candidates = self.finder.find(&self.base_query(request).any_params());

        candidates
            .into_iter()
            .filter_map(|method| {
                if method.params.len() != 1 + request.trailing.len() {
                    return None;
                }
                let (first, rest) = method.params.split_first()?;
                if first.type_ref.is_scalar_value() {
                    return None;
                }
                let trailing_ok = rest
                    .iter()
                    .zip(&request.trailing)
                    .all(|(p, t)| p.type_ref.matches_boxed(t));
                if !trailing_ok {
                    return None;
                }
                let tuple_type = first.type_ref.class_name()?.clone();
                let class = index.class(&tuple_type)?;
                let constructor = class.public_constructor(&request.action_params)?.clone();
                Some(SupportHit {
                    method,
                    algorithm: SearchAlgorithm::Tuple,
                    convention: CallingConvention::Tuple {
                        tuple_type,
                        constructor,
                    },
                })
            })
            .collect()
    }

    fn sweep(&self, request: &SupportRequest) -> Vec<SupportHit> {
        let signatures = match request.target {
            Some(target) => sweep_signatures(&request.action_params, target),
            // Action-level support takes the full signature only
            None => vec![request.action_params.clone()],
        };

        for prefix in signatures {
            let arity = prefix.len();
            let mut params = prefix;
            params.extend(request.trailing.iter().cloned());
            let found = self.finder.find(&self.base_query(request).params(params));
            if !found.is_empty() {
                return found
                    .into_iter()
                    .map(|method| SupportHit {
                        method,
                        algorithm: SearchAlgorithm::Sweep,
                        convention: CallingConvention::Prefix { arity },
                    })
                    .collect();
            }
        }
        Vec::new()
    }

    fn single_argument(&self, request: &SupportRequest) -> Vec<SupportHit> {
        let Some(index) = request.target else {
            return Vec::new();
        };
        let Some(param) = request.action_params.get(index) else {
            return Vec::new();
        };
        self.finder
            .find(&self.base_query(request).params(vec![param.clone()]))
            .into_iter()
            .map(|method| SupportHit {
                method,
                algorithm: SearchAlgorithm::SingleArgument,
                convention: CallingConvention::SingleArgument { index },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ClassBuilder, ClassCatalog, MethodBuilder};
    use crate::index::ClassIndex;
    use crate::policy::IntrospectionPolicy;

    fn a() -> TypeRef {
        TypeRef::class("demo.A")
    }
    fn b() -> TypeRef {
        TypeRef::Text
    }
    fn c() -> TypeRef {
        TypeRef::int()
    }

    fn index(methods: Vec<MethodBuilder>) -> ClassIndex {
        let catalog = Arc::new(ClassCatalog::new());
        catalog.register(ClassBuilder::new("demo.A").build());
        catalog.register(
            ClassBuilder::value("demo.PlaceArgs")
                .record_constructor(&[("a", a()), ("b", b()), ("c", c())])
                .build(),
        );
        let mut builder = ClassBuilder::new("demo.Order");
        for m in methods {
            builder = builder.method(m);
        }
        catalog.register(builder.build());
        ClassIndex::new(catalog)
    }

    fn owner() -> TypeName {
        TypeName::new("demo.Order")
    }

    #[test]
    fn test_sweep_signature_order() {
        let sigs = sweep_signatures(&[a(), b(), c()], 2);
        assert_eq!(sigs[0], vec![a(), b(), c()]);
        assert_eq!(sigs[1], vec![a(), b()]);
        assert_eq!(sigs[2], vec![a()]);
        assert_eq!(sigs[3], Vec::<TypeRef>::new());

        let sigs = sweep_signatures(&[a(), b(), c()], 0);
        assert_eq!(sigs, vec![vec![a()], vec![]]);
    }

    #[test]
    fn test_sweep_stops_at_longest_match() {
        let index = index(vec![
            MethodBuilder::new("choices2PlaceOrder")
                .param("a", a())
                .returns(TypeRef::collection_of(c())),
            MethodBuilder::new("choices2PlaceOrder").returns(TypeRef::collection_of(c())),
        ]);
        let finder = MethodFinder::new(&index, IntrospectionPolicy::AnnotationOptional);
        let request = SupportRequest::new(&owner(), &[a(), b(), c()])
            .names(vec!["choices2PlaceOrder".into()])
            .target(2)
            .algorithms(&[SearchAlgorithm::Sweep]);

        let hits = SupportSearch::new(finder).search(&request);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].method.arity(), 1);
        assert!(matches!(hits[0].convention, CallingConvention::Prefix { arity: 1 }));
    }

    #[test]
    fn test_tuple_convention() {
        let index = index(vec![MethodBuilder::new("validatePlaceOrder")
            .param("args", TypeRef::class("demo.PlaceArgs"))
            .returns(TypeRef::Text)
            .invoker(|_, args| {
                let tuple = args[0].as_object().cloned();
                Ok(tuple.map(|t| t.get("c")).unwrap_or_default())
            })]);
        let finder = MethodFinder::new(&index, IntrospectionPolicy::AnnotationOptional);
        let request = SupportRequest::new(&owner(), &[a(), b(), c()])
            .names(vec!["validatePlaceOrder".into()])
            .returns(ReturnRequirement::TextLike);

        let hits = SupportSearch::new(finder).search(&request);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].algorithm, SearchAlgorithm::Tuple);

        let target = ObjectHandle::new("demo.Order");
        let result = hits[0]
            .invoke(&target, &[Value::Null, Value::from("x"), Value::Int(3)], &[])
            .unwrap();
        assert_eq!(result, Value::Int(3));
    }

    #[test]
    fn test_tuple_rejects_scalar_candidates() {
        // A stdlib type with a matching constructor must never be a tuple
        let catalog = Arc::new(ClassCatalog::new());
        catalog.register(
            ClassBuilder::new("demo.Order")
                .method(
                    MethodBuilder::new("validateBook")
                        .param("when", TypeRef::stdlib("LocalDate"))
                        .returns(TypeRef::Text),
                )
                .build(),
        );
        let index = ClassIndex::new(catalog);
        let finder = MethodFinder::new(&index, IntrospectionPolicy::AnnotationOptional);
        let request = SupportRequest::new(&owner(), &[TypeRef::stdlib("LocalDate")])
            .names(vec!["validateBook".into()])
            .algorithms(&[SearchAlgorithm::Tuple]);
        assert!(SupportSearch::new(finder).search(&request).is_empty());
    }

    #[test]
    fn test_single_argument() {
        let index = index(vec![MethodBuilder::new("validate1PlaceOrder")
            .param("b", b())
            .returns(TypeRef::Text)]);
        let finder = MethodFinder::new(&index, IntrospectionPolicy::AnnotationOptional);
        let request = SupportRequest::new(&owner(), &[a(), b(), c()])
            .names(vec!["validate1PlaceOrder".into()])
            .target(1)
            .algorithms(&[SearchAlgorithm::Tuple, SearchAlgorithm::SingleArgument]);
        let hits = SupportSearch::new(finder).search(&request);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].algorithm, SearchAlgorithm::SingleArgument);
    }

    #[test]
    fn test_trailing_types() {
        let index = index(vec![MethodBuilder::new("autoComplete0PlaceOrder")
            .param("search", TypeRef::Text)
            .returns(TypeRef::collection_of(a()))]);
        let finder = MethodFinder::new(&index, IntrospectionPolicy::AnnotationOptional);
        let request = SupportRequest::new(&owner(), &[a(), b(), c()])
            .names(vec!["autoComplete0PlaceOrder".into()])
            .target(0)
            .trailing(vec![TypeRef::Text]);
        let hits = SupportSearch::new(finder).search(&request);
        assert_eq!(hits.len(), 1);
        assert!(matches!(hits[0].convention, CallingConvention::Prefix { arity: 0 }));
    }

    #[test]
    fn test_build_args() {
        let args = [Value::Int(1), Value::Int(2), Value::Int(3)];
        let prefix = CallingConvention::Prefix { arity: 2 };
        assert_eq!(
            prefix.build_args(&args, &[Value::from("q")]).unwrap(),
            vec![Value::Int(1), Value::Int(2), Value::from("q")]
        );
        let single = CallingConvention::SingleArgument { index: 2 };
        assert_eq!(single.build_args(&args, &[]).unwrap(), vec![Value::Int(3)]);
        assert!(CallingConvention::Prefix { arity: 4 }.build_args(&args, &[]).is_err());
    }

    #[test]
    fn test_single_argument_out_of_range() {
        let single = CallingConvention::SingleArgument { index: 2 };
        let err = single.build_args(&[Value::Int(1)], &[]).unwrap_err();
        assert!(matches!(
            err,
            InvocationError::ArityMismatch {
                expected: 3,
                actual: 1,
                ..
            }
        ));
    }
}
