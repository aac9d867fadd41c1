//! Introspector: turns one registered class into an [`ObjectSpecification`]
//! by running the programming model's factories over it.
//!
//! ```text
//! class descriptor
//!   -> resolve policy, type-level facets (process_class)
//!   -> accessor discovery: getX/isX -> properties, collections
//!   -> remaining eligible methods -> actions (+ parameters)
//!   -> unclaimed methods kept for the validators
//! ```
//!
//! Members of a class are processed sequentially in declared order, so the
//! result is deterministic. A factory error drops only the feature being
//! processed and is returned as a build failure.

use std::sync::Arc;

use crate::catalog::{ClassDescriptor, ClassKind, MarkerKind, MethodDescriptor};
use crate::error::{FactoryError, MetaModelError, MetaModelResult};
use crate::facet::{FacetHolder, IntrospectionPolicyFacet, MixinFacet, Precedence};
use crate::factory::{ClassContext, FacetFactory, MethodContext, MethodPool, ParamContext};
use crate::feature::{
    ActionParameterSpec, ActionSpec, CollectionSpec, FeatureType, Identifier, ObjectSpecification, PropertySpec,
};
use crate::finder::{naming, MethodFinder};
use crate::index::ClassIndex;
use crate::model::ProgrammingModel;
use crate::policy::{IntrospectionPolicy, MemberMarkerPolicy, PolicyResolver};
use crate::types::TypeName;
use crate::validate::ValidationFailure;

/// Result of introspecting one class
#[derive(Debug)]
pub struct Introspection {
    /// The specification
    pub spec: ObjectSpecification,
    /// Features dropped because a factory rejected them
    pub failures: Vec<ValidationFailure>,
}

/// A getter found during accessor discovery
struct Accessor {
    name: String,
    getter: Arc<MethodDescriptor>,
    feature_type: FeatureType,
}

/// Runs the programming model over single classes
pub struct Introspector<'a> {
    index: &'a ClassIndex,
    model: &'a ProgrammingModel,
    resolver: &'a PolicyResolver,
}

impl<'a> Introspector<'a> {
    /// Create an introspector
    pub fn new(index: &'a ClassIndex, model: &'a ProgrammingModel, resolver: &'a PolicyResolver) -> Self {
        Self { index, model, resolver }
    }

    /// Introspect one class.
    ///
    /// Fails only when the class as a whole cannot be introspected: unknown
    /// type, value type, a rejected type-level factory or a mixin without
    /// its main method.
    pub fn introspect(&self, type_name: &TypeName) -> MetaModelResult<Introspection> {
        let class = self
            .index
            .class(type_name)
            .ok_or_else(|| MetaModelError::UnknownType(type_name.clone()))?;
        if !class.is_introspectable() {
            return Err(MetaModelError::Unintrospectable {
                type_name: type_name.clone(),
                reason: "value types have no specification".to_string(),
            });
        }

        let (policy, source) = self.resolver.resolve(&class);
        let finder = MethodFinder::new(self.index, policy);
        let mut spec = ObjectSpecification::new(&class.name, class.kind.clone(), policy);
        spec.holder.add_facet(IntrospectionPolicyFacet {
            precedence: Precedence::Default,
            policy,
            source,
        });
        if let ClassKind::Mixin { mixee, main } = &class.kind {
            spec.holder.add_facet(MixinFacet {
                precedence: Precedence::Default,
                mixee: mixee.clone(),
                main: main.clone(),
            });
        }

        let mut pool = MethodPool::new(self.index.declared_methods(&class.name).iter().cloned());
        let mut failures = Vec::new();

        for factory in self.factories_for(FeatureType::Type) {
            let mut ctx = ClassContext {
                class: &class,
                finder,
                pool: &mut pool,
                holder: &mut spec.holder,
            };
            factory.process_class(&mut ctx).map_err(|e| MetaModelError::Unintrospectable {
                type_name: class.name.clone(),
                reason: format!("{}: {}", factory.meta().name, e),
            })?;
        }

        match &class.kind {
            ClassKind::Mixin { main, .. } => {
                let method = self.mixin_main(&class, main, policy, &mut pool)?;
                self.add_action(&class, &mut spec, finder, &mut pool, method, true, &mut failures);
            }
            _ => {
                for accessor in self.discover_accessors(&class, policy, &mut pool) {
                    self.add_accessor(&class, &mut spec, finder, &mut pool, accessor, &mut failures);
                }
                for method in self.discover_actions(policy, &mut pool) {
                    self.add_action(&class, &mut spec, finder, &mut pool, method, false, &mut failures);
                }
            }
        }

        spec.unclaimed_methods = pool.into_remaining();
        tracing::debug!(
            type_name = %class.name,
            policy = %policy,
            properties = spec.properties.len(),
            collections = spec.collections.len(),
            actions = spec.actions.len(),
            unclaimed = spec.unclaimed_methods.len(),
            "introspected"
        );
        Ok(Introspection { spec, failures })
    }

    fn factories_for(&self, feature_type: FeatureType) -> impl Iterator<Item = &'a dyn FacetFactory> + 'a {
        self.model
            .factories()
            .iter()
            .map(|f| f.as_ref())
            .filter(move |f| f.handles(feature_type))
    }

    /// `getX()` / `isX()` accessors among the unclaimed methods, removed from
    /// the pool, in declared order
    fn discover_accessors(
        &self,
        class: &ClassDescriptor,
        policy: IntrospectionPolicy,
        pool: &mut MethodPool,
    ) -> Vec<Accessor> {
        let mut accessors: Vec<Accessor> = Vec::new();
        for method in pool.remaining() {
            let Some(name) = naming::property_name_from_accessor(&method.name) else {
                continue;
            };
            if method.is_static || !method.params.is_empty() || method.return_type.is_void() {
                continue;
            }
            if naming::has_prefix(&method.name, naming::IS) && !method.return_type.is_boolean_like() {
                continue;
            }
            if !policy.allows_visibility(method.visibility) || accessors.iter().any(|a| a.name == name) {
                continue;
            }

            let mut markers = method.markers.clone();
            if let Some(field) = self.index.field_for_getter(&class.name, method) {
                markers.extend(field.markers);
            }
            let marked_collection = markers.iter().any(|m| m.kind() == MarkerKind::Collection);
            let marked_property = markers.iter().any(|m| m.kind() == MarkerKind::Property);
            if policy.member_markers() == MemberMarkerPolicy::Required && !marked_collection && !marked_property {
                continue;
            }

            let feature_type = if marked_collection || (method.return_type.is_collection() && !marked_property) {
                FeatureType::Collection
            } else {
                FeatureType::Property
            };
            accessors.push(Accessor {
                name,
                getter: method.clone(),
                feature_type,
            });
        }
        for accessor in &accessors {
            pool.remove(&accessor.getter);
        }
        accessors
    }

    /// Unclaimed, member-eligible methods that are not convention-named
    /// (unless marked as actions) nor marked as properties or collections,
    /// removed from the pool
    fn discover_actions(&self, policy: IntrospectionPolicy, pool: &mut MethodPool) -> Vec<Arc<MethodDescriptor>> {
        pool.remove_where(|m| {
            !m.is_static
                && policy.is_member_eligible(m)
                && (!naming::is_reserved(&m.name) || m.has_marker(MarkerKind::Action))
                // Left for the marker constraint when they are not accessors
                && !m.has_marker(MarkerKind::Property)
                && !m.has_marker(MarkerKind::Collection)
        })
    }

    fn mixin_main(
        &self,
        class: &ClassDescriptor,
        main: &str,
        policy: IntrospectionPolicy,
        pool: &mut MethodPool,
    ) -> MetaModelResult<Arc<MethodDescriptor>> {
        let mut found = pool.remove_where(|m| m.name == main && !m.is_static && policy.allows_visibility(m.visibility));
        match found.len() {
            1 => Ok(found.remove(0)),
            0 => Err(MetaModelError::Unintrospectable {
                type_name: class.name.clone(),
                reason: format!("mixin main method '{}' not found", main),
            }),
            n => Err(MetaModelError::Unintrospectable {
                type_name: class.name.clone(),
                reason: format!("mixin main method '{}' is overloaded {} times", main, n),
            }),
        }
    }

    fn add_accessor(
        &self,
        class: &ClassDescriptor,
        spec: &mut ObjectSpecification,
        finder: MethodFinder<'_>,
        pool: &mut MethodPool,
        accessor: Accessor,
        failures: &mut Vec<ValidationFailure>,
    ) {
        let Accessor {
            name,
            getter,
            feature_type,
        } = accessor;
        let mut holder = FacetHolder::new(Identifier::member(class.name.clone(), &name, feature_type));
        let before = pool.clone();

        let mut result = Ok(());
        for factory in self.factories_for(feature_type) {
            let mut ctx = MethodContext {
                class,
                method: &getter,
                member_name: &name,
                feature_type,
                is_mixin_main: false,
                finder,
                pool: &mut *pool,
                holder: &mut holder,
                type_holder: &spec.holder,
            };
            if let Err(e) = factory.process_method(&mut ctx) {
                result = Err((factory.meta().name, e));
                break;
            }
        }
        if let Err((factory, e)) = result {
            // Supporting methods claimed for a dropped feature go back to the pool
            *pool = before;
            failures.push(build_failure(&holder, factory, e));
            return;
        }

        let type_ref = getter.return_type.clone();
        match feature_type {
            FeatureType::Collection => spec.collections.push(CollectionSpec {
                holder,
                name,
                element_type: type_ref.element_type().cloned().unwrap_or(type_ref),
                getter,
            }),
            _ => spec.properties.push(PropertySpec {
                holder,
                name,
                type_ref,
                getter,
            }),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn add_action(
        &self,
        class: &ClassDescriptor,
        spec: &mut ObjectSpecification,
        finder: MethodFinder<'_>,
        pool: &mut MethodPool,
        method: Arc<MethodDescriptor>,
        is_mixin_main: bool,
        failures: &mut Vec<ValidationFailure>,
    ) {
        let name = method.name.clone();
        let param_types = method.param_types();
        let mut holder = FacetHolder::new(Identifier::action(class.name.clone(), &name, &param_types));
        let before = pool.clone();

        for factory in self.factories_for(FeatureType::Action) {
            let mut ctx = MethodContext {
                class,
                method: &method,
                member_name: &name,
                feature_type: FeatureType::Action,
                is_mixin_main,
                finder,
                pool: &mut *pool,
                holder: &mut holder,
                type_holder: &spec.holder,
            };
            if let Err(e) = factory.process_method(&mut ctx) {
                *pool = before;
                failures.push(build_failure(&holder, factory.meta().name, e));
                return;
            }
        }

        let mut params = Vec::with_capacity(method.params.len());
        for (index, param) in method.params.iter().enumerate() {
            let mut param_holder =
                FacetHolder::new(Identifier::parameter(class.name.clone(), &name, &param_types, index));
            // A rejected parameter keeps the facets contributed so far; the
            // action needs every position
            for factory in self.factories_for(FeatureType::ActionParameter) {
                let mut ctx = ParamContext {
                    class,
                    action: &method,
                    action_name: &name,
                    index,
                    param,
                    is_mixin_main,
                    finder,
                    pool: &mut *pool,
                    holder: &mut param_holder,
                };
                if let Err(e) = factory.process_param(&mut ctx) {
                    failures.push(build_failure(&param_holder, factory.meta().name, e));
                    break;
                }
            }
            params.push(ActionParameterSpec {
                holder: param_holder,
                index,
                name: param.name.clone(),
                type_ref: param.type_ref.clone(),
            });
        }

        spec.actions.push(ActionSpec {
            holder,
            name,
            method,
            params,
            is_mixin_main,
        });
    }
}

fn build_failure(holder: &FacetHolder, factory: &str, error: FactoryError) -> ValidationFailure {
    let identifier = holder.identifier();
    tracing::debug!(feature = %identifier, factory, error = %error, "feature dropped");
    ValidationFailure::build(
        identifier.owner.as_str(),
        identifier.to_string(),
        format!("{}: {}", factory, error),
    )
}
