//! Metamodel Engine
//!
//! Builds a metamodel of domain classes by introspection: each registered
//! class becomes an [`ObjectSpecification`] of properties, collections and
//! actions, every feature carrying the facets contributed by an ordered set
//! of facet factories.
//!
//! - **Catalog**: registered classes, methods and markers (`catalog` module)
//! - **Index/Finder**: memoized per-type method view and method search
//!   (`index`, `finder`, `support` modules)
//! - **Facets**: facet types, holders and precedence ranking (`facet` module)
//! - **Programming model**: facet factories and validators (`factory`,
//!   `validate`, `model` modules)
//! - **Loader**: lazy and parallel introspection with a published registry
//!   (`introspect`, `loader` modules)
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use metamodel_engine::{ClassBuilder, ClassCatalog, MetaModelConfig, SpecificationLoader, TypeRef};
//!
//! let catalog = ClassCatalog::new();
//! catalog.register(
//!     ClassBuilder::new("demo.Order")
//!         .property("status", TypeRef::Text)
//!         .build(),
//! );
//!
//! let loader = SpecificationLoader::new(Arc::new(catalog), MetaModelConfig::default());
//! loader.introspect_all()?;
//! let order = loader.specification_for(&"demo.Order".into())?;
//! assert!(order.property("status").is_some());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// ============================================================================
// Class Model
// ============================================================================

/// Dynamic values and type references
pub mod types;

/// Registered classes, members and markers
pub mod catalog;

/// Memoized per-type method and field view
pub mod index;

/// Method search and naming conventions
pub mod finder;

/// Supporting-method search for actions and parameters
pub mod support;

/// Introspection policies and their resolution
pub mod policy;

// ============================================================================
// Metamodel
// ============================================================================

/// Facets, facet holders and precedence
pub mod facet;

/// Features and object specifications
pub mod feature;

/// Facet factories
pub mod factory;

/// Metamodel validation
pub mod validate;

/// Ordered factories and validators
pub mod model;

/// Single-class introspection
pub mod introspect;

/// Registry of introspected specifications
pub mod loader;

// ============================================================================
// Configuration and Errors
// ============================================================================

/// Engine configuration
pub mod config;

/// Error types
pub mod error;

// Re-export main types for convenience
pub use catalog::{
    ClassBuilder, ClassCatalog, ClassDescriptor, ClassKind, Marker, MarkerKind, MethodBuilder,
    MethodDescriptor, Visibility,
};
pub use config::MetaModelConfig;
pub use error::{FactoryError, InvocationError, MetaModelError, MetaModelResult};
pub use facet::{Facet, FacetHolder, FacetKind, FacetType, ImperativeAspect, Intent, Precedence};
pub use factory::{FacetFactory, FactoryMeta};
pub use feature::{Feature, FeatureType, Identifier, ObjectSpecification};
pub use loader::SpecificationLoader;
pub use model::ProgrammingModel;
pub use policy::IntrospectionPolicy;
pub use types::{ObjectHandle, TypeName, TypeRef, Value};
pub use validate::{FailureKind, MetaModelValidator, ValidationFailure};
