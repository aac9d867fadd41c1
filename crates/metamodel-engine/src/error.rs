//! Error types for the metamodel engine

use crate::types::TypeName;
use crate::validate::ValidationFailure;

/// Result type for metamodel queries
pub type MetaModelResult<T> = Result<T, MetaModelError>;

/// Result type for supporting-method and action invocation
pub type InvocationResult<T> = Result<T, InvocationError>;

/// Errors surfaced by the specification loader and facet holders
#[derive(Debug, Clone, thiserror::Error)]
pub enum MetaModelError {
    /// The type was never registered with the class catalog
    #[error("Unknown type: {0}")]
    UnknownType(TypeName),

    /// Introspection of the type failed as a whole
    #[error("Type {type_name} could not be introspected: {reason}")]
    Unintrospectable {
        /// Type that failed
        type_name: TypeName,
        /// Why it failed
        reason: String,
    },

    /// The metamodel is locked and the type was not introspected before the lock
    #[error("Metamodel is locked; type {0} was not introspected during bootstrap")]
    Locked(TypeName),

    /// Reload requested outside of prototyping mode
    #[error("Reload of {0} is only permitted in prototyping mode")]
    ReloadNotPermitted(TypeName),

    /// A supporting method is claimed by several aspects with differing intents
    #[error("Supporting method {method} on {feature} has ambiguous intents: {intents}")]
    AmbiguousIntent {
        /// Feature identifier
        feature: String,
        /// Method identifier
        method: String,
        /// Conflicting intents, comma separated
        intents: String,
    },

    /// Reflective invocation failed
    #[error(transparent)]
    Invocation(#[from] InvocationError),

    /// Validation failed at bootstrap (fail-fast mode)
    #[error("Metamodel validation failed with {} failure(s)", .0.len())]
    Validation(Vec<ValidationFailure>),

    /// Configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Failures while calling a catalog invoker.
///
/// These indicate a violated build-time contract (wrong arity, wrong return
/// shape, missing invoker) and are never retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvocationError {
    /// Method was registered without an invoker
    #[error("Method {method} is not invocable")]
    NotInvocable {
        /// Method identifier
        method: String,
    },

    /// Argument count does not match the declared signature
    #[error("Method {method} expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        /// Method identifier
        method: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        actual: usize,
    },

    /// Return value does not have the shape the facet expects
    #[error("Method {method} returned {actual}, expected {expected}")]
    UnexpectedReturn {
        /// Method identifier
        method: String,
        /// Expected shape
        expected: &'static str,
        /// Actual value kind
        actual: &'static str,
    },

    /// Tuple aggregate could not be built from the live arguments
    #[error("Cannot construct parameter tuple {type_name}: {message}")]
    TupleConstruction {
        /// Tuple type
        type_name: String,
        /// Cause
        message: String,
    },

    /// The invoker itself reported an error
    #[error("Method {method} failed: {message}")]
    Failed {
        /// Method identifier
        method: String,
        /// Cause
        message: String,
    },
}

impl InvocationError {
    /// Convenience constructor for invoker closures
    pub fn failed(method: impl Into<String>, message: impl Into<String>) -> Self {
        InvocationError::Failed {
            method: method.into(),
            message: message.into(),
        }
    }
}

/// Error raised by a facet factory while processing one feature.
///
/// The introspector records it as a build failure for that feature only.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FactoryError {
    /// The member has a shape the factory cannot accept
    #[error("{0}")]
    Rejected(String),

    /// A type referenced by the member is not in the catalog
    #[error("Referenced type {0} is not registered")]
    MissingType(TypeName),
}

/// Result type for facet factories
pub type FactoryResult = Result<(), FactoryError>;
