//! Metamodel validation.
//!
//! Validators run after a class has been introspected. Each one implements
//! `MetaModelValidator`, provides metadata (`ValidatorMeta`) and returns the
//! failures it finds; they never abort introspection. Failures accumulate in
//! a shared [`FailureCollector`] until bootstrap completes.

pub mod validators;

use std::fmt;

use parking_lot::Mutex;
use serde::Serialize;

use crate::config::ValidationConfig;
use crate::feature::ObjectSpecification;
use crate::index::ClassIndex;

/// Category of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// A marker's constraint was not met
    Configuration,
    /// A convention-shaped method no factory claimed
    Orphan,
    /// Several supporting methods or intents compete
    Ambiguity,
    /// A factory rejected a feature, or the class could not be introspected
    Build,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Configuration => "configuration",
            FailureKind::Orphan => "orphan",
            FailureKind::Ambiguity => "ambiguity",
            FailureKind::Build => "build",
        };
        f.write_str(name)
    }
}

/// A single problem found in the metamodel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationFailure {
    /// Code of the validator (or `M0001` for build failures)
    pub code: &'static str,
    /// Type the failure belongs to
    pub type_name: String,
    /// Feature or method identifier the failure is about
    pub origin: String,
    /// Category
    pub kind: FailureKind,
    /// Human-readable message
    pub message: String,
}

/// Code used for factory and introspection failures
pub const BUILD_FAILURE_CODE: &str = "M0001";

impl ValidationFailure {
    /// Failure recorded by the introspector for a rejected feature
    pub fn build(type_name: &str, origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: BUILD_FAILURE_CODE,
            type_name: type_name.to_string(),
            origin: origin.into(),
            kind: FailureKind::Build,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({}): {}", self.code, self.origin, self.kind, self.message)
    }
}

/// Thread-safe accumulator of failures across classes
#[derive(Debug, Default)]
pub struct FailureCollector {
    failures: Mutex<Vec<ValidationFailure>>,
}

impl FailureCollector {
    /// Empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one failure
    pub fn add(&self, failure: ValidationFailure) {
        self.failures.lock().push(failure);
    }

    /// Record several failures
    pub fn extend(&self, failures: impl IntoIterator<Item = ValidationFailure>) {
        self.failures.lock().extend(failures);
    }

    /// Copy of every failure recorded so far
    pub fn snapshot(&self) -> Vec<ValidationFailure> {
        self.failures.lock().clone()
    }

    /// Swap the failures of one type for `failures` under a single lock
    pub fn replace_for(&self, type_name: &str, failures: impl IntoIterator<Item = ValidationFailure>) {
        let mut all = self.failures.lock();
        all.retain(|f| f.type_name != type_name);
        all.extend(failures);
    }

    /// Drop every failure
    pub fn clear(&self) {
        self.failures.lock().clear();
    }

    /// Number of failures
    pub fn len(&self) -> usize {
        self.failures.lock().len()
    }

    /// Whether no failure was recorded
    pub fn is_empty(&self) -> bool {
        self.failures.lock().is_empty()
    }

    /// Failures as a JSON array, for tooling
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&*self.failures.lock()).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Static metadata for a validator.
pub struct ValidatorMeta {
    /// Validator name, e.g. "orphan-method"
    pub name: &'static str,
    /// Failure code, e.g. "M1002"
    pub code: &'static str,
    /// Human-readable description
    pub description: &'static str,
}

/// Context passed to each validator.
pub struct ValidationContext<'a> {
    /// Class index
    pub index: &'a ClassIndex,
    /// Validation settings
    pub config: &'a ValidationConfig,
}

/// Trait that every metamodel validator implements.
pub trait MetaModelValidator: Send + Sync {
    /// Static metadata for this validator.
    fn meta(&self) -> &ValidatorMeta;

    /// Check one introspected class.
    fn validate(&self, spec: &ObjectSpecification, ctx: &ValidationContext<'_>) -> Vec<ValidationFailure>;

    /// Failure attributed to this validator
    fn failure(
        &self,
        spec: &ObjectSpecification,
        origin: impl Into<String>,
        kind: FailureKind,
        message: impl Into<String>,
    ) -> ValidationFailure
    where
        Self: Sized,
    {
        ValidationFailure {
            code: self.meta().code,
            type_name: spec.type_name().to_string(),
            origin: origin.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Run every validator over one class
pub fn run_validators(
    validators: &[Box<dyn MetaModelValidator>],
    spec: &ObjectSpecification,
    ctx: &ValidationContext<'_>,
) -> Vec<ValidationFailure> {
    let mut failures = Vec::new();
    for validator in validators {
        let found = validator.validate(spec, ctx);
        if !found.is_empty() {
            tracing::trace!(
                validator = validator.meta().name,
                type_name = %spec.type_name(),
                count = found.len(),
                "validation failures"
            );
        }
        failures.extend(found);
    }
    failures
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(type_name: &str) -> ValidationFailure {
        ValidationFailure::build(type_name, format!("{}#x", type_name), "rejected")
    }

    #[test]
    fn test_collector_replace_for() {
        let collector = FailureCollector::new();
        collector.add(failure("demo.Order"));
        collector.extend([failure("demo.Customer"), failure("demo.Order")]);
        assert_eq!(collector.len(), 3);

        collector.replace_for("demo.Order", Vec::new());
        let remaining = collector.snapshot();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].type_name, "demo.Customer");

        let mut rebuilt = failure("demo.Order");
        rebuilt.message = "still rejected".into();
        collector.replace_for("demo.Order", [rebuilt]);
        let messages: Vec<String> = collector.snapshot().into_iter().map(|f| f.message).collect();
        assert_eq!(messages, vec!["rejected", "still rejected"]);
    }

    #[test]
    fn test_replace_is_atomic_for_readers() {
        let collector = FailureCollector::new();
        collector.add(failure("demo.Order"));
        std::thread::scope(|s| {
            let collector = &collector;
            s.spawn(move || {
                for _ in 0..200 {
                    collector.replace_for("demo.Order", [failure("demo.Order")]);
                }
            });
            s.spawn(move || {
                for _ in 0..200 {
                    assert_eq!(collector.len(), 1);
                }
            });
        });
    }

    #[test]
    fn test_collector_concurrent_adds() {
        let collector = FailureCollector::new();
        std::thread::scope(|s| {
            for i in 0..4 {
                let collector = &collector;
                s.spawn(move || {
                    for _ in 0..25 {
                        collector.add(failure(&format!("demo.T{}", i)));
                    }
                });
            }
        });
        assert_eq!(collector.len(), 100);
    }

    #[test]
    fn test_failure_json() {
        let collector = FailureCollector::new();
        collector.add(failure("demo.Order"));
        let json: serde_json::Value = serde_json::from_str(&collector.to_json()).unwrap();
        assert_eq!(json[0]["code"], "M0001");
        assert_eq!(json[0]["kind"], "build");
        assert_eq!(json[0]["origin"], "demo.Order#x");
    }

    #[test]
    fn test_failure_display() {
        let text = failure("demo.Order").to_string();
        assert_eq!(text, "[M0001] demo.Order#x (build): rejected");
    }
}
