//! Metamodel configuration
//!
//! The engine consumes configuration but does not locate or load it; callers
//! build a [`MetaModelConfig`] directly or deserialize one, e.g. from the
//! `[metamodel]` table of an application manifest:
//!
//! ```toml
//! lock-after-full-introspection = true
//!
//! [introspection]
//! policy = "annotation-required"
//!
//! [introspection.classes]
//! "demo.Legacy" = "annotation-optional"
//!
//! [introspection.meta-markers]
//! "Encapsulated" = "encapsulation-enabled"
//!
//! [[introspection.namespaces]]
//! pattern = "demo.internal.**"
//! policy = "encapsulation-enabled"
//!
//! [parallelism]
//! enabled = true
//! threads = 4
//!
//! [validation]
//! fail-fast = true
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MetaModelError, MetaModelResult};
use crate::policy::IntrospectionPolicy;

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MetaModelConfig {
    /// Policy resolution inputs
    pub introspection: IntrospectionConfig,
    /// Bootstrap fan-out
    pub parallelism: ParallelismConfig,
    /// Validation behavior
    pub validation: ValidationConfig,
    /// After `introspect_all`, reject requests for types not yet introspected
    pub lock_after_full_introspection: bool,
    /// Allow reloads and surface failures as warnings
    pub prototyping: bool,
}

impl MetaModelConfig {
    /// Parse from TOML text
    pub fn from_toml_str(source: &str) -> MetaModelResult<Self> {
        toml::from_str(source).map_err(|e| MetaModelError::Config(e.to_string()))
    }
}

/// Inputs to [`PolicyResolver`](crate::policy::PolicyResolver)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct IntrospectionConfig {
    /// Global default policy
    pub policy: Option<IntrospectionPolicy>,
    /// Per-class policies keyed by fully qualified type name
    pub classes: BTreeMap<String, IntrospectionPolicy>,
    /// Custom class markers implying a policy
    pub meta_markers: BTreeMap<String, IntrospectionPolicy>,
    /// Namespace rules, first match wins
    pub namespaces: Vec<NamespaceRuleConfig>,
}

/// One namespace rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceRuleConfig {
    /// Pattern such as `demo.*`
    pub pattern: String,
    /// Policy for matching classes
    pub policy: IntrospectionPolicy,
}

/// Bootstrap fan-out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ParallelismConfig {
    /// Introspect classes on worker threads
    pub enabled: bool,
    /// Worker count; defaults to the number of CPUs
    pub threads: Option<usize>,
}

impl Default for ParallelismConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threads: None,
        }
    }
}

impl ParallelismConfig {
    /// Effective worker count (at least one)
    pub fn worker_count(&self) -> usize {
        if !self.enabled {
            return 1;
        }
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }
}

/// Validation behavior
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ValidationConfig {
    /// Fail `introspect_all` when any failure was collected
    pub fail_fast: bool,
    /// Report public methods ignored because they lack a member marker
    pub report_unmarked_members: bool,
}
