//! Introspection Policy
//!
//! Per-class rules deciding which members are eligible for introspection and
//! whether markers are required. A policy is resolved once per class through
//! a precedence chain and is immutable afterwards.
//!
//! ## Resolution order
//!
//! | Level        | Source                                                   |
//! |--------------|----------------------------------------------------------|
//! | per-class    | explicit entry for the fully qualified type name         |
//! | meta-marker  | `DomainObject { introspection }` or a configured custom marker |
//! | namespace    | pattern rules such as `demo.*` (first match wins)        |
//! | global       | configured default                                       |
//! | fallback     | [`IntrospectionPolicy::AnnotationOptional`]              |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{ClassDescriptor, Marker, MarkerKind, MethodDescriptor, Visibility};
use crate::config::IntrospectionConfig;
use crate::types::TypeName;
use rustc_hash::FxHashMap;

/// Which member visibilities are eligible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncapsulationPolicy {
    /// Only public members
    PublicOnly,
    /// Public and non-public members
    EncapsulatedMembersSupported,
}

/// Whether members need an explicit member marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberMarkerPolicy {
    /// `Action`/`Property`/`Collection` marker required
    Required,
    /// Markers optional
    Optional,
}

/// Whether supporting methods need the `MemberSupport` marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportMarkerPolicy {
    /// Marker required
    Required,
    /// Marker optional
    Optional,
}

/// Canonical introspection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntrospectionPolicy {
    /// Public members only; markers optional
    #[default]
    AnnotationOptional,
    /// Public members only; member markers required
    AnnotationRequired,
    /// Public and non-public members; all markers required
    EncapsulationEnabled,
}

impl IntrospectionPolicy {
    /// Collapse the three independent axes into a canonical mode.
    ///
    /// Encapsulation implies required markers. Without encapsulation the
    /// member-marker axis decides; the support-marker axis only matters
    /// together with encapsulation.
    pub fn from_parts(
        encapsulation: EncapsulationPolicy,
        member_markers: MemberMarkerPolicy,
        _support_markers: SupportMarkerPolicy,
    ) -> Self {
        match (encapsulation, member_markers) {
            (EncapsulationPolicy::EncapsulatedMembersSupported, _) => {
                IntrospectionPolicy::EncapsulationEnabled
            }
            (EncapsulationPolicy::PublicOnly, MemberMarkerPolicy::Required) => {
                IntrospectionPolicy::AnnotationRequired
            }
            (EncapsulationPolicy::PublicOnly, MemberMarkerPolicy::Optional) => {
                IntrospectionPolicy::AnnotationOptional
            }
        }
    }

    /// Encapsulation axis
    pub fn encapsulation(self) -> EncapsulationPolicy {
        match self {
            IntrospectionPolicy::EncapsulationEnabled => EncapsulationPolicy::EncapsulatedMembersSupported,
            _ => EncapsulationPolicy::PublicOnly,
        }
    }

    /// Member-marker axis
    pub fn member_markers(self) -> MemberMarkerPolicy {
        match self {
            IntrospectionPolicy::AnnotationOptional => MemberMarkerPolicy::Optional,
            _ => MemberMarkerPolicy::Required,
        }
    }

    /// Support-marker axis
    pub fn support_markers(self) -> SupportMarkerPolicy {
        match self {
            IntrospectionPolicy::EncapsulationEnabled => SupportMarkerPolicy::Required,
            _ => SupportMarkerPolicy::Optional,
        }
    }

    /// Whether members with this visibility are eligible
    pub fn allows_visibility(self, visibility: Visibility) -> bool {
        visibility.is_public() || self.encapsulation() == EncapsulationPolicy::EncapsulatedMembersSupported
    }

    /// Eligibility of a method as a member (action, property or collection)
    pub fn is_member_eligible(self, method: &MethodDescriptor) -> bool {
        if !self.allows_visibility(method.visibility) {
            return false;
        }
        match self.member_markers() {
            MemberMarkerPolicy::Optional => true,
            MemberMarkerPolicy::Required => {
                method.has_marker(MarkerKind::Action)
                    || method.has_marker(MarkerKind::Property)
                    || method.has_marker(MarkerKind::Collection)
            }
        }
    }

    /// Eligibility of a method as a supporting method
    pub fn is_support_eligible(self, method: &MethodDescriptor) -> bool {
        if !self.allows_visibility(method.visibility) {
            return false;
        }
        match self.support_markers() {
            SupportMarkerPolicy::Optional => true,
            SupportMarkerPolicy::Required => method.has_marker(MarkerKind::MemberSupport),
        }
    }
}

impl fmt::Display for IntrospectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntrospectionPolicy::AnnotationOptional => "annotation-optional",
            IntrospectionPolicy::AnnotationRequired => "annotation-required",
            IntrospectionPolicy::EncapsulationEnabled => "encapsulation-enabled",
        };
        f.write_str(name)
    }
}

/// Which level of the chain produced a resolved policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicySource {
    /// Explicit per-class entry
    PerClass,
    /// Class marker (directly or via a configured meta-marker)
    MetaMarker(String),
    /// Namespace pattern rule
    Namespace(String),
    /// Configured global default
    GlobalDefault,
    /// Hard fallback
    Fallback,
}

/// Namespace pattern rule (supports `*` and `**` suffixes)
#[derive(Debug, Clone)]
pub struct NamespacePolicyRule {
    /// Pattern, e.g. `demo`, `demo.*`, `demo.**`, `**`
    pub pattern: String,
    /// Policy for matching types
    pub policy: IntrospectionPolicy,
}

impl NamespacePolicyRule {
    /// Check if a type matches this rule
    pub fn matches(&self, type_name: &TypeName) -> bool {
        let name = type_name.as_str();
        if self.pattern == "**" || self.pattern == "*" {
            return true;
        }
        if let Some(prefix) = self.pattern.strip_suffix(".**") {
            name.starts_with(prefix) && name[prefix.len()..].starts_with('.')
        } else if let Some(prefix) = self.pattern.strip_suffix(".*") {
            // Direct members of the namespace only
            type_name.namespace() == Some(prefix)
        } else {
            self.pattern == name
        }
    }
}

/// Resolves the policy for each class
#[derive(Debug, Clone, Default)]
pub struct PolicyResolver {
    per_class: FxHashMap<TypeName, IntrospectionPolicy>,
    meta_markers: FxHashMap<String, IntrospectionPolicy>,
    namespace_rules: Vec<NamespacePolicyRule>,
    global_default: Option<IntrospectionPolicy>,
}

impl PolicyResolver {
    /// Empty resolver; everything resolves to the fallback
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver populated from configuration
    pub fn from_config(config: &IntrospectionConfig) -> Self {
        let mut resolver = Self::new();
        resolver.global_default = config.policy;
        for (name, policy) in &config.classes {
            resolver.set_class(TypeName::new(name), *policy);
        }
        for (marker, policy) in &config.meta_markers {
            resolver.set_meta_marker(marker, *policy);
        }
        for rule in &config.namespaces {
            resolver.add_namespace_rule(NamespacePolicyRule {
                pattern: rule.pattern.clone(),
                policy: rule.policy,
            });
        }
        resolver
    }

    /// Set the configured global default
    pub fn set_global(&mut self, policy: IntrospectionPolicy) {
        self.global_default = Some(policy);
    }

    /// Configured global default, if any
    pub fn global(&self) -> Option<IntrospectionPolicy> {
        self.global_default
    }

    /// Pin the policy of one class
    pub fn set_class(&mut self, type_name: TypeName, policy: IntrospectionPolicy) {
        self.per_class.insert(type_name, policy);
    }

    /// Declare that classes carrying `Custom(marker)` use `policy`
    pub fn set_meta_marker(&mut self, marker: &str, policy: IntrospectionPolicy) {
        self.meta_markers.insert(marker.to_string(), policy);
    }

    /// Add a namespace rule; earlier rules win
    pub fn add_namespace_rule(&mut self, rule: NamespacePolicyRule) {
        self.namespace_rules.push(rule);
    }

    /// Resolve the policy for a class
    pub fn resolve(&self, class: &ClassDescriptor) -> (IntrospectionPolicy, PolicySource) {
        if let Some(policy) = self.per_class.get(&class.name) {
            return (*policy, PolicySource::PerClass);
        }

        if let Some((policy, source)) = self.from_markers(&class.markers) {
            return (policy, source);
        }

        if let Some(rule) = self.namespace_rules.iter().find(|r| r.matches(&class.name)) {
            return (rule.policy, PolicySource::Namespace(rule.pattern.clone()));
        }

        match self.global_default {
            Some(policy) => (policy, PolicySource::GlobalDefault),
            None => (IntrospectionPolicy::default(), PolicySource::Fallback),
        }
    }

    fn from_markers(&self, markers: &[Marker]) -> Option<(IntrospectionPolicy, PolicySource)> {
        markers.iter().find_map(|marker| match marker {
            Marker::DomainObject {
                introspection: Some(policy),
            } => Some((*policy, PolicySource::MetaMarker("DomainObject".to_string()))),
            Marker::Custom(name) => self
                .meta_markers
                .get(name)
                .map(|policy| (*policy, PolicySource::MetaMarker(name.clone()))),
            _ => None,
        })
    }
}
