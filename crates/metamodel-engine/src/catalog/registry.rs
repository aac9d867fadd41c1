//! Registration table of class descriptors

use std::sync::Arc;

use dashmap::DashMap;

use super::{ClassDescriptor, ClassKind};
use crate::types::TypeName;

/// Registry of all classes known to the engine.
///
/// Registration may happen from any thread. Re-registering a name replaces
/// the previous descriptor (used by prototyping reloads).
#[derive(Debug, Default)]
pub struct ClassCatalog {
    classes: DashMap<TypeName, Arc<ClassDescriptor>>,
}

impl ClassCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a class
    pub fn register(&self, class: ClassDescriptor) -> Arc<ClassDescriptor> {
        let class = Arc::new(class);
        self.classes.insert(class.name.clone(), class.clone());
        class
    }

    /// Look up a class
    pub fn get(&self, name: &TypeName) -> Option<Arc<ClassDescriptor>> {
        self.classes.get(name).map(|entry| entry.clone())
    }

    /// Check for a class
    pub fn contains(&self, name: &TypeName) -> bool {
        self.classes.contains_key(name)
    }

    /// Remove a class
    pub fn remove(&self, name: &TypeName) -> Option<Arc<ClassDescriptor>> {
        self.classes.remove(name).map(|(_, class)| class)
    }

    /// All registered names, sorted for deterministic iteration
    pub fn type_names(&self) -> Vec<TypeName> {
        let mut names: Vec<TypeName> = self.classes.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Names of introspectable classes (domain objects and mixins), sorted
    pub fn introspectable_types(&self) -> Vec<TypeName> {
        let mut names: Vec<TypeName> = self
            .classes
            .iter()
            .filter(|e| e.value().is_introspectable())
            .map(|e| e.key().clone())
            .collect();
        names.sort();
        names
    }

    /// Mixins that contribute to `mixee`, sorted by name
    pub fn mixins_for(&self, mixee: &TypeName) -> Vec<TypeName> {
        let mut names: Vec<TypeName> = self
            .classes
            .iter()
            .filter(|e| matches!(&e.value().kind, ClassKind::Mixin { mixee: m, .. } if m == mixee))
            .map(|e| e.key().clone())
            .collect();
        names.sort();
        names
    }

    /// Superclass chain starting at `name` (inclusive), most derived first.
    ///
    /// Stops at the first unregistered ancestor or on a cycle.
    pub fn hierarchy(&self, name: &TypeName) -> Vec<Arc<ClassDescriptor>> {
        let mut chain: Vec<Arc<ClassDescriptor>> = Vec::new();
        let mut current = self.get(name);
        while let Some(class) = current {
            if chain.iter().any(|c| c.name == class.name) {
                break;
            }
            current = class.superclass.as_ref().and_then(|s| self.get(s));
            chain.push(class);
        }
        chain
    }

    /// Check whether `sub` is `sup` or inherits from it
    pub fn is_subtype(&self, sub: &TypeName, sup: &TypeName) -> bool {
        sub == sup || self.hierarchy(sub).iter().any(|c| &c.name == sup)
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
