//! Method/Class Index
//!
//! Memoized per-type view over the catalog: declared methods (own plus
//! inherited), declared fields and the getter-for-field mapping. Entries are
//! computed on first access and shared between parallel introspection tasks,
//! since supertypes are common to many classes.

use std::sync::Arc;

use dashmap::DashMap;

use crate::catalog::{ClassCatalog, ClassDescriptor, FieldDescriptor, MethodDescriptor};
use crate::finder::naming;
use crate::types::{TypeName, TypeRef};

/// Memoized members of one type
#[derive(Debug, Default)]
struct IndexEntry {
    methods: Arc<[Arc<MethodDescriptor>]>,
    fields: Arc<[FieldDescriptor]>,
}

/// Concurrent, memoized index over a [`ClassCatalog`]
#[derive(Debug)]
pub struct ClassIndex {
    catalog: Arc<ClassCatalog>,
    entries: DashMap<TypeName, Arc<IndexEntry>>,
}

impl ClassIndex {
    /// Create an index over the catalog
    pub fn new(catalog: Arc<ClassCatalog>) -> Self {
        Self {
            catalog,
            entries: DashMap::new(),
        }
    }

    /// The underlying catalog
    pub fn catalog(&self) -> &Arc<ClassCatalog> {
        &self.catalog
    }

    /// Class descriptor for a type
    pub fn class(&self, type_name: &TypeName) -> Option<Arc<ClassDescriptor>> {
        self.catalog.get(type_name)
    }

    /// All methods of the type, own declarations first, then inherited ones
    /// not shadowed by a same-signature override. Empty for unknown types.
    pub fn declared_methods(&self, type_name: &TypeName) -> Arc<[Arc<MethodDescriptor>]> {
        self.entry(type_name).methods.clone()
    }

    /// All fields of the type including inherited ones. Empty for unknown types.
    pub fn declared_fields(&self, type_name: &TypeName) -> Arc<[FieldDescriptor]> {
        self.entry(type_name).fields.clone()
    }

    /// Methods with the given name
    pub fn methods_named<'a>(
        &self,
        type_name: &TypeName,
        name: &'a str,
    ) -> impl Iterator<Item = Arc<MethodDescriptor>> + 'a {
        let methods = self.declared_methods(type_name);
        (0..methods.len())
            .map(move |i| methods[i].clone())
            .filter(move |m| m.name == name)
    }

    /// Getter for a field: `getX()` (or `isX()` for boolean-like fields) with
    /// no parameters returning the field type.
    pub fn getter_for_field(
        &self,
        type_name: &TypeName,
        field: &str,
    ) -> Option<Arc<MethodDescriptor>> {
        let fields = self.declared_fields(type_name);
        let field = fields.iter().find(|f| f.name == field)?;
        let cap = naming::capitalize(&field.name);

        let mut candidates = vec![format!("get{}", cap)];
        if field.type_ref.is_boolean_like() {
            candidates.insert(0, format!("is{}", cap));
        }

        candidates.iter().find_map(|name| {
            self.methods_named(type_name, name).find(|m| {
                m.params.is_empty() && !m.is_static && m.return_type.matches_boxed(&field.type_ref)
            })
        })
    }

    /// Field backing a getter, if one is declared
    pub fn field_for_getter(
        &self,
        type_name: &TypeName,
        getter: &MethodDescriptor,
    ) -> Option<FieldDescriptor> {
        let name = naming::property_name_from_accessor(&getter.name)?;
        self.declared_fields(type_name)
            .iter()
            .find(|f| f.name == name)
            .cloned()
    }

    /// Assignability of `actual` to `required`, taking boxing and the
    /// catalog's class hierarchy into account
    pub fn is_assignable(&self, actual: &TypeRef, required: &TypeRef) -> bool {
        match (actual, required) {
            (TypeRef::Class(sub), TypeRef::Class(sup)) => self.catalog.is_subtype(sub, sup),
            (TypeRef::Collection(a), TypeRef::Collection(b)) => self.is_assignable(a, b),
            _ => actual.matches_boxed(required),
        }
    }

    /// Drop the memoized entry for a type (and nothing else)
    pub fn invalidate(&self, type_name: &TypeName) {
        self.entries.remove(type_name);
    }

    /// Drop every memoized entry
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of memoized types
    pub fn cached_count(&self) -> usize {
        self.entries.len()
    }

    fn entry(&self, type_name: &TypeName) -> Arc<IndexEntry> {
        if let Some(entry) = self.entries.get(type_name) {
            return entry.clone();
        }
        // Computed outside the map lock; a concurrent writer may win the
        // insert, in which case both computed the same value.
        let computed = Arc::new(self.compute(type_name));
        self.entries
            .entry(type_name.clone())
            .or_insert(computed)
            .clone()
    }

    fn compute(&self, type_name: &TypeName) -> IndexEntry {
        let hierarchy = self.catalog.hierarchy(type_name);
        if hierarchy.is_empty() {
            return IndexEntry::default();
        }

        let mut methods: Vec<Arc<MethodDescriptor>> = Vec::new();
        let mut fields: Vec<FieldDescriptor> = Vec::new();
        for class in &hierarchy {
            for m in &class.methods {
                if !methods.iter().any(|existing| existing.same_signature(m)) {
                    methods.push(m.clone());
                }
            }
            for f in &class.fields {
                if !fields.iter().any(|existing| existing.name == f.name) {
                    fields.push(f.clone());
                }
            }
        }

        IndexEntry {
            methods: methods.into(),
            fields: fields.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ClassBuilder, MethodBuilder, Visibility};

    fn index() -> ClassIndex {
        let catalog = Arc::new(ClassCatalog::new());
        catalog.register(
            ClassBuilder::new("demo.Base")
                .property("id", TypeRef::Text)
                .method(MethodBuilder::new("describe").returns(TypeRef::Text))
                .build(),
        );
        catalog.register(
            ClassBuilder::new("demo.Order")
                .extends("demo.Base")
                .property("status", TypeRef::Text)
                .property("paid", TypeRef::boolean())
                .method(MethodBuilder::new("describe").returns(TypeRef::Text))
                .build(),
        );
        ClassIndex::new(catalog)
    }

    #[test]
    fn test_declared_methods_include_inherited() {
        let index = index();
        let methods = index.declared_methods(&"demo.Order".into());
        let names: Vec<&str> = methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["getStatus", "setStatus", "isPaid", "setPaid", "describe", "getId", "setId"]
        );
        // Override shadows the inherited declaration
        let describe = methods.iter().find(|m| m.name == "describe").unwrap();
        assert_eq!(describe.declaring_type.as_str(), "demo.Order");
    }

    #[test]
    fn test_unknown_type_is_empty() {
        let index = index();
        assert!(index.declared_methods(&"demo.Missing".into()).is_empty());
        assert!(index.declared_fields(&"demo.Missing".into()).is_empty());
        assert!(index.getter_for_field(&"demo.Missing".into(), "x").is_none());
    }

    #[test]
    fn test_memoized_and_invalidated() {
        let index = index();
        let first = index.declared_methods(&"demo.Order".into());
        let second = index.declared_methods(&"demo.Order".into());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(index.cached_count(), 1);

        index.invalidate(&"demo.Order".into());
        assert_eq!(index.cached_count(), 0);
    }

    #[test]
    fn test_getter_for_field() {
        let index = index();
        let order: TypeName = "demo.Order".into();
        assert_eq!(index.getter_for_field(&order, "status").unwrap().name, "getStatus");
        assert_eq!(index.getter_for_field(&order, "paid").unwrap().name, "isPaid");
        assert_eq!(index.getter_for_field(&order, "id").unwrap().name, "getId");
        assert!(index.getter_for_field(&order, "nope").is_none());
    }

    #[test]
    fn test_field_for_getter() {
        let index = index();
        let order: TypeName = "demo.Order".into();
        let getter = index.getter_for_field(&order, "status").unwrap();
        let field = index.field_for_getter(&order, &getter).unwrap();
        assert_eq!(field.name, "status");
        assert_eq!(field.visibility, Visibility::Private);
    }

    #[test]
    fn test_assignability() {
        let index = index();
        assert!(index.is_assignable(&TypeRef::class("demo.Order"), &TypeRef::class("demo.Base")));
        assert!(!index.is_assignable(&TypeRef::class("demo.Base"), &TypeRef::class("demo.Order")));
        assert!(index.is_assignable(
            &TypeRef::collection_of(TypeRef::class("demo.Order")),
            &TypeRef::collection_of(TypeRef::class("demo.Base"))
        ));
    }

    #[test]
    fn test_concurrent_population() {
        let index = Arc::new(index());
        std::thread::scope(|s| {
            for _ in 0..8 {
                let index = index.clone();
                s.spawn(move || {
                    assert_eq!(index.declared_methods(&"demo.Order".into()).len(), 7);
                });
            }
        });
        assert_eq!(index.cached_count(), 1);
    }
}
