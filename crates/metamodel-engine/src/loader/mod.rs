//! Specification loader: the registry of introspected classes.
//!
//! Specifications are created lazily on first request and cached for the
//! life of the loader. `introspect_all` bootstraps every registered class in
//! parallel and may lock the registry afterwards; in prototyping mode single
//! types can be reloaded.
//!
//! Publication is all-or-nothing per class: a specification is built and
//! validated off to the side and then swapped into the registry as one
//! `Arc`. When two threads race on the same type both compute it, the first
//! insert wins and only the winner's failures are recorded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::catalog::ClassCatalog;
use crate::config::MetaModelConfig;
use crate::error::{MetaModelError, MetaModelResult};
use crate::feature::ObjectSpecification;
use crate::index::ClassIndex;
use crate::introspect::Introspector;
use crate::model::ProgrammingModel;
use crate::policy::PolicyResolver;
use crate::types::TypeName;
use crate::validate::{run_validators, FailureCollector, ValidationContext, ValidationFailure};

/// Registry of object specifications over a class catalog
pub struct SpecificationLoader {
    index: ClassIndex,
    model: Arc<ProgrammingModel>,
    resolver: PolicyResolver,
    config: MetaModelConfig,
    specs: DashMap<TypeName, Arc<ObjectSpecification>>,
    failures: FailureCollector,
    locked: AtomicBool,
}

impl SpecificationLoader {
    /// Loader using the default programming model
    pub fn new(catalog: Arc<ClassCatalog>, config: MetaModelConfig) -> Self {
        Self::with_model(catalog, config, Arc::new(ProgrammingModel::default()))
    }

    /// Loader using a custom programming model
    pub fn with_model(catalog: Arc<ClassCatalog>, config: MetaModelConfig, model: Arc<ProgrammingModel>) -> Self {
        Self {
            index: ClassIndex::new(catalog),
            model,
            resolver: PolicyResolver::from_config(&config.introspection),
            config,
            specs: DashMap::new(),
            failures: FailureCollector::new(),
            locked: AtomicBool::new(false),
        }
    }

    /// The class catalog
    pub fn catalog(&self) -> &Arc<ClassCatalog> {
        self.index.catalog()
    }

    /// The memoized class index
    pub fn index(&self) -> &ClassIndex {
        &self.index
    }

    /// The programming model
    pub fn model(&self) -> &ProgrammingModel {
        &self.model
    }

    /// The configuration
    pub fn config(&self) -> &MetaModelConfig {
        &self.config
    }

    /// Specification for a type, introspecting it on first request.
    ///
    /// Once locked, only types introspected before the lock are served.
    pub fn specification_for(&self, type_name: &TypeName) -> MetaModelResult<Arc<ObjectSpecification>> {
        if let Some(spec) = self.specs.get(type_name) {
            return Ok(spec.value().clone());
        }
        if !self.catalog().contains(type_name) {
            return Err(MetaModelError::UnknownType(type_name.clone()));
        }
        if self.is_locked() {
            return Err(MetaModelError::Locked(type_name.clone()));
        }
        self.load(type_name)
    }

    /// Whether a specification for the type has been published
    pub fn is_introspected(&self, type_name: &TypeName) -> bool {
        self.specs.contains_key(type_name)
    }

    /// Every published specification, sorted by type name
    pub fn specifications(&self) -> Vec<Arc<ObjectSpecification>> {
        let mut specs: Vec<Arc<ObjectSpecification>> = self.specs.iter().map(|e| e.value().clone()).collect();
        specs.sort_by(|a, b| a.type_name().cmp(b.type_name()));
        specs
    }

    /// Mixins contributing to a type
    pub fn mixins_for(&self, mixee: &TypeName) -> Vec<TypeName> {
        self.catalog().mixins_for(mixee)
    }

    /// Failures recorded so far
    pub fn current_failures(&self) -> Vec<ValidationFailure> {
        self.failures.snapshot()
    }

    /// Failures recorded so far as JSON
    pub fn failures_json(&self) -> String {
        self.failures.to_json()
    }

    /// Introspect every domain object and mixin in the catalog.
    ///
    /// Classes are processed on `parallelism.worker_count()` threads. A class
    /// that cannot be introspected is recorded as a build failure. Returns
    /// the number of published specifications, or
    /// [`MetaModelError::Validation`] when `validation.fail-fast` is set and
    /// any failure was recorded.
    pub fn introspect_all(&self) -> MetaModelResult<usize> {
        let types = self.catalog().introspectable_types();
        let workers = self.config.parallelism.worker_count().min(types.len().max(1));
        tracing::debug!(types = types.len(), workers, "introspecting all types");

        if workers <= 1 {
            for type_name in &types {
                self.bootstrap_one(type_name);
            }
        } else {
            let (tx, rx) = crossbeam::channel::unbounded::<TypeName>();
            for type_name in types {
                // Receiver is alive until the scope below ends
                let _ = tx.send(type_name);
            }
            drop(tx);

            std::thread::scope(|s| {
                for _ in 0..workers {
                    let rx = rx.clone();
                    s.spawn(move || {
                        while let Ok(type_name) = rx.recv() {
                            self.bootstrap_one(&type_name);
                        }
                    });
                }
            });
        }

        let failures = self.failures.snapshot();
        if self.config.validation.fail_fast && !failures.is_empty() {
            return Err(MetaModelError::Validation(failures));
        }
        if self.config.lock_after_full_introspection {
            self.lock();
        }
        Ok(self.specs.len())
    }

    /// Reject requests for types not yet introspected
    pub fn lock(&self) {
        self.locked.store(true, Ordering::Release);
        tracing::debug!(published = self.specs.len(), "metamodel locked");
    }

    /// Whether the registry is locked
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }

    /// Rebuild one type's specification (prototyping mode only).
    ///
    /// The memoized index entries of the type and of every subclass are
    /// dropped, the class is introspected again and the new specification
    /// replaces the old one. Published subclasses are rebuilt as well. Each
    /// type's failures are swapped for the new ones in a single step.
    pub fn reload(&self, type_name: &TypeName) -> MetaModelResult<Arc<ObjectSpecification>> {
        if !self.config.prototyping {
            return Err(MetaModelError::ReloadNotPermitted(type_name.clone()));
        }
        let catalog = self.catalog();
        let dependents: Vec<TypeName> = catalog
            .type_names()
            .into_iter()
            .filter(|t| t != type_name && catalog.is_subtype(t, type_name))
            .collect();
        self.index.invalidate(type_name);
        for dependent in &dependents {
            self.index.invalidate(dependent);
        }

        let spec = self.rebuild(type_name)?;
        for dependent in dependents.iter().filter(|t| self.specs.contains_key(*t)) {
            if let Err(e) = self.rebuild(dependent) {
                tracing::debug!(type_name = %dependent, error = %e, "dependent not introspectable");
                self.specs.remove(dependent);
                self.replace_failures(
                    dependent,
                    vec![ValidationFailure::build(dependent.as_str(), dependent.to_string(), e.to_string())],
                );
            }
        }
        tracing::debug!(type_name = %type_name, dependents = dependents.len(), "reloaded");
        Ok(spec)
    }

    /// Drop every specification, memoized index entry and failure, and unlock
    pub fn clear(&self) {
        self.specs.clear();
        self.index.clear();
        self.failures.clear();
        self.locked.store(false, Ordering::Release);
    }

    // ── Internal ─────────────────────────────────────────────────────────

    fn bootstrap_one(&self, type_name: &TypeName) {
        if self.specs.contains_key(type_name) {
            return;
        }
        if let Err(e) = self.load(type_name) {
            tracing::debug!(type_name = %type_name, error = %e, "type not introspectable");
            self.record(vec![ValidationFailure::build(
                type_name.as_str(),
                type_name.to_string(),
                e.to_string(),
            )]);
        }
    }

    fn load(&self, type_name: &TypeName) -> MetaModelResult<Arc<ObjectSpecification>> {
        let (spec, failures) = self.build(type_name)?;
        match self.specs.entry(type_name.clone()) {
            Entry::Occupied(existing) => Ok(existing.get().clone()),
            Entry::Vacant(slot) => {
                let spec = slot.insert(Arc::new(spec)).value().clone();
                self.record(failures);
                Ok(spec)
            }
        }
    }

    /// Introspect and validate without publishing
    fn build(&self, type_name: &TypeName) -> MetaModelResult<(ObjectSpecification, Vec<ValidationFailure>)> {
        let introspector = Introspector::new(&self.index, &self.model, &self.resolver);
        let result = introspector.introspect(type_name)?;
        let ctx = ValidationContext {
            index: &self.index,
            config: &self.config.validation,
        };
        let mut failures = result.failures;
        failures.extend(run_validators(self.model.validators(), &result.spec, &ctx));
        Ok((result.spec, failures))
    }

    /// Build and publish over any existing specification
    fn rebuild(&self, type_name: &TypeName) -> MetaModelResult<Arc<ObjectSpecification>> {
        let (spec, failures) = self.build(type_name)?;
        let spec = Arc::new(spec);
        self.specs.insert(type_name.clone(), spec.clone());
        self.replace_failures(type_name, failures);
        Ok(spec)
    }

    fn record(&self, failures: Vec<ValidationFailure>) {
        self.report(&failures);
        self.failures.extend(failures);
    }

    fn replace_failures(&self, type_name: &TypeName, failures: Vec<ValidationFailure>) {
        self.report(&failures);
        self.failures.replace_for(type_name.as_str(), failures);
    }

    fn report(&self, failures: &[ValidationFailure]) {
        if !self.config.prototyping {
            return;
        }
        for failure in failures {
            tracing::warn!(
                code = failure.code,
                origin = %failure.origin,
                kind = %failure.kind,
                "{}",
                failure.message
            );
        }
    }
}

impl std::fmt::Debug for SpecificationLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecificationLoader")
            .field("published", &self.specs.len())
            .field("failures", &self.failures.len())
            .field("locked", &self.is_locked())
            .finish()
    }
}
