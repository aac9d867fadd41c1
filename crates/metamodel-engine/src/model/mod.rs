//! Programming model: the ordered facet factories and validators applied to
//! every class.
//!
//! Order is significant: factories claim methods from a shared pool and the
//! first to claim a method keeps it. The default model is
//! [`all_factories`] followed by [`all_validators`]; callers adjust it through
//! [`ProgrammingModelBuilder`].

use crate::factory::factories::all_factories;
use crate::factory::FacetFactory;
use crate::validate::validators::all_validators;
use crate::validate::MetaModelValidator;

/// Ordered factories and validators
pub struct ProgrammingModel {
    factories: Vec<Box<dyn FacetFactory>>,
    validators: Vec<Box<dyn MetaModelValidator>>,
}

impl ProgrammingModel {
    /// Builder starting from an empty model
    pub fn builder() -> ProgrammingModelBuilder {
        ProgrammingModelBuilder::default()
    }

    /// Factories in processing order
    pub fn factories(&self) -> &[Box<dyn FacetFactory>] {
        &self.factories
    }

    /// Validators in run order
    pub fn validators(&self) -> &[Box<dyn MetaModelValidator>] {
        &self.validators
    }

    /// Factory names in processing order
    pub fn factory_names(&self) -> Vec<&'static str> {
        self.factories.iter().map(|f| f.meta().name).collect()
    }
}

impl Default for ProgrammingModel {
    fn default() -> Self {
        ProgrammingModel::builder().with_defaults().build()
    }
}

impl std::fmt::Debug for ProgrammingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgrammingModel")
            .field("factories", &self.factory_names())
            .field(
                "validators",
                &self.validators.iter().map(|v| v.meta().name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Assembles a [`ProgrammingModel`]
#[derive(Default)]
pub struct ProgrammingModelBuilder {
    factories: Vec<Box<dyn FacetFactory>>,
    validators: Vec<Box<dyn MetaModelValidator>>,
}

impl ProgrammingModelBuilder {
    /// Append the default factories and validators
    pub fn with_defaults(mut self) -> Self {
        self.factories.extend(all_factories());
        self.validators.extend(all_validators());
        self
    }

    /// Append a factory
    pub fn add_factory(mut self, factory: Box<dyn FacetFactory>) -> Self {
        self.factories.push(factory);
        self
    }

    /// Insert a factory before the one named `before`; appended if there is
    /// no such factory
    pub fn insert_before(mut self, before: &str, factory: Box<dyn FacetFactory>) -> Self {
        match self.factories.iter().position(|f| f.meta().name == before) {
            Some(pos) => self.factories.insert(pos, factory),
            None => {
                tracing::warn!(
                    factory = factory.meta().name,
                    before,
                    "insert_before target not found, appending"
                );
                self.factories.push(factory);
            }
        }
        self
    }

    /// Remove every factory with the given name
    pub fn remove_factory(mut self, name: &str) -> Self {
        self.factories.retain(|f| f.meta().name != name);
        self
    }

    /// Append a validator
    pub fn add_validator(mut self, validator: Box<dyn MetaModelValidator>) -> Self {
        self.validators.push(validator);
        self
    }

    /// Remove every validator with the given name
    pub fn remove_validator(mut self, name: &str) -> Self {
        self.validators.retain(|v| v.meta().name != name);
        self
    }

    /// Finish
    pub fn build(self) -> ProgrammingModel {
        ProgrammingModel {
            factories: self.factories,
            validators: self.validators,
        }
    }
}
