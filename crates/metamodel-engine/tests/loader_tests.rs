//! Specification registry: bootstrap, concurrency, locking and reload

use std::sync::Arc;

use metamodel_engine::*;

fn wide_catalog(classes: usize) -> Arc<ClassCatalog> {
    let catalog = ClassCatalog::new();
    for i in 0..classes {
        catalog.register(
            ClassBuilder::new(format!("demo.Entity{:03}", i))
                .property("name", TypeRef::Text)
                .property("active", TypeRef::boolean())
                .method(MethodBuilder::new("archive"))
                .method(MethodBuilder::new("hideArchive").returns(TypeRef::boolean()))
                .build(),
        );
    }
    Arc::new(catalog)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn threaded(threads: usize) -> MetaModelConfig {
    let mut config = MetaModelConfig::default();
    config.parallelism.enabled = true;
    config.parallelism.threads = Some(threads);
    config
}

#[test]
fn test_parallel_bootstrap_matches_sequential() {
    let parallel = SpecificationLoader::new(wide_catalog(64), threaded(4));
    assert_eq!(parallel.introspect_all().unwrap(), 64);

    let mut config = MetaModelConfig::default();
    config.parallelism.enabled = false;
    let sequential = SpecificationLoader::new(wide_catalog(64), config);
    assert_eq!(sequential.introspect_all().unwrap(), 64);

    let summary = |loader: &SpecificationLoader| {
        loader
            .specifications()
            .iter()
            .map(|s| {
                (
                    s.type_name().to_string(),
                    s.properties.len(),
                    s.actions.len(),
                    s.unclaimed_methods.len(),
                )
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(summary(&parallel), summary(&sequential));
    assert!(parallel.current_failures().is_empty());
    assert!(parallel
        .specifications()
        .iter()
        .all(|s| s.action("archive").is_some() && s.property("active").is_some()));
}

#[test]
fn test_concurrent_requests_share_one_specification() {
    let loader = SpecificationLoader::new(wide_catalog(1), MetaModelConfig::default());
    let name: TypeName = "demo.Entity000".into();
    let (loader_ref, name_ref) = (&loader, &name);

    let specs: Vec<Arc<ObjectSpecification>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(move || loader_ref.specification_for(name_ref).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(specs.iter().all(|s| Arc::ptr_eq(s, &specs[0])));
    assert_eq!(loader.specifications().len(), 1);
}

#[test]
fn test_unintrospectable_class_recorded_as_build_failure() {
    let catalog = ClassCatalog::new();
    catalog.register(ClassBuilder::new("demo.Order").build());
    catalog.register(ClassBuilder::mixin("demo.Order_refund", "demo.Order", "act").build());
    let loader = SpecificationLoader::new(Arc::new(catalog), threaded(2));

    assert_eq!(loader.introspect_all().unwrap(), 1);
    let failures = loader.current_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].kind, FailureKind::Build);
    assert_eq!(failures[0].type_name, "demo.Order_refund");

    let json: serde_json::Value = serde_json::from_str(&loader.failures_json()).unwrap();
    assert_eq!(json[0]["code"], "M0001");
}

#[test]
fn test_mixins_for_mixee() {
    let catalog = ClassCatalog::new();
    catalog.register(ClassBuilder::new("demo.Order").build());
    catalog.register(
        ClassBuilder::mixin("demo.Order_refund", "demo.Order", "act")
            .method(MethodBuilder::new("act"))
            .build(),
    );
    catalog.register(
        ClassBuilder::mixin("demo.Order_cancel", "demo.Order", "act")
            .method(MethodBuilder::new("act"))
            .build(),
    );
    let loader = SpecificationLoader::new(Arc::new(catalog), MetaModelConfig::default());
    loader.introspect_all().unwrap();

    let mixins: Vec<String> = loader
        .mixins_for(&"demo.Order".into())
        .iter()
        .map(|t| t.to_string())
        .collect();
    assert_eq!(mixins, vec!["demo.Order_cancel", "demo.Order_refund"]);

    let refund = loader.specification_for(&"demo.Order_refund".into()).unwrap();
    assert!(refund.is_mixin());
    assert_eq!(refund.actions[0].friendly_name(), Some("Refund"));
}

#[test]
fn test_locked_registry_serves_published_types_only() {
    let catalog = wide_catalog(2);
    let mut config = threaded(2);
    config.lock_after_full_introspection = true;
    let loader = SpecificationLoader::new(catalog.clone(), config);
    loader.introspect_all().unwrap();
    assert!(loader.is_locked());

    catalog.register(ClassBuilder::new("demo.Late").build());
    assert!(matches!(
        loader.specification_for(&"demo.Late".into()),
        Err(MetaModelError::Locked(_))
    ));
    assert!(matches!(
        loader.specification_for(&"demo.Missing".into()),
        Err(MetaModelError::UnknownType(_))
    ));
    assert!(loader.specification_for(&"demo.Entity001".into()).is_ok());
}

#[test]
fn test_reload_in_prototyping_mode() {
    init_tracing();
    let catalog = ClassCatalog::new();
    catalog.register(
        ClassBuilder::new("demo.Order")
            .property("status", TypeRef::Text)
            .method(MethodBuilder::new("hideFoo").returns(TypeRef::boolean()))
            .build(),
    );
    let catalog = Arc::new(catalog);
    let config = MetaModelConfig {
        prototyping: true,
        ..MetaModelConfig::default()
    };
    let loader = SpecificationLoader::new(catalog.clone(), config);
    let name: TypeName = "demo.Order".into();

    let before = loader.specification_for(&name).unwrap();
    assert!(before.action("ship").is_none());
    assert_eq!(loader.current_failures().len(), 1);

    catalog.register(
        ClassBuilder::new("demo.Order")
            .property("status", TypeRef::Text)
            .method(MethodBuilder::new("ship"))
            .build(),
    );
    let after = loader.reload(&name).unwrap();
    assert!(after.action("ship").is_some());
    assert!(!Arc::ptr_eq(&before, &after));
    assert!(Arc::ptr_eq(&after, &loader.specification_for(&name).unwrap()));
    // The orphan went away with the old definition
    assert!(loader.current_failures().is_empty());
    // Readers holding the old specification still see it unchanged
    assert!(before.action("ship").is_none());
}

#[test]
fn test_reload_rebuilds_subclasses() {
    let catalog = ClassCatalog::new();
    catalog.register(
        ClassBuilder::new("demo.Party")
            .property("name", TypeRef::Text)
            .method(MethodBuilder::new("hideFoo").returns(TypeRef::boolean()))
            .build(),
    );
    catalog.register(
        ClassBuilder::new("demo.Customer")
            .extends("demo.Party")
            .method(MethodBuilder::new("archive"))
            .build(),
    );
    let catalog = Arc::new(catalog);
    let config = MetaModelConfig {
        prototyping: true,
        ..MetaModelConfig::default()
    };
    let loader = SpecificationLoader::new(catalog.clone(), config);
    let party: TypeName = "demo.Party".into();
    let customer: TypeName = "demo.Customer".into();

    let before = loader.specification_for(&customer).unwrap();
    loader.specification_for(&party).unwrap();
    assert!(before.action("deactivate").is_none());
    // The inherited orphan is reported against both types
    assert_eq!(loader.current_failures().len(), 2);

    catalog.register(
        ClassBuilder::new("demo.Party")
            .property("name", TypeRef::Text)
            .method(MethodBuilder::new("deactivate"))
            .build(),
    );
    loader.reload(&party).unwrap();

    let after = loader.specification_for(&customer).unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert!(after.action("deactivate").is_some());
    assert!(after.action("archive").is_some());
    assert!(loader.current_failures().is_empty());
}

#[test]
fn test_config_from_manifest_table() {
    let config = MetaModelConfig::from_toml_str(
        r#"
lock-after-full-introspection = true

[parallelism]
enabled = false

[validation]
fail-fast = true
"#,
    )
    .unwrap();
    assert_eq!(config.parallelism.worker_count(), 1);

    let loader = SpecificationLoader::new(wide_catalog(3), config);
    assert_eq!(loader.introspect_all().unwrap(), 3);
    assert!(loader.is_locked());
}

#[test]
fn test_invalid_config_is_rejected() {
    let err = MetaModelConfig::from_toml_str("[introspection]\npolicy = \"sometimes\"").unwrap_err();
    assert!(matches!(err, MetaModelError::Config(_)));
}
