//! End-to-end introspection through the specification loader

use std::sync::Arc;

use metamodel_engine::error::FactoryResult;
use metamodel_engine::facet::{
    AutoCompleteFacet, ChoicesFacet, DefaultedFacet, DescribedFacet, DomainEventFacet, HideForContextFacet,
    IntrospectionPolicyFacet, NamedFacet, ValidateFacet,
};
use metamodel_engine::factory::{ClassContext, MethodContext};
use metamodel_engine::finder::MethodQuery;
use metamodel_engine::policy::PolicySource;
use metamodel_engine::support::CallingConvention;
use metamodel_engine::*;

fn customer() -> TypeRef {
    TypeRef::class("demo.Customer")
}

fn order_catalog() -> Arc<ClassCatalog> {
    let catalog = ClassCatalog::new();
    catalog.register(ClassBuilder::new("demo.Customer").property("name", TypeRef::Text).build());
    catalog.register(
        ClassBuilder::value("demo.PlaceOrderArgs")
            .record_constructor(&[("customer", customer()), ("quantity", TypeRef::int())])
            .build(),
    );
    catalog.register(
        ClassBuilder::new("demo.Order")
            .property("status", TypeRef::Text)
            .method(
                MethodBuilder::new("disableStatus")
                    .returns(TypeRef::Text)
                    .invoker(|target, _| {
                        if target.get("shipped").as_bool() == Some(true) {
                            Ok(Value::from("order is shipped"))
                        } else {
                            Ok(Value::Null)
                        }
                    }),
            )
            .method(
                MethodBuilder::new("placeOrder")
                    .param("customer", customer())
                    .param("quantity", TypeRef::int()),
            )
            .method(
                MethodBuilder::new("validatePlaceOrder")
                    .param("args", TypeRef::class("demo.PlaceOrderArgs"))
                    .returns(TypeRef::Text)
                    .invoker(|_, args| {
                        let quantity = args
                            .first()
                            .and_then(Value::as_object)
                            .and_then(|o| o.get("quantity").as_int())
                            .unwrap_or(0);
                        if quantity > 10 {
                            Ok(Value::from("too many"))
                        } else {
                            Ok(Value::Null)
                        }
                    }),
            )
            .method(
                MethodBuilder::new("default0PlaceOrder")
                    .returns(customer())
                    .invoker(|_, _| Ok(Value::from(ObjectHandle::new("demo.Customer").with("name", "Alice")))),
            )
            .method(
                MethodBuilder::new("choices1PlaceOrder")
                    .param("customer", customer())
                    .returns(TypeRef::collection_of(TypeRef::int()))
                    .invoker(|_, args| Ok(Value::List(vec![Value::from(args.len() as i64)]))),
            )
            .method(
                MethodBuilder::new("autoComplete0PlaceOrder")
                    .param("search", TypeRef::Text)
                    .returns(TypeRef::collection_of(customer()))
                    .invoker(|_, args| {
                        let search = args.first().and_then(Value::as_text).unwrap_or_default().to_string();
                        Ok(Value::List(vec![Value::from(
                            ObjectHandle::new("demo.Customer").with("name", search),
                        )]))
                    }),
            )
            .build(),
    );
    Arc::new(catalog)
}

fn loader(catalog: Arc<ClassCatalog>) -> SpecificationLoader {
    SpecificationLoader::new(catalog, MetaModelConfig::default())
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_disabled_reason_follows_object_state() {
    let loader = loader(order_catalog());
    let spec = loader.specification_for(&"demo.Order".into()).unwrap();
    let status = spec.property("status").unwrap();

    let open = ObjectHandle::new("demo.Order");
    assert_eq!(status.disabled_reason(&open, &[]).unwrap(), None);

    let shipped = ObjectHandle::new("demo.Order").with("shipped", true);
    assert_eq!(
        status.disabled_reason(&shipped, &[]).unwrap().as_deref(),
        Some("order is shipped")
    );
}

#[test]
fn test_property_get_and_set_through_facets() {
    let loader = loader(order_catalog());
    let spec = loader.specification_for(&"demo.Order".into()).unwrap();
    let status = spec.property("status").unwrap();
    let order = ObjectHandle::new("demo.Order");

    let setter = status.facet::<facet::PropertySetterFacet>().unwrap();
    setter.set(&order, Value::from("paid")).unwrap();
    let accessor = status.facet::<facet::AccessorFacet>().unwrap();
    assert_eq!(accessor.get(&order).unwrap().as_text(), Some("paid"));
}

// ============================================================================
// Action Support
// ============================================================================

#[test]
fn test_action_validate_uses_parameter_tuple() {
    let loader = loader(order_catalog());
    let spec = loader.specification_for(&"demo.Order".into()).unwrap();
    let place = spec.action("placeOrder").unwrap();
    let validate = place.facet::<ValidateFacet>().unwrap();
    assert!(matches!(validate.aspect.convention, CallingConvention::Tuple { .. }));

    let order = ObjectHandle::new("demo.Order");
    let alice = Value::from(ObjectHandle::new("demo.Customer"));
    assert_eq!(
        validate.invalid_reason(&order, &[alice.clone(), Value::from(3)]).unwrap(),
        None
    );
    assert_eq!(
        validate
            .invalid_reason(&order, &[alice, Value::from(12)])
            .unwrap()
            .as_deref(),
        Some("too many")
    );
}

#[test]
fn test_parameter_support_sweeps_prefixes() {
    let loader = loader(order_catalog());
    let spec = loader.specification_for(&"demo.Order".into()).unwrap();
    let place = spec.action("placeOrder").unwrap();
    let order = ObjectHandle::new("demo.Order");
    let args = [Value::from(ObjectHandle::new("demo.Customer")), Value::from(5)];

    let default = place.params[0].holder.facet::<DefaultedFacet>().unwrap();
    assert!(matches!(default.aspect.convention, CallingConvention::Prefix { arity: 0 }));
    let value = default.default_value(&order, &[]).unwrap();
    assert_eq!(value.as_object().map(|c| c.get("name").as_text().map(str::to_string)), Some(Some("Alice".into())));

    // choices1PlaceOrder(Customer) receives only the leading argument
    let choices = place.params[1].holder.facet::<ChoicesFacet>().unwrap();
    assert!(matches!(choices.aspect.convention, CallingConvention::Prefix { arity: 1 }));
    let offered = choices.choices(&order, &args).unwrap();
    assert_eq!(offered.len(), 1);
    assert_eq!(offered[0].as_int(), Some(1));
}

#[test]
fn test_auto_complete_passes_search_term() {
    let loader = loader(order_catalog());
    let spec = loader.specification_for(&"demo.Order".into()).unwrap();
    let place = spec.action("placeOrder").unwrap();
    let auto = place.params[0].holder.facet::<AutoCompleteFacet>().unwrap();
    let order = ObjectHandle::new("demo.Order");

    assert!(auto.auto_complete(&order, &[], "").unwrap().is_empty());
    let found = auto.auto_complete(&order, &[], "Al").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(
        found[0].as_object().map(|c| c.get("name").as_text().map(str::to_string)),
        Some(Some("Al".into()))
    );
}

#[test]
fn test_supporting_methods_are_claimed() {
    let loader = loader(order_catalog());
    let spec = loader.specification_for(&"demo.Order".into()).unwrap();
    let actions: Vec<&str> = spec.actions.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(actions, vec!["placeOrder"]);
    assert!(spec.unclaimed_methods.is_empty());
    assert!(loader.current_failures().is_empty());
}

#[test]
fn test_tuple_without_matching_constructor_is_orphaned() {
    let catalog = ClassCatalog::new();
    catalog.register(
        ClassBuilder::value("demo.WrongArgs")
            .record_constructor(&[("quantity", TypeRef::int())])
            .build(),
    );
    catalog.register(
        ClassBuilder::new("demo.Order")
            .method(
                MethodBuilder::new("placeOrder")
                    .param("customer", TypeRef::Text)
                    .param("quantity", TypeRef::int()),
            )
            .method(
                MethodBuilder::new("validatePlaceOrder")
                    .param("args", TypeRef::class("demo.WrongArgs"))
                    .returns(TypeRef::Text),
            )
            .build(),
    );
    let loader = loader(Arc::new(catalog));
    let spec = loader.specification_for(&"demo.Order".into()).unwrap();
    assert!(spec.action("placeOrder").unwrap().facet::<ValidateFacet>().is_none());

    let failures = loader.current_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].kind, FailureKind::Orphan);
    assert_eq!(failures[0].code, "M1002");
}

#[test]
fn test_method_matched_by_several_conventions_binds_once() {
    // Customer has a copy constructor, so assign's parameters also form a tuple
    let catalog = ClassCatalog::new();
    catalog.register(
        ClassBuilder::new("demo.Customer")
            .property("name", TypeRef::Text)
            .record_constructor(&[("source", customer())])
            .build(),
    );
    catalog.register(
        ClassBuilder::new("demo.Order")
            .method(MethodBuilder::new("assign").param("customer", customer()))
            .method(
                MethodBuilder::new("validate0Assign")
                    .param("customer", customer())
                    .returns(TypeRef::Text),
            )
            .method(
                MethodBuilder::new("hide0Assign")
                    .param("customer", customer())
                    .returns(TypeRef::boolean()),
            )
            .build(),
    );
    let loader = loader(Arc::new(catalog));
    let spec = loader.specification_for(&"demo.Order".into()).unwrap();
    let customer_param = &spec.action("assign").unwrap().params[0];

    // Tuple and single-argument both match validate0Assign
    let validate = customer_param.holder.facet::<ValidateFacet>().unwrap();
    assert_eq!(validate.aspect.method.name, "validate0Assign");
    assert!(validate.aspect.also_found.is_empty());
    assert!(matches!(validate.aspect.convention, CallingConvention::Tuple { .. }));

    // Tuple and sweep both match hide0Assign
    let hide = customer_param.holder.facet::<HideForContextFacet>().unwrap();
    assert!(hide.aspect.also_found.is_empty());
    assert!(matches!(hide.aspect.convention, CallingConvention::Tuple { .. }));

    assert!(spec.unclaimed_methods.is_empty());
    assert!(loader.current_failures().is_empty());
}

fn ship_catalog() -> Arc<ClassCatalog> {
    let catalog = ClassCatalog::new();
    catalog.register(
        ClassBuilder::new("demo.Order")
            .method(MethodBuilder::new("ship").marker(Marker::Action))
            .method(
                MethodBuilder::new("hideShip")
                    .returns(TypeRef::boolean())
                    .visibility(Visibility::Private)
                    .marker(Marker::MemberSupport),
            )
            .build(),
    );
    Arc::new(catalog)
}

#[test]
fn test_private_supporting_method_needs_encapsulation() {
    let default = loader(ship_catalog());
    let spec = default.specification_for(&"demo.Order".into()).unwrap();
    assert!(spec.action("ship").unwrap().facet::<HideForContextFacet>().is_none());
    assert_eq!(spec.unclaimed_methods.len(), 1);
    let failures = default.current_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].code, "M1001");
    assert!(failures[0].message.contains("private"));

    let config = MetaModelConfig::from_toml_str("[introspection]\npolicy = \"encapsulation-enabled\"").unwrap();
    let encapsulated = SpecificationLoader::new(ship_catalog(), config);
    let spec = encapsulated.specification_for(&"demo.Order".into()).unwrap();
    let hide = spec.action("ship").unwrap().facet::<HideForContextFacet>().unwrap();
    assert_eq!(hide.aspect.method.name, "hideShip");
    assert!(spec.unclaimed_methods.is_empty());
    assert!(encapsulated.current_failures().is_empty());
}

#[test]
fn test_overloaded_actions_are_distinct_features() {
    let catalog = ClassCatalog::new();
    catalog.register(
        ClassBuilder::new("demo.Order")
            .method(MethodBuilder::new("placeOrder").param("quantity", TypeRef::int()))
            .method(MethodBuilder::new("placeOrder").param("sku", TypeRef::Text))
            .build(),
    );
    let loader = loader(Arc::new(catalog));
    let spec = loader.specification_for(&"demo.Order".into()).unwrap();
    assert_eq!(spec.actions_named("placeOrder").count(), 2);

    let by_quantity = spec.action_overload("placeOrder", &[TypeRef::int()]).unwrap();
    let by_sku = spec.action_overload("placeOrder", &[TypeRef::Text]).unwrap();
    assert_eq!(by_quantity.identifier().to_string(), "demo.Order#placeOrder(int)");
    assert_eq!(by_sku.identifier().to_string(), "demo.Order#placeOrder(String)");
    assert_eq!(by_sku.params[0].identifier().to_string(), "demo.Order#placeOrder(String)[0]");
    assert_ne!(by_quantity.params[0].identifier(), by_sku.params[0].identifier());

    let found = spec.action_by_identifier(by_sku.identifier()).unwrap();
    assert_eq!(found.params[0].name, "sku");
    assert!(spec.action_overload("placeOrder", &[]).is_none());
    assert!(loader.current_failures().is_empty());
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_orphan_supporting_method_reported() {
    let catalog = ClassCatalog::new();
    catalog.register(
        ClassBuilder::new("demo.Order")
            .property("status", TypeRef::Text)
            .method(MethodBuilder::new("hideFoo").returns(TypeRef::boolean()))
            .build(),
    );
    let loader = loader(Arc::new(catalog));
    let spec = loader.specification_for(&"demo.Order".into()).unwrap();
    assert!(spec.action("hideFoo").is_none());

    let failures = loader.current_failures();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].message.contains("hideFoo"));
    assert!(failures[0].origin.contains("hideFoo"));
}

#[test]
fn test_marked_private_action_violates_constraint() {
    let catalog = ClassCatalog::new();
    catalog.register(
        ClassBuilder::new("demo.Order")
            .method(
                MethodBuilder::new("archive")
                    .visibility(Visibility::Private)
                    .marker(Marker::Action),
            )
            .build(),
    );
    let loader = loader(Arc::new(catalog));
    loader.specification_for(&"demo.Order".into()).unwrap();

    let failures = loader.current_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].kind, FailureKind::Configuration);
    assert!(failures[0].message.contains("private"));
}

#[test]
fn test_marked_property_with_parameters_violates_constraint() {
    let catalog = ClassCatalog::new();
    catalog.register(
        ClassBuilder::new("demo.Order")
            .method(
                MethodBuilder::new("getTotal")
                    .param("currency", TypeRef::Text)
                    .returns(TypeRef::int())
                    .marker(Marker::Property { editable: None }),
            )
            .build(),
    );
    let loader = loader(Arc::new(catalog));
    let spec = loader.specification_for(&"demo.Order".into()).unwrap();
    assert!(spec.action("getTotal").is_none());

    let failures = loader.current_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].code, "M1001");
    assert_eq!(failures[0].kind, FailureKind::Configuration);
    assert!(failures[0].message.contains("getTotal"));
}

#[test]
fn test_ambiguous_supporting_methods_reported() {
    let catalog = ClassCatalog::new();
    catalog.register(ClassBuilder::new("demo.Order").build());
    catalog.register(
        ClassBuilder::mixin("demo.Order_cancel", "demo.Order", "act")
            .method(MethodBuilder::new("act"))
            .method(MethodBuilder::new("hideAct").returns(TypeRef::boolean()))
            .method(MethodBuilder::new("hide").returns(TypeRef::boolean()))
            .build(),
    );
    let loader = loader(Arc::new(catalog));
    let spec = loader.specification_for(&"demo.Order_cancel".into()).unwrap();
    assert!(spec.unclaimed_methods.is_empty());

    let failures = loader.current_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].kind, FailureKind::Ambiguity);
    assert_eq!(failures[0].code, "M1003");
    assert!(failures[0].message.contains("hideAct, hide"));
}

// ============================================================================
// Facet Ranking
// ============================================================================

#[test]
fn test_domain_event_precedence() {
    let catalog = ClassCatalog::new();
    catalog.register(
        ClassBuilder::new("demo.Order")
            .marker(Marker::DomainEvent("OrderChanged".into()))
            .method(MethodBuilder::new("ship").marker(Marker::DomainEvent("OrderShipped".into())))
            .method(MethodBuilder::new("cancel"))
            .build(),
    );
    let loader = loader(Arc::new(catalog));
    let spec = loader.specification_for(&"demo.Order".into()).unwrap();

    let event = |name: &str| {
        spec.action(name)
            .and_then(|a| a.facet::<DomainEventFacet>())
            .map(|f| (f.event.clone(), f.precedence))
    };
    assert_eq!(event("ship"), Some(("OrderShipped".to_string(), Precedence::Event)));
    assert_eq!(event("cancel"), Some(("OrderChanged".to_string(), Precedence::Low)));

    let ship = spec.action("ship").unwrap();
    let ranking = ship.holder.ranking(DomainEventFacet::TYPE).unwrap();
    assert_eq!(ranking.contributions().len(), 2);
}

#[test]
fn test_domain_event_on_property_field() {
    let catalog = ClassCatalog::new();
    catalog.register(
        ClassBuilder::new("demo.Order")
            .marker(Marker::DomainEvent("OrderChanged".into()))
            .property_with_markers("status", TypeRef::Text, vec![Marker::DomainEvent("StatusChanged".into())])
            .property("notes", TypeRef::Text)
            .build(),
    );
    let loader = loader(Arc::new(catalog));
    let spec = loader.specification_for(&"demo.Order".into()).unwrap();

    let status = spec.property("status").unwrap().facet::<DomainEventFacet>().unwrap();
    assert_eq!(status.event, "StatusChanged");
    assert_eq!(status.precedence, Precedence::Event);
    let notes = spec.property("notes").unwrap().facet::<DomainEventFacet>().unwrap();
    assert_eq!(notes.event, "OrderChanged");
    assert_eq!(notes.precedence, Precedence::Low);
}

#[test]
fn test_described_and_named_members() {
    let catalog = ClassCatalog::new();
    catalog.register(
        ClassBuilder::new("demo.Order")
            .property_with_markers(
                "status",
                TypeRef::Text,
                vec![
                    Marker::Named("Order Status".into()),
                    Marker::Description("Where the order is".into()),
                ],
            )
            .build(),
    );
    let loader = loader(Arc::new(catalog));
    let spec = loader.specification_for(&"demo.Order".into()).unwrap();
    let status = spec.property("status").unwrap();
    assert_eq!(status.friendly_name(), Some("Order Status"));
    assert_eq!(status.description(), Some("Where the order is"));
    assert_eq!(status.facet::<NamedFacet>().map(|f| f.precedence), Some(Precedence::High));
}

// ============================================================================
// Policy Resolution
// ============================================================================

#[test]
fn test_policy_resolution_chain() {
    let catalog = ClassCatalog::new();
    catalog.register(ClassBuilder::new("demo.Pinned").build());
    catalog.register(
        ClassBuilder::new("demo.Tagged")
            .marker(Marker::Custom("Encapsulated".into()))
            .build(),
    );
    catalog.register(ClassBuilder::new("demo.internal.Ledger").build());
    catalog.register(ClassBuilder::new("other.Plain").build());

    let config = MetaModelConfig::from_toml_str(
        r#"
[introspection]
policy = "annotation-required"

[introspection.classes]
"demo.Pinned" = "annotation-optional"

[introspection.meta-markers]
"Encapsulated" = "encapsulation-enabled"

[[introspection.namespaces]]
pattern = "demo.internal.**"
policy = "encapsulation-enabled"
"#,
    )
    .unwrap();
    let loader = SpecificationLoader::new(Arc::new(catalog), config);

    let resolved = |name: &str| {
        let spec = loader.specification_for(&name.into()).unwrap();
        let facet = spec.holder.facet::<IntrospectionPolicyFacet>().unwrap();
        (facet.policy, facet.source.clone())
    };
    assert_eq!(
        resolved("demo.Pinned"),
        (IntrospectionPolicy::AnnotationOptional, PolicySource::PerClass)
    );
    assert_eq!(
        resolved("demo.Tagged"),
        (
            IntrospectionPolicy::EncapsulationEnabled,
            PolicySource::MetaMarker("Encapsulated".into())
        )
    );
    assert_eq!(
        resolved("demo.internal.Ledger"),
        (
            IntrospectionPolicy::EncapsulationEnabled,
            PolicySource::Namespace("demo.internal.**".into())
        )
    );
    assert_eq!(
        resolved("other.Plain"),
        (IntrospectionPolicy::AnnotationRequired, PolicySource::GlobalDefault)
    );
}

// ============================================================================
// Custom Programming Model
// ============================================================================

struct AuditLog;

static AUDIT_META: FactoryMeta = FactoryMeta {
    name: "audit-log",
    description: "Claims auditLog() and describes the type as audited",
    feature_types: &[FeatureType::Type],
};

impl FacetFactory for AuditLog {
    fn meta(&self) -> &FactoryMeta {
        &AUDIT_META
    }

    fn process_class(&self, ctx: &mut ClassContext<'_>) -> FactoryResult {
        let query = MethodQuery::support(&ctx.class.name).name("auditLog");
        if !ctx.claim(&query).is_empty() {
            ctx.holder.add_facet(DescribedFacet {
                precedence: Precedence::Default,
                text: "audited".into(),
            });
        }
        Ok(())
    }
}

fn audited_catalog() -> Arc<ClassCatalog> {
    let catalog = ClassCatalog::new();
    catalog.register(
        ClassBuilder::new("demo.Order")
            .method(MethodBuilder::new("auditLog"))
            .method(MethodBuilder::new("ship"))
            .build(),
    );
    Arc::new(catalog)
}

#[test]
fn test_custom_factory_claims_before_discovery() {
    let plain = loader(audited_catalog());
    let spec = plain.specification_for(&"demo.Order".into()).unwrap();
    assert!(spec.action("auditLog").is_some());

    let model = ProgrammingModel::builder()
        .with_defaults()
        .insert_before("remove-programmatic", Box::new(AuditLog))
        .build();
    assert_eq!(model.factory_names()[0], "audit-log");

    let custom = SpecificationLoader::with_model(audited_catalog(), MetaModelConfig::default(), Arc::new(model));
    let spec = custom.specification_for(&"demo.Order".into()).unwrap();
    let actions: Vec<&str> = spec.actions.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(actions, vec!["ship"]);
    assert_eq!(spec.description(), Some("audited"));
}

struct RejectStatus;

static REJECT_META: FactoryMeta = FactoryMeta {
    name: "reject-status",
    description: "Rejects the status property after its supporting methods were claimed",
    feature_types: &[FeatureType::Property],
};

impl FacetFactory for RejectStatus {
    fn meta(&self) -> &FactoryMeta {
        &REJECT_META
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) -> FactoryResult {
        if ctx.member_name == "status" {
            return Err(FactoryError::Rejected("status is not supported".into()));
        }
        Ok(())
    }
}

#[test]
fn test_dropped_feature_releases_supporting_methods() {
    let catalog = ClassCatalog::new();
    catalog.register(
        ClassBuilder::new("demo.Order")
            .property("status", TypeRef::Text)
            .property("paid", TypeRef::boolean())
            .method(MethodBuilder::new("hideStatus").returns(TypeRef::boolean()))
            .method(MethodBuilder::new("hidePaid").returns(TypeRef::boolean()))
            .build(),
    );
    let model = ProgrammingModel::builder()
        .with_defaults()
        .add_factory(Box::new(RejectStatus))
        .build();
    let loader = SpecificationLoader::with_model(Arc::new(catalog), MetaModelConfig::default(), Arc::new(model));
    let spec = loader.specification_for(&"demo.Order".into()).unwrap();

    assert!(spec.property("status").is_none());
    assert!(spec.property("paid").is_some());
    let unclaimed: Vec<&str> = spec.unclaimed_methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(unclaimed, vec!["setStatus", "hideStatus"]);

    let failures = loader.current_failures();
    assert_eq!(failures.len(), 3);
    assert_eq!(failures.iter().filter(|f| f.kind == FailureKind::Build).count(), 1);
    let orphans: Vec<&str> = failures
        .iter()
        .filter(|f| f.kind == FailureKind::Orphan)
        .map(|f| f.message.as_str())
        .collect();
    assert!(orphans.iter().any(|m| m.starts_with("hideStatus")));
    assert!(orphans.iter().any(|m| m.starts_with("setStatus")));
}
