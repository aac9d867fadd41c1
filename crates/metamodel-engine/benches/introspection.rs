use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use metamodel_engine::{
    ClassBuilder, ClassCatalog, MetaModelConfig, MethodBuilder, SpecificationLoader, TypeName,
    TypeRef,
};

fn catalog(classes: usize) -> Arc<ClassCatalog> {
    let catalog = ClassCatalog::new();
    catalog.register(ClassBuilder::new("demo.Base").property("id", TypeRef::int()).build());
    for i in 0..classes {
        catalog.register(
            ClassBuilder::new(format!("demo.Entity{}", i))
                .extends("demo.Base")
                .property("name", TypeRef::Text)
                .property("active", TypeRef::boolean())
                .method(MethodBuilder::new("disableName").returns(TypeRef::Text))
                .method(
                    MethodBuilder::new("rename")
                        .param("name", TypeRef::Text)
                        .param("reason", TypeRef::Text),
                )
                .method(
                    MethodBuilder::new("default0Rename")
                        .returns(TypeRef::Text),
                )
                .method(
                    MethodBuilder::new("choices1Rename")
                        .param("name", TypeRef::Text)
                        .returns(TypeRef::collection_of(TypeRef::Text)),
                )
                .build(),
        );
    }
    Arc::new(catalog)
}

fn bench_single_class(c: &mut Criterion) {
    let catalog = catalog(1);
    let name: TypeName = "demo.Entity0".into();

    c.bench_function("introspect_single_class", |b| {
        b.iter(|| {
            let loader = SpecificationLoader::new(catalog.clone(), MetaModelConfig::default());
            loader.specification_for(black_box(&name)).unwrap()
        });
    });
}

fn bench_introspect_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("introspect_all");

    for classes in [16usize, 128, 512] {
        let catalog = catalog(classes);
        group.throughput(Throughput::Elements(classes as u64));

        group.bench_with_input(BenchmarkId::new("sequential", classes), &catalog, |b, catalog| {
            let mut config = MetaModelConfig::default();
            config.parallelism.enabled = false;
            b.iter(|| {
                let loader = SpecificationLoader::new(catalog.clone(), config.clone());
                loader.introspect_all().unwrap()
            });
        });

        group.bench_with_input(BenchmarkId::new("parallel", classes), &catalog, |b, catalog| {
            b.iter(|| {
                let loader = SpecificationLoader::new(catalog.clone(), MetaModelConfig::default());
                loader.introspect_all().unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_class, bench_introspect_all);
criterion_main!(benches);
