use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cwrc_entity_lookup::ProjectCatalog;
use serde_json::{json, Map, Value};

fn project_document(projects: usize) -> Value {
    let mut document = Map::new();
    for i in 0..projects {
        document.insert(
            i.to_string(),
            json!({
                "field_logo": { "und": [ { "filename": format!("logo-{i}.png") } ] },
                "field_top_level_collection": { "und": [ { "pid": format!("ns{}:root", i % 50) } ] }
            }),
        );
    }
    Value::Object(document)
}

fn benchmark_catalog_parsing(c: &mut Criterion) {
    let document = project_document(500);
    c.bench_function("catalog_from_json_500", |b| {
        b.iter(|| ProjectCatalog::from_json(black_box(&document), Some("ns0:root")))
    });
}

criterion_group!(benches, benchmark_catalog_parsing);
criterion_main!(benches);
