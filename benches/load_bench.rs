use criterion::{criterion_group, criterion_main, Criterion};
use std::path::Path;

use storepix_config::{validate, DocumentFormat, Loader, ValidateOptions};

// Run with:
//    cargo bench

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name);
    std::fs::read_to_string(path).expect("fixture")
}

fn bench_load_json(c: &mut Criterion) {
    let text = fixture("localized.config.json");
    let loader = Loader::default();
    c.bench_function("load_json", |b| {
        b.iter(|| loader.load_str(&text, "bench.json", DocumentFormat::Json).unwrap())
    });
}

fn bench_load_module(c: &mut Criterion) {
    if !cfg!(feature = "js") {
        return;
    }
    let text = fixture("storepix.config.js");
    let loader = Loader::default();
    c.bench_function("load_module", |b| {
        b.iter(|| loader.load_str(&text, "bench.js", DocumentFormat::Script).unwrap())
    });
}

fn bench_validate(c: &mut Criterion) {
    let doc = storepix_config::Document::parse(
        &fixture("localized.config.json"),
        "bench.json",
        DocumentFormat::Json,
        Default::default(),
    )
    .unwrap();
    let opts = ValidateOptions::strict();
    c.bench_function("validate", |b| b.iter(|| validate(&doc, &opts)));
}

criterion_group!(benches, bench_load_json, bench_load_module, bench_validate);
criterion_main!(benches);
