//! Validation benchmarks
//!
//! Compares compiling a schema against hitting the validator cache, and
//! measures evaluation and rendering throughput on valid and invalid input.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use schemata_schemas::{registry, verifiable_credential, CREDENTIALS_CONTEXT};
use schemata_validate::{CompiledValidator, SchemaKey, Validation, ValidatorCache};
use serde_json::{json, Value};

fn credential(index: usize) -> Value {
    json!({
        "@context": [CREDENTIALS_CONTEXT, "https://www.schema.org"],
        "id": format!("urn:uuid:bench-{}", index),
        "issuer": "did:example:issuer",
        "issuanceDate": "1997-07-16T19:20:30Z",
        "type": ["VerifiableCredential"],
        "credentialSubject": {"id": format!("did:example:{}", index)}
    })
}

/// Compile from scratch vs. fetch from the cache
fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    let schema = verifiable_credential(None);

    group.bench_function("compile", |b| {
        b.iter(|| CompiledValidator::compile(black_box(&schema)).unwrap())
    });

    group.bench_function("schema_key", |b| b.iter(|| SchemaKey::of(black_box(&schema))));

    let cache = ValidatorCache::new();
    cache.get_or_compile(&schema).unwrap();
    group.bench_function("cache_hit", |b| {
        b.iter(|| cache.get_or_compile(black_box(&schema)).unwrap())
    });

    let validation = Validation::new(registry());
    validation.warm().unwrap();
    group.bench_function("by_name_hit", |b| {
        b.iter(|| validation.resolve(black_box("verifiableCredential")).unwrap())
    });

    group.finish();
}

/// Evaluation of valid documents
fn bench_valid(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_valid");
    let validator = CompiledValidator::compile(&verifiable_credential(None)).unwrap();

    for count in [1usize, 10, 100] {
        let documents: Vec<Value> = (0..count).map(credential).collect();
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &documents, |b, docs| {
            b.iter(|| docs.iter().filter(|d| validator.is_valid(black_box(d))).count())
        });
    }

    group.finish();
}

/// Evaluation plus rendering of invalid documents
fn bench_invalid(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_invalid");
    let validator = CompiledValidator::compile(&verifiable_credential(None)).unwrap();

    let mut one_violation = credential(0);
    one_violation["@context"] = json!(["https://www.schema.org"]);
    group.bench_function("one_violation", |b| {
        b.iter(|| validator.validate(black_box(&one_violation)))
    });

    let many_violations = json!({
        "@context": "nope",
        "id": "0",
        "issuer": "",
        "issuanceDate": "yesterday",
        "type": [],
        "credentialSubject": {}
    });
    group.bench_function("many_violations", |b| {
        b.iter(|| validator.validate(black_box(&many_violations)))
    });

    group.finish();
}

criterion_group!(benches, bench_compile, bench_valid, bench_invalid);
criterion_main!(benches);
