// bench/benchmarks.rs - Performance benchmarks
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use mailguess::domain::DomainResolver;
use mailguess::feature_matrix::build_matrix;
use mailguess::localpart;
use mailguess::templates::store::{TemplateClass, TemplateStore};
use mailguess::templates::token::{parse_token, TemplateToken};
use mailguess::text::{decompose, extract_flags};

// ============================================================================
// String normalisation / name decomposition
// ============================================================================

fn bench_decompose(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompose");

    let names = vec![
        ("simple", "John Smith"),
        ("with_honorific_and_suffix", "Mr. Dr. John Smith Jr"),
        ("germanic", "Jurgen Muller"),
        ("particle_surname", "Jose de la Cruz"),
        ("hyphenated_first", "Anne-Marie Dubois"),
    ];

    for (name, raw) in names {
        group.bench_with_input(BenchmarkId::from_parameter(name), raw, |b, raw| {
            b.iter(|| decompose(black_box(raw)));
        });
    }

    group.finish();
}

fn bench_extract_flags(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_flags");

    group.bench_function("plain_ascii", |b| {
        b.iter(|| extract_flags(black_box("John Smith")));
    });

    group.bench_function("german_char", |b| {
        b.iter(|| extract_flags(black_box("Jurgen Muller")));
    });

    group.finish();
}

// ============================================================================
// Template-token parsing
// ============================================================================

fn bench_parse_token(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_token");

    let tokens = vec![
        ("separator", "."),
        ("initial", "f_0"),
        ("full_with_flags", "last_surp_original_2"),
    ];

    for (name, token) in tokens {
        group.bench_with_input(BenchmarkId::from_parameter(name), token, |b, token| {
            b.iter(|| parse_token(black_box(token)).unwrap());
        });
    }

    group.finish();
}

// ============================================================================
// Local-part rendering
// ============================================================================

fn bench_render_local_part(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_local_part");

    let name = decompose("John Michael Smith");
    let token_seq: Vec<TemplateToken> = vec!["first_0", ".", "last_0"]
        .into_iter()
        .map(|t| parse_token(t).unwrap())
        .collect();

    group.bench_function("first_dot_last", |b| {
        b.iter(|| localpart::render(black_box(&name), black_box(&token_seq)));
    });

    group.finish();
}

// ============================================================================
// Feature-matrix construction
// ============================================================================

/// Writes `n` standard-class candidate templates and an empty complex/firm-
/// usage blob to temp files in the real MessagePack schema, then loads a
/// [`TemplateStore`] through its public `load` entry point — benches live in
/// a separate compilation unit from the library's `#[cfg(test)]` helpers, so
/// they exercise the same on-disk format a real deployment would.
fn store_with_n_standard_templates(dir: &std::path::Path, n: i32) -> TemplateStore {
    let templates: Vec<serde_json::Value> = (0..n)
        .map(|id| {
            serde_json::json!({
                "template_id": id,
                "template": ["first_0", ".", "last_0"],
                "support_count": id,
                "coverage_pct": 0.3,
                "in_mined_rules": id % 2 == 0,
                "max_rule_confidence": 0.9,
                "avg_rule_confidence": 0.6,
                "uses_middle_name": id % 3 == 0,
                "uses_multiple_firsts": false,
                "uses_multiple_middles": false,
                "uses_multiple_lasts": false,
            })
        })
        .collect();

    let standard_path = dir.join(format!("standard_{n}.msgpack"));
    write_msgpack(&standard_path, &templates);

    let complex_path = dir.join(format!("complex_{n}.msgpack"));
    write_msgpack(&complex_path, &Vec::<serde_json::Value>::new());

    let usage_path = dir.join(format!("usage_{n}.msgpack"));
    write_msgpack(&usage_path, &serde_json::json!({}));

    TemplateStore::load(&standard_path, &complex_path, &usage_path).unwrap()
}

fn write_msgpack<T: serde::Serialize>(path: &std::path::Path, value: &T) {
    use rmp_serde::Serializer;
    use serde::Serialize;
    let mut buf = Vec::new();
    value.serialize(&mut Serializer::new(&mut buf)).unwrap();
    std::fs::write(path, buf).unwrap();
}

fn bench_build_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_matrix");
    let dir = tempfile::tempdir().unwrap();

    for &n in &[10i32, 100, 500] {
        let store = store_with_n_standard_templates(dir.path(), n);
        let name = decompose("John Michael Smith");
        let flags = extract_flags("John Michael Smith");

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| build_matrix(black_box(&name), black_box(&flags), "acme corp", &store, TemplateClass::Standard));
        });
    }

    group.finish();
}

// ============================================================================
// Domain resolution (exact vs fuzzy-fallback path)
// ============================================================================

fn bench_domain_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("domain_resolve");

    let dir = tempfile::tempdir().unwrap();
    let canonical_path = dir.path().join("canonical.msgpack");
    let firms: std::collections::HashMap<String, serde_json::Value> = (0..2000)
        .map(|i| (format!("firm number {i}"), serde_json::json!({ "domain": format!("firm{i}.com") })))
        .collect();
    let mut buf = Vec::new();
    {
        use rmp_serde::Serializer;
        use serde::Serialize;
        firms.serialize(&mut Serializer::new(&mut buf)).unwrap();
    }
    std::fs::write(&canonical_path, buf).unwrap();

    let resolver = DomainResolver::load(Some(&canonical_path), None).unwrap();

    group.bench_function("exact_hit", |b| {
        b.iter(|| resolver.resolve(black_box("Firm Number 42")));
    });

    group.bench_function("fuzzy_miss", |b| {
        b.iter(|| resolver.resolve(black_box("Totally Unlisted Company")));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_decompose,
    bench_extract_flags,
    bench_parse_token,
    bench_render_local_part,
    bench_build_matrix,
    bench_domain_resolve,
);

criterion_main!(benches);
