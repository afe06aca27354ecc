// tests/engine_tests.rs - Integration tests across module boundaries
//
// These exercise the engine's supporting components (config validation,
// template-metadata loading, domain resolution, decomposition + class
// selection) wired together through real on-disk MessagePack fixtures,
// the way `PredictionEngine::new` itself loads them. The single piece left
// out is a real trained LightGBM/CatBoost model file: producing one is the
// offline training pipeline's job, explicitly out of scope for this crate
// (spec §1), so the scored, end-to-end `predict(...)` path is instead
// covered in `src/engine.rs`'s own test module with a fixed-score test
// double standing in for the missing model artifact.
use std::collections::HashMap;
use std::path::Path;

use mailguess::config::EngineConfig;
use mailguess::domain::DomainResolver;
use mailguess::errors::Error;
use mailguess::feature_matrix::{build_matrix, FEATURE_COUNT};
use mailguess::templates::{TemplateClass, TemplateStore};
use mailguess::text::{decompose, extract_flags};

fn write_msgpack<T: serde::Serialize>(path: &Path, value: &T) {
    use rmp_serde::Serializer;
    use serde::Serialize;
    let mut buf = Vec::new();
    value.serialize(&mut Serializer::new(&mut buf)).unwrap();
    std::fs::write(path, buf).unwrap();
}

fn standard_template_fixture(id: i32, token: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "template_id": id,
        "template": token,
        "support_count": 5,
        "coverage_pct": 0.4,
        "in_mined_rules": true,
        "max_rule_confidence": 0.95,
        "avg_rule_confidence": 0.8,
        "uses_middle_name": false,
        "uses_multiple_firsts": false,
        "uses_multiple_middles": false,
        "uses_multiple_lasts": false,
    })
}

// ============================================================================
// Template-metadata store round-trips through real files
// ============================================================================

#[test]
fn template_store_loads_both_classes_and_firm_usage_from_real_files() {
    let dir = tempfile::tempdir().unwrap();

    let standard = vec![
        standard_template_fixture(2, &["first_0", ".", "last_0"]),
        standard_template_fixture(1, &["f_0", "last_0"]),
    ];
    let complex = vec![standard_template_fixture(10, &["first_nfkd_0", "_", "last_0"])];

    let standard_path = dir.path().join("standard.msgpack");
    let complex_path = dir.path().join("complex.msgpack");
    let usage_path = dir.path().join("usage.msgpack");

    write_msgpack(&standard_path, &standard);
    write_msgpack(&complex_path, &complex);

    let mut firm_usage = HashMap::new();
    firm_usage.insert(
        "cvc".to_string(),
        serde_json::json!({
            "template_ids": [1, 1, 2],
            "num_templates": 2,
            "num_investors": 3,
            "diversity_ratio": 0.666,
            "is_single_template": false,
            "is_shared_infra": false,
            "firm_is_multi_domain": false,
        }),
    );
    write_msgpack(&usage_path, &firm_usage);

    let store = TemplateStore::load(&standard_path, &complex_path, &usage_path).unwrap();

    let (n_standard, n_complex) = store.stats();
    assert_eq!(n_standard, 2);
    assert_eq!(n_complex, 1);

    // Template ordering: ascending template_id within each class.
    let ids: Vec<i32> = store.templates(TemplateClass::Standard).iter().map(|t| t.template_id).collect();
    assert_eq!(ids, vec![1, 2]);

    let firm_stats = store.firm_stats("cvc").unwrap();
    assert_eq!(firm_stats.num_investors, 3);

    let top = store.firm_template_usage("cvc", 1).unwrap();
    assert!(top.is_top_template);
    assert_eq!(top.support_count, 2);
}

#[test]
fn feature_matrix_row_count_matches_template_count_for_loaded_store() {
    let dir = tempfile::tempdir().unwrap();
    let standard = vec![
        standard_template_fixture(1, &["first_0", ".", "last_0"]),
        standard_template_fixture(2, &["f_0", "last_0"]),
        standard_template_fixture(3, &["first_0", "_", "last_0"]),
    ];
    let standard_path = dir.path().join("standard.msgpack");
    let complex_path = dir.path().join("complex.msgpack");
    let usage_path = dir.path().join("usage.msgpack");
    write_msgpack(&standard_path, &standard);
    write_msgpack(&complex_path, &Vec::<serde_json::Value>::new());
    write_msgpack(&usage_path, &serde_json::json!({}));

    let store = TemplateStore::load(&standard_path, &complex_path, &usage_path).unwrap();
    let name = decompose("John Smith");
    let flags = extract_flags("John Smith");
    let matrix = build_matrix(&name, &flags, "unknown firm", &store, TemplateClass::Standard);

    assert_eq!(matrix.len(), 3 * FEATURE_COUNT);
}

// ============================================================================
// Domain resolver across its full lookup chain, backed by real files
// ============================================================================

#[test]
fn domain_resolver_chain_exact_then_cache_then_fuzzy() {
    let dir = tempfile::tempdir().unwrap();

    let mut canonical = HashMap::new();
    canonical.insert("blackstone".to_string(), serde_json::json!({ "domain": "blackstone.com" }));
    canonical.insert("blackrock".to_string(), serde_json::json!({ "domain": "blackrock.com" }));
    let canonical_path = dir.path().join("canonical.msgpack");
    write_msgpack(&canonical_path, &canonical);

    let mut seeded_cache = HashMap::new();
    seeded_cache.insert(
        "kkr".to_string(),
        serde_json::json!({ "domain": "kkr.com", "canonical_firm": "kkr", "match_score": 92.5 }),
    );
    let cache_path = dir.path().join("cache.msgpack");
    write_msgpack(&cache_path, &seeded_cache);

    let resolver = DomainResolver::load(Some(&canonical_path), Some(&cache_path)).unwrap();

    // Exact directory hit.
    let exact = resolver.resolve("Blackstone").unwrap();
    assert_eq!(exact.domain, "blackstone.com");
    assert_eq!(exact.score, 100.0);

    // Pre-seeded cache hit (not a directory key).
    let cached = resolver.resolve("KKR").unwrap();
    assert_eq!(cached.domain, "kkr.com");
    assert!((cached.score - 92.5).abs() < 1e-9);

    // Fuzzy fallback against the directory, writing the result back through
    // the cache so a repeat call is idempotent.
    let fuzzy_first = resolver.resolve("Blackstoen").unwrap();
    assert_eq!(fuzzy_first.domain, "blackstone.com");
    let fuzzy_second = resolver.resolve("Blackstoen").unwrap();
    assert_eq!(fuzzy_first, fuzzy_second);
}

// ============================================================================
// Engine configuration validation
// ============================================================================

#[test]
fn engine_config_rejects_missing_backend_even_with_valid_metadata_paths() {
    let dir = tempfile::tempdir().unwrap();
    let touch = |name: &str| {
        let path = dir.path().join(name);
        std::fs::write(&path, b"x").unwrap();
        path
    };

    let config = EngineConfig::new(touch("standard.msgpack"), touch("complex.msgpack"), touch("usage.msgpack"));
    let err = config.validate().unwrap_err();
    assert!(matches!(err, Error::ConfigurationError(_)));
}

// ============================================================================
// Name decomposition + class-selection scenarios from the spec's concrete
// end-to-end examples, independent of the scoring step.
// ============================================================================

fn is_complex(raw: &str) -> bool {
    let decomposed = decompose(raw);
    let flags = extract_flags(raw);
    decomposed.has_middle()
        || decomposed.has_multiple_firsts()
        || decomposed.has_multiple_lasts()
        || flags.has_german_char
        || flags.has_nfkd_normalized
}

#[test]
fn plain_two_token_name_selects_standard_class() {
    assert!(!is_complex("John Smith"));
}

#[test]
fn germanic_accented_name_selects_complex_class() {
    assert!(is_complex("Jürgen Müller"));
    let decomposed = decompose("Jürgen Müller");
    // Rendered components are pure ASCII regardless of the accented input.
    assert!(decomposed.first_names.iter().all(|t| t.is_ascii()));
    assert!(decomposed.last_names.iter().all(|t| t.is_ascii()));
}

#[test]
fn nickname_flag_is_set_for_first_token() {
    let flags = extract_flags("William Gates");
    assert!(flags.has_nickname);
}

#[test]
fn honorific_and_suffix_stripping_yields_single_first_and_last() {
    let decomposed = decompose("Mr. Dr. John Smith Jr");
    assert_eq!(decomposed.first_names, vec!["john"]);
    assert!(decomposed.middle_names.is_empty());
    assert_eq!(decomposed.last_names, vec!["smith"]);
}

#[test]
fn surname_particle_absorbs_the_rest_of_the_name() {
    let decomposed = decompose("Jose de la Cruz");
    assert_eq!(decomposed.first_names, vec!["jose"]);
    assert!(decomposed.middle_names.is_empty());
    assert_eq!(decomposed.last_names, vec!["de", "la", "cruz"]);
}

#[test]
fn unknown_firm_with_no_directory_and_no_explicit_domain_has_no_resolution() {
    // Mirrors the "MissingDomain" scenario (§8 #3) at the resolver level: an
    // engine with no canonical-firms/cache blob and an unresolvable firm
    // name would hit this `None` and surface `Error::MissingDomain`.
    let dir = tempfile::tempdir().unwrap();
    let canonical_path = dir.path().join("canonical.msgpack");
    write_msgpack(&canonical_path, &HashMap::<String, serde_json::Value>::new());

    let resolver = DomainResolver::load(Some(&canonical_path), None).unwrap();
    assert!(resolver.resolve("ClashFirm").is_none());
}
