//! Builds the fixed-width feature matrix the predictor scores.
//!
//! The 27-column schema is shared implicitly with the offline trainer that
//! produced the model files; [`FEATURE_NAMES`] is the single source of
//! truth for column order — reordering it invalidates every model.
use crate::templates::{CandidateTemplate, TemplateClass, TemplateStore};
use crate::text::{DecomposedName, Flags};

/// Number of columns in every feature-matrix row.
pub const FEATURE_COUNT: usize = 27;

/// Column order, 0-indexed, matching the training-time layout exactly.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "in_firm_templates",
    "firm_is_shared_infra",
    "firm_is_multi_domain",
    "has_german_char",
    "has_nfkd_normalized",
    "has_nickname",
    "name_has_multiple_firsts",
    "name_has_middle",
    "name_has_multiple_middles",
    "name_has_multiple_lasts",
    "template_support_count",
    "template_coverage_pct",
    "template_in_mined_rules",
    "template_max_rule_confidence",
    "template_avg_rule_confidence",
    "template_uses_middle_name",
    "template_uses_multiple_firsts",
    "template_uses_multiple_middles",
    "template_uses_multiple_lasts",
    "firm_support_count",
    "firm_coverage_pct",
    "firm_is_top_template",
    "template_name_characteristic_clash",
    "firm_num_templates",
    "firm_num_investors",
    "firm_diversity_ratio",
    "firm_is_single_template",
];

fn b(v: bool) -> f32 {
    if v {
        1.0
    } else {
        0.0
    }
}

fn clash(template: &CandidateTemplate, name: &DecomposedName) -> bool {
    (template.uses_middle_name && name.has_middle())
        || (template.uses_multiple_firsts && name.has_multiple_firsts())
        || (template.uses_multiple_middles && name.has_multiple_middles())
        || (template.uses_multiple_lasts && name.has_multiple_lasts())
}

fn build_row(
    template: &CandidateTemplate,
    name: &DecomposedName,
    flags: &Flags,
    store: &TemplateStore,
    firm_key: &str,
) -> [f32; FEATURE_COUNT] {
    let firm_stats = store.firm_stats(firm_key);
    let firm_usage = store.firm_template_usage(firm_key, template.template_id);

    [
        b(firm_usage.is_some()),
        b(firm_stats.is_some_and(|s| s.is_shared_infra)),
        b(firm_stats.is_some_and(|s| s.firm_is_multi_domain)),
        b(flags.has_german_char),
        b(flags.has_nfkd_normalized),
        b(flags.has_nickname),
        b(name.has_multiple_firsts()),
        b(name.has_middle()),
        b(name.has_multiple_middles()),
        b(name.has_multiple_lasts()),
        template.support_count as f32,
        template.coverage_pct,
        b(template.in_mined_rules),
        template.max_rule_confidence,
        template.avg_rule_confidence,
        b(template.uses_middle_name),
        b(template.uses_multiple_firsts),
        b(template.uses_multiple_middles),
        b(template.uses_multiple_lasts),
        firm_usage.map(|u| u.support_count as f32).unwrap_or(0.0),
        firm_usage.map(|u| u.coverage_pct).unwrap_or(0.0),
        b(firm_usage.is_some_and(|u| u.is_top_template)),
        b(clash(template, name)),
        firm_stats.map(|s| s.num_templates as f32).unwrap_or(0.0),
        firm_stats.map(|s| s.num_investors as f32).unwrap_or(0.0),
        firm_stats.map(|s| s.diversity_ratio).unwrap_or(0.0),
        b(firm_stats.is_some_and(|s| s.is_single_template)),
    ]
}

/// Builds the flat, row-major `N × 27` feature matrix for every candidate
/// template in `class`, in the same ascending-`template_id` order the
/// store holds them in. That ordering is load-bearing: row `i` must always
/// correspond to `templates[i]`.
pub fn build_matrix(
    name: &DecomposedName,
    flags: &Flags,
    firm_key: &str,
    store: &TemplateStore,
    class: TemplateClass,
) -> Vec<f32> {
    let templates = store.templates(class);
    let mut matrix = Vec::with_capacity(templates.len() * FEATURE_COUNT);
    for template in templates {
        matrix.extend_from_slice(&build_row(template, name, flags, store, firm_key));
    }
    matrix
}
