//! Template-metadata store: loads the candidate-template and firm-usage
//! MessagePack blobs once at construction and exposes immutable, read-only
//! views over them for the lifetime of the engine.
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::errors::{Error, Result};
use crate::templates::token::{parse_token, TemplateToken};

/// Which of the two disjoint candidate-template populations applies to a
/// query, selected by [`crate::engine::PredictionEngine`] from the
/// decomposed name's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateClass {
    Standard,
    Complex,
}

/// A parameterised recipe that, applied to a decomposed name, produces an
/// email local-part.
#[derive(Debug, Clone)]
pub struct CandidateTemplate {
    pub template_id: i32,
    pub token_seq: Vec<TemplateToken>,
    pub support_count: i32,
    pub coverage_pct: f32,
    pub in_mined_rules: bool,
    pub max_rule_confidence: f32,
    pub avg_rule_confidence: f32,
    pub uses_middle_name: bool,
    pub uses_multiple_firsts: bool,
    pub uses_multiple_middles: bool,
    pub uses_multiple_lasts: bool,
}

/// Firm-level aggregate statistics, loaded once from the firm→template map.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirmStats {
    pub num_templates: i32,
    pub num_investors: i32,
    pub diversity_ratio: f32,
    pub is_single_template: bool,
    pub is_shared_infra: bool,
    pub firm_is_multi_domain: bool,
}

/// How heavily one template is used at one particular firm, derived from
/// that firm's `template_ids` usage list.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirmTemplateUsage {
    pub support_count: i32,
    pub coverage_pct: f32,
    pub is_top_template: bool,
}

#[derive(Debug, Deserialize)]
struct RawCandidateTemplate {
    template_id: i32,
    template: Vec<String>,
    support_count: i32,
    coverage_pct: f32,
    in_mined_rules: bool,
    max_rule_confidence: f32,
    avg_rule_confidence: f32,
    uses_middle_name: bool,
    uses_multiple_firsts: bool,
    uses_multiple_middles: bool,
    uses_multiple_lasts: bool,
}

#[derive(Debug, Deserialize)]
struct RawFirmUsage {
    template_ids: Vec<i32>,
    num_templates: i32,
    num_investors: i32,
    diversity_ratio: f32,
    is_single_template: bool,
    is_shared_infra: bool,
    firm_is_multi_domain: bool,
}

fn load_msgpack<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    rmp_serde::from_read(reader).map_err(Error::from)
}

fn parse_template(raw: RawCandidateTemplate) -> Result<CandidateTemplate> {
    let token_seq = raw
        .template
        .iter()
        .map(|t| parse_token(t))
        .collect::<Result<Vec<_>>>()?;

    Ok(CandidateTemplate {
        template_id: raw.template_id,
        token_seq,
        support_count: raw.support_count,
        coverage_pct: raw.coverage_pct,
        in_mined_rules: raw.in_mined_rules,
        max_rule_confidence: raw.max_rule_confidence,
        avg_rule_confidence: raw.avg_rule_confidence,
        uses_middle_name: raw.uses_middle_name,
        uses_multiple_firsts: raw.uses_multiple_firsts,
        uses_multiple_middles: raw.uses_multiple_middles,
        uses_multiple_lasts: raw.uses_multiple_lasts,
    })
}

fn load_candidate_templates(path: &Path) -> Result<Vec<CandidateTemplate>> {
    let raw: Vec<RawCandidateTemplate> = load_msgpack(path)?;
    let mut templates = raw.into_iter().map(parse_template).collect::<Result<Vec<_>>>()?;
    templates.sort_by_key(|t| t.template_id);
    Ok(templates)
}

/// The per-firm table, derived in one pass over each firm's `template_ids`
/// usage list: the per-template occurrence count becomes `support_count`,
/// its share of the list becomes `coverage_pct`, and membership in the
/// max-count set becomes `is_top_template`.
fn derive_firm_usage(
    raw: FxHashMap<String, RawFirmUsage>,
) -> (FxHashMap<String, FirmStats>, FxHashMap<String, FxHashMap<i32, FirmTemplateUsage>>) {
    let mut stats = FxHashMap::default();
    let mut usage = FxHashMap::default();

    for (firm, entry) in raw {
        stats.insert(
            firm.clone(),
            FirmStats {
                num_templates: entry.num_templates,
                num_investors: entry.num_investors,
                diversity_ratio: entry.diversity_ratio,
                is_single_template: entry.is_single_template,
                is_shared_infra: entry.is_shared_infra,
                firm_is_multi_domain: entry.firm_is_multi_domain,
            },
        );

        let total = entry.template_ids.len();
        if total == 0 {
            usage.insert(firm, FxHashMap::default());
            continue;
        }

        let mut counts: FxHashMap<i32, i32> = FxHashMap::default();
        for id in &entry.template_ids {
            *counts.entry(*id).or_insert(0) += 1;
        }
        let max_count = counts.values().copied().max().unwrap_or(0);

        let per_template = counts
            .into_iter()
            .map(|(id, count)| {
                (
                    id,
                    FirmTemplateUsage {
                        support_count: count,
                        coverage_pct: count as f32 / total as f32,
                        is_top_template: count == max_count,
                    },
                )
            })
            .collect();

        usage.insert(firm, per_template);
    }

    (stats, usage)
}

/// Immutable, shared view over every piece of precomputed metadata the
/// engine needs besides the scoring model itself and the firm→domain
/// directory (owned separately by [`crate::domain::DomainResolver`]).
pub struct TemplateStore {
    standard_templates: Vec<CandidateTemplate>,
    complex_templates: Vec<CandidateTemplate>,
    firm_stats: FxHashMap<String, FirmStats>,
    firm_usage: FxHashMap<String, FxHashMap<i32, FirmTemplateUsage>>,
}

impl TemplateStore {
    /// Loads the three required MessagePack blobs and builds the derived
    /// per-firm usage tables. Any parse error or missing required field
    /// aborts loading with a [`Error::ConfigurationError`].
    pub fn load(
        standard_templates_path: &Path,
        complex_templates_path: &Path,
        firm_usage_path: &Path,
    ) -> Result<Self> {
        let standard_templates = load_candidate_templates(standard_templates_path)?;
        let complex_templates = load_candidate_templates(complex_templates_path)?;
        let raw_firm_usage: FxHashMap<String, RawFirmUsage> = load_msgpack(firm_usage_path)?;
        let (firm_stats, firm_usage) = derive_firm_usage(raw_firm_usage);

        Ok(Self { standard_templates, complex_templates, firm_stats, firm_usage })
    }

    pub fn templates(&self, class: TemplateClass) -> &[CandidateTemplate] {
        match class {
            TemplateClass::Standard => &self.standard_templates,
            TemplateClass::Complex => &self.complex_templates,
        }
    }

    pub fn firm_stats(&self, firm_key: &str) -> Option<&FirmStats> {
        self.firm_stats.get(firm_key)
    }

    pub fn firm_template_usage(&self, firm_key: &str, template_id: i32) -> Option<&FirmTemplateUsage> {
        self.firm_usage.get(firm_key)?.get(&template_id)
    }

    /// Template counts per class, for startup logging and tests.
    pub fn stats(&self) -> (usize, usize) {
        (self.standard_templates.len(), self.complex_templates.len())
    }

    /// Assembles a store directly from already-built pieces, bypassing
    /// MessagePack loading. Used by other modules' unit tests that need a
    /// `TemplateStore` without round-tripping through a file.
    #[cfg(test)]
    pub(crate) fn load_for_test(
        standard_templates: Vec<CandidateTemplate>,
        complex_templates: Vec<CandidateTemplate>,
        firm_stats: FxHashMap<String, FirmStats>,
        firm_usage: FxHashMap<String, FxHashMap<i32, FirmTemplateUsage>>,
    ) -> Self {
        Self { standard_templates, complex_templates, firm_stats, firm_usage }
    }
}
