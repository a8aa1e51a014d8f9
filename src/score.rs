//! Project quality score.
//!
//! Starts from 100 and deducts for weighted smell impact per file, for smell
//! density above two per file, and for the number of distinct categories
//! affected. The result is floored at 0 and rounded to two decimals.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::config::DEFAULT_WEIGHT;
use crate::detect::{Category, CorpusReport, Finding};

pub const PERFECT_SCORE: f64 = 100.0;

/// Smells per file considered healthy.
pub const DENSITY_THRESHOLD: f64 = 2.0;

/// Caps of the three deductions.
pub mod caps {
    pub const BASE: f64 = 50.0;
    pub const DENSITY: f64 = 25.0;
    pub const DIVERSITY: f64 = 15.0;
}

/// Grade thresholds (minimum score for each grade).
pub mod grades {
    pub const A_MIN: f64 = 90.0;
    pub const B_MIN: f64 = 80.0;
    pub const C_MIN: f64 = 70.0;
    pub const D_MIN: f64 = 60.0;
}

/// One slice of the per-category chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSlice {
    pub category: Category,
    pub value: usize,
    pub color: &'static str,
}

/// The calculated quality score.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityScore {
    /// Score from 0-100, higher = cleaner
    pub score: f64,
    /// Letter grade: "A" (90+), "B" (80+), "C" (70+), "D" (60+), "F"
    pub grade: String,
    pub total_files: usize,
    pub affected_files: usize,
    pub total_smells: usize,
    /// Findings per category, in order of first appearance
    pub chart_data: Vec<ChartSlice>,
    /// Findings per smell code
    pub breakdown: BTreeMap<String, usize>,
    /// Whether the score reached the minimum
    pub passed: bool,
    pub min_score: f64,
}

fn multiplier(category: Category) -> f64 {
    match category {
        Category::Design => 1.2,
        Category::BestPractices => 0.8,
        Category::SemanticBased => 1.0,
    }
}

pub fn color(category: Category) -> &'static str {
    match category {
        Category::Design => "#2ea043",
        Category::BestPractices => "#0366d6",
        Category::SemanticBased => "#8250df",
    }
}

fn calculate_grade(score: f64) -> String {
    match score {
        s if s >= grades::A_MIN => "A".to_string(),
        s if s >= grades::B_MIN => "B".to_string(),
        s if s >= grades::C_MIN => "C".to_string(),
        s if s >= grades::D_MIN => "D".to_string(),
        _ => "F".to_string(),
    }
}

/// Raw quality score of `findings` spread over `total_files` files.
pub fn quality(findings: &[&Finding], total_files: usize) -> f64 {
    if total_files == 0 {
        return PERFECT_SCORE;
    }
    let files = total_files as f64;
    let density = findings.len() as f64 / files;

    let weighted_impact: f64 = findings
        .iter()
        .map(|f| {
            let weight = if f.weight == 0 { DEFAULT_WEIGHT } else { f.weight };
            weight as f64 * multiplier(f.category)
        })
        .sum();

    let categories: HashSet<Category> = findings.iter().map(|f| f.category).collect();
    let diversity_penalty = (categories.len() as f64 * 5.0).min(caps::DIVERSITY);

    let ratio = density / DENSITY_THRESHOLD;
    let density_penalty = if ratio > 1.0 {
        (15.0 * (ratio + 1.0).ln()).min(caps::DENSITY)
    } else {
        0.0
    };

    let base_deduction = (weighted_impact / files * 8.0).min(caps::BASE);

    let score = (PERFECT_SCORE - base_deduction - density_penalty - diversity_penalty).max(0.0);
    (score * 100.0).round() / 100.0
}

/// Per-category counts with their chart colors.
pub fn chart_data(findings: &[&Finding]) -> Vec<ChartSlice> {
    let mut slices: Vec<ChartSlice> = Vec::new();
    for finding in findings {
        match slices.iter_mut().find(|s| s.category == finding.category) {
            Some(slice) => slice.value += 1,
            None => slices.push(ChartSlice {
                category: finding.category,
                value: 1,
                color: color(finding.category),
            }),
        }
    }
    slices
}

/// Score a corpus. `min_score` decides `passed`.
pub fn calculate(corpus: &CorpusReport, min_score: f64) -> QualityScore {
    let findings: Vec<&Finding> = corpus.findings().collect();
    let total_files = corpus.file_count();
    let score = quality(&findings, total_files);

    let mut breakdown = BTreeMap::new();
    for f in &findings {
        *breakdown.entry(f.code.clone()).or_insert(0) += 1;
    }

    QualityScore {
        score,
        grade: calculate_grade(score),
        total_files,
        affected_files: corpus
            .files
            .values()
            .filter(|f| !f.findings.is_empty())
            .count(),
        total_smells: findings.len(),
        chart_data: chart_data(&findings),
        breakdown,
        passed: score >= min_score,
        min_score,
    }
}
