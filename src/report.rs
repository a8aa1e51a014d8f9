//! Output formatting for scan results.
//!
//! Two formats:
//! - JSON: `{ total_smells, codeSmells, quality, ... }` for programmatic
//!   consumption
//! - Pretty: colored terminal output grouped by file

use colored::*;
use serde::Serialize;
use std::io::Write;

use crate::detect::{CorpusReport, Finding, SkippedFile};
use crate::score::QualityScore;

/// Per-file error counts, listed only for files that had any.
#[derive(Serialize, Debug)]
pub struct JsonFileErrors<'a> {
    pub file: &'a str,
    pub rule_errors: usize,
    pub classifier_errors: usize,
}

#[derive(Serialize, Debug)]
pub struct JsonReport<'a> {
    pub version: &'static str,
    pub path: &'a str,
    pub files_scanned: usize,
    pub total_smells: usize,
    #[serde(rename = "codeSmells")]
    pub code_smells: Vec<&'a Finding>,
    pub quality: &'a QualityScore,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<&'a SkippedFile>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<JsonFileErrors<'a>>,
}

impl<'a> JsonReport<'a> {
    pub fn new(path: &'a str, corpus: &'a CorpusReport, quality: &'a QualityScore) -> Self {
        let errors = corpus
            .files
            .values()
            .filter(|f| f.has_errors())
            .map(|f| JsonFileErrors {
                file: &f.file_path,
                rule_errors: f.rule_errors.len(),
                classifier_errors: f.classifier_errors.len(),
            })
            .collect();
        Self {
            version: env!("CARGO_PKG_VERSION"),
            path,
            files_scanned: corpus.file_count(),
            total_smells: corpus.total_smells(),
            code_smells: corpus.findings().collect(),
            quality,
            skipped: corpus.skipped.iter().collect(),
            errors,
        }
    }
}

/// Write results as pretty-printed JSON.
pub fn write_json<W: Write>(
    out: &mut W,
    path: &str,
    corpus: &CorpusReport,
    quality: &QualityScore,
) -> anyhow::Result<()> {
    let report = JsonReport::new(path, corpus, quality);
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

/// Write results for a terminal.
pub fn write_pretty<W: Write>(
    out: &mut W,
    path: &str,
    corpus: &CorpusReport,
    quality: &QualityScore,
) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "  {} v{}",
        "smellcheck".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    )?;
    writeln!(out)?;
    writeln!(out, "  {}{}", "Scanning: ".dimmed(), path)?;
    writeln!(
        out,
        "  {}{} files, {} skipped",
        "Analyzed: ".dimmed(),
        corpus.file_count(),
        corpus.skipped.len()
    )?;
    writeln!(out)?;

    write_summary(out, quality)?;
    writeln!(out)?;

    if corpus.total_smells() > 0 {
        write_findings(out, corpus)?;
    }

    let errored: Vec<_> = corpus.files.values().filter(|f| f.has_errors()).collect();
    if !errored.is_empty() {
        writeln!(out, "  {}:", "Incomplete analysis".yellow().bold())?;
        for f in errored {
            writeln!(
                out,
                "    {}  {} rule errors, {} classifier errors",
                f.file_path.blue(),
                f.rule_errors.len(),
                f.classifier_errors.len()
            )?;
        }
        writeln!(out)?;
    }

    if !quality.chart_data.is_empty() {
        write_breakdown(out, quality)?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_summary<W: Write>(out: &mut W, quality: &QualityScore) -> std::io::Result<()> {
    let status = if quality.passed {
        "✓ PASS".green()
    } else {
        "✗ FAIL".red()
    };
    writeln!(
        out,
        "  {}  Quality: {}  Grade: {}  Smells: {}",
        status,
        colored_score(quality.score),
        colored_grade(&quality.grade),
        quality.total_smells
    )
}

fn colored_score(score: f64) -> ColoredString {
    let text = format!("{:.2}", score);
    match score {
        s if s >= 90.0 => text.green().bold(),
        s if s >= 75.0 => text.green(),
        s if s >= 50.0 => text.yellow(),
        s if s >= 25.0 => text.yellow().bold(),
        _ => text.red(),
    }
}

fn colored_grade(grade: &str) -> ColoredString {
    match grade {
        "A" => grade.green().bold(),
        "B" => grade.green(),
        "C" => grade.yellow(),
        "D" => grade.yellow().bold(),
        _ => grade.red(),
    }
}

fn write_findings<W: Write>(out: &mut W, corpus: &CorpusReport) -> std::io::Result<()> {
    writeln!(out, "  {} ({}):", "Smells".bold(), corpus.total_smells())?;
    writeln!(out)?;
    for file in corpus.files.values().filter(|f| !f.findings.is_empty()) {
        writeln!(out, "    {}", file.file_path.blue())?;
        for f in &file.findings {
            let lines = if f.start_line == f.end_line {
                format!("{}", f.start_line)
            } else {
                format!("{}-{}", f.start_line, f.end_line)
            };
            writeln!(
                out,
                "      {:<5} {:<10} {}",
                f.code.dimmed(),
                lines,
                f.smell_type
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_breakdown<W: Write>(out: &mut W, quality: &QualityScore) -> std::io::Result<()> {
    writeln!(out, "  {}:", "By category".bold())?;
    for slice in &quality.chart_data {
        writeln!(out, "    {:<16} {}", slice.category.as_str(), slice.value)?;
    }
    Ok(())
}
