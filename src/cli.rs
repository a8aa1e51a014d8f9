//! Command-line interface for smellcheck.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::classifier::{Classifier, HttpClassifier};
use crate::config::{ClassifierConfig, Config};
use crate::detect::{Rule, Runner};
use crate::report;
use crate::score;
use crate::source;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Detect code smells in Java projects.
///
/// Structural smells (complexity, member counts, raw exceptions) and
/// best-practice violations are found from the syntax tree. Complex Method
/// and Feature Envy need a classifier service; without one they are skipped.
#[derive(Parser)]
#[command(name = "smellcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a Java file or directory
    #[command(visible_alias = "check")]
    Scan(ScanArgs),
    /// List the available rules
    Rules(RulesArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

/// Arguments for the scan command.
#[derive(Parser)]
pub struct ScanArgs {
    /// Path to scan (file or directory)
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Classifier service base URL (overrides the config file)
    #[arg(long, env = "SMELLCHECK_CLASSIFIER_URL")]
    pub classifier_url: Option<String>,

    /// Skip the classifier-backed rules
    #[arg(long)]
    pub no_ml: bool,

    /// Minimum quality score (exit non-zero below it)
    #[arg(long)]
    pub min_score: Option<f64>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Arguments for the rules command.
#[derive(Parser)]
pub struct RulesArgs {
    /// Path to config YAML file, to show effective weights and switches
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Directory used for config discovery.
fn discovery_root(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.to_path_buf()
    } else {
        path.parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

fn classifier_config(args: &ScanArgs, config: &Config) -> Option<ClassifierConfig> {
    if args.no_ml {
        return None;
    }
    match (&args.classifier_url, &config.classifier) {
        (Some(url), Some(base)) => Some(ClassifierConfig {
            endpoint: url.clone(),
            ..base.clone()
        }),
        (Some(url), None) => Some(ClassifierConfig::new(url.clone())),
        (None, base) => base.clone(),
    }
}

/// Connect to the classifier, or continue without it.
fn load_classifier(config: Option<ClassifierConfig>) -> Option<Arc<dyn Classifier>> {
    let config = config?;
    match HttpClassifier::load(&config) {
        Ok(classifier) => {
            tracing::info!(endpoint = classifier.endpoint(), "classifier ready");
            Some(Arc::new(classifier))
        }
        Err(e) => {
            tracing::warn!(
                endpoint = %config.endpoint,
                "classifier unavailable, skipping CM and FE: {}",
                e
            );
            None
        }
    }
}

fn progress_bar(len: usize, enabled: bool) -> ProgressBar {
    if !enabled || !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

/// Run the scan command.
pub fn run_scan(args: &ScanArgs) -> anyhow::Result<i32> {
    if !args.path.exists() {
        eprintln!("Error: cannot access path {:?}", args.path);
        return Ok(EXIT_ERROR);
    }

    let config = match Config::load_for(&discovery_root(&args.path), args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let entries = source::collect(&args.path, &config.source)?;
    if entries.is_empty() {
        eprintln!("Warning: no Java files to scan");
    }

    let classifier = load_classifier(classifier_config(args, &config));
    let mut runner = Runner::new(config)?;
    if let Some(classifier) = classifier {
        runner = runner.with_classifier(classifier);
    }

    let progress = progress_bar(
        entries.len(),
        !args.no_progress && args.format == OutputFormat::Pretty,
    );
    let corpus = runner.traverse_with_progress(&entries, progress);
    let quality = score::calculate(&corpus, args.min_score.unwrap_or(0.0));

    let path_str = args.path.to_string_lossy().to_string();
    let mut out: Box<dyn Write> = match &args.output {
        Some(file) => Box::new(BufWriter::new(File::create(file)?)),
        None => Box::new(io::stdout().lock()),
    };
    match args.format {
        OutputFormat::Json => report::write_json(&mut out, &path_str, &corpus, &quality)?,
        OutputFormat::Pretty => report::write_pretty(&mut out, &path_str, &corpus, &quality)?,
    }
    out.flush()?;

    if quality.passed {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Run the rules command.
pub fn run_rules(args: &RulesArgs) -> anyhow::Result<i32> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let runner = Runner::new(config)?;

    println!(
        "  {:<6} {:<16} {:<7} {:<8} {}",
        "CODE", "CATEGORY", "WEIGHT", "ENABLED", "SMELL"
    );
    for rule in Rule::ALL {
        let enabled = if runner.registry().contains(rule) {
            "yes"
        } else {
            "no"
        };
        println!(
            "  {:<6} {:<16} {:<7} {:<8} {}",
            rule.code(),
            rule.category().as_str(),
            runner.config().weight_for(rule.code(), rule.default_weight()),
            enabled,
            rule.label()
        );
    }
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scan_args(path: PathBuf) -> ScanArgs {
        ScanArgs {
            path,
            config: None,
            format: OutputFormat::Json,
            output: None,
            classifier_url: None,
            no_ml: false,
            min_score: None,
            no_progress: true,
        }
    }

    #[test]
    fn test_cli_parses_scan() {
        let cli = Cli::try_parse_from([
            "smellcheck",
            "-vv",
            "scan",
            "src",
            "--format",
            "json",
            "--no-ml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.format, OutputFormat::Json);
                assert!(args.no_ml);
            }
            Commands::Rules(_) => panic!("expected scan"),
        }
    }

    #[test]
    fn test_classifier_url_overrides_config() {
        let config = Config {
            classifier: Some(ClassifierConfig {
                batch_size: 8,
                ..ClassifierConfig::new("http://config:8000")
            }),
            ..Default::default()
        };
        let mut args = scan_args(PathBuf::from("."));
        args.classifier_url = Some("http://flag:9000".into());
        let resolved = classifier_config(&args, &config).unwrap();
        assert_eq!(resolved.endpoint, "http://flag:9000");
        assert_eq!(resolved.batch_size, 8);

        args.no_ml = true;
        assert!(classifier_config(&args, &config).is_none());
    }

    #[test]
    fn test_scan_writes_report_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("A.java"),
            "class A {\n  void f() {\n    throw new NullPointerException();\n  }\n}\n",
        )
        .unwrap();
        let report = temp.path().join("out.json");
        let mut args = scan_args(temp.path().to_path_buf());
        args.output = Some(report.clone());

        assert_eq!(run_scan(&args).unwrap(), EXIT_SUCCESS);
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(report).unwrap()).unwrap();
        assert_eq!(json["total_smells"], 1);
        assert_eq!(json["codeSmells"][0]["code"], "NPD");
    }

    #[test]
    fn test_missing_path_is_error() {
        let args = scan_args(PathBuf::from("/definitely/not/here"));
        assert_eq!(run_scan(&args).unwrap(), EXIT_ERROR);
    }
}
