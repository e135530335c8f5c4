//! Resume segmenter: points, sections, keywords and role for a resume

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use resume_segmenter::classifier::{Classifier, FixedLabelClassifier, LinearClassifier};
use resume_segmenter::cli::{self, Cli, Commands, ConfigAction, RoleAction};
use resume_segmenter::config::{Config, KeywordSource, OutputFormat};
use resume_segmenter::input::InputManager;
use resume_segmenter::output::formatter::{save_report_to_file, suggest_filename};
use resume_segmenter::output::{AnalysisReport, ReportGenerator};
use resume_segmenter::processing::analyzer::ResumeAnalyzer;
use resume_segmenter::processing::roles::{match_role, MatchResult};
use resume_segmenter::SegmenterError;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

const RESUME_EXTENSIONS: &[&str] = &["docx", "pdf", "txt", "md"];

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_level)
    ).init();

    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config) -> anyhow::Result<()> {
    match command {
        Commands::Analyze {
            resume,
            label,
            keywords,
            raw_keywords,
            output,
            detailed,
            save,
        } => {
            cli::validate_file_extension(&resume, RESUME_EXTENSIONS)
                .map_err(SegmenterError::InvalidInput)
                .context("Resume file")?;

            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(SegmenterError::InvalidInput)?,
                None => config.output.format,
            };

            let classifier = build_classifier(&config, label)?;

            let mut analyzer = ResumeAnalyzer::new(&config).context("Invalid segmentation configuration")?;
            if let Some(limit) = keywords {
                analyzer = analyzer.with_keyword_limit(limit);
            }
            if raw_keywords {
                analyzer = analyzer.with_keyword_source(KeywordSource::Raw);
            }

            let paragraphs = read_with_spinner(&resume).await?;

            info!("Analyzing {} with classifier '{}'", resume.display(), classifier.name());
            let analysis = analyzer
                .analyze(&paragraphs, classifier.as_ref())
                .context("Analysis aborted")?;

            let report = AnalysisReport::new(analysis, &resume.to_string_lossy());
            let generator = ReportGenerator::with_options(
                config.output.color_output && save.is_none() && output_format == OutputFormat::Console,
                detailed || config.output.detailed,
            );
            let rendered = generator.render(&report, &output_format)?;

            // PDF never goes to stdout; without --save it lands in the working directory
            let target = match save {
                Some(path) if path.is_dir() => {
                    Some(path.join(suggest_filename(&output_format, &resume.to_string_lossy(), true)))
                }
                Some(path) => Some(path),
                None if output_format == OutputFormat::Pdf => Some(PathBuf::from(suggest_filename(
                    &output_format,
                    &resume.to_string_lossy(),
                    false,
                ))),
                None => None,
            };

            match target {
                Some(path) => {
                    save_report_to_file(&rendered, &path)
                        .with_context(|| format!("Failed to save report to {}", path.display()))?;
                    println!("{} Report saved to {}", "✅".green(), path.display());
                }
                None => println!("{}", String::from_utf8_lossy(&rendered)),
            }
        }

        Commands::Segment { resume } => {
            cli::validate_file_extension(&resume, RESUME_EXTENSIONS)
                .map_err(SegmenterError::InvalidInput)
                .context("Resume file")?;

            let analyzer = ResumeAnalyzer::new(&config)?;
            let paragraphs = read_with_spinner(&resume).await?;
            let points = analyzer.segment(&paragraphs);

            for (idx, point) in points.iter().enumerate() {
                println!("{}. {}", idx + 1, point);
            }
        }

        Commands::Roles { action } => {
            let catalog = config.role_catalog();
            match action {
                RoleAction::List => {
                    println!("📚 Known Roles\n");
                    for profile in catalog.profiles() {
                        println!("  • {}", profile.name.bold());
                        println!("    {}", profile.description);
                        if !profile.tags.is_empty() {
                            println!("    Tags: {}", profile.tags.join(", "));
                        }
                    }
                }
                RoleAction::Match { label } => match match_role(&label, &catalog) {
                    MatchResult::Matched(profile) => {
                        println!("{} '{}' -> {}", "✅".green(), label, profile.name.bold());
                        println!("   {}", profile.description);
                    }
                    MatchResult::Unmatched { raw_label } => {
                        println!("{} '{}' is not in the catalog", "⚠️".yellow(), raw_label);
                        if let Some((closest, score)) = catalog.closest(&raw_label) {
                            println!("   Closest: {} ({:.0}% similar)", closest.name, score * 100.0);
                        }
                    }
                },
            }
        }

        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => {
                println!("{}", config.to_toml()?);
            }
            ConfigAction::Path => {
                println!("{}", Config::config_path().display());
            }
            ConfigAction::Reset => {
                Config::reset()?;
                println!("🔄 Configuration reset to defaults at {}", Config::config_path().display());
            }
        },
    }

    Ok(())
}

fn build_classifier(config: &Config, label: Option<String>) -> anyhow::Result<Box<dyn Classifier>> {
    match label {
        Some(label) => Ok(Box::new(FixedLabelClassifier::new(label))),
        None => {
            let path = config.artifact_path();
            let classifier = LinearClassifier::load(&path).with_context(|| {
                format!(
                    "No role classifier available at {} (pass --label to skip classification)",
                    path.display()
                )
            })?;
            Ok(Box::new(classifier))
        }
    }
}

async fn read_with_spinner(path: &Path) -> anyhow::Result<Vec<String>> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .context("Invalid spinner template")?,
    );
    spinner.set_message(format!("Reading {}", path.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let mut input_manager = InputManager::new();
    let result = input_manager.read_paragraphs(path).await;
    spinner.finish_and_clear();

    result.with_context(|| format!("Failed to read {}", path.display()))
}
