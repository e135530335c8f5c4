//! CLI interface for the resume segmenter

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-segmenter")]
#[command(about = "Segment resumes into points, sections, keywords and a predicted role")]
#[command(long_about = "Reconstruct the structure of a resume from its paragraphs: bullet-like points, experience/responsibilities/skills sections, ranked keywords and a role matched against a known catalog")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a resume: points, sections, keywords and role
    Analyze {
        /// Path to resume file (DOCX, PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Use this role label instead of running the classifier
        #[arg(short, long)]
        label: Option<String>,

        /// Number of keywords to report
        #[arg(short, long)]
        keywords: Option<usize>,

        /// Compute keywords over the whole text instead of the sections
        #[arg(long)]
        raw_keywords: bool,

        /// Output format: console, json, markdown, html, pdf
        #[arg(short, long)]
        output: Option<String>,

        /// Include section keywords and classifier details
        #[arg(short, long)]
        detailed: bool,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Print the grouped points of a resume
    Segment {
        /// Path to resume file (DOCX, PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,
    },

    /// Role catalog commands
    Roles {
        #[command(subcommand)]
        action: RoleAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum RoleAction {
    /// List catalog roles
    List,

    /// Match a raw label against the catalog
    Match {
        /// Label as produced by a classifier
        label: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        "html" => Ok(crate::config::OutputFormat::Html),
        "pdf" => Ok(crate::config::OutputFormat::Pdf),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown, html, pdf", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
