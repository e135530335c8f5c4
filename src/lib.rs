//! Resume segmenter library
//!
//! Turns the flat paragraphs of a resume into grouped points, labeled
//! sections and keywords, and reconciles a classifier's role label with a
//! catalog of known roles.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{Result, SegmenterError};
pub use processing::analyzer::{DocumentAnalysis, ResumeAnalyzer, RoleOutcome};
pub use processing::grouper::{segment, Point, PointGrouper};
pub use processing::keywords::extract_keywords;
pub use processing::roles::{match_role, MatchResult, RoleCatalog, RoleProfile};
pub use processing::sections::{extract_sections, Section, SectionExtractor, SectionRule};
