//! Report structures handed to the formatters

use crate::processing::analyzer::{DocumentAnalysis, RoleOutcome};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: ReportSummary,
    pub analysis: DocumentAnalysis,
    pub metadata: ReportMetadata,
}

/// Headline numbers shown before the details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub role_headline: String,
    pub point_count: usize,
    pub sections_found: Vec<String>,
    pub sections_missing: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: SystemTime,
    pub source_file: String,
    pub classifier: String,
    pub processing_time_ms: u64,
    pub tool_version: String,
}

impl AnalysisReport {
    pub fn new(analysis: DocumentAnalysis, source_file: &str) -> Self {
        let (sections_found, sections_missing) = analysis
            .sections
            .entries
            .iter()
            .fold((Vec::new(), Vec::new()), |(mut found, mut missing), entry| {
                if entry.section.is_found() {
                    found.push(entry.name.clone());
                } else {
                    missing.push(entry.name.clone());
                }
                (found, missing)
            });

        let summary = ReportSummary {
            role_headline: role_headline(&analysis.role),
            point_count: analysis.points.len(),
            sections_found,
            sections_missing,
        };

        let metadata = ReportMetadata {
            generated_at: SystemTime::now(),
            source_file: source_file.to_string(),
            classifier: analysis.classifier.clone(),
            processing_time_ms: analysis.processing_time_ms,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        };

        Self {
            summary,
            analysis,
            metadata,
        }
    }
}

fn role_headline(role: &RoleOutcome) -> String {
    match role {
        RoleOutcome::Matched { profile, .. } => profile.name.clone(),
        RoleOutcome::Unmatched {
            raw_label,
            suggestion: Some(closest),
        } => format!("{} (not in catalog, closest: {})", raw_label, closest),
        RoleOutcome::Unmatched { raw_label, .. } => format!("{} (not in catalog)", raw_label),
    }
}
