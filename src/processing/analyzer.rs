//! Resume analysis pipeline: segmentation, sections, keywords and role

use crate::classifier::Classifier;
use crate::config::{Config, KeywordSource};
use crate::error::Result;
use crate::processing::grouper::{Point, PointGrouper};
use crate::processing::keywords::KeywordExtractor;
use crate::processing::normalizer::{full_text, normalize_paragraphs};
use crate::processing::roles::{match_role, MatchResult, RoleCatalog, RoleProfile};
use crate::processing::sections::{ExtractedSections, SectionExtractor};
use log::info;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Everything produced for one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    pub line_count: usize,
    pub points: Vec<Point>,
    pub sections: ExtractedSections,
    pub section_keywords: Vec<SectionKeywords>,
    pub keywords: Vec<String>,
    pub role: RoleOutcome,
    pub classifier: String,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionKeywords {
    pub section: String,
    pub keywords: Vec<String>,
}

/// Owned form of a role match, suitable for reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RoleOutcome {
    Matched {
        raw_label: String,
        profile: RoleProfile,
    },
    Unmatched {
        raw_label: String,
        suggestion: Option<String>,
    },
}

impl RoleOutcome {
    pub fn raw_label(&self) -> &str {
        match self {
            RoleOutcome::Matched { raw_label, .. } | RoleOutcome::Unmatched { raw_label, .. } => raw_label,
        }
    }
}

/// Immutable pipeline built once from the configuration
pub struct ResumeAnalyzer {
    grouper: PointGrouper,
    sections: SectionExtractor,
    keywords: KeywordExtractor,
    catalog: RoleCatalog,
    keyword_limit: usize,
    keyword_source: KeywordSource,
}

impl ResumeAnalyzer {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            grouper: PointGrouper::from_config(&config.segmentation)?,
            sections: SectionExtractor::new(&config.sections)?,
            keywords: KeywordExtractor::from_config(&config.keywords),
            catalog: config.role_catalog(),
            keyword_limit: config.keywords.limit,
            keyword_source: config.keywords.source,
        })
    }

    pub fn with_keyword_limit(mut self, limit: usize) -> Self {
        self.keyword_limit = limit;
        self
    }

    pub fn with_keyword_source(mut self, source: KeywordSource) -> Self {
        self.keyword_source = source;
        self
    }

    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    /// Group raw paragraphs into points without classification
    pub fn segment<S: AsRef<str>>(&self, paragraphs: &[S]) -> Vec<Point> {
        let lines = normalize_paragraphs(paragraphs);
        self.grouper.group(&lines)
    }

    /// Run the full pipeline.
    ///
    /// Classification runs first; if it fails (e.g. a missing model
    /// artifact) the error is returned and nothing else is computed.
    pub fn analyze<S: AsRef<str>>(
        &self,
        paragraphs: &[S],
        classifier: &dyn Classifier,
    ) -> Result<DocumentAnalysis> {
        let start_time = Instant::now();

        let lines = normalize_paragraphs(paragraphs);
        let text = full_text(&lines);

        let raw_label = classifier.classify(&text)?;
        info!("Classifier '{}' predicted '{}'", classifier.name(), raw_label);

        let points = self.grouper.group(&lines);
        let sections = self.sections.extract(&text);

        let section_keywords: Vec<SectionKeywords> = sections
            .found()
            .map(|(name, body)| SectionKeywords {
                section: name.to_string(),
                keywords: self.keywords.extract(body, self.keyword_limit),
            })
            .collect();

        let keywords = self.document_keywords(&text, &sections);
        let role = self.resolve_role(&raw_label);

        info!(
            "Analyzed {} lines: {} points, {} sections, {} keywords",
            lines.len(),
            points.len(),
            sections.found_count(),
            keywords.len()
        );

        Ok(DocumentAnalysis {
            line_count: lines.len(),
            points,
            sections,
            section_keywords,
            keywords,
            role,
            classifier: classifier.name().to_string(),
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    fn document_keywords(&self, text: &str, sections: &ExtractedSections) -> Vec<String> {
        match self.keyword_source {
            KeywordSource::Raw => self.keywords.extract(text, self.keyword_limit),
            KeywordSource::Sections => {
                let bodies: Vec<&str> = sections.found().map(|(_, body)| body).collect();
                if bodies.is_empty() {
                    self.keywords.extract(text, self.keyword_limit)
                } else {
                    self.keywords.extract(&bodies.join("\n"), self.keyword_limit)
                }
            }
        }
    }

    pub fn resolve_role(&self, raw_label: &str) -> RoleOutcome {
        match match_role(raw_label, &self.catalog) {
            MatchResult::Matched(profile) => RoleOutcome::Matched {
                raw_label: raw_label.to_string(),
                profile: profile.clone(),
            },
            MatchResult::Unmatched { raw_label } => {
                let suggestion = self
                    .catalog
                    .closest(&raw_label)
                    .map(|(profile, _)| profile.name.clone());
                RoleOutcome::Unmatched {
                    raw_label,
                    suggestion,
                }
            }
        }
    }
}
