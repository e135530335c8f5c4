//! Configuration management for the resume segmenter

use crate::error::{Result, SegmenterError};
use crate::processing::grouper::{BoundaryRuleKind, GroupingUnit, KeywordMatchMode};
use crate::processing::keywords::{StopwordList, DEFAULT_KEYWORD_LIMIT};
use crate::processing::roles::{default_roles, RoleCatalog, RoleProfile};
use crate::processing::sections::{default_section_rules, SectionRule};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub segmentation: SegmentationConfig,
    pub keywords: KeywordConfig,
    pub classifier: ClassifierConfig,
    pub output: OutputConfig,
    pub sections: Vec<SectionRule>,
    pub roles: Vec<RoleProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// Enabled boundary rules; evaluation order is fixed (marker, keyword, case)
    pub rules: Vec<BoundaryRuleKind>,
    pub boundary_keywords: Vec<String>,
    pub keyword_match: KeywordMatchMode,
    pub continuation_verbs: Vec<String>,
    pub unit: GroupingUnit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordConfig {
    pub limit: usize,
    pub stopwords: StopwordList,
    pub nouns_only: bool,
    pub source: KeywordSource,
}

/// Text the document-level keyword list is computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordSource {
    /// Found section bodies, falling back to the raw text when none was found
    Sections,
    Raw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub models_dir: PathBuf,
    pub artifact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
    Pdf,
}

const ACTION_KEYWORDS: &[&str] = &[
    "experience",
    "project",
    "worked",
    "developed",
    "managed",
    "responsible",
    "designed",
    "implemented",
    "led",
    "created",
    "built",
];

const ACTION_VERBS: &[&str] = &[
    "worked",
    "developed",
    "managed",
    "designed",
    "implemented",
    "led",
    "created",
    "built",
];

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            rules: vec![BoundaryRuleKind::Marker, BoundaryRuleKind::Case],
            boundary_keywords: ACTION_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            keyword_match: KeywordMatchMode::StartsWith,
            continuation_verbs: ACTION_VERBS.iter().map(|s| s.to_string()).collect(),
            unit: GroupingUnit::Line,
        }
    }
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_KEYWORD_LIMIT,
            stopwords: StopwordList::Standard,
            nouns_only: false,
            source: KeywordSource::Sections,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-segmenter")
            .join("models");

        Self {
            segmentation: SegmentationConfig::default(),
            keywords: KeywordConfig::default(),
            classifier: ClassifierConfig {
                models_dir,
                artifact: "role_classifier.json".to_string(),
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
            sections: default_section_rules(),
            roles: default_roles(),
        }
    }
}

impl Config {
    /// Load the user config, writing the defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            SegmenterError::Configuration(format!(
                "Failed to parse config '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Overwrite the user config with the defaults
    pub fn reset() -> Result<Self> {
        let config = Self::default();
        config.save()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            SegmenterError::Configuration(format!("Failed to serialize config: {}", e))
        })
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-segmenter")
            .join("config.toml")
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.classifier.models_dir.join(&self.classifier.artifact)
    }

    pub fn role_catalog(&self) -> RoleCatalog {
        RoleCatalog::new(self.roles.clone())
    }

    fn validate(&self) -> Result<()> {
        if let Some(rule) = self.sections.iter().find(|s| s.anchors.is_empty()) {
            return Err(SegmenterError::Configuration(format!(
                "Section '{}' needs at least one anchor keyword",
                rule.name
            )));
        }

        if self.segmentation.rules.contains(&BoundaryRuleKind::Keyword)
            && self.segmentation.boundary_keywords.is_empty()
        {
            return Err(SegmenterError::Configuration(
                "Keyword boundary rule enabled without boundary keywords".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_through_toml() {
        let config = Config::default();
        let text = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.keywords.limit = 5;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.keywords.limit, 5);
        assert_eq!(loaded.sections.len(), 3);
    }

    #[test]
    fn test_invalid_section_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.sections[0].anchors.clear();
        config.save_to(&path).unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(SegmenterError::Configuration(_))
        ));
    }

    #[test]
    fn test_artifact_path() {
        let config = Config::default();
        assert!(config.artifact_path().ends_with("role_classifier.json"));
    }

    #[test]
    fn test_role_catalog_matches_config() {
        let config = Config::default();
        assert_eq!(config.role_catalog().len(), config.roles.len());
    }
}
