//! Keyword-anchored section extraction

use crate::error::{Result, SegmenterError};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One row of the section table: what opens a section and what closes it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRule {
    pub name: String,
    pub anchors: Vec<String>,
    #[serde(default)]
    pub terminators: Vec<String>,
}

impl SectionRule {
    pub fn new(name: &str, anchors: &[&str], terminators: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            anchors: anchors.iter().map(|s| s.to_string()).collect(),
            terminators: terminators.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Body of a section, or the marker that its anchor never appeared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "body", rename_all = "snake_case")]
pub enum Section {
    Found(String),
    NotFound,
}

impl Section {
    pub fn is_found(&self) -> bool {
        matches!(self, Section::Found(_))
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            Section::Found(body) => Some(body),
            Section::NotFound => None,
        }
    }
}

static NOT_FOUND: Section = Section::NotFound;

/// Extraction result in table order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSections {
    pub entries: Vec<ExtractedSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSection {
    pub name: String,
    pub section: Section,
}

impl ExtractedSections {
    /// Section by name; names outside the table are reported as not found.
    pub fn get(&self, name: &str) -> &Section {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.section)
            .unwrap_or(&NOT_FOUND)
    }

    pub fn found(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|e| e.section.body().map(|body| (e.name.as_str(), body)))
    }

    pub fn found_count(&self) -> usize {
        self.found().count()
    }
}

struct CompiledRule {
    name: String,
    anchor: Regex,
    terminator: Option<Regex>,
}

/// Compiled section table, reusable across documents
pub struct SectionExtractor {
    rules: Vec<CompiledRule>,
}

impl SectionExtractor {
    pub fn new(rules: &[SectionRule]) -> Result<Self> {
        let mut compiled = Vec::with_capacity(rules.len());

        for rule in rules {
            let anchors = keyword_alternation(&rule.anchors).ok_or_else(|| {
                SegmenterError::Configuration(format!(
                    "Section '{}' has no anchor keywords",
                    rule.name
                ))
            })?;
            // One separator on the heading's own line ("experience:", "skills -") is not body text
            let anchor = Regex::new(&format!(
                r"(?i)(?:{})[^\S\n]*[:\-\u{{2013}}\u{{2014}}]?",
                anchors
            ))?;

            let terminator = match keyword_alternation(&rule.terminators) {
                Some(alternation) => Some(Regex::new(&format!(r"(?i)(?:{})", alternation))?),
                None => None,
            };

            compiled.push(CompiledRule {
                name: rule.name.clone(),
                anchor,
                terminator,
            });
        }

        Ok(Self { rules: compiled })
    }

    pub fn section_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }

    /// Extract every configured section from `text`.
    ///
    /// The text is lowercased first; bodies are trimmed slices of that
    /// lowercased text.
    pub fn extract(&self, text: &str) -> ExtractedSections {
        let lowered = text.to_lowercase();

        let entries: Vec<ExtractedSection> = self
            .rules
            .iter()
            .map(|rule| ExtractedSection {
                name: rule.name.clone(),
                section: Self::extract_one(rule, &lowered),
            })
            .collect();

        let sections = ExtractedSections { entries };
        debug!(
            "Extracted {}/{} sections",
            sections.found_count(),
            self.rules.len()
        );
        sections
    }

    fn extract_one(rule: &CompiledRule, text: &str) -> Section {
        let Some(anchor) = rule.anchor.find(text) else {
            return Section::NotFound;
        };

        let rest = &text[anchor.end()..];
        let end = rule
            .terminator
            .as_ref()
            .and_then(|t| t.find(rest))
            .map_or(rest.len(), |m| m.start());

        Section::Found(rest[..end].trim().to_string())
    }
}

/// Longest-first alternation of escaped keywords; multi-word keywords match
/// any run of whitespace between their words.
///
/// Word boundaries are only asserted on the sides where the keyword itself
/// starts or ends with a word character, so `c++` and `.net` still match.
fn keyword_alternation(keywords: &[String]) -> Option<String> {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';

    let mut patterns: Vec<(usize, String)> = keywords
        .iter()
        .filter_map(|k| {
            let words: Vec<&str> = k.split_whitespace().collect();
            let first = words.first()?.chars().next()?;
            let last = words.last()?.chars().next_back()?;

            let body = words
                .iter()
                .map(|w| regex::escape(w))
                .collect::<Vec<_>>()
                .join(r"\s+");
            let lead = if is_word(first) { r"\b" } else { "" };
            let trail = if is_word(last) { r"\b" } else { "" };
            Some((body.len(), format!("{}{}{}", lead, body, trail)))
        })
        .collect();

    if patterns.is_empty() {
        return None;
    }

    patterns.sort_by(|a, b| b.0.cmp(&a.0));
    Some(
        patterns
            .into_iter()
            .map(|(_, p)| p)
            .collect::<Vec<_>>()
            .join("|"),
    )
}

/// Extract every section of a compiled table from `text`
pub fn extract_sections(text: &str, extractor: &SectionExtractor) -> ExtractedSections {
    extractor.extract(text)
}

/// Canonical resume section table.
///
/// Each section is closed by the anchors of every other section plus the
/// trailing headings commonly found on resumes.
pub fn default_section_rules() -> Vec<SectionRule> {
    const TRAILING: &[&str] = &[
        "education",
        "projects",
        "certifications",
        "achievements",
        "languages",
        "hobbies",
        "interests",
        "references",
    ];
    const EXPERIENCE: &[&str] = &["experience", "work history", "employment history"];
    const RESPONSIBILITIES: &[&str] = &["responsibilities", "roles"];
    const SKILLS: &[&str] = &["skills", "skillset", "skill set"];

    let terminators = |own: &[&str]| -> Vec<&str> {
        [EXPERIENCE, RESPONSIBILITIES, SKILLS, TRAILING]
            .concat()
            .into_iter()
            .filter(|k| !own.contains(k))
            .collect()
    };

    vec![
        SectionRule::new("experience", EXPERIENCE, &terminators(EXPERIENCE)),
        SectionRule::new("responsibilities", RESPONSIBILITIES, &terminators(RESPONSIBILITIES)),
        SectionRule::new("skills", SKILLS, &terminators(SKILLS)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> SectionExtractor {
        SectionExtractor::new(&default_section_rules()).unwrap()
    }

    #[test]
    fn test_experience_terminated_by_skills() {
        let sections = extract_sections(
            "experience: built internal tools. skills: python, sql",
            &extractor(),
        );

        assert_eq!(
            sections.get("experience"),
            &Section::Found("built internal tools.".to_string())
        );
        assert_eq!(
            sections.get("skills"),
            &Section::Found("python, sql".to_string())
        );
        assert_eq!(sections.get("responsibilities"), &Section::NotFound);
    }

    #[test]
    fn test_synonym_anchors() {
        let table = extractor();

        let sections = extract_sections("Work History\nAcme Corp 2019-2023\nRoles: backend lead", &table);
        assert_eq!(sections.get("experience").body(), Some("acme corp 2019-2023"));
        assert_eq!(sections.get("responsibilities").body(), Some("backend lead"));

        let sections = extract_sections("Skillset - rust, go", &table);
        assert_eq!(sections.get("skills").body(), Some("rust, go"));
    }

    #[test]
    fn test_anchor_needs_whole_word() {
        let sections = extract_sections("experienced engineer", &extractor());
        assert_eq!(sections.get("experience"), &Section::NotFound);
    }

    #[test]
    fn test_empty_body_is_distinct_from_not_found() {
        let sections = extract_sections("skills:", &extractor());
        assert_eq!(sections.get("skills"), &Section::Found(String::new()));
        assert_ne!(sections.get("skills"), &Section::NotFound);
    }

    #[test]
    fn test_empty_text() {
        let sections = extract_sections("", &extractor());
        assert_eq!(sections.found_count(), 0);
        assert!(sections.entries.iter().all(|e| e.section == Section::NotFound));
    }

    #[test]
    fn test_unknown_section_name() {
        let sections = extract_sections("skills: rust", &extractor());
        assert_eq!(sections.get("hobbies"), &Section::NotFound);
    }

    #[test]
    fn test_rerun_on_body_is_deterministic() {
        let table = extractor();
        let text = "experience: led the skills guild. education: bsc";
        let first = extract_sections(text, &table);
        let body = first.get("experience").body().unwrap().to_string();
        assert_eq!(body, "led the");

        let again = extract_sections(&body, &table);
        let again_twice = extract_sections(&body, &table);
        assert_eq!(again.get("experience"), again_twice.get("experience"));
        assert_eq!(again.get("experience"), &Section::NotFound);
    }

    #[test]
    fn test_rule_without_anchors_rejected() {
        let rules = vec![SectionRule::new("empty", &[], &["skills"])];
        assert!(SectionExtractor::new(&rules).is_err());
    }

    #[test]
    fn test_section_names_in_table_order() {
        let extractor = SectionExtractor::new(&default_section_rules()).unwrap();
        assert_eq!(
            extractor.section_names(),
            vec!["experience", "responsibilities", "skills"]
        );
    }

    #[test]
    fn test_bullet_dash_after_heading_is_kept() {
        let sections = extract_sections("skills\n- rust\n- go", &extractor());
        assert_eq!(sections.get("skills").body(), Some("- rust\n- go"));

        let sections = extract_sections("skills:\n- rust\n- go", &extractor());
        assert_eq!(sections.get("skills").body(), Some("- rust\n- go"));
    }

    #[test]
    fn test_keywords_ending_in_symbols() {
        let rules = vec![
            SectionRule::new("languages", &["c++", ".net"], &["tooling"]),
            SectionRule::new("tooling", &["tooling"], &[]),
        ];
        let extractor = SectionExtractor::new(&rules).unwrap();

        let sections = extract_sections("c++ and rust\ntooling: cargo", &extractor);
        assert_eq!(sections.get("languages").body(), Some("and rust"));
        assert_eq!(sections.get("tooling").body(), Some("cargo"));

        let sections = extract_sections("asp .net core", &extractor);
        assert_eq!(sections.get("languages").body(), Some("core"));
    }
}
