//! Point grouping: merges normalized lines into bullet-like points

use crate::config::SegmentationConfig;
use crate::error::Result;
use crate::processing::normalizer::normalize_paragraphs;
use aho_corasick::{AhoCorasick, MatchKind};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_segmentation::UnicodeSegmentation;

/// One logical bullet assembled from one or more consecutive lines. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Point(String);

impl Point {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Point {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Lines collected for the point currently being built
#[derive(Debug, Default)]
pub struct PointBuffer {
    lines: Vec<String>,
}

impl PointBuffer {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The line that opened the current point
    pub fn first_line(&self) -> Option<&str> {
        self.lines.first().map(String::as_str)
    }

    fn push(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn flush(&mut self) -> Option<Point> {
        if self.lines.is_empty() {
            return None;
        }
        let text = self.lines.join(" ");
        self.lines.clear();
        Some(Point(text))
    }
}

/// Which boundary rule a configuration entry enables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryRuleKind {
    Marker,
    Keyword,
    Case,
}

/// How the keyword rule looks for its keywords inside a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordMatchMode {
    Contains,
    StartsWith,
}

/// Unit the grouper consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingUnit {
    Line,
    Sentence,
}

/// A predicate deciding whether a line opens a new point.
///
/// Rules are evaluated in ascending `priority()` order and the first rule
/// returning `true` wins. A rule never needs to handle the empty-buffer case
/// specially: starting a point on an empty buffer only seeds it.
pub trait BoundaryRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn priority(&self) -> u8;

    fn starts_new_point(&self, line: &str, current: &PointBuffer) -> bool;
}

/// Numbered-list markers (`1.`, `2)`), dashes and bullet glyphs
pub struct MarkerBoundary {
    marker_regex: Regex,
}

impl MarkerBoundary {
    pub fn new() -> Result<Self> {
        let marker_regex = Regex::new(r"^(?:\d+[.)]|[-\u{2013}\u{2014}\u{2022}\u{2023}\u{25AA}\u{25CF}\u{25E6}\u{2219}\u{00B7}*\u{25A0}\u{27A2}])")?;
        Ok(Self { marker_regex })
    }
}

impl BoundaryRule for MarkerBoundary {
    fn name(&self) -> &'static str {
        "marker"
    }

    fn priority(&self) -> u8 {
        0
    }

    fn starts_new_point(&self, line: &str, _current: &PointBuffer) -> bool {
        self.marker_regex.is_match(line.trim_start())
    }
}

/// Action or transition keywords such as "developed" or "responsible"
pub struct KeywordBoundary {
    matcher: AhoCorasick,
    mode: KeywordMatchMode,
}

impl KeywordBoundary {
    pub fn new<S: AsRef<str>>(keywords: &[S], mode: KeywordMatchMode) -> Result<Self> {
        let patterns: Vec<&str> = keywords
            .iter()
            .map(|k| k.as_ref().trim())
            .filter(|k| !k.is_empty())
            .collect();

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::Standard)
            .build(&patterns)?;

        Ok(Self { matcher, mode })
    }

    fn has_keyword(&self, line: &str) -> bool {
        self.matcher
            .find_overlapping_iter(line)
            .filter(|m| is_word_bounded(line, m.start(), m.end()))
            .any(|m| match self.mode {
                KeywordMatchMode::Contains => true,
                KeywordMatchMode::StartsWith => m.start() == 0,
            })
    }
}

impl BoundaryRule for KeywordBoundary {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn priority(&self) -> u8 {
        1
    }

    fn starts_new_point(&self, line: &str, current: &PointBuffer) -> bool {
        !current.is_empty() && self.has_keyword(line)
    }
}

/// Uppercase-initial lines open a new point once something is buffered.
///
/// With continuation verbs configured, an uppercase line that opens with one
/// of them stays in the current point when that point also opened with one.
pub struct CaseBoundary {
    continuation_verbs: Vec<String>,
}

impl CaseBoundary {
    /// The plain rule: every uppercase-initial line splits.
    pub fn strict() -> Self {
        Self {
            continuation_verbs: Vec::new(),
        }
    }

    pub fn with_action_runs<S: AsRef<str>>(verbs: &[S]) -> Self {
        Self {
            continuation_verbs: verbs
                .iter()
                .map(|v| v.as_ref().trim().to_lowercase())
                .filter(|v| !v.is_empty())
                .collect(),
        }
    }

    fn opens_with_action(&self, line: &str) -> bool {
        let first_word = line
            .split_whitespace()
            .next()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .unwrap_or_default();

        self.continuation_verbs.iter().any(|v| *v == first_word)
    }
}

impl BoundaryRule for CaseBoundary {
    fn name(&self) -> &'static str {
        "case"
    }

    fn priority(&self) -> u8 {
        2
    }

    fn starts_new_point(&self, line: &str, current: &PointBuffer) -> bool {
        if current.is_empty() {
            return false;
        }

        let uppercase_start = line.chars().next().map_or(false, char::is_uppercase);
        if !uppercase_start {
            return false;
        }

        let action_run = !self.continuation_verbs.is_empty()
            && self.opens_with_action(line)
            && current
                .first_line()
                .map_or(false, |first| self.opens_with_action(first));

        !action_run
    }
}

fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.map_or(false, char::is_alphanumeric) && !after.map_or(false, char::is_alphanumeric)
}

/// Groups normalized lines into points using an ordered list of boundary rules
pub struct PointGrouper {
    rules: Vec<Box<dyn BoundaryRule>>,
    unit: GroupingUnit,
}

impl PointGrouper {
    pub fn new(mut rules: Vec<Box<dyn BoundaryRule>>, unit: GroupingUnit) -> Self {
        rules.sort_by_key(|rule| rule.priority());
        Self { rules, unit }
    }

    pub fn from_config(config: &SegmentationConfig) -> Result<Self> {
        let mut rules: Vec<Box<dyn BoundaryRule>> = Vec::new();

        for kind in &config.rules {
            let rule: Box<dyn BoundaryRule> = match kind {
                BoundaryRuleKind::Marker => Box::new(MarkerBoundary::new()?),
                BoundaryRuleKind::Keyword => Box::new(KeywordBoundary::new(
                    &config.boundary_keywords,
                    config.keyword_match,
                )?),
                BoundaryRuleKind::Case => {
                    Box::new(CaseBoundary::with_action_runs(&config.continuation_verbs))
                }
            };
            rules.push(rule);
        }

        Ok(Self::new(rules, config.unit))
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Group lines into points. Total over any input; empty input gives no points.
    pub fn group<S: AsRef<str>>(&self, lines: &[S]) -> Vec<Point> {
        let units = self.units(lines);
        let mut points = Vec::new();
        let mut buffer = PointBuffer::default();

        for unit in &units {
            let split = self
                .rules
                .iter()
                .any(|rule| rule.starts_new_point(unit, &buffer));

            if split {
                points.extend(buffer.flush());
            }
            buffer.push(unit);
        }
        points.extend(buffer.flush());

        debug!("Grouped {} units into {} points", units.len(), points.len());
        points
    }

    fn units<S: AsRef<str>>(&self, lines: &[S]) -> Vec<String> {
        match self.unit {
            GroupingUnit::Line => lines
                .iter()
                .map(|l| l.as_ref().trim())
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
            GroupingUnit::Sentence => lines
                .iter()
                .flat_map(|l| l.as_ref().unicode_sentences())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Normalize raw paragraphs and group them into points
pub fn segment<S: AsRef<str>>(paragraphs: &[S], grouper: &PointGrouper) -> Vec<Point> {
    let lines = normalize_paragraphs(paragraphs);
    grouper.group(&lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACTION_VERBS: &[&str] = &[
        "worked", "developed", "managed", "designed", "implemented", "led", "created", "built",
    ];

    fn strings(points: &[Point]) -> Vec<&str> {
        points.iter().map(Point::as_str).collect()
    }

    fn strict_case_grouper() -> PointGrouper {
        PointGrouper::new(vec![Box::new(CaseBoundary::strict())], GroupingUnit::Line)
    }

    #[test]
    fn test_single_line_is_one_point() {
        let grouper = PointGrouper::from_config(&SegmentationConfig::default()).unwrap();
        let points = grouper.group(&["only a lowercase line"]);
        assert_eq!(strings(&points), vec!["only a lowercase line"]);

        let points = grouper.group(&["1. Numbered"]);
        assert_eq!(strings(&points), vec!["1. Numbered"]);
    }

    #[test]
    fn test_empty_input_gives_no_points() {
        let grouper = PointGrouper::from_config(&SegmentationConfig::default()).unwrap();
        let lines: Vec<String> = Vec::new();
        assert!(grouper.group(&lines).is_empty());
    }

    #[test]
    fn test_strict_case_rule() {
        let grouper = strict_case_grouper();
        let points = grouper.group(&[
            "Built a CRM",
            "for the sales team",
            "Managed five people",
        ]);

        assert_eq!(
            strings(&points),
            vec!["Built a CRM for the sales team", "Managed five people"]
        );
    }

    #[test]
    fn test_case_rule_with_action_runs() {
        let grouper = PointGrouper::new(
            vec![Box::new(CaseBoundary::with_action_runs(ACTION_VERBS))],
            GroupingUnit::Line,
        );
        let points = grouper.group(&[
            "John Doe",
            "Developed a CRM system.",
            "Managed a team of 5.",
            "Education: B.S. Computer Science",
        ]);

        assert_eq!(
            strings(&points),
            vec![
                "John Doe",
                "Developed a CRM system. Managed a team of 5.",
                "Education: B.S. Computer Science",
            ]
        );
    }

    #[test]
    fn test_marker_rule_splits_lowercase_bullets() {
        let grouper = PointGrouper::new(
            vec![Box::new(MarkerBoundary::new().unwrap())],
            GroupingUnit::Line,
        );
        let points = grouper.group(&[
            "- wrote docs",
            "and examples",
            "2) shipped v2",
            "\u{2022} on-call rotation",
        ]);

        assert_eq!(
            strings(&points),
            vec!["- wrote docs and examples", "2) shipped v2", "\u{2022} on-call rotation"]
        );
    }

    #[test]
    fn test_keyword_rule_contains_vs_starts_with() {
        let contains = PointGrouper::new(
            vec![Box::new(
                KeywordBoundary::new(&["developed"], KeywordMatchMode::Contains).unwrap(),
            )],
            GroupingUnit::Line,
        );
        let points = contains.group(&["intro", "we developed things"]);
        assert_eq!(points.len(), 2);

        let starts_with = PointGrouper::new(
            vec![Box::new(
                KeywordBoundary::new(&["developed"], KeywordMatchMode::StartsWith).unwrap(),
            )],
            GroupingUnit::Line,
        );
        let points = starts_with.group(&["intro", "we developed things", "Developed more"]);
        assert_eq!(
            strings(&points),
            vec!["intro we developed things", "Developed more"]
        );
    }

    #[test]
    fn test_keyword_rule_needs_whole_words() {
        let grouper = PointGrouper::new(
            vec![Box::new(
                KeywordBoundary::new(&["led"], KeywordMatchMode::Contains).unwrap(),
            )],
            GroupingUnit::Line,
        );
        let points = grouper.group(&["intro", "called the client", "led the team"]);
        assert_eq!(
            strings(&points),
            vec!["intro called the client", "led the team"]
        );
    }

    #[test]
    fn test_rules_sorted_by_priority() {
        let grouper = PointGrouper::new(
            vec![
                Box::new(CaseBoundary::strict()),
                Box::new(MarkerBoundary::new().unwrap()),
                Box::new(KeywordBoundary::new(&["built"], KeywordMatchMode::Contains).unwrap()),
            ],
            GroupingUnit::Line,
        );
        assert_eq!(grouper.rule_names(), vec!["marker", "keyword", "case"]);
    }

    #[test]
    fn test_sentence_unit_splits_lines() {
        let grouper = PointGrouper::new(vec![Box::new(CaseBoundary::strict())], GroupingUnit::Sentence);
        let points = grouper.group(&["Shipped the app. Fixed bugs in it."]);
        assert_eq!(strings(&points), vec!["Shipped the app.", "Fixed bugs in it."]);
    }

    #[test]
    fn test_points_preserve_all_text() {
        let grouper = PointGrouper::from_config(&SegmentationConfig::default()).unwrap();
        let lines = vec![
            "Jane Roe",
            "- Led migration to Rust",
            "across three services",
            "Responsible for hiring",
            "and onboarding",
            "Skills: Rust, SQL",
        ];
        let points = grouper.group(&lines);

        let rejoined = strings(&points).join(" ");
        let original = lines.join(" ");
        let squash = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ");
        assert_eq!(squash(&rejoined), squash(&original));
        assert!(points.iter().all(|p| !p.as_str().is_empty()));
    }

    #[test]
    fn test_segment_normalizes_first() {
        let grouper = strict_case_grouper();
        let points = segment(&["  Alpha ", "", "beta", "   "], &grouper);
        assert_eq!(strings(&points), vec!["Alpha beta"]);
    }
}
