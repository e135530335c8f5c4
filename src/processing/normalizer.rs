//! Paragraph normalization

use log::debug;

/// Trim every raw paragraph and drop the ones left empty.
///
/// Relative order is preserved and no text is added or rewritten; interior
/// whitespace of a paragraph is left untouched.
pub fn normalize_paragraphs<S: AsRef<str>>(paragraphs: &[S]) -> Vec<String> {
    let lines: Vec<String> = paragraphs
        .iter()
        .map(|p| p.as_ref().trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    debug!(
        "Normalized {} raw paragraphs into {} lines",
        paragraphs.len(),
        lines.len()
    );

    lines
}

/// Join normalized lines into the single full text used by section and
/// keyword extraction.
pub fn full_text(lines: &[String]) -> String {
    lines.join("\n")
}
