//! Role classification collaborators
//!
//! The classifier turns resume text into a raw role label. The label is
//! reconciled with the role catalog afterwards; a classifier never sees the
//! catalog.

pub mod linear;

use crate::error::Result;
use crate::processing::keywords::StopwordList;
use std::collections::HashSet;

pub use linear::LinearClassifier;

pub trait Classifier: Send + Sync {
    /// Predict a role label for already-normalized resume text
    fn classify(&self, text: &str) -> Result<String>;

    fn name(&self) -> &str;
}

/// Returns a label supplied up front, e.g. from the command line
pub struct FixedLabelClassifier {
    label: String,
}

impl FixedLabelClassifier {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Classifier for FixedLabelClassifier {
    fn classify(&self, _text: &str) -> Result<String> {
        Ok(self.label.clone())
    }

    fn name(&self) -> &str {
        "fixed-label"
    }
}

/// Cleaning applied to text before vectorization: lowercase, ASCII letters
/// and whitespace only, standard stopwords removed.
pub fn clean_for_classification(text: &str) -> String {
    let stopwords: HashSet<&str> = StopwordList::Standard.words().iter().copied().collect();

    let letters: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect();

    letters
        .split_whitespace()
        .filter(|w| !stopwords.contains(w))
        .collect::<Vec<_>>()
        .join(" ")
}
