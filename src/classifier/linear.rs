//! TF-IDF + linear model classifier loaded from an exported JSON artifact

use crate::classifier::{clean_for_classification, Classifier};
use crate::error::{Result, SegmenterError};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Model, vectorizer and label encoder exported by the offline training job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub classes: Vec<String>,
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
    /// One row per class, or a single row for a binary model
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl ModelArtifact {
    fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(SegmenterError::Classification(msg));

        if self.classes.len() < 2 {
            return invalid(format!(
                "artifact needs at least two classes, found {}",
                self.classes.len()
            ));
        }
        if self.vocabulary.values().any(|&col| col >= self.idf.len()) {
            return invalid("vocabulary index outside idf vector".to_string());
        }

        let binary = self.classes.len() == 2 && self.coefficients.len() == 1;
        if !binary && self.coefficients.len() != self.classes.len() {
            return invalid(format!(
                "{} coefficient rows for {} classes",
                self.coefficients.len(),
                self.classes.len()
            ));
        }
        if self.intercepts.len() != self.coefficients.len() {
            return invalid(format!(
                "{} intercepts for {} coefficient rows",
                self.intercepts.len(),
                self.coefficients.len()
            ));
        }
        if let Some(row) = self.coefficients.iter().find(|r| r.len() != self.idf.len()) {
            return invalid(format!(
                "coefficient row of width {} does not match {} features",
                row.len(),
                self.idf.len()
            ));
        }

        Ok(())
    }
}

pub struct LinearClassifier {
    artifact: ModelArtifact,
    name: String,
}

impl LinearClassifier {
    pub fn new(artifact: ModelArtifact) -> Result<Self> {
        artifact.validate()?;
        Ok(Self {
            artifact,
            name: "linear".to_string(),
        })
    }

    /// Load an artifact; a missing file is reported as a missing artifact.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SegmenterError::MissingClassifierArtifact(
                path.display().to_string(),
            ));
        }

        info!("Loading classifier artifact: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let artifact: ModelArtifact = serde_json::from_str(&content)?;

        let mut classifier = Self::new(artifact)?;
        if let Some(stem) = path.file_stem() {
            classifier.name = stem.to_string_lossy().to_string();
        }
        Ok(classifier)
    }

    pub fn classes(&self) -> &[String] {
        &self.artifact.classes
    }

    /// L2-normalised tf-idf vector as sparse (column, weight) pairs
    fn vectorize(&self, text: &str) -> Vec<(usize, f64)> {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in clean_for_classification(text).split_whitespace() {
            if let Some(&col) = self.artifact.vocabulary.get(token) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }

        let mut features: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(col, tf)| (col, tf * self.artifact.idf[col]))
            .collect();

        let norm = features.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in features.iter_mut() {
                *w /= norm;
            }
        }
        features.sort_by_key(|(col, _)| *col);
        features
    }

    fn decision(&self, features: &[(usize, f64)], row: usize) -> f64 {
        let weights = &self.artifact.coefficients[row];
        features.iter().map(|(col, w)| weights[*col] * w).sum::<f64>()
            + self.artifact.intercepts[row]
    }
}

impl Classifier for LinearClassifier {
    fn classify(&self, text: &str) -> Result<String> {
        let features = self.vectorize(text);
        debug!("Vectorized resume into {} active features", features.len());

        let binary = self.artifact.classes.len() == 2 && self.artifact.coefficients.len() == 1;
        let class_index = if binary {
            usize::from(self.decision(&features, 0) > 0.0)
        } else {
            (0..self.artifact.coefficients.len())
                .map(|row| (row, self.decision(&features, row)))
                .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
                .map(|(row, _)| row)
                .unwrap_or(0)
        };

        self.artifact
            .classes
            .get(class_index)
            .cloned()
            .ok_or_else(|| SegmenterError::Classification(format!("no class at index {}", class_index)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> ModelArtifact {
        let vocabulary = [("java", 0), ("spring", 1), ("workday", 2), ("hcm", 3)]
            .into_iter()
            .map(|(t, i)| (t.to_string(), i))
            .collect();

        ModelArtifact {
            classes: vec!["Java Developer".to_string(), "Workday Consultant".to_string(), "SQL Developer".to_string()],
            vocabulary,
            idf: vec![1.0, 1.5, 1.2, 2.0],
            coefficients: vec![
                vec![2.0, 1.5, -1.0, -1.0],
                vec![-1.0, -1.0, 2.5, 2.0],
                vec![0.0, 0.0, 0.0, 0.0],
            ],
            intercepts: vec![0.0, 0.0, 0.1],
        }
    }

    #[test]
    fn test_multiclass_prediction() {
        let classifier = LinearClassifier::new(artifact()).unwrap();

        assert_eq!(
            classifier.classify("Senior Java engineer, Spring Boot").unwrap(),
            "Java Developer"
        );
        assert_eq!(
            classifier.classify("Workday HCM integrations").unwrap(),
            "Workday Consultant"
        );
        // No known terms: only intercepts decide
        assert_eq!(classifier.classify("gardening").unwrap(), "SQL Developer");
    }

    #[test]
    fn test_binary_prediction() {
        let mut binary = artifact();
        binary.classes.truncate(2);
        binary.coefficients = vec![vec![-1.0, -1.0, 1.0, 1.0]];
        binary.intercepts = vec![0.0];
        let classifier = LinearClassifier::new(binary).unwrap();

        assert_eq!(classifier.classify("workday").unwrap(), "Workday Consultant");
        assert_eq!(classifier.classify("java").unwrap(), "Java Developer");
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let mut bad = artifact();
        bad.coefficients[1].pop();
        assert!(matches!(
            LinearClassifier::new(bad),
            Err(SegmenterError::Classification(_))
        ));
    }

    #[test]
    fn test_single_class_rejected() {
        let single = ModelArtifact {
            classes: vec!["Java Developer".to_string()],
            vocabulary: [("java".to_string(), 0)].into_iter().collect(),
            idf: vec![1.0],
            coefficients: vec![vec![1.0]],
            intercepts: vec![0.0],
        };
        assert!(matches!(
            LinearClassifier::new(single),
            Err(SegmenterError::Classification(_))
        ));

        let mut empty = artifact();
        empty.classes.clear();
        assert!(LinearClassifier::new(empty).is_err());
    }

    #[test]
    fn test_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let result = LinearClassifier::load(&dir.path().join("absent.json"));
        assert!(matches!(
            result,
            Err(SegmenterError::MissingClassifierArtifact(_))
        ));
    }

    #[test]
    fn test_load_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roles.json");
        std::fs::write(&path, serde_json::to_string(&artifact()).unwrap()).unwrap();

        let classifier = LinearClassifier::load(&path).unwrap();
        assert_eq!(classifier.name(), "roles");
        assert_eq!(classifier.classes().len(), 3);
    }
}
