//! Error handling for the resume segmenter

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SegmenterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("DOCX extraction error: {0}")]
    DocxExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Classifier artifact missing: {0}")]
    MissingClassifierArtifact(String),

    #[error("Classification error: {0}")]
    Classification(String),

    #[error("Pattern compilation error: {0}")]
    Pattern(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, SegmenterError>;

impl From<regex::Error> for SegmenterError {
    fn from(err: regex::Error) -> Self {
        SegmenterError::Pattern(err.to_string())
    }
}

impl From<aho_corasick::BuildError> for SegmenterError {
    fn from(err: aho_corasick::BuildError) -> Self {
        SegmenterError::Pattern(err.to_string())
    }
}
