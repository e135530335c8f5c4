//! Input manager: reads a document into its raw paragraphs

use crate::error::{Result, SegmenterError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    DocxExtractor, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use log::info;
use std::collections::HashMap;
use std::path::Path;

pub struct InputManager {
    cache: HashMap<String, Vec<String>>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Raw paragraphs of a document, in document order.
    ///
    /// Paragraphs are the lines of the extracted text; blank ones are kept
    /// here and dropped by normalization.
    pub async fn read_paragraphs(&mut self, path: &Path) -> Result<Vec<String>> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached) = self.cache.get(&path_str) {
                info!("Using cached paragraphs for: {}", path.display());
                return Ok(cached.clone());
            }
        }

        let text = self.extract_text(path).await?;
        let paragraphs: Vec<String> = text.lines().map(str::to_string).collect();
        info!("Read {} paragraphs from {}", paragraphs.len(), path.display());

        if self.enable_cache {
            self.cache.insert(path_str, paragraphs.clone());
        }

        Ok(paragraphs)
    }

    pub async fn extract_text(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(SegmenterError::InvalidInput(
                format!("File does not exist: {}", path.display())
            ));
        }

        match self.detect_file_type(path)? {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await
            }
            FileType::Docx => {
                info!("Extracting paragraphs from DOCX: {}", path.display());
                DocxExtractor.extract(path).await
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await
            }
            FileType::Unknown => Err(SegmenterError::UnsupportedFormat(
                format!("Unsupported file type for: {}", path.display())
            )),
        }
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| SegmenterError::InvalidInput(
                format!("File has no extension: {}", path.display())
            ))?;

        Ok(FileType::from_extension(extension))
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
