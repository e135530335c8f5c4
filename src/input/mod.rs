//! Document reading
//! Handles file detection, text extraction and paragraph splitting

pub mod file_detector;
pub mod text_extractor;
pub mod manager;

pub use manager::InputManager;
