//! Text segmentation, section extraction and role matching

pub mod normalizer;
pub mod grouper;
pub mod sections;
pub mod keywords;
pub mod roles;
pub mod analyzer;
