//! Output formatting and report generation

pub mod formatter;
pub mod report;

pub use formatter::{OutputFormatter, PdfFormatter, ReportGenerator};
pub use report::AnalysisReport;
