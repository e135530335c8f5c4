//! Output formatters for analysis reports

use crate::config::OutputFormat;
use crate::error::{Result, SegmenterError};
use crate::output::report::AnalysisReport;
use crate::processing::analyzer::RoleOutcome;
use crate::processing::sections::Section;
use askama::Template;
use colored::{Color, Colorize};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::path::Path;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const PAGE_MARGIN_MM: f32 = 20.0;
const PT_TO_MM: f32 = 0.3528;

/// Trait for formatting analysis reports
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

pub struct HtmlFormatter {
    include_styles: bool,
}

/// Printable "Formatted Resume": a centred title and the numbered points
pub struct PdfFormatter {
    font_size: f32,
}

/// Report generator that coordinates the formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
    pdf_formatter: PdfFormatter,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Formatted Resume</title>
    {% if include_styles %}
    <style>
        body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; max-width: 860px; margin: 0 auto; padding: 20px; color: #333; }
        h1 { text-align: center; border-bottom: 3px solid #007acc; padding-bottom: 12px; }
        h2 { color: #007acc; border-bottom: 1px solid #e9ecef; }
        .missing { color: #999; font-style: italic; }
        .keywords { color: #555; font-size: 0.9em; }
    </style>
    {% endif %}
</head>
<body>
    <h1>Formatted Resume</h1>
    <p><strong>Role:</strong> {{ role_headline }}</p>
    {% if has_role_description %}<p>{{ role_description }}</p>{% endif %}
    <h2>Points</h2>
    <ol>
    {% for point in points %}
        <li>{{ point }}</li>
    {% endfor %}
    </ol>
    <h2>Sections</h2>
    {% for section in sections %}
    <h3>{{ section.name }}</h3>
    {% if section.found %}
    <p>{{ section.body }}</p>
    <p class="keywords">{{ section.keywords }}</p>
    {% else %}
    <p class="missing">Not found</p>
    {% endif %}
    {% endfor %}
    <h2>Keywords</h2>
    <p>{{ keywords }}</p>
    <footer><small>Generated {{ generated_at }} by resume-segmenter v{{ version }} ({{ classifier }})</small></footer>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    role_headline: String,
    role_description: String,
    has_role_description: bool,
    points: Vec<String>,
    sections: Vec<HtmlSection>,
    keywords: String,
    generated_at: String,
    version: String,
    classifier: String,
}

struct HtmlSection {
    name: String,
    found: bool,
    body: String,
    keywords: String,
}

fn format_timestamp(report: &AnalysisReport) -> String {
    chrono::DateTime::<chrono::Utc>::from(report.metadata.generated_at)
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string()
}

fn section_keywords<'a>(report: &'a AnalysisReport, name: &str) -> &'a [String] {
    report
        .analysis
        .section_keywords
        .iter()
        .find(|s| s.section == name)
        .map(|s| s.keywords.as_slice())
        .unwrap_or(&[])
}

fn role_description(report: &AnalysisReport) -> Option<&str> {
    match &report.analysis.role {
        RoleOutcome::Matched { profile, .. } => Some(profile.description.as_str()),
        RoleOutcome::Unmatched { .. } => None,
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();
        let analysis = &report.analysis;

        output.push_str(&self.format_header("FORMATTED RESUME", 1));
        output.push_str(&format!(
            "Source: {} | Generated: {} | Processing time: {}ms\n",
            report.metadata.source_file,
            format_timestamp(report),
            report.metadata.processing_time_ms
        ));

        output.push_str(&self.format_header("Predicted Role", 2));
        output.push_str(&format!(
            "{}\n",
            self.colorize(&report.summary.role_headline, Color::Cyan)
        ));
        if let Some(description) = role_description(report) {
            output.push_str(&format!("{}\n", description));
        }
        if self.detailed {
            output.push_str(&format!(
                "Raw label: {} (classifier: {})\n",
                analysis.role.raw_label(),
                report.metadata.classifier
            ));
        }

        output.push_str(&self.format_header(&format!("Points ({})", analysis.points.len()), 2));
        for (idx, point) in analysis.points.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", idx + 1, point));
        }

        output.push_str(&self.format_header("Sections", 2));
        for entry in &analysis.sections.entries {
            match &entry.section {
                Section::Found(body) => {
                    output.push_str(&format!("{}:\n", self.colorize(&entry.name, Color::Green)));
                    output.push_str(&format!("  {}\n", body));
                    let keywords = section_keywords(report, &entry.name);
                    if self.detailed && !keywords.is_empty() {
                        output.push_str(&format!("  Keywords: {}\n", keywords.join(", ")));
                    }
                }
                Section::NotFound => {
                    output.push_str(&format!(
                        "{}: {}\n",
                        entry.name,
                        self.colorize("not found", Color::BrightBlack)
                    ));
                }
            }
        }

        output.push_str(&self.format_header("Top Keywords", 3));
        for (idx, keyword) in analysis.keywords.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", idx + 1, keyword));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();
        let analysis = &report.analysis;

        output.push_str("# Formatted Resume\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Source:** {} | **Generated:** {} | **Classifier:** {}\n\n",
                report.metadata.source_file,
                format_timestamp(report),
                report.metadata.classifier
            ));
        }

        output.push_str(&format!("**Role:** {}\n\n", report.summary.role_headline));
        if let Some(description) = role_description(report) {
            output.push_str(&format!("> {}\n\n", description));
        }

        output.push_str("## Points\n\n");
        for (idx, point) in analysis.points.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", idx + 1, point));
        }
        output.push('\n');

        output.push_str("## Sections\n\n");
        for entry in &analysis.sections.entries {
            output.push_str(&format!("### {}\n\n", entry.name));
            match &entry.section {
                Section::Found(body) => {
                    output.push_str(&format!("{}\n\n", body));
                    let keywords = section_keywords(report, &entry.name);
                    if !keywords.is_empty() {
                        output.push_str(&format!("*Keywords:* {}\n\n", keywords.join(", ")));
                    }
                }
                Section::NotFound => output.push_str("_Not found_\n\n"),
            }
        }

        output.push_str("## Keywords\n\n");
        for keyword in &analysis.keywords {
            output.push_str(&format!("- {}\n", keyword));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn create_template_data(&self, report: &AnalysisReport) -> HtmlTemplate {
        let analysis = &report.analysis;

        let sections = analysis
            .sections
            .entries
            .iter()
            .map(|entry| HtmlSection {
                name: entry.name.clone(),
                found: entry.section.is_found(),
                body: entry.section.body().unwrap_or_default().to_string(),
                keywords: section_keywords(report, &entry.name).join(", "),
            })
            .collect();

        let description = role_description(report);

        HtmlTemplate {
            include_styles: self.include_styles,
            role_headline: report.summary.role_headline.clone(),
            role_description: description.unwrap_or_default().to_string(),
            has_role_description: description.is_some(),
            points: analysis.points.iter().map(|p| p.to_string()).collect(),
            sections,
            keywords: analysis.keywords.join(", "),
            generated_at: format_timestamp(report),
            version: report.metadata.tool_version.clone(),
            classifier: report.metadata.classifier.clone(),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| SegmenterError::OutputFormatting(e.to_string()))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl PdfFormatter {
    pub fn new(font_size: f32) -> Self {
        Self { font_size }
    }

    pub fn render(&self, report: &AnalysisReport) -> Result<Vec<u8>> {
        let pdf_error =
            |e: printpdf::Error| SegmenterError::OutputFormatting(format!("PDF generation failed: {}", e));

        let (doc, page, layer) = PdfDocument::new(
            "Formatted Resume",
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Points",
        );
        let body_font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
        let title_font = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?;

        let line_height = self.font_size * PT_TO_MM * 1.5;
        let mut current_layer = doc.get_page(page).get_layer(layer);
        let mut y = PAGE_HEIGHT_MM - PAGE_MARGIN_MM;

        let title = "Formatted Resume";
        let title_size = self.font_size + 4.0;
        let title_x = (PAGE_WIDTH_MM - approx_text_width_mm(title, title_size)) / 2.0;
        current_layer.use_text(title, title_size, Mm(title_x), Mm(y), &title_font);
        y -= line_height * 3.0;

        let usable_width = PAGE_WIDTH_MM - 2.0 * PAGE_MARGIN_MM;
        let max_chars = (usable_width / approx_text_width_mm("n", self.font_size)) as usize;

        for (idx, point) in report.analysis.points.iter().enumerate() {
            for line in wrap_words(&format!("{}. {}", idx + 1, point), max_chars) {
                if y < PAGE_MARGIN_MM {
                    let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Points");
                    current_layer = doc.get_page(page).get_layer(layer);
                    y = PAGE_HEIGHT_MM - PAGE_MARGIN_MM;
                }
                current_layer.use_text(line, self.font_size, Mm(PAGE_MARGIN_MM), Mm(y), &body_font);
                y -= line_height;
            }
            y -= line_height * 0.25;
        }

        doc.save_to_bytes().map_err(pdf_error)
    }
}

/// Average Helvetica glyph is about half an em wide
fn approx_text_width_mm(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * 0.5 * PT_TO_MM
}

fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    pub fn with_options(use_colors: bool, detailed: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(detailed),
            html_formatter: HtmlFormatter::new(true),
            pdf_formatter: PdfFormatter::new(12.0),
        }
    }

    /// Text rendering of a report; PDF is binary and only available from `render`
    pub fn generate_report(&self, report: &AnalysisReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
            OutputFormat::Pdf => Err(SegmenterError::OutputFormatting(
                "PDF reports are binary and must be saved to a file".to_string(),
            )),
        }
    }

    /// Report bytes in any format
    pub fn render(&self, report: &AnalysisReport, format: &OutputFormat) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Pdf => self.pdf_formatter.render(report),
            _ => self.generate_report(report, format).map(String::into_bytes),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: impl AsRef<[u8]>, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Html => "html",
        OutputFormat::Pdf => "pdf",
    };

    format!("{}_segmented{}.{}", base_name, timestamp_suffix, extension)
}
