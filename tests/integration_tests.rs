//! Integration tests for the resume segmenter

use resume_segmenter::classifier::{FixedLabelClassifier, LinearClassifier};
use resume_segmenter::config::Config;
use resume_segmenter::input::InputManager;
use resume_segmenter::output::{AnalysisReport, ReportGenerator};
use resume_segmenter::processing::grouper::BoundaryRuleKind;
use resume_segmenter::{ResumeAnalyzer, RoleOutcome, Section, SegmenterError};
use std::path::Path;

#[tokio::test]
async fn test_paragraphs_from_txt() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let paragraphs = manager.read_paragraphs(path).await.unwrap();

    assert_eq!(paragraphs.first().map(String::as_str), Some("John Doe"));
    assert!(paragraphs.iter().any(|p| p.trim().is_empty()));
    assert!(paragraphs.iter().any(|p| p.contains("Workday HCM")));
}

#[tokio::test]
async fn test_paragraphs_from_markdown() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.md");

    let paragraphs = manager.read_paragraphs(path).await.unwrap();

    assert_eq!(
        paragraphs,
        vec![
            "John Doe",
            "Workday Consultant",
            "Experience",
            "Developed payroll integrations for enterprise clients.",
            "Skills",
            "Workday HCM",
            "integrations",
        ]
    );
}

#[tokio::test]
async fn test_paragraphs_from_docx() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.docx");

    let paragraphs = manager.read_paragraphs(path).await.unwrap();

    assert_eq!(
        paragraphs,
        vec![
            "John Doe",
            "Workday Consultant",
            "",
            "Experience",
            "Developed payroll integrations for enterprise clients.",
            "Managed a team of 5 consultants",
            "",
            "Skills",
            "Workday HCM, EIB, Studio",
        ]
    );

    let analyzer = ResumeAnalyzer::new(&Config::default()).unwrap();
    let points = analyzer.segment(&paragraphs);
    assert_eq!(points.len(), 6);
    assert_eq!(
        points[3].as_str(),
        "Developed payroll integrations for enterprise clients. Managed a team of 5 consultants"
    );
}

#[tokio::test]
async fn test_corrupt_docx_is_an_extraction_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.docx");
    std::fs::write(&path, "not a zip archive").unwrap();

    let mut manager = InputManager::new();
    let result = manager.read_paragraphs(&path).await;
    assert!(matches!(result, Err(SegmenterError::DocxExtraction(_))));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let first = manager.read_paragraphs(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let second = manager.read_paragraphs(path).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new();
    let result = manager.read_paragraphs(Path::new("tests/fixtures/unsupported.xyz")).await;

    assert!(matches!(result, Err(SegmenterError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let result = manager.read_paragraphs(Path::new("tests/fixtures/nonexistent.txt")).await;

    assert!(matches!(result, Err(SegmenterError::InvalidInput(_))));
}

#[tokio::test]
async fn test_end_to_end_analysis() {
    let mut manager = InputManager::new().with_cache(false);
    let paragraphs = manager
        .read_paragraphs(Path::new("tests/fixtures/sample_resume.txt"))
        .await
        .unwrap();

    let analyzer = ResumeAnalyzer::new(&Config::default()).unwrap();
    let analysis = analyzer
        .analyze(&paragraphs, &FixedLabelClassifier::new("workday consultants"))
        .unwrap();

    assert_eq!(analysis.line_count, 15);
    assert_eq!(analysis.points.len(), 12);
    assert_eq!(
        analysis.points[3].as_str(),
        "Developed payroll integrations for enterprise clients. Managed a team of 5 consultants across three regions. Designed EIB templates for data migration."
    );
    assert_eq!(analysis.points[7].as_str(), "1. run tenant refresh checklists");

    assert_eq!(
        analysis.sections.get("skills"),
        &Section::Found("workday hcm, eib, studio, integrations, reporting".to_string())
    );
    let responsibilities = analysis.sections.get("responsibilities").body().unwrap();
    assert!(responsibilities.starts_with("- gather business process requirements"));
    assert!(responsibilities.ends_with("1. run tenant refresh checklists"));

    assert_eq!(analysis.keywords.len(), 10);
    assert_eq!(analysis.keywords[0], "integrations");

    match &analysis.role {
        RoleOutcome::Matched { profile, raw_label } => {
            assert_eq!(profile.name, "Workday Consultant");
            assert_eq!(raw_label, "workday consultants");
        }
        other => panic!("expected a catalog match, got {:?}", other),
    }
}

#[tokio::test]
async fn test_points_keep_every_word() {
    let mut manager = InputManager::new();
    let paragraphs = manager
        .read_paragraphs(Path::new("tests/fixtures/sample_resume.txt"))
        .await
        .unwrap();

    let analyzer = ResumeAnalyzer::new(&Config::default()).unwrap();
    let points = analyzer.segment(&paragraphs);

    let squash = |s: String| s.split_whitespace().collect::<Vec<_>>().join(" ");
    let from_points = squash(points.iter().map(|p| p.as_str()).collect::<Vec<_>>().join(" "));
    let from_input = squash(paragraphs.join(" "));
    assert_eq!(from_points, from_input);
}

#[test]
fn test_keyword_rule_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = Config::default();
    config.segmentation.rules = vec![
        BoundaryRuleKind::Case,
        BoundaryRuleKind::Keyword,
        BoundaryRuleKind::Marker,
    ];
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    let analyzer = ResumeAnalyzer::new(&loaded).unwrap();

    // The keyword rule splits action runs the case rule alone would keep together
    let points = analyzer.segment(&["Developed a CRM system.", "Managed a team of 5."]);
    assert_eq!(points.len(), 2);

    let default_points = ResumeAnalyzer::new(&Config::default())
        .unwrap()
        .segment(&["Developed a CRM system.", "Managed a team of 5."]);
    assert_eq!(default_points.len(), 1);
}

#[test]
fn test_missing_classifier_artifact_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.classifier.models_dir = dir.path().to_path_buf();

    let result = LinearClassifier::load(&config.artifact_path());
    assert!(matches!(
        result,
        Err(SegmenterError::MissingClassifierArtifact(_))
    ));
}

#[test]
fn test_report_renders_in_every_format() {
    let analyzer = ResumeAnalyzer::new(&Config::default()).unwrap();
    let analysis = analyzer
        .analyze(
            &["Jane Roe", "Skills: rust, sql"],
            &FixedLabelClassifier::new("Rust Wizard"),
        )
        .unwrap();
    let report = AnalysisReport::new(analysis, "jane.txt");
    let generator = ReportGenerator::with_options(false, true);

    for format in [
        resume_segmenter::config::OutputFormat::Console,
        resume_segmenter::config::OutputFormat::Json,
        resume_segmenter::config::OutputFormat::Markdown,
        resume_segmenter::config::OutputFormat::Html,
    ] {
        let rendered = generator.generate_report(&report, &format).unwrap();
        assert!(rendered.contains("Rust Wizard"), "{:?} output lacks the label", format);
    }

    let pdf = generator
        .render(&report, &resume_segmenter::config::OutputFormat::Pdf)
        .unwrap();
    assert!(pdf.starts_with(b"%PDF"));
}
