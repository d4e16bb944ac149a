use pretty_assertions::assert_eq;
use tempfile::TempDir;
use xml_content_model::{
    CardinalityBound, Choice, ConfigManager, ErrorReporter, ModelError, OutputConfig,
    VerbosityLevel, serialize_with, write_to,
};

use crate::common::test_helpers::{
    ISBN, book_schema, chapter, complete_book, init_logging, read_events, table, title,
    write_config,
};

#[test]
fn test_repeated_chapter_survives_failed_removal() {
    init_logging();
    let schema = book_schema();
    let mut book = schema.create("book").unwrap();
    book.set_attribute("isbn", ISBN).unwrap();
    book.add("title", title(&schema, "Dune")).unwrap();

    assert!(book.quantified("chapter").unwrap().is_empty());
    book.add("chapter", chapter(&schema, "One", "It begins.")).unwrap();

    let result = book.quantified_mut("chapter").unwrap().remove(0);
    assert!(matches!(
        result,
        Err(ModelError::Cardinality {
            bound: CardinalityBound::Minimum(1),
            ..
        })
    ));

    let xml = book.to_xml().unwrap();
    assert_eq!(xml.matches("<chapter>").count(), 1);
    assert_eq!(xml.matches("</chapter>").count(), 1);
    assert_eq!(
        xml,
        format!(
            "<book isbn=\"{}\" lang=\"en\"><title>Dune</title>\
             <chapter><title>One</title>It begins.</chapter></book>",
            ISBN
        )
    );
}

#[test]
fn test_alternation_replacement_emits_only_latest_value() {
    init_logging();
    let schema = book_schema();
    let mut chapter = schema.create("chapter").unwrap();
    chapter.add("title", title(&schema, "Results")).unwrap();

    let previous = chapter
        .set_choice("body", table(&schema, &["1", "2"]))
        .unwrap();
    assert!(previous.is_none());

    let previous = chapter.set_choice("body", "Nothing to report.").unwrap();
    assert_eq!(
        previous.as_ref().and_then(Choice::as_element).map(|e| e.name()),
        Some("table")
    );

    let xml = chapter.to_xml().unwrap();
    assert_eq!(xml, "<chapter><title>Results</title>Nothing to report.</chapter>");
    assert!(!xml.contains("<table>"));
    assert!(!xml.contains("<row>"));
}

#[test]
fn test_special_characters_are_escaped() {
    let schema = book_schema();
    let heading = title(&schema, r#"Fish < Chips & "Peas""#);

    assert_eq!(
        heading.to_xml().unwrap(),
        "<title>Fish &lt; Chips &amp; &quot;Peas&quot;</title>"
    );
}

#[test]
fn test_output_reads_back_with_quick_xml() {
    let schema = book_schema();
    let mut book = complete_book(&schema, 1);

    let mut results = schema.create("chapter").unwrap();
    results.add("title", title(&schema, "R&D")).unwrap();
    results.set_choice("body", table(&schema, &["<1>", "'2'"])).unwrap();
    book.add("chapter", results).unwrap();
    book.add(
        "appendix",
        schema.create_text("appendix", "Notes & \"quotes\"").unwrap(),
    )
    .unwrap();

    let config = OutputConfig {
        xml_declaration: true,
        indent: 4,
        self_close_empty: true,
    };
    let xml = serialize_with(&book, &config).unwrap();

    assert_eq!(
        read_events(&xml),
        vec![
            "<book>",
            "<title>",
            "Dune",
            "<chapter>",
            "<title>",
            "Chapter 1",
            "Text of chapter 1.",
            "<chapter>",
            "<title>",
            "R&D",
            "<table>",
            "<row>",
            "<1>",
            "<row>",
            "'2'",
            "<appendix>",
            "Notes & \"quotes\"",
        ]
    );
}

#[test]
fn test_schema_validation_of_whole_document() {
    let schema = book_schema();
    let mut book = complete_book(&schema, 3);
    assert!(schema.validate(&book).is_ok());

    let mut figure = schema.create("figure").unwrap();
    book.quantified_mut("chapter")
        .unwrap()
        .get_mut(2)
        .unwrap()
        .set_choice("body", figure.clone())
        .unwrap();

    let report = schema.validate(&book).unwrap_err();
    assert_eq!(report.len(), 1);
    assert_eq!(report.violations()[0].path, "/book/chapter[3]/figure");
    assert!(matches!(
        report.violations()[0].error,
        ModelError::MissingAttribute { .. }
    ));

    figure.set_attribute("src", "sandworm.png").unwrap();
    book.quantified_mut("chapter")
        .unwrap()
        .get_mut(2)
        .unwrap()
        .set_choice("body", figure)
        .unwrap();
    assert!(schema.validate(&book).is_ok());
}

#[test]
fn test_configured_rendering_and_reporting() {
    init_logging();
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        temp_dir.path(),
        "xml-content-model.toml",
        "[output]\nindent = 1\n\n[report]\nverbosity = \"verbose\"\nmax_violations = 1\n",
    );
    let config = ConfigManager::load_config(Some(path.as_path())).unwrap();
    assert_eq!(config.report.verbosity, VerbosityLevel::Verbose);

    let schema = book_schema();
    let book = complete_book(&schema, 1);
    let mut buffer = Vec::new();
    write_to(&book, &config.output, &mut buffer).unwrap();
    let xml = String::from_utf8(buffer).unwrap();
    assert!(xml.starts_with(&format!("<book isbn=\"{}\" lang=\"en\">\n <title>", ISBN)));

    let broken = schema.create("book").unwrap();
    let report = broken.validate().unwrap_err();
    let formatted = ErrorReporter::from_config(&config.report).format_report(&report);
    assert!(formatted.starts_with("3 violation(s)\n/book: "));
    assert!(formatted.contains("Suggestion: Set the required attribute `isbn`"));
    assert!(formatted.ends_with("... and 2 more"));
}

#[test]
fn test_repeated_serialization_is_stable() {
    let schema = book_schema();
    let book = complete_book(&schema, 5);
    let config = OutputConfig {
        indent: 2,
        ..OutputConfig::default()
    };

    let first = serialize_with(&book, &config).unwrap();
    let second = serialize_with(&book, &config).unwrap();
    assert_eq!(first, second);
    assert_eq!(book.quantified("chapter").unwrap().len(), 5);
}
