use xml_content_model::{CardinalityBound, ModelError, Quantified, Quantifier};

use crate::common::test_helpers::{book_schema, chapter, init_logging, title};

#[test]
fn test_repeated_container_lifecycle() {
    init_logging();
    let schema = book_schema();
    let mut chapters = Quantified::new("chapter", Quantifier::Repeated, "chapter");

    assert!(chapters.is_empty());
    assert!(chapters.validate().is_err());

    chapters.add(chapter(&schema, "One", "a")).unwrap();
    chapters.add(chapter(&schema, "Two", "b")).unwrap();
    assert_eq!(chapters.len(), 2);
    assert!(chapters.validate().is_ok());

    let removed = chapters.remove(0).unwrap();
    assert_eq!(removed.name(), "chapter");

    match chapters.remove(0) {
        Err(ModelError::Cardinality {
            quantifier,
            count,
            bound,
            ..
        }) => {
            assert_eq!(quantifier, Quantifier::Repeated);
            assert_eq!(count, 1);
            assert_eq!(bound, CardinalityBound::Minimum(1));
        }
        other => panic!("Expected Cardinality error, got {:?}", other),
    }
    assert_eq!(chapters.len(), 1);
}

#[test]
fn test_optional_container_bounds() {
    let schema = book_schema();
    let mut appendix = Quantified::new("appendix", Quantifier::Optional, "appendix");

    appendix.add(schema.create_text("appendix", "Glossary").unwrap()).unwrap();
    assert!(matches!(
        appendix.add(schema.create_text("appendix", "Index").unwrap()),
        Err(ModelError::Cardinality {
            bound: CardinalityBound::Maximum(1),
            ..
        })
    ));
    assert_eq!(appendix.first().and_then(|e| e.text()), Some("Glossary"));

    appendix.remove(0).unwrap();
    assert!(appendix.is_empty());
    assert!(appendix.validate().is_ok());
}

#[test]
fn test_any_container_accepts_zero_or_many() {
    let schema = book_schema();
    let mut rows = Quantified::new("row", Quantifier::Any, "row");
    assert!(rows.validate().is_ok());

    for i in 0..50 {
        rows.add(schema.create_text("row", format!("r{}", i)).unwrap()).unwrap();
    }
    assert_eq!(rows.len(), 50);
    assert_eq!(rows.get(49).and_then(|e| e.text()), Some("r49"));

    rows.clear().unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_type_mismatch_reports_tags() {
    let schema = book_schema();
    let mut chapters = Quantified::new("chapter", Quantifier::Any, "chapter");

    match chapters.add(title(&schema, "Not a chapter")) {
        Err(ModelError::TypeMismatch {
            slot,
            expected,
            found,
        }) => {
            assert_eq!(slot, "chapter");
            assert!(expected.contains("chapter"));
            assert!(found.contains("title"));
        }
        other => panic!("Expected TypeMismatch, got {:?}", other),
    }
    assert!(chapters.is_empty());
}

#[test]
fn test_replace_and_insert_positions() {
    let schema = book_schema();
    let mut chapters = Quantified::new("chapter", Quantifier::Repeated, "chapter");
    chapters.add(chapter(&schema, "One", "a")).unwrap();
    chapters.add(chapter(&schema, "Three", "c")).unwrap();
    chapters.insert(1, chapter(&schema, "Two", "b")).unwrap();

    let old = chapters.replace(0, chapter(&schema, "Prologue", "p")).unwrap();
    assert_eq!(
        old.quantified("title").unwrap().first().and_then(|t| t.text()),
        Some("One")
    );

    let headings: Vec<_> = chapters
        .iter()
        .filter_map(|c| c.quantified("title").ok()?.first()?.text())
        .collect();
    assert_eq!(headings, vec!["Prologue", "Two", "Three"]);

    assert!(matches!(
        chapters.replace(7, chapter(&schema, "X", "x")),
        Err(ModelError::IndexOutOfRange { index: 7, len: 3, .. })
    ));
}
