use pretty_assertions::assert_eq;
use xml_content_model::{Element, ModelError};

use crate::common::test_helpers::{ISBN, book_schema, chapter, complete_book, title};

#[test]
fn test_new_elements_do_not_share_slots() {
    let schema = book_schema();
    let mut first = schema.create("book").unwrap();
    let second = schema.create("book").unwrap();

    first.add("chapter", chapter(&schema, "One", "a")).unwrap();

    assert_eq!(first.quantified("chapter").unwrap().len(), 1);
    assert_eq!(second.quantified("chapter").unwrap().len(), 0);
}

#[test]
fn test_slots_follow_declaration_order() {
    let schema = book_schema();
    let book = schema.create("book").unwrap();
    let names: Vec<_> = book.slots().iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["title", "chapter", "appendix"]);
}

#[test]
fn test_validate_lists_every_problem_with_paths() {
    let schema = book_schema();
    let mut book = schema.create("book").unwrap();
    book.add("title", title(&schema, "Dune")).unwrap();
    book.add("chapter", chapter(&schema, "One", "a")).unwrap();
    book.add("chapter", schema.create("chapter").unwrap()).unwrap();

    let report = book.validate().unwrap_err();
    let paths: Vec<_> = report.iter().map(|v| v.path.as_str()).collect();
    assert_eq!(paths, vec!["/book", "/book/chapter[2]", "/book/chapter[2]"]);

    assert!(matches!(
        report.violations()[0].error,
        ModelError::MissingAttribute { .. }
    ));
    assert!(matches!(
        report.violations()[1].error,
        ModelError::Cardinality { .. }
    ));
    assert!(matches!(
        report.violations()[2].error,
        ModelError::EmptyAlternation { .. }
    ));
}

#[test]
fn test_validate_does_not_change_tree() {
    let schema = book_schema();
    let book = complete_book(&schema, 3);

    let before = book.to_xml().unwrap();
    assert!(book.validate().is_ok());
    assert!(book.validate().is_ok());
    assert_eq!(book.to_xml().unwrap(), before);
}

#[test]
fn test_invalid_characters_are_reported() {
    let schema = book_schema();
    let mut book = complete_book(&schema, 1);
    book.set_attribute("isbn", "bad\u{0}").unwrap();

    let report = book.validate().unwrap_err();
    assert_eq!(report.len(), 1);
    assert!(matches!(
        report.violations()[0].error,
        ModelError::InvalidCharacter {
            character: '\u{0}',
            ..
        }
    ));
}

#[test]
fn test_attribute_defaults_and_overrides() {
    let schema = book_schema();
    let mut book = schema.create("book").unwrap();
    book.set_attribute("isbn", ISBN).unwrap();

    assert_eq!(book.attribute("lang"), Some("en"));
    assert_eq!(book.set_attribute("lang", "fr").unwrap(), None);
    assert_eq!(book.set_attribute("lang", "de").unwrap(), Some("fr".to_string()));
    assert_eq!(book.attribute("lang"), Some("de"));
}

#[test]
fn test_declare_one_off_element() {
    let br = Element::declare("br", xml_content_model::ContentModel::Empty).unwrap();
    assert_eq!(br.name(), "br");
    assert!(br.is_valid());
}
