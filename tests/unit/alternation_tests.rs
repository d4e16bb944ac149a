use xml_content_model::{Choice, ModelError};

use crate::common::test_helpers::{book_schema, table, title};

#[test]
fn test_body_accepts_each_permitted_option() {
    let schema = book_schema();
    let mut chapter = schema.create("chapter").unwrap();

    chapter.set_choice("body", "Words.").unwrap();
    let mut figure = schema.create("figure").unwrap();
    figure.set_attribute("src", "map.png").unwrap();
    chapter.set_choice("body", figure).unwrap();
    chapter.set_choice("body", table(&schema, &["a"])).unwrap();

    let body = chapter.alternation("body").unwrap();
    assert_eq!(
        body.value().and_then(Choice::as_element).map(|e| e.name()),
        Some("table")
    );
}

#[test]
fn test_body_rejects_other_elements() {
    let schema = book_schema();
    let mut chapter = schema.create("chapter").unwrap();
    chapter.set_choice("body", "Kept").unwrap();

    let result = chapter.set_choice("body", title(&schema, "Wrong"));
    assert!(matches!(result, Err(ModelError::TypeMismatch { .. })));
    assert_eq!(
        chapter.alternation("body").unwrap().value().and_then(Choice::as_text),
        Some("Kept")
    );
}

#[test]
fn test_unset_body_is_reported() {
    let schema = book_schema();
    let chapter = schema.create("chapter").unwrap();
    let body = chapter.alternation("body").unwrap();

    assert!(body.is_required());
    assert!(!body.is_set());
    assert!(matches!(body.get(), Err(ModelError::EmptyAlternation { .. })));
}

#[test]
fn test_quantified_accessor_on_alternation_fails() {
    let schema = book_schema();
    let chapter = schema.create("chapter").unwrap();
    assert!(matches!(
        chapter.quantified("body"),
        Err(ModelError::WrongSlotKind { .. })
    ));
}
