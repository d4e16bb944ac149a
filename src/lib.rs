//! # xml-content-model Library
//!
//! Strongly-typed XML element trees that enforce DTD-style content models while
//! they are built, validate whole documents with every violation reported, and
//! serialize valid trees to well-formed XML text.
//!
//! ```
//! use xml_content_model::{ContentModel, Element, ElementType, SlotSpec};
//!
//! let title = ElementType::text("title").unwrap();
//! let book = ElementType::new("book", ContentModel::sequence([SlotSpec::one("title")])).unwrap();
//!
//! let mut doc = Element::new(&book);
//! doc.add("title", Element::with_text(&title, "Dune").unwrap()).unwrap();
//! assert_eq!(doc.to_xml().unwrap(), "<book><title>Dune</title></book>");
//! ```

pub mod alternation;
pub mod config;
pub mod element;
pub mod error;
pub mod error_reporter;
pub mod model;
pub mod quantified;
pub mod schema;
pub mod serializer;
pub mod slot;

pub use alternation::{Alternation, Choice, Group};
pub use config::{Config, ConfigError, ConfigManager, OutputConfig, ReportConfig};
pub use element::Element;
pub use error::{CardinalityBound, ModelError, Result, ValidationReport, Violation};
pub use error_reporter::{ErrorReporter, VerbosityLevel};
pub use model::{
    Alternative, AttributeSpec, ContentModel, ElementType, ModelGroup, Quantifier, SlotKind,
    SlotSpec,
};
pub use quantified::Quantified;
pub use schema::{Schema, SchemaBuilder};
pub use serializer::{XmlSerialize, XmlWriter, serialize, serialize_with, write_to};
pub use slot::{Slot, TextSlot};
