//! Content model declarations
//!
//! An [`ElementType`] pairs a tag name with the [`ContentModel`] its instances
//! must follow. Content models are built from [`SlotSpec`]s: quantified child
//! slots, alternations over a closed set of [`Alternative`]s, and text. All of
//! it is immutable once declared and shared through `Arc`.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::error::{ModelError, Result};

/// Cardinality constraint on a content particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    /// Exactly one
    One,
    /// Zero or one (`?`)
    Optional,
    /// One or more (`+`)
    Repeated,
    /// Zero or more (`*`)
    Any,
}

impl Quantifier {
    pub fn min(self) -> usize {
        match self {
            Quantifier::One | Quantifier::Repeated => 1,
            Quantifier::Optional | Quantifier::Any => 0,
        }
    }

    pub fn max(self) -> Option<usize> {
        match self {
            Quantifier::One | Quantifier::Optional => Some(1),
            Quantifier::Repeated | Quantifier::Any => None,
        }
    }

    /// Whether `count` items satisfy this quantifier
    pub fn admits(self, count: usize) -> bool {
        count >= self.min() && self.max().is_none_or(|max| count <= max)
    }

    /// DTD suffix for this quantifier
    pub fn symbol(self) -> &'static str {
        match self {
            Quantifier::One => "",
            Quantifier::Optional => "?",
            Quantifier::Repeated => "+",
            Quantifier::Any => "*",
        }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quantifier::One => "one",
            Quantifier::Optional => "optional",
            Quantifier::Repeated => "repeated",
            Quantifier::Any => "any",
        };
        f.write_str(name)
    }
}

/// One permitted option of an alternation
#[derive(Debug, Clone, PartialEq)]
pub enum Alternative {
    /// An element of the named type
    Element(String),
    /// Character data
    Text,
    /// A nested sequence of slots
    Group(Arc<ModelGroup>),
}

impl Alternative {
    pub fn element(name: impl Into<String>) -> Self {
        Alternative::Element(name.into())
    }

    pub fn group(group: ModelGroup) -> Self {
        Alternative::Group(Arc::new(group))
    }

    /// How the option is named in error messages; also its identity for duplicate checks
    pub(crate) fn describe(&self) -> String {
        match self {
            Alternative::Element(name) => format!("<{}>", name),
            Alternative::Text => "#PCDATA".to_string(),
            Alternative::Group(group) => format!("group `{}`", group.name()),
        }
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alternative::Element(name) => f.write_str(name),
            Alternative::Text => f.write_str("#PCDATA"),
            Alternative::Group(group) => write!(f, "{}", group),
        }
    }
}

/// What a slot holds
#[derive(Debug, Clone, PartialEq)]
pub enum SlotKind {
    Quantified {
        quantifier: Quantifier,
        child: String,
    },
    Alternation {
        options: Arc<[Alternative]>,
        required: bool,
    },
    Text,
}

/// A named position in a content model
#[derive(Debug, Clone, PartialEq)]
pub struct SlotSpec {
    name: String,
    kind: SlotKind,
}

impl SlotSpec {
    pub fn quantified(
        name: impl Into<String>,
        quantifier: Quantifier,
        child: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: SlotKind::Quantified {
                quantifier,
                child: child.into(),
            },
        }
    }

    /// Exactly one `child`, in a slot named after it
    pub fn one(child: impl Into<String>) -> Self {
        let child = child.into();
        Self::quantified(child.clone(), Quantifier::One, child)
    }

    pub fn optional(child: impl Into<String>) -> Self {
        let child = child.into();
        Self::quantified(child.clone(), Quantifier::Optional, child)
    }

    pub fn repeated(child: impl Into<String>) -> Self {
        let child = child.into();
        Self::quantified(child.clone(), Quantifier::Repeated, child)
    }

    pub fn any(child: impl Into<String>) -> Self {
        let child = child.into();
        Self::quantified(child.clone(), Quantifier::Any, child)
    }

    /// An alternation that must hold a value before serialization
    pub fn choice(name: impl Into<String>, options: impl IntoIterator<Item = Alternative>) -> Self {
        Self {
            name: name.into(),
            kind: SlotKind::Alternation {
                options: options.into_iter().collect(),
                required: true,
            },
        }
    }

    /// An alternation that may be left empty
    pub fn optional_choice(
        name: impl Into<String>,
        options: impl IntoIterator<Item = Alternative>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: SlotKind::Alternation {
                options: options.into_iter().collect(),
                required: false,
            },
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SlotKind::Text,
        }
    }

    /// Rename the slot, keeping its kind
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &SlotKind {
        &self.kind
    }
}

impl fmt::Display for SlotSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SlotKind::Quantified { quantifier, child } => {
                write!(f, "{}{}", child, quantifier.symbol())
            }
            SlotKind::Alternation { options, required } => {
                f.write_str("(")?;
                for (i, option) in options.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{}", option)?;
                }
                f.write_str(")")?;
                if !required {
                    f.write_str("?")?;
                }
                Ok(())
            }
            SlotKind::Text => f.write_str("#PCDATA"),
        }
    }
}

/// A named, ordered sequence of slots
#[derive(Debug, Clone, PartialEq)]
pub struct ModelGroup {
    name: String,
    slots: Vec<SlotSpec>,
}

impl ModelGroup {
    pub fn new(name: impl Into<String>, slots: impl IntoIterator<Item = SlotSpec>) -> Self {
        Self {
            name: name.into(),
            slots: slots.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slots(&self) -> &[SlotSpec] {
        &self.slots
    }

    pub fn slot(&self, name: &str) -> Option<&SlotSpec> {
        self.slots.iter().find(|slot| slot.name == name)
    }

    /// Element type names referenced anywhere in this group
    fn collect_references<'a>(&'a self, names: &mut Vec<&'a str>) {
        for slot in &self.slots {
            match &slot.kind {
                SlotKind::Quantified { child, .. } => names.push(child),
                SlotKind::Alternation { options, .. } => {
                    for option in options.iter() {
                        match option {
                            Alternative::Element(name) => names.push(name),
                            Alternative::Group(group) => group.collect_references(names),
                            Alternative::Text => {}
                        }
                    }
                }
                SlotKind::Text => {}
            }
        }
    }

    fn check(&self, element: &str) -> Result<()> {
        let mut seen = HashSet::new();
        for slot in &self.slots {
            if slot.name.is_empty() {
                return Err(definition_error(element, "slot names must not be empty"));
            }
            if !seen.insert(slot.name.as_str()) {
                return Err(definition_error(
                    element,
                    format!("duplicate slot name `{}`", slot.name),
                ));
            }
            match &slot.kind {
                SlotKind::Quantified { child, .. } => {
                    if !is_xml_name(child) {
                        return Err(definition_error(
                            element,
                            format!("slot `{}` names invalid element type `{}`", slot.name, child),
                        ));
                    }
                }
                SlotKind::Alternation { options, .. } => {
                    check_alternatives(element, &slot.name, options)?;
                }
                SlotKind::Text => {}
            }
        }
        Ok(())
    }
}

impl fmt::Display for ModelGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", slot)?;
        }
        f.write_str(")")
    }
}

fn check_alternatives(element: &str, slot: &str, options: &[Alternative]) -> Result<()> {
    if options.is_empty() {
        return Err(definition_error(
            element,
            format!("alternation `{}` has no options", slot),
        ));
    }

    let mut seen = HashSet::new();
    for option in options {
        if !seen.insert(option.describe()) {
            return Err(definition_error(
                element,
                format!("alternation `{}` lists {} twice", slot, option.describe()),
            ));
        }
        match option {
            Alternative::Element(name) if !is_xml_name(name) => {
                return Err(definition_error(
                    element,
                    format!("alternation `{}` names invalid element type `{}`", slot, name),
                ));
            }
            Alternative::Group(group) => group.check(element)?,
            _ => {}
        }
    }
    Ok(())
}

/// The declared shape of an element's content
#[derive(Debug, Clone, PartialEq)]
pub enum ContentModel {
    /// No content at all
    Empty,
    /// Character data only
    Text,
    /// An ordered list of slots
    Sequence(ModelGroup),
}

impl ContentModel {
    pub fn sequence(slots: impl IntoIterator<Item = SlotSpec>) -> Self {
        ContentModel::Sequence(ModelGroup::new("sequence", slots))
    }

    /// `(a | b | ...)`: a sequence holding a single required alternation
    pub fn choice(slot: impl Into<String>, options: impl IntoIterator<Item = Alternative>) -> Self {
        Self::sequence([SlotSpec::choice(slot, options)])
    }

    pub fn slots(&self) -> &[SlotSpec] {
        match self {
            ContentModel::Sequence(group) => group.slots(),
            ContentModel::Empty | ContentModel::Text => &[],
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ContentModel::Text)
    }
}

impl fmt::Display for ContentModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentModel::Empty => f.write_str("EMPTY"),
            ContentModel::Text => f.write_str("(#PCDATA)"),
            ContentModel::Sequence(group) => write!(f, "{}", group),
        }
    }
}

/// Declaration of one attribute on an element type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSpec {
    name: String,
    required: bool,
    default: Option<String>,
}

impl AttributeSpec {
    /// `#REQUIRED`
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            default: None,
        }
    }

    /// `#IMPLIED`
    pub fn implied(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            default: None,
        }
    }

    /// An optional attribute with a default value
    pub fn defaulted(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            default: Some(default.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }
}

/// A tag name plus the content model and attributes its elements must follow
#[derive(Debug, Clone, PartialEq)]
pub struct ElementType {
    name: String,
    content: ContentModel,
    attributes: Vec<AttributeSpec>,
}

impl ElementType {
    pub fn new(name: impl Into<String>, content: ContentModel) -> Result<Arc<Self>> {
        Self::with_attributes(name, content, Vec::new())
    }

    pub fn with_attributes(
        name: impl Into<String>,
        content: ContentModel,
        attributes: impl IntoIterator<Item = AttributeSpec>,
    ) -> Result<Arc<Self>> {
        let element_type = Self {
            name: name.into(),
            content,
            attributes: attributes.into_iter().collect(),
        };
        element_type.check()?;
        Ok(Arc::new(element_type))
    }

    /// An element holding only character data
    pub fn text(name: impl Into<String>) -> Result<Arc<Self>> {
        Self::new(name, ContentModel::Text)
    }

    pub fn empty(name: impl Into<String>) -> Result<Arc<Self>> {
        Self::new(name, ContentModel::Empty)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &ContentModel {
        &self.content
    }

    pub fn attributes(&self) -> &[AttributeSpec] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeSpec> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Names of every element type this model refers to, nested groups included
    pub fn referenced_types(&self) -> Vec<&str> {
        let mut names = Vec::new();
        if let ContentModel::Sequence(group) = &self.content {
            group.collect_references(&mut names);
        }
        names
    }

    fn check(&self) -> Result<()> {
        if !is_xml_name(&self.name) {
            return Err(definition_error(
                &self.name,
                format!("`{}` is not a valid XML name", self.name),
            ));
        }

        let mut seen = HashSet::new();
        for attr in &self.attributes {
            if !is_xml_name(&attr.name) {
                return Err(definition_error(
                    &self.name,
                    format!("`{}` is not a valid attribute name", attr.name),
                ));
            }
            if !seen.insert(attr.name.as_str()) {
                return Err(definition_error(
                    &self.name,
                    format!("duplicate attribute `{}`", attr.name),
                ));
            }
            if let Some(c) = attr.default.as_deref().and_then(find_invalid_char) {
                return Err(definition_error(
                    &self.name,
                    format!("default of `{}` contains {:?}", attr.name, c),
                ));
            }
        }

        match &self.content {
            ContentModel::Sequence(group) => group.check(&self.name),
            ContentModel::Empty | ContentModel::Text => Ok(()),
        }
    }
}

fn definition_error(element: &str, reason: impl Into<String>) -> ModelError {
    ModelError::ModelDefinition {
        element: element.to_string(),
        reason: reason.into(),
    }
}

/// XML 1.0 `Name` production
pub(crate) fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if is_name_start_char(c) => chars.all(is_name_char),
        _ => false,
    }
}

fn is_name_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == ':' || (!c.is_ascii() && c.is_alphabetic())
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || c.is_ascii_digit()
        || c == '-'
        || c == '.'
        || c == '\u{B7}'
        || (!c.is_ascii() && c.is_alphanumeric())
}

/// First character outside the XML 1.0 `Char` production, if any
pub(crate) fn find_invalid_char(text: &str) -> Option<char> {
    text.chars().find(|&c| {
        !matches!(c,
            '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}')
    })
}
