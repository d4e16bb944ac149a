//! Element nodes
//!
//! An [`Element`] is an instance of an [`ElementType`]. Its content is either
//! a single text value (for `(#PCDATA)` models) or the ordered slots of its
//! content model, created fresh and empty for every instance.

use std::collections::HashMap;
use std::sync::Arc;

use log::trace;

use crate::alternation::{Alternation, Choice};
use crate::error::{ModelError, Result, ValidationReport, Violation};
use crate::model::{ContentModel, ElementType};
use crate::quantified::Quantified;
use crate::serializer;
use crate::slot::{Slot, SlotList, check_text};

#[derive(Debug, Clone)]
enum Content {
    Text(String),
    Slots(SlotList),
}

/// A node in a document tree, bound to the element type it was created from
#[derive(Debug, Clone)]
pub struct Element {
    element_type: Arc<ElementType>,
    attributes: HashMap<String, String>,
    content: Content,
}

impl Element {
    pub fn new(element_type: &Arc<ElementType>) -> Self {
        let content = match element_type.content() {
            ContentModel::Text => Content::Text(String::new()),
            ContentModel::Empty => Content::Slots(SlotList::default()),
            ContentModel::Sequence(group) => Content::Slots(SlotList::from_specs(group.slots())),
        };
        Self {
            element_type: Arc::clone(element_type),
            attributes: HashMap::new(),
            content,
        }
    }

    /// Declare a one-off element type and instantiate it
    pub fn declare(name: impl Into<String>, content: ContentModel) -> Result<Self> {
        let element_type = ElementType::new(name, content)?;
        Ok(Self::new(&element_type))
    }

    /// A text-only element holding `text`
    pub fn with_text(element_type: &Arc<ElementType>, text: impl Into<String>) -> Result<Self> {
        let mut element = Self::new(element_type);
        element.set_text(text)?;
        Ok(element)
    }

    pub fn name(&self) -> &str {
        self.element_type.name()
    }

    pub fn element_type(&self) -> &Arc<ElementType> {
        &self.element_type
    }

    /// Slots in document order; empty for text-only elements
    pub fn slots(&self) -> &[Slot] {
        match &self.content {
            Content::Slots(slots) => slots.as_slice(),
            Content::Text(_) => &[],
        }
    }

    pub fn child(&self, name: &str) -> Result<&Slot> {
        match &self.content {
            Content::Slots(slots) => slots.get(self.element_type.name(), name),
            Content::Text(_) => Err(self.unknown_slot(name)),
        }
    }

    pub fn child_mut(&mut self, name: &str) -> Result<&mut Slot> {
        match &mut self.content {
            Content::Slots(slots) => slots.get_mut(self.element_type.name(), name),
            Content::Text(_) => Err(ModelError::UnknownSlot {
                element: self.element_type.name().to_string(),
                slot: name.to_string(),
            }),
        }
    }

    pub fn quantified(&self, name: &str) -> Result<&Quantified> {
        self.child(name)?.as_quantified()
    }

    pub fn quantified_mut(&mut self, name: &str) -> Result<&mut Quantified> {
        self.child_mut(name)?.as_quantified_mut()
    }

    pub fn alternation(&self, name: &str) -> Result<&Alternation> {
        self.child(name)?.as_alternation()
    }

    pub fn alternation_mut(&mut self, name: &str) -> Result<&mut Alternation> {
        self.child_mut(name)?.as_alternation_mut()
    }

    /// Append `value` to the quantified slot `name`
    pub fn add(&mut self, name: &str, value: Element) -> Result<()> {
        self.quantified_mut(name)?.add(value)
    }

    /// Set the value of the alternation `name`, returning the previous one
    pub fn set_choice(&mut self, name: &str, value: impl Into<Choice>) -> Result<Option<Choice>> {
        self.alternation_mut(name)?.set(value)
    }

    pub fn set_slot_text(&mut self, name: &str, text: impl Into<String>) -> Result<()> {
        self.child_mut(name)?.set_text(text)
    }

    /// Text of a text-only element
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            Content::Slots(_) => None,
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> Result<()> {
        match &mut self.content {
            Content::Text(current) => {
                *current = text.into();
                trace!("<{}>: set text", self.element_type.name());
                Ok(())
            }
            Content::Slots(_) => Err(ModelError::WrongSlotKind {
                slot: self.element_type.name().to_string(),
                expected: "text content",
                found: "element content",
            }),
        }
    }

    /// Set a declared attribute, returning its previous explicit value
    pub fn set_attribute(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<Option<String>> {
        if self.element_type.attribute(name).is_none() {
            return Err(self.unknown_attribute(name));
        }
        trace!("<{}>: set @{}", self.element_type.name(), name);
        Ok(self.attributes.insert(name.to_string(), value.into()))
    }

    /// The explicit value of `name`, or its declared default
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str).or_else(|| {
            self.element_type
                .attribute(name)
                .and_then(|spec| spec.default_value())
        })
    }

    pub fn remove_attribute(&mut self, name: &str) -> Result<Option<String>> {
        if self.element_type.attribute(name).is_none() {
            return Err(self.unknown_attribute(name));
        }
        Ok(self.attributes.remove(name))
    }

    /// Attribute values to emit, in declaration order, defaults included
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.element_type
            .attributes()
            .iter()
            .filter_map(move |spec| self.attribute(spec.name()).map(|value| (spec.name(), value)))
    }

    /// Check this element and its whole subtree, reporting every violation found
    pub fn validate(&self) -> std::result::Result<(), ValidationReport> {
        let mut report = ValidationReport::new();
        self.collect_violations(&format!("/{}", self.name()), &mut report);
        report.into_result()
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Validate and render this subtree with default output settings
    pub fn to_xml(&self) -> Result<String> {
        serializer::serialize(self)
    }

    pub(crate) fn collect_violations(&self, path: &str, report: &mut ValidationReport) {
        let name = self.element_type.name();

        for spec in self.element_type.attributes() {
            match self.attributes.get(spec.name()) {
                Some(value) => check_text(
                    value,
                    || format!("attribute `{}`", spec.name()),
                    path,
                    report,
                ),
                None if spec.is_required() => report.push(Violation::new(
                    path,
                    ModelError::MissingAttribute {
                        element: name.to_string(),
                        attribute: spec.name().to_string(),
                    },
                )),
                None => {}
            }
        }

        match &self.content {
            Content::Text(text) => check_text(text, || format!("text of <{}>", name), path, report),
            Content::Slots(slots) => slots.collect_violations(path, report),
        }
    }

    pub(crate) fn has_content(&self) -> bool {
        match &self.content {
            Content::Text(text) => !text.is_empty(),
            Content::Slots(slots) => slots.has_content(),
        }
    }

    /// Whether character data appears directly inside this element
    pub(crate) fn has_inline_text(&self) -> bool {
        match &self.content {
            Content::Text(text) => !text.is_empty(),
            Content::Slots(slots) => slots.has_inline_text(),
        }
    }

    fn unknown_slot(&self, name: &str) -> ModelError {
        ModelError::UnknownSlot {
            element: self.element_type.name().to_string(),
            slot: name.to_string(),
        }
    }

    fn unknown_attribute(&self, name: &str) -> ModelError {
        ModelError::UnknownAttribute {
            element: self.element_type.name().to_string(),
            attribute: name.to_string(),
        }
    }
}
