//! Alternation containers for choice particles such as `(figure | table | #PCDATA)`

use std::sync::Arc;

use log::trace;

use crate::element::Element;
use crate::error::{ModelError, Result};
use crate::model::{Alternative, ModelGroup};
use crate::quantified::Quantified;
use crate::slot::{Slot, SlotList};

/// A value held by an [`Alternation`]
#[derive(Debug, Clone)]
pub enum Choice {
    Element(Element),
    Text(String),
    Group(Group),
}

impl Choice {
    pub fn text(text: impl Into<String>) -> Self {
        Choice::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Choice::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Choice::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Choice::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Choice::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            Choice::Group(group) => Some(group),
            _ => None,
        }
    }

    /// Whether this value is an instance of `option`
    pub fn matches(&self, option: &Alternative) -> bool {
        match (self, option) {
            (Choice::Element(element), Alternative::Element(name)) => element.name() == name,
            (Choice::Text(_), Alternative::Text) => true,
            (Choice::Group(group), Alternative::Group(model)) => {
                Arc::ptr_eq(&group.model, model) || *group.model == **model
            }
            _ => false,
        }
    }

    fn describe(&self) -> String {
        match self {
            Choice::Element(element) => format!("<{}>", element.name()),
            Choice::Text(_) => "#PCDATA".to_string(),
            Choice::Group(group) => format!("group `{}`", group.name()),
        }
    }

    pub(crate) fn has_content(&self) -> bool {
        match self {
            Choice::Element(_) => true,
            Choice::Text(text) => !text.is_empty(),
            Choice::Group(group) => group.slots.has_content(),
        }
    }

    pub(crate) fn has_inline_text(&self) -> bool {
        match self {
            Choice::Element(_) => false,
            Choice::Text(text) => !text.is_empty(),
            Choice::Group(group) => group.slots.has_inline_text(),
        }
    }
}

impl From<Element> for Choice {
    fn from(element: Element) -> Self {
        Choice::Element(element)
    }
}

impl From<Group> for Choice {
    fn from(group: Group) -> Self {
        Choice::Group(group)
    }
}

impl From<String> for Choice {
    fn from(text: String) -> Self {
        Choice::Text(text)
    }
}

impl From<&str> for Choice {
    fn from(text: &str) -> Self {
        Choice::Text(text.to_string())
    }
}

/// Holds at most one value drawn from a fixed set of alternatives
#[derive(Debug, Clone)]
pub struct Alternation {
    name: String,
    options: Arc<[Alternative]>,
    required: bool,
    value: Option<Choice>,
}

impl Alternation {
    pub fn new(name: impl Into<String>, options: Arc<[Alternative]>, required: bool) -> Self {
        Self {
            name: name.into(),
            options,
            required,
            value: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &[Alternative] {
        &self.options
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Replace the held value, returning the previous one
    pub fn set(&mut self, value: impl Into<Choice>) -> Result<Option<Choice>> {
        let value = value.into();
        if !self.options.iter().any(|option| value.matches(option)) {
            return Err(ModelError::TypeMismatch {
                slot: self.name.clone(),
                expected: self.expected(),
                found: value.describe(),
            });
        }

        trace!("{}: set {}", self.name, value.describe());
        Ok(self.value.replace(value))
    }

    /// The held value; an unset required alternation is an error
    pub fn get(&self) -> Result<Option<&Choice>> {
        match &self.value {
            None if self.required => Err(self.empty_error()),
            value => Ok(value.as_ref()),
        }
    }

    pub fn get_mut(&mut self) -> Option<&mut Choice> {
        self.value.as_mut()
    }

    /// The held value, if any, without checking whether one is required
    pub fn value(&self) -> Option<&Choice> {
        self.value.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Empty the container where the model permits absence
    pub fn clear(&mut self) -> Result<Option<Choice>> {
        if self.required {
            return Err(self.empty_error());
        }
        trace!("{}: clear", self.name);
        Ok(self.value.take())
    }

    /// A fresh, empty instance of the group option called `name`
    pub fn instantiate_group(&self, name: &str) -> Result<Group> {
        self.options
            .iter()
            .find_map(|option| match option {
                Alternative::Group(model) if model.name() == name => Some(Group::new(model)),
                _ => None,
            })
            .ok_or_else(|| ModelError::TypeMismatch {
                slot: self.name.clone(),
                expected: self.expected(),
                found: format!("group `{}`", name),
            })
    }

    pub fn validate(&self) -> Result<()> {
        if self.required && self.value.is_none() {
            Err(self.empty_error())
        } else {
            Ok(())
        }
    }

    fn expected(&self) -> String {
        let options: Vec<String> = self.options.iter().map(Alternative::describe).collect();
        format!("one of {}", options.join(", "))
    }

    fn empty_error(&self) -> ModelError {
        ModelError::EmptyAlternation {
            slot: self.name.clone(),
        }
    }
}

/// An instance of a [`ModelGroup`]: slots serialized inline, with no tag of their own
#[derive(Debug, Clone)]
pub struct Group {
    model: Arc<ModelGroup>,
    slots: SlotList,
}

impl Group {
    pub fn new(model: &Arc<ModelGroup>) -> Self {
        Self {
            model: Arc::clone(model),
            slots: SlotList::from_specs(model.slots()),
        }
    }

    pub fn name(&self) -> &str {
        self.model.name()
    }

    pub fn model(&self) -> &Arc<ModelGroup> {
        &self.model
    }

    pub fn slots(&self) -> &[Slot] {
        self.slots.as_slice()
    }

    pub fn child(&self, name: &str) -> Result<&Slot> {
        self.slots.get(self.model.name(), name)
    }

    pub fn child_mut(&mut self, name: &str) -> Result<&mut Slot> {
        self.slots.get_mut(self.model.name(), name)
    }

    pub fn quantified_mut(&mut self, name: &str) -> Result<&mut Quantified> {
        self.child_mut(name)?.as_quantified_mut()
    }

    pub fn alternation_mut(&mut self, name: &str) -> Result<&mut Alternation> {
        self.child_mut(name)?.as_alternation_mut()
    }

    /// Append `value` to the quantified slot `name`
    pub fn add(&mut self, name: &str, value: Element) -> Result<()> {
        self.quantified_mut(name)?.add(value)
    }

    pub fn set_slot_text(&mut self, name: &str, text: impl Into<String>) -> Result<()> {
        self.child_mut(name)?.set_text(text)
    }

    pub(crate) fn slot_list(&self) -> &SlotList {
        &self.slots
    }
}
