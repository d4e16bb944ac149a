//! Slots: the typed positions an element's content is made of

use log::trace;

use crate::alternation::{Alternation, Choice};
use crate::error::{ModelError, Result, ValidationReport, Violation};
use crate::model::{SlotKind, SlotSpec, find_invalid_char};
use crate::quantified::Quantified;

/// One position in a content model, holding whatever its `SlotSpec` allows
#[derive(Debug, Clone)]
pub enum Slot {
    Quantified(Quantified),
    Alternation(Alternation),
    Text(TextSlot),
}

/// Literal character data at a fixed position in a sequence
#[derive(Debug, Clone)]
pub struct TextSlot {
    name: String,
    value: String,
}

impl TextSlot {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Slot {
    /// A fresh, empty slot for `spec`
    pub fn from_spec(spec: &SlotSpec) -> Self {
        match spec.kind() {
            SlotKind::Quantified { quantifier, child } => {
                Slot::Quantified(Quantified::new(spec.name(), *quantifier, child.clone()))
            }
            SlotKind::Alternation { options, required } => {
                Slot::Alternation(Alternation::new(spec.name(), options.clone(), *required))
            }
            SlotKind::Text => Slot::Text(TextSlot {
                name: spec.name().to_string(),
                value: String::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Slot::Quantified(q) => q.name(),
            Slot::Alternation(a) => a.name(),
            Slot::Text(t) => t.name(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Slot::Quantified(_) => "a quantified slot",
            Slot::Alternation(_) => "an alternation",
            Slot::Text(_) => "a text slot",
        }
    }

    pub fn as_quantified(&self) -> Result<&Quantified> {
        match self {
            Slot::Quantified(q) => Ok(q),
            other => Err(other.wrong_kind("a quantified slot")),
        }
    }

    pub fn as_quantified_mut(&mut self) -> Result<&mut Quantified> {
        match self {
            Slot::Quantified(q) => Ok(q),
            other => Err(other.wrong_kind("a quantified slot")),
        }
    }

    pub fn as_alternation(&self) -> Result<&Alternation> {
        match self {
            Slot::Alternation(a) => Ok(a),
            other => Err(other.wrong_kind("an alternation")),
        }
    }

    pub fn as_alternation_mut(&mut self) -> Result<&mut Alternation> {
        match self {
            Slot::Alternation(a) => Ok(a),
            other => Err(other.wrong_kind("an alternation")),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Slot::Text(t) => Some(&t.value),
            _ => None,
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> Result<()> {
        match self {
            Slot::Text(t) => {
                t.value = text.into();
                trace!("{}: set text", t.name);
                Ok(())
            }
            other => Err(other.wrong_kind("a text slot")),
        }
    }

    /// Check this slot's own invariant, not its descendants
    pub fn validate(&self) -> Result<()> {
        match self {
            Slot::Quantified(q) => q.validate(),
            Slot::Alternation(a) => a.validate(),
            Slot::Text(_) => Ok(()),
        }
    }

    pub(crate) fn has_content(&self) -> bool {
        match self {
            Slot::Quantified(q) => !q.is_empty(),
            Slot::Alternation(a) => a.value().is_some_and(Choice::has_content),
            Slot::Text(t) => !t.value.is_empty(),
        }
    }

    pub(crate) fn has_inline_text(&self) -> bool {
        match self {
            Slot::Quantified(_) => false,
            Slot::Alternation(a) => a.value().is_some_and(Choice::has_inline_text),
            Slot::Text(t) => !t.value.is_empty(),
        }
    }

    fn wrong_kind(&self, expected: &'static str) -> ModelError {
        ModelError::WrongSlotKind {
            slot: self.name().to_string(),
            expected,
            found: self.kind_name(),
        }
    }
}

/// The ordered slots of an element or group, instantiated from a model
#[derive(Debug, Clone, Default)]
pub(crate) struct SlotList {
    slots: Vec<Slot>,
}

impl SlotList {
    pub(crate) fn from_specs(specs: &[SlotSpec]) -> Self {
        Self {
            slots: specs.iter().map(Slot::from_spec).collect(),
        }
    }

    pub(crate) fn as_slice(&self) -> &[Slot] {
        &self.slots
    }

    pub(crate) fn get(&self, owner: &str, name: &str) -> Result<&Slot> {
        self.slots
            .iter()
            .find(|slot| slot.name() == name)
            .ok_or_else(|| unknown_slot(owner, name))
    }

    pub(crate) fn get_mut(&mut self, owner: &str, name: &str) -> Result<&mut Slot> {
        self.slots
            .iter_mut()
            .find(|slot| slot.name() == name)
            .ok_or_else(|| unknown_slot(owner, name))
    }

    pub(crate) fn has_content(&self) -> bool {
        self.slots.iter().any(Slot::has_content)
    }

    pub(crate) fn has_inline_text(&self) -> bool {
        self.slots.iter().any(Slot::has_inline_text)
    }

    /// Walk every slot and descendant, recording problems under `path`
    pub(crate) fn collect_violations(&self, path: &str, report: &mut ValidationReport) {
        for slot in &self.slots {
            if let Err(error) = slot.validate() {
                report.push(Violation::new(path, error));
            }

            match slot {
                Slot::Quantified(q) => {
                    for (i, item) in q.iter().enumerate() {
                        let child_path = format!("{}/{}[{}]", path, item.name(), i + 1);
                        item.collect_violations(&child_path, report);
                    }
                }
                Slot::Alternation(a) => match a.value() {
                    Some(Choice::Element(element)) => {
                        let child_path = format!("{}/{}", path, element.name());
                        element.collect_violations(&child_path, report);
                    }
                    Some(Choice::Text(text)) => {
                        check_text(text, || format!("text of `{}`", a.name()), path, report);
                    }
                    Some(Choice::Group(group)) => group.slot_list().collect_violations(path, report),
                    None => {}
                },
                Slot::Text(t) => {
                    check_text(&t.value, || format!("text of `{}`", t.name), path, report);
                }
            }
        }
    }
}

impl<'a> IntoIterator for &'a SlotList {
    type Item = &'a Slot;
    type IntoIter = std::slice::Iter<'a, Slot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

/// Record a violation if `text` holds a character XML 1.0 forbids
pub(crate) fn check_text(
    text: &str,
    context: impl FnOnce() -> String,
    path: &str,
    report: &mut ValidationReport,
) {
    if let Some(character) = find_invalid_char(text) {
        report.push(Violation::new(
            path,
            ModelError::InvalidCharacter {
                context: context(),
                character,
            },
        ));
    }
}

fn unknown_slot(owner: &str, name: &str) -> ModelError {
    ModelError::UnknownSlot {
        element: owner.to_string(),
        slot: name.to_string(),
    }
}
