//! Quantified containers: `?`, `+`, `*` and exactly-one slots
//!
//! Each container holds child elements of a single declared type, in document
//! order, and refuses any mutation that would break its quantifier.

use log::trace;

use crate::element::Element;
use crate::error::{CardinalityBound, ModelError, Result};
use crate::model::Quantifier;

/// An ordered run of same-typed child elements bounded by a [`Quantifier`]
#[derive(Debug, Clone)]
pub struct Quantified {
    name: String,
    quantifier: Quantifier,
    child: String,
    items: Vec<Element>,
}

impl Quantified {
    /// Create an empty container; a `Repeated` or `One` slot is incomplete
    /// until its first item is added
    pub fn new(name: impl Into<String>, quantifier: Quantifier, child: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantifier,
            child: child.into(),
            items: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantifier(&self) -> Quantifier {
        self.quantifier
    }

    /// Tag name every item must carry
    pub fn child_type(&self) -> &str {
        &self.child
    }

    /// Append `value` at the end
    pub fn add(&mut self, value: Element) -> Result<()> {
        self.insert(self.items.len(), value)
    }

    /// Insert `value` before the item at `index`
    pub fn insert(&mut self, index: usize, value: Element) -> Result<()> {
        self.check_type(&value)?;

        let len = self.items.len();
        if index > len {
            return Err(ModelError::IndexOutOfRange {
                slot: self.name.clone(),
                index,
                len,
            });
        }
        if let Some(max) = self.quantifier.max() {
            if len >= max {
                return Err(self.cardinality_error(CardinalityBound::Maximum(max)));
            }
        }

        trace!("{}: insert <{}> at {}", self.name, self.child, index);
        self.items.insert(index, value);
        Ok(())
    }

    /// Swap the item at `index` for `value`, returning the old item
    pub fn replace(&mut self, index: usize, value: Element) -> Result<Element> {
        self.check_type(&value)?;
        let len = self.items.len();
        let slot = self.items.get_mut(index).ok_or_else(|| ModelError::IndexOutOfRange {
            slot: self.name.clone(),
            index,
            len,
        })?;

        trace!("{}: replace <{}> at {}", self.name, self.child, index);
        Ok(std::mem::replace(slot, value))
    }

    /// Remove and return the item at `index`
    pub fn remove(&mut self, index: usize) -> Result<Element> {
        let len = self.items.len();
        if index >= len {
            return Err(ModelError::IndexOutOfRange {
                slot: self.name.clone(),
                index,
                len,
            });
        }
        let min = self.quantifier.min();
        if len - 1 < min {
            return Err(self.cardinality_error(CardinalityBound::Minimum(min)));
        }

        trace!("{}: remove <{}> at {}", self.name, self.child, index);
        Ok(self.items.remove(index))
    }

    /// Remove every item; only allowed where the quantifier admits zero
    pub fn clear(&mut self) -> Result<()> {
        let min = self.quantifier.min();
        if min > 0 && !self.items.is_empty() {
            return Err(self.cardinality_error(CardinalityBound::Minimum(min)));
        }
        self.items.clear();
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Element> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.items.get_mut(index)
    }

    pub fn first(&self) -> Option<&Element> {
        self.items.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Element> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Re-check the cardinality invariant against the current contents
    pub fn validate(&self) -> Result<()> {
        let count = self.items.len();
        let min = self.quantifier.min();
        if count < min {
            return Err(self.cardinality_error(CardinalityBound::Minimum(min)));
        }
        if let Some(max) = self.quantifier.max() {
            if count > max {
                return Err(self.cardinality_error(CardinalityBound::Maximum(max)));
            }
        }
        Ok(())
    }

    fn check_type(&self, value: &Element) -> Result<()> {
        if value.name() == self.child {
            Ok(())
        } else {
            Err(ModelError::TypeMismatch {
                slot: self.name.clone(),
                expected: format!("<{}>", self.child),
                found: format!("<{}>", value.name()),
            })
        }
    }

    fn cardinality_error(&self, bound: CardinalityBound) -> ModelError {
        ModelError::Cardinality {
            slot: self.name.clone(),
            quantifier: self.quantifier,
            count: self.items.len(),
            bound,
        }
    }
}

impl<'a> IntoIterator for &'a Quantified {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
