//! A closed set of element type declarations
//!
//! [`SchemaBuilder`] collects declarations and checks that every name a
//! content model refers to is declared. The resulting [`Schema`] creates
//! elements by tag name and validates whole trees against its declarations.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::alternation::{Choice, Group};
use crate::element::Element;
use crate::error::{ModelError, Result, ValidationReport, Violation};
use crate::model::{AttributeSpec, ContentModel, ElementType};
use crate::slot::Slot;

/// Collects element type declarations for a [`Schema`]
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    declarations: Vec<Arc<ElementType>>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an already-checked element type
    pub fn declare(mut self, element_type: Arc<ElementType>) -> Self {
        self.declarations.push(element_type);
        self
    }

    /// Declare `name` with the given content model
    pub fn element(self, name: &str, content: ContentModel) -> Result<Self> {
        Ok(self.declare(ElementType::new(name, content)?))
    }

    pub fn element_with_attributes(
        self,
        name: &str,
        content: ContentModel,
        attributes: impl IntoIterator<Item = AttributeSpec>,
    ) -> Result<Self> {
        Ok(self.declare(ElementType::with_attributes(name, content, attributes)?))
    }

    /// Resolve every reference and freeze the declarations
    pub fn build(self) -> Result<Schema> {
        let mut types = HashMap::with_capacity(self.declarations.len());
        let mut order = Vec::with_capacity(self.declarations.len());

        for element_type in self.declarations {
            let name = element_type.name().to_string();
            if types.contains_key(&name) {
                return Err(ModelError::ModelDefinition {
                    element: name,
                    reason: "declared more than once".to_string(),
                });
            }
            order.push(name.clone());
            types.insert(name, element_type);
        }

        for name in &order {
            let element_type = &types[name];
            if let Some(missing) = element_type
                .referenced_types()
                .into_iter()
                .find(|reference| !types.contains_key(*reference))
            {
                return Err(ModelError::ModelDefinition {
                    element: name.clone(),
                    reason: format!("refers to undeclared element type <{}>", missing),
                });
            }
        }

        debug!("built schema with {} element type(s)", order.len());
        Ok(Schema { types, order })
    }
}

/// Element type declarations keyed by tag name
#[derive(Debug, Clone)]
pub struct Schema {
    types: HashMap<String, Arc<ElementType>>,
    order: Vec<String>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ElementType>> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Declared tag names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// A fresh, empty element of the declared type `name`
    pub fn create(&self, name: &str) -> Result<Element> {
        self.lookup(name).map(Element::new)
    }

    /// A text-only element of the declared type `name` holding `text`
    pub fn create_text(&self, name: &str, text: impl Into<String>) -> Result<Element> {
        Element::with_text(self.lookup(name)?, text)
    }

    /// Validate `root` and check that every element in it follows this schema's
    /// declaration for its tag
    pub fn validate(&self, root: &Element) -> std::result::Result<(), ValidationReport> {
        let mut report = match root.validate() {
            Ok(()) => ValidationReport::new(),
            Err(report) => report,
        };
        self.check_element(root, &format!("/{}", root.name()), &mut report);
        report.into_result()
    }

    fn lookup(&self, name: &str) -> Result<&Arc<ElementType>> {
        self.types
            .get(name)
            .ok_or_else(|| ModelError::UnknownElementType {
                name: name.to_string(),
            })
    }

    fn check_element(&self, element: &Element, path: &str, report: &mut ValidationReport) {
        match self.types.get(element.name()) {
            None => report.push(Violation::new(
                path,
                ModelError::UnknownElementType {
                    name: element.name().to_string(),
                },
            )),
            Some(declared)
                if !Arc::ptr_eq(declared, element.element_type())
                    && **declared != **element.element_type() =>
            {
                report.push(Violation::new(
                    path,
                    ModelError::TypeMismatch {
                        slot: element.name().to_string(),
                        expected: format!("<{}> declared as {}", declared.name(), declared.content()),
                        found: element.element_type().content().to_string(),
                    },
                ));
            }
            Some(_) => {}
        }

        self.check_slots(element.slots(), path, report);
    }

    fn check_slots(&self, slots: &[Slot], path: &str, report: &mut ValidationReport) {
        for slot in slots {
            match slot {
                Slot::Quantified(q) => {
                    for (i, item) in q.iter().enumerate() {
                        let child_path = format!("{}/{}[{}]", path, item.name(), i + 1);
                        self.check_element(item, &child_path, report);
                    }
                }
                Slot::Alternation(a) => match a.value() {
                    Some(Choice::Element(element)) => {
                        let child_path = format!("{}/{}", path, element.name());
                        self.check_element(element, &child_path, report);
                    }
                    Some(Choice::Group(group)) => self.check_group(group, path, report),
                    Some(Choice::Text(_)) | None => {}
                },
                Slot::Text(_) => {}
            }
        }
    }

    fn check_group(&self, group: &Group, path: &str, report: &mut ValidationReport) {
        self.check_slots(group.slots(), path, report);
    }
}
