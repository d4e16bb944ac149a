use std::fmt;

use thiserror::Error;

use crate::model::Quantifier;

/// Main library error type covering every way a content model can be violated
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("type mismatch in `{slot}`: expected {expected}, found {found}")]
    TypeMismatch {
        slot: String,
        expected: String,
        found: String,
    },

    #[error("cardinality violated in `{slot}` ({quantifier}): {count} item(s), {bound}")]
    Cardinality {
        slot: String,
        quantifier: Quantifier,
        count: usize,
        bound: CardinalityBound,
    },

    #[error("alternation `{slot}` requires a value but none is set")]
    EmptyAlternation { slot: String },

    #[error("invalid content model for <{element}>: {reason}")]
    ModelDefinition { element: String, reason: String },

    #[error("<{element}> has no slot named `{slot}`")]
    UnknownSlot { element: String, slot: String },

    #[error("slot `{slot}` is {found}, not {expected}")]
    WrongSlotKind {
        slot: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("index {index} out of range for `{slot}` holding {len} item(s)")]
    IndexOutOfRange {
        slot: String,
        index: usize,
        len: usize,
    },

    #[error("<{element}> declares no attribute `{attribute}`")]
    UnknownAttribute { element: String, attribute: String },

    #[error("<{element}> is missing required attribute `{attribute}`")]
    MissingAttribute { element: String, attribute: String },

    #[error("character {character:?} is not allowed in XML ({context})")]
    InvalidCharacter { context: String, character: char },

    #[error("element type <{name}> is not declared")]
    UnknownElementType { name: String },

    #[error("document is invalid: {0}")]
    Invalid(ValidationReport),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which end of a quantifier's range an operation ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardinalityBound {
    Minimum(usize),
    Maximum(usize),
}

impl fmt::Display for CardinalityBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardinalityBound::Minimum(min) => write!(f, "minimum is {}", min),
            CardinalityBound::Maximum(max) => write!(f, "maximum is {}", max),
        }
    }
}

/// A single problem found while validating a tree, located by its path
#[derive(Debug)]
pub struct Violation {
    pub path: String,
    pub error: ModelError,
}

impl Violation {
    pub fn new(path: impl Into<String>, error: ModelError) -> Self {
        Self {
            path: path.into(),
            error,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.error)
    }
}

/// Every violation found in one validation pass, in document order
#[derive(Debug, Default)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn extend(&mut self, other: ValidationReport) {
        self.violations.extend(other.violations);
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    /// `Ok(())` when nothing was found, otherwise the report itself
    pub fn into_result(self) -> std::result::Result<(), ValidationReport> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} violation(s)", self.violations.len())?;
        for violation in &self.violations {
            write!(f, "; {}", violation)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

impl From<ValidationReport> for ModelError {
    fn from(report: ValidationReport) -> Self {
        ModelError::Invalid(report)
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ModelError>;
