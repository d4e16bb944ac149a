use crate::config::ReportConfig;
use crate::error::{ModelError, ValidationReport, Violation};
use log::warn;
use serde::{Deserialize, Serialize};

/// Verbosity levels for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerbosityLevel {
    /// Only count the violations
    Quiet,
    /// One line per violation
    #[default]
    Normal,
    /// Add a suggestion for each violation
    Verbose,
    /// Add the debug representation of each error
    Debug,
}

/// Formats validation reports with configurable verbosity
pub struct ErrorReporter {
    verbosity: VerbosityLevel,
    max_violations: Option<usize>,
}

impl ErrorReporter {
    /// Create a new error reporter with specified verbosity
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            max_violations: None,
        }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            verbosity: config.verbosity,
            max_violations: config.max_violations,
        }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    /// Log every line of the formatted report as a warning
    pub fn report(&self, report: &ValidationReport) {
        for line in self.format_report(report).lines() {
            warn!("{}", line);
        }
    }

    /// Render a whole report, truncated after `max_violations` entries
    pub fn format_report(&self, report: &ValidationReport) -> String {
        if report.is_empty() {
            return "No violations".to_string();
        }

        let mut output = format!("{} violation(s)", report.len());
        if self.verbosity == VerbosityLevel::Quiet {
            return output;
        }

        let limit = self.max_violations.unwrap_or(usize::MAX);
        for violation in report.iter().take(limit) {
            output.push('\n');
            output.push_str(&self.format_violation(violation));
        }
        if report.len() > limit {
            output.push_str(&format!("\n... and {} more", report.len() - limit));
        }

        output
    }

    /// Render one violation according to the verbosity level
    pub fn format_violation(&self, violation: &Violation) -> String {
        match self.verbosity {
            VerbosityLevel::Quiet => format!("INVALID: {}", violation.path),
            VerbosityLevel::Normal => violation.to_string(),
            VerbosityLevel::Verbose => self.format_violation_verbose(violation),
            VerbosityLevel::Debug => {
                let mut output = self.format_violation_verbose(violation);
                output.push_str(&format!("\n  Debug: {:?}", violation.error));
                output
            }
        }
    }

    fn format_violation_verbose(&self, violation: &Violation) -> String {
        let mut output = violation.to_string();
        if let Some(suggestion) = self.suggestion(&violation.error) {
            output.push_str("\n  Suggestion: ");
            output.push_str(&suggestion);
        }
        output
    }

    /// Get a hint for fixing an error
    fn suggestion(&self, error: &ModelError) -> Option<String> {
        match error {
            ModelError::Cardinality { slot, .. } => {
                Some(format!("Add or remove items in `{}` to satisfy its quantifier", slot))
            }
            ModelError::EmptyAlternation { slot } => {
                Some(format!("Set one of the permitted values on `{}`", slot))
            }
            ModelError::MissingAttribute { attribute, .. } => {
                Some(format!("Set the required attribute `{}`", attribute))
            }
            ModelError::InvalidCharacter { .. } => {
                Some("Remove control characters; XML 1.0 cannot represent them".to_string())
            }
            _ => None,
        }
    }
}
