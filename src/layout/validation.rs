// SPDX-License-Identifier: GPL-3.0-only

//! Advisory validation for layout configurations.
//!
//! The runtime never rejects a layout — degenerate input degrades to blank
//! gaps or empty matrices instead of faulting. This pass exists for the
//! configuration boundary: it reports the problems a layout author would
//! want to hear about before shipping a file.

use std::collections::HashSet;
use std::fmt;

use crate::layout::types::{KeyAction, LayoutConfig};

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The layout will render wrongly or not at all.
    Error,
    /// Suspicious but renderable.
    Warning,
}

/// A problem found in a layout configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Severity level.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// Path to the offending field (e.g. `layouts.default[1][3]`).
    pub field_path: String,
    /// Optional hint for fixing the issue.
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    /// Creates a new issue.
    #[must_use]
    pub fn new(
        severity: Severity,
        message: impl Into<String>,
        field_path: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            field_path: field_path.into(),
            suggestion: None,
        }
    }

    /// Attaches a fix suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        };
        write!(f, "[{}] {}: {}", severity, self.field_path, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

/// Validates a layout configuration, returning every issue found.
///
/// An empty result means the configuration is clean.
#[must_use]
pub fn validate_config(config: &LayoutConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if config.layouts.is_empty() {
        issues.push(ValidationIssue::new(
            Severity::Error,
            "configuration contains no layouts",
            "layouts",
        ));
        return issues;
    }

    for (name, rows) in &config.layouts {
        let path = format!("layouts.{name}");
        if rows.is_empty() {
            issues.push(ValidationIssue::new(
                Severity::Error,
                "layout has no rows",
                path,
            ));
            continue;
        }

        let mut identities = HashSet::new();
        for (row_index, row) in rows.iter().enumerate() {
            if row.is_empty() {
                issues.push(ValidationIssue::new(
                    Severity::Error,
                    "row has no keys",
                    format!("{path}[{row_index}]"),
                ));
                continue;
            }

            for (key_index, key) in row.iter().enumerate() {
                let key_path = format!("{path}[{row_index}][{key_index}]");

                if !key.size.is_star() && key.size.value() <= 0.0 {
                    issues.push(
                        ValidationIssue::new(
                            Severity::Error,
                            format!("key size {} would collapse the key", key.size.value()),
                            key_path.clone(),
                        )
                        .with_suggestion("use a positive multiplier or \"*\""),
                    );
                }

                if let Some(identity) = &key.identity {
                    if !identities.insert(identity.clone()) {
                        issues.push(
                            ValidationIssue::new(
                                Severity::Warning,
                                format!("duplicate key identity '{identity}'"),
                                key_path.clone(),
                            )
                            .with_suggestion(
                                "identities must be unique for state preservation to match keys",
                            ),
                        );
                    }
                }

                if key.action == KeyAction::InsertText
                    && key.display_text.is_empty()
                    && key.insertion_text.is_none()
                    && !key.is_icon()
                {
                    issues.push(ValidationIssue::new(
                        Severity::Warning,
                        "insert key has no text to insert",
                        key_path,
                    ));
                }
            }
        }
    }

    issues
}
