// SPDX-License-Identifier: GPL-3.0-only

//! Layout data model and pixel sizing.
//!
//! [`types`] holds the serde data model for layout definitions, [`sizing`]
//! turns size specifications into pixel rectangles, [`resolver`] places
//! the keyboard surface inside its host canvas, and [`validation`] is the
//! advisory boundary check for layout authors.

pub mod resolver;
pub mod sizing;
pub mod types;
pub mod validation;

pub use resolver::{AspectRatioResolver, ResolvedBounds, SizeResolver};
pub use types::{KeyAction, KeyDef, KeyModifier, KeyRow, KeyRows, KeySize, LayoutConfig};
pub use validation::{validate_config, Severity, ValidationIssue};
