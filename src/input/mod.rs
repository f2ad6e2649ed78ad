// SPDX-License-Identifier: GPL-3.0-only

//! Pointer interaction state and the debounced hold timer.
//!
//! The keyboard routes pointer events through an [`InteractionMode`]: hits
//! resolve against the key matrix normally and against the popup layer
//! while it is open. [`PointerState`] carries the hover/press bookkeeping
//! between events, and [`hold`] contains the only asynchronous primitive
//! of the crate — the key-holding timer.

pub mod hold;

pub use hold::{HoldFired, HoldScheduler};

use crate::board::KeyRef;
use crate::geometry::Point;
use crate::layout::types::KeyModifier;

/// Which layer pointer events currently resolve against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Hit-test the key matrix.
    #[default]
    Keyboard,
    /// Hit-test the open popup.
    Popup,
}

/// Pointer bookkeeping between events.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerState {
    /// Last known pointer position in canvas coordinates.
    pub position: Point,
    /// Key currently under the pointer.
    pub hovering: Option<KeyRef>,
    /// Key the pointer went down on.
    pub down: Option<KeyRef>,
    /// Whether the holding action already fired for the current press
    /// (suppresses the normal action on release).
    pub has_invoked_holding: bool,
}

/// Tracks which modifiers are active.
///
/// Modifier keys toggle their modifier; inserting text clears all of them
/// (a modifier applies to the next insertion only).
#[derive(Debug, Clone, Default)]
pub struct ModifierState {
    active: Vec<KeyModifier>,
}

impl ModifierState {
    /// Creates a state with no active modifiers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates a modifier if it is not already active.
    pub fn activate(&mut self, modifier: KeyModifier) {
        if modifier != KeyModifier::None && !self.is_active(modifier) {
            self.active.push(modifier);
        }
    }

    /// Deactivates a modifier.
    pub fn deactivate(&mut self, modifier: KeyModifier) {
        self.active.retain(|active| *active != modifier);
    }

    /// Toggles a modifier and returns whether it is now active.
    pub fn toggle(&mut self, modifier: KeyModifier) -> bool {
        if self.is_active(modifier) {
            self.deactivate(modifier);
            false
        } else {
            self.activate(modifier);
            true
        }
    }

    /// Deactivates all modifiers.
    pub fn clear(&mut self) {
        self.active.clear();
    }

    /// Whether a modifier is active.
    #[must_use]
    pub fn is_active(&self, modifier: KeyModifier) -> bool {
        self.active.contains(&modifier)
    }

    /// Active modifiers in activation order.
    #[must_use]
    pub fn active(&self) -> &[KeyModifier] {
        &self.active
    }
}
