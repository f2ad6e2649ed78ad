// SPDX-License-Identifier: GPL-3.0-only

//! Observer plumbing for keyboard notifications.
//!
//! Subscribers are plain closures held in registration order and fired
//! synchronously. Payloads are passed by mutable reference so cancellable
//! events (popup opening) can be vetoed by a subscriber.

use crate::geometry::{Rect, Size};
use crate::layout::types::{KeyAction, KeyModifier};

/// An ordered list of subscribers for one event type.
///
/// `emit` fires every subscriber registered at call time, in registration
/// order, on the calling thread.
pub struct Observers<E> {
    subscribers: Vec<Box<dyn FnMut(&mut E)>>,
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }
}

impl<E> Observers<E> {
    /// Creates an empty subscriber list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber. Subscribers cannot be removed; they live as
    /// long as the list.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&mut E) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Fires all current subscribers with the given payload.
    pub fn emit(&mut self, event: &mut E) {
        for subscriber in &mut self.subscribers {
            subscriber(event);
        }
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Whether no subscriber is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

/// Fired when the canvas size or resolved keyboard bounds change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeEvent {
    /// Full canvas size.
    pub canvas: Size,
    /// Resolved keyboard bounds inside the canvas.
    pub bounds: Rect,
}

/// Fired when the active layout or language changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutChangedEvent {
    /// Selected language identifier, upper-cased.
    pub language: Option<String>,
    /// Selected layout name within the language's config.
    pub layout: Option<String>,
}

/// Fired when a key has been triggered.
///
/// Translating the action into actual keystroke injection is the
/// subscriber's job; the core only reports what was triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyActionEvent {
    /// The triggered action.
    pub action: KeyAction,
    /// Insertion text, already capitalized according to the active
    /// modifiers, when the action carries text.
    pub text: Option<String>,
    /// Modifiers that were active when the action fired.
    pub modifiers: Vec<KeyModifier>,
}

/// Fired before the extra-keys popup opens. Cancellable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopupOpenEvent {
    /// Set by a subscriber to veto the popup.
    pub prevent_opening: bool,
}
