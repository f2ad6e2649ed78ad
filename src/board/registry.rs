// SPDX-License-Identifier: GPL-3.0-only

//! Role-based key behavior registry.
//!
//! A key's `role` string selects special behavior (modifiers, layout
//! switchers, custom widgets). The registry maps roles to factories that
//! produce a [`KeyBehavior`] per key instance; unregistered roles fall back
//! to the default behavior.

use std::collections::HashMap;

use crate::board::key::KeyState;
use crate::geometry::Rect;

/// Per-key-instance behavior hooks.
///
/// All hooks have no-op defaults; implementors override what they need.
pub trait KeyBehavior {
    /// Called once after the key instance is created.
    fn on_init(&mut self, _key: &mut KeyState) {}

    /// Called once per tick for the key.
    fn on_update(&mut self, _key: &mut KeyState, _delta: f64) {}

    /// Called after the key's bounds changed.
    fn on_resize(&mut self, _key: &mut KeyState, _previous_bounds: Rect) {}
}

/// The behavior used when a role has no registration.
#[derive(Debug, Default)]
pub struct DefaultKeyBehavior;

impl KeyBehavior for DefaultKeyBehavior {}

type BehaviorFactory = Box<dyn Fn() -> Box<dyn KeyBehavior>>;

/// Maps role strings to behavior factories.
#[derive(Default)]
pub struct KeyRegistry {
    factories: HashMap<String, BehaviorFactory>,
}

impl KeyRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory for a role, replacing any previous one.
    pub fn register(
        &mut self,
        role: impl Into<String>,
        factory: impl Fn() -> Box<dyn KeyBehavior> + 'static,
    ) {
        self.factories.insert(role.into(), Box::new(factory));
    }

    /// Whether a role has a registered factory.
    #[must_use]
    pub fn is_registered(&self, role: &str) -> bool {
        self.factories.contains_key(role)
    }

    /// Produces a behavior for a role, falling back to
    /// [`DefaultKeyBehavior`] when the role is unregistered.
    #[must_use]
    pub fn instantiate(&self, role: &str) -> Box<dyn KeyBehavior> {
        match self.factories.get(role) {
            Some(factory) => factory(),
            None => Box::new(DefaultKeyBehavior),
        }
    }
}
