// SPDX-License-Identifier: GPL-3.0-only

//! Per-key runtime state.
//!
//! A [`KeyState`] is a laid-out instance of a [`KeyDef`]: pixel bounds,
//! press state, and the cached label strings the external renderer shapes
//! into glyphs. Keys are replaced wholesale on re-layout; continuity comes
//! from [`KeyState::apply_states`], which transfers the interaction state
//! and label caches from the previous instance.

use crate::geometry::Rect;
use crate::layout::types::KeyDef;

/// Interaction state of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PressState {
    /// Not interacted with.
    #[default]
    Idle,
    /// Pointer over the key.
    Hover,
    /// Pointer pressed on the key.
    Down,
    /// Held past the holding delay.
    Holding,
}

/// Cached label text with a dirty bit.
///
/// Font shaping happens outside this crate; the cache lets the renderer
/// re-shape only when the text actually changed, and survives layout
/// switches through state transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelCache {
    text: String,
    dirty: bool,
}

impl LabelCache {
    /// Sets the text, marking the cache dirty on change.
    pub fn set_text(&mut self, text: &str) {
        if self.text != text {
            self.text = text.to_string();
            self.dirty = true;
        }
    }

    /// The current text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the renderer needs to re-shape this label.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Marks the label as shaped.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

/// Vertical stretch applied to the primary text box.
const PRIMARY_HEIGHT_MODIFIER: f64 = 2.35;

/// Vertical centering correction for icon glyphs.
const ICON_CENTER_CORRECTION: f64 = 1.08;

/// A laid-out key.
#[derive(Debug, Clone)]
pub struct KeyState {
    def: KeyDef,
    bounds: Rect,
    primary_bounds: Rect,
    secondary_bounds: Rect,
    press_state: PressState,
    primary_label: LabelCache,
    secondary_label: LabelCache,
}

impl KeyState {
    /// Creates an un-laid-out key for a definition.
    #[must_use]
    pub fn new(def: KeyDef) -> Self {
        Self {
            def,
            bounds: Rect::ZERO,
            primary_bounds: Rect::ZERO,
            secondary_bounds: Rect::ZERO,
            press_state: PressState::Idle,
            primary_label: LabelCache::default(),
            secondary_label: LabelCache::default(),
        }
    }

    /// The key's definition.
    #[must_use]
    pub fn def(&self) -> &KeyDef {
        &self.def
    }

    /// Total bounds of the key, local to its layer.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Bounds of the display text, local to the key.
    #[must_use]
    pub fn primary_bounds(&self) -> Rect {
        self.primary_bounds
    }

    /// Bounds of the secondary (first extra key) preview, local to the key.
    #[must_use]
    pub fn secondary_bounds(&self) -> Rect {
        self.secondary_bounds
    }

    /// Current interaction state.
    #[must_use]
    pub fn press_state(&self) -> PressState {
        self.press_state
    }

    /// Sets the interaction state.
    pub fn set_press_state(&mut self, state: PressState) {
        self.press_state = state;
    }

    /// The primary label cache.
    #[must_use]
    pub fn primary_label(&self) -> &LabelCache {
        &self.primary_label
    }

    /// Mutable access for the renderer to mark the label shaped.
    pub fn primary_label_mut(&mut self) -> &mut LabelCache {
        &mut self.primary_label
    }

    /// The secondary label cache.
    #[must_use]
    pub fn secondary_label(&self) -> &LabelCache {
        &self.secondary_label
    }

    /// Mutable access for the renderer to mark the label shaped.
    pub fn secondary_label_mut(&mut self) -> &mut LabelCache {
        &mut self.secondary_label
    }

    /// Moves the key to new bounds and recomputes its text boxes.
    ///
    /// Returns the previous bounds.
    pub fn resize(&mut self, bounds: Rect, gap: f64) -> Rect {
        let previous = self.bounds;
        self.bounds = bounds;
        self.recalculate_bounds(gap);
        previous
    }

    /// Recalculates the primary and secondary text boxes.
    ///
    /// The primary box is centered; the secondary box sits in the upper
    /// left corner where the first extra key is previewed.
    fn recalculate_bounds(&mut self, gap: f64) {
        let middle_x = self.bounds.width / 2.0;
        let mut middle_y = self.bounds.height / 2.0;
        let width_half = (middle_x - gap * 2.0).max(1.0) / 2.0;
        let height_half = (middle_y - gap * 2.0).max(1.0) / 2.0;

        if self.def.is_icon() {
            middle_y *= ICON_CENTER_CORRECTION;
        }

        self.primary_bounds = Rect::new(
            (middle_x - width_half).max(0.0),
            (middle_y - height_half).max(0.0),
            width_half * 2.0,
            height_half * PRIMARY_HEIGHT_MODIFIER,
        );

        let secondary_height = (self.bounds.height / 4.0).max(0.0);
        self.secondary_bounds = Rect::new(
            gap + 5.0,
            gap + 2.0 + secondary_height / 4.0,
            (self.bounds.width - gap * 2.0 - 10.0).max(0.0),
            secondary_height,
        );
    }

    /// Refreshes the label caches from the definition.
    ///
    /// `shift_active` selects the capitalization of textual labels.
    pub fn sync_labels(&mut self, shift_active: bool) {
        let primary = if self.def.is_icon() {
            self.def.icon.clone().unwrap_or_default()
        } else {
            shifted_text(&self.def, &self.def.display_text, shift_active)
        };
        self.primary_label.set_text(&primary);

        if self.def.show_secondary {
            if let Some(extra) = self.def.extra_keys.first() {
                let secondary = if extra.is_icon() {
                    extra.icon.clone().unwrap_or_default()
                } else {
                    shifted_text(extra, &extra.display_text, shift_active)
                };
                self.secondary_label.set_text(&secondary);
            }
        }
    }

    /// Key under which interaction state is preserved across layout
    /// switches: the declared identity, or the bounds as a fallback.
    #[must_use]
    pub fn state_key(&self) -> String {
        match &self.def.identity {
            Some(identity) if !identity.is_empty() => identity.clone(),
            _ => self.bounds.to_string(),
        }
    }

    /// Copies the preserved interaction state from a previous instance.
    ///
    /// Keeps hover/press state and the shaped label caches so persisting
    /// keys (the space bar, modifiers) do not flicker through a re-layout.
    pub fn apply_states(&mut self, previous: &KeyState) {
        self.press_state = previous.press_state;
        self.primary_bounds = previous.primary_bounds;
        self.secondary_bounds = previous.secondary_bounds;
        self.primary_label = previous.primary_label.clone();
        self.secondary_label = previous.secondary_label.clone();
    }
}

/// Applies shift capitalization to a key's text, honoring `ignore_cap`.
#[must_use]
pub fn shifted_text(def: &KeyDef, text: &str, shift_active: bool) -> String {
    if def.ignore_cap {
        return text.to_string();
    }
    if shift_active {
        text.to_uppercase()
    } else {
        text.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::KeyDef;

    #[test]
    fn test_resize_returns_previous_bounds() {
        let mut key = KeyState::new(KeyDef::text("a"));
        let first = Rect::new(0.0, 0.0, 100.0, 50.0);
        let second = Rect::new(100.0, 0.0, 100.0, 50.0);

        assert_eq!(key.resize(first, 2.0), Rect::ZERO);
        assert_eq!(key.resize(second, 2.0), first);
        assert_eq!(key.bounds(), second);
    }

    #[test]
    fn test_text_boxes_are_key_local() {
        let mut key = KeyState::new(KeyDef::text("a"));
        key.resize(Rect::new(200.0, 100.0, 100.0, 60.0), 3.0);

        let primary = key.primary_bounds();
        assert!(primary.x >= 0.0 && primary.x < 100.0, "local coordinates");
        assert!(primary.width > 0.0);

        let secondary = key.secondary_bounds();
        assert_eq!(secondary.x, 8.0, "gap + 5");
        assert_eq!(secondary.height, 15.0, "quarter of the key height");
    }

    #[test]
    fn test_degenerate_bounds_do_not_go_negative() {
        let mut key = KeyState::new(KeyDef::text("a"));
        key.resize(Rect::new(0.0, 0.0, 4.0, 4.0), 3.0);

        assert!(key.primary_bounds().width >= 0.0);
        assert!(key.secondary_bounds().width >= 0.0);
    }

    #[test]
    fn test_sync_labels_tracks_shift() {
        let mut key = KeyState::new(KeyDef::text("a"));

        key.sync_labels(false);
        assert_eq!(key.primary_label().text(), "a");
        assert!(key.primary_label().is_dirty());

        key.primary_label_mut().mark_clean();
        key.sync_labels(false);
        assert!(!key.primary_label().is_dirty(), "unchanged text stays clean");

        key.sync_labels(true);
        assert_eq!(key.primary_label().text(), "A");
        assert!(key.primary_label().is_dirty());
    }

    #[test]
    fn test_ignore_cap_skips_capitalization() {
        let mut def = KeyDef::text("Tab");
        def.ignore_cap = true;
        let mut key = KeyState::new(def);

        key.sync_labels(true);
        assert_eq!(key.primary_label().text(), "Tab");
    }

    #[test]
    fn test_icon_label_wins_over_text() {
        let mut def = KeyDef::text("backspace");
        def.icon = Some("\u{e750}".to_string());
        let mut key = KeyState::new(def);

        key.sync_labels(false);
        assert_eq!(key.primary_label().text(), "\u{e750}");
    }

    #[test]
    fn test_secondary_label_previews_first_extra_key() {
        let mut def = KeyDef::text("e");
        def.show_secondary = true;
        def.extra_keys = vec![KeyDef::text("é"), KeyDef::text("è")];
        let mut key = KeyState::new(def);

        key.sync_labels(false);
        assert_eq!(key.secondary_label().text(), "é");
    }

    #[test]
    fn test_state_key_prefers_identity() {
        let mut def = KeyDef::text(" ");
        def.identity = Some("space".to_string());
        let mut key = KeyState::new(def);
        key.resize(Rect::new(0.0, 0.0, 100.0, 50.0), 2.0);
        assert_eq!(key.state_key(), "space");

        let mut anonymous = KeyState::new(KeyDef::text("a"));
        anonymous.resize(Rect::new(10.0, 20.0, 30.0, 40.0), 2.0);
        assert_eq!(anonymous.state_key(), "10,20 30x40");
    }

    #[test]
    fn test_apply_states_transfers_interaction_state() {
        let mut old = KeyState::new(KeyDef::text("a"));
        old.resize(Rect::new(0.0, 0.0, 100.0, 50.0), 2.0);
        old.set_press_state(PressState::Hover);
        old.sync_labels(false);
        old.primary_label_mut().mark_clean();

        let mut new = KeyState::new(KeyDef::text("a"));
        new.apply_states(&old);

        assert_eq!(new.press_state(), PressState::Hover);
        assert_eq!(new.primary_label().text(), "a");
        assert!(
            !new.primary_label().is_dirty(),
            "transferred labels keep their shaped state"
        );
        assert_eq!(new.primary_bounds(), old.primary_bounds());
    }
}
