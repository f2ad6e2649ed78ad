// SPDX-License-Identifier: GPL-3.0-only

//! Extra-keys popup: positioning and hit-testing.
//!
//! Holding a key with alternatives opens a one-row popup above it. The
//! popup lays its keys out with the matrix's key unit, anchors itself to
//! the target key (left-aligned when the target sits in the left half of
//! the keyboard, right-aligned otherwise) and scales in around its own
//! midpoint through the shared animator.
//!
//! Hit-testing is deliberately forgiving: a direct hit wins, then the
//! original target key's own rectangle, then a horizontal band test that
//! ignores the y coordinate entirely so the pointer does not have to stay
//! on the narrow popup row.

use std::cell::RefCell;
use std::rc::Rc;

use crate::animation::animator::{AnimationHandle, Animator};
use crate::animation::frame::TransformFrame;
use crate::animation::timeline::TransformAnimation;
use crate::app_settings::POPUP_SCALE_IN_SECS;
use crate::board::key::KeyState;
use crate::board::matrix::KeyMatrix;
use crate::board::registry::{KeyBehavior, KeyRegistry};
use crate::board::KeyRef;
use crate::geometry::Rect;
use crate::layout::types::KeyDef;

/// The popup layer over the key matrix.
pub struct PopupLayer {
    target: Option<(usize, usize)>,
    target_bounds: Rect,
    keys: Vec<KeyState>,
    behaviors: Vec<Box<dyn KeyBehavior>>,
    bounds: Rect,
    animation: AnimationHandle,
}

impl Default for PopupLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl PopupLayer {
    /// Creates a closed popup layer with its scale-in animation prepared.
    #[must_use]
    pub fn new() -> Self {
        let mut animation = TransformAnimation::new();
        animation.add_frame(
            TransformFrame::builder()
                .duration(POPUP_SCALE_IN_SECS)
                .scale(0.0)
                .build(),
        );
        animation.add_frame(TransformFrame::builder().scale(1.0).build());

        Self {
            target: None,
            target_bounds: Rect::ZERO,
            keys: Vec::new(),
            behaviors: Vec::new(),
            bounds: Rect::ZERO,
            animation: Rc::new(RefCell::new(animation)),
        }
    }

    /// Opens the popup for a target key of the matrix.
    ///
    /// Builds the popup keys from the target's extra keys, inserts a
    /// non-interactive clone of the target itself (front when the target
    /// is in the left keyboard half, back otherwise), computes the bounds
    /// above the target and starts the scale-in animation. Unknown target
    /// positions are ignored.
    pub fn open(
        &mut self,
        target: (usize, usize),
        matrix: &KeyMatrix,
        keyboard_bounds: Rect,
        gap: f64,
        registry: &KeyRegistry,
        animator: &mut Animator,
    ) {
        let Some(target_key) = matrix.key(target.0, target.1) else {
            return;
        };
        let target_def = target_key.def().clone();

        self.target = Some(target);
        self.target_bounds = target_key.bounds();
        self.create_popup_keys(&target_def, keyboard_bounds, registry);
        self.calculate_bounds(matrix, keyboard_bounds, gap);
        animator.play(&self.animation, None);

        tracing::debug!(
            keys = self.keys.len(),
            bounds = %self.bounds,
            "opened extra-keys popup"
        );
    }

    /// Closes the popup: forces the animation to its end state and clears
    /// the target key.
    pub fn close(&mut self) {
        self.animation.borrow_mut().end();
        self.target = None;
        tracing::debug!("closed extra-keys popup");
    }

    /// Whether the popup is currently open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    /// Matrix position of the target key, while open.
    #[must_use]
    pub fn target(&self) -> Option<(usize, usize)> {
        self.target
    }

    /// Popup bounds in canvas coordinates.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The popup keys in display order.
    #[must_use]
    pub fn keys(&self) -> &[KeyState] {
        &self.keys
    }

    /// The popup key at an index.
    #[must_use]
    pub fn key(&self, index: usize) -> Option<&KeyState> {
        self.keys.get(index)
    }

    /// Mutable access to the popup key at an index.
    pub fn key_mut(&mut self, index: usize) -> Option<&mut KeyState> {
        self.keys.get_mut(index)
    }

    /// Handle of the scale animation, for renderers that apply the
    /// interpolated transform.
    #[must_use]
    pub fn animation(&self) -> &AnimationHandle {
        &self.animation
    }

    /// The currently interpolated transform of the scale animation.
    #[must_use]
    pub fn current_frame(&self) -> TransformFrame {
        self.animation.borrow().current_frame()
    }

    /// Runs the per-tick popup key updates while open.
    pub fn update(&mut self, delta: f64, shift_active: bool) {
        if self.target.is_none() {
            return;
        }
        for (key, behavior) in self.keys.iter_mut().zip(&mut self.behaviors) {
            key.sync_labels(shift_active);
            behavior.on_update(key, delta);
        }
    }

    /// Three-tier hit test, first match wins.
    ///
    /// 1. Direct containment against the popup keys, in popup-local
    ///    coordinates.
    /// 2. Containment against the original target key, in keyboard
    ///    coordinates — the pointer may stay on the key that opened the
    ///    popup.
    /// 3. Horizontal band: any popup key whose x-range contains the point,
    ///    ignoring y entirely.
    ///
    /// `x`/`y` are canvas coordinates. A miss returns `None`, which is a
    /// normal outcome rather than an error.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64, keyboard_bounds: Rect) -> Option<KeyRef> {
        let local_x = x - self.bounds.x;
        let local_y = y - self.bounds.y;
        let keyboard_x = x - keyboard_bounds.x;
        let keyboard_y = y - keyboard_bounds.y;

        for (index, key) in self.keys.iter().enumerate() {
            if key.bounds().contains(local_x, local_y) {
                return Some(KeyRef::Popup { index });
            }
        }

        if let Some((row, col)) = self.target {
            if self.target_bounds.contains(keyboard_x, keyboard_y) {
                return Some(KeyRef::Matrix { row, col });
            }
        }

        for (index, key) in self.keys.iter().enumerate() {
            if local_x >= key.bounds().x && local_x <= key.bounds().right() {
                return Some(KeyRef::Popup { index });
            }
        }

        None
    }

    fn create_popup_keys(&mut self, target_def: &KeyDef, keyboard_bounds: Rect, registry: &KeyRegistry) {
        self.keys.clear();
        self.behaviors.clear();

        for extra in &target_def.extra_keys {
            self.push_key(extra.clone(), registry);
        }

        if !target_def.extra_keys.is_empty() {
            self.insert_target_clone(target_def, keyboard_bounds, registry);
        }
    }

    /// Inserts the non-interactive clone of the target key so the popup
    /// visually includes the key it came from.
    fn insert_target_clone(
        &mut self,
        target_def: &KeyDef,
        keyboard_bounds: Rect,
        registry: &KeyRegistry,
    ) {
        let clone = target_def.clone_for_popup();
        let mut key = KeyState::new(clone);
        let mut behavior = registry.instantiate(&target_def.role);
        behavior.on_init(&mut key);

        if self.target_is_on_left(keyboard_bounds) {
            self.keys.insert(0, key);
            self.behaviors.insert(0, behavior);
        } else {
            self.keys.push(key);
            self.behaviors.push(behavior);
        }
    }

    fn calculate_bounds(&mut self, matrix: &KeyMatrix, keyboard_bounds: Rect, gap: f64) {
        let width = f64::from(matrix.key_width());
        let height = f64::from(matrix.key_height());

        for (index, (key, behavior)) in
            self.keys.iter_mut().zip(&mut self.behaviors).enumerate()
        {
            let previous = key.resize(
                Rect::new(index as f64 * width, 0.0, width, height),
                gap,
            );
            behavior.on_resize(key, previous);
        }

        let popup_width = width * self.keys.len() as f64;
        let offset_y = (self.target_bounds.y - height).max(0.0);
        let x = if self.target_is_on_left(keyboard_bounds) {
            (self.target_bounds.x + self.target_bounds.width - popup_width).max(0.0)
        } else {
            self.target_bounds.x + width - popup_width.max(0.0)
        };

        self.bounds = Rect::new(
            x + keyboard_bounds.x,
            offset_y + keyboard_bounds.y,
            popup_width,
            height,
        );

        // The scale-in starts from the popup midpoint.
        self.animation.borrow_mut().adjust_frame(0, |frame| {
            frame.position(popup_width / 2.0, height / 2.0)
        });
    }

    fn target_is_on_left(&self, keyboard_bounds: Rect) -> bool {
        self.target_bounds.x < keyboard_bounds.width / 2.0
    }

    fn push_key(&mut self, def: KeyDef, registry: &KeyRegistry) {
        let mut behavior = registry.instantiate(&def.role);
        let mut key = KeyState::new(def);
        behavior.on_init(&mut key);
        self.keys.push(key);
        self.behaviors.push(behavior);
    }
}
