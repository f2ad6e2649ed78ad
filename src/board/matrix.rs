// SPDX-License-Identifier: GPL-3.0-only

//! The laid-out key matrix.
//!
//! [`KeyMatrix`] owns the grid of [`KeyState`]s for the active layout and
//! a parallel grid of role behaviors. The matrix is rebuilt wholesale on
//! every layout switch; visual/interaction continuity for persisting keys
//! comes from the two-pass state transfer (collect by identity, re-apply
//! after the rebuild). Geometry is recomputed on every container resize.

use std::collections::HashMap;

use crate::board::key::{KeyState, PressState};
use crate::board::registry::{KeyBehavior, KeyRegistry};
use crate::geometry::Rect;
use crate::layout::sizing::{layout_row, row_height, unit_width};
use crate::layout::types::{KeyRows, KeySize};

/// Rows of laid-out keys with their role behaviors.
#[derive(Default)]
pub struct KeyMatrix {
    rows: Vec<Vec<KeyState>>,
    behaviors: Vec<Vec<Box<dyn KeyBehavior>>>,
    key_width: i32,
    key_height: i32,
}

impl KeyMatrix {
    /// Creates an empty matrix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the matrix with a new layout.
    ///
    /// Interaction state and label caches of keys that persist across the
    /// switch are preserved: before discarding the old keys their state is
    /// collected under each key's identity (or bounds, absent one), and
    /// after the rebuild every new key that matches picks its state back
    /// up. `container` is the keyboard-local rectangle to lay out into.
    pub fn rebuild(
        &mut self,
        layout: &KeyRows,
        container: Rect,
        gap: f64,
        registry: &KeyRegistry,
    ) {
        let preserved = self.preserve_states();

        self.rows = Vec::with_capacity(layout.len());
        self.behaviors = Vec::with_capacity(layout.len());
        for row_defs in layout {
            let mut row = Vec::with_capacity(row_defs.len());
            let mut behavior_row = Vec::with_capacity(row_defs.len());
            for def in row_defs {
                let mut key = KeyState::new(def.clone());
                let mut behavior = registry.instantiate(&def.role);
                behavior.on_init(&mut key);
                row.push(key);
                behavior_row.push(behavior);
            }
            self.rows.push(row);
            self.behaviors.push(behavior_row);
        }

        self.recalculate(container, gap);
        self.apply_states(&preserved);

        tracing::debug!(
            rows = self.rows.len(),
            keys = self.rows.iter().map(Vec::len).sum::<usize>(),
            "rebuilt key matrix"
        );
    }

    /// Recomputes every key rectangle for a container size.
    ///
    /// No-op for an empty matrix or container.
    pub fn recalculate(&mut self, container: Rect, gap: f64) {
        if self.rows.is_empty() || container.is_empty() {
            return;
        }

        self.key_width = unit_width(container.width);
        self.key_height = row_height(container.height, self.rows.len());

        for (i, (row, behavior_row)) in self.rows.iter_mut().zip(&mut self.behaviors).enumerate() {
            let specs: Vec<KeySize> = row.iter().map(|key| key.def().size).collect();
            let rects = layout_row(
                &specs,
                container.width,
                self.key_width,
                self.key_height * i as i32,
                self.key_height,
            );
            for ((key, behavior), rect) in row.iter_mut().zip(behavior_row.iter_mut()).zip(rects) {
                let previous = key.resize(rect, gap);
                behavior.on_resize(key, previous);
            }
        }
    }

    /// Runs the per-tick key updates: label refresh and role behaviors.
    pub fn update(&mut self, delta: f64, shift_active: bool) {
        for (row, behavior_row) in self.rows.iter_mut().zip(&mut self.behaviors) {
            for (key, behavior) in row.iter_mut().zip(behavior_row.iter_mut()) {
                key.sync_labels(shift_active);
                behavior.on_update(key, delta);
            }
        }
    }

    /// Finds the key containing a keyboard-local point.
    #[must_use]
    pub fn key_at(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        for (row_index, row) in self.rows.iter().enumerate() {
            for (col_index, key) in row.iter().enumerate() {
                if key.bounds().contains(x, y) {
                    return Some((row_index, col_index));
                }
            }
        }
        None
    }

    /// The key at a grid position.
    #[must_use]
    pub fn key(&self, row: usize, col: usize) -> Option<&KeyState> {
        self.rows.get(row)?.get(col)
    }

    /// Mutable access to the key at a grid position.
    pub fn key_mut(&mut self, row: usize, col: usize) -> Option<&mut KeyState> {
        self.rows.get_mut(row)?.get_mut(col)
    }

    /// All rows of laid-out keys.
    #[must_use]
    pub fn rows(&self) -> &[Vec<KeyState>] {
        &self.rows
    }

    /// Whether the matrix holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Base column unit width from the last recalculation.
    #[must_use]
    pub fn key_width(&self) -> i32 {
        self.key_width
    }

    /// Row height from the last recalculation.
    #[must_use]
    pub fn key_height(&self) -> i32 {
        self.key_height
    }

    /// Resets every key's press state to idle.
    pub fn clear_press_states(&mut self) {
        for row in &mut self.rows {
            for key in row {
                key.set_press_state(PressState::Idle);
            }
        }
    }

    fn preserve_states(&self) -> HashMap<String, KeyState> {
        let mut preserved = HashMap::new();
        for row in &self.rows {
            for key in row {
                preserved.insert(key.state_key(), key.clone());
            }
        }
        preserved
    }

    fn apply_states(&mut self, preserved: &HashMap<String, KeyState>) {
        if preserved.is_empty() {
            return;
        }
        for row in &mut self.rows {
            for key in row {
                if let Some(previous) = preserved.get(&key.state_key()) {
                    key.apply_states(previous);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::KeyDef;

    fn star_key(id: Option<&str>) -> KeyDef {
        KeyDef {
            identity: id.map(str::to_string),
            size: KeySize::Star,
            ..KeyDef::text(" ")
        }
    }

    fn container() -> Rect {
        Rect::new(0.0, 0.0, 1300.0, 200.0)
    }

    fn simple_layout() -> KeyRows {
        vec![
            vec![KeyDef::text("q"), KeyDef::text("w"), KeyDef::text("e")],
            vec![KeyDef::text("a"), star_key(Some("space")), KeyDef::text("s")],
        ]
    }

    #[test]
    fn test_rebuild_lays_out_unit_grid() {
        let mut matrix = KeyMatrix::new();
        matrix.rebuild(&simple_layout(), container(), 2.0, &KeyRegistry::new());

        assert_eq!(matrix.key_width(), 100, "1300 / 13 reference columns");
        assert_eq!(matrix.key_height(), 100, "200 / 2 rows");

        let q = matrix.key(0, 0).unwrap();
        assert_eq!(q.bounds(), Rect::new(0.0, 0.0, 100.0, 100.0));

        let space = matrix.key(1, 1).unwrap();
        assert_eq!(space.bounds().width, 1100.0, "star key takes the rest");
        assert_eq!(space.bounds().y, 100.0);
    }

    #[test]
    fn test_key_at_hit_and_miss() {
        let mut matrix = KeyMatrix::new();
        matrix.rebuild(&simple_layout(), container(), 2.0, &KeyRegistry::new());

        assert_eq!(matrix.key_at(50.0, 50.0), Some((0, 0)));
        assert_eq!(matrix.key_at(150.0, 150.0), Some((1, 1)));
        assert_eq!(matrix.key_at(400.0, 50.0), None, "blank gap misses");
        assert_eq!(matrix.key_at(-10.0, 50.0), None);
    }

    #[test]
    fn test_state_transfer_by_identity() {
        let mut matrix = KeyMatrix::new();
        matrix.rebuild(&simple_layout(), container(), 2.0, &KeyRegistry::new());

        matrix
            .key_mut(1, 1)
            .unwrap()
            .set_press_state(PressState::Hover);
        matrix.update(0.016, false);
        matrix.key_mut(1, 1).unwrap().primary_label_mut().mark_clean();

        // The second layout moves the identified key to another position.
        let other_layout: KeyRows = vec![
            vec![star_key(Some("space")), KeyDef::text("z")],
            vec![KeyDef::text("x"), KeyDef::text("c")],
        ];
        matrix.rebuild(&other_layout, container(), 2.0, &KeyRegistry::new());

        let space = matrix.key(0, 0).unwrap();
        assert_eq!(
            space.press_state(),
            PressState::Hover,
            "identity-matched key keeps its interaction state"
        );
        assert!(
            !space.primary_label().is_dirty(),
            "identity-matched key keeps its shaped label"
        );

        let fresh = matrix.key(0, 1).unwrap();
        assert_eq!(fresh.press_state(), PressState::Idle);
    }

    #[test]
    fn test_state_transfer_by_bounds_fallback() {
        let mut matrix = KeyMatrix::new();
        matrix.rebuild(&simple_layout(), container(), 2.0, &KeyRegistry::new());
        matrix
            .key_mut(0, 0)
            .unwrap()
            .set_press_state(PressState::Down);

        // Same geometry, no identities: the bounds key matches.
        matrix.rebuild(&simple_layout(), container(), 2.0, &KeyRegistry::new());
        assert_eq!(matrix.key(0, 0).unwrap().press_state(), PressState::Down);
    }

    #[test]
    fn test_recalculate_ignores_degenerate_container() {
        let mut matrix = KeyMatrix::new();
        matrix.rebuild(&simple_layout(), container(), 2.0, &KeyRegistry::new());
        let before = matrix.key(0, 0).unwrap().bounds();

        matrix.recalculate(Rect::ZERO, 2.0);
        assert_eq!(
            matrix.key(0, 0).unwrap().bounds(),
            before,
            "degenerate container leaves geometry untouched"
        );
    }

    #[test]
    fn test_clear_press_states() {
        let mut matrix = KeyMatrix::new();
        matrix.rebuild(&simple_layout(), container(), 2.0, &KeyRegistry::new());
        matrix
            .key_mut(0, 1)
            .unwrap()
            .set_press_state(PressState::Holding);

        matrix.clear_press_states();
        assert_eq!(matrix.key(0, 1).unwrap().press_state(), PressState::Idle);
    }

    #[test]
    fn test_update_syncs_labels_and_behaviors() {
        use crate::board::registry::KeyBehavior;
        use std::cell::Cell;
        use std::rc::Rc;

        struct Probe {
            ticks: Rc<Cell<u32>>,
        }
        impl KeyBehavior for Probe {
            fn on_update(&mut self, _key: &mut KeyState, _delta: f64) {
                self.ticks.set(self.ticks.get() + 1);
            }
        }

        let ticks = Rc::new(Cell::new(0));
        let probe_ticks = Rc::clone(&ticks);
        let mut registry = KeyRegistry::new();
        registry.register("probe", move || {
            Box::new(Probe {
                ticks: Rc::clone(&probe_ticks),
            })
        });

        let mut probed = KeyDef::text("p");
        probed.role = "probe".to_string();
        let layout: KeyRows = vec![vec![probed]];

        let mut matrix = KeyMatrix::new();
        matrix.rebuild(&layout, container(), 2.0, &registry);
        matrix.update(0.016, true);

        assert_eq!(ticks.get(), 1);
        assert_eq!(matrix.key(0, 0).unwrap().primary_label().text(), "P");
    }
}
