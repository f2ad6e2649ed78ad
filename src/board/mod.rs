// SPDX-License-Identifier: GPL-3.0-only

//! The keyboard hub.
//!
//! [`Keyboard`] ties the core together: it owns the registered layout
//! configurations, the resolved surface bounds, the laid-out key matrix,
//! the popup layer, the animator and the interaction state. External
//! collaborators drive it through a small surface — `set_canvas_size` from
//! the window, `update` from the render tick, the `pointer_*` methods from
//! the input source — and observe it through the event subscriptions. The
//! hub never draws or injects keystrokes; triggered keys are reported as
//! [`KeyActionEvent`]s.

pub mod key;
pub mod matrix;
pub mod popup;
pub mod registry;

pub use key::{KeyState, LabelCache, PressState};
pub use matrix::KeyMatrix;
pub use popup::PopupLayer;
pub use registry::{DefaultKeyBehavior, KeyBehavior, KeyRegistry};

use std::collections::HashMap;
use std::time::Duration;

use crate::animation::animator::Animator;
use crate::app_settings::HOLD_DELAY_MS;
use crate::board::key::shifted_text;
use crate::events::{
    KeyActionEvent, LayoutChangedEvent, Observers, PopupOpenEvent, ResizeEvent,
};
use crate::geometry::{Point, Rect, Size};
use crate::input::{HoldFired, HoldScheduler, InteractionMode, ModifierState, PointerState};
use crate::layout::resolver::{AspectRatioResolver, SizeResolver};
use crate::layout::types::{KeyAction, KeyDef, KeyModifier, LayoutConfig};

/// Identifies a key in either interaction layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyRef {
    /// A key of the matrix, by grid position.
    Matrix {
        /// Row index.
        row: usize,
        /// Column index within the row.
        col: usize,
    },
    /// A key of the open popup, by display order.
    Popup {
        /// Index into the popup's key list.
        index: usize,
    },
}

/// Observer lists for the keyboard's notifications.
#[derive(Default)]
pub struct KeyboardEvents {
    /// Canvas/bounds changes.
    pub resize: Observers<ResizeEvent>,
    /// Layout or language switches.
    pub layout_changed: Observers<LayoutChangedEvent>,
    /// Triggered key actions.
    pub key_action: Observers<KeyActionEvent>,
    /// Popup about to open (cancellable).
    pub popup_open: Observers<PopupOpenEvent>,
}

/// The on-screen keyboard core.
pub struct Keyboard {
    canvas_size: Size,
    bounds: Rect,
    gap: i32,
    size_resolver: Box<dyn SizeResolver>,
    configs: HashMap<String, LayoutConfig>,
    selected_language: Option<String>,
    selected_layout: Option<String>,
    matrix: KeyMatrix,
    popup: PopupLayer,
    animator: Animator,
    modifiers: ModifierState,
    registry: KeyRegistry,
    events: KeyboardEvents,
    pointer: PointerState,
    interaction_mode: InteractionMode,
    hold: HoldScheduler,
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Keyboard {
    /// Creates a keyboard with the default aspect-ratio size resolver and
    /// no layouts registered.
    #[must_use]
    pub fn new() -> Self {
        Self {
            canvas_size: Size::ZERO,
            bounds: Rect::ZERO,
            gap: 0,
            size_resolver: Box::new(AspectRatioResolver::default()),
            configs: HashMap::new(),
            selected_language: None,
            selected_layout: None,
            matrix: KeyMatrix::new(),
            popup: PopupLayer::new(),
            animator: Animator::new(),
            modifiers: ModifierState::new(),
            registry: KeyRegistry::new(),
            events: KeyboardEvents::default(),
            pointer: PointerState::default(),
            interaction_mode: InteractionMode::Keyboard,
            hold: HoldScheduler::new(),
        }
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Registers a layout configuration under a language identifier.
    ///
    /// The first registration selects itself (and its first layout) when
    /// nothing is selected yet. Loading configurations from files is the
    /// caller's concern.
    pub fn register_layouts(&mut self, language: &str, config: LayoutConfig) {
        let language = language.to_uppercase();
        self.configs.insert(language.clone(), config);
        tracing::debug!(%language, "registered layout configuration");

        if self.selected_language.is_none() {
            let layout = self.selected_layout.clone();
            self.switch_layout(Some(&language), layout.as_deref());
        }
        if self.selected_layout.is_none() {
            let language = self.selected_language.clone();
            let layout = language
                .as_deref()
                .and_then(|lang| self.configs.get(lang))
                .and_then(LayoutConfig::first_layout_name)
                .map(str::to_string);
            if layout.is_some() {
                self.switch_layout(language.as_deref(), layout.as_deref());
            }
        }
    }

    /// Switches the active language and layout.
    ///
    /// Fires the layout-changed observers and rebuilds the matrix (with
    /// state transfer) when the combination resolves to a registered
    /// layout; selections that do not resolve simply leave the old matrix
    /// in place.
    pub fn switch_layout(&mut self, language: Option<&str>, layout: Option<&str>) {
        self.selected_language = language.map(str::to_uppercase);
        self.selected_layout = layout.map(str::to_string);

        let resolves = match (&self.selected_language, &self.selected_layout) {
            (Some(language), Some(layout)) => self
                .configs
                .get(language)
                .is_some_and(|config| config.layouts.contains_key(layout)),
            _ => false,
        };
        if resolves {
            self.invalidate_layout();
        }
        self.invalidate_pointer_position();
    }

    /// Replaces the size resolver and re-resolves the current canvas.
    pub fn set_size_resolver(&mut self, resolver: Box<dyn SizeResolver>) {
        self.size_resolver = resolver;
        if !self.canvas_size.is_empty() {
            self.set_canvas_size(self.canvas_size);
        }
    }

    /// Mutable access to the role registry.
    ///
    /// Register role behaviors before switching to a layout that uses
    /// them; existing key instances are not retrofitted.
    pub fn registry_mut(&mut self) -> &mut KeyRegistry {
        &mut self.registry
    }

    // ========================================================================
    // External drivers
    // ========================================================================

    /// Applies a new canvas size: resolves the keyboard bounds and gap,
    /// fires the resize observers and recomputes the key rectangles.
    pub fn set_canvas_size(&mut self, canvas: Size) {
        self.canvas_size = canvas;
        let resolved = self.size_resolver.resolve(canvas);
        self.bounds = resolved.bounds;
        self.gap = resolved.gap;

        let mut event = ResizeEvent {
            canvas,
            bounds: self.bounds,
        };
        self.events.resize.emit(&mut event);

        let container = self.local_bounds();
        self.matrix.recalculate(container, f64::from(self.gap));
        tracing::debug!(bounds = %self.bounds, gap = self.gap, "resized keyboard");
    }

    /// Advances the keyboard by one tick.
    ///
    /// Consumes hold-timer firings, advances all running animations and
    /// runs the per-key updates. `delta` is the time since the previous
    /// tick in seconds.
    pub fn update(&mut self, delta: f64) {
        for fired in self.hold.drain() {
            self.handle_hold_fired(fired);
        }
        self.animator.update(delta);

        let shift_active = self.shift_active();
        self.matrix.update(delta, shift_active);
        self.popup.update(delta, shift_active);
    }

    // ========================================================================
    // Pointer interaction
    // ========================================================================

    /// Reports a pointer move in canvas coordinates.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.pointer.position = Point::new(x, y);
        self.invalidate_pointer_position();
    }

    /// Reports a pointer press at the last reported position.
    pub fn pointer_pressed(&mut self) {
        self.pointer.has_invoked_holding = false;
        self.pointer.down = self.pointer.hovering;
        match self.pointer.down {
            Some(down) => {
                self.set_press_state(down, PressState::Down);
                self.hold.schedule(down, Duration::from_millis(HOLD_DELAY_MS));
            }
            None => self.hold.cancel(),
        }
    }

    /// Reports a pointer release at the last reported position.
    ///
    /// Performs the pressed key's action unless the holding action already
    /// fired, and closes the popup when one is open.
    pub fn pointer_released(&mut self) {
        if self.interaction_mode == InteractionMode::Popup {
            // The popup's forgiving hit test decides which key the release
            // lands on.
            self.pointer.down = self.pointer.hovering;
            self.pointer.has_invoked_holding = false;
        }

        if let Some(down) = self.pointer.down.take() {
            self.set_press_state(down, PressState::Hover);
            if !self.pointer.has_invoked_holding {
                self.perform_action(down, false);
            }
        }

        if self.interaction_mode == InteractionMode::Popup {
            self.close_popup();
        }
    }

    /// Reports the pointer leaving the canvas.
    pub fn pointer_left(&mut self) {
        if let Some(hovering) = self.pointer.hovering {
            self.set_press_state(hovering, PressState::Idle);
        }
        if let Some(down) = self.pointer.down {
            self.set_press_state(down, PressState::Idle);
        }
        self.pointer.hovering = None;
        self.pointer.down = None;
        self.hold.cancel();
    }

    /// Re-evaluates which key is under the pointer.
    ///
    /// Invoked internally after moves, layout switches and popup
    /// transitions; exposed for drivers whose pointer position changes
    /// meaning without moving (e.g. a window move).
    pub fn invalidate_pointer_position(&mut self) {
        let position = self.pointer.position;
        let new_hovering = match self.interaction_mode {
            InteractionMode::Keyboard => self
                .matrix
                .key_at(position.x - self.bounds.x, position.y - self.bounds.y)
                .map(|(row, col)| KeyRef::Matrix { row, col }),
            InteractionMode::Popup => self.popup.hit_test(position.x, position.y, self.bounds),
        };

        if self.pointer.down != new_hovering {
            if let Some(down) = self.pointer.down {
                self.set_press_state(down, PressState::Idle);
            }
            self.pointer.down = None;
        }
        if self.pointer.hovering != new_hovering {
            if let Some(old) = self.pointer.hovering {
                self.set_press_state(old, PressState::Idle);
            }
            self.pointer.hovering = new_hovering;
            if let Some(new) = new_hovering {
                self.set_press_state(new, PressState::Hover);
            }
        }
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Performs the action of a key.
    ///
    /// Modifier keys toggle their modifier. Holding a key with extra keys
    /// opens the popup (subscribers may veto through the popup-open
    /// event). Everything else resolves to a [`KeyActionEvent`] for the
    /// input-simulation sink; layout and language switches are handled
    /// internally as well.
    pub fn perform_action(&mut self, key_ref: KeyRef, is_holding: bool) {
        let Some(def) = self.key_def(key_ref).cloned() else {
            return;
        };

        let modifier = def.modifier();
        if modifier != KeyModifier::None {
            self.modifiers.toggle(modifier);
        }

        if is_holding && !def.extra_keys.is_empty() {
            let mut event = PopupOpenEvent::default();
            self.events.popup_open.emit(&mut event);
            if !event.prevent_opening {
                if let KeyRef::Matrix { row, col } = key_ref {
                    self.interaction_mode = InteractionMode::Popup;
                    self.popup.open(
                        (row, col),
                        &self.matrix,
                        self.bounds,
                        f64::from(self.gap),
                        &self.registry,
                        &mut self.animator,
                    );
                    self.invalidate_pointer_position();
                }
            }
            return;
        }

        let action = if is_holding {
            def.holding_action
        } else {
            def.action
        };

        let mut handled = false;
        match action {
            KeyAction::InsertText => {
                if modifier == KeyModifier::None {
                    let text = shifted_text(&def, def.insertion(), self.shift_active());
                    let modifiers = self.modifiers.active().to_vec();
                    self.emit_key_action(KeyActionEvent {
                        action,
                        text: Some(text),
                        modifiers,
                    });
                    self.modifiers.clear();
                    handled = true;
                }
            }
            KeyAction::Enter => {
                self.modifiers.clear();
            }
            KeyAction::SwitchLayout => {
                let language = self.selected_language.clone();
                self.switch_layout(language.as_deref(), def.target.as_deref());
            }
            KeyAction::ChangeLanguage => {
                let layout = self.selected_layout.clone();
                self.switch_layout(def.target.as_deref(), layout.as_deref());
            }
            _ => {}
        }

        if !handled {
            let modifiers = self.modifiers.active().to_vec();
            self.emit_key_action(KeyActionEvent {
                action,
                text: None,
                modifiers,
            });
        }
    }

    /// Applies shift capitalization to a key's text, honoring its
    /// `ignore_cap` flag.
    #[must_use]
    pub fn key_text(&self, def: &KeyDef, text: &str) -> String {
        shifted_text(def, text, self.shift_active())
    }

    // ========================================================================
    // Event subscriptions
    // ========================================================================

    /// Subscribes to resize notifications.
    pub fn on_resize(&mut self, subscriber: impl FnMut(&mut ResizeEvent) + 'static) {
        self.events.resize.subscribe(subscriber);
    }

    /// Subscribes to layout-changed notifications.
    pub fn on_layout_changed(&mut self, subscriber: impl FnMut(&mut LayoutChangedEvent) + 'static) {
        self.events.layout_changed.subscribe(subscriber);
    }

    /// Subscribes to key-action notifications (the input-simulation sink).
    pub fn on_key_action(&mut self, subscriber: impl FnMut(&mut KeyActionEvent) + 'static) {
        self.events.key_action.subscribe(subscriber);
    }

    /// Subscribes to the cancellable popup-open notification.
    pub fn on_popup_open(&mut self, subscriber: impl FnMut(&mut PopupOpenEvent) + 'static) {
        self.events.popup_open.subscribe(subscriber);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Resolved keyboard bounds in canvas coordinates.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Last applied canvas size.
    #[must_use]
    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    /// Gap between keys in pixels.
    #[must_use]
    pub fn gap(&self) -> i32 {
        self.gap
    }

    /// Selected language identifier.
    #[must_use]
    pub fn selected_language(&self) -> Option<&str> {
        self.selected_language.as_deref()
    }

    /// Selected layout name.
    #[must_use]
    pub fn selected_layout(&self) -> Option<&str> {
        self.selected_layout.as_deref()
    }

    /// The laid-out key matrix.
    #[must_use]
    pub fn matrix(&self) -> &KeyMatrix {
        &self.matrix
    }

    /// The popup layer.
    #[must_use]
    pub fn popup(&self) -> &PopupLayer {
        &self.popup
    }

    /// The animator, for playing additional animations (window slides and
    /// the like) on the shared tick.
    pub fn animator_mut(&mut self) -> &mut Animator {
        &mut self.animator
    }

    /// The modifier state.
    #[must_use]
    pub fn modifiers(&self) -> &ModifierState {
        &self.modifiers
    }

    /// Which layer pointer events currently resolve against.
    #[must_use]
    pub fn interaction_mode(&self) -> InteractionMode {
        self.interaction_mode
    }

    /// Current pointer bookkeeping.
    #[must_use]
    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// The key state a reference points at, if it exists.
    #[must_use]
    pub fn key_state(&self, key_ref: KeyRef) -> Option<&KeyState> {
        match key_ref {
            KeyRef::Matrix { row, col } => self.matrix.key(row, col),
            KeyRef::Popup { index } => self.popup.key(index),
        }
    }

    /// The key definition a reference points at, if it exists.
    #[must_use]
    pub fn key_def(&self, key_ref: KeyRef) -> Option<&KeyDef> {
        self.key_state(key_ref).map(KeyState::def)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn local_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.bounds.width, self.bounds.height)
    }

    fn shift_active(&self) -> bool {
        self.modifiers.is_active(KeyModifier::Shift)
    }

    fn invalidate_layout(&mut self) {
        let mut event = LayoutChangedEvent {
            language: self.selected_language.clone(),
            layout: self.selected_layout.clone(),
        };
        self.events.layout_changed.emit(&mut event);

        let Some(language) = self.selected_language.as_deref() else {
            return;
        };
        let Some(layout_name) = self.selected_layout.as_deref() else {
            return;
        };
        let Some(rows) = self
            .configs
            .get(language)
            .and_then(|config| config.layout(layout_name))
        else {
            return;
        };

        let container = self.local_bounds();
        self.matrix
            .rebuild(rows, container, f64::from(self.gap), &self.registry);
        tracing::debug!(language, layout = layout_name, "switched layout");
    }

    fn close_popup(&mut self) {
        self.popup.close();
        self.interaction_mode = InteractionMode::Keyboard;
        self.invalidate_pointer_position();
    }

    fn handle_hold_fired(&mut self, fired: HoldFired) {
        if !self.hold.is_current(fired.generation) {
            return;
        }
        if self.pointer.down != Some(fired.key) {
            return;
        }
        let still_down = self
            .key_state(fired.key)
            .is_some_and(|key| key.press_state() == PressState::Down);
        if !still_down {
            return;
        }

        self.set_press_state(fired.key, PressState::Holding);
        self.perform_action(fired.key, true);
        self.pointer.has_invoked_holding = true;
    }

    fn set_press_state(&mut self, key_ref: KeyRef, state: PressState) {
        match key_ref {
            KeyRef::Matrix { row, col } => {
                if let Some(key) = self.matrix.key_mut(row, col) {
                    key.set_press_state(state);
                }
            }
            KeyRef::Popup { index } => {
                if let Some(key) = self.popup.key_mut(index) {
                    key.set_press_state(state);
                }
            }
        }
    }

    fn emit_key_action(&mut self, mut event: KeyActionEvent) {
        self.events.key_action.emit(&mut event);
    }
}
