// SPDX-License-Identifier: GPL-3.0-only

//! Data model for keyboard layout definitions.
//!
//! These types describe *what* a layout contains — key labels, sizes,
//! actions, popup alternatives — independent of any pixel geometry. They
//! are serde round-trippable so an external configuration layer can load
//! them from JSON; file I/O itself does not live in this crate.

use std::collections::HashMap;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

// ============================================================================
// Key sizing
// ============================================================================

/// Width specification for a key.
///
/// Either a multiplier against the base column unit, or a star meaning
/// "consume an equal share of the row's remaining space". In JSON the field
/// is a number, a numeric string, or the wildcard marker `"*"`; any other
/// string is treated as a star, matching the permissive behavior of the
/// original format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeySize {
    /// Multiplier against the base column unit.
    Value(f64),
    /// Equal share of the row's remaining space.
    Star,
}

impl Default for KeySize {
    fn default() -> Self {
        KeySize::Value(1.0)
    }
}

impl KeySize {
    /// The multiplier, or 1.0 for star sizes.
    #[must_use]
    pub fn value(&self) -> f64 {
        match self {
            KeySize::Value(value) => *value,
            KeySize::Star => 1.0,
        }
    }

    /// Whether this is a star size.
    #[must_use]
    pub fn is_star(&self) -> bool {
        matches!(self, KeySize::Star)
    }
}

impl Serialize for KeySize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            KeySize::Value(value) => serializer.serialize_f64(*value),
            KeySize::Star => serializer.serialize_str("*"),
        }
    }
}

impl<'de> Deserialize<'de> for KeySize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(value) => KeySize::Value(value),
            Raw::Text(text) => match text.trim().parse::<f64>() {
                Ok(value) => KeySize::Value(value),
                Err(_) => KeySize::Star,
            },
        })
    }
}

// ============================================================================
// Actions and modifiers
// ============================================================================

/// Action performed when a key is triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyAction {
    /// No effect.
    #[default]
    Nothing,
    /// Insert the key's text into the focused application.
    InsertText,
    /// Switch to the layout named by the key's `target`.
    SwitchLayout,
    /// Move the caret one step left.
    CursorLeft,
    /// Move the caret one step right.
    CursorRight,
    /// Delete backwards.
    Delete,
    /// Press the return key.
    Enter,
    /// Switch to the language named by the key's `target`.
    ChangeLanguage,
    /// Reload all registered layout configurations.
    ReloadLayouts,
}

/// Modifier role a key may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyModifier {
    /// Not a modifier key.
    #[default]
    None,
    /// Shift modifier.
    Shift,
    /// Control modifier.
    Ctrl,
    /// Alt modifier.
    Alt,
}

impl KeyModifier {
    /// Parses a role string into a modifier, case-insensitively.
    /// Unrecognized roles are not modifiers.
    #[must_use]
    pub fn from_role(role: &str) -> Self {
        match role.to_ascii_lowercase().as_str() {
            "shift" => KeyModifier::Shift,
            "ctrl" => KeyModifier::Ctrl,
            "alt" => KeyModifier::Alt,
            _ => KeyModifier::None,
        }
    }
}

// ============================================================================
// Key definitions
// ============================================================================

fn default_action() -> KeyAction {
    KeyAction::InsertText
}

fn default_visible() -> bool {
    true
}

/// Configuration of a single key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyDef {
    /// Optional identity used to match keys across layout switches for
    /// state preservation.
    #[serde(default, rename = "id", skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,

    /// Icon glyph; when set, the key renders the icon instead of text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Label shown on the key.
    #[serde(default)]
    pub display_text: String,

    /// Text inserted on trigger; falls back to `display_text`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insertion_text: Option<String>,

    /// Font override for this key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_font: Option<String>,

    /// Alternative keys shown in the holding popup.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_keys: Vec<KeyDef>,

    /// Action on a normal press.
    #[serde(default = "default_action")]
    pub action: KeyAction,

    /// Action on a hold, when the key has no popup alternatives.
    #[serde(default)]
    pub holding_action: KeyAction,

    /// Whether the first extra key is previewed in the key's corner.
    #[serde(default, rename = "showSecondaryText")]
    pub show_secondary: bool,

    /// Width specification.
    #[serde(default)]
    pub size: KeySize,

    /// Target layout/language for switch actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Exempts the key's text from shift capitalization.
    #[serde(default)]
    pub ignore_cap: bool,

    /// Whether the key is rendered and hit-testable.
    #[serde(default = "default_visible", rename = "isVisible")]
    pub visible: bool,

    /// Role string selecting modifier behavior and custom key behaviors.
    #[serde(default)]
    pub role: String,
}

impl Default for KeyDef {
    fn default() -> Self {
        Self {
            identity: None,
            icon: None,
            display_text: String::new(),
            insertion_text: None,
            custom_font: None,
            extra_keys: Vec::new(),
            action: default_action(),
            holding_action: KeyAction::Nothing,
            show_secondary: false,
            size: KeySize::default(),
            target: None,
            ignore_cap: false,
            visible: true,
            role: String::new(),
        }
    }
}

impl KeyDef {
    /// Creates a plain text key.
    #[must_use]
    pub fn text(display_text: impl Into<String>) -> Self {
        Self {
            display_text: display_text.into(),
            ..Self::default()
        }
    }

    /// The text inserted when the key triggers, falling back to the
    /// display text.
    #[must_use]
    pub fn insertion(&self) -> &str {
        self.insertion_text.as_deref().unwrap_or(&self.display_text)
    }

    /// Whether the key renders an icon instead of text.
    #[must_use]
    pub fn is_icon(&self) -> bool {
        self.icon.as_deref().is_some_and(|icon| !icon.is_empty())
    }

    /// The modifier encoded in the key's role, if any.
    #[must_use]
    pub fn modifier(&self) -> KeyModifier {
        KeyModifier::from_role(&self.role)
    }

    /// A non-interactive copy for insertion into the popup row: the clone
    /// keeps the pose of the original but carries no further alternatives
    /// or secondary preview.
    #[must_use]
    pub fn clone_for_popup(&self) -> Self {
        Self {
            extra_keys: Vec::new(),
            show_secondary: false,
            ..self.clone()
        }
    }
}

// ============================================================================
// Layout configuration
// ============================================================================

/// A row of key definitions.
pub type KeyRow = Vec<KeyDef>;

/// An ordered key matrix: rows of key definitions.
pub type KeyRows = Vec<KeyRow>;

/// A set of named layouts for one language, plus font preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Default text font for the layouts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,

    /// Default icon font for the layouts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_font: Option<String>,

    /// Layouts by name.
    #[serde(default)]
    pub layouts: HashMap<String, KeyRows>,
}

impl LayoutConfig {
    /// Returns the layout with the given name, if present.
    #[must_use]
    pub fn layout(&self, name: &str) -> Option<&KeyRows> {
        self.layouts.get(name)
    }

    /// Name of an arbitrary layout, used as the initial selection when
    /// none was requested.
    #[must_use]
    pub fn first_layout_name(&self) -> Option<&str> {
        self.layouts.keys().next().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_size_deserializes_number_string_and_star() {
        let value: KeySize = serde_json::from_str("1.5").unwrap();
        assert_eq!(value, KeySize::Value(1.5));

        let numeric_string: KeySize = serde_json::from_str("\"2\"").unwrap();
        assert_eq!(numeric_string, KeySize::Value(2.0));

        let star: KeySize = serde_json::from_str("\"*\"").unwrap();
        assert!(star.is_star());

        // Unparseable strings degrade to star, like the original format.
        let junk: KeySize = serde_json::from_str("\"wide\"").unwrap();
        assert!(junk.is_star());
    }

    #[test]
    fn test_key_size_serializes_back() {
        assert_eq!(serde_json::to_string(&KeySize::Value(1.5)).unwrap(), "1.5");
        assert_eq!(serde_json::to_string(&KeySize::Star).unwrap(), "\"*\"");
    }

    #[test]
    fn test_key_size_accessors() {
        assert_eq!(KeySize::default().value(), 1.0);
        assert!(!KeySize::default().is_star());
        assert_eq!(KeySize::Star.value(), 1.0);
        assert_eq!(KeySize::Value(2.5).value(), 2.5);
    }

    #[test]
    fn test_key_def_defaults() {
        let key: KeyDef = serde_json::from_str(r#"{ "displayText": "a" }"#).unwrap();

        assert_eq!(key.display_text, "a");
        assert_eq!(key.action, KeyAction::InsertText, "default action inserts");
        assert_eq!(key.holding_action, KeyAction::Nothing);
        assert!(key.visible);
        assert!(!key.ignore_cap);
        assert_eq!(key.size, KeySize::Value(1.0));
        assert_eq!(key.insertion(), "a", "insertion falls back to display text");
    }

    #[test]
    fn test_key_def_insertion_override() {
        let key: KeyDef =
            serde_json::from_str(r#"{ "displayText": "&amp;", "insertionText": "&" }"#).unwrap();
        assert_eq!(key.insertion(), "&");
    }

    #[test]
    fn test_modifier_parsed_from_role() {
        assert_eq!(KeyModifier::from_role("shift"), KeyModifier::Shift);
        assert_eq!(KeyModifier::from_role("Shift"), KeyModifier::Shift);
        assert_eq!(KeyModifier::from_role("CTRL"), KeyModifier::Ctrl);
        assert_eq!(KeyModifier::from_role("alt"), KeyModifier::Alt);
        assert_eq!(KeyModifier::from_role("enter"), KeyModifier::None);
        assert_eq!(KeyModifier::from_role(""), KeyModifier::None);

        let key: KeyDef =
            serde_json::from_str(r#"{ "displayText": "shift", "role": "shift" }"#).unwrap();
        assert_eq!(key.modifier(), KeyModifier::Shift);
    }

    #[test]
    fn test_clone_for_popup_strips_alternatives() {
        let key: KeyDef = serde_json::from_str(
            r#"{
                "displayText": "a",
                "showSecondaryText": true,
                "extraKeys": [{ "displayText": "á" }, { "displayText": "â" }]
            }"#,
        )
        .unwrap();
        assert_eq!(key.extra_keys.len(), 2);

        let clone = key.clone_for_popup();
        assert!(clone.extra_keys.is_empty());
        assert!(!clone.show_secondary);
        assert_eq!(clone.display_text, "a");
    }

    #[test]
    fn test_layout_config_round_trip() {
        let json = r#"{
            "font": "Sans",
            "iconFont": "Icons",
            "layouts": {
                "default": [
                    [
                        { "displayText": "q" },
                        { "displayText": "w", "size": "1.5" },
                        { "id": "space", "displayText": " ", "size": "*" }
                    ]
                ]
            }
        }"#;

        let config: LayoutConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.font.as_deref(), Some("Sans"));

        let rows = config.layout("default").expect("layout present");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[0][1].size, KeySize::Value(1.5));
        assert!(rows[0][2].size.is_star());
        assert_eq!(rows[0][2].identity.as_deref(), Some("space"));

        // Round-trips through serde without loss.
        let reparsed: LayoutConfig =
            serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(reparsed, config);
    }

    #[test]
    fn test_first_layout_name() {
        let mut config = LayoutConfig::default();
        assert_eq!(config.first_layout_name(), None);

        config
            .layouts
            .insert("default".to_string(), vec![vec![KeyDef::text("a")]]);
        assert_eq!(config.first_layout_name(), Some("default"));
    }
}
