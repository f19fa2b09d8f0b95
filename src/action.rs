//! User-configurable window actions and the key combinations bound to them.

use crate::config::ConfigError;
use crate::direction::WindowDirection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionMode {
    Generic,
    Coordinates,
}

/// Reference point a custom-sized window is pinned to inside the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    #[default]
    Center,
    /// Horizontally centred, sitting a little above the vertical centre.
    MacosCenter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeMode {
    #[default]
    Custom,
    PreserveSize,
    InitialSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Pixels,
    #[default]
    Percentage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModifierKey {
    Fn,
    Ctrl,
    Alt,
    Shift,
    Cmd,
}

impl ModifierKey {
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fn" | "function" | "globe" => Some(Self::Fn),
            "ctrl" | "control" => Some(Self::Ctrl),
            "alt" | "opt" | "option" => Some(Self::Alt),
            "shift" => Some(Self::Shift),
            "cmd" | "command" | "super" => Some(Self::Cmd),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Fn => "fn",
            Self::Ctrl => "ctrl",
            Self::Alt => "alt",
            Self::Shift => "shift",
            Self::Cmd => "cmd",
        }
    }
}

/// A set of modifiers plus one or more keys pressed together, e.g. `ctrl+w+a`.
///
/// Both sets are unordered, so `a+w` and `w+a` are the same combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyCombination {
    pub modifiers: BTreeSet<ModifierKey>,
    pub keys: BTreeSet<String>,
}

impl KeyCombination {
    pub fn from_keys(keys: &[&str]) -> Self {
        Self {
            modifiers: BTreeSet::new(),
            keys: keys.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

impl FromStr for KeyCombination {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut modifiers = BTreeSet::new();
        let mut keys = BTreeSet::new();

        for part in s.split('+').map(str::trim) {
            if part.is_empty() {
                return Err(ConfigError::InvalidKeybind(s.to_string()));
            }
            match ModifierKey::from_string(part) {
                Some(modifier) => {
                    modifiers.insert(modifier);
                }
                None => {
                    keys.insert(part.to_lowercase());
                }
            }
        }

        if keys.is_empty() {
            return Err(ConfigError::InvalidKeybind(s.to_string()));
        }

        Ok(Self { modifiers, keys })
    }
}

impl TryFrom<String> for KeyCombination {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeyCombination> for String {
    fn from(combo: KeyCombination) -> Self {
        combo.to_string()
    }
}

impl fmt::Display for KeyCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = self
            .modifiers
            .iter()
            .map(|m| m.name())
            .chain(self.keys.iter().map(String::as_str))
            .collect();
        f.write_str(&parts.join("+"))
    }
}

/// One keybind or menu entry: where to send the window and how.
///
/// Only `direction` is required; the remaining fields refine `custom` and
/// `cycle` directions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowAction {
    pub direction: WindowDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keybind: Option<KeyCombination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_mode: Option<PositionMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Anchor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_mode: Option<SizeMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_point: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_point: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cycle: Vec<WindowAction>,
}

impl WindowAction {
    pub fn new(direction: WindowDirection) -> Self {
        Self {
            direction,
            ..Default::default()
        }
    }

    pub fn with_keybind(mut self, keybind: KeyCombination) -> Self {
        self.keybind = Some(keybind);
        self
    }

    pub fn custom(name: impl Into<String>) -> Self {
        Self {
            direction: WindowDirection::Custom,
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn cycling(name: impl Into<String>, cycle: Vec<WindowAction>) -> Self {
        Self {
            direction: WindowDirection::Cycle,
            name: Some(name.into()),
            cycle,
            ..Default::default()
        }
    }

    /// Human label: the configured name for custom and cycle actions, the
    /// direction name otherwise.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => self.direction.name().to_string(),
        }
    }

    pub fn position_mode(&self) -> PositionMode {
        self.position_mode.unwrap_or(PositionMode::Generic)
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor.unwrap_or_default()
    }

    pub fn size_mode(&self) -> SizeMode {
        self.size_mode.unwrap_or_default()
    }

    pub fn unit(&self) -> Unit {
        self.unit.unwrap_or_default()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.direction {
            WindowDirection::Custom => {
                if self.name.as_deref().map_or(true, str::is_empty) {
                    return Err(ConfigError::MissingName);
                }
            }
            WindowDirection::Cycle => {
                if self.cycle.is_empty() {
                    return Err(ConfigError::EmptyCycle(self.label()));
                }
                for entry in &self.cycle {
                    entry.validate()?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Default action set: one entry per direction that has a default keybind.
pub fn default_actions() -> Vec<WindowAction> {
    WindowDirection::ALL
        .into_iter()
        .filter(|d| !d.default_keybind().is_empty())
        .map(|d| WindowAction::new(d).with_keybind(KeyCombination::from_keys(d.default_keybind())))
        .collect()
}

/// Rejects action sets a resolver cannot act on: unnamed custom actions,
/// empty cycles and two actions bound to the same key combination.
pub fn validate_actions(actions: &[WindowAction]) -> Result<(), ConfigError> {
    let mut seen: Vec<(&KeyCombination, String)> = Vec::new();

    for action in actions {
        action.validate()?;

        if let Some(keybind) = &action.keybind {
            if let Some((_, first)) = seen.iter().find(|(k, _)| *k == keybind) {
                return Err(ConfigError::DuplicateKeybind {
                    keybind: keybind.to_string(),
                    first: first.clone(),
                    second: action.label(),
                });
            }
            seen.push((keybind, action.label()));
        }
    }

    Ok(())
}

/// Looks up the action bound to exactly `pressed`.
pub fn action_for_keys<'a>(
    actions: &'a [WindowAction],
    pressed: &KeyCombination,
) -> Option<&'a WindowAction> {
    actions
        .iter()
        .find(|a| a.keybind.as_ref() == Some(pressed))
}
