use crate::action::{self, ModifierKey, WindowAction};
use crate::animation::TimingCurve;
use crate::screen::PaddingModel;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid keybind {0:?}")]
    InvalidKeybind(String),
    #[error("unknown trigger key {0:?}")]
    InvalidTriggerKey(String),
    #[error("keybind {keybind} is bound to both {first:?} and {second:?}")]
    DuplicateKeybind {
        keybind: String,
        first: String,
        second: String,
    },
    #[error("custom actions need a name")]
    MissingName,
    #[error("cycle action {0:?} has no entries")]
    EmptyCycle(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub menu: MenuConfig,
    #[serde(default)]
    pub padding: PaddingModel,
    #[serde(default = "action::default_actions")]
    pub actions: Vec<WindowAction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_trigger_key")]
    pub trigger_key: String,
    #[serde(default = "default_animate")]
    pub animate: bool,
    #[serde(default = "default_animation_ms")]
    pub animation_ms: u64,
    #[serde(default)]
    pub timing_curve: TimingCurve,
    #[serde(default = "default_sample_interval")]
    pub sample_interval_ms: u64,
    #[serde(default = "default_move_to_adjacent_screen")]
    pub move_to_adjacent_screen: bool,
}

/// Radial menu dimensions. Only the parts that shape hit-testing live here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuConfig {
    #[serde(default = "default_thickness")]
    pub thickness: f64,
    #[serde(default = "default_corner_radius")]
    pub corner_radius: f64,
    #[serde(default = "default_dead_zone_radius")]
    pub dead_zone_radius: f64,
}

fn default_trigger_key() -> String {
    "fn".to_string()
}
fn default_animate() -> bool {
    true
}
fn default_animation_ms() -> u64 {
    150
}
fn default_sample_interval() -> u64 {
    50
}
fn default_move_to_adjacent_screen() -> bool {
    true
}
fn default_thickness() -> f64 {
    22.0
}
fn default_corner_radius() -> f64 {
    50.0
}
fn default_dead_zone_radius() -> f64 {
    10.0
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trigger_key: default_trigger_key(),
            animate: default_animate(),
            animation_ms: default_animation_ms(),
            timing_curve: TimingCurve::default(),
            sample_interval_ms: default_sample_interval(),
            move_to_adjacent_screen: default_move_to_adjacent_screen(),
        }
    }
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            thickness: default_thickness(),
            corner_radius: default_corner_radius(),
            dead_zone_radius: default_dead_zone_radius(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            menu: MenuConfig::default(),
            padding: PaddingModel::default(),
            actions: action::default_actions(),
        }
    }
}

impl GeneralConfig {
    pub fn trigger_modifier(&self) -> std::result::Result<ModifierKey, ConfigError> {
        ModifierKey::from_string(&self.trigger_key)
            .ok_or_else(|| ConfigError::InvalidTriggerKey(self.trigger_key.clone()))
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
        .join(".config")
        .join("radial")
        .join("config.toml")
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn reload<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        *self = Self::load(path)?;
        Ok(())
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.general.trigger_modifier()?;
        action::validate_actions(&self.actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::WindowDirection;
    use assert_matches::assert_matches;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.general.sample_interval_ms, 50);
        assert_eq!(config.menu.thickness, 22.0);
        assert!(!config.padding.configure_screen_padding);
        assert_eq!(config.actions.len(), action::default_actions().len());
    }

    #[test]
    fn parses_custom_and_cycle_actions() {
        let toml = r#"
            [general]
            trigger_key = "ctrl"
            animate = false

            [padding]
            window = 8.0
            configure_screen_padding = true
            top = 4.0
            external_bar = 30.0

            [[actions]]
            direction = "custom"
            name = "Notes"
            keybind = "n"
            position_mode = "coordinates"
            unit = "percentage"
            x_point = 70.0
            y_point = 0.0
            width = 50.0
            height = 100.0

            [[actions]]
            direction = "cycle"
            name = "Halves"
            keybind = "h"

            [[actions.cycle]]
            direction = "left_half"

            [[actions.cycle]]
            direction = "right_half"
        "#;
        let config = Config::from_toml(toml).unwrap();
        assert!(!config.general.animate);
        assert_eq!(config.padding.total_top_padding(), 34.0);
        assert_eq!(config.actions.len(), 2);
        assert_eq!(config.actions[0].label(), "Notes");
        assert_eq!(config.actions[1].cycle[1].direction, WindowDirection::RightHalf);
    }

    #[test]
    fn duplicate_keybinds_fail_validation() {
        let toml = r#"
            [[actions]]
            direction = "left_half"
            keybind = "alt+a"

            [[actions]]
            direction = "right_half"
            keybind = "a+option"
        "#;
        let err = Config::from_toml(toml).unwrap_err();
        assert_matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::DuplicateKeybind { .. })
        );
    }

    #[test]
    fn unknown_trigger_key_fails_validation() {
        let toml = "[general]\ntrigger_key = \"hyper\"\n";
        let err = Config::from_toml(toml).unwrap_err();
        assert_matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::InvalidTriggerKey(k)) if k == "hyper"
        );
    }

    #[test]
    fn save_then_load_keeps_actions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("radial").join("config.toml");
        let mut config = Config::default();
        config.actions.push(WindowAction::cycling(
            "Thirds",
            vec![
                WindowAction::new(WindowDirection::LeftThird),
                WindowAction::new(WindowDirection::RightThird),
            ],
        ));
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.actions, config.actions);

        std::fs::write(&path, "[menu]\nthickness = 30.0\n").unwrap();
        config.reload(&path).unwrap();
        assert_eq!(config.menu.thickness, 30.0);
        assert_eq!(config.actions, action::default_actions());
    }
}
