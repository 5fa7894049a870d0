//! Game configuration: window, logical canvas, physics tuning and asset location.
//!
//! Every field has a default matching the shipped game, so the JSON file is
//! optional and may override any subset. Physics values are per-tick
//! quantities tuned for a 60 Hz tick; changing `tick_rate_hz` changes how fast
//! the game plays, not how far things move per tick.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub const CONFIG_VERSION: &str = "0.1";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GameConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub window: WindowSettings,
    #[serde(default)]
    pub canvas: CanvasSettings,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct WindowSettings {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_canvas_width")]
    pub width: u32,
    #[serde(default = "default_canvas_height")]
    pub height: u32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct CanvasSettings {
    #[serde(default = "default_canvas_width_f32")]
    pub width: f32,
    #[serde(default = "default_canvas_height_f32")]
    pub height: f32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct PhysicsConfig {
    /// Added to vertical velocity every airborne tick.
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    /// Added to vertical velocity on each jump key-down.
    #[serde(default = "default_jump_impulse")]
    pub jump_impulse: f32,
    /// Horizontal walk and scroll distance per tick.
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Fraction of the scroll distance applied to background layers.
    #[serde(default = "default_parallax")]
    pub parallax: f32,
    #[serde(default = "default_tick_rate_hz")]
    pub tick_rate_hz: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            window: WindowSettings::default(),
            canvas: CanvasSettings::default(),
            physics: PhysicsConfig::default(),
            assets_dir: default_assets_dir(),
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_canvas_width(),
            height: default_canvas_height(),
        }
    }
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: default_canvas_width_f32(),
            height: default_canvas_height_f32(),
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: default_gravity(),
            jump_impulse: default_jump_impulse(),
            speed: default_speed(),
            parallax: default_parallax(),
            tick_rate_hz: default_tick_rate_hz(),
        }
    }
}

/// Polls a file's modification time so edits can be picked up between ticks.
pub struct FileWatcher {
    path: PathBuf,
    last_seen_modified: Option<SystemTime>,
}

impl FileWatcher {
    pub fn new(path: PathBuf) -> Self {
        let last_seen_modified = modified_time(&path);
        Self {
            path,
            last_seen_modified,
        }
    }

    pub fn should_reload(&mut self) -> bool {
        let current = modified_time(&self.path);
        match (self.last_seen_modified, current) {
            (Some(old), Some(now)) if now > old => {
                self.last_seen_modified = Some(now);
                true
            }
            (None, Some(now)) => {
                self.last_seen_modified = Some(now);
                true
            }
            _ => false,
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Load the config if the file exists, otherwise fall back to defaults.
/// An invalid file is reported and ignored.
pub fn load_config_or_default(path: &Path) -> GameConfig {
    if !path.exists() {
        log::info!(
            "No config at '{}', using built-in defaults",
            path.display()
        );
        return GameConfig::default();
    }
    match load_config_from_path(path) {
        Ok(config) => {
            log::info!("Loaded config '{}'", path.display());
            config
        }
        Err(err) => {
            log::error!("{err}. Using built-in defaults.");
            GameConfig::default()
        }
    }
}

fn validate_config(config: &GameConfig) -> Result<(), String> {
    if config.version != CONFIG_VERSION {
        return Err(format!(
            "Config validation failed: unsupported version '{}'",
            config.version
        ));
    }
    if config.window.width == 0 || config.window.height == 0 {
        return Err("Config validation failed: window width/height must be > 0".to_string());
    }
    let canvas = config.canvas;
    if !(canvas.width.is_finite() && canvas.height.is_finite())
        || canvas.width <= 0.0
        || canvas.height <= 0.0
    {
        return Err("Config validation failed: canvas width/height must be > 0".to_string());
    }

    let physics = config.physics;
    for (name, value) in [
        ("gravity", physics.gravity),
        ("jump_impulse", physics.jump_impulse),
        ("speed", physics.speed),
        ("parallax", physics.parallax),
    ] {
        if !value.is_finite() {
            return Err(format!(
                "Config validation failed: physics.{name} must be finite"
            ));
        }
    }
    if physics.speed <= 0.0 {
        return Err("Config validation failed: physics.speed must be > 0".to_string());
    }
    if physics.tick_rate_hz == 0 {
        return Err("Config validation failed: physics.tick_rate_hz must be > 0".to_string());
    }
    if config.assets_dir.is_empty() {
        return Err("Config validation failed: assets_dir is empty".to_string());
    }
    Ok(())
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok()?.modified().ok()
}

fn default_version() -> String {
    CONFIG_VERSION.to_string()
}

fn default_title() -> String {
    "Side Scroller".to_string()
}

fn default_assets_dir() -> String {
    "assets/img".to_string()
}

const fn default_canvas_width() -> u32 {
    1024
}

const fn default_canvas_height() -> u32 {
    576
}

const fn default_canvas_width_f32() -> f32 {
    1024.0
}

const fn default_canvas_height_f32() -> f32 {
    576.0
}

const fn default_gravity() -> f32 {
    1.5
}

const fn default_jump_impulse() -> f32 {
    -25.0
}

const fn default_speed() -> f32 {
    10.0
}

const fn default_parallax() -> f32 {
    0.66
}

const fn default_tick_rate_hz() -> u32 {
    60
}
