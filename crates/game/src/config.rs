//! Simulation configuration. Loaded from barrels.ron at startup.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// A single configuration value: RON numbers and strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Number(f32),
    String(String),
}

/// Untyped per-object settings map with typed accessors.
///
/// Objects are configured as open key/value maps so each object kind can
/// read the keys it cares about; a missing or mistyped key is reported to
/// the caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ObjectConfig(HashMap<String, ConfigValue>);

impl ObjectConfig {
    /// Typed string lookup by key.
    pub fn string(&self, key: &str) -> Result<String> {
        match self.0.get(key) {
            Some(ConfigValue::String(s)) => Ok(s.clone()),
            Some(ConfigValue::Number(_)) => Err(anyhow!("config key '{}' is not a string", key)),
            None => Err(anyhow!("missing config key '{}'", key)),
        }
    }

    /// Typed number lookup by key.
    pub fn numberf(&self, key: &str) -> Result<f32> {
        match self.0.get(key) {
            Some(ConfigValue::Number(n)) => Ok(*n),
            Some(ConfigValue::String(_)) => Err(anyhow!("config key '{}' is not a number", key)),
            None => Err(anyhow!("missing config key '{}'", key)),
        }
    }

    /// Number lookup with a fallback for absent keys.
    pub fn numberf_or(&self, key: &str, default: f32) -> f32 {
        self.numberf(key).unwrap_or(default)
    }

    pub fn set_string(&mut self, key: &str, value: &str) {
        self.0
            .insert(key.to_string(), ConfigValue::String(value.to_string()));
    }

    pub fn set_number(&mut self, key: &str, value: f32) {
        self.0.insert(key.to_string(), ConfigValue::Number(value));
    }
}

/// Persistent simulation settings. Loaded from `barrels.ron` in the
/// current directory.
#[derive(Debug, Clone, Deserialize)]
pub struct SimConfig {
    /// Step budget for each settling phase of the demo loop.
    #[serde(default = "default_settle_steps")]
    pub settle_steps: u32,
    /// The objects to spawn into the scene.
    #[serde(default)]
    pub objects: Vec<ObjectConfig>,
}

fn default_settle_steps() -> u32 {
    900
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            settle_steps: default_settle_steps(),
            objects: vec![
                barrel_object("barrel_a", 25.0, 0.0, 0.0, 0.0),
                barrel_object("barrel_b", 25.0, 0.0, 0.0, 1.15),
                barrel_object("barrel_c", 25.0, 0.0, 0.0, 2.3),
            ],
        }
    }
}

fn barrel_object(name: &str, mass: f32, x: f32, y: f32, z: f32) -> ObjectConfig {
    let mut object = ObjectConfig::default();
    object.set_string("name", name);
    object.set_string("model", "barrel");
    object.set_number("mass", mass);
    object.set_number("x", x);
    object.set_number("y", y);
    object.set_number("z", z);
    object
}

impl SimConfig {
    /// Load config from `barrels.ron`. If the file is missing or invalid,
    /// returns the default three-barrel stack.
    pub fn load() -> Self {
        let path = config_path();
        if let Ok(data) = std::fs::read_to_string(&path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("barrels.ron")
}
