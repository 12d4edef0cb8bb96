//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration shared by the generator, the LOD controller, and the demo.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Dungeon layout generation.
    pub generator: GeneratorConfig,
    /// Level-of-detail and chunk visibility.
    pub lod: LodConfig,
    /// Demo scene population and camera path.
    pub demo: DemoConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Dungeon layout generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Grid width in cells.
    pub width: u32,
    /// Grid height in cells.
    pub height: u32,
    /// Structures (hub, rooms, halls) an attempt must place to count as a success.
    pub min_structures: u32,
    /// Attempts before giving up and keeping the last incomplete layout.
    pub max_attempts: u32,
    /// Longest straight gap, in cells, bridged by an alternate hall.
    pub max_alt_hall_gap: u32,
    /// Largest center misalignment, in cells, between two rooms joined by an alternate hall.
    pub max_alt_hall_misalignment: u32,
    /// Fixed seed for reproducible layouts. `None` draws a fresh seed per run.
    pub seed: Option<u64>,
}

/// Level-of-detail and chunk visibility settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LodConfig {
    /// Edge length of a square visibility chunk in world units.
    pub chunk_size: f32,
    /// Distance beyond which chunks deactivate and lights switch off.
    pub visibility_range: f32,
    /// Maximum number of point lights a single chunk may own.
    pub max_lights_per_chunk: usize,
    /// Relative vertex-count change required before geometry is rebuilt.
    pub geometry_hysteresis: f32,
}

/// Demo scene settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Number of frames to simulate.
    pub frames: u32,
    /// World-space edge length of one grid cell.
    pub tile_size: f32,
    /// Camera height above the floor.
    pub camera_height: f32,
    /// Radius of the camera orbit around the hub.
    pub orbit_radius: f32,
    /// Subdivisions per floor tile edge (vertex density of each tile mesh).
    pub tile_segments: u32,
    /// Base intensity of room lights.
    pub light_intensity: f32,
    /// Frames between two statistics reports.
    pub report_interval: u32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Print the generated layout as ASCII after generation.
    pub print_map: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            min_structures: 60,
            max_attempts: 10,
            max_alt_hall_gap: 6,
            max_alt_hall_misalignment: 2,
            seed: None,
        }
    }
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            chunk_size: 20.0,
            visibility_range: 100.0,
            max_lights_per_chunk: 8,
            geometry_hysteresis: 0.05,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frames: 240,
            tile_size: 2.0,
            camera_height: 12.0,
            orbit_radius: 60.0,
            tile_segments: 8,
            light_intensity: 2.0,
            report_interval: 60,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            print_map: true,
        }
    }
}

/// Platform config directory for Delve (`~/.config/delve` on Linux).
///
/// Falls back to the working directory when the platform has no config dir.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("delve"))
        .unwrap_or_else(|| PathBuf::from("."))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE), serialized)
            .map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Re-read `config.ron`; returns `Some(new_config)` only if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Reject values the generator or the LOD controller cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // The hub alone is 3x3 and needs its halo inside the grid.
        if self.generator.width < 5 {
            return Err(invalid("generator.width", "must be at least 5 cells"));
        }
        if self.generator.height < 5 {
            return Err(invalid("generator.height", "must be at least 5 cells"));
        }
        if self.generator.max_attempts == 0 {
            return Err(invalid("generator.max_attempts", "must be at least 1"));
        }
        if self.lod.chunk_size.is_nan() || self.lod.chunk_size <= 0.0 {
            return Err(invalid("lod.chunk_size", "must be positive"));
        }
        if self.lod.visibility_range.is_nan() || self.lod.visibility_range <= 0.0 {
            return Err(invalid("lod.visibility_range", "must be positive"));
        }
        if self.lod.geometry_hysteresis < 0.0 {
            return Err(invalid("lod.geometry_hysteresis", "must not be negative"));
        }
        Ok(())
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        ron::from_str(&contents).map_err(ConfigError::ParseError)
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
