//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Delve command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "delve", about = "Procedural dungeon layout and LOD demo")]
pub struct CliArgs {
    /// Seed for the layout generator (random when omitted).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Grid width in cells.
    #[arg(long)]
    pub width: Option<u32>,

    /// Grid height in cells.
    #[arg(long)]
    pub height: Option<u32>,

    /// Structures required for a successful layout.
    #[arg(long)]
    pub min_structures: Option<u32>,

    /// Generation attempts before giving up.
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Number of frames to simulate.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the generated layout as JSON to this file.
    #[arg(long)]
    pub dump_map: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.generator.seed = Some(seed);
        }
        if let Some(w) = args.width {
            self.generator.width = w;
        }
        if let Some(h) = args.height {
            self.generator.height = h;
        }
        if let Some(min) = args.min_structures {
            self.generator.min_structures = min;
        }
        if let Some(attempts) = args.max_attempts {
            self.generator.max_attempts = attempts;
        }
        if let Some(frames) = args.frames {
            self.demo.frames = frames;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some(7),
            width: Some(64),
            frames: Some(10),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.generator.seed, Some(7));
        assert_eq!(config.generator.width, 64);
        assert_eq!(config.demo.frames, 10);
        // Non-overridden fields retain defaults
        assert_eq!(config.generator.height, 100);
        assert_eq!(config.generator.min_structures, 60);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "delve",
            "--seed",
            "42",
            "--min-structures",
            "30",
            "--dump-map",
            "map.json",
        ]);
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.min_structures, Some(30));
        assert_eq!(args.dump_map, Some(PathBuf::from("map.json")));
        assert!(args.width.is_none());
    }
}
