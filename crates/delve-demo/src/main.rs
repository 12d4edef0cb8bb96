//! Headless demo: generates a dungeon layout, populates a scene with one
//! floor tile per cell and one light per room, and flies a camera around the
//! hub while the LOD controller culls and simplifies the scene.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p delve-demo -- --seed 42 --dump-map layout.json`.

mod dungeon_scene;

use std::path::Path;

use clap::Parser;
use delve_config::{CliArgs, Config, default_config_dir};
use delve_lod::LodRegistry;
use delve_mapgen::{CellKind, DungeonMap, GeneratorParams, MapGenerator};
use tracing::{error, info, warn};

use crate::dungeon_scene::DungeonScene;

fn main() {
    let args = CliArgs::parse();
    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    delve_log::init_logging(Some(&config_dir.join("logs")), cfg!(debug_assertions), Some(&config));

    if let Err(e) = config.validate() {
        error!("Invalid settings: {e}");
        std::process::exit(2);
    }

    let map = generate_map(&config);
    if config.debug.print_map {
        println!("{}", map.grid());
    }
    if let Some(path) = &args.dump_map
        && let Err(e) = dump_map(&map, path)
    {
        error!("Failed to write {}: {e}", path.display());
    }

    if let Err(e) = run_frames(&map, &config) {
        error!("LOD demo stopped: {e}");
        std::process::exit(1);
    }
}

fn generate_map(config: &Config) -> DungeonMap {
    let seed = config.generator.seed.unwrap_or_else(rand::random);
    info!(
        seed,
        width = config.generator.width,
        height = config.generator.height,
        "Generating dungeon"
    );

    let outcome = MapGenerator::seeded(GeneratorParams::from(&config.generator), seed).generate();
    if outcome.complete {
        info!(
            structures = outcome.map.structure_count(),
            attempts = outcome.attempts,
            reachable = outcome.map.reachable_from_hub(),
            "Dungeon ready"
        );
    } else {
        warn!(
            placed = outcome.placed,
            required = config.generator.min_structures,
            "Generation fell short, using the fallback layout"
        );
    }
    let map = outcome.into_map_or_fallback();
    let grid = map.grid();
    info!(
        hub = grid.count(CellKind::Hub),
        rooms = grid.count(CellKind::Room),
        halls = grid.count(CellKind::Hall) + grid.count(CellKind::AltHall),
        "Floor cells"
    );
    map
}

fn dump_map(map: &DungeonMap, path: &Path) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(map)?;
    std::fs::write(path, json)?;
    info!("Layout written to {}", path.display());
    Ok(())
}

fn run_frames(map: &DungeonMap, config: &Config) -> Result<(), delve_lod::LodError> {
    let demo = &config.demo;
    let mut dungeon = DungeonScene::build(map, demo);
    let mut registry = LodRegistry::new();
    let lod = registry.get_or_create(dungeon.camera, &dungeon.scene, &config.lod)?;

    let registration = dungeon.register(lod, &config.lod)?;
    info!(
        objects = registration.objects,
        lights = registration.lights,
        rejected_lights = registration.rejected_lights,
        "Scene registered"
    );

    let frames = demo.frames.max(1);
    let interval = demo.report_interval.max(1);
    for frame in 0..demo.frames {
        let angle = frame as f32 / frames as f32 * std::f32::consts::TAU;
        dungeon.orbit_camera(demo, angle);
        lod.update(&mut dungeon.scene)?;

        if (frame + 1) % interval == 0 || frame + 1 == demo.frames {
            let stats = lod.stats(&dungeon.scene);
            info!(
                frame = frame + 1,
                visible = stats.visible_objects,
                tracked = stats.tracked_objects,
                decimated = stats.decimated_objects,
                active_chunks = stats.active_chunks,
                lights = stats.visible_lights,
                "LOD stats"
            );
        }
    }
    Ok(())
}
