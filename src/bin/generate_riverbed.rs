//! Riverbed generator binary - builds one scene and writes it as JSON.
//!
//! Usage: cargo run --release --bin generate_riverbed -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>        Scene config JSON (default: built-in defaults)
//!   --seed <SEED>          Override the random seed
//!   --width <METERS>       Override terrain width
//!   --length <METERS>      Override terrain length
//!   --hdri <PATH>          Environment map for the sun estimate
//!   --output <PATH>        Output file (default: riverbed.json)
//!   --report-only          Write the summary without mesh arrays
//!   --save-config <PATH>   Also write the effective config

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use rivergen::core::Result;
use rivergen::generation::{RiverScene, SceneConfig};

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };
    if let Some(seed) = parse_u64_arg(&args, "--seed") {
        config.seed = seed;
    }
    if let Some(width) = parse_f32_arg(&args, "--width") {
        config.terrain.width = width;
    }
    if let Some(length) = parse_f32_arg(&args, "--length") {
        config.terrain.length = length;
    }
    if let Some(hdri) = parse_str_arg(&args, "--hdri") {
        config.dome.hdri_path = Some(PathBuf::from(hdri));
    }
    let output = PathBuf::from(parse_str_arg(&args, "--output").unwrap_or_else(|| "riverbed.json".to_string()));
    let report_only = args.iter().any(|a| a == "--report-only");

    if let Some(path) = parse_str_arg(&args, "--save-config") {
        config.save(&path)?;
        println!("Config: {}", path);
    }

    println!("=== Rivergen Riverbed Generator ===");
    println!("Terrain: {}m x {}m, {:?} cells", config.terrain.width, config.terrain.length, config.terrain.subdivisions);
    println!("Seed:    {}", config.seed);
    println!("Output:  {}", output.display());
    println!();

    let start = Instant::now();
    let scene = RiverScene::generate(&config)?;
    let elapsed = start.elapsed();

    let json = if report_only {
        serde_json::to_string_pretty(&scene.report)?
    } else {
        serde_json::to_string_pretty(&scene.export())?
    };
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&output, json)?;

    let r = &scene.report;
    println!("=== Done in {:.2}s ===", elapsed.as_secs_f64());
    println!("Bed:    {} vertices, deepest {:.3}", r.bed_vertices, r.bed_min_z.unwrap_or(0.0));
    println!("Banks:  {} vertices, highest {:.3}", r.bank_vertices, r.bank_max_z.unwrap_or(0.0));
    println!("Water:  {} vertices after trim", r.water.remaining_vertices);
    println!("Rocks:  {}", r.rocks);
    println!(
        "Sun:    ({:.2}, {:.2}, {:.2}), energy {}{}",
        r.sun.position.x,
        r.sun.position.y,
        r.sun.position.z,
        r.sun.energy,
        if r.fallback_light { " (fallback)" } else { "" }
    );
    Ok(())
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u64_arg(args: &[String], flag: &str) -> Option<u64> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
