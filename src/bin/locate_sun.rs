//! Sun locator binary - finds the brightest region of an HDRI and prints
//! the matching dome position and sun placement as JSON.
//!
//! Usage: cargo run --release --bin locate_sun -- <HDRI> [OPTIONS]
//!
//! Options:
//!   --radius <METERS>   Dome radius (default: 100)
//!   --keep-below        Do not mirror below-horizon points upward

use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use rivergen::atmosphere::{BelowHorizon, EnvironmentLight};

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(path) = args.get(1).filter(|a| !a.starts_with("--")) else {
        eprintln!("Usage: locate_sun <HDRI> [--radius R] [--keep-below]");
        return ExitCode::FAILURE;
    };
    let radius = parse_f32_arg(&args, "--radius").unwrap_or(100.0);
    let below = if args.iter().any(|a| a == "--keep-below") {
        BelowHorizon::Keep
    } else {
        BelowHorizon::Mirror
    };

    let start = Instant::now();
    let light = EnvironmentLight::from_path(Some(Path::new(path)), radius, below);
    log::info!("Analysis took {:.2}s", start.elapsed().as_secs_f64());

    match serde_json::to_string_pretty(&light) {
        Ok(json) => {
            println!("{}", json);
            if light.is_fallback() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            log::error!("Failed to serialize result: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}
