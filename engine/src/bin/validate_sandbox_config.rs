//! CLI tool for validating sandbox configurations
//!
//! Usage: cargo run --bin validate_sandbox_config <config.json>...
//!
//! Each config is parsed, validated, built into a scene and settled for a
//! few simulated seconds to check that the plate comes to rest level.

use sandbox_engine::config::SandboxConfig;
use sandbox_engine::sandbox::Sandbox;
use std::env;
use std::process;

/// Simulated seconds to settle each scene
const SETTLE_SECONDS: u32 = 5;

/// Tolerated plate motion after settling
const REST_SPEED: f32 = 0.05;
const REST_ROTATION: f32 = 0.01;

fn main() {
    // Initialize logging for debug output
    tracing_subscriber::fmt()
        .with_env_filter("sandbox_engine=warn")
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <config.json>...", args[0]);
        eprintln!("\nValidates sandbox configurations and checks that the plate settles.");
        process::exit(1);
    }

    let mut all_valid = true;

    for path in &args[1..] {
        println!("=== Sandbox Config Report ===");
        println!("Config: {}", path);

        match check_config(path) {
            Ok(summary) => {
                println!("Plate rest height: {:.2} points", summary.rest_height);
                println!("Plate rotation: {:.4} rad", summary.rotation);
                println!("Plate speed: {:.4} m/s", summary.speed);
                if summary.settled() {
                    println!("Valid: true");
                } else {
                    println!("Valid: false");
                    println!("  Plate did not come to rest; try more spring damping");
                    all_valid = false;
                }
            }
            Err(e) => {
                eprintln!("ERROR: {}", e);
                all_valid = false;
            }
        }
        println!();
    }

    if !all_valid {
        process::exit(1);
    }
}

struct SettleSummary {
    rest_height: f32,
    rotation: f32,
    speed: f32,
}

impl SettleSummary {
    fn settled(&self) -> bool {
        self.speed < REST_SPEED && self.rotation.abs() < REST_ROTATION
    }
}

fn check_config(path: &str) -> Result<SettleSummary, Box<dyn std::error::Error>> {
    let config = SandboxConfig::from_json_file(path)?;
    let mut sandbox = Sandbox::new(config)?;

    let frames = SETTLE_SECONDS * 60;
    for frame in 0..=frames {
        sandbox.frame(f64::from(frame) / 60.0)?;
    }

    let plate = sandbox.ground().plate;
    let (point, rotation) = sandbox.pose(plate)?;
    let speed = sandbox.world().body(plate)?.linear_velocity.length();

    Ok(SettleSummary {
        rest_height: point.y,
        rotation,
        speed,
    })
}
