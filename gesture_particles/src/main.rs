//! gesture_particles: interactive entry point.

use std::io::{self, Write};

use clap::Parser;
use gesture_particles::app::{run, AppConfig};
use particle_field::{Rgb, Template};

/// Particle templates scaled by a two-hand pinch gesture.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Skip the interactive prompts.
    #[arg(long)]
    quick: bool,

    /// Initial template (sphere, heart, flower, saturn, buddha, fireworks).
    #[arg(long)]
    template: Option<String>,

    /// Number of particles.
    #[arg(long)]
    count: Option<usize>,

    /// Particle color as #rrggbb.
    #[arg(long)]
    color: Option<String>,

    /// Seed for the procedural sampler.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Gesture Particles — pinch to scale the field          ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: Keyboard simulation  (use --features leap for hardware)");
    println!();

    let mut cfg = AppConfig::default();
    if let Some(name) = &cli.template { cfg.template = Template::parse(name); }
    if let Some(count) = cli.count    { cfg.count = count.max(1); }
    if let Some(hex) = &cli.color     { cfg.color = parse_color(hex, cfg.color); }
    if let Some(seed) = cli.seed      { cfg.seed = seed; }

    if cli.quick {
        println!("  Quick-start: {}, {} particles\n", cfg.template, cfg.count);
    } else {
        configure_interactively(&mut cfg);
    }

    println!();
    println!("  Opening visualizer window…  (press H to start hand tracking)");
    println!();

    if let Err(e) = run(cfg) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn configure_interactively(cfg: &mut AppConfig) {
    println!("  Template:");
    println!("    1.sphere  2.heart  3.flower  4.saturn  5.buddha  6.fireworks");
    let choice = read_line(&format!("    Choice (1–6 or name, default {}): ", cfg.template));
    let choice = choice.trim();
    if let Ok(n) = choice.parse::<usize>() {
        if let Some(t) = n.checked_sub(1).and_then(|i| Template::ALL.get(i)) {
            cfg.template = *t;
        }
    } else if !choice.is_empty() {
        cfg.template = Template::parse(choice);
    }

    cfg.count = read_line(&format!("  Particles (default {}): ", cfg.count))
        .trim().parse::<usize>().unwrap_or(cfg.count).max(1);

    let hex = read_line("  Color #rrggbb (default #ff69b4): ");
    if !hex.trim().is_empty() {
        cfg.color = parse_color(hex.trim(), cfg.color);
    }
}

fn parse_color(hex: &str, fallback: Rgb) -> Rgb {
    match Rgb::from_hex(hex) {
        Ok(c) => c,
        Err(e) => {
            println!("    ⚠  {}; keeping the current color.", e);
            fallback
        }
    }
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
