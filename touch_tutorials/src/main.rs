//! touch_tutorials — interactive entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use touch_tutorials::app::run;
use touch_tutorials::config::AppConfig;

/// Command-line arguments for touch_tutorials
#[derive(Parser, Debug)]
#[command(name = "touch_tutorials")]
#[command(version, about = "LeapMotion touch interaction tutorials", long_about = None)]
struct Args {
    /// Configuration file path (TOML); built-in defaults when omitted
    #[arg(short, long, env = "TOUCH_TUTORIALS_CONFIG")]
    config: Option<PathBuf>,

    /// Viewport height; each tutorial canvas takes 80% of it
    #[arg(long)]
    height: Option<f32>,

    /// Tutorial to open first, by name
    #[arg(short, long)]
    tab: Option<String>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut cfg = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(h) = args.height {
        cfg.viewport_height = h;
    }
    if let Some(name) = &args.tab {
        cfg.initial_tab = cfg
            .tutorials
            .iter()
            .position(|t| t.name() == name)
            .with_context(|| format!("no tutorial named '{}'", name))?;
    }
    cfg.validate()?;

    if args.print_config {
        print!("{}", cfg.to_toml()?);
        return Ok(());
    }

    #[cfg(feature = "leap")]
    info!("mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    info!("mode: mouse simulation (build with --features leap for hardware)");

    run(cfg)?;
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("touch_tutorials={level},leap_frame={level},warn")));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}
