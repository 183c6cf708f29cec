//! cad2urdf - Main entry point
//!
//! Reads an assembly snapshot and writes a ROS 2 robot description package.

mod config;

use anyhow::{bail, Context, Result};
use cad2urdf_core::{export, render, AssemblySnapshot};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "cad2urdf")]
#[command(about = "Export a CAD assembly snapshot as a URDF description package")]
#[command(version)]
struct Args {
    /// Assembly snapshot (JSON)
    snapshot: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, default_value = "cad2urdf.toml")]
    config: PathBuf,

    /// Directory the description package is written to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Robot name
    #[arg(short = 'n', long)]
    robot_name: Option<String>,

    /// Occurrence that becomes base_link
    #[arg(short, long)]
    base_link: Option<String>,

    /// Joint friction/damping table (TOML with `[[joint]]` entries), replaces
    /// the config's `joint_dynamics`
    #[arg(long)]
    dynamics: Option<PathBuf>,

    /// Material contact coefficient table (TOML with `[[material]]` entries),
    /// replaces the config's `contact_coefficients`
    #[arg(long)]
    coefficients: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Print the generated documents instead of writing the package
    #[arg(long)]
    print: bool,

    /// Write a default configuration file and exit
    #[arg(long)]
    init_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("cad2urdf v{}", env!("CARGO_PKG_VERSION"));

    if args.init_config {
        config::save_default_config(&args.config)
            .with_context(|| format!("writing {}", args.config.display()))?;
        info!(path = %args.config.display(), "Wrote default configuration");
        return Ok(());
    }

    let Some(snapshot_path) = args.snapshot else {
        bail!("no assembly snapshot given");
    };

    let config = config::load_config(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let mut settings = config.to_export_settings();

    if let Some(output) = args.output {
        settings.export_path = output;
    }
    if let Some(name) = args.robot_name {
        settings.robot_name = name;
    }
    if let Some(base_link) = args.base_link {
        settings.base_link = base_link;
    }
    config::load_tables(&mut settings, args.dynamics.as_deref(), args.coefficients.as_deref())?;

    let snapshot = AssemblySnapshot::from_file(&snapshot_path)
        .with_context(|| format!("reading {}", snapshot_path.display()))?;

    info!(
        robot = %settings.robot_name,
        base_link = %settings.base_link,
        "Configuration loaded"
    );

    if args.print {
        let rendered = render(&snapshot, &settings).context("rendering robot description")?;
        println!("{}", rendered.robot_xml);
        println!("{}", rendered.materials_xml);
        return Ok(());
    }

    let summary = export(&snapshot, &settings).context("exporting robot description")?;
    println!(
        "Exported {} links, {} joints, {} materials to {}",
        summary.links,
        summary.joints,
        summary.materials,
        summary.package_path.display()
    );

    Ok(())
}
