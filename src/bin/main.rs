//! CLI entry point for the J.A.R.V.I.S. system monitor (jarvis)

#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "jarvis")]
#[command(about = "J.A.R.V.I.S.: HUD-style desktop system monitor", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/jarvis-monitor/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the pre-rendered model frames (relative to the
    /// current directory)
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// Print a metrics snapshot instead of opening the HUD
    #[arg(short, long)]
    snapshot: bool,

    /// Sampling ticks to run before printing a snapshot
    #[arg(short = 'n', long, default_value = "2")]
    samples: u32,

    /// Snapshot output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Write the effective configuration to the default path and exit
    #[arg(long)]
    save_config: bool,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[cfg(feature = "cli")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use jarvis::Config;

    let cli = Cli::parse();

    env_logger::init();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(dir) = cli.frames_dir {
        config.assets.frames_dir = std::env::current_dir()?.join(dir);
    }

    if cli.save_config {
        config.save()?;
        println!(
            "Saved configuration to {}",
            Config::default_path()?.join("config.toml").display()
        );
        return Ok(());
    }

    if cli.snapshot {
        return print_snapshot(&config, cli.samples, cli.format);
    }

    run_gui(config)
}

/// Sample `samples` times, one sample interval apart, and print the last tick
#[cfg(feature = "cli")]
fn print_snapshot(
    config: &jarvis::Config,
    samples: u32,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    use jarvis::metrics::{self, SystemInfo};
    use jarvis::Sampler;
    use std::time::Instant;

    let mut sampler = Sampler::new(metrics::platform_source(), config.history.length);
    let interval = config.general.sample_interval();

    let mut snapshot = None;
    for i in 0..samples.max(1) {
        if i > 0 {
            std::thread::sleep(interval);
        }
        snapshot = Some(sampler.tick(Instant::now()));
    }
    let Some(snapshot) = snapshot else {
        return Ok(());
    };
    let gpu = metrics::gpu_status();
    let info = SystemInfo::collect();

    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "snapshot": snapshot,
                "gpu": gpu,
                "system": info,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!("{}", snapshot);
            println!("GPU:       {} ({})", gpu.status, gpu.detail);
            for (label, value) in info.rows() {
                println!("{:<10} {}", format!("{}:", label), value);
            }
        }
    }
    Ok(())
}

#[cfg(all(feature = "cli", feature = "gui"))]
fn run_gui(config: jarvis::Config) -> Result<(), Box<dyn std::error::Error>> {
    jarvis::gui::run(config).map_err(|e| format!("GUI error: {}", e))?;
    Ok(())
}

#[cfg(all(feature = "cli", not(feature = "gui")))]
fn run_gui(_config: jarvis::Config) -> Result<(), Box<dyn std::error::Error>> {
    Err("GUI support not compiled in; rebuild with --features gui or use --snapshot".into())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI features not enabled. Please compile with --features cli");
    std::process::exit(1);
}
