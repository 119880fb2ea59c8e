use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bigknob::{
    config::Config,
    keymap::{layout, KnobVariant, LAYOUT},
    replay::{self, Script},
    App,
};

#[derive(Parser, Debug)]
#[command(name = "bigknob")]
#[command(about = "BigKnob tap-dance and encoder keymap, running on an AJAZZ AKP05E")]
#[command(version)]
struct Cli {
    /// Check device connection status and exit
    #[arg(long)]
    status: bool,

    /// Set device brightness (0-100)
    #[arg(long, value_name = "PERCENT")]
    brightness: Option<u8>,

    /// Print the keymap and exit
    #[arg(long)]
    layout: bool,

    /// Run a TOML event script through the keymap and print the actions
    #[arg(long, value_name = "FILE")]
    replay: Option<PathBuf>,

    /// Print replay output as JSON
    #[arg(long, requires = "replay")]
    json: bool,

    /// Override what a plain tap of the encoder button does
    #[arg(long, value_enum)]
    variant: Option<VariantArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariantArg {
    /// Send F24
    Keycode,
    /// Toggle the underglow
    Toggle,
}

impl From<VariantArg> for KnobVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Keycode => KnobVariant::Keycode,
            VariantArg::Toggle => KnobVariant::Toggle,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Handle simple commands first
    if cli.status {
        return check_status().await;
    }

    if let Some(brightness) = cli.brightness {
        return set_brightness(brightness).await;
    }

    // Load configuration
    let mut config = Config::load()?;
    if let Some(variant) = cli.variant {
        config.keymap.variant = variant.into();
    }

    if cli.layout {
        print_layout(&config);
        return Ok(());
    }

    if let Some(path) = cli.replay {
        return run_replay(&path, &config, cli.json);
    }

    info!("Starting bigknob");

    let mut app = App::new(config).await?;

    // Set up signal handlers for graceful shutdown
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;

    let result = tokio::select! {
        result = app.run() => {
            result
        }
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
            Ok(())
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down...");
            Ok(())
        }
    };

    // Always run shutdown
    app.shutdown().await;
    result
}

fn print_layout(config: &Config) {
    println!("Keys (device button → action):");
    for (position, entry) in LAYOUT.iter().enumerate() {
        let button = config
            .matrix
            .buttons
            .get(position)
            .map_or_else(|| "-".to_string(), |b| b.to_string());
        println!(
            "  [{}] button {:>2}  {:<20} {}",
            position,
            button,
            entry.to_string(),
            layout::POSITION_DESCRIPTIONS[position]
        );
    }
    println!();
    println!(
        "Knob (device encoder {}): {}",
        config.matrix.knob,
        layout::ENCODER_DESCRIPTIONS[0]
    );
    println!(
        "Encoder button tap: {:?}",
        config.keymap.variant.release_action()
    );
    println!("Tapping term: {}ms", config.keymap.tapping_term_ms);
}

fn run_replay(path: &Path, config: &Config, json: bool) -> Result<()> {
    let script =
        Script::load(path).with_context(|| format!("Failed to load {}", path.display()))?;
    let report = replay::run(&script, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for timed in &report.actions {
        println!("{:>6}ms  {:?}", timed.at_ms, timed.action);
    }
    let lighting = report.lighting;
    println!(
        "lighting: {} {} hsv({}, {}, {})",
        if lighting.enabled { "on" } else { "off" },
        lighting.mode,
        lighting.hue,
        lighting.saturation,
        lighting.value
    );
    Ok(())
}

async fn check_status() -> Result<()> {
    use bigknob::device::DeviceManager;

    info!("Checking device status...");

    match DeviceManager::find_device().await {
        Ok(info) => {
            println!("✓ Device found: {}", info.name);
            println!("  Serial: {}", info.serial_number);
            Ok(())
        }
        Err(e) => {
            println!("✗ No device found: {}", e);
            std::process::exit(1);
        }
    }
}

async fn set_brightness(brightness: u8) -> Result<()> {
    use bigknob::device::DeviceManager;

    let brightness = brightness.min(100);
    info!("Setting brightness to {}%", brightness);

    let manager = DeviceManager::connect().await?;
    manager.set_brightness(brightness).await?;
    println!("✓ Brightness set to {}%", brightness);
    Ok(())
}
