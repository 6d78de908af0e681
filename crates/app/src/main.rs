use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use keylight_core::{AppConfig, CancelToken, Dispatcher, InputGateway, LaneManager, SystemClock};
use tracing_subscriber::EnvFilter;

mod midi;
mod term;

use midi::MidirGateway;
use term::TerminalSink;

fn main() -> keylight_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, device } => run(config.as_deref(), device),
        Commands::Devices => list_devices(),
    }
}

fn run(config_path: Option<&Path>, device: Option<String>) -> keylight_core::Result<()> {
    let mut config = match config_path {
        Some(path) => AppConfig::from_json_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(device) = device {
        config.device_name = device;
    }
    config.validate()?;

    let cancel = CancelToken::new();
    register_shutdown_signals(&cancel)?;

    tracing::info!(device = %config.device_name, "starting keylight");

    let lanes = LaneManager::new(config.ramp, TerminalSink::new(std::io::stdout()));
    let mut dispatcher = Dispatcher::new(
        MidirGateway::new(),
        lanes,
        SystemClock,
        cancel,
        config.device_name,
        config.polling,
    );
    dispatcher.run()
}

fn list_devices() -> keylight_core::Result<()> {
    let names = MidirGateway::new().input_names()?;
    if names.is_empty() {
        println!("no MIDI input ports visible");
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}

fn register_shutdown_signals(cancel: &CancelToken) -> keylight_core::Result<()> {
    for signal in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
        signal_hook::flag::register(signal, cancel.flag())?;
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "MIDI keyboard indicator lights", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Wait for the configured MIDI keyboard and light lanes from its keys.
    Run {
        /// Optional JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// MIDI input port name, overriding the configuration file.
        #[arg(short, long)]
        device: Option<String>,
    },
    /// List the MIDI input ports currently visible on this system.
    Devices,
}
