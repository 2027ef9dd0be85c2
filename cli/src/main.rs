mod commands;
mod config;
mod logging;
mod source;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use supplyfs_property::ExtensionSet;

use commands::Context;
use config::{LogLevel, UserConfig};
use logging::LogMode;

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(flatten)]
    Supply(SupplyCommands),

    /// Show or reset configuration
    Config {
        /// Print config file path
        #[arg(long)]
        path: bool,

        /// Reset config to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Debug, Subcommand)]
enum SupplyCommands {
    /// List power supplies (default)
    #[command(alias = "ls")]
    List,

    /// List registered properties, or the attributes of one supply
    Props {
        /// Show attributes and their modes for this supply
        #[arg(short, long)]
        device: Option<String>,

        /// JSON output
        #[arg(long)]
        json: bool,
    },

    /// Read one property attribute
    Show {
        /// Supply name (e.g., BAT0)
        device: String,

        /// Property name (e.g., capacity)
        property: String,
    },

    /// Write one property attribute
    Store {
        /// Supply name (e.g., BAT0)
        device: String,

        /// Property name (e.g., charge_control_limit)
        property: String,

        /// Text to write, as accepted by the attribute
        value: String,
    },

    /// Print the uevent environment of a supply
    Uevent {
        /// Supply name (e.g., BAT0)
        device: String,

        /// Output as a JSON object instead of KEY=value lines
        #[arg(long)]
        json: bool,
    },

    /// Emit snapshots as JSON at a fixed interval (suitable for piping)
    Watch {
        /// Supply name (e.g., BAT0)
        device: String,

        /// Number of samples to output (0 = infinite)
        #[arg(short, long, default_value_t = 0)]
        samples: u32,

        /// Time between samples (e.g., 500ms, 2s, 1m)
        #[arg(short, long, default_value = "2s", value_parser = humantime::parse_duration)]
        interval: Duration,

        /// Compact JSON output (one line per sample)
        #[arg(short, long)]
        compact: bool,
    },
}

/// Inspect power supplies through the power_supply property model
#[derive(Debug, Parser)]
#[command(name = "supplyfs", version, verbatim_doc_comment)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Power supply class directory to read from
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Read supplies from a TOML fixture instead of sysfs
    #[arg(long, global = true, conflicts_with = "root")]
    fixture: Option<PathBuf>,

    /// Vendor extension property set to enable (mtk-gauge, oppo, oppo-short-userspace)
    #[arg(long = "extension", global = true)]
    extensions: Vec<ExtensionSet>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Write logs to the runtime directory instead of stderr
    #[arg(long, global = true)]
    log_file: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let mut config = UserConfig::load();
    let log_level_override = cli.log_level.as_deref().map(LogLevel::from_str);
    let log_mode = if cli.log_file {
        LogMode::File
    } else {
        LogMode::Stderr
    };
    let _guard = logging::init(config.log_level, log_mode, log_level_override);

    let command = match cli.command {
        Some(Commands::Config { path, reset }) => return commands::config::run(path, reset),
        Some(Commands::Supply(command)) => command,
        None => SupplyCommands::List,
    };

    config.merge_with_args(cli.root, &cli.extensions);
    let ctx = Context::new(&config, cli.fixture)?;

    match command {
        SupplyCommands::List => commands::list::run(&ctx),
        SupplyCommands::Props { device, json } => {
            commands::props::run(&ctx, device.as_deref(), json)
        }
        SupplyCommands::Show { device, property } => {
            commands::attr::show(&ctx, &device, &property)
        }
        SupplyCommands::Store {
            device,
            property,
            value,
        } => commands::attr::store(&ctx, &device, &property, &value),
        SupplyCommands::Uevent { device, json } => commands::uevent::run(&ctx, &device, json),
        SupplyCommands::Watch {
            device,
            samples,
            interval,
            compact,
        } => commands::watch::run(&ctx, &device, samples, interval, compact),
    }
}
