//! # bach-abi
//!
//! Command-line interface for the BachLedger ABI codec.
//!
//! ## Usage
//!
//! ```bash
//! # Selectors and call data
//! bach-abi selector "transfer(address,uint256)"
//! bach-abi call encode "transfer(address,uint256)" '["0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed", "1000"]'
//! bach-abi call decode "transfer(address,uint256)" 0xa9059cbb...
//! bach-abi call decode-return "balanceOf(address)" "(uint256)" 0x...
//!
//! # Single types
//! bach-abi type canonical "(uint,fixed)[]"
//! bach-abi type encode "(int16,string)" '[-1, "hi"]' --packed
//! bach-abi type decode "uint8[]" 0x...
//!
//! # Addresses and dumps
//! bach-abi address checksum 0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed
//! bach-abi format --call 0xa9059cbb...
//! ```

use std::path::{Path, PathBuf};

use bach_abi::Labels;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;
mod json;
mod output;

pub use config::Config;
pub use error::CliError;
pub use output::Output;

/// BachLedger ABI codec CLI
#[derive(Parser, Debug)]
#[command(name = "bach-abi")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Log filter (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Config file (defaults to ~/.bachledger/abi.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the 4-byte selector of a function signature
    Selector {
        /// Function signature, e.g. "transfer(address,uint256)"
        signature: String,
    },
    /// Encode and decode function calls
    #[command(subcommand)]
    Call(commands::call::CallCommand),
    /// Parse, encode and decode single types
    #[command(subcommand)]
    Type(commands::types::TypeCommand),
    /// Address checksums
    #[command(subcommand)]
    Address(commands::address::AddressCommand),
    /// Hex dump an encoding one word per line
    Format {
        /// Encoded data (hex)
        data: String,
        /// Data starts with a 4-byte selector
        #[arg(long)]
        call: bool,
        /// Label style: none, rows or offsets
        #[arg(long)]
        labels: Option<Labels>,
    },
    /// Show or edit configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set selector hash algorithm
        #[arg(long)]
        set_hash: Option<String>,
        /// Set default label style
        #[arg(long)]
        set_labels: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Load config
    let mut config = Config::load(cli.config.as_deref());

    let level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level)))
        .init();
    tracing::debug!(
        hash_algorithm = %config.hash_algorithm,
        labels = %config.labels,
        "configuration loaded"
    );

    let result = match cli.command {
        Commands::Selector { signature } => {
            commands::call::selector(&config, &signature, cli.json)
        }
        Commands::Call(cmd) => cmd.execute(&config, cli.json),
        Commands::Type(cmd) => cmd.execute(&config, cli.json),
        Commands::Address(cmd) => cmd.execute(&config, cli.json),
        Commands::Format { data, call, labels } => {
            commands::format::execute(&config, &data, call, labels, cli.json)
        }
        Commands::Config {
            show,
            set_hash,
            set_labels,
        } => handle_config(
            &mut config,
            cli.config.as_deref(),
            show,
            set_hash,
            set_labels,
            cli.json,
        ),
    };

    if let Err(e) = result {
        if cli.json {
            println!(
                "{}",
                serde_json::json!({
                    "error": e.to_string(),
                    "success": false
                })
            );
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn handle_config(
    config: &mut Config,
    path: Option<&Path>,
    show: bool,
    set_hash: Option<String>,
    set_labels: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let mut modified = false;

    if let Some(hash) = set_hash {
        config.hash_algorithm = hash;
        config.hasher()?;
        modified = true;
    }

    if let Some(labels) = set_labels {
        config.labels = labels;
        config.label_style()?;
        modified = true;
    }

    if modified {
        config.save(path)?;
        Output::new(json)
            .field("status", "saved")
            .message("Configuration saved")
            .print();
    } else if show {
        Output::new(json)
            .field("hash_algorithm", &config.hash_algorithm)
            .field("labels", &config.labels)
            .field("log_level", &config.log_level)
            .message(&format!(
                "Hash algorithm: {}\nLabels: {}\nLog level: {}",
                config.hash_algorithm, config.labels, config.log_level
            ))
            .print();
    } else {
        Output::new(json)
            .message("Use --show to display config, or --set-hash/--set-labels to modify")
            .print();
    }

    Ok(())
}
