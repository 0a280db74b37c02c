//! jvl - Value Locator CLI
//!
//! Usage:
//!   jvl load require:./settings.json      # Load and print a value
//!   jvl load a.json b.json -d require     # Apply a default protocol
//!   jvl parse require:./settings.json     # Show protocol and target
//!   jvl stringify require ./settings.json # Build a locator string

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jvl_core::prelude::*;

use crate::config::ConfigStore;

#[derive(Parser)]
#[command(name = "jvl")]
#[command(about = "Resolve value locators", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load one or more locators and print the result as JSON
    Load {
        /// Locators (`protocol:target`); targets alone use the default protocol
        #[arg(required = true)]
        locators: Vec<String>,

        /// Directory relative targets are resolved from
        #[arg(long)]
        cwd: Option<String>,

        /// Extra protocol option (KEY=VALUE, VALUE parsed as JSON when possible)
        #[arg(short, long = "option", value_name = "KEY=VALUE")]
        options: Vec<String>,

        /// Protocol applied to locators without one (overrides jvl.toml)
        #[arg(short, long)]
        default_protocol: Option<String>,

        /// Print JSON on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Split a locator string into protocol and target
    Parse {
        /// Locator string
        locator: String,
    },

    /// Join a protocol and a target into a locator string
    Stringify {
        /// Protocol name
        protocol: String,
        /// Target
        target: String,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jvl_core=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Load {
            locators,
            cwd,
            options,
            default_protocol,
            compact,
        } => run_load(locators, cwd, options, default_protocol, compact),
        Commands::Parse { locator } => {
            let parts = parse(&locator)?;
            println!("{}", serde_json::to_string_pretty(&parts)?);
            Ok(())
        }
        Commands::Stringify { protocol, target } => {
            println!("{}", stringify(&LocatorParts::new(protocol, target))?);
            Ok(())
        }
    }
}

fn run_load(
    locators: Vec<String>,
    cwd: Option<String>,
    raw_options: Vec<String>,
    default_protocol: Option<String>,
    compact: bool,
) -> Result<()> {
    let config = ConfigStore::discover()?.load()?;

    let mut options = config.options;
    for raw in &raw_options {
        let (key, value) = parse_option(raw)?;
        options.insert(key, value);
    }
    if let Some(cwd) = cwd {
        options.insert("cwd".to_string(), Value::String(cwd));
    }

    let locators: Vec<Locator> = locators.into_iter().map(Locator::from).collect();
    let locators = match default_protocol.or(config.default_protocol) {
        Some(protocol) => set_locators_default_protocol(&locators, &protocol)?,
        None => locators,
    };

    tracing::debug!(count = locators.len(), "loading locators");

    let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let value = if locators.len() == 1 {
        let locator = locators.into_iter().next().context("no locator given")?;
        runtime.block_on(Loader::default().load(locator, Some(options))?)?
    } else {
        let values = runtime.block_on(Loader::default().load_all(locators, options)?)?;
        Value::Array(values)
    };

    let output = if compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };
    println!("{}", output);

    Ok(())
}

/// Parse `KEY=VALUE`, reading VALUE as JSON and falling back to a string.
fn parse_option(raw: &str) -> Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .with_context(|| format!("Invalid option '{}': expected KEY=VALUE", raw))?;

    if key.is_empty() {
        anyhow::bail!("Invalid option '{}': empty key", raw);
    }

    let value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
