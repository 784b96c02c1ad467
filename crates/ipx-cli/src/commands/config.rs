//! Config command - inspect and edit the configuration file.
//!
//! Every subcommand works on the file named by the global `--config` flag,
//! or on the default location when the flag is absent.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use ipx_core::IpxConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print one value (e.g. "extraction.gst_noise_floor")
    Get { key: String },

    /// Change one value; the result must still be a valid configuration
    Set { key: String, value: String },

    /// Print the configuration file location
    Path,
}

pub fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path.map_or_else(default_config_path, PathBuf::from);

    match args.command {
        ConfigCommand::Show => {
            println!("{}", serde_json::to_string_pretty(&load_or_default(&path)?)?);
        }
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
            }
            write_config(&path, &IpxConfig::default())?;
            println!("{} Wrote defaults to {}", style("✓").green(), path.display());
        }
        ConfigCommand::Get { key } => {
            let json = serde_json::to_value(load_or_default(&path)?)?;
            let value = lookup(&json, &key)
                .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
            println!("{}", value);
        }
        ConfigCommand::Set { key, value } => {
            let mut json = serde_json::to_value(load_or_default(&path)?)?;
            let value = parse_value(&value);
            assign(&mut json, &key, value.clone())?;

            let config: IpxConfig = serde_json::from_value(json)
                .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;
            write_config(&path, &config)?;
            println!("{} {} = {}", style("✓").green(), key, value);
        }
        ConfigCommand::Path => {
            let status = if path.exists() {
                style("exists").green()
            } else {
                style("not created").yellow()
            };
            println!("{} ({})", path.display(), status);
        }
    }

    Ok(())
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ipx")
        .join("config.json")
}

fn load_or_default(path: &Path) -> anyhow::Result<IpxConfig> {
    if path.exists() {
        Ok(IpxConfig::from_file(path)?)
    } else {
        Ok(IpxConfig::default())
    }
}

fn write_config(path: &Path, config: &IpxConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;
    Ok(())
}

/// JSON when it parses, a plain string otherwise.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn lookup<'a>(json: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(json, |node, part| node.get(part))
}

/// Replace an existing leaf; unknown keys are rejected rather than added.
fn assign(json: &mut Value, key: &str, value: Value) -> anyhow::Result<()> {
    let (parent, leaf) = match key.rsplit_once('.') {
        Some((parent, leaf)) => (
            parent
                .split('.')
                .try_fold(json, |node, part| node.get_mut(part)),
            leaf,
        ),
        None => (Some(json), key),
    };

    match parent.and_then(Value::as_object_mut) {
        Some(object) if object.contains_key(leaf) => {
            object.insert(leaf.to_string(), value);
            Ok(())
        }
        _ => anyhow::bail!("Configuration key not found: {}", key),
    }
}
