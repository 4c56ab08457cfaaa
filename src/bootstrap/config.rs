//! Command line arguments and configuration loading.
//!
//! The configuration file is looked up in this order:
//!
//! 1. The `--config` argument, or the `SWARMSHARE_CONFIG_TOML_PATH`
//!    environment variable.
//! 2. The default path `./share/default/config/swarmshare.toml`, if it exists.
//!
//! Without a file every option takes its default value. Command line
//! arguments override the values read from the file.
use std::path::{Path, PathBuf};

use clap::Parser;
use swarmshare_configuration::{Configuration, DEFAULT_PATH_CONFIG_TOML, ENV_VAR_CONFIG_TOML_PATH};

#[derive(Parser, Debug, Default, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, env = ENV_VAR_CONFIG_TOML_PATH)]
    pub config: Option<PathBuf>,

    /// Number of peer processes.
    #[arg(long)]
    pub peers: Option<usize>,

    /// Directory holding the `in<rank>.txt` manifests.
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Directory where the downloaded files are written.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

/// Builds the configuration from the file and the command line overrides.
///
/// # Errors
///
/// Will return an error if the configuration file can't be loaded, or if the
/// resulting configuration is invalid.
pub fn initialize_configuration(args: &Args) -> Result<Configuration, swarmshare_configuration::Error> {
    let mut configuration = match &args.config {
        Some(path) => Configuration::load_from_file(path)?,
        None if Path::new(DEFAULT_PATH_CONFIG_TOML).exists() => {
            Configuration::load_from_file(Path::new(DEFAULT_PATH_CONFIG_TOML))?
        }
        None => Configuration::default(),
    };

    if let Some(peers) = args.peers {
        configuration.tracker.peers = peers;
    }
    if let Some(input_dir) = &args.input_dir {
        configuration.peer.input_dir.clone_from(input_dir);
    }
    if let Some(output_dir) = &args.output_dir {
        configuration.peer.output_dir.clone_from(output_dir);
    }

    configuration.validate()?;

    Ok(configuration)
}
