//! Configuration data structures for the swarm tracker and its peers.
//!
//! The configuration is loaded from a [TOML](https://toml.io/en/) file. Every
//! section and every option has a default, so an empty file is a valid
//! configuration:
//!
//! ```toml
//! [logging]
//! threshold = "info"
//!
//! [tracker]
//! peers = 2
//!
//! [peer]
//! input_dir = "./storage/input"
//! output_dir = "./storage/output"
//! swarm_refresh_interval = 10
//! retry_interval_ms = 50
//!
//! [peer.scheduler]
//! peer_penalty = 2
//! scan_limit = 4
//! usage_decay_threshold = 64
//! ```
//!
//! Refer to each section type for the meaning of every option.
pub mod logging;
pub mod peer;
pub mod tracker;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use crate::logging::{Logging, Threshold};
pub use crate::peer::{Peer, SchedulerPolicy};
pub use crate::tracker::Tracker;

/// The environment variable that may hold the path to the configuration file.
pub const ENV_VAR_CONFIG_TOML_PATH: &str = "SWARMSHARE_CONFIG_TOML_PATH";

/// The default configuration file path.
pub const DEFAULT_PATH_CONFIG_TOML: &str = "./share/default/config/swarmshare.toml";

/// Errors that can occur when loading the configuration.
#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    #[error("Unable to load from config file {path}: {source}")]
    UnableToLoadFromConfigFile { path: PathBuf, source: Arc<std::io::Error> },

    #[error("Failed processing the TOML configuration: {source}")]
    ConfigTomlParse { source: toml::de::Error },

    #[error("Invalid value for {option}: {reason}")]
    InvalidValue { option: &'static str, reason: String },
}

/// Core configuration for the whole swarm.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Default, Clone)]
#[serde(default)]
pub struct Configuration {
    /// Logging configuration.
    pub logging: Logging,

    /// Tracker and world size configuration.
    pub tracker: Tracker,

    /// Configuration shared by every peer.
    pub peer: Peer,
}

impl Configuration {
    /// Parses and validates a configuration from its TOML text.
    ///
    /// # Errors
    ///
    /// Will return an error if the text is not valid TOML, if it does not match
    /// the configuration schema, or if a value is out of range.
    pub fn from_toml(config_toml: &str) -> Result<Self, Error> {
        let configuration: Configuration =
            toml::from_str(config_toml).map_err(|source| Error::ConfigTomlParse { source })?;

        configuration.validate()?;

        Ok(configuration)
    }

    /// Loads the configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Will return an error if the file can't be read or if its content is not
    /// a valid configuration.
    pub fn load_from_file(path: &Path) -> Result<Self, Error> {
        let config_toml = std::fs::read_to_string(path).map_err(|err| Error::UnableToLoadFromConfigFile {
            path: path.to_path_buf(),
            source: Arc::new(err),
        })?;

        Self::from_toml(&config_toml)
    }

    /// Checks the values that the type system can't.
    ///
    /// # Errors
    ///
    /// Will return [`Error::InvalidValue`] for the first option out of range.
    pub fn validate(&self) -> Result<(), Error> {
        self.peer.validate()
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Will return an error if the configuration can't be serialized.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}
