//! Peer configuration.
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Configuration shared by every peer.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(default)]
pub struct Peer {
    /// Directory holding the `in<rank>.txt` manifests.
    pub input_dir: PathBuf,

    /// Directory where the `client<rank>.<file>` outputs are written.
    pub output_dir: PathBuf,

    /// Number of chunk acquisitions between two swarm membership refreshes.
    pub swarm_refresh_interval: u32,

    /// How long a downloader waits before asking again when nobody can give
    /// it what it needs yet, in milliseconds.
    pub retry_interval_ms: u64,

    /// Source selection policy.
    pub scheduler: SchedulerPolicy,
}

impl Peer {
    #[must_use]
    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.swarm_refresh_interval == 0 {
            return Err(Error::InvalidValue {
                option: "peer.swarm_refresh_interval",
                reason: "it must be at least 1".to_string(),
            });
        }
        self.scheduler.validate()
    }
}

impl Default for Peer {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./storage/input"),
            output_dir: PathBuf::from("./storage/output"),
            swarm_refresh_interval: 10,
            retry_interval_ms: 50,
            scheduler: SchedulerPolicy::default(),
        }
    }
}

/// How a downloader picks the process it asks for the next chunk.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(default)]
pub struct SchedulerPolicy {
    /// Extra usage a peer is charged with, compared to a seed, when the
    /// scheduler ranks candidates. A seed wins over a less used peer as long
    /// as the difference in usage is at most this value.
    pub peer_penalty: u32,

    /// Maximum number of candidates examined per class (seeds, peers) on each
    /// selection.
    pub scan_limit: usize,

    /// When a usage counter reaches this value every counter is halved.
    pub usage_decay_threshold: u32,

    /// Seed for the scan offset generator. Random when not set.
    pub rng_seed: Option<u64>,
}

impl SchedulerPolicy {
    fn validate(&self) -> Result<(), Error> {
        if self.scan_limit == 0 {
            return Err(Error::InvalidValue {
                option: "peer.scheduler.scan_limit",
                reason: "it must be at least 1".to_string(),
            });
        }
        if self.usage_decay_threshold < 2 {
            return Err(Error::InvalidValue {
                option: "peer.scheduler.usage_decay_threshold",
                reason: "it must be at least 2".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for SchedulerPolicy {
    fn default() -> Self {
        Self {
            peer_penalty: 2,
            scan_limit: 4,
            usage_decay_threshold: 64,
            rng_seed: None,
        }
    }
}
