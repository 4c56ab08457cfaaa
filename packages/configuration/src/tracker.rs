//! Tracker configuration.
use serde::{Deserialize, Serialize};

/// The shape of the closed world the tracker coordinates.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(default)]
pub struct Tracker {
    /// Number of peer processes. The world has `peers + 1` processes, the
    /// extra one being the tracker.
    pub peers: usize,
}

impl Default for Tracker {
    fn default() -> Self {
        Self { peers: 2 }
    }
}
