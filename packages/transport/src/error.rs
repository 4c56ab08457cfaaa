//! Transport errors.
use swarmshare_primitives::Rank;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The destination rank is not part of the world.
    #[error("Unknown rank {rank}, the world has {size} processes")]
    UnknownRank { rank: Rank, size: usize },

    /// The world was shut down, usually because one of its processes failed.
    #[error("The transport world has been shut down")]
    WorldClosed,
}
