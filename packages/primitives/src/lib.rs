//! Primitive types shared by every package in the `swarmshare` workspace.
//!
//! The tracker and the peers only agree on a handful of concepts:
//!
//! - [`Rank`]: the identity of a process in the closed world. Rank `0` is the
//!   tracker, ranks `1..=N` are peers.
//! - [`ChunkId`]: the fixed-size content hash identifying one chunk.
//! - [`FileDescriptor`]: a file name plus its ordered chunk hashes.
//! - [`SwarmMembership`]: which ranks fully own a file (seeds) and which are
//!   still downloading it (peers).
//! - [`Swarm`]: the descriptor and the membership of one file, as the tracker
//!   stores it and as peers receive it.
//!
//! ```text
//! Swarm
//! ├── metadata: FileDescriptor { name, chunks: [ChunkId; total_chunks] }
//! └── membership: SwarmMembership { seeds: {Rank}, peers: {Rank} }
//! ```
pub mod chunk;
pub mod file;
pub mod rank;
pub mod swarm;

pub use chunk::{ChunkId, HASH_SIZE};
pub use file::{FileDescriptor, MAX_FILE_NAME_LEN};
pub use rank::{Rank, TRACKER_RANK};
pub use swarm::{Swarm, SwarmMembership};

/// Errors raised when building primitives from untrusted input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The file name is empty or longer than [`MAX_FILE_NAME_LEN`] bytes.
    #[error("Invalid file name: {name:?}, it must have between 1 and {MAX_FILE_NAME_LEN} bytes")]
    InvalidFileName { name: String },

    /// A chunk hash does not have exactly [`HASH_SIZE`] bytes.
    #[error("Invalid chunk id: expected {HASH_SIZE} bytes, got {len}")]
    InvalidChunkId { len: usize },

    /// The declared chunk count does not match the number of chunk hashes.
    #[error("File {name} declares {declared} chunks but lists {listed}")]
    ChunkCountMismatch { name: String, declared: usize, listed: usize },

    /// The world has more peers than there are ranks.
    #[error("Too many peers: {count}, a world can't have more than {} peers", u32::MAX)]
    TooManyPeers { count: usize },
}
