//! The core `swarmshare-peer-core` crate contains everything a peer process
//! does: it reports its files to the tracker, downloads the files it wants
//! chunk by chunk from the other members of their swarms, and serves its own
//! chunks to whoever asks.
//!
//! # Table of contents
//!
//! - [Manifest](#manifest)
//! - [File table](#file-table)
//! - [Workers](#workers)
//! - [Chunk scheduler](#chunk-scheduler)
//! - [Persistence](#persistence)
//!
//! # Manifest
//!
//! A [`Manifest`](manifest::Manifest) lists the files a peer owns when it
//! starts (with their chunk hashes) and the names of the files it wants.
//!
//! # File table
//!
//! The [`FileTable`](file_table::FileTable) holds, per file, which chunks the
//! peer has. It is shared by the two workers of the peer.
//!
//! # Workers
//!
//! The [`PeerAgent`](agent::PeerAgent) reports the owned files to the tracker,
//! waits for the start signal and then runs two workers on their own threads:
//!
//! ```text
//!  tracker ◀──▶ Downloader ──▶ FileTable ◀── Uploader ◀──▶ other peers
//! ```
//!
//! The [`Downloader`](downloader::Downloader) fetches the wanted files and the
//! [`Uploader`](uploader::Uploader) answers chunk requests until the tracker
//! stops the peer.
//!
//! # Chunk scheduler
//!
//! The [`ChunkScheduler`](scheduler::ChunkScheduler) picks which member of a
//! swarm to ask for the next chunk, balancing the load between them.
//!
//! # Persistence
//!
//! Completed files are handed to a [`FileSink`](sink::FileSink).
pub mod agent;
pub mod downloader;
pub mod error;
pub mod file_table;
pub mod manifest;
pub mod scheduler;
pub mod sink;
pub mod tracker_client;
pub mod transfer;
pub mod uploader;

pub mod test_helpers;

pub use agent::{PeerAgent, PeerReport, State};
pub use error::Error;
pub use manifest::Manifest;
pub use sink::FileSink;
