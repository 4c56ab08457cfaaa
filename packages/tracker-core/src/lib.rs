//! The core `swarmshare-tracker-core` crate contains the tracker logic: the
//! registry of swarms and the coordinator loop that keeps it up to date.
//!
//! It is a domain layer independent of the way processes are wired together.
//! The coordinator talks to the peers through any
//! [`Transport`](swarmshare_transport::Transport).
//!
//! ```text
//!   Delivery layer       |   Domain layer
//! ----------------------------------------------
//!   In-memory transport  |-> Tracker coordinator -> Swarm registry
//! ```
//!
//! # Table of contents
//!
//! - [Introduction](#introduction)
//! - [Swarm registry](#swarm-registry)
//! - [Coordinator](#coordinator)
//! - [Statistics](#statistics)
//!
//! # Introduction
//!
//! The tracker is the process with rank 0. It never holds any chunk. Its
//! responsibilities are:
//!
//! - To learn which files every peer owns when the world starts.
//! - To hand out the swarm of a file to the peers that want it.
//! - To keep the swarm memberships up to date as peers complete files.
//! - To stop every peer once all of them have everything they wanted.
//!
//! # Swarm registry
//!
//! The [`SwarmRegistry`](swarm::registry::SwarmRegistry) maps every known
//! file name to its swarm: the file metadata (chunk hashes) reported by its
//! first owner and the ranks of its seeds and peers.
//!
//! ```rust,no_run
//! use swarmshare_primitives::{FileDescriptor, Rank};
//! use swarmshare_tracker_core::swarm::registry::SwarmRegistry;
//!
//! let mut registry = SwarmRegistry::default();
//! let file = FileDescriptor::named("file1").unwrap();
//!
//! registry.register_owned(file, Rank::new(1));
//! registry.mark_peer("file1", Rank::new(2));
//! ```
//!
//! # Coordinator
//!
//! The [`Coordinator`](coordinator::Coordinator) drives the registry from the
//! messages peers send. See the [`coordinator`] module for its states.
//!
//! # Statistics
//!
//! Every dispatch outcome is counted in the [`statistics`] module and returned
//! in the final [`Shutdown`](coordinator::Shutdown) report.
pub mod coordinator;
pub mod error;
pub mod statistics;
pub mod swarm;

pub mod test_helpers;

pub use coordinator::{Coordinator, Shutdown, State};
pub use error::Error;
