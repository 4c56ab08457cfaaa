//! **SwarmShare** runs a swarm of peers that share files chunk by chunk under
//! the coordination of a tracker.
//!
//! # Table of contents
//!
//! - [Introduction](#introduction)
//! - [Running the swarm](#running-the-swarm)
//! - [Configuration](#configuration)
//! - [Input and output files](#input-and-output-files)
//! - [Components](#components)
//!
//! # Introduction
//!
//! A file is a list of chunks, and a chunk is identified by its content hash.
//! Each peer starts with some files and wants some others. The tracker knows
//! which peers hold each file and hands that list, the swarm, to whoever asks.
//! Peers then download the chunks they are missing from each other and serve
//! the chunks they hold, until every peer has everything it wanted.
//!
//! This crate is the launcher: it runs the tracker and every peer as threads
//! of one OS process, connected by an in-memory transport.
//!
//! # Running the swarm
//!
//! ```text
//! cargo run -- --peers 3 --input-dir ./storage/input --output-dir ./storage/output
//! ```
//!
//! The process exits with a non-zero status if any peer or the tracker fails.
//!
//! # Configuration
//!
//! The configuration is read from a TOML file, by default
//! `./share/default/config/swarmshare.toml`. Another path can be given with
//! `--config` or with the `SWARMSHARE_CONFIG_TOML_PATH` environment variable.
//! See [`bootstrap::config`].
//!
//! # Input and output files
//!
//! Peer `r` reads its manifest from `<input_dir>/in<r>.txt` and writes every
//! file it downloads to `<output_dir>/client<r>.<file>`. See [`storage`].
//!
//! # Components
//!
//! - `swarmshare-transport`: the blocking tagged transport.
//! - `swarmshare-wire-protocol`: the message catalog.
//! - `swarmshare-tracker-core`: the tracker coordinator and swarm registry.
//! - `swarmshare-peer-core`: the peer agent, its workers and the chunk scheduler.
pub mod bootstrap;
pub mod storage;
