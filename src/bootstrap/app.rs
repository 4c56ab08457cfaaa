//! Launches the tracker and the peers of one swarm.
//!
//! Every process is an OS thread holding one endpoint of an in-memory
//! transport world:
//!
//! ```text
//! rank 0        tracker   (Coordinator)
//! rank 1..=N    peers     (PeerAgent, reading in<rank>.txt, writing client<rank>.<file>)
//! ```
//!
//! All manifests are read before anything is launched. When a process fails
//! the whole world is shut down so that no other process blocks forever, and
//! the failure that caused the shutdown is the one reported.
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use swarmshare_configuration::Configuration;
use swarmshare_peer_core::{FileSink, PeerAgent, PeerReport};
use swarmshare_primitives::Rank;
use swarmshare_tracker_core::{Coordinator, Shutdown};
use swarmshare_transport::{LocalTransport, Transport};

use crate::storage::{self, OutputDirectory};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("The swarm needs at least one peer")]
    NoPeers,

    #[error("Invalid world: {0}")]
    World(#[from] swarmshare_primitives::Error),

    #[error(transparent)]
    Storage(#[from] storage::Error),

    #[error("Unable to create output directory {path}: {source}")]
    OutputDirectory { path: PathBuf, source: io::Error },

    #[error("Tracker failed: {0}")]
    Tracker(#[from] swarmshare_tracker_core::Error),

    #[error("Peer {rank} failed: {source}")]
    Peer {
        rank: Rank,
        source: swarmshare_peer_core::Error,
    },

    #[error("Unable to start process {name}: {source}")]
    Spawn { name: String, source: io::Error },

    #[error("Process {name} panicked")]
    Panicked { name: String },
}

impl Error {
    /// Whether this process only failed because another one shut the world down.
    fn is_world_closed(&self) -> bool {
        use swarmshare_transport::Error::WorldClosed;

        matches!(
            self,
            Error::Tracker(swarmshare_tracker_core::Error::Transport(WorldClosed))
                | Error::Peer {
                    source: swarmshare_peer_core::Error::Transport(WorldClosed),
                    ..
                }
        )
    }
}

/// The outcome of a swarm run where every process stopped cleanly.
#[derive(Debug)]
pub struct Summary {
    pub tracker: Shutdown,

    /// One report per peer, in rank order.
    pub peers: Vec<PeerReport>,
}

/// Runs a whole swarm to completion.
///
/// # Errors
///
/// Will return an error if a manifest can't be read, if the output directory
/// can't be created or if any process fails.
pub fn run(config: &Configuration) -> Result<Summary, Error> {
    let peer_count = config.tracker.peers;

    if peer_count == 0 {
        return Err(Error::NoPeers);
    }

    let manifests = Rank::peers(peer_count)?
        .map(|rank| storage::read_manifest(&config.peer.input_dir, rank).map(|manifest| (rank, manifest)))
        .collect::<Result<Vec<_>, _>>()?;

    let output_dir = &config.peer.output_dir;
    fs::create_dir_all(output_dir).map_err(|source| Error::OutputDirectory {
        path: output_dir.clone(),
        source,
    })?;
    let sink: Arc<dyn FileSink> = Arc::new(OutputDirectory::new(output_dir));

    let world = LocalTransport::world(peer_count + 1);

    tracing::info!(peers = peer_count, "launching swarm");

    let tracker = launch("tracker".to_string(), world[0].clone(), |endpoint| {
        Coordinator::new(endpoint).run().map_err(Error::from)
    })?;

    let mut peers = Vec::with_capacity(peer_count);

    for (rank, manifest) in manifests {
        let peer_config = config.peer.clone();
        let sink = sink.clone();

        let name = format!("peer-{rank}");
        let handle = launch(name.clone(), world[rank.as_index()].clone(), move |endpoint| {
            PeerAgent::new(endpoint, peer_config, manifest, sink)
                .run()
                .map_err(|source| Error::Peer { rank, source })
        })?;

        peers.push((name, handle));
    }

    let mut failures = Vec::new();
    let mut reports = Vec::with_capacity(peer_count);

    for (name, handle) in peers {
        match join(name, handle) {
            Ok(report) => reports.push(report),
            Err(error) => failures.push(error),
        }
    }

    let tracker = match join("tracker".to_string(), tracker) {
        Ok(shutdown) => Some(shutdown),
        Err(error) => {
            failures.push(error);
            None
        }
    };

    if let Some(error) = root_cause(failures) {
        tracing::error!(%error, "swarm failed");
        return Err(error);
    }

    tracker
        .map(|tracker| Summary { tracker, peers: reports })
        .ok_or(Error::Panicked {
            name: "tracker".to_string(),
        })
}

/// Shuts the world down unless the process it guards finishes cleanly.
///
/// It also fires when the process panics, as the guard is dropped while
/// unwinding, and when its thread can't be spawned at all.
struct ShutdownOnFailure {
    endpoint: LocalTransport,
    armed: bool,
}

impl Drop for ShutdownOnFailure {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!(rank = %self.endpoint.rank(), "process failed, shutting the world down");
            self.endpoint.shutdown();
        }
    }
}

fn launch<T, F>(name: String, endpoint: LocalTransport, process: F) -> Result<JoinHandle<Result<T, Error>>, Error>
where
    T: Send + 'static,
    F: FnOnce(Arc<dyn Transport>) -> Result<T, Error> + Send + 'static,
{
    let mut guard = ShutdownOnFailure {
        endpoint: endpoint.clone(),
        armed: true,
    };

    thread::Builder::new()
        .name(name.clone())
        .spawn(move || {
            let result = process(Arc::new(endpoint));
            guard.armed = result.is_err();
            result
        })
        .map_err(|source| Error::Spawn { name, source })
}

fn join<T>(name: String, handle: JoinHandle<Result<T, Error>>) -> Result<T, Error> {
    handle.join().map_err(|_| Error::Panicked { name })?
}

/// Picks the failure that brought the world down, if any.
fn root_cause(mut failures: Vec<Error>) -> Option<Error> {
    if failures.is_empty() {
        return None;
    }

    let position = failures.iter().position(|error| !error.is_world_closed()).unwrap_or(0);

    Some(failures.swap_remove(position))
}
