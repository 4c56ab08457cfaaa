//! Peer core errors.
use std::io;

use swarmshare_primitives::Rank;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A message from `rank` could not be encoded, decoded or was not the one expected.
    #[error("Protocol error while talking to {rank}: {source}")]
    Protocol {
        rank: Rank,
        source: swarmshare_wire_protocol::Error,
    },

    #[error("Transport failure: {0}")]
    Transport(#[from] swarmshare_transport::Error),

    /// A downloaded file could not be written out.
    #[error("Unable to persist file {name}: {source}")]
    Persist { name: String, source: io::Error },

    /// A chunk landed outside the file it was downloaded for.
    #[error("Unable to store chunk {index} of file {name}")]
    UnstorableChunk { name: String, index: usize },

    /// Every chunk was downloaded but the file is still not complete.
    #[error("File {name} is incomplete after its download")]
    IncompleteFile { name: String },

    /// The owned file count does not fit in the init message.
    #[error("Too many owned files to report: {count}")]
    TooManyFiles { count: usize },

    #[error("Unable to spawn the {worker} worker: {source}")]
    Spawn { worker: &'static str, source: io::Error },

    #[error("The {worker} worker panicked")]
    WorkerPanicked { worker: &'static str },
}

impl Error {
    /// Splits a wire error into a transport failure and a protocol error.
    pub(crate) fn from_wire(rank: Rank, error: swarmshare_wire_protocol::Error) -> Self {
        match error {
            swarmshare_wire_protocol::Error::Transport(source) => Error::Transport(source),
            source => Error::Protocol { rank, source },
        }
    }
}
