//! Tracker core errors.
//!
//! The coordinator only fails when it can't talk to its peers: either the
//! transport is gone or a message it can't do without (a count or an owned
//! file report during collection) is malformed. Anomalies while serving are
//! drained and counted instead.
use swarmshare_primitives::Rank;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A collection message could not be decoded.
    #[error("Protocol error while talking to peer {rank}: {source}")]
    Protocol {
        rank: Rank,
        source: swarmshare_wire_protocol::Error,
    },

    #[error("Transport failure: {0}")]
    Transport(#[from] swarmshare_transport::Error),

    /// The transport world is too large to address every peer.
    #[error("Invalid world: {0}")]
    World(#[from] swarmshare_primitives::Error),
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

#[cfg(test)]
mod tests {

    mod tracker_error {
        use swarmshare_primitives::Rank;
        use swarmshare_transport::Tag;

        use crate::error::Error;

        #[test]
        fn protocol_error() {
            let err = Error::from_wire(Rank::new(3), swarmshare_wire_protocol::Error::UnknownTag { tag: Tag::new(7) });

            let err_msg = format!("{err}");

            assert!(
                err_msg.contains("Protocol error while talking to peer 3"),
                "Error message did not contain expected text: {err_msg}"
            );
        }

        #[test]
        fn transport_failure() {
            let err = Error::from_wire(
                Rank::new(3),
                swarmshare_wire_protocol::Error::Transport(swarmshare_transport::Error::WorldClosed),
            );

            assert!(matches!(err, Error::Transport(swarmshare_transport::Error::WorldClosed)));
        }
    }
}
