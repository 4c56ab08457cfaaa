//! The peer side of the conversation with the tracker.
//!
//! Every call that expects an answer blocks until the tracker replies. Replies
//! are received by source and kind, so they never get mixed up with the chunk
//! traffic handled by the uploader on the same endpoint.
use std::sync::Arc;

use swarmshare_primitives::{FileDescriptor, Swarm, SwarmMembership, TRACKER_RANK};
use swarmshare_transport::{Source, Transport};
use swarmshare_wire_protocol::{Message, MessageKind, MessageTransport};

use crate::error::Error;

#[derive(Clone)]
pub struct TrackerClient {
    transport: Arc<dyn Transport>,
}

impl TrackerClient {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Reports the owned files: their count, a barrier, one report per file
    /// and a second barrier.
    ///
    /// # Errors
    ///
    /// Will return an error if the transport fails or if there are more
    /// owned files than the count can carry.
    pub fn report_owned(&self, owned: &[FileDescriptor]) -> Result<(), Error> {
        let owned_files = owned_count(owned.len())?;

        self.send(&Message::InitCount { owned_files })?;
        self.transport.barrier()?;

        for file in owned {
            self.send(&Message::InitFile(file.clone()))?;
        }
        self.transport.barrier()?;

        Ok(())
    }

    /// Waits until the tracker lets the peers start.
    ///
    /// # Errors
    ///
    /// Will return an error if the transport fails.
    pub fn await_start(&self) -> Result<(), Error> {
        self.receive(MessageKind::StartSignal).map(|_| ())
    }

    /// Asks for the whole swarm of a file, joining it as a peer.
    ///
    /// Returns `None` if the tracker does not know the file yet.
    ///
    /// # Errors
    ///
    /// Will return an error if the transport fails or the reply is malformed.
    pub fn request_swarm(&self, name: &str) -> Result<Option<Swarm>, Error> {
        self.send(&Message::ReqFullSwarm { name: name.to_string() })?;

        match self.receive(MessageKind::SwarmData)? {
            Message::SwarmData(swarm) => Ok(swarm),
            other => Err(unexpected(MessageKind::SwarmData, &other)),
        }
    }

    /// Asks for the current membership of a swarm.
    ///
    /// # Errors
    ///
    /// Will return an error if the transport fails or the reply is malformed.
    pub fn refresh_swarm(&self, name: &str) -> Result<SwarmMembership, Error> {
        self.send(&Message::ReqUpdateSwarm { name: name.to_string() })?;

        match self.receive(MessageKind::UpdateSwarm)? {
            Message::UpdateSwarm(membership) => Ok(membership),
            other => Err(unexpected(MessageKind::UpdateSwarm, &other)),
        }
    }

    /// Tells the tracker this peer now owns every chunk of `name`.
    ///
    /// # Errors
    ///
    /// Will return an error if the transport fails.
    pub fn file_done(&self, name: &str) -> Result<(), Error> {
        self.send(&Message::FileDone { name: name.to_string() })
    }

    /// Tells the tracker this peer has every file it wanted.
    ///
    /// # Errors
    ///
    /// Will return an error if the transport fails.
    pub fn all_done(&self) -> Result<(), Error> {
        self.send(&Message::AllDone)
    }

    fn send(&self, message: &Message) -> Result<(), Error> {
        self.transport
            .send_message(TRACKER_RANK, message)
            .map_err(|error| Error::from_wire(TRACKER_RANK, error))
    }

    fn receive(&self, kind: MessageKind) -> Result<Message, Error> {
        self.transport
            .recv_kind(Source::Rank(TRACKER_RANK), kind)
            .map(|(_, message)| message)
            .map_err(|error| Error::from_wire(TRACKER_RANK, error))
    }
}

/// The owned file count as carried by `InitCount`.
fn owned_count(count: usize) -> Result<u32, Error> {
    u32::try_from(count).map_err(|_| Error::TooManyFiles { count })
}

fn unexpected(expected: MessageKind, actual: &Message) -> Error {
    Error::from_wire(
        TRACKER_RANK,
        swarmshare_wire_protocol::Error::UnexpectedKind {
            expected,
            actual: actual.kind(),
        },
    )
}
