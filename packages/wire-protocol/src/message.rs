//! Typed messages and their payload encoding.
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use swarmshare_primitives::{ChunkId, FileDescriptor, Swarm, SwarmMembership};

use crate::{Error, MessageKind};

/// Every message of the protocol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    /// How many files the sending peer owns at start.
    InitCount { owned_files: u32 },
    /// One file owned by the sending peer.
    InitFile(FileDescriptor),
    StartSignal,
    /// Asks for the whole swarm of a file and joins it as a peer.
    ReqFullSwarm { name: String },
    /// Asks for the current membership of a swarm.
    ReqUpdateSwarm { name: String },
    /// The swarm of the requested file, `None` if the tracker does not know it.
    SwarmData(Option<Swarm>),
    UpdateSwarm(SwarmMembership),
    ChunkRequest(ChunkRequest),
    ChunkResponse(ChunkResponse),
    /// The sender now owns every chunk of the named file.
    FileDone { name: String },
    /// The sender has downloaded every file it wanted.
    AllDone,
    StopSignal,
}

/// A request for one chunk of a file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRequest {
    pub filename: String,
    pub chunk_index: usize,
}

/// The answer to a [`ChunkRequest`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkResponse {
    pub has_chunk: bool,
    pub hash: Option<ChunkId>,
}

impl ChunkResponse {
    #[must_use]
    pub fn found(hash: ChunkId) -> Self {
        Self {
            has_chunk: true,
            hash: Some(hash),
        }
    }

    #[must_use]
    pub fn missing() -> Self {
        Self {
            has_chunk: false,
            hash: None,
        }
    }

    /// The hash carried by a positive answer.
    #[must_use]
    pub fn chunk(&self) -> Option<&ChunkId> {
        if self.has_chunk {
            self.hash.as_ref()
        } else {
            None
        }
    }
}

#[derive(Serialize, Deserialize)]
struct InitCount {
    owned_files: u32,
}

#[derive(Serialize, Deserialize)]
struct FileName {
    name: String,
}

impl Message {
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::InitCount { .. } => MessageKind::InitCount,
            Message::InitFile(_) => MessageKind::InitFile,
            Message::StartSignal => MessageKind::StartSignal,
            Message::ReqFullSwarm { .. } => MessageKind::ReqFullSwarm,
            Message::ReqUpdateSwarm { .. } => MessageKind::ReqUpdateSwarm,
            Message::SwarmData(_) => MessageKind::SwarmData,
            Message::UpdateSwarm(_) => MessageKind::UpdateSwarm,
            Message::ChunkRequest(_) => MessageKind::ChunkRequest,
            Message::ChunkResponse(_) => MessageKind::ChunkResponse,
            Message::FileDone { .. } => MessageKind::FileDone,
            Message::AllDone => MessageKind::AllDone,
            Message::StopSignal => MessageKind::StopSignal,
        }
    }

    /// Encodes the payload of the message.
    ///
    /// # Errors
    ///
    /// Will return [`Error::Encode`] if the payload can't be serialized.
    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        let kind = self.kind();
        let encoded = match self {
            Message::StartSignal | Message::AllDone | Message::StopSignal => return Ok(Vec::new()),
            Message::InitCount { owned_files } => serde_json::to_vec(&InitCount {
                owned_files: *owned_files,
            }),
            Message::InitFile(descriptor) => serde_json::to_vec(descriptor),
            Message::ReqFullSwarm { name } | Message::ReqUpdateSwarm { name } | Message::FileDone { name } => {
                serde_json::to_vec(&FileName { name: name.clone() })
            }
            Message::SwarmData(swarm) => serde_json::to_vec(swarm),
            Message::UpdateSwarm(membership) => serde_json::to_vec(membership),
            Message::ChunkRequest(request) => serde_json::to_vec(request),
            Message::ChunkResponse(response) => serde_json::to_vec(response),
        };
        encoded.map_err(|source| Error::Encode { kind, source })
    }

    /// Decodes a payload received under `kind`.
    ///
    /// # Errors
    ///
    /// Will return [`Error::Decode`] if the payload does not match the kind.
    pub fn decode(kind: MessageKind, payload: &[u8]) -> Result<Self, Error> {
        let message = match kind {
            MessageKind::StartSignal => Message::StartSignal,
            MessageKind::AllDone => Message::AllDone,
            MessageKind::StopSignal => Message::StopSignal,
            MessageKind::InitCount => {
                let InitCount { owned_files } = parse(kind, payload)?;
                Message::InitCount { owned_files }
            }
            MessageKind::InitFile => Message::InitFile(parse(kind, payload)?),
            MessageKind::ReqFullSwarm => {
                let FileName { name } = parse(kind, payload)?;
                Message::ReqFullSwarm { name }
            }
            MessageKind::ReqUpdateSwarm => {
                let FileName { name } = parse(kind, payload)?;
                Message::ReqUpdateSwarm { name }
            }
            MessageKind::FileDone => {
                let FileName { name } = parse(kind, payload)?;
                Message::FileDone { name }
            }
            MessageKind::SwarmData => Message::SwarmData(parse(kind, payload)?),
            MessageKind::UpdateSwarm => Message::UpdateSwarm(parse(kind, payload)?),
            MessageKind::ChunkRequest => Message::ChunkRequest(parse(kind, payload)?),
            MessageKind::ChunkResponse => Message::ChunkResponse(parse(kind, payload)?),
        };
        Ok(message)
    }
}

fn parse<T: DeserializeOwned>(kind: MessageKind, payload: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(payload).map_err(|source| Error::Decode { kind, source })
}
