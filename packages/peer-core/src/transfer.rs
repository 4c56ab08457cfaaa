//! The chunk transfer protocol.
//!
//! The requester sends a `ChunkRequest` to the chosen source and blocks until
//! that same source answers with a `ChunkResponse`. Only hashes travel. A
//! positive answer is accepted only if its hash matches the one the swarm
//! metadata announces for that index.
use swarmshare_primitives::{ChunkId, Rank};
use swarmshare_transport::{Source, Transport};
use swarmshare_wire_protocol::{ChunkRequest, ChunkResponse, Message, MessageKind, MessageTransport};

use crate::error::Error;
use crate::file_table::FileTable;

/// The outcome of asking one source for one chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transfer {
    /// The source sent the expected chunk.
    Received(ChunkId),

    /// The source does not have the chunk.
    Refused,

    /// The source sent a chunk that does not match the metadata.
    Rejected { received: ChunkId },
}

/// Asks `source` for chunk `index` of `filename` and checks the answer
/// against `expected`.
///
/// # Errors
///
/// Will return an error if the transport fails or the answer is malformed.
pub fn request_chunk(
    transport: &dyn Transport,
    source: Rank,
    filename: &str,
    index: usize,
    expected: &ChunkId,
) -> Result<Transfer, Error> {
    let request = Message::ChunkRequest(ChunkRequest {
        filename: filename.to_string(),
        chunk_index: index,
    });

    transport
        .send_message(source, &request)
        .map_err(|error| Error::from_wire(source, error))?;

    let (_, reply) = transport
        .recv_kind(Source::Rank(source), MessageKind::ChunkResponse)
        .map_err(|error| Error::from_wire(source, error))?;

    let Message::ChunkResponse(response) = reply else {
        return Err(Error::from_wire(
            source,
            swarmshare_wire_protocol::Error::UnexpectedKind {
                expected: MessageKind::ChunkResponse,
                actual: reply.kind(),
            },
        ));
    };

    Ok(match response.chunk() {
        Some(received) if received == expected => Transfer::Received(*received),
        Some(received) => Transfer::Rejected { received: *received },
        None => Transfer::Refused,
    })
}

/// The answer to a chunk request, given what the peer holds.
#[must_use]
pub fn answer(table: &FileTable, request: &ChunkRequest) -> ChunkResponse {
    match table.chunk(&request.filename, request.chunk_index) {
        Some(hash) => ChunkResponse::found(hash),
        None => ChunkResponse::missing(),
    }
}
