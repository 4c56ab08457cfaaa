//! The uploader worker.
//!
//! The uploader answers chunk requests from any process until the tracker
//! sends `StopSignal`. It only ever receives those two kinds, so replies meant
//! for the downloader stay in the mailbox.
use std::sync::Arc;

use swarmshare_primitives::Rank;
use swarmshare_transport::{Source, Transport};
use swarmshare_wire_protocol::{Message, MessageKind, MessageTransport};

use crate::error::Error;
use crate::file_table::FileTable;
use crate::transfer::answer;

/// What the uploader did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UploadReport {
    pub chunk_requests_served: u64,
    pub chunk_requests_refused: u64,
}

pub struct Uploader {
    transport: Arc<dyn Transport>,
    table: FileTable,
    report: UploadReport,
}

impl Uploader {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, table: FileTable) -> Self {
        Self {
            transport,
            table,
            report: UploadReport::default(),
        }
    }

    /// Serves chunk requests until the tracker stops the peer.
    ///
    /// # Errors
    ///
    /// Will return an error if the transport fails.
    pub fn run(mut self) -> Result<UploadReport, Error> {
        let filter = MessageKind::any_of(&[MessageKind::ChunkRequest, MessageKind::StopSignal]);

        loop {
            let (rank, message) = match self.transport.recv_message(Source::Any, filter.clone()) {
                Ok(received) => received,
                Err(swarmshare_wire_protocol::Error::Transport(error)) => return Err(error.into()),
                Err(error) => {
                    tracing::warn!(%error, "dropping undecodable message");
                    continue;
                }
            };

            match message {
                Message::ChunkRequest(request) => {
                    let response = answer(&self.table, &request);

                    if response.has_chunk {
                        self.report.chunk_requests_served += 1;
                    } else {
                        self.report.chunk_requests_refused += 1;
                    }

                    tracing::debug!(
                        requester = %rank,
                        file = %request.filename,
                        index = request.chunk_index,
                        has_chunk = response.has_chunk,
                        "chunk request answered"
                    );

                    self.reply(rank, Message::ChunkResponse(response))?;
                }
                Message::StopSignal if rank.is_tracker() => {
                    tracing::info!(
                        served = self.report.chunk_requests_served,
                        refused = self.report.chunk_requests_refused,
                        "stop signal received"
                    );
                    return Ok(self.report);
                }
                other => {
                    tracing::warn!(%rank, kind = %other.kind(), "ignoring unexpected message");
                }
            }
        }
    }

    fn reply(&self, rank: Rank, message: Message) -> Result<(), Error> {
        self.transport
            .send_message(rank, &message)
            .map_err(|error| Error::from_wire(rank, error))
    }
}
