//! The downloader worker.
//!
//! For every wanted file the peer does not own yet, the downloader:
//!
//! 1. Asks the tracker for the swarm of the file, waiting and asking again
//!    while the tracker does not know it.
//! 2. Fetches the missing chunks in index order, one request in flight at a
//!    time, picking each source with the [`ChunkScheduler`].
//! 3. Refreshes the swarm membership every `swarm_refresh_interval`
//!    acquisitions, and whenever every member refused the current chunk.
//! 4. Persists the completed file and tells the tracker it is now a seed.
//!
//! Once every file is downloaded it sends `AllDone` and returns.
use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use swarmshare_configuration::Peer;
use swarmshare_primitives::{FileDescriptor, Rank, Swarm};
use swarmshare_transport::Transport;

use crate::error::Error;
use crate::file_table::FileTable;
use crate::scheduler::ChunkScheduler;
use crate::sink::FileSink;
use crate::tracker_client::TrackerClient;
use crate::transfer::{request_chunk, Transfer};

/// What the downloader did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    /// The files downloaded, in completion order.
    pub downloaded: Vec<FileDescriptor>,

    /// Chunks received with a hash that did not match the swarm metadata.
    pub chunk_attempts_rejected: u64,
}

pub struct Downloader {
    rank: Rank,
    transport: Arc<dyn Transport>,
    tracker: TrackerClient,
    table: FileTable,
    scheduler: ChunkScheduler,
    sink: Arc<dyn FileSink>,
    refresh_interval: u32,
    retry_interval: Duration,
    report: DownloadReport,
}

impl Downloader {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, config: &Peer, table: FileTable, sink: Arc<dyn FileSink>) -> Self {
        let rank = transport.rank();

        Self {
            rank,
            tracker: TrackerClient::new(transport.clone()),
            transport,
            table,
            scheduler: ChunkScheduler::new(rank, config.scheduler.clone()),
            sink,
            refresh_interval: config.swarm_refresh_interval.max(1),
            retry_interval: config.retry_interval(),
            report: DownloadReport::default(),
        }
    }

    /// Downloads every file in `wanted` and then reports completion to the
    /// tracker.
    ///
    /// # Errors
    ///
    /// Will return an error if the transport fails, if a message is malformed
    /// or if a completed file can't be persisted.
    pub fn run<I, S>(mut self, wanted: I) -> Result<DownloadReport, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in wanted {
            let name = name.as_ref();

            if self.table.is_complete(name) {
                tracing::debug!(file = name, "already owned, skipping");
                continue;
            }

            let descriptor = self.download(name)?;
            self.report.downloaded.push(descriptor);
        }

        self.tracker.all_done()?;
        tracing::info!(files = self.report.downloaded.len(), "every wanted file downloaded");

        Ok(self.report)
    }

    fn download(&mut self, name: &str) -> Result<FileDescriptor, Error> {
        let swarm = self.join_swarm(name)?;
        let mut membership = swarm.membership.clone();

        tracing::info!(
            file = name,
            total_chunks = swarm.metadata.total_chunks(),
            seeds = membership.seed_count(),
            peers = membership.peer_count(),
            "downloading"
        );

        self.table.expect(name, swarm.metadata.total_chunks());
        self.scheduler.reset();

        let mut acquired: u32 = 0;

        for (index, expected) in swarm.metadata.chunks().iter().enumerate() {
            if self.table.chunk(name, index).as_ref() == Some(expected) {
                continue;
            }

            let mut refused = BTreeSet::new();

            loop {
                let Some(source) = self.scheduler.select(&membership, &refused) else {
                    tracing::debug!(file = name, index, "no source left for chunk, refreshing swarm");
                    membership = self.tracker.refresh_swarm(name)?;
                    refused.clear();
                    thread::sleep(self.retry_interval);
                    continue;
                };

                match request_chunk(self.transport.as_ref(), source, name, index, expected)? {
                    Transfer::Received(chunk) => {
                        self.table.store(name, index, chunk)?;
                        self.scheduler.record_acquisition(source);
                        acquired += 1;
                        tracing::debug!(file = name, index, %source, "chunk received");
                        break;
                    }
                    Transfer::Refused => {
                        tracing::debug!(file = name, index, %source, "source does not have the chunk");
                        refused.insert(source);
                    }
                    Transfer::Rejected { received } => {
                        tracing::warn!(file = name, index, %source, %received, %expected, "chunk hash mismatch");
                        self.report.chunk_attempts_rejected += 1;
                        refused.insert(source);
                    }
                }
            }

            if acquired % self.refresh_interval == 0 {
                membership = self.tracker.refresh_swarm(name)?;
            }
        }

        self.finish(name)
    }

    /// Asks the tracker for the swarm of `name` until it knows the file.
    fn join_swarm(&self, name: &str) -> Result<Swarm, Error> {
        loop {
            if let Some(swarm) = self.tracker.request_swarm(name)? {
                return Ok(swarm);
            }

            tracing::debug!(file = name, "nobody shares the file yet, retrying");
            thread::sleep(self.retry_interval);
        }
    }

    fn finish(&self, name: &str) -> Result<FileDescriptor, Error> {
        let descriptor = self.table.descriptor(name).ok_or_else(|| Error::IncompleteFile {
            name: name.to_string(),
        })?;

        self.sink
            .persist(self.rank, &descriptor)
            .map_err(|source| Error::Persist {
                name: name.to_string(),
                source,
            })?;

        self.tracker.file_done(name)?;
        tracing::info!(file = name, "file complete");

        Ok(descriptor)
    }
}
