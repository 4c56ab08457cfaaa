//! The peer agent: one peer process from start to stop.
//!
//! ```text
//! Init ─▶ Reporting ─▶ AwaitStart ─▶ Active ─▶ AllDoneSent ─▶ AwaitStop ─▶ Exit
//! ```
//!
//! While `Active` the agent runs two workers on their own threads, sharing the
//! file table and the transport endpoint:
//!
//! - the [`Downloader`], which fetches every wanted file and sends `AllDone`;
//! - the [`Uploader`], which serves chunks until the tracker sends `StopSignal`.
//!
//! If the downloader fails the agent returns its error right away without
//! waiting for the uploader. The caller is expected to tear the transport
//! down, which ends the uploader too.
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use swarmshare_configuration::Peer;
use swarmshare_primitives::{FileDescriptor, Rank};
use swarmshare_transport::Transport;

use crate::downloader::Downloader;
use crate::error::Error;
use crate::file_table::FileTable;
use crate::manifest::Manifest;
use crate::sink::FileSink;
use crate::tracker_client::TrackerClient;
use crate::uploader::Uploader;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Init,
    Reporting,
    AwaitStart,
    Active,
    AllDoneSent,
    AwaitStop,
    Exit,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What a peer did, once stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerReport {
    pub rank: Rank,
    pub downloaded: Vec<FileDescriptor>,
    pub chunk_requests_served: u64,
    pub chunk_requests_refused: u64,
    pub chunk_attempts_rejected: u64,
}

pub struct PeerAgent {
    rank: Rank,
    transport: Arc<dyn Transport>,
    config: Peer,
    manifest: Manifest,
    table: FileTable,
    sink: Arc<dyn FileSink>,
    state: State,
}

impl PeerAgent {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, config: Peer, manifest: Manifest, sink: Arc<dyn FileSink>) -> Self {
        let table = FileTable::new(&manifest.owned, manifest.to_download());

        Self {
            rank: transport.rank(),
            transport,
            config,
            manifest,
            table,
            sink,
            state: State::Init,
        }
    }

    #[must_use]
    pub fn rank(&self) -> Rank {
        self.rank
    }

    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    /// The file table shared with the workers.
    #[must_use]
    pub fn files(&self) -> &FileTable {
        &self.table
    }

    /// Runs the peer until the tracker stops it.
    ///
    /// # Errors
    ///
    /// Will return an error if the transport fails, if a completed file can't
    /// be persisted or if a worker can't be started or panics.
    pub fn run(&mut self) -> Result<PeerReport, Error> {
        let span = tracing::info_span!("peer", rank = %self.rank);
        let _guard = span.enter();

        let tracker = TrackerClient::new(self.transport.clone());

        self.transition(State::Reporting);
        tracker.report_owned(&self.manifest.owned)?;

        self.transition(State::AwaitStart);
        tracker.await_start()?;

        self.transition(State::Active);

        let uploader = Uploader::new(self.transport.clone(), self.table.clone());
        let uploader = self.spawn("uploader", move || uploader.run())?;

        let downloader = Downloader::new(
            self.transport.clone(),
            &self.config,
            self.table.clone(),
            self.sink.clone(),
        );
        let wanted: Vec<String> = self.manifest.to_download().map(ToString::to_string).collect();
        let downloader = self.spawn("downloader", move || downloader.run(wanted))?;

        let download = join("downloader", downloader)?;
        self.transition(State::AllDoneSent);

        self.transition(State::AwaitStop);
        let upload = join("uploader", uploader)?;

        self.transition(State::Exit);

        Ok(PeerReport {
            rank: self.rank,
            downloaded: download.downloaded,
            chunk_requests_served: upload.chunk_requests_served,
            chunk_requests_refused: upload.chunk_requests_refused,
            chunk_attempts_rejected: download.chunk_attempts_rejected,
        })
    }

    fn transition(&mut self, state: State) {
        tracing::info!(from = %self.state, to = %state, "peer state change");
        self.state = state;
    }

    fn spawn<T, F>(&self, worker: &'static str, work: F) -> Result<JoinHandle<Result<T, Error>>, Error>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, Error> + Send + 'static,
    {
        let span = tracing::info_span!("worker", name = worker);

        thread::Builder::new()
            .name(format!("peer-{}-{worker}", self.rank))
            .spawn(move || span.in_scope(work))
            .map_err(|source| Error::Spawn { worker, source })
    }
}

fn join<T>(worker: &'static str, handle: JoinHandle<Result<T, Error>>) -> Result<T, Error> {
    handle.join().map_err(|_| Error::WorkerPanicked { worker })?
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use swarmshare_configuration::Peer;
    use swarmshare_primitives::Rank;
    use swarmshare_transport::{LocalTransport, Source, Transport};
    use swarmshare_wire_protocol::{Message, MessageKind, MessageTransport};

    use crate::agent::{PeerAgent, State};
    use crate::manifest::Manifest;
    use crate::test_helpers::tests::{sample_file, MemorySink};

    #[test]
    fn a_new_agent_should_hold_its_owned_files() {
        let world = LocalTransport::world(2);
        let manifest = Manifest {
            owned: vec![sample_file()],
            wanted: vec![],
        };

        let agent = PeerAgent::new(Arc::new(world[1].clone()), Peer::default(), manifest, Arc::new(MemorySink::default()));

        assert_eq!(agent.state(), State::Init);
        assert_eq!(agent.rank(), Rank::new(1));
        assert!(agent.files().is_complete("file1"));
    }

    #[test]
    fn a_seed_that_wants_nothing_should_report_its_files_finish_and_wait_for_the_stop_signal() {
        let world = LocalTransport::world(2);
        let endpoint: Arc<dyn Transport> = Arc::new(world[1].clone());
        let manifest = Manifest {
            owned: vec![sample_file()],
            wanted: vec!["file1".to_string()],
        };

        let peer = thread::spawn(move || {
            let mut agent = PeerAgent::new(endpoint, Peer::default(), manifest, Arc::new(MemorySink::default()));
            let report = agent.run();
            (agent.state(), report)
        });

        let tracker = &world[0];
        let (_, count) = tracker.recv_kind(Source::Rank(Rank::new(1)), MessageKind::InitCount).unwrap();
        assert_eq!(count, Message::InitCount { owned_files: 1 });
        tracker.barrier().unwrap();
        let (_, file) = tracker.recv_kind(Source::Any, MessageKind::InitFile).unwrap();
        assert_eq!(file, Message::InitFile(sample_file()));
        tracker.barrier().unwrap();

        tracker.send_message(Rank::new(1), &Message::StartSignal).unwrap();
        tracker.recv_kind(Source::Rank(Rank::new(1)), MessageKind::AllDone).unwrap();
        tracker.send_message(Rank::new(1), &Message::StopSignal).unwrap();

        let (state, report) = peer.join().unwrap();
        let report = report.unwrap();

        assert_eq!(state, State::Exit);
        assert!(report.downloaded.is_empty());
        assert_eq!(report.rank, Rank::new(1));
        assert_eq!(tracker.pending(), 0);
    }
}
