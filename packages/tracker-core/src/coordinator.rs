//! The tracker coordinator.
//!
//! The coordinator runs on rank 0 and owns the [`SwarmRegistry`]. It goes
//! through these states:
//!
//! ```text
//! CollectingCounts ─barrier─▶ CollectingMetadata ─barrier─▶ Ready ─▶ Serving ─▶ Done
//! ```
//!
//! - `CollectingCounts`: one `InitCount` from every peer, received in rank
//!   order. Their sum is the number of `InitFile` reports to expect.
//! - `CollectingMetadata`: that many `InitFile` reports, from any peer.
//! - `Ready`: one `StartSignal` to every peer.
//! - `Serving`: answers swarm requests and records completions until every
//!   peer has sent `AllDone`.
//! - `Done`: one `StopSignal` to every peer.
//!
//! While serving, the coordinator probes for the oldest message of any kind
//! and then receives exactly that message. A message it can't decode, or
//! whose kind makes no sense at this point, is drained and counted.
use std::fmt;
use std::sync::Arc;

use swarmshare_primitives::{FileDescriptor, Rank};
use swarmshare_transport::{Source, TagFilter, Transport};
use swarmshare_wire_protocol::{Message, MessageKind, MessageTransport};

use crate::error::Error;
use crate::statistics::event::handler::handle_event;
use crate::statistics::event::Event;
use crate::statistics::metrics::Metrics;
use crate::statistics::repository::Repository;
use crate::swarm::registry::{Registration, SwarmRegistry};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    CollectingCounts,
    CollectingMetadata,
    Ready,
    Serving,
    Done,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What the tracker leaves behind once every peer has been stopped.
#[derive(Debug, Clone)]
pub struct Shutdown {
    pub registry: SwarmRegistry,
    pub metrics: Metrics,
    pub stop_signals_sent: usize,
}

pub struct Coordinator {
    transport: Arc<dyn Transport>,
    registry: SwarmRegistry,
    stats_repository: Repository,
    state: State,
    expected_reports: usize,
    finished_peers: usize,
    stop_signals_sent: usize,
}

impl Coordinator {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            registry: SwarmRegistry::default(),
            stats_repository: Repository::new(),
            state: State::CollectingCounts,
            expected_reports: 0,
            finished_peers: 0,
            stop_signals_sent: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    #[must_use]
    pub fn registry(&self) -> &SwarmRegistry {
        &self.registry
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        self.stats_repository.get_stats()
    }

    /// Number of peers in the world: every process but the tracker.
    #[must_use]
    pub fn peer_count(&self) -> usize {
        self.transport.size().saturating_sub(1)
    }

    /// Runs the coordinator through all its states.
    ///
    /// # Errors
    ///
    /// Will return an error if the transport fails or if a peer sends a
    /// malformed count or owned-file report.
    pub fn run(mut self) -> Result<Shutdown, Error> {
        let span = tracing::info_span!("tracker", rank = %self.transport.rank());
        let _guard = span.enter();

        tracing::info!(peers = self.peer_count(), "tracker started");

        self.collect_counts()?;
        self.collect_metadata()?;
        self.signal_start()?;
        self.serve()?;
        self.broadcast_stop()?;

        let metrics = self.stats_repository.into_stats();

        tracing::info!(
            swarms = self.registry.len(),
            stop_signals_sent = self.stop_signals_sent,
            ?metrics,
            "tracker finished"
        );

        Ok(Shutdown {
            registry: self.registry,
            metrics,
            stop_signals_sent: self.stop_signals_sent,
        })
    }

    fn peer_ranks(&self) -> Result<impl Iterator<Item = Rank>, Error> {
        Ok(Rank::peers(self.peer_count())?)
    }

    fn transition(&mut self, state: State) {
        tracing::info!(from = %self.state, to = %state, "tracker state change");
        self.state = state;
    }

    fn collect_counts(&mut self) -> Result<(), Error> {
        for rank in self.peer_ranks()? {
            let (_, message) = self
                .transport
                .recv_kind(Source::Rank(rank), MessageKind::InitCount)
                .map_err(|error| Error::from_wire(rank, error))?;

            if let Message::InitCount { owned_files } = message {
                tracing::debug!(%rank, owned_files, "owned file count received");
                self.expected_reports += owned_files as usize;
            }
        }

        self.transport.barrier()?;
        self.transition(State::CollectingMetadata);
        Ok(())
    }

    fn collect_metadata(&mut self) -> Result<(), Error> {
        for _ in 0..self.expected_reports {
            let status = self.transport.probe(Source::Any, MessageKind::InitFile.filter())?;
            let (rank, message) = self
                .transport
                .recv_kind(Source::Rank(status.source), MessageKind::InitFile)
                .map_err(|error| Error::from_wire(status.source, error))?;

            if let Message::InitFile(file) = message {
                self.register_owned(file, rank);
            }
        }

        self.registry.debug_dump();

        self.transport.barrier()?;
        self.transition(State::Ready);
        Ok(())
    }

    fn register_owned(&mut self, file: FileDescriptor, rank: Rank) {
        let name = file.name().to_string();

        match self.registry.register_owned(file, rank) {
            Registration::New | Registration::Joined => {
                tracing::debug!(%rank, file = %name, "owned file registered");
            }
            Registration::Diverged {
                kept_chunks,
                reported_chunks,
            } => {
                tracing::warn!(
                    %rank,
                    file = %name,
                    kept_chunks,
                    reported_chunks,
                    "owned file report disagrees with the first one, keeping the first"
                );
                handle_event(Event::DivergentReport, &mut self.stats_repository);
            }
        }

        handle_event(Event::FileRegistered, &mut self.stats_repository);
    }

    fn signal_start(&mut self) -> Result<(), Error> {
        for rank in self.peer_ranks()? {
            self.send(rank, &Message::StartSignal)?;
        }

        self.transition(State::Serving);
        Ok(())
    }

    fn serve(&mut self) -> Result<(), Error> {
        while self.finished_peers < self.peer_count() {
            self.serve_next()?;
        }

        self.transition(State::Done);
        Ok(())
    }

    /// Handles the oldest pending message, waiting for one if needed.
    fn serve_next(&mut self) -> Result<(), Error> {
        let status = self.transport.probe(Source::Any, TagFilter::Any)?;

        match self
            .transport
            .recv_message(Source::Rank(status.source), TagFilter::Only(status.tag))
        {
            Ok((rank, message)) => self.dispatch(rank, message),
            Err(swarmshare_wire_protocol::Error::Transport(error)) => Err(error.into()),
            Err(error) => {
                tracing::warn!(rank = %status.source, tag = %status.tag, %error, "dropping undecodable message");
                handle_event(Event::UnexpectedMessage, &mut self.stats_repository);
                Ok(())
            }
        }
    }

    fn dispatch(&mut self, rank: Rank, message: Message) -> Result<(), Error> {
        match message {
            Message::ReqFullSwarm { name } => {
                let swarm = self.registry.lookup(&name).cloned();

                if swarm.is_some() {
                    handle_event(Event::SwarmRequestHandled, &mut self.stats_repository);
                } else {
                    tracing::debug!(%rank, file = %name, "swarm requested for an unknown file");
                    handle_event(Event::UnknownSwarmRequested, &mut self.stats_repository);
                }

                self.send(rank, &Message::SwarmData(swarm))?;
                self.registry.mark_peer(&name, rank);
            }
            Message::ReqUpdateSwarm { name } => {
                let membership = self.registry.membership(&name);
                self.send(rank, &Message::UpdateSwarm(membership))?;
                handle_event(Event::SwarmRefreshHandled, &mut self.stats_repository);
            }
            Message::FileDone { name } => {
                if self.registry.mark_seed(&name, rank) {
                    tracing::info!(%rank, file = %name, "peer became a seed");
                    handle_event(Event::FileCompleted, &mut self.stats_repository);
                } else {
                    tracing::warn!(%rank, file = %name, "completion notice for an unknown file");
                    handle_event(Event::UnexpectedMessage, &mut self.stats_repository);
                }
            }
            Message::AllDone => {
                self.finished_peers += 1;
                tracing::info!(
                    %rank,
                    finished = self.finished_peers,
                    peers = self.peer_count(),
                    "peer finished downloading"
                );
                handle_event(Event::PeerFinished, &mut self.stats_repository);
            }
            other => {
                tracing::warn!(%rank, kind = %other.kind(), "dropping unexpected message");
                handle_event(Event::UnexpectedMessage, &mut self.stats_repository);
            }
        }

        Ok(())
    }

    fn broadcast_stop(&mut self) -> Result<(), Error> {
        self.registry.debug_dump();

        for rank in self.peer_ranks()? {
            self.send(rank, &Message::StopSignal)?;
            self.stop_signals_sent += 1;
        }

        Ok(())
    }

    fn send(&self, rank: Rank, message: &Message) -> Result<(), Error> {
        self.transport
            .send_message(rank, message)
            .map_err(|error| Error::from_wire(rank, error))
    }
}
