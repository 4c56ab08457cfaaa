pub mod handler;

/// Something worth counting happened in the coordinator.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Event {
    // Collection
    FileRegistered,
    DivergentReport,

    // Serving
    SwarmRequestHandled,
    UnknownSwarmRequested,
    SwarmRefreshHandled,
    FileCompleted,
    PeerFinished,
    UnexpectedMessage,
}
