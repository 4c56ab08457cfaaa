use serde::Serialize;

/// Counters collected by the tracker while it coordinates the swarms.
#[derive(Debug, PartialEq, Eq, Default, Clone, Serialize)]
pub struct Metrics {
    /// Total number of owned-file reports registered.
    pub files_registered: u64,

    /// Owned-file reports whose chunk list disagreed with the first report.
    pub divergent_reports: u64,

    /// Total number of full swarm requests answered, unknown files included.
    pub swarm_requests_handled: u64,

    /// Full swarm requests for a file nobody owns.
    pub unknown_swarm_requests: u64,

    /// Total number of membership refreshes answered.
    pub swarm_refreshes_handled: u64,

    /// Total number of file completion notices.
    pub files_completed: u64,

    /// Peers that reported they have every file they wanted.
    pub peers_finished: u64,

    /// Messages drained while serving because their kind or payload was not expected.
    pub unexpected_messages: u64,
}
