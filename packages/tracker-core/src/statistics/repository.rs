use super::metrics::Metrics;

/// Storage for the tracker metrics.
///
/// The coordinator is single-threaded, so the repository is owned by it
/// and updated through `&mut self`.
#[derive(Debug, Default, Clone)]
pub struct Repository {
    stats: Metrics,
}

impl Repository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get_stats(&self) -> &Metrics {
        &self.stats
    }

    #[must_use]
    pub fn into_stats(self) -> Metrics {
        self.stats
    }

    pub fn increase_files_registered(&mut self) {
        self.stats.files_registered += 1;
    }

    pub fn increase_divergent_reports(&mut self) {
        self.stats.divergent_reports += 1;
    }

    pub fn increase_swarm_requests_handled(&mut self) {
        self.stats.swarm_requests_handled += 1;
    }

    pub fn increase_unknown_swarm_requests(&mut self) {
        self.stats.unknown_swarm_requests += 1;
    }

    pub fn increase_swarm_refreshes_handled(&mut self) {
        self.stats.swarm_refreshes_handled += 1;
    }

    pub fn increase_files_completed(&mut self) {
        self.stats.files_completed += 1;
    }

    pub fn increase_peers_finished(&mut self) {
        self.stats.peers_finished += 1;
    }

    pub fn increase_unexpected_messages(&mut self) {
        self.stats.unexpected_messages += 1;
    }
}
