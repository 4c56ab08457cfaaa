use crate::statistics::event::Event;
use crate::statistics::repository::Repository;

pub fn handle_event(event: Event, stats_repository: &mut Repository) {
    match event {
        // Collection
        Event::FileRegistered => {
            stats_repository.increase_files_registered();
        }
        Event::DivergentReport => {
            stats_repository.increase_divergent_reports();
        }

        // Serving
        Event::SwarmRequestHandled => {
            stats_repository.increase_swarm_requests_handled();
        }
        Event::UnknownSwarmRequested => {
            stats_repository.increase_swarm_requests_handled();
            stats_repository.increase_unknown_swarm_requests();
        }
        Event::SwarmRefreshHandled => {
            stats_repository.increase_swarm_refreshes_handled();
        }
        Event::FileCompleted => {
            stats_repository.increase_files_completed();
        }
        Event::PeerFinished => {
            stats_repository.increase_peers_finished();
        }
        Event::UnexpectedMessage => {
            stats_repository.increase_unexpected_messages();
        }
    }

    tracing::trace!("stats: {:?}", stats_repository.get_stats());
}
