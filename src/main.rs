use clap::Parser;
use swarmshare::bootstrap::{self, config::Args};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let configuration = bootstrap::config::initialize_configuration(&args)?;

    bootstrap::logging::setup(&configuration.logging);

    let summary = bootstrap::app::run(&configuration)?;

    for report in &summary.peers {
        tracing::info!(
            rank = %report.rank,
            downloaded = report.downloaded.len(),
            served = report.chunk_requests_served,
            refused = report.chunk_requests_refused,
            rejected = report.chunk_attempts_rejected,
            "peer finished"
        );
    }

    tracing::info!(
        stop_signals = summary.tracker.stop_signals_sent,
        swarms = summary.tracker.registry.len(),
        "swarm finished"
    );

    Ok(())
}
