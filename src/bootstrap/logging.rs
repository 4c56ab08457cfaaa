//! Setup for the application logging.
//!
//! It redirects the log info to the standard output with the threshold
//! defined in the configuration.
//!
//! - `Off`
//! - `Error`
//! - `Warn`
//! - `Info`
//! - `Debug`
//! - `Trace`
//!
//! Refer to the [configuration crate documentation](https://docs.rs/swarmshare-configuration)
//! to know how to change the log settings.
use std::sync::Once;

use swarmshare_configuration::{Logging, Threshold};
use tracing::level_filters::LevelFilter;

static INIT: Once = Once::new();

/// It sets up the logging.
///
/// Only the first call installs a subscriber, later calls are ignored.
pub fn setup(cfg: &Logging) {
    let filter = map_to_tracing_level_filter(cfg.threshold);

    if filter == LevelFilter::OFF {
        return;
    }

    INIT.call_once(|| {
        tracing_stdout_init(filter);
    });
}

fn map_to_tracing_level_filter(threshold: Threshold) -> LevelFilter {
    match threshold {
        Threshold::Off => LevelFilter::OFF,
        Threshold::Error => LevelFilter::ERROR,
        Threshold::Warn => LevelFilter::WARN,
        Threshold::Info => LevelFilter::INFO,
        Threshold::Debug => LevelFilter::DEBUG,
        Threshold::Trace => LevelFilter::TRACE,
    }
}

fn tracing_stdout_init(filter: LevelFilter) {
    let builder = tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_thread_names(true)
        .with_target(false);

    if builder.try_init().is_ok() {
        tracing::info!("Logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use swarmshare_configuration::{Logging, Threshold};
    use tracing::level_filters::LevelFilter;

    use super::{map_to_tracing_level_filter, setup};

    #[rstest]
    #[case(Threshold::Off, LevelFilter::OFF)]
    #[case(Threshold::Error, LevelFilter::ERROR)]
    #[case(Threshold::Warn, LevelFilter::WARN)]
    #[case(Threshold::Info, LevelFilter::INFO)]
    #[case(Threshold::Debug, LevelFilter::DEBUG)]
    #[case(Threshold::Trace, LevelFilter::TRACE)]
    fn it_should_map_every_threshold_to_a_level_filter(#[case] threshold: Threshold, #[case] expected: LevelFilter) {
        assert_eq!(map_to_tracing_level_filter(threshold), expected);
    }

    #[test]
    fn it_should_be_safe_to_set_up_the_logging_more_than_once() {
        let cfg = Logging {
            threshold: Threshold::Error,
        };

        setup(&cfg);
        setup(&cfg);
    }
}
