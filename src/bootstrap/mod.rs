//! Application bootstrap: configuration, logging and the launch of the
//! tracker and peer processes.
pub mod app;
pub mod config;
pub mod logging;
