//! Reporting on stored media
//!
//! Summaries printed by the command-line tool outside of server mode.

pub mod stats;

pub use stats::{load_statistics, print_statistics, render_statistics, MediaStatistics};
