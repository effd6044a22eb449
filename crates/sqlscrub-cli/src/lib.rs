//! Directory runner behind the `sqlscrub` binary.
//!
//! The engine itself lives in `sqlscrub-core`; this crate finds the files,
//! reads the table list and writes results back.

pub mod error;
pub mod files;
pub mod runner;

pub use error::{Result, ScrubError};
pub use runner::{process_file, run, FileOutcome, Options, RunSummary};
