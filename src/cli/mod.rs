//! CLI module - command-line entry helpers

pub mod runner;

pub use runner::{resolve_query, run_once, run_until, RunExit, DEFAULT_QUERY};
