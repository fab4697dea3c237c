//! Command-line front end for the momentum crates.

pub mod cli;
pub mod config;
pub mod runner;
