//! CLI module for ttl-memo
//!
//! Provides subcommands for exercising the memoization layer:
//! - `demo`: runs the memoization scenarios against an in-memory store

pub mod demo;

use clap::{Parser, Subcommand};

/// ttl-memo - Transparent TTL memoization for sync and async operations
#[derive(Parser)]
#[command(name = "ttl-memo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the memoization scenarios and report cache behaviour
    Demo(demo::DemoArgs),
}
