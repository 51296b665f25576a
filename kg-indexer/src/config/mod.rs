//! Configuration for the knowledge-graph indexer.
//!
//! Values come from `.env`, then the environment, then command line flags.

mod cli;
mod dependencies;
mod settings;

pub use cli::Cli;
pub use dependencies::Dependencies;
pub use settings::{SearchBackend, Settings};
