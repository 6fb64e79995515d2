//! Learner: a Discord bot that answers questions from a local knowledge base.
//!
//! This crate wires the workspace together. [`Args`] is the command line,
//! [`run`] loads configuration, embeds the knowledge base, and serves Discord
//! until Ctrl-C.

#![warn(missing_docs)]

mod app;
mod cli;
mod observability;

pub use app::{check, load_config, run};
pub use cli::{Args, DEFAULT_CONFIG_PATH};
pub use observability::{init_observability, init_tracing, shutdown_observability};
