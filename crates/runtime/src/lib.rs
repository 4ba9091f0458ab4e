//! Process lifecycle utilities for the homework bot.
#![allow(clippy::uninlined_format_args)]

/// Shutdown signal handling
pub mod shutdown;

#[cfg(test)]
mod shutdown_test;
