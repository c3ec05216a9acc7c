//! # Train Checkpoint
//!
//! Periodic, rotating checkpoints for long-running training processes.
//! A [`CheckpointManager`](checkpoint::CheckpointManager) owns one run
//! directory, keeps at most `max_to_keep` snapshot files in it, and restores
//! the most recent one into a live model after a restart.
//!
//! ## Modules
//!
//! - [`checkpoint`] — Manager, file naming, directory discovery, model trait
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod checkpoint;
pub mod config;
pub mod error;
