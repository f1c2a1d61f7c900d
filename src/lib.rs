//! Volume secret preprocessing for compiled pipeline specs.
//!
//! Scans a spec's docker volumes for secret-backed mounts, deduplicates them
//! under `{volume}-{store}-{key}` and appends one engine secret per distinct
//! reference, as produced by a caller-supplied [`secrets::VolumeSecretResolver`].

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod secrets;

pub use error::{Error, Result};
