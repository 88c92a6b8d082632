#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`DockerError`)
//! - [`client`]: Docker API abstraction (`DockerClient` trait, `BollardDockerClient`)
//! - [`archive`]: Tar stream handling (`first_entry_bytes`, `first_entry_stat`)
//! - [`extract`]: Single-file extraction (`ContainerExtractor`)
//!
//! # Architecture
//!
//! ```text
//! ContainerExtractor.extract(id, path)
//!        |
//!   DockerClient.fetch_archive()  -- tokio::time::timeout --
//!        |
//!   archive::first_entry_bytes()
//!        |
//!   Vec<u8> (raw file contents)
//! ```

pub mod archive;
pub mod client;
pub mod error;
pub mod extract;

// --- Public API Re-exports ---

// Docker API
pub use client::{BollardDockerClient, DockerClient};

// Extraction
pub use extract::ContainerExtractor;

// Error
pub use error::DockerError;
