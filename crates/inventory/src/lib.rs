#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`InventoryError`)
//! - [`format`]: Package database parsers (`PackageDb` trait, `ApkDb`, `DpkgDb`)
//! - [`locator`]: Target filesystem access (`TargetFs`, `LocalFs`, `ContainerFs`, `all_present`)
//! - [`scanner`]: Main orchestrator (`InventoryScanner`, `InventoryScannerBuilder`)
//!
//! # Architecture
//!
//! ```text
//! formats x targets
//!       |
//! all_present(files_needed, TargetFs)  -- absent --> skip
//!       |
//! materialize (container: ContainerExtractor -> scratch; local: in place)
//!       |
//! PackageDb.parse() --> Vec<PackageRecord> --> Report
//! ```

pub mod error;
pub mod format;
pub mod locator;
pub mod scanner;

// --- Public API Re-exports ---

// Scanner (main orchestrator)
pub use scanner::{InventoryScanner, InventoryScannerBuilder};

// Formats
pub use format::{ApkDb, DpkgDb, PackageDb, default_formats};

// Locator
pub use locator::{ContainerFs, LocalFs, TargetFs, all_present};

// Error
pub use error::InventoryError;
