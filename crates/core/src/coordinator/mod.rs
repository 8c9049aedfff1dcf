//! Update coordination.
//!
//! Sequences one update attempt: resolve, download, back up, stop the
//! service, replace the binary, extract the payload into it and restart the
//! service. Disk-level failures after the backup restore the previous binary
//! exactly once.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use updater_core::coordinator::UpdateCoordinator;
//!
//! let coordinator = UpdateCoordinator::new(config, registry, fetcher, service);
//! let report = coordinator.run().await?;
//! println!("installed {} ({} bytes)", report.payload_entry, report.bytes_written);
//! ```

mod backup;
mod error;
mod runner;
mod types;

pub use backup::BackupManager;
pub use error::{FailureKind, UpdateError};
pub use runner::UpdateCoordinator;
pub use types::{AttemptSummary, UpdateReport, UpdateState};
