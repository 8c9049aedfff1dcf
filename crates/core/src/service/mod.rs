//! Service lifecycle control.
//!
//! Wraps the external service manager (systemd's `systemctl` by default)
//! behind the [`ServiceManager`] trait so the update flow can be exercised
//! against a fake in tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use updater_core::service::{ServiceManager, SystemctlManager};
//!
//! let manager = SystemctlManager::new("systemctl");
//! manager.stop("app.service").await?;
//! ```

mod error;
mod systemctl;
mod traits;
mod types;

pub use error::ServiceError;
pub use systemctl::SystemctlManager;
pub use traits::ServiceManager;
pub use types::{ServiceAction, ServiceOutput};
