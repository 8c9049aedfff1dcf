//! Fetcher module for downloading artifact archives.
//!
//! The `Fetcher` trait turns a resolved artifact into a local archive file.
//! `HttpFetcher` asks the registry for the redirect target, then streams the
//! payload into a temp file that lives exactly as long as the returned
//! `DownloadedArchive`.
//!
//! # Example
//!
//! ```ignore
//! use updater_core::fetcher::{Fetcher, HttpFetcher};
//!
//! let fetcher = HttpFetcher::new(registry.clone(), None)?;
//! let archive = fetcher.fetch(&artifact).await?;
//! println!("Downloaded {} bytes to {}", archive.size_bytes(), archive.path().display());
//! // temp file removed here
//! drop(archive);
//! ```

mod error;
mod http;
mod traits;
mod types;

pub use error::FetchError;
pub use http::HttpFetcher;
pub use traits::Fetcher;
pub use types::{DownloadProgress, DownloadedArchive};
