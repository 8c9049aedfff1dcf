//! Terminal progress for one-shot runs.

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use updater_core::DownloadProgress;

fn download_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{prefix:.bold} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━╸━")
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{prefix:.bold} {spinner:.cyan} {bytes} ({bytes_per_sec})")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Renders download progress until the sender side is dropped.
///
/// Starts as a spinner and switches to a bar once the total size is known.
pub fn spawn_download_bar(mut rx: mpsc::Receiver<DownloadProgress>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let bar = ProgressBar::new_spinner();
        bar.set_style(spinner_style());
        bar.set_prefix("Downloading artifact");

        let mut sized = false;
        while let Some(progress) = rx.recv().await {
            if let (false, Some(total)) = (sized, progress.total_bytes) {
                bar.set_length(total);
                bar.set_style(download_style());
                sized = true;
            }
            bar.set_position(progress.bytes_downloaded);
        }

        bar.finish();
    })
}
