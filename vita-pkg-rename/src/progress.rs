use crate::rename::{BatchSummary, RenameError};
use std::path::Path;

/// Trait for receiving progress updates during a directory run.
pub trait RenameProgress {
    /// Called before a file is handled.
    fn file_start(&self, _path: &Path, _current: usize, _total: usize) {}

    /// Called when a file has been renamed (or would be, on a dry run).
    fn file_renamed(&self, _from: &Path, _to: &Path) {}

    /// Called when a file already has its computed name.
    fn file_unchanged(&self, _path: &Path) {}

    /// Called when a file could not be renamed.
    fn file_failed(&self, _path: &Path, _error: &RenameError) {}

    /// Called when every file has been handled.
    fn completed(&self, _summary: &BatchSummary) {}
}

/// A no-op progress implementation that discards all updates.
pub struct SilentProgress;

impl RenameProgress for SilentProgress {}

/// Console progress reporter using an indicatif progress bar.
///
/// Renamed and failed files are printed above the bar.
#[cfg(feature = "cli")]
pub struct ConsoleProgress {
    bar: indicatif::ProgressBar,
}

#[cfg(feature = "cli")]
impl ConsoleProgress {
    pub fn new() -> Self {
        Self {
            bar: indicatif::ProgressBar::hidden(),
        }
    }
}

#[cfg(feature = "cli")]
impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "cli")]
impl RenameProgress for ConsoleProgress {
    fn file_start(&self, _path: &Path, current: usize, total: usize) {
        if current == 0 {
            self.bar
                .set_draw_target(indicatif::ProgressDrawTarget::stderr());
            self.bar.set_length(total as u64);
            if let Ok(style) = indicatif::ProgressStyle::default_bar()
                .template("{bar:40.cyan/blue} {pos}/{len} files [{elapsed_precise}]")
            {
                self.bar.set_style(style.progress_chars("━╸─"));
            }
            self.bar.reset();
        }
    }

    fn file_renamed(&self, from: &Path, to: &Path) {
        self.bar.println(format!(
            "{} -> {}",
            display_name(from),
            display_name(to)
        ));
        self.bar.inc(1);
    }

    fn file_unchanged(&self, _path: &Path) {
        self.bar.inc(1);
    }

    fn file_failed(&self, path: &Path, error: &RenameError) {
        self.bar.println(format!(
            "{}: {}",
            display_name(path),
            snafu::Report::from_error(error)
        ));
        self.bar.inc(1);
    }

    fn completed(&self, summary: &BatchSummary) {
        self.bar.finish_and_clear();
        println!(
            "Renamed {} files ({} already named, {} failed).",
            summary.renamed,
            summary.unchanged,
            summary.failed.len()
        );
    }
}

#[cfg(feature = "cli")]
fn display_name(path: &Path) -> std::borrow::Cow<'_, str> {
    path.file_name()
        .map_or_else(|| path.to_string_lossy(), |name| name.to_string_lossy())
}
