mod error;

pub use self::error::RenameError;

use self::error::*;
use crate::progress::RenameProgress;
use snafu::{OptionExt, ResultExt, ensure};
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use vita_pkg::PkgInfo;

/// Extension of the files picked up in a directory run.
const PKG_EXTENSION: &str = "pkg";

/// What happened to a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// The file was renamed to `to`.
    Renamed { to: PathBuf },
    /// The file already has its computed name.
    Unchanged,
    /// Dry run: the file would have been renamed to `to`.
    Planned { to: PathBuf },
}

/// Result of a directory run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Files renamed (or planned to be, on a dry run).
    pub renamed: usize,
    /// Files that already had their computed name.
    pub unchanged: usize,
    /// Files that could not be renamed.
    pub failed: Vec<(PathBuf, RenameError)>,
}

impl BatchSummary {
    /// Returns `true` if every file was handled.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Renames PKG files after their title, title ID and region.
pub struct PkgRenamer<P: RenameProgress> {
    progress: P,
    dry_run: bool,
}

impl<P: RenameProgress> PkgRenamer<P> {
    /// Creates a new renamer.
    ///
    /// If `dry_run` is `true`, names are computed but nothing on disk is
    /// touched.
    pub fn new(progress: P, dry_run: bool) -> Self {
        Self { progress, dry_run }
    }

    /// Computes the path `path` should be renamed to.
    ///
    /// The new name always stays in the same directory. A computed name that
    /// is not a single plain file name fails with [`RenameError::UnsafeName`].
    pub fn target_path(&self, path: &Path) -> Result<PathBuf, RenameError> {
        let name = {
            let pkg = unsafe { crate::open_pkg(path).context(OpenPkgFailedSnafu { path })? };
            PkgInfo::read(&pkg)
                .context(ReadInfoFailedSnafu { path })?
                .file_name()
            // Mapping is dropped here, before anything is renamed.
        };

        let mut components = Path::new(&name).components();
        ensure!(
            matches!(
                (components.next(), components.next()),
                (Some(Component::Normal(_)), None)
            ),
            UnsafeNameSnafu { path, name }
        );

        let parent = path.parent().unwrap_or(Path::new(""));
        Ok(parent.join(name))
    }

    /// Renames a single PKG file in place.
    ///
    /// Fails if a file with the computed name already exists, on a dry run
    /// too.
    pub fn rename_file(&self, path: &Path) -> Result<RenameOutcome, RenameError> {
        let current = path.file_name().context(NoFileNameSnafu { path })?;
        let to = self.target_path(path)?;

        if to.file_name() == Some(current) {
            log::info!("{} is already named", path.display());
            return Ok(RenameOutcome::Unchanged);
        }

        let exists = to.try_exists().context(RenameFailedSnafu {
            from: path,
            to: &to,
        })?;
        ensure!(!exists, TargetExistsSnafu { from: path, to });

        if self.dry_run {
            return Ok(RenameOutcome::Planned { to });
        }

        std::fs::rename(path, &to).context(RenameFailedSnafu {
            from: path,
            to: &to,
        })?;
        log::info!("renamed {} to {}", path.display(), to.display());

        Ok(RenameOutcome::Renamed { to })
    }

    /// Renames every `.pkg` file directly inside `dir`.
    ///
    /// Files are handled in name order. A failure on one file is reported
    /// and recorded in the summary, then the next file is handled.
    pub fn rename_dir(&self, dir: &Path) -> Result<BatchSummary, RenameError> {
        let files = list_pkg_files(dir)?;
        let total = files.len();
        let mut summary = BatchSummary::default();

        for (num, path) in files.into_iter().enumerate() {
            self.progress.file_start(&path, num, total);

            match self.rename_file(&path) {
                Ok(RenameOutcome::Unchanged) => {
                    self.progress.file_unchanged(&path);
                    summary.unchanged += 1;
                }
                Ok(RenameOutcome::Renamed { to } | RenameOutcome::Planned { to }) => {
                    self.progress.file_renamed(&path, &to);
                    summary.renamed += 1;
                }
                Err(e) => {
                    log::warn!("{}: {}", path.display(), snafu::Report::from_error(&e));
                    self.progress.file_failed(&path, &e);
                    summary.failed.push((path, e));
                }
            }
        }

        self.progress.completed(&summary);

        Ok(summary)
    }
}

/// Lists the regular files in `dir` whose extension is exactly `pkg`.
fn list_pkg_files(dir: &Path) -> Result<Vec<PathBuf>, RenameError> {
    let entries = std::fs::read_dir(dir).context(ReadDirectoryFailedSnafu { path: dir })?;
    let mut files = Vec::new();

    for entry in entries {
        let entry = entry.context(ReadDirectoryFailedSnafu { path: dir })?;
        let path = entry.path();

        if path.is_file() && path.extension() == Some(OsStr::new(PKG_EXTENSION)) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
#[path = "../tests/rename_tests.rs"]
mod tests;
