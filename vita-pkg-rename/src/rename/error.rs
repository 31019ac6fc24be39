use snafu::Snafu;
use std::path::PathBuf;

/// Errors that can occur while renaming a PKG.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(super)))]
pub enum RenameError {
    #[snafu(display("failed to open PKG file {}", path.display()))]
    OpenPkgFailed {
        path: PathBuf,
        source: crate::OpenPkgError,
    },

    #[snafu(display("failed to read PKG metadata from {}", path.display()))]
    ReadInfoFailed {
        path: PathBuf,
        source: vita_pkg::InfoError,
    },

    #[snafu(display("computed name {name:?} for {} is not a plain file name", path.display()))]
    UnsafeName { path: PathBuf, name: String },

    #[snafu(display("{} has no file name", path.display()))]
    NoFileName { path: PathBuf },

    #[snafu(display("cannot rename {} to {}: target already exists", from.display(), to.display()))]
    TargetExists { from: PathBuf, to: PathBuf },

    #[snafu(display("cannot rename {} to {}", from.display(), to.display()))]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("cannot read directory {}", path.display()))]
    ReadDirectoryFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}
