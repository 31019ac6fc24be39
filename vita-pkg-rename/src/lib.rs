//! Library for renaming PlayStation Vita PKG files.
//!
//! This crate provides the host side of `vita-pkg`: it maps package files
//! from disk, computes their names with [`vita_pkg::PkgInfo`] and renames
//! them in place.
//!
//! # Overview
//!
//! The main entry point is [`PkgRenamer`], which takes a [`RenameProgress`]
//! implementation and renames either a single file or every `.pkg` file in
//! a directory.
//!
//! # Example
//!
//! ```no_run
//! use vita_pkg_rename::{PkgRenamer, SilentProgress};
//!
//! let renamer = PkgRenamer::new(SilentProgress, false);
//! renamer.rename_file("PCSE00001.pkg".as_ref()).expect("rename failed");
//! ```
//!
//! # Custom progress reporting
//!
//! You can implement the [`RenameProgress`] trait to be told about every file
//! handled in a directory run.

pub mod progress;
pub mod rename;

pub use self::progress::{RenameProgress, SilentProgress};
pub use self::rename::{BatchSummary, PkgRenamer, RenameError, RenameOutcome};

#[cfg(feature = "cli")]
pub use self::progress::ConsoleProgress;

use snafu::{ResultExt, Snafu};
use std::path::Path;

/// Errors that can occur when opening a PKG file from disk.
#[derive(Debug, Snafu)]
pub enum OpenPkgError {
    #[snafu(display("failed to open file"))]
    OpenFile { source: std::io::Error },

    #[snafu(display("failed to memory map file"))]
    MmapFile { source: std::io::Error },

    #[snafu(display("failed to parse PKG"))]
    ParsePkg { source: vita_pkg::OpenError },
}

/// Opens a PKG file from disk using a memory-mapped read.
///
/// The size of the package is the length of the mapping. The header is
/// parsed and validated before returning.
///
/// # Safety
///
/// This function uses `unsafe` internally to create a memory map. The caller
/// must ensure the file is not modified or truncated while the returned `Pkg`
/// is in use.
pub unsafe fn open_pkg(path: &Path) -> Result<vita_pkg::Pkg<memmap2::Mmap>, OpenPkgError> {
    let file = std::fs::File::open(path).context(OpenFileSnafu)?;
    let raw = unsafe { memmap2::Mmap::map(&file).context(MmapFileSnafu)? };
    vita_pkg::Pkg::new(raw).context(ParsePkgSnafu)
}
