//! A library for reading naming metadata from PlayStation Vita PKG files.
//!
//! This crate parses just enough of a PKG to name it: the container header,
//! the metadata record list and the embedded `param.sfo`. Payloads are never
//! decrypted.
//!
//! # Features
//!
//! - Parse and validate PKG headers (both magics, declared sizes)
//! - Iterate over metadata records
//! - Decode `TITLE`/`STITLE` and `CONTENT_ID` from `param.sfo`
//! - Compute a filesystem-safe name for the package
//!
//! # Example
//!
//! ```no_run
//! use vita_pkg::{Pkg, PkgInfo};
//!
//! let bytes = std::fs::read("game.pkg").unwrap();
//! let pkg = Pkg::new(bytes).unwrap();
//! let info = PkgInfo::read(&pkg).unwrap();
//!
//! println!("Title: {}", info.title());
//! println!("Region: {}", info.region());
//! println!("New name: {}", info.file_name());
//! ```
//!
//! # References
//!
//! - [PS3 Developer Wiki - PKG files](https://www.psdevwiki.com/ps3/PKG_files)
//! - [Vita Developer Wiki - SFO](http://vitadevwiki.com/vita/System_File_Object_(SFO)_(PSF))

use self::header::{ITEM_RECORD_SIZE, PkgHeader};
use self::meta::MetaEntry;
use snafu::{OptionExt, ResultExt, Snafu, ensure};

use open_error::*;
use scan_error::*;

pub mod header;
pub mod info;
pub mod meta;
pub mod reader;
pub mod region;
pub mod sanitize;
pub mod sfo;

pub use self::info::{InfoError, PkgInfo};
pub use self::region::Region;
pub use self::sfo::Sfo;

/// A PS Vita PKG file.
///
/// Holds the raw bytes and the validated header. Metadata is only walked on
/// [`Pkg::scan()`].
///
/// Reference: <https://www.psdevwiki.com/ps3/PKG_files>
#[must_use]
pub struct Pkg<R: AsRef<[u8]>> {
    raw: R,
    header: PkgHeader,
}

impl<R: AsRef<[u8]>> std::fmt::Debug for Pkg<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pkg")
            .field("header", &self.header)
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}

impl<R: AsRef<[u8]>> Pkg<R> {
    /// Creates a new [`Pkg`] from raw bytes.
    ///
    /// Checks both header magics and that the sizes declared by the header
    /// fit in `raw`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use vita_pkg::Pkg;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let bytes = std::fs::read("game.pkg")?;
    /// let pkg = Pkg::new(bytes)?;
    /// println!("Header content ID: {}", pkg.header().content_id());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(raw: R) -> Result<Self, OpenError> {
        let header = PkgHeader::read(raw.as_ref()).context(ReadHeaderFailedSnafu)?;
        let size = raw.as_ref().len() as u64;

        log::debug!(
            "PKG header: content id {}, {} metadata records at 0x{:X}, {} items at 0x{:X}, total size {}",
            header.content_id(),
            header.meta_count(),
            header.meta_offset(),
            header.item_count(),
            header.data_offset(),
            header.total_size()
        );

        ensure!(
            size >= header.total_size(),
            FileTooSmallSnafu {
                size,
                required: header.total_size()
            }
        );

        let items_end = u64::from(header.item_count())
            .checked_mul(ITEM_RECORD_SIZE)
            .and_then(|len| len.checked_add(header.data_offset()))
            .context(ItemTableOverflowSnafu)?;
        ensure!(
            size >= items_end,
            FileTooSmallSnafu {
                size,
                required: items_end
            }
        );

        Ok(Self { raw, header })
    }

    /// Returns a reference to the PKG header.
    pub fn header(&self) -> &PkgHeader {
        &self.header
    }

    /// Returns the size of the PKG in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.raw.as_ref().len() as u64
    }

    /// Returns `len` bytes at `offset`, failing rather than returning fewer.
    #[must_use]
    pub fn read_at(&self, offset: u64, len: usize) -> Option<&[u8]> {
        let start = usize::try_from(offset).ok()?;
        self.raw.as_ref().get(start..start.checked_add(len)?)
    }

    /// Returns an iterator over all metadata records.
    ///
    /// Each item contains the record index and the record prefix.
    pub fn meta_entries(&self) -> MetaEntries<'_, R> {
        MetaEntries {
            pkg: self,
            offset: Some(self.header.meta_offset()),
            current: 0,
            total: self.header.meta_count(),
        }
    }

    /// Walks the metadata records and collects the content type and the
    /// location of `param.sfo`.
    ///
    /// When a record type repeats, the last one wins. Missing records leave
    /// their fields at zero.
    pub fn scan(&self) -> Result<PkgScan, ScanError> {
        let mut scan = PkgScan::default();

        for result in self.meta_entries() {
            let (num, entry) = result.context(ReadMetaFailedSnafu)?;

            log::trace!(
                "metadata #{num}: type {:?}, size {}",
                entry.kind(),
                entry.size()
            );

            if let Some(content_type) = entry.content_type() {
                scan.content_type = content_type;
            } else if let Some((offset, size)) = entry.sfo_location() {
                scan.sfo_offset = offset;
                scan.sfo_size = size;
            }
        }

        log::debug!(
            "content type 0x{:02X}, param.sfo at 0x{:X} ({} bytes)",
            scan.content_type,
            scan.sfo_offset,
            scan.sfo_size
        );

        Ok(scan)
    }

    /// Returns the `param.sfo` bytes located by `scan`.
    ///
    /// The size is checked against [`sfo::MAX_SIZE`] before anything is
    /// read so a corrupt record never pulls in a huge range.
    pub fn sfo_bytes(&self, scan: &PkgScan) -> Result<&[u8], ScanError> {
        let size = scan.sfo_size as usize;
        ensure!(size >= sfo::MIN_SIZE, SfoTooSmallSnafu { size });
        ensure!(size <= sfo::MAX_SIZE, SfoTooBigSnafu { size });

        self.read_at(scan.sfo_offset.into(), size)
            .context(SfoOutOfBoundsSnafu {
                offset: scan.sfo_offset,
                size: scan.sfo_size,
            })
    }
}

/// Result of [`Pkg::scan()`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PkgScan {
    /// Offset of `param.sfo` from the start of the PKG.
    pub sfo_offset: u32,
    /// Size of `param.sfo` in bytes.
    pub sfo_size: u32,
    /// Raw content type (0x15 for applications, 0x16 for DLC).
    pub content_type: u32,
}

impl PkgScan {
    /// Returns `true` if the content type marks additional content.
    #[must_use]
    pub const fn is_dlc(&self) -> bool {
        self.content_type == meta::CONTENT_TYPE_DLC
    }
}

/// Iterator over PKG metadata records.
///
/// Records have a variable length so the iterator stops for good after the
/// first error.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct MetaEntries<'a, R: AsRef<[u8]>> {
    pkg: &'a Pkg<R>,
    offset: Option<u64>,
    current: usize,
    total: usize,
}

impl<R: AsRef<[u8]>> std::fmt::Debug for MetaEntries<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetaEntries")
            .field("offset", &self.offset)
            .field("current", &self.current)
            .field("total", &self.total)
            .finish_non_exhaustive()
    }
}

impl<R: AsRef<[u8]>> Iterator for MetaEntries<'_, R> {
    type Item = Result<(usize, MetaEntry), MetaReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.total {
            return None;
        }

        let num = self.current;
        self.current += 1;

        let Some(offset) = self.offset.take() else {
            self.current = self.total;
            return Some(Err(MetaReadError::OffsetOverflow { num }));
        };

        let entry = match self.pkg.read_at(offset, MetaEntry::RAW_SIZE) {
            Some(raw) => match MetaEntry::read(raw) {
                Ok(v) => v,
                Err(source) => {
                    self.current = self.total;
                    return Some(Err(MetaReadError::ReadFailed { num, source }));
                }
            },
            None => {
                self.current = self.total;
                return Some(Err(MetaReadError::InvalidOffset { num, offset }));
            }
        };

        self.offset = offset.checked_add(entry.stride());

        Some(Ok((num, entry)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.current;
        (remaining, Some(remaining))
    }
}

impl<R: AsRef<[u8]>> ExactSizeIterator for MetaEntries<'_, R> {}

#[derive(Debug, Snafu)]
#[snafu(module)]
#[non_exhaustive]
pub enum OpenError {
    #[snafu(display("invalid PKG header"))]
    ReadHeaderFailed { source: header::ReadError },

    #[snafu(display("pkg file is too small ({size} bytes, header requires {required})"))]
    FileTooSmall { size: u64, required: u64 },

    #[snafu(display("pkg item table size overflows"))]
    ItemTableOverflow,
}

#[derive(Debug, Snafu)]
#[snafu(module)]
#[non_exhaustive]
pub enum MetaReadError {
    #[snafu(display("metadata record #{num} at 0x{offset:X} is out of bounds"))]
    InvalidOffset { num: usize, offset: u64 },

    #[snafu(display("metadata record #{num} offset overflows"))]
    OffsetOverflow { num: usize },

    #[snafu(display("failed to read metadata record #{num}"))]
    ReadFailed {
        num: usize,
        source: meta::MetaError,
    },
}

#[derive(Debug, Snafu)]
#[snafu(module)]
#[non_exhaustive]
pub enum ScanError {
    #[snafu(display("failed to read metadata"))]
    ReadMetaFailed { source: MetaReadError },

    #[snafu(display("param.sfo at 0x{offset:X} ({size} bytes) is outside the PKG"))]
    SfoOutOfBounds { offset: u32, size: u32 },

    #[snafu(display("param.sfo is too small ({size} bytes)"))]
    SfoTooSmall { size: usize },

    #[snafu(display("param.sfo is too big ({size} bytes), file is corrupted"))]
    SfoTooBig { size: usize },
}

#[cfg(test)]
#[path = "tests/fixtures.rs"]
pub(crate) mod fixtures;

#[cfg(test)]
#[path = "tests/pkg_tests.rs"]
mod tests;
