use snafu::{ResultExt, Snafu, ensure};

use crate::header::content_type_name;
use crate::meta::CONTENT_TYPE_DLC;
use crate::region::Region;
use crate::sanitize::sanitize;
use crate::sfo::{self, Sfo};
use crate::{Pkg, ScanError};

/// Length of the `XXYYYY-` prefix in front of the title ID.
pub const CONTENT_ID_PREFIX_LEN: usize = 7;

/// Number of title ID bytes that go into a file name.
pub const TITLE_ID_LEN: usize = 9;

/// Errors when collecting [`PkgInfo`].
#[derive(Debug, Snafu)]
#[snafu(module)]
#[non_exhaustive]
pub enum InfoError {
    #[snafu(display("failed to scan PKG metadata"))]
    Scan { source: ScanError },

    #[snafu(display("invalid param.sfo"))]
    ReadSfo { source: sfo::ReadError },

    #[snafu(display("content id is too short ({len} bytes)"))]
    ContentIdTooShort { len: usize },

    #[snafu(display("title id {title_id:?} is not ASCII"))]
    NonAsciiTitleId { title_id: String },
}

/// Everything needed to name a package.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct PkgInfo {
    title: String,
    content_id: Vec<u8>,
    region: Region,
    content_type: u32,
}

impl PkgInfo {
    /// Scans `pkg`, decodes its `param.sfo` and derives the naming fields.
    pub fn read<R: AsRef<[u8]>>(pkg: &Pkg<R>) -> Result<Self, InfoError> {
        let scan = pkg.scan().context(info_error::ScanSnafu)?;
        let raw = pkg.sfo_bytes(&scan).context(info_error::ScanSnafu)?;
        let sfo = Sfo::parse(raw).context(info_error::ReadSfoSnafu)?;

        Self::from_sfo(&sfo, scan.content_type)
    }

    /// Derives the naming fields from an already decoded `param.sfo`.
    pub fn from_sfo(sfo: &Sfo<'_>, content_type: u32) -> Result<Self, InfoError> {
        let content_id = sfo.content_id();
        ensure!(
            content_id.len() >= CONTENT_ID_PREFIX_LEN,
            info_error::ContentIdTooShortSnafu {
                len: content_id.len()
            }
        );

        let title_id = &content_id[CONTENT_ID_PREFIX_LEN..];
        let title_id = &title_id[..title_id.len().min(TITLE_ID_LEN)];
        ensure!(
            title_id.is_ascii(),
            info_error::NonAsciiTitleIdSnafu {
                title_id: String::from_utf8_lossy(title_id)
            }
        );

        let info = Self {
            title: sanitize(sfo.title()),
            content_id: content_id.to_vec(),
            region: Region::classify(&content_id[CONTENT_ID_PREFIX_LEN..]),
            content_type,
        };

        log::debug!(
            "title {:?}, content id {:?}, region {}, content type 0x{:02X} ({})",
            info.title,
            String::from_utf8_lossy(&info.content_id),
            info.region,
            content_type,
            content_type_name(content_type)
        );

        Ok(info)
    }

    /// Returns the sanitized title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the full content ID (e.g. `UP0001-PCSE00001_00-...`).
    #[must_use]
    pub fn content_id(&self) -> &[u8] {
        &self.content_id
    }

    /// Returns the content ID with its `XXYYYY-` prefix removed.
    #[must_use]
    pub fn title_id(&self) -> &[u8] {
        &self.content_id[CONTENT_ID_PREFIX_LEN..]
    }

    /// Returns the region derived from the title ID.
    #[must_use]
    pub const fn region(&self) -> Region {
        self.region
    }

    /// Returns the raw content type.
    #[must_use]
    pub const fn content_type(&self) -> u32 {
        self.content_type
    }

    /// Returns `true` if this package is additional content.
    #[must_use]
    pub const fn is_dlc(&self) -> bool {
        self.content_type == CONTENT_TYPE_DLC
    }

    /// Computes the file name for this package.
    ///
    /// Format: `<title> [<title id>] [<region>]`, then ` [DLC]` for
    /// additional content, then `.pkg`. Only the first 9 bytes of the title
    /// ID are used, and those were checked to be ASCII on construction.
    #[must_use]
    pub fn file_name(&self) -> String {
        let id = self.title_id();
        let id = String::from_utf8_lossy(&id[..id.len().min(TITLE_ID_LEN)]);
        let dlc = if self.is_dlc() { " [DLC]" } else { "" };

        format!("{} [{}] [{}]{}.pkg", self.title, id, self.region, dlc)
    }
}
