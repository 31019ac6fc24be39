//! `param.sfo` (PSF) decoding.
//!
//! Only the string fields needed to name a package are recovered: the title
//! (`TITLE`, overridden by `STITLE`) and the content ID (`CONTENT_ID`).
//!
//! Layout, all integers little-endian:
//!
//! | Offset | Field                          |
//! |--------|--------------------------------|
//! | 0x00   | magic `0x46535000` (`\0PSF`)   |
//! | 0x04   | version                        |
//! | 0x08   | key table offset               |
//! | 0x0C   | value table offset             |
//! | 0x10   | entry count                    |
//! | 0x14   | index entries, 16 bytes each   |
//!
//! Reference: <https://www.psdevwiki.com/ps3/PARAM.SFO>

use snafu::{OptionExt, Snafu, ensure};

use crate::reader::{c_str, le16, le32};

/// Errors when decoding a `param.sfo` blob.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ReadError {
    #[snafu(display("sfo information is too small"))]
    TooSmall,

    #[snafu(display("sfo information is too big ({size} bytes), pkg file is probably corrupted"))]
    TooBig { size: usize },

    #[snafu(display("incorrect sfo signature"))]
    InvalidMagic,

    #[snafu(display("sfo index entry #{index} is out of bounds"))]
    IndexOutOfBounds { index: usize },

    #[snafu(display("sfo key of entry #{index} is out of bounds"))]
    KeyOutOfBounds { index: usize },

    #[snafu(display("sfo value of entry #{index} is out of bounds"))]
    ValueOutOfBounds { index: usize },

    #[snafu(display(
        "sfo information doesn't have game title or content id, pkg is probably corrupted"
    ))]
    MissingField,
}

type Result<T, E = ReadError> = std::result::Result<T, E>;

const SFO_MAGIC: u32 = 0x46535000;

/// Smallest blob accepted.
pub const MIN_SIZE: usize = 16;

/// Largest blob accepted.
pub const MAX_SIZE: usize = 16 * 1024;

const HEADER_SIZE: usize = 20;
const INDEX_ENTRY_SIZE: usize = 16;
const INDEX_KEY_OFFSET: usize = 0;
const INDEX_VALUE_OFFSET: usize = 12;

/// Keys the decoder looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SfoKey {
    Title,
    ShortTitle,
    ContentId,
}

impl SfoKey {
    /// Returns the key name as stored in the key table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "TITLE",
            Self::ShortTitle => "STITLE",
            Self::ContentId => "CONTENT_ID",
        }
    }

    /// Matches a raw key name against the known keys.
    #[must_use]
    pub fn from_bytes(name: &[u8]) -> Option<Self> {
        [Self::Title, Self::ShortTitle, Self::ContentId]
            .into_iter()
            .find(|key| key.as_str().as_bytes() == name)
    }
}

/// Fields decoded from a `param.sfo` blob.
///
/// Values are the raw bytes of each NUL-terminated string.
#[derive(Debug, Clone, Copy)]
#[must_use]
pub struct Sfo<'a> {
    title: &'a [u8],
    content_id: &'a [u8],
}

impl<'a> Sfo<'a> {
    /// Decodes the title and content ID from `sfo`.
    ///
    /// The whole of `sfo` is treated as the blob, so its length is the
    /// declared size.
    ///
    /// When both `TITLE` and `STITLE` are present `STITLE` wins, wherever it
    /// appears in the index. For `CONTENT_ID` the first occurrence wins.
    pub fn parse(sfo: &'a [u8]) -> Result<Self> {
        let size = sfo.len();

        ensure!(size >= MIN_SIZE, TooSmallSnafu);
        ensure!(size <= MAX_SIZE, TooBigSnafu { size });
        ensure!(le32(sfo, 0) == SFO_MAGIC, InvalidMagicSnafu);
        ensure!(size >= HEADER_SIZE, TooSmallSnafu);

        let keys = le32(sfo, 8) as usize;
        let values = le32(sfo, 12) as usize;
        let count = le32(sfo, 16) as usize;

        let mut title_index = None;
        let mut content_index = None;

        for index in 0..count {
            let base = index * INDEX_ENTRY_SIZE + HEADER_SIZE;
            ensure!(
                base + INDEX_KEY_OFFSET + 2 <= size,
                IndexOutOfBoundsSnafu { index }
            );

            let key_offset = le16(sfo, base + INDEX_KEY_OFFSET) as usize;
            let key = keys
                .checked_add(key_offset)
                .and_then(|offset| c_str(sfo, offset))
                .context(KeyOutOfBoundsSnafu { index })?;

            log::trace!("sfo entry #{index}: {}", String::from_utf8_lossy(key));

            match SfoKey::from_bytes(key) {
                Some(SfoKey::Title) => {
                    if title_index.is_none() {
                        title_index = Some(index);
                    }
                }
                Some(SfoKey::ShortTitle) => title_index = Some(index),
                Some(SfoKey::ContentId) => {
                    if content_index.is_none() {
                        content_index = Some(index);
                    }
                }
                None => {}
            }
        }

        let (Some(title_index), Some(content_index)) = (title_index, content_index) else {
            return MissingFieldSnafu.fail();
        };

        Ok(Self {
            title: Self::value(sfo, values, title_index)?,
            content_id: Self::value(sfo, values, content_index)?,
        })
    }

    fn value(sfo: &'a [u8], values: usize, index: usize) -> Result<&'a [u8]> {
        let field = index * INDEX_ENTRY_SIZE + HEADER_SIZE + INDEX_VALUE_OFFSET;
        ensure!(field + 4 <= sfo.len(), ValueOutOfBoundsSnafu { index });

        values
            .checked_add(le32(sfo, field) as usize)
            .and_then(|offset| c_str(sfo, offset))
            .context(ValueOutOfBoundsSnafu { index })
    }

    /// Returns the raw title (`STITLE` if present, `TITLE` otherwise).
    #[must_use]
    pub const fn title(&self) -> &'a [u8] {
        self.title
    }

    /// Returns the raw content ID.
    #[must_use]
    pub const fn content_id(&self) -> &'a [u8] {
        self.content_id
    }

    /// Returns the value recovered for `key`.
    ///
    /// `TITLE` and `STITLE` resolve to the same selected title.
    #[must_use]
    pub const fn get(&self, key: SfoKey) -> &'a [u8] {
        match key {
            SfoKey::Title | SfoKey::ShortTitle => self.title,
            SfoKey::ContentId => self.content_id,
        }
    }
}

#[cfg(test)]
#[path = "tests/sfo_tests.rs"]
mod tests;
