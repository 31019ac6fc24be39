use snafu::Snafu;
use zerocopy::byteorder::big_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::reader::be32;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum MetaError {
    #[snafu(display("source buffer is too short"))]
    SourceTooShort,
}

type Result<T, E = MetaError> = std::result::Result<T, E>;

/// Content type of additional content (DLC).
pub const CONTENT_TYPE_DLC: u32 = 0x16;

/// Content type of a regular application.
pub const CONTENT_TYPE_APP: u32 = 0x15;

#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub(crate) struct MetaEntryRaw {
    entry_type: U32,
    size: U32,
    head: [u8; 8],
}

/// A metadata record.
///
/// Only the fixed 16-byte prefix is kept. The `size` field counts every byte
/// after the type/size pair, so the next record starts `8 + size` bytes
/// after this one.
#[derive(Debug, Clone, Copy)]
#[must_use]
pub struct MetaEntry {
    raw_entry: MetaEntryRaw,
}

impl MetaEntry {
    pub const RAW_SIZE: usize = size_of::<MetaEntryRaw>();

    /// Bytes taken by the type and size fields.
    pub const PREFIX_SIZE: u64 = 8;

    /// Reads a record prefix from raw bytes.
    pub fn read(raw: &[u8]) -> Result<Self> {
        let (raw_entry, _) =
            MetaEntryRaw::read_from_prefix(raw).map_err(|_| SourceTooShortSnafu.build())?;

        Ok(Self { raw_entry })
    }

    /// Returns the raw record type.
    #[must_use]
    pub const fn entry_type(&self) -> u32 {
        self.raw_entry.entry_type.get()
    }

    /// Returns the parsed record type.
    #[must_use]
    pub const fn kind(&self) -> MetaKind {
        MetaKind::from_u32(self.entry_type())
    }

    /// Returns the record size, excluding the type and size fields.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.raw_entry.size.get()
    }

    /// Returns the distance from the start of this record to the next one.
    #[must_use]
    pub const fn stride(&self) -> u64 {
        Self::PREFIX_SIZE + self.size() as u64
    }

    /// Returns the first 8 payload bytes.
    #[must_use]
    pub const fn head(&self) -> &[u8; 8] {
        &self.raw_entry.head
    }

    /// Returns the content type if this is a content type record.
    #[must_use]
    pub fn content_type(&self) -> Option<u32> {
        match self.kind() {
            MetaKind::ContentType => Some(be32(self.head(), 0)),
            _ => None,
        }
    }

    /// Returns the `(offset, size)` of `param.sfo` if this is a param.sfo
    /// record.
    #[must_use]
    pub fn sfo_location(&self) -> Option<(u32, u32)> {
        match self.kind() {
            MetaKind::ParamSfo => Some((be32(self.head(), 0), be32(self.head(), 4))),
            _ => None,
        }
    }

    /// Converts the record prefix to its raw byte representation.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.raw_entry.as_bytes()
    }
}

/// Known metadata record types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum MetaKind {
    DrmType,
    ContentType,
    PackageFlags,
    PackageSize,
    PackageVersion,
    Version,
    QaDigest,
    InstallDirectory,
    ParamSfo,

    /// Unrecognized record type.
    Unknown(u32),
}

impl MetaKind {
    /// Returns the raw numeric record type.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        match self {
            Self::DrmType => 1,
            Self::ContentType => 2,
            Self::PackageFlags => 3,
            Self::PackageSize => 4,
            Self::PackageVersion => 5,
            Self::Version => 6,
            Self::QaDigest => 7,
            Self::InstallDirectory => 10,
            Self::ParamSfo => 14,
            Self::Unknown(raw) => raw,
        }
    }

    /// Converts a raw numeric record type into a [`MetaKind`].
    #[must_use]
    pub const fn from_u32(raw: u32) -> Self {
        match raw {
            1 => Self::DrmType,
            2 => Self::ContentType,
            3 => Self::PackageFlags,
            4 => Self::PackageSize,
            5 => Self::PackageVersion,
            6 => Self::Version,
            7 => Self::QaDigest,
            10 => Self::InstallDirectory,
            14 => Self::ParamSfo,
            other => Self::Unknown(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(entry_type: u32, size: u32, head: [u8; 8]) -> Vec<u8> {
        let mut raw = Vec::new();
        raw.extend_from_slice(&entry_type.to_be_bytes());
        raw.extend_from_slice(&size.to_be_bytes());
        raw.extend_from_slice(&head);
        raw
    }

    #[test]
    fn content_type_record() {
        let entry = MetaEntry::read(&record(2, 4, [0, 0, 0, 0x16, 0, 0, 0, 0])).unwrap();

        assert_eq!(entry.kind(), MetaKind::ContentType);
        assert_eq!(entry.content_type(), Some(CONTENT_TYPE_DLC));
        assert_eq!(entry.sfo_location(), None);
        assert_eq!(entry.stride(), 12);
    }

    #[test]
    fn param_sfo_record() {
        let entry = MetaEntry::read(&record(14, 16, [0, 0, 0x10, 0, 0, 0, 0x02, 0x40])).unwrap();

        assert_eq!(entry.kind(), MetaKind::ParamSfo);
        assert_eq!(entry.sfo_location(), Some((0x1000, 0x240)));
        assert_eq!(entry.content_type(), None);
    }

    #[test]
    fn unknown_record_round_trips_type() {
        let entry = MetaEntry::read(&record(0x42, 0, [0; 8])).unwrap();

        assert_eq!(entry.kind(), MetaKind::Unknown(0x42));
        assert_eq!(entry.kind().as_u32(), 0x42);
        assert_eq!(entry.as_bytes().len(), MetaEntry::RAW_SIZE);
    }

    #[test]
    fn short_source_is_rejected() {
        assert!(matches!(
            MetaEntry::read(&[0u8; 15]),
            Err(MetaError::SourceTooShort)
        ));
    }
}
