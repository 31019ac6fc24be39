use std::fmt;

use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
    byteorder::big_endian::{U16, U32, U64},
};

/// Errors when reading a PKG header.
#[derive(Debug, snafu::Snafu)]
#[non_exhaustive]
pub enum ReadError {
    #[snafu(display("PKG file is too small to hold a header"))]
    TooSmall,

    #[snafu(display("not a PKG file (invalid magic)"))]
    InvalidMagic,

    #[snafu(display("not a PKG file (invalid extended header magic)"))]
    InvalidExtMagic,
}

type Result<T, E = ReadError> = std::result::Result<T, E>;

const PKG_MAGIC: u32 = 0x7F504B47;
const PKG_EXT_MAGIC: u32 = 0x7F657874;

/// Size of the main header.
pub const MAIN_HEADER_SIZE: usize = 192;

/// Size of the extended header that follows the main one.
pub const EXT_HEADER_SIZE: usize = 64;

/// Size of every item record in the encrypted item table.
pub const ITEM_RECORD_SIZE: u64 = 32;

#[derive(Debug, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct PkgHeaderRaw {
    pub pkg_magic: U32,             // 0x000 - 0x7F504B47
    pub pkg_revision: U16,          // 0x004
    pub pkg_type: U16,              // 0x006
    pub pkg_meta_offset: U32,       // 0x008 - metadata record list
    pub pkg_meta_count: U32,        // 0x00C
    pub pkg_meta_size: U32,         // 0x010
    pub pkg_item_count: U32,        // 0x014
    pub pkg_total_size: U64,        // 0x018
    pub pkg_data_offset: U64,       // 0x020 - start of encrypted data
    pub pkg_data_size: U64,         // 0x028
    pub pkg_content_id: [u8; 0x30], // 0x030 - NUL padded
    pub pkg_digest: [u8; 0x10],     // 0x060
    pub pkg_data_riv: [u8; 0x10],   // 0x070
    pub pkg_header_digest: [u8; 0x40], // 0x080
    // 0x0C0 - end of main header
    pub ext: PkgExtHeaderRaw,
}

#[derive(Debug, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct PkgExtHeaderRaw {
    pub ext_magic: U32,                   // 0x0C0 - 0x7F657874
    pub ext_unknown: U32,                 // 0x0C4
    pub ext_header_size: U32,             // 0x0C8
    pub ext_data_size: U32,               // 0x0CC
    pub main_and_ext_hmac_offset: U32,    // 0x0D0
    pub metadata_header_hmac_offset: U32, // 0x0D4
    pub tail_offset: U64,                 // 0x0D8
    pub padding1: U32,                    // 0x0E0
    pub pkg_key_id: U32,                  // 0x0E4
    pub full_header_hmac_offset: U32,     // 0x0E8
    pub padding2: [u8; 0x14],             // 0x0EC
    // 0x100 - end of extended header
}

const _: () = assert!(size_of::<PkgHeaderRaw>() == MAIN_HEADER_SIZE + EXT_HEADER_SIZE);

/// Returns a human-readable name for a content type value.
#[must_use]
pub const fn content_type_name(content_type: u32) -> &'static str {
    match content_type {
        0x15 => "Application",
        0x16 => "Additional Content (DLC)",
        0x17 => "LiveArea",
        0x1F => "Theme",
        _ => "Unknown",
    }
}

/// Parsed PKG header information.
#[derive(Debug)]
#[must_use]
pub struct PkgHeader {
    raw_header: PkgHeaderRaw,
}

impl PkgHeader {
    /// Size of both headers together.
    pub const RAW_SIZE: usize = size_of::<PkgHeaderRaw>();

    /// Parses a PKG header from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is too small or if either magic number
    /// does not match.
    pub fn read(pkg: &[u8]) -> Result<Self> {
        let (raw_header, _) =
            PkgHeaderRaw::read_from_prefix(pkg).map_err(|_| TooSmallSnafu.build())?;

        snafu::ensure!(raw_header.pkg_magic.get() == PKG_MAGIC, InvalidMagicSnafu);
        snafu::ensure!(
            raw_header.ext.ext_magic.get() == PKG_EXT_MAGIC,
            InvalidExtMagicSnafu
        );

        Ok(Self { raw_header })
    }

    /// Returns the offset of the first metadata record.
    #[must_use]
    pub const fn meta_offset(&self) -> u64 {
        self.raw_header.pkg_meta_offset.get() as _
    }

    /// Returns the number of metadata records.
    #[must_use]
    pub const fn meta_count(&self) -> usize {
        self.raw_header.pkg_meta_count.get() as _
    }

    /// Returns the number of items in the encrypted item table.
    #[must_use]
    pub const fn item_count(&self) -> u32 {
        self.raw_header.pkg_item_count.get()
    }

    /// Returns the total PKG size declared by the header.
    #[must_use]
    pub const fn total_size(&self) -> u64 {
        self.raw_header.pkg_total_size.get()
    }

    /// Returns the offset of the encrypted data area.
    #[must_use]
    pub const fn data_offset(&self) -> u64 {
        self.raw_header.pkg_data_offset.get()
    }

    /// Returns the size of the encrypted data area.
    #[must_use]
    pub const fn data_size(&self) -> u64 {
        self.raw_header.pkg_data_size.get()
    }

    /// Returns the PKG revision.
    #[must_use]
    pub const fn revision(&self) -> u16 {
        self.raw_header.pkg_revision.get()
    }

    /// Returns the PKG type.
    #[must_use]
    pub const fn pkg_type(&self) -> u16 {
        self.raw_header.pkg_type.get()
    }

    /// Returns the content ID stored in the header.
    ///
    /// This is informational only, names are always computed from the
    /// content ID inside `param.sfo`.
    #[must_use]
    pub fn content_id(&self) -> ContentIdDisplay<'_> {
        let bytes = &self.raw_header.pkg_content_id;
        let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        ContentIdDisplay(&bytes[..len])
    }

    /// Returns the raw header.
    #[must_use]
    pub const fn raw_header(&self) -> &PkgHeaderRaw {
        &self.raw_header
    }
}

/// Lossy display of a NUL-trimmed content ID.
#[derive(Clone, Copy)]
pub struct ContentIdDisplay<'a>(&'a [u8]);

impl ContentIdDisplay<'_> {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0
    }
}

impl fmt::Display for ContentIdDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.0))
    }
}

impl fmt::Debug for ContentIdDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(self.0))
    }
}
