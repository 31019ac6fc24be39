//! Fixed-width integer reads at arbitrary byte offsets.
//!
//! None of these functions check bounds. Callers must make sure that
//! `offset + size_of::<T>()` lies within `buf` before calling them.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Reads a big-endian `u16` at `offset`.
///
/// # Panics
///
/// Panics if `buf` is shorter than `offset + 2`.
#[must_use]
pub fn be16(buf: &[u8], offset: usize) -> u16 {
    BigEndian::read_u16(&buf[offset..])
}

/// Reads a big-endian `u32` at `offset`.
///
/// # Panics
///
/// Panics if `buf` is shorter than `offset + 4`.
#[must_use]
pub fn be32(buf: &[u8], offset: usize) -> u32 {
    BigEndian::read_u32(&buf[offset..])
}

/// Reads a big-endian `u64` at `offset`.
///
/// # Panics
///
/// Panics if `buf` is shorter than `offset + 8`.
#[must_use]
pub fn be64(buf: &[u8], offset: usize) -> u64 {
    BigEndian::read_u64(&buf[offset..])
}

/// Reads a little-endian `u16` at `offset`.
///
/// # Panics
///
/// Panics if `buf` is shorter than `offset + 2`.
#[must_use]
pub fn le16(buf: &[u8], offset: usize) -> u16 {
    LittleEndian::read_u16(&buf[offset..])
}

/// Reads a little-endian `u32` at `offset`.
///
/// # Panics
///
/// Panics if `buf` is shorter than `offset + 4`.
#[must_use]
pub fn le32(buf: &[u8], offset: usize) -> u32 {
    LittleEndian::read_u32(&buf[offset..])
}

/// Returns the bytes at `offset` up to (not including) the first NUL.
///
/// A string without a terminator runs to the end of `buf`. Returns `None`
/// if `offset` is past the end of `buf`.
#[must_use]
pub fn c_str(buf: &[u8], offset: usize) -> Option<&[u8]> {
    let tail = buf.get(offset..)?;
    let len = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    Some(&tail[..len])
}
