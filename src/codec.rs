//! codec: fixed-size record encoding.
//!
//! Every record type stored in a `RecordStore` implements `FixedRecord`: a
//! constant payload size, a 4-byte tag written into the store header, a numeric
//! key, and LE encode/decode over exactly `SIZE` bytes.
//!
//! On disk a record occupies one slot: `[payload SIZE][crc32 u32]`.
//! Text fields are fixed width, UTF-8, zero padded.

use anyhow::{anyhow, Result};
use byteorder::{ByteOrder, LittleEndian};
use std::io::{Read, Write};

use crate::consts::SLOT_TRAILER_LEN;

pub trait FixedRecord: Sized {
    /// Type tag stored in the file header.
    const TAG: &'static [u8; 4];
    /// Encoded payload size in bytes (without the CRC trailer).
    const SIZE: usize;

    /// Lookup key (account number, item id, order id).
    fn key(&self) -> u64;

    /// Encode into `out`, which is exactly `SIZE` bytes long and zero-filled.
    fn encode(&self, out: &mut [u8]) -> Result<()>;

    /// Decode from exactly `SIZE` bytes.
    fn decode(buf: &[u8]) -> Result<Self>;
}

/// On-disk slot size for T (payload + CRC trailer).
#[inline]
pub fn slot_size<T: FixedRecord>() -> usize {
    T::SIZE + SLOT_TRAILER_LEN
}

/// Encode a record into a fresh slot buffer with its CRC trailer.
pub fn encode_slot<T: FixedRecord>(rec: &T) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; slot_size::<T>()];
    rec.encode(&mut buf[..T::SIZE])?;
    let crc = crc32fast::hash(&buf[..T::SIZE]);
    LittleEndian::write_u32(&mut buf[T::SIZE..], crc);
    Ok(buf)
}

/// True if the CRC trailer of a slot matches its payload.
#[inline]
pub fn slot_crc_ok(slot: &[u8]) -> bool {
    if slot.len() < SLOT_TRAILER_LEN {
        return false;
    }
    let payload_len = slot.len() - SLOT_TRAILER_LEN;
    let stored = LittleEndian::read_u32(&slot[payload_len..]);
    crc32fast::hash(&slot[..payload_len]) == stored
}

/// Verify the CRC trailer and decode the payload.
pub fn decode_slot<T: FixedRecord>(slot: &[u8]) -> Result<T> {
    if slot.len() != slot_size::<T>() {
        return Err(anyhow!(
            "slot length {} does not match expected {}",
            slot.len(),
            slot_size::<T>()
        ));
    }
    if !slot_crc_ok(slot) {
        return Err(anyhow!("slot checksum mismatch"));
    }
    T::decode(&slot[..T::SIZE])
}

/// Longest prefix of `s` that fits into `width` bytes without splitting a char.
pub fn truncate_utf8(s: &str, width: usize) -> &str {
    if s.len() <= width {
        return s;
    }
    let mut end = width;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Validate a text field before it reaches the codec.
pub fn check_text(field: &str, s: &str, width: usize) -> Result<()> {
    if s.contains('\0') {
        return Err(anyhow!("{} must not contain NUL bytes", field));
    }
    if s.len() > width {
        return Err(anyhow!(
            "{} is too long: {} bytes, at most {} allowed",
            field,
            s.len(),
            width
        ));
    }
    Ok(())
}

/// Write `s` as a zero-padded field of exactly `width` bytes.
pub fn write_fixed_str<W: Write>(w: &mut W, s: &str, width: usize) -> Result<()> {
    let bytes = truncate_utf8(s, width).as_bytes();
    w.write_all(bytes)?;
    const ZEROS: [u8; 64] = [0u8; 64];
    let mut pad = width - bytes.len();
    while pad > 0 {
        let n = pad.min(ZEROS.len());
        w.write_all(&ZEROS[..n])?;
        pad -= n;
    }
    Ok(())
}

/// Read a zero-padded field of `width` bytes. Text ends at the first NUL.
pub fn read_fixed_str<R: Read>(r: &mut R, width: usize) -> Result<String> {
    let mut buf = vec![0u8; width];
    r.read_exact(&mut buf)?;
    let end = buf.iter().position(|&b| b == 0).unwrap_or(width);
    buf.truncate(end);
    String::from_utf8(buf).map_err(|e| anyhow!("text field is not valid UTF-8: {}", e))
}
