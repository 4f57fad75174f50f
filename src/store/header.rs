//! store/header: the 32-byte header at the start of every store file.
//!
//! Layout (LE):
//!   [magic8="FLATREC1"][version u32=1][tag 4][slot_size u32][header_crc u32][last_id u64]
//!
//! - `tag` and `slot_size` bind the file to one record type; opening it as
//!   another type is an error.
//! - `last_id` is the high-water mark of keys ever appended. It never goes
//!   down, so ids freed by a delete are not handed out again.
//! - `header_crc` covers [version][tag][slot_size][last_id] (magic and the crc
//!   field itself are excluded).

use anyhow::{anyhow, Context, Result};
use byteorder::{ByteOrder, LittleEndian};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::codec::{slot_size, FixedRecord};
use crate::consts::{
    HDR_OFF_CRC, HDR_OFF_LAST_ID, HDR_OFF_SLOT_SIZE, HDR_OFF_TAG, HDR_OFF_VERSION, STORE_HDR_SIZE,
    STORE_MAGIC, STORE_VERSION,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreHeader {
    pub version: u32,
    pub tag: [u8; 4],
    pub slot_size: u32,
    pub last_id: u64,
}

impl StoreHeader {
    /// Fresh header for record type T.
    pub fn for_record<T: FixedRecord>() -> Self {
        Self {
            version: STORE_VERSION,
            tag: *T::TAG,
            slot_size: slot_size::<T>() as u32,
            last_id: 0,
        }
    }

    pub fn tag_str(&self) -> String {
        String::from_utf8_lossy(&self.tag).into_owned()
    }

    pub fn encode(&self) -> [u8; STORE_HDR_SIZE] {
        let mut buf = [0u8; STORE_HDR_SIZE];
        buf[..8].copy_from_slice(STORE_MAGIC);
        LittleEndian::write_u32(&mut buf[HDR_OFF_VERSION..HDR_OFF_VERSION + 4], self.version);
        buf[HDR_OFF_TAG..HDR_OFF_TAG + 4].copy_from_slice(&self.tag);
        LittleEndian::write_u32(&mut buf[HDR_OFF_SLOT_SIZE..HDR_OFF_SLOT_SIZE + 4], self.slot_size);
        LittleEndian::write_u64(&mut buf[HDR_OFF_LAST_ID..HDR_OFF_LAST_ID + 8], self.last_id);
        let crc = compute_header_crc(&buf);
        LittleEndian::write_u32(&mut buf[HDR_OFF_CRC..HDR_OFF_CRC + 4], crc);
        buf
    }

    /// Parse and validate magic, version and CRC. `path` is only used for messages.
    pub fn decode(buf: &[u8], path: &Path) -> Result<Self> {
        if buf.len() < STORE_HDR_SIZE {
            return Err(anyhow!(
                "store header too short in {} ({} < {} bytes)",
                path.display(),
                buf.len(),
                STORE_HDR_SIZE
            ));
        }
        if &buf[..8] != STORE_MAGIC {
            return Err(anyhow!("bad store magic in {}", path.display()));
        }
        let version = LittleEndian::read_u32(&buf[HDR_OFF_VERSION..HDR_OFF_VERSION + 4]);
        if version != STORE_VERSION {
            return Err(anyhow!(
                "unsupported store version {} in {} (expected {})",
                version,
                path.display(),
                STORE_VERSION
            ));
        }
        let stored_crc = LittleEndian::read_u32(&buf[HDR_OFF_CRC..HDR_OFF_CRC + 4]);
        let calc = compute_header_crc(&buf[..STORE_HDR_SIZE]);
        if stored_crc != calc {
            return Err(anyhow!(
                "store header CRC mismatch in {} (stored={}, calc={})",
                path.display(),
                stored_crc,
                calc
            ));
        }
        let mut tag = [0u8; 4];
        tag.copy_from_slice(&buf[HDR_OFF_TAG..HDR_OFF_TAG + 4]);
        let slot_size = LittleEndian::read_u32(&buf[HDR_OFF_SLOT_SIZE..HDR_OFF_SLOT_SIZE + 4]);
        if slot_size == 0 {
            return Err(anyhow!("store header has slot_size=0 in {}", path.display()));
        }
        let last_id = LittleEndian::read_u64(&buf[HDR_OFF_LAST_ID..HDR_OFF_LAST_ID + 8]);
        Ok(Self {
            version,
            tag,
            slot_size,
            last_id,
        })
    }

    /// Read the header from offset 0.
    pub fn read_from(f: &mut File, path: &Path) -> Result<Self> {
        f.seek(SeekFrom::Start(0))?;
        let mut buf = [0u8; STORE_HDR_SIZE];
        f.read_exact(&mut buf)
            .with_context(|| format!("read store header {}", path.display()))?;
        Self::decode(&buf, path)
    }

    /// Write the header at offset 0. Leaves the cursor right after it.
    pub fn write_to<W: Write + Seek>(&self, w: &mut W) -> Result<()> {
        w.seek(SeekFrom::Start(0))?;
        w.write_all(&self.encode())?;
        Ok(())
    }

    /// The file must hold records of type T.
    pub fn expect<T: FixedRecord>(&self, path: &Path) -> Result<()> {
        if &self.tag != T::TAG {
            return Err(anyhow!(
                "{} holds '{}' records, expected '{}'",
                path.display(),
                self.tag_str(),
                String::from_utf8_lossy(T::TAG)
            ));
        }
        if self.slot_size as usize != slot_size::<T>() {
            return Err(anyhow!(
                "{} has slot_size={}, expected {} for '{}'",
                path.display(),
                self.slot_size,
                slot_size::<T>(),
                self.tag_str()
            ));
        }
        Ok(())
    }
}

/// CRC over [version][tag][slot_size] and [last_id] of an encoded header.
fn compute_header_crc(buf: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&buf[HDR_OFF_VERSION..HDR_OFF_CRC]);
    hasher.update(&buf[HDR_OFF_LAST_ID..HDR_OFF_LAST_ID + 8]);
    hasher.finalize()
}

/// Number of whole slots after the header. A partial trailing slot is an error.
pub fn slot_count(file_len: u64, slot_size: u32, path: &Path) -> Result<u64> {
    let hdr = STORE_HDR_SIZE as u64;
    if file_len < hdr {
        return Err(anyhow!(
            "store file too small (< header): {} ({} bytes)",
            path.display(),
            file_len
        ));
    }
    let payload = file_len - hdr;
    let slot = u64::from(slot_size);
    let torn = payload % slot;
    if torn != 0 {
        return Err(anyhow!(
            "torn tail in {}: {} trailing byte(s) after {} whole record(s) at offset {}",
            path.display(),
            torn,
            payload / slot,
            hdr + (payload / slot) * slot
        ));
    }
    Ok(payload / slot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample() -> StoreHeader {
        StoreHeader {
            version: STORE_VERSION,
            tag: *b"TEST",
            slot_size: 24,
            last_id: 41,
        }
    }

    #[test]
    fn header_roundtrip_and_crc() {
        let p = PathBuf::from("t.dat");
        let h = sample();
        let mut buf = h.encode();
        assert_eq!(StoreHeader::decode(&buf, &p).unwrap(), h);

        // flipping last_id must break the CRC
        buf[HDR_OFF_LAST_ID] ^= 1;
        let err = StoreHeader::decode(&buf, &p).unwrap_err();
        assert!(err.to_string().contains("CRC mismatch"));
    }

    #[test]
    fn bad_magic_and_version() {
        let p = PathBuf::from("t.dat");
        let mut buf = sample().encode();
        buf[0] = b'X';
        assert!(StoreHeader::decode(&buf, &p)
            .unwrap_err()
            .to_string()
            .contains("magic"));

        let mut h = sample();
        h.version = 9;
        let buf = h.encode();
        assert!(StoreHeader::decode(&buf, &p)
            .unwrap_err()
            .to_string()
            .contains("version"));
    }

    #[test]
    fn slot_count_is_strict() {
        let p = PathBuf::from("t.dat");
        let hdr = STORE_HDR_SIZE as u64;
        assert_eq!(slot_count(hdr, 24, &p).unwrap(), 0);
        assert_eq!(slot_count(hdr + 48, 24, &p).unwrap(), 2);
        let err = slot_count(hdr + 50, 24, &p).unwrap_err();
        assert!(err.to_string().contains("torn tail"));
        assert!(slot_count(3, 24, &p).is_err());
    }
}
