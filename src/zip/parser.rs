//! Low-level ZIP archive parser.
//!
//! ZIP files are read from the end: the End of Central Directory record
//! points at the Central Directory, which holds the metadata for every
//! entry. Entry data is only touched on extraction, through each entry's
//! Local File Header.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

use crate::charset::decode_cp437;
use crate::io::ReadAt;
use anyhow::{Result, bail};

use super::structures::*;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
const MAX_COMMENT_SIZE: u64 = 65535;

/// ZIP64 extended information extra field
const ZIP64_EXTRA_ID: u16 = 0x0001;

/// Low-level ZIP file parser.
///
/// Owns the data source; dropping the parser releases it.
pub struct ZipParser<R: ReadAt> {
    reader: R,
    size: u64,
}

impl<R: ReadAt> ZipParser<R> {
    pub fn new(reader: R) -> Self {
        let size = reader.size();
        Self { reader, size }
    }

    /// Find and parse the End of Central Directory record.
    ///
    /// Returns the record and its offset in the file.
    pub async fn find_eocd(&self) -> Result<(EndOfCentralDirectory, u64)> {
        let eocd_size = EndOfCentralDirectory::SIZE as u64;
        if self.size < eocd_size {
            bail!("Not a valid ZIP file: too short ({} bytes)", self.size);
        }

        // Common case: no archive comment
        let offset = self.size - eocd_size;
        let mut buf = vec![0u8; EndOfCentralDirectory::SIZE];
        self.reader.read_exact_at(offset, &mut buf).await?;
        if &buf[0..4] == EndOfCentralDirectory::SIGNATURE && buf[20..22] == [0, 0] {
            return Ok((EndOfCentralDirectory::from_bytes(&buf)?, offset));
        }

        // Otherwise the record sits before a comment of up to 64 KiB
        let search_size = (MAX_COMMENT_SIZE + eocd_size).min(self.size);
        let search_start = self.size - search_size;
        let mut buf = vec![0u8; search_size as usize];
        self.reader.read_exact_at(search_start, &mut buf).await?;

        for i in (0..=buf.len() - EndOfCentralDirectory::SIZE).rev() {
            if &buf[i..i + 4] != EndOfCentralDirectory::SIGNATURE {
                continue;
            }
            let comment_len = u16::from_le_bytes([buf[i + 20], buf[i + 21]]) as usize;
            if comment_len == buf.len() - i - EndOfCentralDirectory::SIZE {
                let eocd =
                    EndOfCentralDirectory::from_bytes(&buf[i..i + EndOfCentralDirectory::SIZE])?;
                return Ok((eocd, search_start + i as u64));
            }
        }

        bail!("Not a valid ZIP file: End of Central Directory not found")
    }

    /// Read the ZIP64 End of Central Directory via its locator, which sits
    /// immediately before the regular EOCD.
    pub async fn read_zip64_eocd(&self, eocd_offset: u64) -> Result<Zip64EOCD> {
        let Some(locator_offset) = eocd_offset.checked_sub(Zip64EOCDLocator::SIZE as u64) else {
            bail!("Missing ZIP64 End of Central Directory Locator");
        };
        let mut locator_buf = vec![0u8; Zip64EOCDLocator::SIZE];
        self.reader
            .read_exact_at(locator_offset, &mut locator_buf)
            .await?;
        let locator = Zip64EOCDLocator::from_bytes(&locator_buf)?;

        let mut eocd64_buf = vec![0u8; Zip64EOCD::MIN_SIZE];
        self.reader
            .read_exact_at(locator.eocd64_offset, &mut eocd64_buf)
            .await?;
        Zip64EOCD::from_bytes(&eocd64_buf)
    }

    /// Read every Central Directory entry, in directory order.
    pub async fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        let (eocd, eocd_offset) = self.find_eocd().await?;

        let (cd_offset, cd_size, total_entries) = if eocd.is_zip64() {
            let eocd64 = self.read_zip64_eocd(eocd_offset).await?;
            (eocd64.cd_offset, eocd64.cd_size, eocd64.total_entries)
        } else {
            (
                eocd.cd_offset as u64,
                eocd.cd_size as u64,
                eocd.total_entries as u64,
            )
        };

        if cd_offset.saturating_add(cd_size) > self.size {
            bail!(
                "Central Directory ({} bytes at offset {}) extends past end of file",
                cd_size,
                cd_offset
            );
        }

        let mut cd_data = vec![0u8; cd_size as usize];
        self.reader.read_exact_at(cd_offset, &mut cd_data).await?;

        // Each header is at least 46 bytes, so this bounds the allocation
        let capacity = total_entries.min(cd_size / CDFH_MIN_SIZE as u64) as usize;
        let mut entries = Vec::with_capacity(capacity);
        let mut cursor = Cursor::new(cd_data.as_slice());
        for _ in 0..total_entries {
            entries.push(parse_cdfh(&mut cursor)?);
        }

        Ok(entries)
    }

    /// Offset of an entry's data, past its Local File Header.
    ///
    /// The local header's name and extra field lengths may differ from the
    /// Central Directory copy, so they are read again here.
    pub async fn get_data_offset(&self, entry: &ZipFileEntry) -> Result<u64> {
        let mut lfh_buf = vec![0u8; LFH_SIZE];
        self.reader
            .read_exact_at(entry.lfh_offset, &mut lfh_buf)
            .await?;

        if &lfh_buf[0..4] != LFH_SIGNATURE {
            bail!("Invalid Local File Header for {}", entry.file_name);
        }

        let mut cursor = Cursor::new(&lfh_buf[26..]);
        let file_name_length = cursor.read_u16::<LittleEndian>()? as u64;
        let extra_field_length = cursor.read_u16::<LittleEndian>()? as u64;

        Ok(entry.lfh_offset + LFH_SIZE as u64 + file_name_length + extra_field_length)
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }
}

/// Parse one Central Directory File Header.
///
/// Names flagged as UTF-8 are decoded as such; all others go through CP437,
/// the format's historical default, which maps every byte and therefore
/// keeps the raw bytes recoverable.
fn parse_cdfh(cursor: &mut Cursor<&[u8]>) -> Result<ZipFileEntry> {
    let mut sig = [0u8; 4];
    cursor.read_exact(&mut sig)?;
    if sig != CDFH_SIGNATURE {
        bail!("Invalid Central Directory File Header");
    }

    let _version_made_by = cursor.read_u16::<LittleEndian>()?;
    let _version_needed = cursor.read_u16::<LittleEndian>()?;
    let flags = cursor.read_u16::<LittleEndian>()?;
    let compression_method = cursor.read_u16::<LittleEndian>()?;
    let last_mod_time = cursor.read_u16::<LittleEndian>()?;
    let last_mod_date = cursor.read_u16::<LittleEndian>()?;
    let crc32 = cursor.read_u32::<LittleEndian>()?;
    let mut compressed_size = cursor.read_u32::<LittleEndian>()? as u64;
    let mut uncompressed_size = cursor.read_u32::<LittleEndian>()? as u64;
    let file_name_length = cursor.read_u16::<LittleEndian>()?;
    let extra_field_length = cursor.read_u16::<LittleEndian>()?;
    let file_comment_length = cursor.read_u16::<LittleEndian>()?;
    let _disk_number_start = cursor.read_u16::<LittleEndian>()?;
    let _internal_attrs = cursor.read_u16::<LittleEndian>()?;
    let _external_attrs = cursor.read_u32::<LittleEndian>()?;
    let mut lfh_offset = cursor.read_u32::<LittleEndian>()? as u64;

    let mut name_bytes = vec![0u8; file_name_length as usize];
    cursor.read_exact(&mut name_bytes)?;
    // A bogus UTF-8 flag falls back to CP437 so the raw bytes stay recoverable
    let file_name = if flags & FLAG_UTF8 != 0 {
        String::from_utf8(name_bytes).unwrap_or_else(|e| decode_cp437(e.as_bytes()))
    } else {
        decode_cp437(&name_bytes)
    };
    let is_directory = file_name.ends_with('/');

    let extra_field_end = cursor.position() + extra_field_length as u64;
    while cursor.position() + 4 <= extra_field_end {
        let header_id = cursor.read_u16::<LittleEndian>()?;
        let field_size = cursor.read_u16::<LittleEndian>()? as u64;
        let field_end = cursor.position() + field_size;

        if header_id == ZIP64_EXTRA_ID {
            // Only the header fields saturated at 0xFFFFFFFF are present, in order
            if uncompressed_size == 0xFFFFFFFF && cursor.position() + 8 <= field_end {
                uncompressed_size = cursor.read_u64::<LittleEndian>()?;
            }
            if compressed_size == 0xFFFFFFFF && cursor.position() + 8 <= field_end {
                compressed_size = cursor.read_u64::<LittleEndian>()?;
            }
            if lfh_offset == 0xFFFFFFFF && cursor.position() + 8 <= field_end {
                lfh_offset = cursor.read_u64::<LittleEndian>()?;
            }
        }
        cursor.set_position(field_end);
    }
    cursor.set_position(extra_field_end + file_comment_length as u64);

    Ok(ZipFileEntry {
        file_name,
        flags,
        compression_method: CompressionMethod::from_u16(compression_method),
        compressed_size,
        uncompressed_size,
        crc32,
        lfh_offset,
        mod_time: ModTime::from_dos(last_mod_date, last_mod_time),
        is_directory,
    })
}
