use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

use anyhow::{Result, bail};

/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Unknown(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Unknown(v) => *v,
        }
    }
}

/// General purpose flag: entry is encrypted
pub const FLAG_ENCRYPTED: u16 = 1 << 0;
/// General purpose flag: name and comment are UTF-8 (EFS)
pub const FLAG_UTF8: u16 = 1 << 11;

/// End of Central Directory (EOCD) - 22 bytes minimum
pub struct EndOfCentralDirectory {
    pub disk_entries: u16,
    pub total_entries: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
    pub comment_len: u16,
}

impl EndOfCentralDirectory {
    pub const SIGNATURE: &'static [u8] = b"PK\x05\x06";
    pub const SIZE: usize = 22;

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE || &data[0..4] != Self::SIGNATURE {
            bail!("Invalid End of Central Directory");
        }

        // Skip disk number and disk holding the central directory
        let mut cursor = Cursor::new(&data[8..]);

        Ok(Self {
            disk_entries: cursor.read_u16::<LittleEndian>()?,
            total_entries: cursor.read_u16::<LittleEndian>()?,
            cd_size: cursor.read_u32::<LittleEndian>()?,
            cd_offset: cursor.read_u32::<LittleEndian>()?,
            comment_len: cursor.read_u16::<LittleEndian>()?,
        })
    }

    pub fn is_zip64(&self) -> bool {
        self.disk_entries == 0xFFFF
            || self.total_entries == 0xFFFF
            || self.cd_size == 0xFFFFFFFF
            || self.cd_offset == 0xFFFFFFFF
    }
}

/// ZIP64 End of Central Directory Locator - 20 bytes
pub struct Zip64EOCDLocator {
    pub eocd64_offset: u64,
}

impl Zip64EOCDLocator {
    pub const SIGNATURE: &'static [u8] = b"PK\x06\x07";
    pub const SIZE: usize = 20;

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE || &data[0..4] != Self::SIGNATURE {
            bail!("Invalid ZIP64 End of Central Directory Locator");
        }

        let mut cursor = Cursor::new(&data[8..]);
        Ok(Self {
            eocd64_offset: cursor.read_u64::<LittleEndian>()?,
        })
    }
}

/// ZIP64 End of Central Directory - 56 bytes minimum
pub struct Zip64EOCD {
    pub total_entries: u64,
    pub cd_size: u64,
    pub cd_offset: u64,
}

impl Zip64EOCD {
    pub const SIGNATURE: &'static [u8] = b"PK\x06\x06";
    pub const MIN_SIZE: usize = 56;

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::MIN_SIZE || &data[0..4] != Self::SIGNATURE {
            bail!("Invalid ZIP64 End of Central Directory");
        }

        // Record size, versions and disk numbers precede the counts
        let mut cursor = Cursor::new(&data[32..]);
        Ok(Self {
            total_entries: cursor.read_u64::<LittleEndian>()?,
            cd_size: cursor.read_u64::<LittleEndian>()?,
            cd_offset: cursor.read_u64::<LittleEndian>()?,
        })
    }
}

/// Central Directory File Header (CDFH) - 46 bytes minimum
pub const CDFH_SIGNATURE: &[u8] = b"PK\x01\x02";
pub const CDFH_MIN_SIZE: usize = 46;

/// Local File Header (LFH) - 30 bytes
pub const LFH_SIGNATURE: &[u8] = b"PK\x03\x04";
pub const LFH_SIZE: usize = 30;

/// Modification timestamp of an entry, decoded from MS-DOS date and time.
///
/// DOS time has two-second resolution; fields are reported as stored, so a
/// zeroed timestamp has the date `1980-00-00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl ModTime {
    pub fn from_dos(date: u16, time: u16) -> Self {
        Self {
            year: ((date >> 9) & 0x7F) + 1980,
            month: ((date >> 5) & 0x0F) as u8,
            day: (date & 0x1F) as u8,
            hour: ((time >> 11) & 0x1F) as u8,
            minute: ((time >> 5) & 0x3F) as u8,
            second: ((time & 0x1F) * 2) as u8,
        }
    }

    /// `YYYY-MM-DD`
    pub fn date(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    /// `HH:MM`
    pub fn hour_minute(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

/// One record of the central directory.
///
/// `file_name` is the only field that changes after the archive is opened:
/// it starts as the name decoded under CP437 (or UTF-8 when flagged) and may
/// be replaced when a better encoding is found.
#[derive(Debug, Clone)]
pub struct ZipFileEntry {
    pub file_name: String,
    pub flags: u16,
    pub compression_method: CompressionMethod,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
    pub crc32: u32,
    pub lfh_offset: u64,
    pub mod_time: ModTime,
    pub is_directory: bool,
}

impl ZipFileEntry {
    pub fn is_utf8(&self) -> bool {
        self.flags & FLAG_UTF8 != 0
    }

    pub fn is_encrypted(&self) -> bool {
        self.flags & FLAG_ENCRYPTED != 0
    }

    /// Uncompressed size, as shown in listings
    pub fn file_size(&self) -> u64 {
        self.uncompressed_size
    }
}
