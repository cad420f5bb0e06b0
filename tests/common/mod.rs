//! Minimal ZIP writer for tests: exact raw name bytes, STORED or DEFLATE,
//! optionally with ZIP64 sizes in the central directory.

#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::Compression;
use flate2::write::DeflateEncoder;
use std::cell::RefCell;
use std::io::Write;

use unzip_enc::EncodingDetector;

/// 2024-03-15
pub const DOS_DATE: u16 = (44 << 9) | (3 << 5) | 15;
/// 10:30:20
pub const DOS_TIME: u16 = (10 << 11) | (30 << 5) | 10;

const FLAG_UTF8: u16 = 1 << 11;
const ZIP64_EXTRA_ID: u16 = 0x0001;
const SATURATED: u32 = 0xFFFFFFFF;

#[derive(Default)]
pub struct ZipBuilder {
    body: Vec<u8>,
    central: Vec<u8>,
    count: u16,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored(self, name: &[u8], data: &[u8]) -> Self {
        self.push(name, data, 0, 0)
    }

    pub fn deflated(self, name: &[u8], data: &[u8]) -> Self {
        self.push(name, data, 8, 0)
    }

    /// Entry with the UTF-8 flag set
    pub fn utf8(self, name: &str, data: &[u8]) -> Self {
        self.push(name.as_bytes(), data, 0, FLAG_UTF8)
    }

    /// Entry with the UTF-8 flag set over arbitrary name bytes
    pub fn utf8_raw(self, name: &[u8], data: &[u8]) -> Self {
        self.push(name, data, 0, FLAG_UTF8)
    }

    pub fn dir(self, name: &[u8]) -> Self {
        self.push(name, b"", 0, 0)
    }

    /// Entry stored as is but labelled with `method`
    pub fn with_method(self, name: &[u8], data: &[u8], method: u16) -> Self {
        self.push(name, data, method, 0)
    }

    /// DEFLATE entry whose central header defers its sizes to a ZIP64 extra
    /// field claiming `uncompressed` and, when given, `compressed` bytes.
    pub fn zip64_sizes(
        self,
        name: &[u8],
        data: &[u8],
        uncompressed: u64,
        compressed: Option<u64>,
    ) -> Self {
        self.push_entry(name, data, 8, 0, Some((uncompressed, compressed)))
    }

    fn push(self, name: &[u8], data: &[u8], method: u16, flags: u16) -> Self {
        self.push_entry(name, data, method, flags, None)
    }

    fn push_entry(
        mut self,
        name: &[u8],
        data: &[u8],
        method: u16,
        flags: u16,
        zip64: Option<(u64, Option<u64>)>,
    ) -> Self {
        let crc = crc32fast::hash(data);
        let payload = if method == 8 {
            let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        } else {
            data.to_vec()
        };
        let offset = self.body.len() as u32;

        let lfh = &mut self.body;
        lfh.extend_from_slice(b"PK\x03\x04");
        lfh.write_u16::<LittleEndian>(20).unwrap();
        lfh.write_u16::<LittleEndian>(flags).unwrap();
        lfh.write_u16::<LittleEndian>(method).unwrap();
        lfh.write_u16::<LittleEndian>(DOS_TIME).unwrap();
        lfh.write_u16::<LittleEndian>(DOS_DATE).unwrap();
        lfh.write_u32::<LittleEndian>(crc).unwrap();
        lfh.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
        lfh.write_u32::<LittleEndian>(data.len() as u32).unwrap();
        lfh.write_u16::<LittleEndian>(name.len() as u16).unwrap();
        lfh.write_u16::<LittleEndian>(0).unwrap();
        lfh.extend_from_slice(name);
        lfh.extend_from_slice(&payload);

        let mut cd_compressed = payload.len() as u32;
        let mut cd_uncompressed = data.len() as u32;
        let mut extra: Vec<u8> = Vec::new();
        if let Some((uncompressed, compressed)) = zip64 {
            cd_uncompressed = SATURATED;
            let mut values = vec![uncompressed];
            if let Some(compressed) = compressed {
                cd_compressed = SATURATED;
                values.push(compressed);
            }
            extra.write_u16::<LittleEndian>(ZIP64_EXTRA_ID).unwrap();
            extra.write_u16::<LittleEndian>(values.len() as u16 * 8).unwrap();
            for value in values {
                extra.write_u64::<LittleEndian>(value).unwrap();
            }
        }

        let cd = &mut self.central;
        cd.extend_from_slice(b"PK\x01\x02");
        cd.write_u16::<LittleEndian>(20).unwrap();
        cd.write_u16::<LittleEndian>(20).unwrap();
        cd.write_u16::<LittleEndian>(flags).unwrap();
        cd.write_u16::<LittleEndian>(method).unwrap();
        cd.write_u16::<LittleEndian>(DOS_TIME).unwrap();
        cd.write_u16::<LittleEndian>(DOS_DATE).unwrap();
        cd.write_u32::<LittleEndian>(crc).unwrap();
        cd.write_u32::<LittleEndian>(cd_compressed).unwrap();
        cd.write_u32::<LittleEndian>(cd_uncompressed).unwrap();
        cd.write_u16::<LittleEndian>(name.len() as u16).unwrap();
        cd.write_u16::<LittleEndian>(extra.len() as u16).unwrap();
        cd.write_u16::<LittleEndian>(0).unwrap(); // comment
        cd.write_u16::<LittleEndian>(0).unwrap(); // disk
        cd.write_u16::<LittleEndian>(0).unwrap(); // internal attrs
        cd.write_u32::<LittleEndian>(0).unwrap(); // external attrs
        cd.write_u32::<LittleEndian>(offset).unwrap();
        cd.extend_from_slice(name);
        cd.extend_from_slice(&extra);

        self.count += 1;
        self
    }

    pub fn finish(self) -> Vec<u8> {
        let mut out = self.body;
        let cd_offset = out.len() as u32;
        out.extend_from_slice(&self.central);

        out.extend_from_slice(b"PK\x05\x06");
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(self.count).unwrap();
        out.write_u16::<LittleEndian>(self.count).unwrap();
        out.write_u32::<LittleEndian>(self.central.len() as u32).unwrap();
        out.write_u32::<LittleEndian>(cd_offset).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out
    }
}

/// Detector returning a fixed answer and recording what it was asked.
pub struct FixedDetector {
    answer: Option<String>,
    pub seen: RefCell<Vec<Vec<u8>>>,
}

impl FixedDetector {
    pub fn new(answer: Option<&str>) -> Self {
        Self {
            answer: answer.map(str::to_string),
            seen: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.borrow().len()
    }
}

impl EncodingDetector for FixedDetector {
    fn detect(&self, bytes: &[u8]) -> Option<String> {
        self.seen.borrow_mut().push(bytes.to_vec());
        self.answer.clone()
    }
}
