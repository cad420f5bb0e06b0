use flate2::read::DeflateDecoder;
use std::io::Read;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::io::ReadAt;
use anyhow::{Context, Result, bail};

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipFileEntry};

/// ZIP file extractor
pub struct ZipExtractor<R: ReadAt> {
    parser: ZipParser<R>,
}

impl<R: ReadAt> ZipExtractor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            parser: ZipParser::new(reader),
        }
    }

    /// List all files in the archive
    pub async fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        self.parser.list_files().await
    }

    /// Extract file data to memory, checking its CRC-32
    pub async fn extract_to_memory(&self, entry: &ZipFileEntry) -> Result<Vec<u8>> {
        if entry.is_encrypted() {
            bail!("{}: encrypted entries are not supported", entry.file_name);
        }

        let data_offset = self.parser.get_data_offset(entry).await?;
        let available = self.parser.reader().size().saturating_sub(data_offset);
        if entry.compressed_size > available {
            bail!(
                "{}: compressed size {} exceeds the {} bytes left in the archive",
                entry.file_name,
                entry.compressed_size,
                available
            );
        }
        let mut raw = vec![0u8; entry.compressed_size as usize];
        self.parser
            .reader()
            .read_exact_at(data_offset, &mut raw)
            .await?;

        let data = match entry.compression_method {
            CompressionMethod::Stored => raw,
            CompressionMethod::Deflate => {
                // Sizes come from the archive; never trust them for allocation
                let hint = entry.uncompressed_size.min(raw.len() as u64 * 4);
                let mut data = Vec::with_capacity(hint as usize);
                DeflateDecoder::new(raw.as_slice())
                    .take(entry.uncompressed_size.saturating_add(1))
                    .read_to_end(&mut data)
                    .with_context(|| format!("{}: corrupt deflate stream", entry.file_name))?;
                data
            }
            method @ CompressionMethod::Unknown(_) => {
                bail!(
                    "{}: unsupported compression method {} (only STORED and DEFLATE are supported)",
                    entry.file_name,
                    method.as_u16()
                );
            }
        };

        if data.len() as u64 != entry.uncompressed_size {
            bail!(
                "{}: expected {} bytes, got {}",
                entry.file_name,
                entry.uncompressed_size,
                data.len()
            );
        }
        let crc = crc32fast::hash(&data);
        if crc != entry.crc32 {
            bail!(
                "{}: CRC mismatch (expected {:08x}, got {:08x})",
                entry.file_name,
                entry.crc32,
                crc
            );
        }

        Ok(data)
    }

    /// Extract file to disk, creating parent directories as needed
    pub async fn extract_to_file(&self, entry: &ZipFileEntry, output_path: &Path) -> Result<()> {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        let data = self.extract_to_memory(entry).await?;

        let mut file = fs::File::create(output_path)
            .await
            .with_context(|| format!("Failed to create {}", output_path.display()))?;
        file.write_all(&data).await?;
        file.flush().await?;

        Ok(())
    }
}
