use super::ReadAt;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;

/// Local file reader with random access support.
///
/// The file handle lives exactly as long as the reader; dropping it closes
/// the file.
pub struct LocalFileReader {
    file: std::fs::File,
    size: u64,
}

impl LocalFileReader {
    pub fn new(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let size = file.metadata()?.len();
        Ok(Self { file, size })
    }
}

#[async_trait]
impl ReadAt for LocalFileReader {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileExt;
            Ok(self.file.read_at(buf, offset)?)
        }

        #[cfg(windows)]
        {
            // seek_read moves the cursor, but every read here is positioned
            use std::os::windows::fs::FileExt;
            Ok(self.file.seek_read(buf, offset)?)
        }

        #[cfg(not(any(unix, windows)))]
        {
            use std::io::{Read, Seek, SeekFrom};
            let mut file = &self.file;
            file.seek(SeekFrom::Start(offset))?;
            Ok(file.read(buf)?)
        }
    }

    fn size(&self) -> u64 {
        self.size
    }
}
