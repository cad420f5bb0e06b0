//! `unzip -l` style directory listing.

use std::io::{self, Write};

use crate::archive::ZipArchive;
use crate::io::ReadAt;

/// Write the listing of `archive`, opened from `path`, to `out`.
///
/// ```text
/// Archive:  docs.zip
///   Length      Date    Time    Name
/// ---------  ---------- -----   ----
///        12 2024-03-15 10:30  报告.txt(gbk)
/// ---------                     -------
///        12                   1 files
/// ```
pub fn write_listing<W: Write, R: ReadAt>(
    out: &mut W,
    path: &str,
    archive: &ZipArchive<R>,
) -> io::Result<()> {
    let encoding = archive.active_encoding();

    writeln!(out, "Archive:  {}", path)?;
    writeln!(out, "  Length      Date    Time    Name")?;
    writeln!(out, "---------  ---------- -----   ----")?;

    let mut total_size = 0u64;
    let mut total_files = 0usize;
    for entry in archive.list_entries() {
        total_size = total_size.saturating_add(entry.file_size());
        total_files += 1;
        writeln!(
            out,
            "{:>9} {} {}  {}({})",
            entry.file_size(),
            entry.mod_time.date(),
            entry.mod_time.hour_minute(),
            entry.file_name,
            encoding
        )?;
    }

    writeln!(out, "---------                     -------")?;
    writeln!(out, "{:>9}{:19}{} files", total_size, "", total_files)?;
    Ok(())
}
