//! ZIP archive with filename encoding repair.
//!
//! [`ZipArchive`] reads the Central Directory once, then immediately tries
//! to recover the encoding the filenames were really written in:
//!
//! 1. each candidate charset, in order; the first one that decodes every
//!    name wins,
//! 2. otherwise the detector's guess, if a detector is available and it
//!    guesses anything,
//! 3. otherwise names stay as decoded under CP437.
//!
//! An attempt is all or nothing: if one name fails, no name changes.

use std::collections::HashMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

use crate::charset::Charset;
use crate::charset::detect::EncodingDetector;
use crate::error::{Error, Result};
use crate::io::{LocalFileReader, ReadAt};
use crate::zip::{ZipExtractor, ZipFileEntry};

/// Why a charset could not be applied to every name. Never leaves this module.
#[derive(Debug)]
enum AttemptFailure {
    /// The name has characters outside the source code page, so its raw
    /// bytes cannot be recovered.
    Unencodable { index: usize, name: String },
    /// The raw bytes are not valid text in the candidate charset.
    Undecodable { index: usize, name: String },
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unencodable { index, name } => {
                write!(f, "entry {index} ({name:?}) has no raw bytes in the source code page")
            }
            Self::Undecodable { index, name } => {
                write!(f, "entry {index} ({name:?}) is not valid in this encoding")
            }
        }
    }
}

/// An opened ZIP archive whose filenames have been re-decoded.
///
/// The archive owns its reader; the underlying file is closed when the
/// archive is dropped.
pub struct ZipArchive<R: ReadAt> {
    extractor: ZipExtractor<R>,
    entries: Vec<ZipFileEntry>,
    name_index: HashMap<String, usize>,
    source: Charset,
    active: Charset,
}

impl ZipArchive<LocalFileReader> {
    /// Open an archive on disk. See [`ZipArchive::new`].
    pub async fn open(
        path: &Path,
        candidates: &[Charset],
        detector: Option<&dyn EncodingDetector>,
    ) -> Result<Self> {
        let reader = LocalFileReader::new(path).map_err(Error::ArchiveOpen)?;
        Self::new(reader, candidates, detector).await
    }
}

impl<R: ReadAt> ZipArchive<R> {
    /// Read the archive directory from `reader` and re-decode its filenames,
    /// trying `candidates` in order before falling back to `detector`.
    pub async fn new(
        reader: R,
        candidates: &[Charset],
        detector: Option<&dyn EncodingDetector>,
    ) -> Result<Self> {
        let extractor = ZipExtractor::new(reader);
        let entries = extractor.list_files().await.map_err(Error::ArchiveOpen)?;
        let source = Charset::cp437();

        let mut archive = Self {
            extractor,
            name_index: build_index(&entries),
            entries,
            active: source.clone(),
            source,
        };
        archive.refine_names(candidates, detector);
        Ok(archive)
    }

    /// Entries in Central Directory order.
    pub fn list_entries(&self) -> &[ZipFileEntry] {
        &self.entries
    }

    /// Look an entry up by its current name. When several entries share a
    /// name, the last one in directory order is returned.
    pub fn by_name(&self, name: &str) -> Option<&ZipFileEntry> {
        self.name_index.get(name).map(|&i| &self.entries[i])
    }

    /// The encoding the filenames are currently decoded with.
    pub fn active_encoding(&self) -> &Charset {
        &self.active
    }

    /// The legacy code page names were first decoded with.
    pub fn source_encoding(&self) -> &Charset {
        &self.source
    }

    fn refine_names(&mut self, candidates: &[Charset], detector: Option<&dyn EncodingDetector>) {
        for charset in candidates {
            if self.try_charset(charset) {
                return;
            }
        }

        let Some(detector) = detector else {
            debug!("no encoding detector available, keeping {}", self.active);
            return;
        };

        let raw: Option<Vec<u8>> = self
            .entries
            .iter()
            .map(|e| self.source.encode(&e.file_name))
            .collect::<Option<Vec<_>>>()
            .map(|names| names.concat());
        let Some(raw) = raw else {
            debug!("names not representable in {}, skipping detection", self.source);
            return;
        };

        let detected = detector.detect(&raw);
        match detected.as_deref().map(|label| (label, Charset::for_label(label))) {
            Some((_, Some(charset))) => {
                self.try_charset(&charset);
            }
            Some((label, None)) => debug!(label, "detector returned an unknown encoding"),
            None => debug!("detector found no encoding, keeping {}", self.active),
        }
    }

    /// Apply `charset` to every name if it decodes all of them.
    fn try_charset(&mut self, charset: &Charset) -> bool {
        match self.decode_all(charset) {
            Ok(names) => {
                self.commit(charset, names);
                info!(encoding = %charset, entries = self.entries.len(), "filenames re-decoded");
                true
            }
            Err(failure) => {
                debug!(encoding = %charset, "encoding attempt failed: {failure}");
                false
            }
        }
    }

    fn decode_all(&self, charset: &Charset) -> std::result::Result<Vec<String>, AttemptFailure> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let raw = self.source.encode(&entry.file_name).ok_or_else(|| {
                    AttemptFailure::Unencodable {
                        index,
                        name: entry.file_name.clone(),
                    }
                })?;
                charset
                    .decode(&raw)
                    .ok_or_else(|| AttemptFailure::Undecodable {
                        index,
                        name: entry.file_name.clone(),
                    })
            })
            .collect()
    }

    fn commit(&mut self, charset: &Charset, names: Vec<String>) {
        for (entry, name) in self.entries.iter_mut().zip(names) {
            entry.file_name = name;
        }
        self.name_index = build_index(&self.entries);
        self.active = charset.clone();
    }

    /// Extract every entry under `dest`, naming files by their current
    /// filenames. Returns the number of entries written.
    ///
    /// Stops at the first failure; files already written stay on disk.
    pub async fn extract_all(&self, dest: &Path) -> Result<usize> {
        let mut written = 0;
        for entry in &self.entries {
            let Some(path) = sanitize_extract_path(dest, &entry.file_name) else {
                warn!(name = %entry.file_name, "skipping entry with no safe output path");
                continue;
            };

            if entry.is_directory {
                tokio::fs::create_dir_all(&path)
                    .await
                    .map_err(|e| Error::Extraction {
                        name: entry.file_name.clone(),
                        reason: anyhow::Error::new(e)
                            .context(format!("Failed to create {}", path.display())),
                    })?;
            } else {
                self.extractor
                    .extract_to_file(entry, &path)
                    .await
                    .map_err(|reason| Error::Extraction {
                        name: entry.file_name.clone(),
                        reason,
                    })?;
            }

            info!(name = %entry.file_name, path = %path.display(), "extracted");
            written += 1;
        }
        Ok(written)
    }
}

/// Map each name to its entry; later duplicates replace earlier ones.
fn build_index(entries: &[ZipFileEntry]) -> HashMap<String, usize> {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.file_name.clone(), i))
        .collect()
}

/// Output path for an entry name, confined to `dest_root`.
///
/// Root, drive prefix, `.` and `..` components are dropped. Returns `None`
/// when nothing of the name is left.
fn sanitize_extract_path(dest_root: &Path, name: &str) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for comp in Path::new(name).components() {
        if let Component::Normal(part) = comp {
            clean.push(part);
        }
    }
    if clean.as_os_str().is_empty() {
        None
    } else {
        Some(dest_root.join(clean))
    }
}
