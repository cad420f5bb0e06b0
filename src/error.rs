use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The input could not be read as a ZIP archive.
    #[error("not a readable ZIP archive: {0:#}")]
    ArchiveOpen(anyhow::Error),

    /// Writing an entry to disk failed.
    #[error("failed to extract {name}: {reason:#}")]
    Extraction { name: String, reason: anyhow::Error },
}

pub type Result<T> = std::result::Result<T, Error>;
