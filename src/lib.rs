//! # unzip-enc
//!
//! List and extract ZIP archives whose filenames were written in a legacy
//! code page.
//!
//! ZIP entries without the UTF-8 flag carry raw filename bytes with no
//! record of their encoding. Readers decode them as CP437, which garbles
//! names created on, for example, Chinese or Japanese Windows systems. This
//! crate recovers the raw bytes and re-decodes every name with the first
//! encoding that fits all of them: a caller-supplied candidate, or failing
//! that a statistical guess.
//!
//! ## Features
//!
//! - Candidate encodings tried in order, all or nothing per archive
//! - Optional automatic detection (`detect` feature, on by default)
//! - `unzip -l` compatible listings
//! - Extraction of STORED and DEFLATE entries, ZIP64 aware, CRC checked
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use unzip_enc::{Charset, ZipArchive};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let candidates = [Charset::for_label("gbk").expect("known label")];
//!     let archive = ZipArchive::open(Path::new("reports.zip"), &candidates, None).await?;
//!
//!     for entry in archive.list_entries() {
//!         println!("{} ({})", entry.file_name, archive.active_encoding());
//!     }
//!     archive.extract_all(Path::new("out")).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod charset;
pub mod cli;
pub mod error;
pub mod io;
pub mod listing;
pub mod logging;
pub mod zip;

pub use archive::ZipArchive;
pub use charset::Charset;
pub use charset::detect::{EncodingDetector, default_detector};
pub use cli::Cli;
pub use error::{Error, Result};
pub use io::{LocalFileReader, MemoryReader, ReadAt};
pub use zip::{ModTime, ZipFileEntry};
