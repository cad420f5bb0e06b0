//! ZIP archive parsing and extraction.
//!
//! - [`structures`]: on-disk records (EOCD, ZIP64, entry metadata)
//! - [`parser`]: reads the Central Directory from any [`ReadAt`](crate::io::ReadAt) source
//! - [`extractor`]: reads entry data and writes it out
//!
//! Supported: STORED and DEFLATE entries, ZIP64 sizes and offsets, archive
//! comments. Not supported: encryption, multi-disk archives, other
//! compression methods.

mod extractor;
mod parser;
mod structures;

pub use extractor::ZipExtractor;
pub use parser::ZipParser;
pub use structures::*;
