//! Main entry point for the unzip-enc CLI application.

use anyhow::{Result, bail};
use clap::Parser;
use std::path::Path;
use tracing::error;

use unzip_enc::listing::write_listing;
use unzip_enc::{Cli, EncodingDetector, ZipArchive, default_detector, logging};

/// Parses arguments, then lists or extracts each archive in the order given.
///
/// A failing archive does not stop the others; the exit status is non-zero
/// if any of them failed.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let detector = default_detector();
    let mut failed = 0usize;
    for file in &cli.files {
        if let Err(e) = process_zip(file, &cli, detector.as_deref()).await {
            error!("{}: {:#}", file, e);
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{} of {} archives failed", failed, cli.files.len());
    }
    Ok(())
}

/// Open one archive and list or extract it.
///
/// The archive, and with it the file handle, is dropped before returning on
/// every path.
async fn process_zip(
    file: &str,
    cli: &Cli,
    detector: Option<&dyn EncodingDetector>,
) -> Result<()> {
    let archive = ZipArchive::open(Path::new(file), &cli.encodings, detector).await?;

    if cli.list {
        let stdout = std::io::stdout();
        write_listing(&mut stdout.lock(), file, &archive)?;
        return Ok(());
    }

    archive.extract_all(Path::new(&cli.extract_dir)).await?;
    Ok(())
}
