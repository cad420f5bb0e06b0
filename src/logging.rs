//! Logging setup.
//!
//! Logs go to stderr so listings on stdout stay clean. `RUST_LOG` wins over
//! the `-v` count when set:
//!
//! ```bash
//! RUST_LOG=unzip_enc=debug unzip-enc -l archive.zip -O gbk
//! ```

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default filter directive for a `-v` count.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the global subscriber. Calling it again is a no-op.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .compact(),
    );

    // Ignore the error if a subscriber is already set
    let _ = tracing::subscriber::set_global_default(subscriber);
}
