//! Statistical encoding detection.
//!
//! Detection is optional: builds without the `detect` feature have no
//! detector at all, and callers treat that the same as a detector that
//! found nothing.

/// Guesses the encoding of a byte buffer.
pub trait EncodingDetector {
    /// Best-guess encoding label for `bytes`, or `None` if nothing usable.
    fn detect(&self, bytes: &[u8]) -> Option<String>;
}

/// The detector compiled into this build, if any.
pub fn default_detector() -> Option<Box<dyn EncodingDetector>> {
    #[cfg(feature = "detect")]
    {
        Some(Box::new(ChardetDetector))
    }

    #[cfg(not(feature = "detect"))]
    {
        None
    }
}

/// Detector backed by `chardetng`.
#[cfg(feature = "detect")]
#[derive(Debug, Default, Clone, Copy)]
pub struct ChardetDetector;

#[cfg(feature = "detect")]
impl EncodingDetector for ChardetDetector {
    fn detect(&self, bytes: &[u8]) -> Option<String> {
        // ASCII reads the same in every candidate; nothing to learn
        if bytes.is_ascii() {
            return None;
        }

        let mut detector = chardetng::EncodingDetector::new();
        detector.feed(bytes, true);
        let encoding = detector.guess(None, true);
        tracing::debug!(encoding = encoding.name(), bytes = bytes.len(), "detected encoding");
        Some(encoding.name().to_string())
    }
}
