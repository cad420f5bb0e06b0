//! Filename character sets.
//!
//! ZIP writers without the UTF-8 flag store filenames in whatever code page
//! the host happened to use. Readers traditionally assume CP437, so a name
//! written on a GBK or Shift_JIS system comes out garbled. A [`Charset`]
//! pairs the label the user (or the detector) asked for with a strict codec
//! that can tell whether a byte string is valid text in that encoding.
//!
//! CP437 comes from the `oem_cp` tables; everything else is a WHATWG
//! encoding from `encoding_rs`.

pub mod detect;

use std::fmt;
use std::str::FromStr;

use encoding_rs::{BIG5, EUC_KR, Encoding, GBK, SHIFT_JIS};
use oem_cp::code_table::{DECODING_TABLE_CP437, ENCODING_TABLE_CP437};
use thiserror::Error;

/// Label used when reporting the legacy ZIP code page.
pub const CP437_LABEL: &str = "cp437";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Codec {
    Cp437,
    Whatwg(&'static Encoding),
}

/// A named text encoding usable for filenames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charset {
    label: String,
    codec: Codec,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown encoding: {0}")]
pub struct UnknownCharset(pub String);

impl Charset {
    /// The legacy DOS code page ZIP readers assume for unflagged names.
    pub fn cp437() -> Self {
        Self {
            label: CP437_LABEL.to_string(),
            codec: Codec::Cp437,
        }
    }

    /// Resolve an encoding label, keeping the label as given for display.
    ///
    /// Accepts WHATWG labels (`gbk`, `shift_jis`, `euc-kr`, ...), their
    /// underscore spellings, and the Windows code page names commonly used
    /// for the same tables (`cp936`, `cp932`, `cp949`, `cp950`).
    pub fn for_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return None;
        }
        let codec = match normalized.as_str() {
            "cp437" | "cp-437" | "ibm437" | "437" | "oem-us" => Codec::Cp437,
            "cp936" | "ms936" | "936" => Codec::Whatwg(GBK),
            "cp932" | "932" => Codec::Whatwg(SHIFT_JIS),
            "cp949" | "ms949" | "uhc" | "949" => Codec::Whatwg(EUC_KR),
            "cp950" | "ms950" | "950" => Codec::Whatwg(BIG5),
            other => Encoding::for_label(other.as_bytes())
                .or_else(|| Encoding::for_label(other.replace('_', "-").as_bytes()))
                .map(Codec::Whatwg)?,
        };
        Some(Self {
            label: label.trim().to_string(),
            codec,
        })
    }

    /// The label this charset was created with.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Decode `bytes` strictly. Returns `None` if any byte sequence is
    /// malformed in this encoding.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self.codec {
            Codec::Cp437 => Some(decode_cp437(bytes)),
            Codec::Whatwg(encoding) => encoding
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
        }
    }

    /// Encode `text` strictly. Returns `None` if some character has no
    /// representation in this encoding.
    pub fn encode(&self, text: &str) -> Option<Vec<u8>> {
        match self.codec {
            Codec::Cp437 => encode_cp437(text),
            Codec::Whatwg(encoding) => {
                let (bytes, used, had_errors) = encoding.encode(text);
                // UTF-16 and replacement encode as UTF-8
                if had_errors || used != encoding {
                    return None;
                }
                Some(bytes.into_owned())
            }
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl FromStr for Charset {
    type Err = UnknownCharset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::for_label(s).ok_or_else(|| UnknownCharset(s.to_string()))
    }
}

/// CP437 maps every byte, so decoding cannot fail.
pub fn decode_cp437(bytes: &[u8]) -> String {
    oem_cp::decode_string_complete_table(bytes, &DECODING_TABLE_CP437)
}

pub fn encode_cp437(text: &str) -> Option<Vec<u8>> {
    oem_cp::encode_string_checked(text, &ENCODING_TABLE_CP437)
}
