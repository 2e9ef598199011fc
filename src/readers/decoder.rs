use crate::error::{Result, WeathererError};
use encoding_rs::Encoding;

/// Turns raw source bytes into text before any parsing happens.
pub trait Decoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<String>;

    fn name(&self) -> &'static str;
}

/// Strict decoder backed by an `encoding_rs` encoding.
#[derive(Debug, Clone, Copy)]
pub struct EncodingDecoder {
    encoding: &'static Encoding,
}

impl EncodingDecoder {
    pub fn new(encoding: &'static Encoding) -> Self {
        Self { encoding }
    }

    /// Resolve a WHATWG label such as `shift_jis`, `sjis` or `utf-8`.
    pub fn for_label(label: &str) -> Result<Self> {
        Encoding::for_label(label.trim().as_bytes())
            .map(Self::new)
            .ok_or_else(|| {
                WeathererError::InvalidConfig(format!("Unknown source encoding: '{}'", label))
            })
    }

    pub fn shift_jis() -> Self {
        Self::new(encoding_rs::SHIFT_JIS)
    }
}

impl Default for EncodingDecoder {
    fn default() -> Self {
        Self::shift_jis()
    }
}

impl Decoder for EncodingDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<String> {
        self.encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned())
            .ok_or(WeathererError::ImportDecode {
                encoding: self.encoding.name(),
            })
    }

    fn name(&self) -> &'static str {
        self.encoding.name()
    }
}
