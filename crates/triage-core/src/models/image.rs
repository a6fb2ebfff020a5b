use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::CoreError;

/// Encoded wound/burn photograph. The bytes are opaque to the engine; only
/// the image classifier interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImagePayload {
    bytes: Vec<u8>,
}

impl ImagePayload {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Decode the standard base64 form sent by web clients.
    pub fn from_base64(encoded: &str) -> Result<Self, CoreError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| CoreError::InvalidImage(e.to_string()))?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
