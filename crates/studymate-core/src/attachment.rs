//! Image attachments carried as data URIs.
//!
//! User messages store photos as `data:image/jpeg;base64,<payload>` strings.
//! The conversation engine only passes these strings through; encoding and
//! decoding happen at the edges.

use crate::error::{Result, StudyError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// Converts image bytes to and from the data URI stored on a message.
pub trait ImageCodec: Send + Sync {
    /// Encodes raw image bytes as a data URI.
    fn encode(&self, bytes: &[u8]) -> String;

    /// Decodes a data URI back into raw image bytes.
    fn decode(&self, data_uri: &str) -> Result<Vec<u8>>;
}

/// Base64 JPEG data URI codec.
///
/// Bytes are passed through as-is; callers are expected to hand over JPEG
/// data. Decoding accepts any `data:<mime>;base64,` prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegDataUriCodec;

impl ImageCodec for JpegDataUriCodec {
    fn encode(&self, bytes: &[u8]) -> String {
        format!("{}{}", JPEG_DATA_URI_PREFIX, BASE64_STANDARD.encode(bytes))
    }

    fn decode(&self, data_uri: &str) -> Result<Vec<u8>> {
        let payload = data_uri
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .map(|(_mime, payload)| payload)
            .ok_or_else(|| {
                StudyError::InvalidAttachment("expected a base64 data URI".to_string())
            })?;

        Ok(BASE64_STANDARD.decode(payload.trim())?)
    }
}

/// MIME type declared by a data URI, if it is one.
pub fn data_uri_mime_type(data_uri: &str) -> Option<&str> {
    data_uri
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(';'))
        .map(|(mime, _)| mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_uses_jpeg_prefix() {
        let uri = JpegDataUriCodec.encode(&[0xFF, 0xD8, 0xFF]);
        assert_eq!(uri, "data:image/jpeg;base64,/9j/");
        assert_eq!(data_uri_mime_type(&uri), Some("image/jpeg"));
    }

    #[test]
    fn test_decode_recovers_bytes() {
        let bytes = JpegDataUriCodec
            .decode("data:image/jpeg;base64,/9j/")
            .unwrap();
        assert_eq!(bytes, vec![0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_decode_rejects_plain_urls() {
        let err = JpegDataUriCodec
            .decode("https://example.com/a.jpg")
            .unwrap_err();
        assert!(matches!(err, StudyError::InvalidAttachment(_)));
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        let err = JpegDataUriCodec.decode("data:image/jpeg;base64,@@@").unwrap_err();
        assert!(matches!(err, StudyError::InvalidAttachment(_)));
    }
}
