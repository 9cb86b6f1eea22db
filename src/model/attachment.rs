//! Attachment records.
//!
//! Content arrives base64-encoded inside the listing response and is only
//! decoded at export time.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// One attachment of a message, as listed by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRecord {
    /// Display name of the attachment (may contain path-unsafe characters).
    #[serde(default)]
    pub name: String,

    /// Size in bytes as reported by the service.
    #[serde(default)]
    pub size: u64,

    /// MIME content type (e.g. `"application/pdf"`), if reported.
    #[serde(default)]
    pub content_type: Option<String>,

    /// Base64 payload. Only file attachments carry one; item and reference
    /// attachments do not.
    #[serde(default)]
    pub content_bytes: Option<String>,
}

impl AttachmentRecord {
    /// Decode the base64 payload into raw bytes.
    ///
    /// Returns `Ok(None)` when the attachment carries no payload.
    pub fn decode(&self) -> Result<Option<Vec<u8>>, base64::DecodeError> {
        self.content_bytes
            .as_deref()
            .map(decode_content_bytes)
            .transpose()
    }
}

/// Decode a base64 `contentBytes` payload.
pub fn decode_content_bytes(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(encoded.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_round_trip() {
        let original: Vec<u8> = (0..=255u8).chain([0, 0, 0xff]).collect();
        let encoded = STANDARD.encode(&original);
        assert_eq!(decode_content_bytes(&encoded).unwrap(), original);
    }

    #[test]
    fn test_decode_without_payload() {
        let json = r##"{"@odata.type":"#microsoft.graph.itemAttachment","name":"fwd","size":10}"##;
        let att: AttachmentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(att.decode().unwrap(), None);
    }

    #[test]
    fn test_decode_invalid_payload() {
        let att = AttachmentRecord {
            name: "x.bin".to_string(),
            size: 3,
            content_type: None,
            content_bytes: Some("not base64!".to_string()),
        };
        assert!(att.decode().is_err());
    }
}
