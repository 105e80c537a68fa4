//! Gift payloads handed to the gift collaborator during wishlist creation.
//!
//! Gift rules live elsewhere; this module only carries the request shape and
//! decodes the inline attachment.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Gift fields as supplied alongside a new wishlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiftSpec {
    pub title: String,
    pub description: Option<String>,
    pub link: Option<String>,
}

/// Attachment as received on the wire, content still encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilePayload {
    pub file_name: Option<String>,
    /// Plain base64 or a data URI (`data:<type>;base64,<payload>`).
    pub file_content: Option<String>,
    pub content_type: Option<String>,
}

/// A gift draft: spec plus optional attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiftDraft {
    pub spec: GiftSpec,
    pub file: Option<FilePayload>,
}

/// Decoded attachment passed to the gift collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileAttachment {
    pub file_name: Option<String>,
    pub content: Vec<u8>,
    pub content_type: Option<String>,
}

/// The attachment content was not valid base64.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("file content is not valid base64: {reason}")]
pub struct FileEncodingError {
    reason: String,
}

/// Decode attachment content.
///
/// Absent content decodes to no bytes. For data URIs only the text after the
/// last comma is decoded.
///
/// # Examples
/// ```
/// use wishlist_backend::domain::decode_file_content;
///
/// assert_eq!(decode_file_content(Some("data:image/png;base64,QUJD")).unwrap(), b"ABC");
/// assert_eq!(decode_file_content(Some("QUJD")).unwrap(), b"ABC");
/// assert!(decode_file_content(None).unwrap().is_empty());
/// ```
pub fn decode_file_content(content: Option<&str>) -> Result<Vec<u8>, FileEncodingError> {
    let Some(raw) = content else {
        return Ok(Vec::new());
    };
    let payload = raw.rsplit_once(',').map_or(raw, |(_, tail)| tail);
    STANDARD.decode(payload.trim()).map_err(|err| FileEncodingError {
        reason: err.to_string(),
    })
}

impl FilePayload {
    /// Decode into the attachment handed to the gift collaborator.
    pub fn decode(self) -> Result<FileAttachment, FileEncodingError> {
        Ok(FileAttachment {
            content: decode_file_content(self.file_content.as_deref())?,
            file_name: self.file_name,
            content_type: self.content_type,
        })
    }
}
