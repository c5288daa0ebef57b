//! The parsed message tree.
//!
//! A [`Message`] is an explicit tagged tree rather than a dynamic object:
//! an ordered header list, a content type, an optional attachment filename,
//! and either a raw leaf payload or a list of sub-parts. "Walking" a
//! message is a depth-first traversal of this tree.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// A single parsed email message or MIME part.
///
/// Payloads are stored **undecoded**: a leaf body tagged with a `base64`
/// transfer encoding keeps its ciphertext, and decoding happens on demand
/// in [`Message::decoded_body`]. This keeps parse failures and decode
/// failures independently recoverable.
#[derive(Debug, Clone)]
pub struct Message {
    /// Ordered `(name, value)` pairs. Names are lowercased; repeated
    /// headers are kept in order and lookup returns the first match.
    pub headers: Vec<(String, String)>,

    /// Lowercased `type/subtype` from `Content-Type`.
    /// Defaults to `text/plain` when the header is absent.
    pub content_type: String,

    /// Lowercased `Content-Transfer-Encoding` value, if present.
    pub transfer_encoding: Option<String>,

    /// Attachment filename from `Content-Disposition` (or the legacy
    /// `Content-Type` `name` parameter), if present.
    pub filename: Option<String>,

    /// Raw, undecoded payload text. Empty for multipart containers.
    pub body: String,

    /// Sub-parts of a multipart message, in document order.
    /// Empty for non-multipart messages.
    pub parts: Vec<Message>,
}

impl Message {
    /// First value for a header name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the named header exists at all, with any value.
    pub fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }

    /// Whether this message is a multipart container.
    pub fn is_multipart(&self) -> bool {
        self.content_type.starts_with("multipart/")
    }

    /// Depth-first traversal of the message tree, yielding the message
    /// itself first, then every nested part in document order.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// The leaf payload with its transfer encoding resolved.
    ///
    /// Returns the raw body unless the part declares `base64`, in which
    /// case the ciphertext is decoded; a failed decode returns `None` so
    /// callers can treat the part as a non-match.
    pub fn decoded_body(&self) -> Option<String> {
        match self.transfer_encoding.as_deref() {
            Some("base64") => {
                let cleaned: String = self
                    .body
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                let bytes = STANDARD.decode(cleaned).ok()?;
                Some(String::from_utf8_lossy(&bytes).into_owned())
            }
            _ => Some(self.body.clone()),
        }
    }
}

/// Iterator state for [`Message::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a Message>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Message;

    fn next(&mut self) -> Option<Self::Item> {
        let msg = self.stack.pop()?;
        // Push in reverse so parts come out in document order.
        for part in msg.parts.iter().rev() {
            self.stack.push(part);
        }
        Some(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(content_type: &str, body: &str) -> Message {
        Message {
            headers: vec![("content-type".into(), content_type.into())],
            content_type: content_type.to_string(),
            transfer_encoding: None,
            filename: None,
            body: body.to_string(),
            parts: Vec::new(),
        }
    }

    #[test]
    fn test_header_lookup_first_match_case_insensitive() {
        let msg = Message {
            headers: vec![
                ("received".into(), "first".into()),
                ("received".into(), "second".into()),
                ("subject".into(), "Hello".into()),
            ],
            content_type: "text/plain".into(),
            transfer_encoding: None,
            filename: None,
            body: String::new(),
            parts: Vec::new(),
        };
        assert_eq!(msg.header("Received"), Some("first"));
        assert_eq!(msg.header("SUBJECT"), Some("Hello"));
        assert_eq!(msg.header("x-missing"), None);
        assert!(msg.has_header("Subject"));
        assert!(!msg.has_header("To"));
    }

    #[test]
    fn test_walk_depth_first_document_order() {
        let mut root = leaf("multipart/mixed", "");
        let mut inner = leaf("multipart/alternative", "");
        inner.parts.push(leaf("text/plain", "a"));
        inner.parts.push(leaf("text/html", "b"));
        root.parts.push(inner);
        root.parts.push(leaf("application/pdf", "c"));

        let types: Vec<&str> = root.walk().map(|m| m.content_type.as_str()).collect();
        assert_eq!(
            types,
            vec![
                "multipart/mixed",
                "multipart/alternative",
                "text/plain",
                "text/html",
                "application/pdf",
            ]
        );
    }

    #[test]
    fn test_decoded_body_base64() {
        let mut msg = leaf("text/plain", "aGVsbG8gd29ybGQ=\n");
        msg.transfer_encoding = Some("base64".into());
        assert_eq!(msg.decoded_body().as_deref(), Some("hello world"));
    }

    #[test]
    fn test_decoded_body_plain_passthrough() {
        let msg = leaf("text/plain", "plain text");
        assert_eq!(msg.decoded_body().as_deref(), Some("plain text"));
    }

    #[test]
    fn test_decoded_body_bad_base64_is_none() {
        let mut msg = leaf("text/plain", "!!! not base64 !!!");
        msg.transfer_encoding = Some("base64".into());
        assert!(msg.decoded_body().is_none());
    }

    #[test]
    fn test_is_multipart() {
        assert!(leaf("multipart/mixed", "").is_multipart());
        assert!(!leaf("text/plain", "x").is_multipart());
    }
}
