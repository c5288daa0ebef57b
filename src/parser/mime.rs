//! Recursive MIME tree builder.
//!
//! Builds a [`Message`] tree from raw message bytes: header block split,
//! content-type and parameter extraction, and multipart splitting on the
//! declared boundary. Payloads are kept undecoded; transfer-encoding
//! resolution happens later, at query time.

use crate::model::Message;
use crate::parser::header;

/// Maximum depth for recursive multipart parsing (guards against
/// adversarial nesting).
const MAX_DEPTH: usize = 10;

/// Parse a complete raw message (headers + body) into a [`Message`] tree.
///
/// A leading mbox `From ` envelope line is skipped if present. This never
/// fails: unrecognizable input simply produces a message with no headers,
/// which the loader rejects.
pub fn parse_message(data: &[u8]) -> Message {
    build_part(skip_from_line(data), 0)
}

fn build_part(data: &[u8], depth: usize) -> Message {
    let (head, body_bytes) = header::split_header_block(data);
    let headers = header::unfold_headers(&header::decode_bytes(head));

    let content_type_raw = first_header(&headers, "content-type");
    let content_type = content_type_raw
        .map(|v| v.split(';').next().unwrap_or("").trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "text/plain".to_string());

    let transfer_encoding =
        first_header(&headers, "content-transfer-encoding").map(|v| v.trim().to_lowercase());

    let filename = first_header(&headers, "content-disposition")
        .and_then(|v| parameter(v, "filename"))
        .or_else(|| content_type_raw.and_then(|v| parameter(v, "name")))
        .filter(|s| !s.is_empty());

    let body_text = header::decode_bytes(body_bytes);

    let mut parts = Vec::new();
    if content_type.starts_with("multipart/") && depth < MAX_DEPTH {
        if let Some(boundary) = content_type_raw.and_then(|v| parameter(v, "boundary")) {
            for raw_part in split_multipart(&body_text, &boundary) {
                parts.push(build_part(raw_part.as_bytes(), depth + 1));
            }
        }
    }

    let body = if parts.is_empty() {
        body_text
    } else {
        String::new()
    };

    Message {
        headers,
        content_type,
        transfer_encoding,
        filename,
        body,
        parts,
    }
}

/// First value for a header name in an unfolded header list.
fn first_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// Extract a `name=value` parameter from a structured header value
/// (e.g. `boundary` from `multipart/mixed; boundary="abc"`).
///
/// The parameter name is matched case-insensitively; surrounding quotes
/// are stripped from the value.
fn parameter(value: &str, name: &str) -> Option<String> {
    for segment in value.split(';').skip(1) {
        let mut kv = segment.splitn(2, '=');
        let key = kv.next()?.trim();
        if key.eq_ignore_ascii_case(name) {
            let raw = kv.next()?.trim();
            let unquoted = raw
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
                .unwrap_or(raw);
            return Some(unquoted.to_string());
        }
    }
    None
}

/// Split a multipart body into its raw part texts.
///
/// Parts run between `--boundary` delimiter lines; the `--boundary--`
/// close delimiter ends the scan. Preamble and epilogue are discarded.
fn split_multipart(body: &str, boundary: &str) -> Vec<String> {
    let delimiter = format!("--{boundary}");
    let close = format!("--{boundary}--");

    let mut parts = Vec::new();
    let mut current: Option<String> = None;

    for line in body.lines() {
        let trimmed = line.trim_end_matches('\r');
        if trimmed == close {
            if let Some(part) = current.take() {
                parts.push(part);
            }
            break;
        } else if trimmed == delimiter {
            if let Some(part) = current.take() {
                parts.push(part);
            }
            current = Some(String::new());
        } else if let Some(part) = current.as_mut() {
            part.push_str(line);
            part.push('\n');
        }
    }

    // Tolerate a missing close delimiter
    if let Some(part) = current.take() {
        parts.push(part);
    }

    parts
}

/// Skip the `From ` envelope line at the start of mbox messages.
fn skip_from_line(data: &[u8]) -> &[u8] {
    let data = if data.starts_with(&[0xEF, 0xBB, 0xBF]) {
        &data[3..]
    } else {
        data
    };

    if data.starts_with(b"From ") {
        if let Some(pos) = data.iter().position(|&b| b == b'\n') {
            return &data[pos + 1..];
        }
    }
    data
}
