//! RFC 5322 header handling: byte decoding, header/body split, unfolding.

/// Decode raw header bytes to a string.
///
/// Tries UTF-8 first, then falls back to Windows-1252 (which accepts
/// every byte).
pub fn decode_bytes(bytes: &[u8]) -> String {
    // Strip BOM if present
    let bytes = if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        &bytes[3..]
    } else {
        bytes
    };

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

/// Split a raw message into `(header_bytes, body_bytes)` at the first
/// blank line. A message without a blank line is all headers.
pub fn split_header_block(data: &[u8]) -> (&[u8], &[u8]) {
    for i in 0..data.len().saturating_sub(1) {
        if data[i] == b'\n' && data[i + 1] == b'\n' {
            return (&data[..i], &data[i + 2..]);
        }
        if i + 3 < data.len()
            && data[i] == b'\r'
            && data[i + 1] == b'\n'
            && data[i + 2] == b'\r'
            && data[i + 3] == b'\n'
        {
            return (&data[..i], &data[i + 4..]);
        }
    }
    (data, &[])
}

/// Unfold headers: join continuation lines (starting with space or tab)
/// with the previous header.
///
/// Returns ordered `(lowercase_name, value)` pairs. Repeated headers are
/// kept; lines without a colon that are not continuations are skipped.
pub fn unfold_headers(text: &str) -> Vec<(String, String)> {
    let mut result: Vec<(String, String)> = Vec::new();

    for line in text.lines() {
        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some(last) = result.last_mut() {
                last.1.push(' ');
                last.1.push_str(line.trim());
            }
        } else if let Some(colon_pos) = line.find(':') {
            let name = line[..colon_pos].trim().to_lowercase();
            let value = line[colon_pos + 1..].trim().to_string();
            result.push((name, value));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_header_block_lf() {
        let data = b"From: a@b.com\nSubject: Hi\n\nBody\n";
        let (head, body) = split_header_block(data);
        assert_eq!(head, b"From: a@b.com\nSubject: Hi");
        assert_eq!(body, b"Body\n");
    }

    #[test]
    fn test_split_header_block_crlf() {
        let data = b"From: a@b.com\r\nSubject: Hi\r\n\r\nBody\r\n";
        let (head, body) = split_header_block(data);
        assert_eq!(head, b"From: a@b.com\r\nSubject: Hi");
        assert_eq!(body, b"Body\r\n");
    }

    #[test]
    fn test_split_header_block_no_body() {
        let data = b"From: a@b.com\nSubject: Hi\n";
        let (head, body) = split_header_block(data);
        assert_eq!(head, data.as_slice());
        assert!(body.is_empty());
    }

    #[test]
    fn test_unfold_headers() {
        let text = "Subject: This is a long\n\tsubject line\nFrom: user@example.com\n";
        let headers = unfold_headers(text);
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[0].0, "subject");
        assert_eq!(headers[0].1, "This is a long subject line");
        assert_eq!(headers[1].0, "from");
    }

    #[test]
    fn test_unfold_headers_keeps_repeats_in_order() {
        let text = "Received: one\nReceived: two\n";
        let headers = unfold_headers(text);
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[0].1, "one");
        assert_eq!(headers[1].1, "two");
    }

    #[test]
    fn test_decode_bytes_latin1_fallback() {
        // 0xE9 is 'é' in Windows-1252 but invalid standalone UTF-8
        let decoded = decode_bytes(b"Subject: caf\xe9\n");
        assert!(decoded.contains("café"));
    }
}
