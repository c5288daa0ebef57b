//! Mbox framing: split an archive into raw message blocks.
//!
//! Reads the file line-by-line with a buffered reader and splits on
//! `From ` envelope lines. Tolerant of malformed input: mixed `\n` and
//! `\r\n` endings, separators without a preceding blank line (logged),
//! a UTF-8 BOM at the start of the file, and truncated final messages.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::warn;

use crate::error::{MailError, Result};

/// Size of the internal read buffer.
const READ_BUFFER_SIZE: usize = 128 * 1024;

/// Split an mbox file into raw per-message byte blocks, in file order.
///
/// Each block starts at its `From ` envelope line and runs to the next
/// separator or EOF. An empty file yields an empty list; content before
/// the first separator (a file that is not really an mbox) is ignored.
pub fn split_messages(path: impl AsRef<Path>) -> Result<Vec<Vec<u8>>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MailError::FileNotFound(path.to_path_buf())
        } else {
            MailError::io(path, e)
        }
    })?;
    let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);

    let mut messages: Vec<Vec<u8>> = Vec::new();
    let mut current: Vec<u8> = Vec::new();
    let mut in_message = false;
    let mut prev_line_was_empty = true;
    let mut first_line = true;
    let mut offset: u64 = 0;

    // Reusable line buffer
    let mut line_buf: Vec<u8> = Vec::with_capacity(4096);

    loop {
        line_buf.clear();
        let line_len = reader
            .read_until(b'\n', &mut line_buf)
            .map_err(|e| MailError::io(path, e))? as u64;
        if line_len == 0 {
            break; // EOF
        }

        if is_mbox_separator(&line_buf) {
            if !first_line && !prev_line_was_empty {
                warn!(offset, "'From ' separator without preceding blank line");
            }
            if in_message && !current.is_empty() {
                messages.push(std::mem::take(&mut current));
            }
            in_message = true;
            current.extend_from_slice(&line_buf);
        } else if in_message {
            current.extend_from_slice(&line_buf);
        }

        prev_line_was_empty = is_blank_line(&line_buf);
        first_line = false;
        offset += line_len;
    }

    if in_message && !current.is_empty() {
        messages.push(current);
    }

    Ok(messages)
}

/// Check whether a line is an mbox separator (`From ` at the start).
pub(crate) fn is_mbox_separator(line: &[u8]) -> bool {
    // Skip BOM if present at very start
    let line = if line.starts_with(&[0xEF, 0xBB, 0xBF]) {
        &line[3..]
    } else {
        line
    };
    line.starts_with(b"From ")
}

/// Check whether a line is blank (empty or only whitespace / CR / LF).
fn is_blank_line(line: &[u8]) -> bool {
    line.iter()
        .all(|&b| b == b'\n' || b == b'\r' || b == b' ' || b == b'\t')
}
