//! Message source loading with single-slot caching.
//!
//! A [`MessageSource`] turns a file path into the sequence of messages it
//! contains (one message for a plain RFC 5322 file, many for an mbox
//! archive) and remembers the most recently loaded file so repeated
//! queries against the same path never re-read or re-parse it.

use std::path::Path;

use tracing::debug;

use crate::error::{MailError, Result};
use crate::model::Message;
use crate::parser::{mbox, mime};

/// How the cached file was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// An mbox archive with one or more messages.
    Mbox,
    /// A single RFC 5322 message.
    Single,
}

/// The one cached file: path, format, and its materialized messages.
#[derive(Debug)]
struct CachedFile {
    path: String,
    format: SourceFormat,
    messages: Vec<Message>,
}

/// Loads message sequences from files, caching the last loaded file.
///
/// The cache holds exactly one entry, keyed by the path string as given:
/// loading a different path evicts the previous entry unconditionally,
/// and a failed load leaves the slot untouched. Messages are materialized
/// eagerly once per load; later queries on the same path re-scan the
/// stored list. The cache is deliberately blind to file modification:
/// same path means same messages for the lifetime of this instance.
///
/// One `MessageSource` per evaluation context; there is no shared global
/// state and no locking.
#[derive(Debug, Default)]
pub struct MessageSource {
    cache: Option<CachedFile>,
}

impl MessageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the messages contained in `path`, serving the cache when the
    /// path matches the previous load.
    ///
    /// Returns `None` when the file cannot be read or yields no messages;
    /// every underlying I/O or parse failure is swallowed here.
    pub fn load(&mut self, path: &str) -> Option<&[Message]> {
        let hit = matches!(&self.cache, Some(c) if c.path == path);
        if !hit {
            match self.read_file(path) {
                Ok((format, messages)) => {
                    debug!(path, ?format, count = messages.len(), "caching loaded file");
                    self.cache = Some(CachedFile {
                        path: path.to_string(),
                        format,
                        messages,
                    });
                }
                Err(err) => {
                    debug!(path, %err, "load failed");
                    return None;
                }
            }
        } else {
            debug!(path, "cache hit");
        }

        self.cache.as_ref().map(|c| c.messages.as_slice())
    }

    /// Format of the currently cached file, if any.
    pub fn cached_format(&self) -> Option<SourceFormat> {
        self.cache.as_ref().map(|c| c.format)
    }

    /// Read and parse a file, deciding between mbox and single-message
    /// format.
    ///
    /// Files without an extension or with an `.mbox` extension
    /// (case-insensitive) are first tried as mbox archives. An explicitly
    /// `.mbox`-named file that yields no messages is an error; an
    /// extensionless file falls back to a single-message parse, which
    /// must carry at least one header.
    fn read_file(&self, path: &str) -> Result<(SourceFormat, Vec<Message>)> {
        let fs_path = Path::new(path);

        if mbox_candidate(fs_path) {
            let blocks = mbox::split_messages(fs_path)?;
            if !blocks.is_empty() {
                let messages = blocks.iter().map(|b| mime::parse_message(b)).collect();
                return Ok((SourceFormat::Mbox, messages));
            }
            if fs_path.extension().is_some() {
                return Err(MailError::EmptyMbox(fs_path.to_path_buf()));
            }
        }

        let data = std::fs::read(fs_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MailError::FileNotFound(fs_path.to_path_buf())
            } else {
                MailError::io(fs_path, e)
            }
        })?;
        let message = mime::parse_message(&data);
        if message.headers.is_empty() {
            return Err(MailError::NotAMessage(fs_path.to_path_buf()));
        }
        Ok((SourceFormat::Single, vec![message]))
    }
}

/// Whether the path should be tried as an mbox archive first:
/// no extension, or an `.mbox` extension in any case.
fn mbox_candidate(path: &Path) -> bool {
    match path.extension() {
        None => true,
        Some(ext) => ext.eq_ignore_ascii_case("mbox"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) -> String {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path.to_string_lossy().into_owned()
    }

    const SINGLE: &str = "From: alice@example.com\nSubject: greetings\n\nhello there\n";

    const MBOX: &str = "From alice@example.com Mon Jan 01 00:00:00 2024\n\
Subject: first\n\
\n\
one\n\
\n\
From bob@example.com Mon Jan 01 00:00:00 2024\n\
Subject: second\n\
\n\
two\n";

    #[test]
    fn test_load_single_message() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "mail.eml", SINGLE);

        let mut source = MessageSource::new();
        let msgs = source.load(&path).expect("should load");
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].header("subject"), Some("greetings"));
        assert_eq!(source.cached_format(), Some(SourceFormat::Single));
    }

    #[test]
    fn test_load_mbox_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "archive.MBOX", MBOX);

        let mut source = MessageSource::new();
        let msgs = source.load(&path).expect("should load");
        assert_eq!(msgs.len(), 2);
        assert_eq!(source.cached_format(), Some(SourceFormat::Mbox));
    }

    #[test]
    fn test_extensionless_mbox_candidate_falls_back_to_single() {
        let dir = tempfile::tempdir().unwrap();
        // No extension, no 'From ' envelope: mbox attempt yields nothing,
        // single-message parse succeeds.
        let path = write_file(dir.path(), "mailfile", SINGLE);

        let mut source = MessageSource::new();
        let msgs = source.load(&path).expect("should load");
        assert_eq!(msgs.len(), 1);
        assert_eq!(source.cached_format(), Some(SourceFormat::Single));
    }

    #[test]
    fn test_mbox_extension_without_separators_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        // Named .mbox but carrying no 'From ' envelope at all: no
        // single-message fallback for an explicitly named archive.
        let path = write_file(dir.path(), "broken.mbox", SINGLE);

        let mut source = MessageSource::new();
        assert!(source.load(&path).is_none());
        assert!(source.cached_format().is_none());
    }

    #[test]
    fn test_missing_file_returns_none_and_keeps_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "mail.eml", SINGLE);

        let mut source = MessageSource::new();
        assert!(source.load(&path).is_some());
        assert!(source.load("/no/such/file.eml").is_none());
        // The previous entry is still there, keyed by its own path.
        assert!(source.load(&path).is_some());
    }

    #[test]
    fn test_headerless_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "notes.txt", "no headers here\njust text\n");

        let mut source = MessageSource::new();
        assert!(source.load(&path).is_none());
    }

    #[test]
    fn test_cache_serves_stale_content_for_same_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "mail.eml", SINGLE);

        let mut source = MessageSource::new();
        let first = source.load(&path).unwrap()[0].header("subject").map(String::from);

        // Mutate the file on disk; the cache must not notice.
        write_file(dir.path(), "mail.eml", "From: x@example.com\nSubject: changed\n\nnew\n");
        let second = source.load(&path).unwrap()[0].header("subject").map(String::from);
        assert_eq!(first, second);
    }

    #[test]
    fn test_cache_capacity_is_one() {
        let dir = tempfile::tempdir().unwrap();
        let path_a = write_file(dir.path(), "a.eml", SINGLE);
        let path_b = write_file(
            dir.path(),
            "b.eml",
            "From: b@example.com\nSubject: other\n\nbody\n",
        );

        let mut source = MessageSource::new();
        assert!(source.load(&path_a).is_some());

        // Loading B evicts A...
        assert!(source.load(&path_b).is_some());

        // ...so rewriting A and loading it again parses the new content.
        write_file(dir.path(), "a.eml", "From: a@example.com\nSubject: rewritten\n\nbody\n");
        let msgs = source.load(&path_a).unwrap();
        assert_eq!(msgs[0].header("subject"), Some("rewritten"));
    }
}
