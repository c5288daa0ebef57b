//! Predicate evaluators: boolean queries over a message file.
//!
//! Every predicate loads the file through the owned [`MessageSource`] and
//! asks whether ANY contained message satisfies the condition. Failures
//! of any kind (missing file, malformed content, bad date argument,
//! undecodable payload) collapse to `false`; there is no error state at
//! this boundary.

use std::cmp::Ordering;

use crate::date;
use crate::model::Message;
use crate::source::MessageSource;

/// Stateful predicate evaluator owning the single-slot message cache.
///
/// Construct one per evaluation context and feed it paths sequentially;
/// repeated predicates against the same path reuse the cached messages.
#[derive(Debug, Default)]
pub struct Evaluator {
    source: MessageSource,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `path` and test whether any message satisfies `pred`.
    fn any_message(&mut self, path: &str, pred: impl Fn(&Message) -> bool) -> bool {
        match self.source.load(path) {
            Some(messages) => messages.iter().any(pred),
            None => false,
        }
    }

    /// Case-insensitive substring test of `value` inside the first value
    /// of the named header.
    pub fn check_header(&mut self, path: &str, key: &str, value: &str) -> bool {
        let needle = value.to_lowercase();
        self.any_message(path, |msg| {
            msg.header(key)
                .is_some_and(|v| v.to_lowercase().contains(&needle))
        })
    }

    /// True when the named header exists at all, with any value.
    pub fn has_header(&mut self, path: &str, key: &str) -> bool {
        self.any_message(path, |msg| msg.has_header(key))
    }

    /// Case-sensitive substring test of `query` inside the decoded
    /// plain-text payload.
    ///
    /// A non-multipart `text/plain` message is searched directly; a
    /// multipart message is walked and every `text/plain` part searched.
    /// Base64 payloads are decoded before searching; a failed decode
    /// makes that part a non-match.
    pub fn contains(&mut self, path: &str, query: &str) -> bool {
        self.any_message(path, |msg| {
            if msg.is_multipart() {
                msg.walk().any(|part| payload_contains(part, query))
            } else {
                payload_contains(msg, query)
            }
        })
    }

    /// True when a multipart message carries a part whose filename
    /// case-insensitively contains `query`.
    pub fn find_attachment(&mut self, path: &str, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.any_message(path, |msg| {
            msg.is_multipart()
                && msg.walk().any(|part| {
                    part.filename
                        .as_deref()
                        .is_some_and(|name| !name.is_empty() && name.to_lowercase().contains(&needle))
                })
        })
    }

    /// True when a multipart message carries any part with a non-empty
    /// filename.
    pub fn has_attachment(&mut self, path: &str) -> bool {
        self.any_message(path, |msg| {
            msg.is_multipart()
                && msg
                    .walk()
                    .any(|part| part.filename.as_deref().is_some_and(|n| !n.is_empty()))
        })
    }

    /// Field-wise date equality at the argument's precision against the
    /// named header.
    pub fn date_equals(&mut self, path: &str, key: &str, datestr: &str) -> bool {
        let Some(arg) = date::parse_time_arg(datestr) else {
            return false;
        };
        self.any_message(path, |msg| {
            date::parse_date_header(msg.header(key))
                .is_some_and(|header| date::date_equals(&arg, &header))
        })
    }

    /// True when the named header's date lies before the argument.
    pub fn date_before(&mut self, path: &str, key: &str, datestr: &str) -> bool {
        self.compare(path, key, datestr, Ordering::Greater)
    }

    /// True when the named header's date lies after the argument.
    pub fn date_after(&mut self, path: &str, key: &str, datestr: &str) -> bool {
        self.compare(path, key, datestr, Ordering::Less)
    }

    fn compare(&mut self, path: &str, key: &str, datestr: &str, ord: Ordering) -> bool {
        let Some(arg) = date::parse_time_arg(datestr) else {
            return false;
        };
        self.any_message(path, |msg| {
            date::parse_date_header(msg.header(key))
                .is_some_and(|header| date::compare_dates(&arg, &header, ord))
        })
    }

    // Fixed-header conveniences.

    /// `From` header contains `query` (case-insensitive).
    pub fn from_(&mut self, path: &str, query: &str) -> bool {
        self.check_header(path, "From", query)
    }

    /// `To` header contains `query` (case-insensitive).
    pub fn to(&mut self, path: &str, query: &str) -> bool {
        self.check_header(path, "To", query)
    }

    /// `Subject` header contains `query` (case-insensitive).
    pub fn subject(&mut self, path: &str, query: &str) -> bool {
        self.check_header(path, "Subject", query)
    }

    /// `Date` header equals the partial date argument.
    pub fn sent(&mut self, path: &str, datestr: &str) -> bool {
        self.date_equals(path, "Date", datestr)
    }

    /// `Date` header lies before the partial date argument.
    pub fn sent_before(&mut self, path: &str, datestr: &str) -> bool {
        self.date_before(path, "Date", datestr)
    }

    /// `Date` header lies after the partial date argument.
    pub fn sent_after(&mut self, path: &str, datestr: &str) -> bool {
        self.date_after(path, "Date", datestr)
    }
}

/// The per-part body rule: `text/plain` only, decode first, then a
/// case-sensitive substring test.
fn payload_contains(part: &Message, query: &str) -> bool {
    if part.content_type != "text/plain" || part.is_multipart() {
        return false;
    }
    part.decoded_body()
        .is_some_and(|text| text.contains(query))
}
