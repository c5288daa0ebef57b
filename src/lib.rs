//! `mailpred`: boolean email predicates for find-style filesystem filters.
//!
//! This crate answers yes/no questions about a single email-bearing file:
//! does it carry a given header value, does its body contain a string,
//! does it have an attachment matching a name fragment, does its date
//! header fall before/after/on a partial date. The file may be one
//! RFC 5322 message or an mbox archive; a query matches when ANY
//! contained message matches.

pub mod date;
pub mod error;
pub mod extension;
pub mod model;
pub mod parser;
pub mod predicate;
pub mod source;

pub use extension::{EXTENSION_DESCRIPTION, EXTENSION_NAME, EXTENSION_VERSION};
pub use predicate::Evaluator;
