//! Email parsing: mbox framing, header decoding, and MIME tree building.

pub mod header;
pub mod mbox;
pub mod mime;
