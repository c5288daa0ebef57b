//! Data model: the parsed message tree.

pub mod message;

pub use message::Message;
