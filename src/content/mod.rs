//! Message content extraction.
//!
//! Turns one message's raw bytes into an ordered list of renderable parts.
//!
//! ## Module Structure
//!
//! - `charset`: byte → text decoding with a defined fallback
//! - `mime_tree`: owned content-part tree built from `mailparse` output
//! - `extractor`: type-dispatching depth-first flattening of the tree
//! - `text`: plain text → HTML fragment conversion

pub mod charset;
pub mod extractor;
pub mod mime_tree;
pub mod text;

pub use charset::decode_bytes;
pub use extractor::{ContentPart, Payload, extract_parts};
pub use mime_tree::MimeNode;
