//! Core data structures for MAC vendor resolution.
//!
//! - [`normalize`] turns upstream registry records into compact [`VendorRecord`]s
//! - [`trie`] indexes them by hex-digit prefix
//! - [`codec`] serializes the trie into the compressed artifact shipped with
//!   the `macvendor` crate

pub mod codec;
pub mod error;
pub mod normalize;
pub mod record;
pub mod trie;

pub use error::{CodecError, NormalizeError, TrieError};
pub use record::{BlockSize, VendorRecord};
pub use trie::Trie;
