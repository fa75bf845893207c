use thiserror::Error;

use crate::record::BlockSize;

/// A raw registry record could not be turned into a [`VendorRecord`](crate::VendorRecord).
///
/// Every variant carries the offending MAC prefix so a generation run can
/// report which upstream entry is broken.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("unknown assignment block size {label:?} for vendor {oui}")]
    UnknownBlockSize { oui: String, label: String },

    #[error("invalid MAC prefix {oui:?}")]
    InvalidOui { oui: String },

    #[error("MAC prefix {oui} has {octets} octets but {block} prefixes have {expected}")]
    BlockSizeMismatch {
        oui: String,
        block: BlockSize,
        octets: usize,
        expected: usize,
    },

    #[error("invalid date format for vendor {oui}: {value:?}")]
    InvalidDateFormat { oui: String, value: String },

    #[error("failed to decode source records: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrieError {
    /// Keys are 1 to [`MAX_KEY_LEN`](crate::trie::MAX_KEY_LEN) hex digits.
    #[error("invalid trie key {0:?}")]
    InvalidKey(String),
}

#[derive(Debug, Error)]
pub enum CodecError {
    /// The artifact is truncated, has the wrong shape, or fails to decompress.
    #[error("corrupt artifact: {0}")]
    CorruptArtifact(String),

    /// A record field does not fit the wire format.
    #[error("record {oui} cannot be encoded: {reason}")]
    Unencodable { oui: String, reason: &'static str },

    #[error("compression failed: {0}")]
    Compress(#[source] std::io::Error),
}

impl CodecError {
    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        CodecError::CorruptArtifact(msg.into())
    }
}
