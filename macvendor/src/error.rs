use macvendor_core::CodecError;
use thiserror::Error;

/// Outcome of a failed lookup.
///
/// `NotFound` is an ordinary result; `CorruptArtifact` means the registry
/// can never be loaded by this process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("invalid MAC address {0:?}")]
    InvalidAddress(String),

    #[error("MAC not found in registry")]
    NotFound,

    #[error("vendor registry is corrupt: {0}")]
    CorruptArtifact(String),
}

impl From<CodecError> for LookupError {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::CorruptArtifact(msg) => LookupError::CorruptArtifact(msg),
            other => LookupError::CorruptArtifact(other.to_string()),
        }
    }
}
