//! Error types for the opensubdiv-patch crate.

use thiserror::Error;

use crate::far::PatchType;
use crate::sdc::Scheme;

/// Main error type for opensubdiv-patch operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The subdivision scheme has no patch conversion.
    #[error("Unsupported subdivision scheme: {0}")]
    UnsupportedScheme(Scheme),

    /// The scheme cannot produce the requested patch type.
    #[error("Patch type {patch_type} is not supported by the {scheme} scheme")]
    UnsupportedPatchType { scheme: Scheme, patch_type: PatchType },

    /// Invalid source patch topology.
    #[error("Invalid source patch: {0}")]
    InvalidSourcePatch(String),

    /// Index out of bounds.
    #[error("Index {index} out of bounds (max: {max})")]
    IndexOutOfBounds { index: usize, max: usize },

    /// Invalid buffer size.
    #[error("Invalid buffer size: expected {expected}, got {actual}")]
    InvalidBufferSize { expected: usize, actual: usize },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
