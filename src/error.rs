use thiserror::Error;

/// Errors returned by a [`KvsEngine`](crate::KvsEngine).
///
/// A missing key is not an error: lookups report absence as `Ok(None)`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KvsError {
    /// The store is not initialized or the key is empty.
    ///
    /// Both causes share this variant, so callers cannot tell them apart.
    #[error("Storage is not initialized or key is empty")]
    NotInitializedOrInvalidKey,
}

pub type Result<T> = std::result::Result<T, KvsError>;
