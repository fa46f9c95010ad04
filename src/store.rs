//! Durable key-value slots backing the signature cache.
//!
//! A [`DurableStore`] mirrors a browser-style storage area: named string
//! slots, where any call may fail (quota exhausted, storage disabled, read-only
//! filesystem). Callers treat every failure as "durable storage unavailable".

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Named string slots that may survive the current process.
pub trait DurableStore: Send + Sync {
    /// Reads a slot, returning `None` when it was never written.
    fn get_item(&self, name: &str) -> Result<Option<String>, StoreError>;

    /// Writes a slot, replacing any previous value.
    fn set_item(&self, name: &str, value: &str) -> Result<(), StoreError>;

    /// Removes a slot. Removing a missing slot is not an error.
    fn remove_item(&self, name: &str) -> Result<(), StoreError>;
}

/// Error type produced by [`DurableStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The stored payload could not be encoded or decoded.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Human-readable error payload.
        message: String,
    },
    /// The storage backend refused the operation.
    #[error("Backend failure: {message}")]
    Backend {
        /// Human-readable error payload.
        message: String,
    },
}

impl StoreError {
    pub(crate) fn backend(message: impl Into<String>) -> Self {
        StoreError::Backend {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::backend("quota exceeded");
        assert_eq!(err.to_string(), "Backend failure: quota exceeded");

        let err = StoreError::Serialization {
            message: "expected array".to_string(),
        };
        assert_eq!(err.to_string(), "Serialization error: expected array");
    }
}
