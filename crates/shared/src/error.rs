use thiserror::Error;

use crate::domain::ProductKey;

/// Client-local state-consistency failures while applying authority events.
///
/// None of these are recoverable mid-operation: the synchronizer surfaces the
/// error, skips the offending event, and leaves the registry untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyncError {
    #[error("no product '{}' with unit '{}' in the list", key.name, key.unit)]
    NotFound { key: ProductKey },
    #[error("unrecognized unit token '{0}'")]
    UnknownUnit(String),
    #[error("malformed event: {0}")]
    MalformedEvent(String),
}

impl SyncError {
    pub fn not_found(key: ProductKey) -> Self {
        SyncError::NotFound { key }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        SyncError::MalformedEvent(message.into())
    }
}
