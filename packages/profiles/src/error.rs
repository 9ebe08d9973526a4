use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by [`crate::ProfileStore`] mutations.
///
/// Every variant is soft: the in-memory change has already been applied and
/// published when the error is returned.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The change is live for this run but was not written to durable storage.
    #[error("family member {id} updated in memory only: {source}")]
    NotPersisted {
        id: String,
        #[source]
        source: StorageError,
    },
}

impl ProfileError {
    /// Id of the member the failed mutation touched.
    pub fn id(&self) -> &str {
        match self {
            Self::NotPersisted { id, .. } => id,
        }
    }
}
