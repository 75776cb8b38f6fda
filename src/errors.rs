use std::io;

use thiserror::Error;

/// Error type for configuration, validation, persistence, and collaborator failures.
#[derive(Debug, Error)]
pub enum PickError {
    /// No usable source collections or destination containers exist; a session
    /// cannot begin.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// A user input failed validation; blocks the confirm transition and
    /// nothing else.
    #[error("validation error: {0}")]
    Validation(String),
    /// The preference backend failed to read or write.
    #[error("preference store failure: {0}")]
    PrefStore(String),
    /// The Photo Store violated an expected invariant; the current commit
    /// attempt is aborted.
    #[error("photo store returned inconsistent state: {details}")]
    StoreInconsistent {
        /// What the collaborator did that was not expected.
        details: String,
    },
    /// IO failure from a file-backed preference store.
    #[error(transparent)]
    Io(#[from] io::Error),
}
