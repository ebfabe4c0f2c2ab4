use models::Provenance;

/// Errors surfaced by the provisioning core. Failures are always returned
/// to the caller; the core performs no retries of its own, and a retry on
/// [`Error::ConcurrencyConflict`] is caller policy.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The contact point failed validation, either as submitted or after
    /// merging with its stored counterpart.
    #[error("invalid contact point: {0:#}")]
    Validation(anyhow::Error),

    /// A contact point with the caller-supplied uid already exists.
    #[error("contact point with uid {0:?} already exists")]
    AlreadyExists(String),

    /// The targeted contact point does not exist.
    #[error("contact point with uid {0:?} not found")]
    NotFound(String),

    /// The object is owned by a different write authority.
    #[error("cannot change provenance from '{stored}' to '{requested}'")]
    ProvenanceConflict {
        stored: Provenance,
        requested: Provenance,
    },

    /// The receiver group is referenced by the routing tree, which blocks
    /// deletion of its contact points.
    #[error("contact point {0:?} is currently referenced by the routing tree")]
    InUse(String),

    /// The configuration changed between read and write; the caller must
    /// retry from a fresh read.
    #[error("configuration was concurrently modified and the fetched configuration is stale")]
    ConcurrencyConflict,

    /// An opaque failure of a storage or encryption collaborator.
    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}
