use std::collections::BTreeMap;

use futures::future::BoxFuture;
use models::{AlertingConfig, Provenance};

use crate::Error;

/// A snapshot of an organization's configuration document together with the
/// concurrency token captured at read time. The token is the storage
/// layer's hash of the exact persisted bytes; handing it back on save lets
/// the store reject lost updates.
#[derive(Debug, Clone)]
pub struct ConfigRevision {
    pub config: AlertingConfig,
    pub concurrency_token: String,
}

/// Reads and writes the monolithic alerting configuration blob.
#[async_trait::async_trait]
pub trait ConfigStore: Send + Sync {
    /// Fetch the organization's current configuration and its concurrency
    /// token.
    async fn get_latest_config(&self, org_id: u64) -> Result<ConfigRevision, Error>;

    /// Persist `config`, failing with [`Error::ConcurrencyConflict`] when
    /// the currently persisted configuration no longer hashes to
    /// `concurrency_token`.
    async fn save_config(
        &self,
        org_id: u64,
        config: &AlertingConfig,
        concurrency_token: &str,
    ) -> Result<(), Error>;
}

/// Reads and writes per-object provenance tags, keyed by organization and
/// object uid. An object without a tag is implicitly [`Provenance::None`].
#[async_trait::async_trait]
pub trait ProvenanceStore: Send + Sync {
    async fn get_provenance(&self, org_id: u64, uid: &str) -> Result<Provenance, Error>;

    async fn set_provenance(
        &self,
        org_id: u64,
        uid: &str,
        provenance: Provenance,
    ) -> Result<(), Error>;

    async fn delete_provenance(&self, org_id: u64, uid: &str) -> Result<(), Error>;
}

/// Value-wise encryption of secure settings. Keys pass through unchanged;
/// each value is individually encrypted or decrypted.
#[async_trait::async_trait]
pub trait SecretsService: Send + Sync {
    async fn encrypt(
        &self,
        values: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>, Error>;

    async fn decrypt(
        &self,
        values: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>, Error>;
}

/// The closure form accepted by [`TransactionManager::in_transaction`].
pub type TransactionFn<'a> = Box<dyn FnOnce() -> BoxFuture<'a, Result<(), Error>> + Send + 'a>;

/// Scopes a group of store writes so they commit or roll back together.
#[async_trait::async_trait]
pub trait TransactionManager: Send + Sync {
    /// Run `f` within one transaction scope. An error returned by `f` rolls
    /// back every write performed inside the scope and is propagated;
    /// otherwise the scope commits.
    async fn in_transaction<'a>(&'a self, f: TransactionFn<'a>) -> Result<(), Error>;
}
