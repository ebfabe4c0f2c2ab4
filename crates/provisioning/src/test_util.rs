//! In-memory fakes of the storage collaborators, for exercising the
//! contact-point service without a real backend.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use models::{AlertingConfig, Integration, Provenance};

use crate::store::{
    ConfigRevision, ConfigStore, ProvenanceStore, SecretsService, TransactionFn,
    TransactionManager,
};
use crate::{ContactPointService, Error};

/// A contact-point service wired to fakes, plus handles onto those fakes
/// for observing what was persisted.
pub struct TestService {
    pub service: ContactPointService,
    pub config_store: Arc<FakeConfigStore>,
    pub provenance_store: Arc<FakeProvenanceStore>,
}

/// Build a service over a freshly seeded configuration: a routing tree
/// addressing an "email receiver" group with a single member.
pub fn test_service() -> TestService {
    let config_store = Arc::new(FakeConfigStore::new(seed_config()));
    let provenance_store = Arc::new(FakeProvenanceStore::default());

    let service = ContactPointService::new(
        config_store.clone(),
        provenance_store.clone(),
        Arc::new(FakeSecrets),
        Arc::new(NoopTransactionManager),
    );
    TestService {
        service,
        config_store,
        provenance_store,
    }
}

fn seed_config() -> AlertingConfig {
    serde_json::from_value(serde_json::json!({
        "route": {"receiver": "email receiver"},
        "receivers": [
            {
                "name": "email receiver",
                "integrations": [
                    {
                        "uid": "default-email",
                        "name": "email receiver",
                        "type": "email",
                        "settings": {"addresses": "<example@email.com>"},
                    },
                ],
            },
        ],
    }))
    .unwrap()
}

/// Holds one configuration per organization, lazily seeded, and hands out
/// counter-based concurrency tokens. The token passed to the most recent
/// save is kept for interception by tests.
pub struct FakeConfigStore {
    seed: AlertingConfig,
    state: Mutex<FakeConfigState>,
}

#[derive(Default)]
struct FakeConfigState {
    configs: HashMap<u64, (AlertingConfig, String)>,
    save_count: u64,
    last_save_token: Option<String>,
}

impl FakeConfigStore {
    pub fn new(seed: AlertingConfig) -> Self {
        Self {
            seed,
            state: Mutex::new(FakeConfigState::default()),
        }
    }

    pub fn save_count(&self) -> u64 {
        self.state.lock().unwrap().save_count
    }

    pub fn last_save_token(&self) -> Option<String> {
        self.state.lock().unwrap().last_save_token.clone()
    }

    /// The concurrency token a fresh read of org 1 would capture.
    pub fn current_token(&self) -> String {
        let mut state = self.state.lock().unwrap();
        let seed = &self.seed;
        let (_, token) = state
            .configs
            .entry(1)
            .or_insert_with(|| (seed.clone(), "token-0".to_string()));
        token.clone()
    }

    /// The stored integration `uid`, as persisted (secure settings still
    /// encrypted).
    pub fn integration(&self, org_id: u64, uid: &str) -> Integration {
        let state = self.state.lock().unwrap();
        let (config, _) = state
            .configs
            .get(&org_id)
            .expect("organization has no stored configuration");
        config
            .receivers
            .iter()
            .flat_map(|receiver| &receiver.integrations)
            .find(|integration| integration.uid == uid)
            .unwrap_or_else(|| panic!("no stored integration with uid {uid:?}"))
            .clone()
    }
}

#[async_trait::async_trait]
impl ConfigStore for FakeConfigStore {
    async fn get_latest_config(&self, org_id: u64) -> Result<ConfigRevision, Error> {
        let mut state = self.state.lock().unwrap();
        let seed = &self.seed;
        let (config, token) = state
            .configs
            .entry(org_id)
            .or_insert_with(|| (seed.clone(), "token-0".to_string()));
        Ok(ConfigRevision {
            config: config.clone(),
            concurrency_token: token.clone(),
        })
    }

    async fn save_config(
        &self,
        org_id: u64,
        config: &AlertingConfig,
        concurrency_token: &str,
    ) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        let seed = &self.seed;
        let current = state
            .configs
            .entry(org_id)
            .or_insert_with(|| (seed.clone(), "token-0".to_string()));
        if current.1 != concurrency_token {
            return Err(Error::ConcurrencyConflict);
        }
        current.0 = config.clone();

        state.save_count += 1;
        let next_token = format!("token-{}", state.save_count);
        state.configs.get_mut(&org_id).unwrap().1 = next_token;
        state.last_save_token = Some(concurrency_token.to_string());
        Ok(())
    }
}

/// Provenance tags in a map keyed by organization and uid.
#[derive(Default)]
pub struct FakeProvenanceStore {
    tags: Mutex<HashMap<(u64, String), Provenance>>,
}

impl FakeProvenanceStore {
    /// The raw stored tag, without the implicit `None` default.
    pub fn get(&self, org_id: u64, uid: &str) -> Option<Provenance> {
        self.tags
            .lock()
            .unwrap()
            .get(&(org_id, uid.to_string()))
            .copied()
    }
}

#[async_trait::async_trait]
impl ProvenanceStore for FakeProvenanceStore {
    async fn get_provenance(&self, org_id: u64, uid: &str) -> Result<Provenance, Error> {
        Ok(self.get(org_id, uid).unwrap_or_default())
    }

    async fn set_provenance(
        &self,
        org_id: u64,
        uid: &str,
        provenance: Provenance,
    ) -> Result<(), Error> {
        self.tags
            .lock()
            .unwrap()
            .insert((org_id, uid.to_string()), provenance);
        Ok(())
    }

    async fn delete_provenance(&self, org_id: u64, uid: &str) -> Result<(), Error> {
        self.tags.lock().unwrap().remove(&(org_id, uid.to_string()));
        Ok(())
    }
}

/// Reversible stand-in encryption: values are base64-wrapped behind a
/// `vault:` prefix, so tests can assert both that ciphertext was stored and
/// what it decrypts back to.
pub struct FakeSecrets;

/// Decrypt a single fake-encrypted value.
pub fn decrypted(value: &str) -> String {
    let encoded = value
        .strip_prefix("vault:")
        .expect("value is not fake ciphertext");
    String::from_utf8(base64::decode_config(encoded, base64::URL_SAFE_NO_PAD).unwrap()).unwrap()
}

#[async_trait::async_trait]
impl SecretsService for FakeSecrets {
    async fn encrypt(
        &self,
        values: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>, Error> {
        Ok(values
            .iter()
            .map(|(key, value)| {
                let encoded = base64::encode_config(value, base64::URL_SAFE_NO_PAD);
                (key.clone(), format!("vault:{encoded}"))
            })
            .collect())
    }

    async fn decrypt(
        &self,
        values: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>, Error> {
        values
            .iter()
            .map(|(key, value)| {
                let encoded = value.strip_prefix("vault:").ok_or_else(|| {
                    Error::Storage(anyhow::anyhow!("value of {key:?} is not ciphertext"))
                })?;
                let decoded = base64::decode_config(encoded, base64::URL_SAFE_NO_PAD)
                    .map_err(|err| Error::Storage(err.into()))?;
                let value = String::from_utf8(decoded)
                    .map_err(|err| Error::Storage(err.into()))?;
                Ok((key.clone(), value))
            })
            .collect()
    }
}

/// Runs the scoped writes directly, with no rollback on error. Sufficient
/// for tests, which assert on failures before any write happens.
pub struct NoopTransactionManager;

#[async_trait::async_trait]
impl TransactionManager for NoopTransactionManager {
    async fn in_transaction<'a>(&'a self, f: TransactionFn<'a>) -> Result<(), Error> {
        f().await
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_stale_token_is_rejected() {
        let store = FakeConfigStore::new(seed_config());
        let revision = store.get_latest_config(1).await.unwrap();

        store
            .save_config(1, &revision.config, &revision.concurrency_token)
            .await
            .unwrap();

        // A second writer holding the token of the earlier read loses.
        let err = store
            .save_config(1, &revision.config, &revision.concurrency_token)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConcurrencyConflict));
    }

    #[tokio::test]
    async fn test_fake_secrets_round_trip() {
        let secrets = FakeSecrets;
        let plain: BTreeMap<String, String> =
            [("token".to_string(), "value_token".to_string())].into();

        let encrypted = secrets.encrypt(&plain).await.unwrap();
        assert_ne!(encrypted["token"], plain["token"]);
        assert_eq!(secrets.decrypt(&encrypted).await.unwrap(), plain);
    }
}
