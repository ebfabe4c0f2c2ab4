use std::collections::BTreeMap;
use std::sync::Arc;

use models::{
    AlertingConfig, ContactPoint, Integration, Provenance, Receiver, REDACTED_VALUE,
};

use crate::provenance::check_provenance_transition;
use crate::receivers::stitch_receiver;
use crate::routes::receiver_in_use;
use crate::store::{
    ConfigStore, ProvenanceStore, SecretsService, TransactionManager,
};
use crate::Error;

/// Orchestrates contact-point reads and mutations against an organization's
/// alerting configuration.
///
/// Every mutation follows the same shape: read the current configuration
/// (capturing its concurrency token), mutate the in-memory document, then
/// persist the document and the object's provenance tag within a single
/// transaction scope, passing the read-time token so the store rejects lost
/// updates.
pub struct ContactPointService {
    config_store: Arc<dyn ConfigStore>,
    provenance_store: Arc<dyn ProvenanceStore>,
    secrets: Arc<dyn SecretsService>,
    xact: Arc<dyn TransactionManager>,
}

/// The provenance-side write performed alongside a configuration save.
enum ProvenanceWrite {
    Set(String, Provenance),
    Delete(String),
}

impl ContactPointService {
    pub fn new(
        config_store: Arc<dyn ConfigStore>,
        provenance_store: Arc<dyn ProvenanceStore>,
        secrets: Arc<dyn SecretsService>,
        xact: Arc<dyn TransactionManager>,
    ) -> Self {
        Self {
            config_store,
            provenance_store,
            secrets,
            xact,
        }
    }

    /// List the organization's contact points, sorted by name, with
    /// provenance populated and secure-setting values redacted.
    #[tracing::instrument(skip(self))]
    pub async fn contact_points(&self, org_id: u64) -> Result<Vec<ContactPoint>, Error> {
        let revision = self.config_store.get_latest_config(org_id).await?;

        let mut contact_points = Vec::new();
        for receiver in &revision.config.receivers {
            for integration in &receiver.integrations {
                let provenance = self
                    .provenance_store
                    .get_provenance(org_id, &integration.uid)
                    .await?;
                let secure_settings = integration
                    .secure_settings
                    .keys()
                    .map(|key| (key.clone(), REDACTED_VALUE.to_string()))
                    .collect();

                contact_points.push(ContactPoint {
                    uid: integration.uid.clone(),
                    name: integration.name.clone(),
                    kind: integration.kind.clone(),
                    settings: integration.settings.clone(),
                    secure_settings,
                    disable_resolve_message: integration.disable_resolve_message,
                    provenance,
                });
            }
        }
        contact_points.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(contact_points)
    }

    /// Create a contact point, appending it to the receiver group matching
    /// its name and creating that group when absent. A uid is generated
    /// unless the caller supplied one; supplied uids must be unused.
    #[tracing::instrument(skip(self, contact_point), fields(name = %contact_point.name))]
    pub async fn create_contact_point(
        &self,
        org_id: u64,
        mut contact_point: ContactPoint,
        provenance: Provenance,
    ) -> Result<ContactPoint, Error> {
        contact_point.validate().map_err(Error::Validation)?;

        let revision = self.config_store.get_latest_config(org_id).await?;
        let mut config = revision.config;

        if contact_point.uid.is_empty() {
            contact_point.uid = uuid::Uuid::new_v4().simple().to_string();
        } else if config
            .receivers
            .iter()
            .flat_map(|receiver| &receiver.integrations)
            .any(|integration| integration.uid == contact_point.uid)
        {
            return Err(Error::AlreadyExists(contact_point.uid));
        }

        let secure_settings = self.secrets.encrypt(&contact_point.secure_settings).await?;
        let integration = Integration {
            uid: contact_point.uid.clone(),
            name: contact_point.name.clone(),
            kind: contact_point.kind.clone(),
            settings: contact_point.settings.clone(),
            secure_settings,
            disable_resolve_message: contact_point.disable_resolve_message,
        };

        match config
            .receivers
            .iter_mut()
            .find(|receiver| receiver.name == contact_point.name)
        {
            Some(receiver) => receiver.integrations.push(integration),
            None => config.receivers.push(Receiver {
                name: contact_point.name.clone(),
                integrations: vec![integration],
            }),
        }

        // A new object is untagged, so any authority may claim it. The
        // guard still runs to cover stale tags left by external writes.
        let stored = self
            .provenance_store
            .get_provenance(org_id, &contact_point.uid)
            .await?;
        check_provenance_transition(stored, provenance)?;

        self.persist(
            org_id,
            config,
            revision.concurrency_token,
            ProvenanceWrite::Set(contact_point.uid.clone(), provenance),
        )
        .await?;
        tracing::info!(org_id, uid = %contact_point.uid, "created contact point");

        contact_point.provenance = provenance;
        Ok(contact_point)
    }

    /// Update the contact point with `contact_point.uid`. Secure settings
    /// the caller did not re-send keep their stored values; everything else
    /// is taken from the caller as-is and re-validated.
    #[tracing::instrument(skip(self, contact_point), fields(uid = %contact_point.uid))]
    pub async fn update_contact_point(
        &self,
        org_id: u64,
        mut contact_point: ContactPoint,
        provenance: Provenance,
    ) -> Result<(), Error> {
        if contact_point.uid.is_empty() {
            return Err(Error::Validation(anyhow::anyhow!(
                "contact point uid is required for updates"
            )));
        }

        let existing = self
            .contact_point_decrypted(org_id, &contact_point.uid)
            .await?;
        contact_point.secure_settings =
            merge_secure_settings(contact_point.secure_settings, existing.secure_settings);

        contact_point.validate().map_err(Error::Validation)?;

        let stored = self
            .provenance_store
            .get_provenance(org_id, &contact_point.uid)
            .await?;
        check_provenance_transition(stored, provenance)?;

        let secure_settings = self.secrets.encrypt(&contact_point.secure_settings).await?;
        let integration = Integration {
            uid: contact_point.uid.clone(),
            name: contact_point.name.clone(),
            kind: contact_point.kind.clone(),
            settings: contact_point.settings.clone(),
            secure_settings,
            disable_resolve_message: contact_point.disable_resolve_message,
        };

        let revision = self.config_store.get_latest_config(org_id).await?;
        let mut config = revision.config;
        if !stitch_receiver(&mut config, &integration) {
            return Err(Error::NotFound(contact_point.uid));
        }

        self.persist(
            org_id,
            config,
            revision.concurrency_token,
            ProvenanceWrite::Set(contact_point.uid.clone(), provenance),
        )
        .await?;
        tracing::info!(org_id, uid = %contact_point.uid, "updated contact point");

        Ok(())
    }

    /// Delete the contact point with `uid`, removing its receiver group
    /// when it was the last member, along with its provenance tag.
    #[tracing::instrument(skip(self))]
    pub async fn delete_contact_point(&self, org_id: u64, uid: &str) -> Result<(), Error> {
        let revision = self.config_store.get_latest_config(org_id).await?;
        let mut config = revision.config;

        let located = config.receivers.iter().enumerate().find_map(|(g, group)| {
            group
                .integrations
                .iter()
                .position(|i| i.uid == uid)
                .map(|m| (g, m))
        });
        let Some((group_idx, member_idx)) = located else {
            return Err(Error::NotFound(uid.to_string()));
        };

        let receiver_name = config.receivers[group_idx].name.clone();
        if receiver_in_use(&receiver_name, &config.route) {
            return Err(Error::InUse(receiver_name));
        }

        config.receivers[group_idx].integrations.remove(member_idx);
        if config.receivers[group_idx].integrations.is_empty() {
            config.receivers.remove(group_idx);
        }

        self.persist(
            org_id,
            config,
            revision.concurrency_token,
            ProvenanceWrite::Delete(uid.to_string()),
        )
        .await?;
        tracing::info!(org_id, uid, "deleted contact point");

        Ok(())
    }

    /// Fetch a single contact point with decrypted secure settings. Used to
    /// merge an incoming update with stored secrets the caller cannot see.
    async fn contact_point_decrypted(
        &self,
        org_id: u64,
        uid: &str,
    ) -> Result<ContactPoint, Error> {
        let revision = self.config_store.get_latest_config(org_id).await?;
        for receiver in &revision.config.receivers {
            if let Some(integration) = receiver
                .integrations
                .iter()
                .find(|integration| integration.uid == uid)
            {
                let secure_settings = self.secrets.decrypt(&integration.secure_settings).await?;
                let provenance = self.provenance_store.get_provenance(org_id, uid).await?;

                return Ok(ContactPoint {
                    uid: integration.uid.clone(),
                    name: integration.name.clone(),
                    kind: integration.kind.clone(),
                    settings: integration.settings.clone(),
                    secure_settings,
                    disable_resolve_message: integration.disable_resolve_message,
                    provenance,
                });
            }
        }
        Err(Error::NotFound(uid.to_string()))
    }

    /// Persist the configuration under its read-time concurrency token and
    /// apply the provenance-side write, as one atomic scope.
    async fn persist(
        &self,
        org_id: u64,
        config: AlertingConfig,
        concurrency_token: String,
        write: ProvenanceWrite,
    ) -> Result<(), Error> {
        let config_store = self.config_store.clone();
        let provenance_store = self.provenance_store.clone();

        self.xact
            .in_transaction(Box::new(move || {
                Box::pin(async move {
                    config_store
                        .save_config(org_id, &config, &concurrency_token)
                        .await?;
                    match write {
                        ProvenanceWrite::Set(uid, provenance) => {
                            provenance_store
                                .set_provenance(org_id, &uid, provenance)
                                .await?
                        }
                        ProvenanceWrite::Delete(uid) => {
                            provenance_store.delete_provenance(org_id, &uid).await?
                        }
                    }
                    Ok(())
                })
            }))
            .await
    }
}

/// Merge secure settings of an update with those already stored: an
/// incoming key overwrites, an absent key retains the stored value, and an
/// incoming value equal to [`REDACTED_VALUE`] is treated as not re-sent
/// (callers listing contact points cannot see decrypted secrets to echo
/// them back).
fn merge_secure_settings(
    incoming: BTreeMap<String, String>,
    existing: BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut merged = existing;
    for (key, value) in incoming {
        if value == REDACTED_VALUE {
            continue;
        }
        merged.insert(key, value);
    }
    merged
}
