use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Object, Provenance};

/// Placeholder returned instead of decrypted secure-setting values on read
/// paths that must not expose secrets.
pub const REDACTED_VALUE: &str = "[REDACTED]";

/// Caller-supplied uids are capped to keep them indexable.
const MAX_UID_LENGTH: usize = 40;

/// The API-facing view of one notification integration. Unlike the stored
/// [`Integration`](super::Integration), a contact point carries its
/// provenance tag, and its `secure_settings` hold plain-text (or redacted)
/// values rather than ciphertext.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContactPoint {
    /// # Unique identifier, generated when left empty on creation.
    #[serde(default)]
    pub uid: String,
    /// # Name of the contact point, naming its receiver group.
    pub name: String,
    /// # The notification mechanism, e.g. "slack" or "email".
    #[serde(rename = "type")]
    pub kind: String,
    /// # Mechanism-specific configuration.
    #[serde(default)]
    pub settings: Object,
    /// # Secret configuration values, redacted on listing.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub secure_settings: BTreeMap<String, String>,
    /// # Suppress the resolved notification for this contact point.
    #[serde(default)]
    pub disable_resolve_message: bool,
    /// # Write authority which currently owns this contact point.
    #[serde(default)]
    pub provenance: Provenance,
}

impl ContactPoint {
    /// Validate the contact point as a candidate for persistence.
    /// Kind-specific settings payloads are validated elsewhere; this covers
    /// the structural requirements every contact point must meet.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("contact point name is required");
        }
        if self.kind.trim().is_empty() {
            anyhow::bail!("contact point type is required");
        }
        if self.settings.is_empty() {
            anyhow::bail!("contact point settings must not be empty");
        }
        if !self.uid.is_empty() {
            validate_uid(&self.uid)?;
        }
        Ok(())
    }
}

/// Uids may be caller-supplied, so bound their length and charset.
fn validate_uid(uid: &str) -> anyhow::Result<()> {
    if uid.len() > MAX_UID_LENGTH {
        anyhow::bail!("uid is longer than {MAX_UID_LENGTH} characters");
    }
    if !uid
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        anyhow::bail!("uid {uid:?} contains characters outside of [a-zA-Z0-9-_]");
    }
    Ok(())
}
