use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Object;

/// A notification integration as stored inside the configuration document:
/// one concrete channel (a Slack webhook, an email address, ...) addressed
/// by its uid.
///
/// `secure_settings` values are encrypted at rest and only decrypted on
/// read paths that explicitly require them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    /// # Unique identifier of the integration within the organization.
    pub uid: String,
    /// # Name of the integration, always equal to its receiver group's name.
    pub name: String,
    /// # The notification mechanism, e.g. "slack" or "email".
    #[serde(rename = "type")]
    pub kind: String,
    /// # Mechanism-specific configuration.
    #[serde(default)]
    pub settings: Object,
    /// # Secret configuration values, encrypted at rest.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub secure_settings: BTreeMap<String, String>,
    /// # Suppress the resolved notification for this integration.
    #[serde(default)]
    pub disable_resolve_message: bool,
}

/// A named bundle of integrations: the unit which routing rules reference.
///
/// Invariant: every member integration's `name` equals the group `name`.
/// Stored documents are known to sometimes violate this; mutations of a
/// group self-heal it rather than rejecting the document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Receiver {
    /// # Name of the receiver group, unique within the configuration.
    pub name: String,
    /// # Member integrations of this group.
    #[serde(default)]
    pub integrations: Vec<Integration>,
}
