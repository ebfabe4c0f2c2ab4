use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Receiver, Route};

/// The complete alerting configuration of one organization: the routing
/// tree plus every receiver group it can address.
///
/// The document is persisted as a single blob. Its storage layer computes a
/// hash of the persisted bytes which travels beside the document as an
/// optimistic-concurrency token; the hash is not part of the document
/// itself.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlertingConfig {
    /// # Root of the notification routing tree.
    pub route: Route,
    /// # Receiver groups addressable by routes.
    #[serde(default)]
    pub receivers: Vec<Receiver>,
}
