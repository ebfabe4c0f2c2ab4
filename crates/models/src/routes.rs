use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A node of the notification routing tree. Each route names the receiver
/// group which handles alerts matched at this point of the tree, and may
/// carry further child routes.
///
/// A route may reference a receiver name that no longer exists in the
/// configuration's receiver list. Such dangling references are detected by
/// callers, never repaired automatically.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// # Name of the receiver group handling alerts matched by this route.
    pub receiver: String,
    /// # Child routes, evaluated beneath this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<Route>,
}
