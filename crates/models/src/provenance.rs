use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Provenance records which write authority last owned an object, and is
/// used to keep write sources from clobbering each other's changes. It lives
/// in a side table keyed by object uid rather than on the object itself, and
/// an object without a tag is implicitly [`Provenance::None`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, JsonSchema)]
pub enum Provenance {
    /// The object is untagged and may be claimed by any write source.
    #[default]
    #[serde(rename = "")]
    None,
    /// The object was last written through the provisioning API.
    #[serde(rename = "api")]
    Api,
    /// The object was last written from provisioned configuration files.
    #[serde(rename = "file")]
    File,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::None => f.write_str("none"),
            Provenance::Api => f.write_str("api"),
            Provenance::File => f.write_str("file"),
        }
    }
}
