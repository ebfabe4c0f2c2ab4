//! Serializable model of an organization's alerting configuration.
//!
//! The configuration is a single mutable document: a routing tree of
//! [`Route`] nodes, plus a list of named [`Receiver`] groups holding the
//! notification [`Integration`]s which routes address by group name. The
//! document is read and written as one blob by the surrounding system; the
//! types here only describe its shape and the invariants that provisioning
//! code restores.

mod config;
mod contact_points;
mod provenance;
mod receivers;
mod routes;

pub use config::AlertingConfig;
pub use contact_points::{ContactPoint, REDACTED_VALUE};
pub use provenance::Provenance;
pub use receivers::{Integration, Receiver};
pub use routes::Route;

/// An opaque JSON settings document.
pub type Object = serde_json::Map<String, serde_json::Value>;
