//! Provisioning of alertmanager contact points.
//!
//! An organization's alerting configuration is one mutable document: a
//! routing tree plus a list of named receiver groups, each bundling the
//! notification integrations which routes address by group name. The API
//! surface lets callers address a single integration by uid, so every
//! mutation must be stitched back into the grouped document without breaking
//! its invariants, and persisted under optimistic concurrency against the
//! configuration hash captured at read time.
//!
//! Storage, secret encryption, and transaction scoping are collaborator
//! traits defined in [`store`]; this crate owns only the reconciliation and
//! policy logic:
//!
//! - [`receivers::stitch_receiver`] re-partitions receiver groups after an
//!   integration changes, keeping each group internally consistent.
//! - [`provenance::check_provenance_transition`] enforces which write
//!   authority may overwrite an object.
//! - [`routes::receiver_in_use`] vetoes deletion of receiver groups still
//!   referenced by the routing tree.
//! - [`ContactPointService`] orchestrates the above against the stores.

pub mod contact_points;
pub mod error;
pub mod provenance;
pub mod receivers;
pub mod routes;
pub mod store;

#[cfg(test)]
pub mod test_util;

pub use contact_points::ContactPointService;
pub use error::Error;
pub use store::{
    ConfigRevision, ConfigStore, ProvenanceStore, SecretsService, TransactionManager,
};
