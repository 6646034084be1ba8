//! Endpoint lifecycle management over a serving cluster.
//!
//! An [`EndpointSpec`] declares one desired endpoint; the [`EndpointRegistry`]
//! turns a list of them into backend/endpoint record pairs on a
//! [`ServeCluster`]. Identifiers derive deterministically from the model
//! identity (`model.<name>_<version>` / `endpoint.<name>_<version>`), which
//! makes publish an overwrite and replace a delete-then-create of the same
//! keys. The in-process substrate is [`LocalCluster`].

pub mod endpoint;
pub mod local;
pub mod registry;
pub mod serve;

pub use endpoint::{backend_id, endpoint_id, model_id, route, EndpointSpec, HttpMethod};
pub use local::LocalCluster;
pub use registry::{EndpointRegistry, RegistryError};
pub use serve::{BackendRecord, ClusterError, EndpointRecord, ServeCluster};
