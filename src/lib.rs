//! modelgate: publish prediction models as routable inference endpoints.
//!
//! A model implementation declares how to load itself and how to turn raw
//! request bytes into a prediction. The registry binds implementations into
//! pipelines, deploys them on a serving cluster, and the gateway server
//! routes `/{name}/{version}` traffic to whichever pipeline is bound there.

pub mod cli;
pub mod cluster;
pub mod config;
pub mod metrics;
pub mod model;
pub mod models;
pub mod server;
