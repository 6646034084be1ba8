//! The model execution core.
//!
//! A [`ModelImplementation`] supplies the four pluggable operations
//! (load / preprocess / predict / postprocess); a [`ModelPipeline`] wraps one
//! loaded instance of it behind the uniform request contract; a
//! [`ModelBinder`] resolves implementations by name and constructs ready
//! pipelines. Failures classify into the stable error envelope in [`error`].

pub mod binding;
pub mod contract;
pub mod error;
pub mod pipeline;

pub use binding::{BindError, ModelBinder};
pub use contract::{
    resolve_response_type, InferenceRequest, InferenceResponse, ModelIdentity, ModelImplementation,
};
pub use error::{ErrorBody, ErrorEnvelope, InferenceError};
pub use pipeline::{InferenceHandler, ModelPipeline};
