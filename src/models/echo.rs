//! JSON echo model: replies with the request body wrapped under `"input"`.
//!
//! Mainly useful for smoke and load testing. A numeric `"sleep"` key in the
//! request delays the reply by that many seconds, which makes latency
//! behavior easy to exercise from a client.

use std::thread;
use std::time::Duration;

use serde_json::{json, Value};
use tracing::debug;

use crate::model::{InferenceError, ModelImplementation};

#[derive(Debug, Clone, Default)]
pub struct EchoModel;

impl ModelImplementation for EchoModel {
    // Nothing to load: the echo model has no artifact.
    type Instance = ();
    type Input = Value;
    type Output = Value;

    fn name() -> &'static str {
        "echo"
    }

    fn load(&self) -> Result<(), InferenceError> {
        Ok(())
    }

    fn preprocess(&self, body: &[u8], _content_type: &str) -> Result<Value, InferenceError> {
        serde_json::from_slice(body).map_err(|e| InferenceError::UnprocessableInput(e.to_string()))
    }

    fn predict(&self, input: Value, _instance: &()) -> Result<Value, InferenceError> {
        if let Some(sleep) = input.get("sleep").filter(|v| !v.is_null()) {
            let secs = sleep
                .as_f64()
                .ok_or_else(|| InferenceError::Internal(format!("sleep must be a number, got {}", sleep)))?;
            let duration = Duration::try_from_secs_f64(secs)
                .map_err(|e| InferenceError::Internal(format!("invalid sleep value {}: {}", secs, e)))?;

            debug!("sleeping {:?} before replying", duration);
            thread::sleep(duration);
        }

        Ok(json!({ "input": input }))
    }

    fn postprocess(&self, output: Value, _response_content_type: &str) -> Result<Vec<u8>, InferenceError> {
        serde_json::to_vec(&output).map_err(|e| InferenceError::Internal(e.to_string()))
    }
}
