use rayon::prelude::*;
use serde_derive::{Deserialize, Serialize};

use super::combinators::Inputs;
use super::registry::Registry;
use crate::error::Result;

/// One prediction to compute: an observable name and its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub name: String,
    pub args: Vec<f64>,
}

impl Request {
    pub fn new(name: impl Into<String>, args: impl Into<Vec<f64>>) -> Self {
        Self {
            name: name.into(),
            args: args.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    pub request: Request,
    pub value: Result<f64>,
}

/// Evaluates all requests in parallel, one task per request.
///
/// Results come back in request order. A failing request only affects its own result.
pub fn evaluate_batch(
    registry: &Registry,
    inputs: &Inputs<'_>,
    requests: &[Request],
) -> Vec<BatchResult> {
    let results: Vec<BatchResult> = requests
        .par_iter()
        .map(|request| {
            let value = registry.predict(&request.name, inputs, &request.args);
            if let Err(err) = &value {
                log::warn!("{}{:?} failed: {err}", request.name, request.args);
            }
            BatchResult {
                request: request.clone(),
                value,
            }
        })
        .collect();

    log::debug!(
        "evaluated {} predictions, {} failed",
        results.len(),
        results.iter().filter(|r| r.value.is_err()).count()
    );
    results
}
