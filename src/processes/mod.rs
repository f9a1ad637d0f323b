// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Reference process implementations.
//!
//! Real process modules are external collaborators; these two exist so the
//! demo driver and the tests can exercise the registry and the retry seam
//! without any external wiring.

mod demand_forecast;
mod queue_submit;

pub use demand_forecast::DemandForecastProcess;
pub use queue_submit::QueueSubmitProcess;

use crate::registry::{Process, ProcessRegistry};
use serde_json::Value;

/// Registry with the reference processes registered under their identifiers:
/// `demand_forecast` and `run_queue`.
pub fn default_registry() -> ProcessRegistry {
    let mut registry = ProcessRegistry::new();
    registry.insert_fn("demand_forecast", |options: &Value| {
        Ok(Box::new(DemandForecastProcess::from_options(options)) as Box<dyn Process>)
    });
    registry.insert_fn("run_queue", |options: &Value| {
        Ok(Box::new(QueueSubmitProcess::from_options(options)) as Box<dyn Process>)
    });
    registry
}
