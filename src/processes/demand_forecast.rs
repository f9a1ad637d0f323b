// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::errors::OrchestrationError;
use crate::registry::Process;

/// Demand forecast process - projects a flat moving-average forecast.
///
/// Supported run commands:
/// * `forecast` - options: `{ observations: [f64] }`; returns summary
///   statistics plus a `horizon_weeks`-long projection of the mean.
pub struct DemandForecastProcess {
    horizon_weeks: usize,
}

impl DemandForecastProcess {
    pub fn new(horizon_weeks: usize) -> Self {
        Self { horizon_weeks }
    }

    pub fn from_options(options: &Value) -> Self {
        let horizon_weeks = options
            .get("horizon_weeks")
            .and_then(Value::as_u64)
            .unwrap_or(4) as usize;
        Self::new(horizon_weeks)
    }

    fn forecast(&self, options: &Value) -> Result<Value, OrchestrationError> {
        let observations: Vec<f64> = options
            .get("observations")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().filter_map(Value::as_f64).collect())
            .unwrap_or_default();

        if observations.is_empty() {
            return Err(OrchestrationError::ProcessFailed {
                process: self.name().to_string(),
                reason: "no observations provided".to_string(),
            });
        }

        let mean = observations.iter().sum::<f64>() / observations.len() as f64;
        let min = observations.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = observations
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);

        Ok(json!({
            "observations": observations.len(),
            "mean": mean,
            "min": min,
            "max": max,
            "horizon_weeks": self.horizon_weeks,
            "forecast": vec![mean; self.horizon_weeks],
        }))
    }
}

#[async_trait]
impl Process for DemandForecastProcess {
    async fn run(&self, command: &str, options: &Value) -> Result<Value, OrchestrationError> {
        match command {
            "forecast" => self.forecast(options),
            other => Err(OrchestrationError::UnknownRunCommand {
                process: self.name().to_string(),
                command: other.to_string(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "demand_forecast"
    }
}
