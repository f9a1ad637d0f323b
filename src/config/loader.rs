// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main configuration structure for one segment orchestration run.
///
/// This struct represents the complete configuration for a segment run,
/// including the segment identifiers, output channel selection, and all
/// process specs. It is typically loaded from a YAML configuration file.
///
/// # Fields
/// * `segment` - Ordered partition identifiers naming the unit of work
/// * `batch_id` - Batch identifier; a v4 UUID is generated when unset
/// * `channel` - Output channel name (optional, defaults to `"disk"`)
/// * `container` - Storage container identifier for remote channels,
///   supplied explicitly rather than read from the environment
/// * `processes` - Mapping from process identifier to its spec
///
/// # Example
/// ```yaml
/// segment: [region_na, electronics]
/// channel: disk
/// processes:
///   region_na:
///     process: demand_forecast
///     constructor_options:
///       horizon_weeks: 4
///     run_command: forecast
///     run_options:
///       observations: [104.0, 98.5, 101.25]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct OrchestratorConfig {
    pub segment: Vec<String>,
    #[serde(default)]
    pub batch_id: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub container: Option<String>,
    #[serde(default)]
    pub processes: RunConfig,
}

/// Configuration for a single process invocation.
///
/// # Fields
/// * `process` - Identifier resolved through the process registry
/// * `constructor_options` - Arbitrary configuration record handed to the factory
/// * `run_command` - Which of the process's run operations to invoke
/// * `run_options` - Arbitrary configuration record handed to the run operation
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessSpec {
    pub process: String,
    #[serde(default)]
    pub constructor_options: Value,
    pub run_command: String,
    #[serde(default)]
    pub run_options: Value,
}

/// Newtype wrapper for the per-run process spec mapping providing type safety
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunConfig(pub HashMap<String, ProcessSpec>);

impl RunConfig {
    /// Create a new empty run config
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Insert a process spec under an identifier
    pub fn insert(&mut self, id: impl Into<String>, spec: ProcessSpec) {
        self.0.insert(id.into(), spec);
    }

    /// Get a process spec by identifier
    pub fn get(&self, id: &str) -> Option<&ProcessSpec> {
        self.0.get(id)
    }

    /// Check if an identifier has a spec
    pub fn contains_key(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    /// Get all configured identifiers
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// The specs that apply to a segment, in segment-list order.
    pub fn select_segment<'a>(
        &'a self,
        segment: &'a [String],
    ) -> impl Iterator<Item = &'a ProcessSpec> {
        segment.iter().filter_map(|id| self.0.get(id))
    }
}

impl From<HashMap<String, ProcessSpec>> for RunConfig {
    fn from(map: HashMap<String, ProcessSpec>) -> Self {
        Self(map)
    }
}

/// Load a run config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<OrchestratorConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let cfg: OrchestratorConfig = serde_yaml::from_str(&content)?;
    Ok(cfg)
}

/// Load and validate a run config from a YAML file
///
/// This function loads the configuration and validates its structure: the
/// segment list must be non-empty and every process spec must carry a run
/// command. Registry membership is checked separately, once a registry
/// exists (`validate_against_registry`).
pub fn load_and_validate_config<P: AsRef<Path>>(
    path: P,
) -> Result<OrchestratorConfig, Box<dyn std::error::Error>> {
    let cfg = load_config(path)?;

    if let Err(validation_errors) = crate::config::validate_config(&cfg) {
        let error_messages: Vec<String> = validation_errors.iter().map(|e| e.to_string()).collect();
        let combined_error = format!(
            "Configuration validation failed:\n{}",
            error_messages.join("\n")
        );
        return Err(combined_error.into());
    }

    Ok(cfg)
}
