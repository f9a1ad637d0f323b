// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Run configuration validation.
//!
//! Structural checks run at load time; registry membership checks run once a
//! registry exists, before an orchestrator is constructed. Both accumulate
//! every problem found rather than stopping at the first.

use crate::config::OrchestratorConfig;
use crate::errors::ValidationError;
use crate::registry::ProcessRegistry;

/// Validate a run config's structure.
///
/// Checks that the segment list is non-empty and that every process spec
/// carries a run command.
pub fn validate_config(cfg: &OrchestratorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if cfg.segment.is_empty() {
        errors.push(ValidationError::EmptySegment);
    }

    for (id, spec) in &cfg.processes.0 {
        if spec.run_command.is_empty() {
            errors.push(ValidationError::MissingRunCommand {
                process_id: id.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate that every configured process resolves through the registry.
pub fn validate_against_registry(
    cfg: &OrchestratorConfig,
    registry: &ProcessRegistry,
) -> Result<(), Vec<ValidationError>> {
    let mut errors: Vec<ValidationError> = cfg
        .processes
        .0
        .values()
        .filter(|spec| !registry.contains_key(&spec.process))
        .map(|spec| ValidationError::UnknownProcessReference {
            process_id: spec.process.clone(),
        })
        .collect();

    // Deterministic report order for accumulated errors
    errors.sort_by(|a, b| format!("{:?}", a).cmp(&format!("{:?}", b)));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProcessSpec, RunConfig};
    use crate::errors::OrchestrationError;
    use crate::registry::Process;
    use serde_json::Value;

    fn config(segment: Vec<&str>, processes: Vec<(&str, &str, &str)>) -> OrchestratorConfig {
        let mut run_config = RunConfig::new();
        for (id, process, command) in processes {
            run_config.insert(
                id,
                ProcessSpec {
                    process: process.to_string(),
                    constructor_options: Value::Null,
                    run_command: command.to_string(),
                    run_options: Value::Null,
                },
            );
        }
        OrchestratorConfig {
            segment: segment.into_iter().map(String::from).collect(),
            batch_id: None,
            channel: None,
            container: None,
            processes: run_config,
        }
    }

    struct Inert;

    #[async_trait::async_trait]
    impl Process for Inert {
        async fn run(&self, _: &str, _: &Value) -> Result<Value, OrchestrationError> {
            Ok(Value::Null)
        }

        fn name(&self) -> &'static str {
            "inert"
        }
    }

    fn registry_with(ids: &[&str]) -> ProcessRegistry {
        let mut registry = ProcessRegistry::new();
        for id in ids {
            registry.insert_fn(*id, |_: &Value| Ok(Box::new(Inert) as Box<dyn Process>));
        }
        registry
    }

    #[test]
    fn empty_segment_is_rejected() {
        let errors = validate_config(&config(vec![], vec![])).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptySegment]);
    }

    #[test]
    fn missing_run_command_is_rejected() {
        let cfg = config(vec!["a"], vec![("a", "p", "")]);
        let errors = validate_config(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::MissingRunCommand {
                process_id: "a".to_string()
            }]
        );
    }

    #[test]
    fn well_formed_config_passes() {
        let cfg = config(vec!["a"], vec![("a", "p", "go")]);
        assert!(validate_config(&cfg).is_ok());
    }

    #[test]
    fn unregistered_process_is_reported() {
        let cfg = config(vec!["a", "b"], vec![("a", "known", "go"), ("b", "ghost", "go")]);
        let registry = registry_with(&["known"]);

        let errors = validate_against_registry(&cfg, &registry).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::UnknownProcessReference {
                process_id: "ghost".to_string()
            }]
        );
    }

    #[test]
    fn fully_registered_config_passes() {
        let cfg = config(vec!["a"], vec![("a", "known", "go")]);
        let registry = registry_with(&["known"]);
        assert!(validate_against_registry(&cfg, &registry).is_ok());
    }
}
