// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::process::ExitCode;

use anyhow::{anyhow, Context};
use orcha::config::{load_and_validate_config, validate_against_registry};
use orcha::orchestrator::SegmentOrchestrator;
use orcha::processes::default_registry;
use orcha::store::DiskStore;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("orcha: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let config_file = args.get(1).ok_or_else(|| {
        anyhow!(
            "Usage: {} <run_config.yaml>\nExample: {} configs/segment-demo.yaml",
            args[0],
            args[0]
        )
    })?;

    let config = load_and_validate_config(config_file)
        .map_err(|e| anyhow!("{}", e))
        .with_context(|| format!("loading {}", config_file))?;

    let registry = default_registry();
    if let Err(errors) = validate_against_registry(&config, &registry) {
        let rendered: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        return Err(anyhow!("run config validation failed:\n{}", rendered.join("\n")));
    }

    let mut orchestrator =
        SegmentOrchestrator::new(config, registry).map_err(|e| anyhow!("{}", e))?;

    // The disk channel writes into the batch's base path; make sure it exists.
    let store = DiskStore::new();
    store.create_dir_recursive(orchestrator.context().base_path());

    orchestrator
        .run_segment()
        .await
        .context("segment run failed")?;

    println!(
        "Segment results written via '{}' to {}",
        orchestrator.context().channel(),
        orchestrator.results_destination().display()
    );
    Ok(())
}
