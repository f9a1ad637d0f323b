// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;

/// Channel name routing results to the local disk store
pub const CHANNEL_DISK: &str = "disk";
/// Channel name routing results to the remote blob backend
pub const CHANNEL_AZURE_BLOB: &str = "azure_blob";
/// Channel used when the run config leaves the channel unset
pub const DEFAULT_CHANNEL: &str = CHANNEL_DISK;

/// Distinguished process identifier whose result carries failed queue
/// messages; the orchestrator hands that entry to the retry extension point
pub const QUEUE_PROCESS_ID: &str = "run_queue";

/// Suffix of the per-segment results artifact (joined segment ids + this)
pub const RESULTS_FILE_SUFFIX: &str = "_results.json";

/// Base output path for a batch's segment results.
pub fn segment_results_base(batch_id: &str) -> PathBuf {
    PathBuf::from(format!("forecast/{}/segment_results", batch_id))
}
