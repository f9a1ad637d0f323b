// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Output channel routing.
//!
//! A completed result payload goes to exactly one backend, chosen by the
//! logical channel name fixed at orchestrator construction. `"disk"` routes
//! through `DiskStore`; `"azure_blob"` routes through the remote backend
//! contract. Any other name is a fatal configuration error - this is the one
//! place routing halts instead of degrading.

use std::path::Path;
use std::sync::Arc;

use crate::channel::remote::RemoteStore;
use crate::config::consts::{CHANNEL_AZURE_BLOB, CHANNEL_DISK};
use crate::errors::OrchestrationError;
use crate::observability::messages::orchestrator::ChannelRejected;
use crate::observability::messages::StructuredLog;
use crate::store::{Artifact, DiskStore};

/// Resolves a logical channel name to the backend that receives a write.
pub struct ChannelRouter {
    channel: String,
    store: DiskStore,
    remote: Arc<dyn RemoteStore>,
}

impl ChannelRouter {
    pub fn new(channel: impl Into<String>, store: DiskStore, remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            channel: channel.into(),
            store,
            remote,
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Send an artifact to the configured backend.
    ///
    /// Returns the backend's success flag for recognized channels. An
    /// unrecognized channel name is reported and returned as
    /// `OrchestrationError::UnknownChannel`.
    pub async fn route(
        &self,
        artifact: &Artifact,
        destination: &Path,
    ) -> Result<bool, OrchestrationError> {
        match self.channel.as_str() {
            CHANNEL_DISK => Ok(self.store.write(artifact, destination, false)),
            CHANNEL_AZURE_BLOB => {
                let (key, name) = split_destination(destination);
                Ok(self.remote.write(artifact, &key, &name).await)
            }
            other => {
                ChannelRejected { channel: other }.log();
                Err(OrchestrationError::UnknownChannel(other.to_string()))
            }
        }
    }
}

/// Split a destination path into (container-relative key, file name).
fn split_destination(destination: &Path) -> (String, String) {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let key = destination
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    (key, name)
}
