// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Remote storage backend seam.
//!
//! The concrete remote backend (a cloud blob store) is an external
//! collaborator; the core only needs this write/read/delete contract. The
//! stub implementation stands in wherever no real backend is wired up.

use crate::store::Artifact;
use async_trait::async_trait;

/// Contract a remote storage backend must satisfy.
///
/// `key` is the container-relative path; `name` is the file name under it.
/// Like the disk store, implementations collapse faults to booleans.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn write(&self, artifact: &Artifact, key: &str, name: &str) -> bool;

    async fn read(&self, key: &str, name: &str) -> Option<Artifact>;

    async fn delete(&self, key: &str, name: &str) -> bool;
}

/// A stub remote backend for testing and placeholder purposes.
///
/// Accepts every write, holds nothing, returns nothing.
pub struct StubRemoteStore {
    pub container: String,
}

impl StubRemoteStore {
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
        }
    }
}

#[async_trait]
impl RemoteStore for StubRemoteStore {
    async fn write(&self, _artifact: &Artifact, key: &str, name: &str) -> bool {
        tracing::info!(
            container = %self.container,
            key,
            name,
            "stub remote store accepted write"
        );
        true
    }

    async fn read(&self, key: &str, name: &str) -> Option<Artifact> {
        tracing::info!(
            container = %self.container,
            key,
            name,
            "stub remote store has nothing to read"
        );
        None
    }

    async fn delete(&self, key: &str, name: &str) -> bool {
        tracing::info!(
            container = %self.container,
            key,
            name,
            "stub remote store accepted delete"
        );
        true
    }
}
