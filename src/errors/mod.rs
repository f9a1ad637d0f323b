// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod orchestration;
mod store;

pub use config::ValidationError;
pub use orchestration::OrchestrationError;
pub use store::StoreError;
