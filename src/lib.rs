// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod channel; // output channel routing
pub mod config; // run configs + validation
pub mod errors; // error handling
pub mod observability;
pub mod orchestrator; // per-segment execution
pub mod processes; // reference process implementations
pub mod registry; // process name -> capability lookup
pub mod store; // format-dispatching persistence
