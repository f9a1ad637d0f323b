// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Output channel routing: logical channel name -> backend dispatch.

pub mod remote;
pub mod router;

pub use remote::{RemoteStore, StubRemoteStore};
pub use router::ChannelRouter;
