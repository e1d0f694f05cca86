/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

mod channel;
use channel::ChannelCloser;
pub use channel::TunnelChannel;

mod socket;
pub use socket::ClientSocket;

mod stats;
pub use stats::TrafficStatsSink;

mod direction;
pub use direction::ForwardDirection;

mod config;
pub use config::StreamForwardConfig;

mod forwarder;
pub use forwarder::{ForwardSummary, StreamForwardError, StreamForwarder};

mod pair;
pub use pair::{ForwarderPair, PairSummary};

mod log;

#[cfg(feature = "yaml")]
mod yaml;
