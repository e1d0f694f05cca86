/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

/// Receiver of the traffic stats of forwarded connections.
///
/// It is shared by all forwarders, so all methods may be called concurrently.
pub trait TrafficStatsSink: Send + Sync {
    /// Bytes sent from the client to the tunnel.
    fn add_bytes_sent(&self, host: &str, size: u64);
    /// Bytes received from the tunnel by the client.
    fn add_bytes_received(&self, host: &str, size: u64);
    fn record_page_view(&self, url: &str);
}
