/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;

use tunfwd_http_scan::HttpScanRole;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForwardDirection {
    ClientToTunnel,
    TunnelToClient,
}

impl ForwardDirection {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ForwardDirection::ClientToTunnel => "ClientToTunnel",
            ForwardDirection::TunnelToClient => "TunnelToClient",
        }
    }

    pub const fn scan_role(&self) -> HttpScanRole {
        match self {
            ForwardDirection::ClientToTunnel => HttpScanRole::Requester,
            ForwardDirection::TunnelToClient => HttpScanRole::Responder,
        }
    }

    /// The leader waits for its sibling and tears down the connection.
    pub const fn is_leader(&self) -> bool {
        matches!(self, ForwardDirection::TunnelToClient)
    }
}

impl fmt::Display for ForwardDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
