/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

/// The tunnel side of a forwarded connection.
pub trait TunnelChannel: Send + Sync {
    /// Close the channel and release its resources.
    ///
    /// The peer is told about the close if `notify_peer` is set.
    fn close_channel(&self, reason: &str, notify_peer: bool);
}

/// Make sure the channel of a forwarder pair is closed only once.
pub(crate) struct ChannelCloser {
    channel: Arc<dyn TunnelChannel>,
    closed: AtomicBool,
}

impl ChannelCloser {
    pub(crate) fn new(channel: Arc<dyn TunnelChannel>) -> Self {
        ChannelCloser {
            channel,
            closed: AtomicBool::new(false),
        }
    }

    /// Return false if the channel has already been closed.
    pub(crate) fn close(&self, reason: &str, notify_peer: bool) -> bool {
        if self.closed.swap(true, Ordering::AcqRel) {
            debug!("channel already closed, skip close: {reason}");
            return false;
        }
        debug!("closing channel: {reason}");
        self.channel.close_channel(reason, notify_peer);
        true
    }

    #[inline]
    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}
