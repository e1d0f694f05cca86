/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingRequest {
    host: String,
    uri: String,
}

impl PendingRequest {
    pub fn new(host: impl Into<String>, uri: impl Into<String>) -> Self {
        PendingRequest {
            host: host.into(),
            uri: uri.into(),
        }
    }

    #[inline]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[inline]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The url used for page view accounting, or `None` if host or uri is
    /// missing.
    pub fn url(&self) -> Option<String> {
        if self.host.is_empty() || self.uri.is_empty() {
            return None;
        }
        let uri = self.uri.as_bytes();
        if starts_with_ignore_ascii_case(uri, b"http://")
            || starts_with_ignore_ascii_case(uri, b"https://")
        {
            Some(self.uri.clone())
        } else {
            Some(format!("http://{}{}", self.host, self.uri))
        }
    }
}

impl fmt::Display for PendingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.host, self.uri)
    }
}

fn starts_with_ignore_ascii_case(s: &[u8], prefix: &[u8]) -> bool {
    s.len() >= prefix.len() && s[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Requests which are still waiting for their response, shared by the two
/// directions of a forwarded connection.
///
/// Responses are expected in request order, so entries are popped in the
/// order they were pushed.
#[derive(Default)]
pub struct PendingRequestTracker {
    pending: Mutex<VecDeque<PendingRequest>>,
    abandoned: AtomicBool,
}

impl PendingRequestTracker {
    pub fn new() -> Self {
        PendingRequestTracker::default()
    }

    pub fn push(&self, req: PendingRequest) {
        let mut pending = self.lock_pending();
        if self.is_abandoned() {
            return;
        }
        pending.push_back(req);
    }

    pub fn pop(&self) -> Option<PendingRequest> {
        let mut pending = self.lock_pending();
        pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.lock_pending().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_pending().is_empty()
    }

    /// Mark the connection as not HTTP and drop all pending requests.
    ///
    /// Return true if this call did the transition.
    pub fn abandon(&self) -> bool {
        let mut pending = self.lock_pending();
        if self.abandoned.swap(true, Ordering::AcqRel) {
            return false;
        }
        pending.clear();
        true
    }

    #[inline]
    pub fn is_abandoned(&self) -> bool {
        self.abandoned.load(Ordering::Acquire)
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, VecDeque<PendingRequest>> {
        // the queue is still consistent if a holder panicked
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}
