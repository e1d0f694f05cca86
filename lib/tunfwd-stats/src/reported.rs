/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::{Mutex, MutexGuard};

use ahash::AHashMap;
use log::debug;
use serde_json::{Value, json};

use tunfwd_io::TrafficStatsSink;

use crate::PageViewRule;

const OTHER_PAGE_VIEW: &str = "(OTHER)";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostTraffic {
    pub sent: u64,
    pub received: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageViewEntry {
    pub page: String,
    pub count: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub bytes_transferred: u64,
    /// Sorted by host.
    pub hosts: Vec<(String, HostTraffic)>,
    /// Sorted by page.
    pub page_views: Vec<PageViewEntry>,
}

impl StatsSnapshot {
    pub fn to_json(&self) -> Value {
        let page_views: Vec<Value> = self
            .page_views
            .iter()
            .map(|e| json!({"page": e.page, "count": e.count}))
            .collect();
        json!({
            "bytes_transferred": self.bytes_transferred,
            "page_views": page_views,
        })
    }
}

#[derive(Default)]
struct StatsInner {
    bytes_transferred: u64,
    hosts: AHashMap<String, HostTraffic>,
    page_views: AHashMap<String, u64>,
    page_view_rules: Vec<PageViewRule>,
}

/// Stats of all forwarded connections, until they are reported and cleared.
#[derive(Default)]
pub struct ReportedStats {
    inner: Mutex<StatsInner>,
}

impl ReportedStats {
    pub fn new() -> Self {
        ReportedStats::default()
    }

    /// Rules are tried in order, the first matched one is used.
    pub fn set_page_view_rules(&self, rules: Vec<PageViewRule>) {
        self.lock_inner().page_view_rules = rules;
    }

    pub fn upsert_page_view(&self, url: &str) {
        let mut inner = self.lock_inner();
        let entry = inner
            .page_view_rules
            .iter()
            .find_map(|rule| rule.apply(url))
            .unwrap_or_else(|| OTHER_PAGE_VIEW.to_string());
        if entry.is_empty() {
            return;
        }

        let count = inner.page_views.entry(entry).or_insert(0);
        *count += 1;
        debug!("upsert page view {url}: ({count})");
    }

    pub fn bytes_transferred(&self) -> u64 {
        self.lock_inner().bytes_transferred
    }

    /// Count of distinct page view entries.
    pub fn entry_count(&self) -> usize {
        self.lock_inner().page_views.len()
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let inner = self.lock_inner();
        let mut hosts: Vec<_> = inner
            .hosts
            .iter()
            .map(|(h, t)| (h.clone(), *t))
            .collect();
        hosts.sort_by(|a, b| a.0.cmp(&b.0));
        let mut page_views: Vec<_> = inner
            .page_views
            .iter()
            .map(|(page, count)| PageViewEntry {
                page: page.clone(),
                count: *count,
            })
            .collect();
        page_views.sort_by(|a, b| a.page.cmp(&b.page));
        StatsSnapshot {
            bytes_transferred: inner.bytes_transferred,
            hosts,
            page_views,
        }
    }

    #[inline]
    pub fn to_json(&self) -> Value {
        self.snapshot().to_json()
    }

    /// Reset all counters, the page view rules are kept.
    pub fn clear(&self) {
        let mut inner = self.lock_inner();
        inner.bytes_transferred = 0;
        inner.hosts.clear();
        inner.page_views.clear();
    }

    fn lock_inner(&self) -> MutexGuard<'_, StatsInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn add_host_bytes<F>(&self, host: &str, size: u64, update: F)
    where
        F: FnOnce(&mut HostTraffic),
    {
        let mut inner = self.lock_inner();
        inner.bytes_transferred = inner.bytes_transferred.saturating_add(size);
        match inner.hosts.get_mut(host) {
            Some(t) => update(t),
            None => {
                let mut t = HostTraffic::default();
                update(&mut t);
                inner.hosts.insert(host.to_string(), t);
            }
        }
    }
}

impl TrafficStatsSink for ReportedStats {
    fn add_bytes_sent(&self, host: &str, size: u64) {
        self.add_host_bytes(host, size, |t| t.sent = t.sent.saturating_add(size));
    }

    fn add_bytes_received(&self, host: &str, size: u64) {
        self.add_host_bytes(host, size, |t| {
            t.received = t.received.saturating_add(size)
        });
    }

    fn record_page_view(&self, url: &str) {
        self.upsert_page_view(url);
    }
}
