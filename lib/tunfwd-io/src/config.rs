/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::time::Duration;

use tunfwd_http_scan::HttpScanConfig;

const DEFAULT_BUFFER_SIZE: usize = 16 * 1024; // 16KB
const MINIMAL_BUFFER_SIZE: usize = 4 * 1024; // 4KB
const DEFAULT_SIBLING_WAIT_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_FORCE_CLOSE_WAIT: Duration = Duration::from_secs(5);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamForwardConfig {
    buffer_size: usize,
    sibling_wait_timeout: Option<Duration>,
    force_close_wait: Duration,
    http_scan: HttpScanConfig,
}

impl Default for StreamForwardConfig {
    fn default() -> Self {
        StreamForwardConfig {
            buffer_size: DEFAULT_BUFFER_SIZE,
            sibling_wait_timeout: Some(DEFAULT_SIBLING_WAIT_TIMEOUT),
            force_close_wait: DEFAULT_FORCE_CLOSE_WAIT,
            http_scan: HttpScanConfig::default(),
        }
    }
}

impl StreamForwardConfig {
    pub fn set_buffer_size(&mut self, buffer_size: usize) {
        self.buffer_size = buffer_size.max(MINIMAL_BUFFER_SIZE);
    }

    #[inline]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Set to `None` to wait for the sibling forever.
    pub fn set_sibling_wait_timeout(&mut self, timeout: Option<Duration>) {
        self.sibling_wait_timeout = timeout;
    }

    #[inline]
    pub fn sibling_wait_timeout(&self) -> Option<Duration> {
        self.sibling_wait_timeout
    }

    pub fn set_force_close_wait(&mut self, wait: Duration) {
        self.force_close_wait = wait;
    }

    #[inline]
    pub fn force_close_wait(&self) -> Duration {
        self.force_close_wait
    }

    pub fn set_http_scan(&mut self, config: HttpScanConfig) {
        self.http_scan = config;
    }

    #[inline]
    pub fn http_scan(&self) -> &HttpScanConfig {
        &self.http_scan
    }
}
