/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

const DEFAULT_MAX_HEADER_SIZE: usize = 16384;
const MINIMAL_MAX_HEADER_SIZE: usize = 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpScanConfig {
    max_header_size: usize,
    use_host_header: bool,
}

impl Default for HttpScanConfig {
    fn default() -> Self {
        HttpScanConfig {
            max_header_size: DEFAULT_MAX_HEADER_SIZE,
            use_host_header: true,
        }
    }
}

impl HttpScanConfig {
    pub fn set_max_header_size(&mut self, size: usize) {
        self.max_header_size = size.max(MINIMAL_MAX_HEADER_SIZE);
    }

    /// Max size of buffered data while searching for the end of a header
    /// block, the connection is considered as not HTTP if exceeded.
    #[inline]
    pub fn max_header_size(&self) -> usize {
        self.max_header_size
    }

    pub fn set_use_host_header(&mut self, enable: bool) {
        self.use_host_header = enable;
    }

    /// Use the request `Host` header rather than the connection destination
    /// as the host of pending requests.
    #[inline]
    pub fn use_host_header(&self) -> bool {
        self.use_host_header
    }
}
