/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

pub mod parse;

mod buffer;
pub use buffer::{ScanBuffer, ScanBufferError};

mod config;
pub use config::HttpScanConfig;

mod tracker;
pub use tracker::{PendingRequest, PendingRequestTracker};

mod scanner;
pub use scanner::{
    HttpMessageScanner, HttpResponseSummary, HttpScanAbandon, HttpScanError, HttpScanEvent,
    HttpScanRole,
};

#[cfg(feature = "yaml")]
mod yaml;
