/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

mod rule;
pub use rule::PageViewRule;

mod reported;
pub use reported::{HostTraffic, PageViewEntry, ReportedStats, StatsSnapshot};

#[cfg(feature = "yaml")]
mod yaml;
