/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

mod primary;
pub use primary::{as_bool, as_list, as_string};
