/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use super::HttpScanConfig;

impl HttpScanConfig {
    pub fn set_by_yaml_kv(&mut self, k: &str, v: &Yaml) -> anyhow::Result<()> {
        match tunfwd_yaml::key::normalize(k).as_str() {
            "max_header_size" => {
                let size = tunfwd_yaml::humanize::as_usize(v)
                    .context(format!("invalid humanize usize value for key {k}"))?;
                self.set_max_header_size(size);
                Ok(())
            }
            "use_host_header" => {
                let enable = tunfwd_yaml::value::as_bool(v)
                    .context(format!("invalid bool value for key {k}"))?;
                self.set_use_host_header(enable);
                Ok(())
            }
            _ => Err(anyhow!("invalid key {k}")),
        }
    }

    pub fn parse_yaml(v: &Yaml) -> anyhow::Result<Self> {
        let mut config = HttpScanConfig::default();
        match v {
            Yaml::Hash(map) => {
                tunfwd_yaml::foreach_kv(map, |k, v| config.set_by_yaml_kv(k, v))?;
            }
            Yaml::Null => {}
            _ => return Err(anyhow!("yaml value type for http scan config should be 'map'")),
        }
        Ok(config)
    }
}
