/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::path::Path;

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use tunfwd_http_scan::HttpScanConfig;

use super::StreamForwardConfig;

impl StreamForwardConfig {
    pub fn set_by_yaml_kv(&mut self, k: &str, v: &Yaml) -> anyhow::Result<()> {
        match tunfwd_yaml::key::normalize(k).as_str() {
            "buffer_size" => {
                let size = tunfwd_yaml::humanize::as_usize(v)
                    .context(format!("invalid humanize usize value for key {k}"))?;
                self.set_buffer_size(size);
                Ok(())
            }
            "sibling_wait_timeout" => {
                if let Yaml::Null = v {
                    self.set_sibling_wait_timeout(None);
                } else {
                    let timeout = tunfwd_yaml::humanize::as_duration(v)
                        .context(format!("invalid humanize duration value for key {k}"))?;
                    self.set_sibling_wait_timeout(Some(timeout));
                }
                Ok(())
            }
            "force_close_wait" => {
                let wait = tunfwd_yaml::humanize::as_duration(v)
                    .context(format!("invalid humanize duration value for key {k}"))?;
                self.set_force_close_wait(wait);
                Ok(())
            }
            "http_scan" => {
                let config = HttpScanConfig::parse_yaml(v)
                    .context(format!("invalid http scan config value for key {k}"))?;
                self.set_http_scan(config);
                Ok(())
            }
            _ => Err(anyhow!("invalid key {k}")),
        }
    }

    pub fn parse_yaml(v: &Yaml) -> anyhow::Result<Self> {
        let mut config = StreamForwardConfig::default();
        match v {
            Yaml::Hash(map) => {
                tunfwd_yaml::foreach_kv(map, |k, v| config.set_by_yaml_kv(k, v))?;
            }
            Yaml::Null => {}
            _ => {
                return Err(anyhow!(
                    "yaml value type for stream forward config should be 'map'"
                ));
            }
        }
        Ok(config)
    }

    pub fn load_yaml_file(path: &Path) -> anyhow::Result<Self> {
        let doc = tunfwd_yaml::load_doc(path)?;
        StreamForwardConfig::parse_yaml(&doc)
            .context(format!("invalid stream forward config in file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tunfwd_yaml::yaml_doc;

    #[test]
    fn parse_ok() {
        let yaml = yaml_doc!(
            r#"
                buffer-size: 64KiB
                sibling_wait_timeout: 2m
                force_close_wait: 1s
                http_scan:
                  max_header_size: 8KiB
                  use_host_header: false
            "#
        );
        let config = StreamForwardConfig::parse_yaml(&yaml).unwrap();

        let mut expected = StreamForwardConfig::default();
        expected.set_buffer_size(65536);
        expected.set_sibling_wait_timeout(Some(Duration::from_secs(120)));
        expected.set_force_close_wait(Duration::from_secs(1));
        let mut http_scan = HttpScanConfig::default();
        http_scan.set_max_header_size(8192);
        http_scan.set_use_host_header(false);
        expected.set_http_scan(http_scan);
        assert_eq!(config, expected);
    }

    #[test]
    fn unbounded_sibling_wait() {
        let yaml = yaml_doc!("sibling_wait_timeout: ~");
        let config = StreamForwardConfig::parse_yaml(&yaml).unwrap();
        assert_eq!(config.sibling_wait_timeout(), None);
    }

    #[test]
    fn load_file() {
        let path = std::env::temp_dir().join(format!("tunfwd-{}.yaml", fastrand::u64(..)));
        std::fs::write(&path, "buffer_size: 8KiB\n").unwrap();
        let config = StreamForwardConfig::load_yaml_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.buffer_size(), 8192);

        assert!(StreamForwardConfig::load_yaml_file(&path).is_err());
    }

    #[test]
    fn parse_err() {
        let yaml = yaml_doc!(
            r#"
                buffer_size: -1
                sibling_wait_timeout: 5xs
                force_close_wait: [1]
                http_scan: 1
                unknown: 1
            "#
        );
        let mut config = StreamForwardConfig::default();
        for (k, v) in yaml.as_hash().unwrap().iter() {
            assert!(config.set_by_yaml_kv(k.as_str().unwrap(), v).is_err());
        }
    }
}
