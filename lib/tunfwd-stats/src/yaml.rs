/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use crate::{PageViewRule, ReportedStats};

impl PageViewRule {
    pub fn parse_yaml(v: &Yaml) -> anyhow::Result<Self> {
        let Yaml::Hash(map) = v else {
            return Err(anyhow!("yaml value type for page view rule should be 'map'"));
        };
        let regex = tunfwd_yaml::hash_get_required(map, "regex")?;
        let regex = tunfwd_yaml::value::as_string(regex)
            .context("invalid string value for key regex")?;
        let replace = match map.get(&Yaml::String("replace".to_string())) {
            Some(v) => {
                tunfwd_yaml::value::as_string(v).context("invalid string value for key replace")?
            }
            None => String::new(),
        };
        PageViewRule::new(&regex, &replace).map_err(|e| anyhow!("invalid regex {regex}: {e}"))
    }
}

impl ReportedStats {
    pub fn set_by_yaml_kv(&self, k: &str, v: &Yaml) -> anyhow::Result<()> {
        match tunfwd_yaml::key::normalize(k).as_str() {
            "page_view_regexes" | "page_view_rules" => {
                let rules = tunfwd_yaml::value::as_list(v, PageViewRule::parse_yaml)
                    .context(format!("invalid page view rule list value for key {k}"))?;
                self.set_page_view_rules(rules);
                Ok(())
            }
            _ => Err(anyhow!("invalid key {k}")),
        }
    }

    pub fn load_yaml(&self, v: &Yaml) -> anyhow::Result<()> {
        match v {
            Yaml::Hash(map) => tunfwd_yaml::foreach_kv(map, |k, v| self.set_by_yaml_kv(k, v)),
            Yaml::Null => Ok(()),
            _ => Err(anyhow!("yaml value type for stats config should be 'map'")),
        }
    }
}
