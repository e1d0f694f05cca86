/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fs;
use std::path::Path;

use anyhow::{Context, anyhow};
use yaml_rust::{Yaml, YamlLoader};

/// Load the single yaml document from a config file.
pub fn load_doc(path: &Path) -> anyhow::Result<Yaml> {
    let content = fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read file {}: {e}", path.display()))?;
    load_doc_str(&content).context(format!("invalid yaml file {}", path.display()))
}

pub fn load_doc_str(s: &str) -> anyhow::Result<Yaml> {
    let mut docs = YamlLoader::load_from_str(s)?;
    match docs.len() {
        0 => Ok(Yaml::Null),
        1 => Ok(docs.remove(0)),
        n => Err(anyhow!("expected a single yaml document but found {n}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_str() {
        let doc = load_doc_str("a: 1").unwrap();
        assert_eq!(doc["a"].as_i64(), Some(1));

        assert_eq!(load_doc_str("").unwrap(), Yaml::Null);
        assert!(load_doc_str("a: 1\n---\nb: 2\n").is_err());
        assert!(load_doc_str("a: [1").is_err());
    }

    #[test]
    fn load_missing_file() {
        assert!(load_doc(Path::new("/nonexistent/tunfwd.yaml")).is_err());
    }
}
