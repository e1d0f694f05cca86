/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

/// Load the first document of a yaml string, for use in tests.
#[macro_export]
macro_rules! yaml_doc {
    ($s:expr) => {
        yaml_rust::YamlLoader::load_from_str($s).unwrap().remove(0)
    };
}

#[cfg(test)]
macro_rules! yaml_str {
    ($s:expr) => {
        yaml_rust::Yaml::String($s.to_string())
    };
}
