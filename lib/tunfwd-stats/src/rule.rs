/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use regex::{Regex, RegexBuilder};

/// Map page view urls to the entries which are really stored.
#[derive(Clone, Debug)]
pub struct PageViewRule {
    regex: Regex,
    replace: String,
}

impl PageViewRule {
    /// The regex is matched case-insensitively.
    ///
    /// Groups in `replace` are referenced as `$1`, a literal char is escaped
    /// by a backslash.
    pub fn new(regex: &str, replace: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(regex).case_insensitive(true).build()?;
        Ok(PageViewRule {
            regex,
            replace: convert_replacement(replace),
        })
    }

    #[inline]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Replace the first match, or return `None` if not matched.
    pub fn apply(&self, url: &str) -> Option<String> {
        if self.regex.is_match(url) {
            Some(self.regex.replacen(url, 1, self.replace.as_str()).into_owned())
        } else {
            None
        }
    }
}

/// `$12a` means group 12 followed by `a`, which is `${12}a` for the regex crate.
fn convert_replacement(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('$') => out.push_str("$$"),
                Some(c) => out.push(c),
                None => out.push('\\'),
            },
            '$' => {
                let mut group = String::new();
                while let Some(d) = chars.peek().filter(|d| d.is_ascii_digit()) {
                    group.push(*d);
                    chars.next();
                }
                if group.is_empty() {
                    out.push_str("$$");
                } else {
                    out.push_str("${");
                    out.push_str(&group);
                    out.push('}');
                }
            }
            _ => out.push(c),
        }
    }
    out
}
