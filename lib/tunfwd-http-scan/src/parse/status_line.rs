/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use atoi::FromRadix10;

use super::{HttpLineParseError, parse_version};

pub struct HttpStatusLine<'a> {
    pub version: u8,
    pub code: u16,
    pub reason: &'a str,
}

impl<'a> HttpStatusLine<'a> {
    pub fn parse(buf: &'a [u8]) -> Result<HttpStatusLine<'a>, HttpLineParseError> {
        const MINIMAL_LENGTH: usize = 12; // HTTP/1.x XYZ

        if buf.len() < MINIMAL_LENGTH {
            return Err(HttpLineParseError::NotLongEnough);
        }

        let Some(p) = memchr::memchr(b' ', buf) else {
            return Err(HttpLineParseError::NoDelimiterFound(' '));
        };
        let version = parse_version(&buf[0..p])?;

        let left = &buf[p + 1..];
        let (code, len) = u16::from_radix_10(left);
        if len != 3 || !(100..1000).contains(&code) {
            return Err(HttpLineParseError::InvalidStatusCode);
        }

        let reason = match left.get(len) {
            None => "",
            Some(b' ') => std::str::from_utf8(&left[len + 1..])?.trim(),
            Some(_) => return Err(HttpLineParseError::InvalidStatusCode),
        };

        Ok(HttpStatusLine {
            version,
            code,
            reason,
        })
    }
}
