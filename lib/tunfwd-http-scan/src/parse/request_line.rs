/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use super::{HttpLineParseError, parse_version};

pub struct HttpRequestLine<'a> {
    pub method: &'a str,
    pub uri: &'a str,
    pub version: u8,
}

impl<'a> HttpRequestLine<'a> {
    pub fn parse(buf: &'a [u8]) -> Result<HttpRequestLine<'a>, HttpLineParseError> {
        const MINIMAL_LENGTH: usize = 14; // X / HTTP/1.x

        if buf.len() < MINIMAL_LENGTH {
            return Err(HttpLineParseError::NotLongEnough);
        }

        let Some(p) = memchr::memchr(b' ', buf) else {
            return Err(HttpLineParseError::NoDelimiterFound(' '));
        };
        let method = &buf[0..p];
        if method.is_empty() || !method.iter().all(is_token_char) {
            return Err(HttpLineParseError::InvalidMethod);
        }

        let left = &buf[p + 1..];
        let Some(p) = memchr::memrchr(b' ', left) else {
            return Err(HttpLineParseError::NoDelimiterFound(' '));
        };
        let version = parse_version(&left[p + 1..])?;

        let uri = std::str::from_utf8(&left[0..p])?.trim();
        if uri.is_empty() || uri.contains(' ') {
            return Err(HttpLineParseError::InvalidRequestTarget);
        }

        // the method has been checked to be all ascii
        let method = std::str::from_utf8(method)?;
        Ok(HttpRequestLine {
            method,
            uri,
            version,
        })
    }
}

fn is_token_char(c: &u8) -> bool {
    matches!(
        *c,
        b'!' | b'#'
            | b'$'
            | b'%'
            | b'&'
            | b'\''
            | b'*'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~'
    ) || c.is_ascii_alphanumeric()
}
