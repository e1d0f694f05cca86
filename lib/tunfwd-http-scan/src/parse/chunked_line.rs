/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use atoi::FromRadix16Checked;

use super::HttpLineParseError;

pub struct HttpChunkedLine<'a> {
    pub chunk_size: u64,
    pub extension: Option<&'a str>,
}

impl<'a> HttpChunkedLine<'a> {
    /// Parse the chunk-size line, without the trailing CRLF.
    pub fn parse(buf: &'a [u8]) -> Result<HttpChunkedLine<'a>, HttpLineParseError> {
        let buf = buf.trim_ascii_start();
        let (chunk_size, offset) = u64::from_radix_16_checked(buf);
        let Some(chunk_size) = chunk_size else {
            return Err(HttpLineParseError::InvalidChunkSize);
        };
        if offset == 0 {
            return Err(HttpLineParseError::InvalidChunkSize);
        }

        let left = buf[offset..].trim_ascii_start();
        match left.first() {
            None => Ok(HttpChunkedLine {
                chunk_size,
                extension: None,
            }),
            Some(b';') => {
                let extension = std::str::from_utf8(&left[1..])?.trim();
                Ok(HttpChunkedLine {
                    chunk_size,
                    extension: Some(extension),
                })
            }
            Some(_) => Err(HttpLineParseError::InvalidChunkSize),
        }
    }
}
