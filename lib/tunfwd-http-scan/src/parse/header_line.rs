/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use atoi::FromRadix10Checked;

use super::HttpLineParseError;

pub struct HttpHeaderLine<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

impl<'a> HttpHeaderLine<'a> {
    pub fn parse(buf: &'a [u8]) -> Result<HttpHeaderLine<'a>, HttpLineParseError> {
        let line = std::str::from_utf8(buf)?;
        let Some(p) = memchr::memchr(b':', line.as_bytes()) else {
            return Err(HttpLineParseError::NoDelimiterFound(':'));
        };

        let name = line[0..p].trim();
        if name.is_empty() {
            return Err(HttpLineParseError::InvalidHeaderName);
        }
        let value = line[p + 1..].trim();

        Ok(HttpHeaderLine { name, value })
    }

    #[inline]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

pub fn parse_content_length(value: &str) -> Result<u64, HttpLineParseError> {
    let value = value.trim().as_bytes();
    let (len, offset) = u64::from_radix_10_checked(value);
    match len {
        Some(len) if offset > 0 && offset == value.len() => Ok(len),
        _ => Err(HttpLineParseError::InvalidContentLength),
    }
}

/// Check if the final transfer coding is `chunked`.
pub fn is_chunked_transfer_encoding(value: &str) -> bool {
    value
        .rsplit(',')
        .next()
        .map(|s| s.trim().eq_ignore_ascii_case("chunked"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple() {
        let h = HttpHeaderLine::parse(b"Content-Type: text/html; charset=utf-8").unwrap();
        assert_eq!(h.name, "Content-Type");
        assert_eq!(h.value, "text/html; charset=utf-8");
        assert!(h.is("content-type"));

        let h = HttpHeaderLine::parse(b"Host:example.com:8080").unwrap();
        assert_eq!(h.name, "Host");
        assert_eq!(h.value, "example.com:8080");
    }

    #[test]
    fn invalid() {
        assert!(matches!(
            HttpHeaderLine::parse(b"no delimiter here"),
            Err(HttpLineParseError::NoDelimiterFound(':'))
        ));
        assert!(matches!(
            HttpHeaderLine::parse(b" : value"),
            Err(HttpLineParseError::InvalidHeaderName)
        ));
    }

    #[test]
    fn content_length() {
        assert_eq!(parse_content_length("0").unwrap(), 0);
        assert_eq!(parse_content_length(" 500 ").unwrap(), 500);
        assert!(parse_content_length("").is_err());
        assert!(parse_content_length("-1").is_err());
        assert!(parse_content_length("12a").is_err());
        assert!(parse_content_length("99999999999999999999999").is_err());
    }

    #[test]
    fn transfer_encoding() {
        assert!(is_chunked_transfer_encoding("chunked"));
        assert!(is_chunked_transfer_encoding("Chunked"));
        assert!(is_chunked_transfer_encoding("gzip, chunked"));
        assert!(!is_chunked_transfer_encoding("chunked, gzip"));
        assert!(!is_chunked_transfer_encoding("identity"));
    }
}
