/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

mod error;
pub use error::HttpLineParseError;

mod header_line;
pub use header_line::{HttpHeaderLine, is_chunked_transfer_encoding, parse_content_length};

mod status_line;
pub use status_line::HttpStatusLine;

mod request_line;
pub use request_line::HttpRequestLine;

mod chunked_line;
pub use chunked_line::HttpChunkedLine;

fn parse_version(buf: &[u8]) -> Result<u8, HttpLineParseError> {
    match buf {
        b"HTTP/1.0" => Ok(0),
        b"HTTP/1.1" => Ok(1),
        _ => Err(HttpLineParseError::InvalidVersion),
    }
}
