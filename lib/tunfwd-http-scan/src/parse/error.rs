/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::str::Utf8Error;

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HttpLineParseError {
    #[error("not long enough")]
    NotLongEnough,
    #[error("invalid utf-8 encoding: {0}")]
    InvalidUtf8Encoding(#[from] Utf8Error),
    #[error("no delimiter '{0}' found")]
    NoDelimiterFound(char),
    #[error("invalid method")]
    InvalidMethod,
    #[error("invalid request target")]
    InvalidRequestTarget,
    #[error("invalid header name")]
    InvalidHeaderName,
    #[error("invalid version")]
    InvalidVersion,
    #[error("invalid status code")]
    InvalidStatusCode,
    #[error("invalid chunk size")]
    InvalidChunkSize,
    #[error("invalid content length")]
    InvalidContentLength,
}
