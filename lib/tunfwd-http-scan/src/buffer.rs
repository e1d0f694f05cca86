/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::TryReserveError;

use thiserror::Error;

const ALLOCATE_BLOCK_SIZE: usize = 8192;

#[derive(Debug, Error)]
pub enum ScanBufferError {
    #[error("buffer allocation failed: {0}")]
    AllocFailed(#[from] TryReserveError),
    #[error("out of range: requested {requested} but only {available} buffered")]
    OutOfRange { requested: usize, available: usize },
}

/// Append-only byte accumulator which can be consumed from the start.
///
/// Capacity grows in whole blocks, so a long run of small appends does not
/// reallocate on every call.
#[derive(Debug)]
pub struct ScanBuffer {
    buf: Vec<u8>,
}

impl Default for ScanBuffer {
    fn default() -> Self {
        ScanBuffer::new()
    }
}

impl ScanBuffer {
    pub fn new() -> Self {
        ScanBuffer {
            buf: Vec::with_capacity(ALLOCATE_BLOCK_SIZE),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn append(&mut self, data: &[u8]) -> Result<(), ScanBufferError> {
        let needed = self.buf.len() + data.len();
        if needed > self.buf.capacity() {
            let new_size = ALLOCATE_BLOCK_SIZE * (needed / ALLOCATE_BLOCK_SIZE + 1);
            self.buf.try_reserve_exact(new_size - self.buf.len())?;
        }
        self.buf.extend_from_slice(data);
        Ok(())
    }

    pub fn consume(&mut self, size: usize) -> Result<(), ScanBufferError> {
        self.check_range(size)?;
        self.buf.drain(..size);
        Ok(())
    }

    /// Get the first `size` bytes as a string, each byte mapped to one char.
    pub fn peek_str(&self, size: usize) -> Result<String, ScanBufferError> {
        self.check_range(size)?;
        Ok(self.buf[..size].iter().map(|b| *b as char).collect())
    }

    pub fn find(&self, literal: &[u8]) -> Option<usize> {
        if literal.len() > self.buf.len() {
            return None;
        }
        memchr::memmem::find(&self.buf, literal)
    }

    #[inline]
    pub fn starts_with(&self, literal: &[u8]) -> bool {
        self.buf.starts_with(literal)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    fn check_range(&self, size: usize) -> Result<(), ScanBufferError> {
        if size > self.buf.len() {
            Err(ScanBufferError::OutOfRange {
                requested: size,
                available: self.buf.len(),
            })
        } else {
            Ok(())
        }
    }
}
