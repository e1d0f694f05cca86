/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::net::{Shutdown, TcpStream};

/// A handle which is able to close the client connection from outside of the
/// tasks which are using its read and write halves.
pub trait ClientSocket: Send + Sync {
    fn close(&self) -> io::Result<()>;
}

impl ClientSocket for TcpStream {
    fn close(&self) -> io::Result<()> {
        match self.shutdown(Shutdown::Both) {
            Ok(_) => Ok(()),
            // already closed by the peer
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(unix)]
impl ClientSocket for std::os::unix::net::UnixStream {
    fn close(&self) -> io::Result<()> {
        match self.shutdown(Shutdown::Both) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(e),
        }
    }
}
