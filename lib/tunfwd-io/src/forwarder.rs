/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::sync::Arc;

use log::debug;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use tunfwd_http_scan::{
    HttpMessageScanner, HttpScanAbandon, HttpScanError, HttpScanEvent, PendingRequestTracker,
};

use crate::{ChannelCloser, ForwardDirection, StreamForwardConfig, TrafficStatsSink};

#[derive(Error, Debug)]
pub enum StreamForwardError {
    #[error("read failed: {0:?}")]
    ReadFailed(io::Error),
    #[error("write failed: {0:?}")]
    WriteFailed(io::Error),
    #[error("scan buffer failed: {0}")]
    ScanBufferFailed(#[from] HttpScanError),
}

/// Counters of one forward direction.
#[derive(Debug)]
pub struct ForwardSummary {
    pub direction: ForwardDirection,
    pub read_bytes: u64,
    pub forwarded_bytes: u64,
    pub http_requests: u64,
    pub http_responses: u64,
    pub page_views: u64,
    /// Whether the data was still parsed as HTTP at the end.
    pub is_http: bool,
    pub scan_abandon: Option<HttpScanAbandon>,
    pub error: Option<StreamForwardError>,
}

impl ForwardSummary {
    fn new(direction: ForwardDirection) -> Self {
        ForwardSummary {
            direction,
            read_bytes: 0,
            forwarded_bytes: 0,
            http_requests: 0,
            http_responses: 0,
            page_views: 0,
            is_http: false,
            scan_abandon: None,
            error: None,
        }
    }
}

pub(crate) struct ForwardStats {
    pub(crate) dest_host: String,
    pub(crate) sink: Arc<dyn TrafficStatsSink>,
}

/// Copy data of one direction of a forwarded connection.
///
/// Each chunk is handed to the stats sink and the HTTP scanner before it is
/// written out unmodified, so a request is always tracked before the peer is
/// able to respond to it.
pub struct StreamForwarder<R, W> {
    direction: ForwardDirection,
    reader: R,
    writer: W,
    buffer_size: usize,
    closer: Arc<ChannelCloser>,
    stats: Option<ForwardStats>,
    scanner: Option<HttpMessageScanner>,
    summary: ForwardSummary,
}

impl<R, W> StreamForwarder<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub(crate) fn new(
        direction: ForwardDirection,
        reader: R,
        writer: W,
        config: &StreamForwardConfig,
        closer: Arc<ChannelCloser>,
    ) -> Self {
        StreamForwarder {
            direction,
            reader,
            writer,
            buffer_size: config.buffer_size(),
            closer,
            stats: None,
            scanner: None,
            summary: ForwardSummary::new(direction),
        }
    }

    pub(crate) fn enable_stats(
        &mut self,
        stats: ForwardStats,
        config: &StreamForwardConfig,
        tracker: Arc<PendingRequestTracker>,
    ) {
        self.scanner = Some(HttpMessageScanner::new(
            self.direction.scan_role(),
            config.http_scan(),
            &stats.dest_host,
            tracker,
        ));
        self.stats = Some(stats);
    }

    #[inline]
    pub fn direction(&self) -> ForwardDirection {
        self.direction
    }

    pub async fn run(mut self) -> ForwardSummary {
        let mut buf = vec![0u8; self.buffer_size].into_boxed_slice();
        if let Err(e) = self.forward(&mut buf).await {
            debug!("{} forward failed: {e}", self.direction);
            self.closer.close(
                &format!(
                    "Closed due to exception in stream forwarder ({}): {e}",
                    self.direction
                ),
                true,
            );
            self.summary.error = Some(e);
        }

        if let Err(e) = self.writer.shutdown().await {
            debug!("{} failed to shutdown writer: {e}", self.direction);
        }

        if let Some(scanner) = &self.scanner {
            self.summary.is_http = scanner.is_http();
        }
        self.summary
    }

    async fn forward(&mut self, buf: &mut [u8]) -> Result<(), StreamForwardError> {
        loop {
            let nr = self
                .reader
                .read(buf)
                .await
                .map_err(StreamForwardError::ReadFailed)?;
            if nr == 0 {
                return Ok(());
            }
            self.summary.read_bytes += nr as u64;

            let data = &buf[..nr];
            let scan_result = self.scan(data);

            // the data is forwarded even if the scanner failed
            self.writer
                .write_all(data)
                .await
                .map_err(StreamForwardError::WriteFailed)?;
            self.writer
                .flush()
                .await
                .map_err(StreamForwardError::WriteFailed)?;
            self.summary.forwarded_bytes += nr as u64;

            scan_result?;
        }
    }

    fn scan(&mut self, data: &[u8]) -> Result<(), HttpScanError> {
        let Some(stats) = &self.stats else {
            return Ok(());
        };
        match self.direction {
            ForwardDirection::ClientToTunnel => {
                stats.sink.add_bytes_sent(&stats.dest_host, data.len() as u64)
            }
            ForwardDirection::TunnelToClient => {
                stats.sink.add_bytes_received(&stats.dest_host, data.len() as u64)
            }
        }

        let Some(scanner) = &mut self.scanner else {
            return Ok(());
        };
        for event in scanner.scan(data)? {
            match event {
                HttpScanEvent::Request(req) => {
                    debug!("{} http request {req}", self.direction);
                    self.summary.http_requests += 1;
                }
                HttpScanEvent::Response(rsp) => {
                    self.summary.http_responses += 1;
                    if let Some(url) = rsp.page_view_url() {
                        stats.sink.record_page_view(&url);
                        self.summary.page_views += 1;
                    }
                }
                HttpScanEvent::Abandoned(reason) => {
                    self.summary.scan_abandon = Some(reason);
                }
            }
        }
        Ok(())
    }
}
