/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use log::{debug, warn};
use thiserror::Error;

use crate::parse::{
    HttpChunkedLine, HttpHeaderLine, HttpLineParseError, HttpRequestLine, HttpStatusLine,
    is_chunked_transfer_encoding, parse_content_length,
};
use crate::{HttpScanConfig, PendingRequest, PendingRequestTracker, ScanBuffer, ScanBufferError};

const CRLF: &[u8] = b"\r\n";
const HEADERS_TERMINATOR: &[u8] = b"\r\n\r\n";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpScanRole {
    /// parse the stream as http requests
    Requester,
    /// parse the stream as http responses
    Responder,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponseSummary {
    pub request: PendingRequest,
    pub status: u16,
    pub content_type: Option<String>,
}

impl HttpResponseSummary {
    pub fn is_html_page(&self) -> bool {
        if self.status != 200 {
            return false;
        }
        match &self.content_type {
            Some(ct) => ct.contains("text/html") || ct.contains("application/xhtml+xml"),
            None => false,
        }
    }

    pub fn page_view_url(&self) -> Option<String> {
        if self.is_html_page() {
            self.request.url()
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HttpScanAbandon {
    #[error("no end of header found in {0} bytes")]
    HeaderTooLarge(usize),
    #[error("parse failed: {0}")]
    ParseFailed(#[from] HttpLineParseError),
    #[error("response received without pending request")]
    NoPendingRequest,
    #[error("protocol switched")]
    ProtocolSwitched,
    #[error("abandoned by sibling")]
    SiblingAbandoned,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HttpScanEvent {
    Request(PendingRequest),
    Response(HttpResponseSummary),
    Abandoned(HttpScanAbandon),
}

#[derive(Debug, Error)]
pub enum HttpScanError {
    #[error("scan buffer failed: {0}")]
    BufferFailed(#[from] ScanBufferError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ChunkState {
    Idle,
    ExpectSize,
    ExpectEnd,
}

enum MessageBody {
    None,
    Length(u64),
    Chunked,
}

enum StepError {
    Buffer(ScanBufferError),
    Abandon(HttpScanAbandon),
}

impl From<ScanBufferError> for StepError {
    fn from(e: ScanBufferError) -> Self {
        StepError::Buffer(e)
    }
}

impl From<HttpLineParseError> for StepError {
    fn from(e: HttpLineParseError) -> Self {
        StepError::Abandon(HttpScanAbandon::ParseFailed(e))
    }
}

impl From<HttpScanAbandon> for StepError {
    fn from(e: HttpScanAbandon) -> Self {
        StepError::Abandon(e)
    }
}

/// Incremental HTTP/1.x message framing over data which is forwarded as is.
///
/// Each call to [`HttpMessageScanner::scan`] takes the data of one socket
/// read. Message bodies are skipped by length, only header blocks and chunk
/// size lines are buffered. Once the data is found not to be HTTP the scanner
/// stops for the rest of the connection, and so does its sibling through the
/// shared [`PendingRequestTracker`].
pub struct HttpMessageScanner {
    role: HttpScanRole,
    config: HttpScanConfig,
    dest_host: String,
    tracker: Arc<PendingRequestTracker>,
    buf: Option<ScanBuffer>,
    skip_length: u64,
    chunk_state: ChunkState,
}

impl HttpMessageScanner {
    pub fn new(
        role: HttpScanRole,
        config: &HttpScanConfig,
        dest_host: &str,
        tracker: Arc<PendingRequestTracker>,
    ) -> Self {
        HttpMessageScanner {
            role,
            config: config.clone(),
            dest_host: dest_host.to_string(),
            tracker,
            buf: Some(ScanBuffer::new()),
            skip_length: 0,
            chunk_state: ChunkState::Idle,
        }
    }

    #[inline]
    pub fn role(&self) -> HttpScanRole {
        self.role
    }

    #[inline]
    pub fn is_http(&self) -> bool {
        self.buf.is_some()
    }

    #[inline]
    pub fn skip_length(&self) -> u64 {
        self.skip_length
    }

    pub fn buffered_len(&self) -> usize {
        self.buf.as_ref().map(|b| b.len()).unwrap_or(0)
    }

    #[inline]
    pub fn tracker(&self) -> &Arc<PendingRequestTracker> {
        &self.tracker
    }

    pub fn scan(&mut self, data: &[u8]) -> Result<Vec<HttpScanEvent>, HttpScanError> {
        let mut events = Vec::new();
        let Some(mut buf) = self.buf.take() else {
            return Ok(events);
        };

        if self.tracker.is_abandoned() {
            self.disable();
            events.push(HttpScanEvent::Abandoned(HttpScanAbandon::SiblingAbandoned));
            return Ok(events);
        }

        let mut data = data;
        if self.skip_length > 0 {
            let len = data.len() as u64;
            if self.skip_length >= len {
                self.skip_length -= len;
                self.buf = Some(buf);
                return Ok(events);
            }
            data = &data[self.skip_length as usize..];
            self.skip_length = 0;
        }

        match self.scan_buffered(&mut buf, data, &mut events) {
            Ok(()) => {
                self.buf = Some(buf);
                Ok(events)
            }
            Err(StepError::Abandon(reason)) => {
                match reason {
                    HttpScanAbandon::NoPendingRequest => {
                        warn!("http scan: response to {} without request", self.dest_host)
                    }
                    _ => debug!(
                        "http scan for {} {:?} stopped: {reason}",
                        self.dest_host, self.role
                    ),
                }
                self.disable();
                events.push(HttpScanEvent::Abandoned(reason));
                Ok(events)
            }
            Err(StepError::Buffer(e)) => {
                self.disable();
                Err(e.into())
            }
        }
    }

    fn disable(&mut self) {
        self.buf = None;
        self.skip_length = 0;
        self.chunk_state = ChunkState::Idle;
        self.tracker.abandon();
    }

    fn scan_buffered(
        &mut self,
        buf: &mut ScanBuffer,
        data: &[u8],
        events: &mut Vec<HttpScanEvent>,
    ) -> Result<(), StepError> {
        buf.append(data)?;

        loop {
            if !self.scan_chunks(buf)? {
                return Ok(());
            }

            while buf.starts_with(CRLF) {
                buf.consume(CRLF.len())?;
            }

            let Some(p) = buf.find(HEADERS_TERMINATOR) else {
                self.check_buffered_size(buf)?;
                return Ok(());
            };
            let head = buf.peek_str(p)?;
            buf.consume(p + HEADERS_TERMINATOR.len())?;

            match self.parse_head(&head, events)? {
                MessageBody::None => {}
                MessageBody::Chunked => self.chunk_state = ChunkState::ExpectSize,
                MessageBody::Length(len) => {
                    let buffered = buf.len() as u64;
                    if buffered >= len {
                        buf.consume(len as usize)?;
                    } else {
                        self.skip_length = len - buffered;
                        buf.clear();
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Skip over chunked body data, return false if more data is needed.
    fn scan_chunks(&mut self, buf: &mut ScanBuffer) -> Result<bool, StepError> {
        loop {
            match self.chunk_state {
                ChunkState::Idle => return Ok(true),
                ChunkState::ExpectSize => {
                    let Some(p) = buf.find(CRLF) else {
                        self.check_buffered_size(buf)?;
                        return Ok(false);
                    };
                    let chunk_size = HttpChunkedLine::parse(&buf.as_bytes()[..p])?.chunk_size;
                    buf.consume(p + CRLF.len())?;

                    if chunk_size == 0 {
                        self.chunk_state = ChunkState::ExpectEnd;
                        continue;
                    }

                    // the chunk data is followed by CRLF
                    let need = chunk_size.saturating_add(CRLF.len() as u64);
                    let buffered = buf.len() as u64;
                    if buffered >= need {
                        buf.consume(need as usize)?;
                    } else {
                        self.skip_length = need - buffered;
                        buf.clear();
                        return Ok(false);
                    }
                }
                ChunkState::ExpectEnd => {
                    if buf.starts_with(CRLF) {
                        buf.consume(CRLF.len())?;
                        self.chunk_state = ChunkState::Idle;
                        continue;
                    }
                    // trailer fields are skipped
                    let Some(p) = buf.find(HEADERS_TERMINATOR) else {
                        self.check_buffered_size(buf)?;
                        return Ok(false);
                    };
                    buf.consume(p + HEADERS_TERMINATOR.len())?;
                    self.chunk_state = ChunkState::Idle;
                }
            }
        }
    }

    fn check_buffered_size(&self, buf: &ScanBuffer) -> Result<(), HttpScanAbandon> {
        if buf.len() >= self.config.max_header_size() {
            Err(HttpScanAbandon::HeaderTooLarge(buf.len()))
        } else {
            Ok(())
        }
    }

    fn parse_head(
        &self,
        head: &str,
        events: &mut Vec<HttpScanEvent>,
    ) -> Result<MessageBody, StepError> {
        let mut lines = head.split("\r\n");
        let first_line = lines.next().unwrap_or_default();

        let mut host: Option<&str> = None;
        let mut content_type: Option<&str> = None;
        let mut content_length: u64 = 0;
        let mut chunked = false;
        for line in lines {
            let header = HttpHeaderLine::parse(line.as_bytes())?;
            if header.is("Host") {
                host = Some(header.value);
            } else if header.is("Content-Type") {
                content_type = Some(header.value);
            } else if header.is("Content-Length") {
                content_length = parse_content_length(header.value)?;
            } else if header.is("Transfer-Encoding") && is_chunked_transfer_encoding(header.value)
            {
                chunked = true;
            }
        }

        match self.role {
            HttpScanRole::Requester => {
                let req_line = HttpRequestLine::parse(first_line.as_bytes())?;
                let host = match host {
                    Some(h) if self.config.use_host_header() && !h.is_empty() => h,
                    _ => self.dest_host.as_str(),
                };
                let req = PendingRequest::new(host, req_line.uri);
                self.tracker.push(req.clone());
                events.push(HttpScanEvent::Request(req));
            }
            HttpScanRole::Responder => {
                let status_line = HttpStatusLine::parse(first_line.as_bytes())?;
                let code = status_line.code;
                if (100..200).contains(&code) && code != 101 {
                    // interim response, the final one is still to come
                    return Ok(MessageBody::None);
                }

                let Some(request) = self.tracker.pop() else {
                    return Err(HttpScanAbandon::NoPendingRequest.into());
                };
                events.push(HttpScanEvent::Response(HttpResponseSummary {
                    request,
                    status: code,
                    content_type: content_type.map(|s| s.to_string()),
                }));
                if code == 101 {
                    return Err(HttpScanAbandon::ProtocolSwitched.into());
                }
            }
        }

        // chunked takes precedence over content length, see RFC 2616 4.4
        if chunked {
            Ok(MessageBody::Chunked)
        } else if content_length > 0 {
            Ok(MessageBody::Length(content_length))
        } else {
            Ok(MessageBody::None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner_pair() -> (HttpMessageScanner, HttpMessageScanner) {
        let config = HttpScanConfig::default();
        let tracker = Arc::new(PendingRequestTracker::new());
        let requester = HttpMessageScanner::new(
            HttpScanRole::Requester,
            &config,
            "example.com",
            Arc::clone(&tracker),
        );
        let responder =
            HttpMessageScanner::new(HttpScanRole::Responder, &config, "example.com", tracker);
        (requester, responder)
    }

    #[test]
    fn request_and_response() {
        let (mut requester, mut responder) = scanner_pair();

        let events = requester
            .scan(b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n")
            .unwrap();
        assert_eq!(
            events,
            vec![HttpScanEvent::Request(PendingRequest::new(
                "example.com",
                "/index.html"
            ))]
        );
        assert_eq!(requester.tracker().len(), 1);

        let events = responder
            .scan(b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 2\r\n\r\nhi")
            .unwrap();
        assert_eq!(events.len(), 1);
        let HttpScanEvent::Response(rsp) = &events[0] else {
            panic!("not a response event");
        };
        assert_eq!(rsp.request.to_string(), "example.com /index.html");
        assert_eq!(rsp.status, 200);
        assert_eq!(
            rsp.page_view_url().as_deref(),
            Some("http://example.com/index.html")
        );
        assert_eq!(responder.skip_length(), 0);
        assert_eq!(responder.buffered_len(), 0);
        assert!(responder.tracker().is_empty());
    }

    #[test]
    fn host_fallback() {
        let (mut requester, _responder) = scanner_pair();
        let events = requester.scan(b"GET /a HTTP/1.0\r\n\r\n").unwrap();
        assert_eq!(
            events,
            vec![HttpScanEvent::Request(PendingRequest::new("example.com", "/a"))]
        );
    }

    #[test]
    fn host_header_disabled() {
        let mut config = HttpScanConfig::default();
        config.set_use_host_header(false);
        let tracker = Arc::new(PendingRequestTracker::new());
        let mut requester =
            HttpMessageScanner::new(HttpScanRole::Requester, &config, "10.0.0.1", tracker);
        let events = requester
            .scan(b"GET /a HTTP/1.1\r\nHost: example.com\r\n\r\n")
            .unwrap();
        assert_eq!(
            events,
            vec![HttpScanEvent::Request(PendingRequest::new("10.0.0.1", "/a"))]
        );
    }

    #[test]
    fn not_page_view() {
        let (mut requester, mut responder) = scanner_pair();
        requester.scan(b"GET /a.png HTTP/1.1\r\n\r\nGET /b HTTP/1.1\r\n\r\n").unwrap();

        let events = responder
            .scan(b"HTTP/1.1 200 OK\r\nContent-Type: image/png\r\n\r\n")
            .unwrap();
        let HttpScanEvent::Response(rsp) = &events[0] else {
            panic!("not a response event");
        };
        assert!(rsp.page_view_url().is_none());

        let events = responder
            .scan(b"HTTP/1.1 404 Not Found\r\nContent-Type: text/html\r\n\r\n")
            .unwrap();
        let HttpScanEvent::Response(rsp) = &events[0] else {
            panic!("not a response event");
        };
        assert_eq!(rsp.request.uri(), "/b");
        assert!(rsp.page_view_url().is_none());
    }

    #[test]
    fn chunked_with_trailer() {
        let (mut requester, mut responder) = scanner_pair();
        requester.scan(b"GET /a HTTP/1.1\r\n\r\nGET /b HTTP/1.1\r\n\r\n").unwrap();

        let events = responder
            .scan(
                b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\nContent-Length: 10\r\n\r\n\
                  3;ext=1\r\nabc\r\n0\r\nX-Checksum: 1\r\n\r\n\
                  HTTP/1.1 204 No Content\r\n\r\n",
            )
            .unwrap();
        assert_eq!(events.len(), 2);
        assert!(responder.is_http());
        assert_eq!(responder.buffered_len(), 0);
        assert!(responder.tracker().is_empty());
    }

    #[test]
    fn chunk_data_across_reads() {
        let (mut requester, mut responder) = scanner_pair();
        requester.scan(b"GET /a HTTP/1.1\r\n\r\nGET /b HTTP/1.1\r\n\r\n").unwrap();

        let events = responder
            .scan(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n10\r\n0123")
            .unwrap();
        assert_eq!(events.len(), 1);
        // 12 data bytes and the CRLF are still to come
        assert_eq!(responder.skip_length(), 14);

        assert!(responder.scan(b"456789abcdef\r\n").unwrap().is_empty());
        assert_eq!(responder.skip_length(), 0);

        let events = responder
            .scan(b"0\r\n\r\nHTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n")
            .unwrap();
        assert_eq!(events.len(), 1);
        assert!(responder.tracker().is_empty());
    }

    #[test]
    fn interim_response() {
        let (mut requester, mut responder) = scanner_pair();
        requester
            .scan(b"POST /form HTTP/1.1\r\nExpect: 100-continue\r\nContent-Length: 3\r\n\r\n")
            .unwrap();
        assert_eq!(requester.skip_length(), 3);

        assert!(responder.scan(b"HTTP/1.1 100 Continue\r\n\r\n").unwrap().is_empty());
        assert_eq!(requester.scan(b"a=b").unwrap(), vec![]);

        let events = responder
            .scan(b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n")
            .unwrap();
        let HttpScanEvent::Response(rsp) = &events[0] else {
            panic!("not a response event");
        };
        assert_eq!(rsp.request.uri(), "/form");
    }

    #[test]
    fn protocol_switch() {
        let (mut requester, mut responder) = scanner_pair();
        requester
            .scan(b"GET /ws HTTP/1.1\r\nUpgrade: websocket\r\nConnection: Upgrade\r\n\r\n")
            .unwrap();

        let events = responder
            .scan(b"HTTP/1.1 101 Switching Protocols\r\nUpgrade: websocket\r\n\r\n\x81\x05hello")
            .unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            HttpScanEvent::Abandoned(HttpScanAbandon::ProtocolSwitched)
        );
        assert!(!responder.is_http());

        let events = requester.scan(b"\x81\x85\x00\x00\x00\x00hello").unwrap();
        assert_eq!(
            events,
            vec![HttpScanEvent::Abandoned(HttpScanAbandon::SiblingAbandoned)]
        );
        assert!(!requester.is_http());
    }

    #[test]
    fn response_without_request() {
        let (_requester, mut responder) = scanner_pair();
        let events = responder.scan(b"HTTP/1.1 200 OK\r\n\r\n").unwrap();
        assert_eq!(
            events,
            vec![HttpScanEvent::Abandoned(HttpScanAbandon::NoPendingRequest)]
        );
        assert!(!responder.is_http());
        assert!(responder.tracker().is_abandoned());
    }

    #[test]
    fn malformed_header() {
        let (mut requester, _responder) = scanner_pair();
        let events = requester
            .scan(b"GET / HTTP/1.1\r\nthis is not a header\r\n\r\n")
            .unwrap();
        assert_eq!(
            events,
            vec![HttpScanEvent::Abandoned(HttpScanAbandon::ParseFailed(
                HttpLineParseError::NoDelimiterFound(':')
            ))]
        );
        assert!(!requester.is_http());
        assert!(requester.scan(b"GET / HTTP/1.1\r\n\r\n").unwrap().is_empty());
    }

    #[test]
    fn invalid_content_length() {
        let (mut requester, _responder) = scanner_pair();
        let events = requester
            .scan(b"POST / HTTP/1.1\r\nContent-Length: -5\r\n\r\n")
            .unwrap();
        assert_eq!(
            events,
            vec![HttpScanEvent::Abandoned(HttpScanAbandon::ParseFailed(
                HttpLineParseError::InvalidContentLength
            ))]
        );
    }

    #[test]
    fn leading_empty_lines() {
        let (mut requester, _responder) = scanner_pair();
        let events = requester.scan(b"\r\n\r\nGET /a HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(
            events,
            vec![HttpScanEvent::Request(PendingRequest::new("example.com", "/a"))]
        );
    }
}
