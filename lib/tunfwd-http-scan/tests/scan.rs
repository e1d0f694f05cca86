/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use tunfwd_http_scan::{
    HttpMessageScanner, HttpScanAbandon, HttpScanConfig, HttpScanEvent, HttpScanRole,
    PendingRequestTracker,
};

fn new_pair(dest_host: &str) -> (HttpMessageScanner, HttpMessageScanner) {
    let config = HttpScanConfig::default();
    let tracker = Arc::new(PendingRequestTracker::new());
    (
        HttpMessageScanner::new(
            HttpScanRole::Requester,
            &config,
            dest_host,
            Arc::clone(&tracker),
        ),
        HttpMessageScanner::new(HttpScanRole::Responder, &config, dest_host, tracker),
    )
}

fn feed_all(scanner: &mut HttpMessageScanner, data: &[u8]) -> Vec<HttpScanEvent> {
    scanner.scan(data).unwrap()
}

fn feed_split(scanner: &mut HttpMessageScanner, data: &[u8], at: usize) -> Vec<HttpScanEvent> {
    let mut events = scanner.scan(&data[..at]).unwrap();
    events.extend(scanner.scan(&data[at..]).unwrap());
    events
}

fn feed_bytes(scanner: &mut HttpMessageScanner, data: &[u8]) -> Vec<HttpScanEvent> {
    let mut events = Vec::new();
    for b in data {
        events.extend(scanner.scan(std::slice::from_ref(b)).unwrap());
    }
    events
}

fn response_uris(events: &[HttpScanEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            HttpScanEvent::Response(r) => Some(r.request.uri().to_string()),
            _ => None,
        })
        .collect()
}

const REQUESTS: &[u8] = b"GET /a HTTP/1.1\r\nHost: example.com\r\n\r\n\
    POST /b HTTP/1.1\r\nHost: example.com\r\nContent-Length: 5\r\n\r\nx=1&y\
    GET /c HTTP/1.1\r\nHost: example.com\r\n\r\n";

const RESPONSES: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 4\r\n\r\n\r\n\r\n\
    HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n\
    HTTP/1.1 302 Found\r\nLocation: /a\r\n\r\n";

#[test]
fn simple_page_view() {
    let (mut requester, mut responder) = new_pair("93.184.216.34");

    let events = feed_all(
        &mut requester,
        b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n",
    );
    assert_eq!(events.len(), 1);
    assert_eq!(requester.tracker().len(), 1);

    let events = feed_all(
        &mut responder,
        b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 2\r\n\r\nhi",
    );
    let HttpScanEvent::Response(rsp) = &events[0] else {
        panic!("not a response event");
    };
    assert_eq!(rsp.request.to_string(), "example.com /index.html");
    assert_eq!(
        rsp.page_view_url().as_deref(),
        Some("http://example.com/index.html")
    );
    assert_eq!(responder.skip_length(), 0);
    assert!(responder.tracker().is_empty());
}

#[test]
fn pipelined_pairing() {
    let (mut requester, mut responder) = new_pair("example.com");

    let events = feed_split(&mut requester, REQUESTS, 20);
    assert_eq!(events.len(), 3);
    assert_eq!(requester.tracker().len(), 3);

    let events = feed_bytes(&mut responder, RESPONSES);
    assert_eq!(response_uris(&events), vec!["/a", "/b", "/c"]);
    assert!(responder.is_http());
    assert!(responder.tracker().is_empty());
}

#[test]
fn chunked_then_next_message() {
    let (mut requester, mut responder) = new_pair("example.com");
    feed_all(&mut requester, b"GET /w HTTP/1.1\r\n\r\nGET /x HTTP/1.1\r\n\r\n");

    let events = feed_all(
        &mut responder,
        b"HTTP/1.1 200 OK\r\nTransfer-Encoding: gzip, chunked\r\n\r\n\
          4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n",
    );
    assert_eq!(response_uris(&events), vec!["/w"]);
    assert_eq!(responder.buffered_len(), 0);
    assert_eq!(responder.skip_length(), 0);

    let events = feed_all(&mut responder, b"HTTP/1.1 200 OK\r\n\r\n");
    assert_eq!(response_uris(&events), vec!["/x"]);
}

#[test]
fn every_split_point() {
    let (mut requester, mut responder) = new_pair("example.com");
    let expected_requests = feed_all(&mut requester, REQUESTS);
    let expected_responses = feed_all(&mut responder, RESPONSES);
    assert_eq!(expected_responses.len(), 3);

    for at in 0..=REQUESTS.len() {
        let (mut requester, _responder) = new_pair("example.com");
        assert_eq!(
            feed_split(&mut requester, REQUESTS, at),
            expected_requests,
            "request split at {at}"
        );
    }

    for at in 0..=RESPONSES.len() {
        let (mut requester, mut responder) = new_pair("example.com");
        feed_all(&mut requester, REQUESTS);
        assert_eq!(
            feed_split(&mut responder, RESPONSES, at),
            expected_responses,
            "response split at {at}"
        );
    }
}

#[test]
fn random_splits() {
    let (mut requester, mut responder) = new_pair("example.com");
    feed_all(&mut requester, REQUESTS);
    let expected = feed_all(&mut responder, RESPONSES);

    for _ in 0..100 {
        let (mut requester, mut responder) = new_pair("example.com");
        feed_all(&mut requester, REQUESTS);

        let mut events = Vec::new();
        let mut offset = 0;
        while offset < RESPONSES.len() {
            let len = fastrand::usize(1..=(RESPONSES.len() - offset).min(64));
            events.extend(responder.scan(&RESPONSES[offset..offset + len]).unwrap());
            offset += len;
        }
        assert_eq!(events, expected);
    }
}

#[test]
fn header_ceiling() {
    let (mut requester, _responder) = new_pair("example.com");

    let mut data = b"GET / HTTP/1.1\r\nX-Filler: ".to_vec();
    data.resize(16384, b'a');
    let events = feed_all(&mut requester, &data[..16383]);
    assert!(events.is_empty());
    assert!(requester.is_http());

    let events = feed_all(&mut requester, &data[16383..]);
    assert_eq!(
        events,
        vec![HttpScanEvent::Abandoned(HttpScanAbandon::HeaderTooLarge(16384))]
    );
    assert!(!requester.is_http());
    assert_eq!(requester.buffered_len(), 0);

    let events = feed_all(&mut requester, b"\r\n\r\nGET / HTTP/1.1\r\n\r\n");
    assert!(events.is_empty());
    assert!(!requester.is_http());
}

#[test]
fn body_with_terminator_skipped() {
    let (mut requester, _responder) = new_pair("example.com");

    let mut body = vec![b'b'; 500];
    body[100..104].copy_from_slice(b"\r\n\r\n");
    body[200..224].copy_from_slice(b"GET /fake HTTP/1.1\r\n\r\n\r\n");

    let mut data = b"POST /upload HTTP/1.1\r\nContent-Length: 500\r\n\r\n".to_vec();
    let header_len = data.len();
    data.extend_from_slice(&body);
    data.extend_from_slice(b"GET /next HTTP/1.1\r\n\r\n");

    let events = feed_split(&mut requester, &data, header_len + 10);
    let uris: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            HttpScanEvent::Request(r) => Some(r.uri().to_string()),
            _ => None,
        })
        .collect();
    assert_eq!(uris, vec!["/upload", "/next"]);
    assert_eq!(requester.skip_length(), 0);
}

#[test]
fn not_http() {
    let (mut requester, mut responder) = new_pair("example.com");

    let events = feed_all(&mut requester, b"\x16\x03\x01\x02\x00\x01\x00\x01\xfc\x03\x03\r\n\r\n");
    assert!(matches!(
        events.as_slice(),
        [HttpScanEvent::Abandoned(HttpScanAbandon::ParseFailed(_))]
    ));

    let events = feed_all(&mut responder, b"HTTP/1.1 200 OK\r\n\r\n");
    assert_eq!(
        events,
        vec![HttpScanEvent::Abandoned(HttpScanAbandon::SiblingAbandoned)]
    );
    assert!(feed_all(&mut responder, b"HTTP/1.1 200 OK\r\n\r\n").is_empty());
}
