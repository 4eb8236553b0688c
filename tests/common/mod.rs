#![allow(dead_code)]

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use endomondo_sync::TransportError;
use endomondo_sync::codec::gunzip;
use endomondo_sync::config::ApiConfig;
use endomondo_sync::transport::{HttpRequest, HttpResponse, HttpTransport};
use std::cell::RefCell;
use std::collections::VecDeque;

pub const BASE_URL: &str = "http://endomondo.test/mobile";

pub fn config() -> ApiConfig {
    ApiConfig::with_base_url(BASE_URL)
}

/// Replays canned replies in order and records every request.
#[derive(Default)]
pub struct FakeTransport {
    replies: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, body: &str) -> Self {
        self.replies.borrow_mut().push_back(Ok(HttpResponse {
            status: 200,
            body: body.as_bytes().to_vec(),
        }));
        self
    }

    pub fn reply_times(self, body: &str, n: usize) -> Self {
        (0..n).fold(self, |t, _| t.reply(body))
    }

    pub fn fail_status(self, status: u16) -> Self {
        self.replies
            .borrow_mut()
            .push_back(Err(TransportError::Status {
                status,
                url: BASE_URL.to_string(),
                body: String::new(),
            }));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.replies.borrow().len()
    }
}

impl HttpTransport for FakeTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.clone();
        self.requests.borrow_mut().push(request);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("no canned reply left for {url}"))
    }
}

/// The newline-separated lines of a posted gzip body.
pub fn posted_lines(request: &HttpRequest) -> Vec<String> {
    let body = request.body.as_deref().expect("request has a body");
    let text = String::from_utf8(gunzip(body).expect("gzip body")).expect("utf-8 body");
    text.split('\n').map(str::to_string).collect()
}

pub fn at(secs: i64) -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0).unwrap().fixed_offset() + chrono::Duration::seconds(secs)
}
