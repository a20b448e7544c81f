//! HTTP transport seam
//!
//! The updater only ever issues plain GET requests. Everything it needs from
//! the network goes through [`HttpClient`], so tests can swap in
//! [`mock::MockHttpClient`] and production code uses [`ReqwestHttpClient`].

use bytes::Bytes;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum HttpError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Request timeout: {0}")]
    Timeout(String),
    #[error("Server error ({status}) for {url}")]
    Status { status: u16, url: String },
    #[error("HTTP error: {0}")]
    Other(String),
}

/// Response wrapper
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Turn a non-2xx response into an error
    pub fn error_for_status(self, url: &str) -> Result<Self, HttpError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(HttpError::Status {
                status: self.status,
                url: url.to_string(),
            })
        }
    }
}

/// Blocking GET client used by the updater.
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str) -> Result<Response, HttpError>;
}

/// Production client backed by `reqwest::blocking`
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::blocking::Client,
}

impl ReqwestHttpClient {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, HttpError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(Self::convert_error)?;
        Ok(Self { client })
    }

    fn convert_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else if err.is_connect() {
            HttpError::ConnectionFailed(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }
}

impl HttpClient for ReqwestHttpClient {
    fn get(&self, url: &str) -> Result<Response, HttpError> {
        let response = self.client.get(url).send().map_err(Self::convert_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(Self::convert_error)?;
        Ok(Response { status, body })
    }
}

pub mod mock {
    //! In-memory transport for tests.

    use super::{HttpClient, HttpError, Response};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Debug, Clone)]
    pub enum MockResponse {
        Success(Response),
        Error(HttpError),
    }

    /// Returns canned responses by exact URL and records every request.
    /// URLs with no canned response fail with a 404.
    #[derive(Debug, Clone, Default)]
    pub struct MockHttpClient {
        responses: Arc<Mutex<HashMap<String, MockResponse>>>,
        requests: Arc<Mutex<Vec<String>>>,
        delay: Option<Duration>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        /// Sleep on every request, to widen race windows in concurrency tests
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn set_response(&self, url: &str, response: MockResponse) {
            lock(&self.responses).insert(url.to_string(), response);
        }

        pub fn set_body(&self, url: &str, body: impl Into<bytes::Bytes>) {
            self.set_response(url, MockResponse::Success(Response::new(200, body)));
        }

        pub fn set_json(&self, url: &str, value: serde_json::Value) {
            self.set_body(url, value.to_string());
        }

        pub fn set_error(&self, url: &str, error: HttpError) {
            self.set_response(url, MockResponse::Error(error));
        }

        pub fn requests(&self) -> Vec<String> {
            lock(&self.requests).clone()
        }

        pub fn request_count(&self) -> usize {
            lock(&self.requests).len()
        }
    }

    impl HttpClient for MockHttpClient {
        fn get(&self, url: &str) -> Result<Response, HttpError> {
            lock(&self.requests).push(url.to_string());
            if let Some(delay) = self.delay {
                std::thread::sleep(delay);
            }
            match lock(&self.responses).get(url) {
                Some(MockResponse::Success(response)) => Ok(response.clone()),
                Some(MockResponse::Error(error)) => Err(error.clone()),
                None => Ok(Response::new(404, "Not Found")),
            }
        }
    }

    fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
