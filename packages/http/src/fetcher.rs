//! Range fetching abstraction.
//!
//! [`RangeFetcher`] is the only way the filesystem talks to the network, so
//! tests can swap in [`mock::MockFetcher`] instead of a live server.

use std::time::Duration;

use http::header::{HeaderValue, RANGE};
use reqwest::blocking::Client;

use crate::error::Error;
use crate::types::{RangeRequest, RangeResponse};

/// Trait for fetching one byte range of a URL.
///
/// Implementations block until the whole response body has arrived.
pub trait RangeFetcher: Send + Sync {
    /// Issue exactly one request for `request.range`.
    ///
    /// Any HTTP status counts as a response; `Err` is reserved for
    /// transport failures where no status was received.
    fn fetch(&self, request: &RangeRequest) -> Result<RangeResponse, Error>;
}

/// Production fetcher using reqwest's blocking client.
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    /// Create a new fetcher with the given timeout.
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Create with default timeout of 30 seconds.
    pub fn with_default_timeout() -> Result<Self, Error> {
        Self::new(Duration::from_secs(30))
    }

    /// Use a preconfigured reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl RangeFetcher for ReqwestFetcher {
    fn fetch(&self, request: &RangeRequest) -> Result<RangeResponse, Error> {
        let range = HeaderValue::try_from(request.range.header_value())?;

        tracing::trace!(url = %request.url, range = %request.range, "fetching range");

        let response = self
            .client
            .get(request.url.clone())
            .header(RANGE, range)
            .send()?;

        let status = response.status().as_u16();
        let body = response.bytes()?;

        Ok(RangeResponse { status, body })
    }
}

impl<T: RangeFetcher + ?Sized> RangeFetcher for std::sync::Arc<T> {
    fn fetch(&self, request: &RangeRequest) -> Result<RangeResponse, Error> {
        (**self).fetch(request)
    }
}

/// Mock fetcher for testing.
///
/// Returns predefined responses keyed by URL and records every request.
#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// A mock fetcher that returns predefined responses.
    #[derive(Clone, Default)]
    pub struct MockFetcher {
        /// Responses keyed by URL.
        responses: Arc<Mutex<HashMap<String, RangeResponse>>>,
        /// Default response when no URL matches.
        default_response: Arc<Mutex<Option<RangeResponse>>>,
        /// Serve the requested slice of this content with 206 for any URL.
        content: Arc<Mutex<Option<bytes::Bytes>>>,
        /// Recorded requests for verification.
        recorded_requests: Arc<Mutex<Vec<RangeRequest>>>,
        /// Transport error message, if all requests should fail.
        failure: Arc<Mutex<Option<String>>>,
    }

    impl MockFetcher {
        /// Create a new mock fetcher.
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a response for a specific URL.
        pub fn with_response(self, url: impl Into<String>, response: RangeResponse) -> Self {
            self.responses.lock().unwrap().insert(url.into(), response);
            self
        }

        /// Set a default response when no URL matches.
        pub fn with_default_response(self, response: RangeResponse) -> Self {
            *self.default_response.lock().unwrap() = Some(response);
            self
        }

        /// Answer unmatched requests like a range-aware origin serving
        /// `content`: 206 with the requested slice, or 416 past the end.
        pub fn with_content(self, content: impl Into<bytes::Bytes>) -> Self {
            *self.content.lock().unwrap() = Some(content.into());
            self
        }

        /// Configure to fail all requests with a transport error.
        pub fn fail_with(self, message: impl Into<String>) -> Self {
            *self.failure.lock().unwrap() = Some(message.into());
            self
        }

        /// Get all recorded requests.
        pub fn recorded_requests(&self) -> Vec<RangeRequest> {
            self.recorded_requests.lock().unwrap().clone()
        }

        /// Clear recorded requests.
        pub fn clear_recorded(&self) {
            self.recorded_requests.lock().unwrap().clear();
        }

        fn serve_slice(content: &bytes::Bytes, request: &RangeRequest) -> RangeResponse {
            let len = content.len() as u64;
            if request.range.start >= len {
                return RangeResponse::new(416, "Range Not Satisfiable");
            }
            let end = request.range.end.min(len - 1);
            let body = content.slice(request.range.start as usize..=end as usize);
            RangeResponse::new(206, body)
        }
    }

    impl RangeFetcher for MockFetcher {
        fn fetch(&self, request: &RangeRequest) -> Result<RangeResponse, Error> {
            self.recorded_requests.lock().unwrap().push(request.clone());

            if let Some(message) = self.failure.lock().unwrap().clone() {
                return Err(Error::Transport { message });
            }

            if let Some(response) = self.responses.lock().unwrap().get(request.url.as_str()) {
                return Ok(response.clone());
            }

            if let Some(ref content) = *self.content.lock().unwrap() {
                return Ok(Self::serve_slice(content, request));
            }

            if let Some(ref response) = *self.default_response.lock().unwrap() {
                return Ok(response.clone());
            }

            Ok(RangeResponse::new(404, "Not Found"))
        }
    }
}
