//! # httpfuse-http
//!
//! HTTP byte-range fetching for httpfuse.
//!
//! Every read against a mounted file becomes one [`RangeRequest`]: a GET
//! carrying `Range: bytes=<start>-<end>` (inclusive end). A [`RangeFetcher`]
//! issues it and hands back the status code and raw body as a
//! [`RangeResponse`]. Interpreting the status is left to the caller.
//!
//! ```ignore
//! use httpfuse_http::{ByteRange, RangeFetcher, RangeRequest, ReqwestFetcher};
//!
//! let fetcher = ReqwestFetcher::with_default_timeout()?;
//! let request = RangeRequest::new(
//!     "http://example.com/sample.bam".parse()?,
//!     ByteRange::from_offset_len(0, 4096).unwrap(),
//! );
//!
//! let response = fetcher.fetch(&request)?;
//! if response.is_success() {
//!     println!("got {} bytes", response.body.len());
//! }
//! ```

pub mod error;
pub mod fetcher;
pub mod types;

pub use error::Error;
pub use fetcher::{RangeFetcher, ReqwestFetcher};
pub use types::{ByteRange, RangeRequest, RangeResponse};

#[cfg(any(test, feature = "test-utils"))]
pub use fetcher::mock::MockFetcher;
