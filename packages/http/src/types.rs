use std::borrow::Cow;
use std::fmt;

use bytes::Bytes;
use url::Url;

/// An inclusive byte range, as carried in a `Range` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte offset.
    pub start: u64,
    /// Last byte offset (inclusive).
    pub end: u64,
}

impl ByteRange {
    /// Range covering `len` bytes starting at `offset`.
    ///
    /// Returns `None` for an empty range or one whose end overflows `u64`.
    pub fn from_offset_len(offset: u64, len: u64) -> Option<Self> {
        let last = len.checked_sub(1)?;
        let end = offset.checked_add(last)?;
        Some(Self { start: offset, end })
    }

    /// Number of bytes covered.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `bytes=<start>-<end>`
    pub fn header_value(&self) -> String {
        format!("bytes={}-{}", self.start, self.end)
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A GET for one byte range of a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRequest {
    pub url: Url,
    pub range: ByteRange,
}

impl RangeRequest {
    pub fn new(url: Url, range: ByteRange) -> Self {
        Self { url, range }
    }
}

/// Response to a [`RangeRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeResponse {
    /// HTTP status code
    pub status: u16,

    /// Raw response body
    pub body: Bytes,
}

impl RangeResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Check if the response status indicates success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, with invalid sequences replaced.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// At most `max` leading bytes of the body, without copying.
    pub fn into_truncated_body(self, max: usize) -> Bytes {
        let mut body = self.body;
        body.truncate(max);
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_from_offset_len() {
        let r = ByteRange::from_offset_len(0, 100).unwrap();
        assert_eq!(r, ByteRange { start: 0, end: 99 });
        assert_eq!(r.len(), 100);
        assert_eq!(r.header_value(), "bytes=0-99");

        let r = ByteRange::from_offset_len(4096, 1).unwrap();
        assert_eq!(r.header_value(), "bytes=4096-4096");
    }

    #[test]
    fn empty_or_overflowing_range_is_none() {
        assert!(ByteRange::from_offset_len(10, 0).is_none());
        assert!(ByteRange::from_offset_len(u64::MAX, 2).is_none());
        assert!(ByteRange::from_offset_len(u64::MAX, 1).is_some());
    }

    #[test]
    fn success_is_any_2xx() {
        assert!(RangeResponse::new(200, "").is_success());
        assert!(RangeResponse::new(206, "").is_success());
        assert!(RangeResponse::new(299, "").is_success());
        assert!(!RangeResponse::new(199, "").is_success());
        assert!(!RangeResponse::new(416, "").is_success());
        assert!(!RangeResponse::new(500, "").is_success());
    }

    #[test]
    fn truncation_clamps_long_bodies() {
        let resp = RangeResponse::new(200, "hello world");
        assert_eq!(resp.into_truncated_body(5), Bytes::from_static(b"hello"));

        let resp = RangeResponse::new(200, "hi");
        assert_eq!(resp.into_truncated_body(5), Bytes::from_static(b"hi"));
    }

    #[test]
    fn body_text_is_lossy() {
        let resp = RangeResponse::new(500, vec![b'o', b'k', 0xff]);
        assert_eq!(resp.body_text(), "ok\u{fffd}");
    }
}
