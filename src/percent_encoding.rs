//! Module for handling the [`percent_encoding`] crate.

use std::borrow::Cow;

use percent_encoding::{
    percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS, NON_ALPHANUMERIC,
};

/// All ASCII characters in the [component percent-encode
/// set](https://url.spec.whatwg.org/#component-percent-encode-set).
///
/// Using this with [`utf8_percent_encode`] gives identical results to JavaScript's
/// [`encodeURIComponent`](https://developer.mozilla.org/docs/Web/JavaScript/Reference/Global_Objects/encodeURIComponent).
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// The ASCII characters that can't appear in an HTTP header value unencoded.
const HEADER_UNSAFE: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`');

/// Percent-encodes a string so it can be used as a single path segment of a URL.
pub(crate) fn encode_segment(segment: &str) -> Cow<'_, str> {
    utf8_percent_encode(segment, COMPONENT).into()
}

/// Percent-encodes the characters of a URL that aren't allowed in a `Location` header, leaving
/// everything else (including existing percent-encoding) alone.
pub(crate) fn encode_location(url: &str) -> Cow<'_, str> {
    utf8_percent_encode(url, HEADER_UNSAFE).into()
}

/// Percent-decodes a path segment of a request URI.
///
/// Returns `None` if the result isn't valid UTF-8 or contains a null byte. Decoding can turn `%00`
/// into a null byte, so it's rejected rather than passed on.
pub(crate) fn decode_segment(segment: &str) -> Option<Cow<'_, str>> {
    let decoded = percent_decode_str(segment).decode_utf8().ok()?;

    (!decoded.contains('\x00')).then_some(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_like_encode_uri_component() {
        assert_eq!(encode_segment("hhgttg"), "hhgttg");
        assert_eq!(encode_segment("a/b c"), "a%2Fb%20c");
        assert_eq!(encode_segment("examplé.com"), "exampl%C3%A9.com");
    }

    #[test]
    fn encodes_locations() {
        assert_eq!(encode_location("http://example.com/a%20b?c=d"), "http://example.com/a%20b?c=d");
        assert_eq!(encode_location("http://examplé.com/a b"), "http://exampl%C3%A9.com/a%20b");
        assert_eq!(encode_location("http://example.com/\r\n"), "http://example.com/%0D%0A");
    }

    #[test]
    fn decodes_segments() {
        assert_eq!(decode_segment("chapter%201.txt").as_deref(), Some("chapter 1.txt"));
        assert_eq!(decode_segment("%E2%9C%93").as_deref(), Some("✓"));
        assert_eq!(decode_segment("%FF"), None);
        assert_eq!(decode_segment("null%00byte"), None);
    }
}
