//! RFC 3986 URI syntax check over the `url` crate.

use url::Url;

use crate::ports::outbound::UriSyntaxChecker;

/// Characters RFC 3986 allows anywhere in a URI, besides ASCII alphanumerics.
const URI_SYMBOLS: &str = ":/?#[]@!$&'()*+,;=.-_~%";

/// Absolute-URI checker.
///
/// Rejects characters outside the RFC 3986 set and malformed percent escapes
/// before handing the string to [`Url::parse`], which then requires a scheme
/// and a well-formed remainder.
#[derive(Debug, Clone, Copy, Default)]
pub struct RfcUriChecker;

impl RfcUriChecker {
    fn has_only_uri_chars(uri: &str) -> bool {
        uri.chars()
            .all(|c| c.is_ascii_alphanumeric() || URI_SYMBOLS.contains(c))
    }

    fn has_valid_escapes(uri: &str) -> bool {
        let bytes = uri.as_bytes();
        bytes.iter().enumerate().all(|(i, &b)| {
            b != b'%'
                || matches!(
                    (bytes.get(i + 1), bytes.get(i + 2)),
                    (Some(hi), Some(lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()
                )
        })
    }
}

impl UriSyntaxChecker for RfcUriChecker {
    fn is_valid_uri(&self, uri: &str) -> bool {
        !uri.is_empty()
            && Self::has_only_uri_chars(uri)
            && Self::has_valid_escapes(uri)
            && Url::parse(uri).is_ok()
    }
}
