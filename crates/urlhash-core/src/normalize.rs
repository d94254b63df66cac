//! Input URL normalization.

/// Scheme prepended to inputs that do not already look like HTTP URLs.
const DEFAULT_SCHEME: &str = "http://";

/// Ensures `raw` carries a scheme before it is fetched.
///
/// Anything that starts with the literal prefix `http` (case-sensitive) is
/// returned unchanged, so both `http://` and `https://` inputs pass through,
/// and so does something like `httpbin.org`. Everything else gets `http://`
/// prepended. No URL validation happens here; malformed results surface later
/// as request errors.
pub fn normalize_url(raw: &str) -> String {
    if raw.starts_with("http") {
        raw.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME, raw)
    }
}
