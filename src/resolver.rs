//! Redirect-wrapper URL resolution.
//!
//! DuckDuckGo's HTML results link through `duckduckgo.com/l/?uddg=<dest>`
//! rather than directly to the destination. The resolver unwraps those
//! links; everything else passes through untouched.

use url::Url;

/// Resolve a search-result link to its true destination.
///
/// If the URL's host is DuckDuckGo's own redirect host and it carries a
/// `uddg` destination parameter, returns that parameter percent-decoded.
/// Any other URL, and any URL that fails to parse, is returned unchanged.
/// Never fails.
pub fn resolve(raw: &str) -> String {
    let Ok(parsed) = Url::parse(raw) else {
        return raw.to_string();
    };

    let is_redirect_host = parsed
        .host_str()
        .map(|host| host == "duckduckgo.com" || host.ends_with(".duckduckgo.com"))
        .unwrap_or(false);

    if is_redirect_host {
        // query_pairs percent-decodes both key and value.
        if let Some((_, dest)) = parsed.query_pairs().find(|(key, _)| key == "uddg") {
            if !dest.is_empty() {
                return dest.into_owned();
            }
        }
    }

    raw.to_string()
}
