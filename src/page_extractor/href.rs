//! Href normalization against a base URL

/// True when `href` starts with a URI scheme (`https:`, `mailto:`, `blob:` ...)
///
/// A scheme is an ASCII letter followed by letters, digits, `+`, `-` or `.`,
/// terminated by a `:` that comes before any `/`, `?` or `#`.
pub fn has_scheme(href: &str) -> bool {
    let Some(colon) = href.find(':') else {
        return false;
    };
    let scheme = &href[..colon];
    let mut chars = scheme.chars();

    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Turn `href` into an absolute URL using `base`
///
/// Hrefs that already carry a scheme are returned unchanged. Everything else
/// is appended to `base` with exactly one `/` between them.
pub fn normalize_url(href: &str, base: &str) -> String {
    if has_scheme(href) {
        return href.to_string();
    }

    let base = base.trim_end_matches('/');
    if href.starts_with('/') {
        format!("{base}{href}")
    } else {
        format!("{base}/{href}")
    }
}

/// Scheme, host and port of `url`, without a trailing slash
///
/// `None` when `url` does not parse or has no host.
pub fn origin_of(url: &str) -> Option<String> {
    let parsed = ::url::Url::parse(url).ok()?;
    match parsed.origin() {
        origin @ ::url::Origin::Tuple(..) => Some(origin.ascii_serialization()),
        ::url::Origin::Opaque(_) => None,
    }
}
