//! Base URL resolution

/// Whether `url` carries its own scheme (`https://...`) or is protocol-relative (`//host`)
#[must_use]
pub fn is_absolute(url: &str) -> bool {
    if url.starts_with("//") {
        return true;
    }
    let Some((scheme, rest)) = url.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    let valid_scheme = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    valid_scheme && rest.starts_with("//")
}

/// Resolve `url` against an optional base
///
/// Absolute URLs are returned unchanged. Otherwise the base and the path are
/// joined with exactly one `/`. Without a base the path is returned as given.
#[must_use]
pub fn resolve(base: Option<&str>, url: &str) -> String {
    match base {
        Some(base) if !base.is_empty() && !is_absolute(url) => {
            let base = base.trim_end_matches('/');
            let path = url.trim_start_matches('/');
            if path.is_empty() {
                base.to_string()
            } else {
                format!("{base}/{path}")
            }
        },
        _ => url.to_string(),
    }
}
