//! Turning raw link text into [`Endpoint`]s.
//!
//! Parsing is deliberately lenient: anything the grammar does not match ends
//! up as an empty field, never as an error. Callers drop endpoints that came
//! out without a host (see [`Endpoint::is_usable`]).

use crate::endpoint::{Endpoint, Scheme};
use once_cell::sync::Lazy;
use regex::Regex;

static URL_GRAMMAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<scheme>https?://)?(?P<host>[-a-zA-Z0-9.]*)(?P<port>:\d{1,4})?(?P<path>[/.%_\-a-zA-Z0-9]*)(?P<params>[?,#].*)?",
    )
    .expect("URL grammar is a valid regex")
});

/// Decompose `raw` into scheme, host, port, path and query/fragment.
pub fn parse(raw: &str) -> Endpoint {
    let raw = raw.trim();
    let Some(caps) = URL_GRAMMAR.captures(raw) else {
        return Endpoint::default();
    };
    let field = |name: &str| caps.name(name).map(|m| m.as_str()).unwrap_or("");

    Endpoint::from_parts(
        Scheme::from_prefix(field("scheme")),
        field("host"),
        field("port"),
        field("path"),
        field("params"),
    )
}

/// Resolve a reference found on the page at `base`.
///
/// Absolute references (containing `://`) are parsed on their own. Everything
/// else is joined onto the base's scheme, host and port:
///
/// - `./x` joins onto the base directory
/// - `../x` joins onto the parent of the base directory (one level only)
/// - `/x` replaces the path
/// - `#x` keeps the base resource and query, replacing the fragment
/// - a bare `x` is a sibling within the base directory
///
/// The base directory is the base path itself, unless that path names a file
/// (contains a dot), in which case its last segment is dropped.
pub fn resolve(raw: &str, base: &Endpoint) -> Endpoint {
    let raw = raw.trim();
    if raw.contains("://") {
        return parse(raw);
    }
    if raw.is_empty() {
        return parse(&base.to_string());
    }

    let dir = base_directory(base);
    let path = if let Some(rest) = raw.strip_prefix('.').filter(|r| r.starts_with('/')) {
        join_at_slash(dir, rest)
    } else if let Some(rest) = raw.strip_prefix("../") {
        format!("{}/{}", parent_directory(dir), rest)
    } else if raw == ".." {
        format!("{}/", parent_directory(dir))
    } else if raw.starts_with('/') {
        raw.to_string()
    } else if raw.starts_with('#') {
        format!("{}{}{}", base.path(), strip_fragment(base.query()), raw)
    } else if raw.contains(':') {
        // mailto:, javascript:, tel: and friends
        return Endpoint::default();
    } else if dir.ends_with('/') {
        format!("{}{}", dir, raw)
    } else {
        format!("{}/{}", dir, raw)
    };

    parse(&format!("{}{}", base.origin_prefix(), path))
}

/// Join `path` and `segment` with exactly one slash between them, treating an
/// empty `path` as the root. Shared by link resolution and directory guessing.
pub fn join_path(path: &str, segment: &str) -> String {
    match (path.ends_with('/'), segment.starts_with('/')) {
        (true, true) => format!("{}{}", path, &segment[1..]),
        (false, false) => format!("{}/{}", path, segment),
        _ => format!("{}{}", path, segment),
    }
}

fn base_directory(base: &Endpoint) -> &str {
    if base.looks_like_file() {
        drop_last_segment(base.path())
    } else {
        base.path()
    }
}

fn parent_directory(dir: &str) -> &str {
    drop_last_segment(dir.trim_end_matches('/'))
}

/// `/a/b/page.html` -> `/a/b`, `/a/` -> `/a`, `page` -> ``
fn drop_last_segment(path: &str) -> &str {
    path.rfind('/').map_or("", |idx| &path[..idx])
}

fn join_at_slash(dir: &str, rest: &str) -> String {
    match dir.strip_suffix('/') {
        Some(trimmed) => format!("{}{}", trimmed, rest),
        None => format!("{}{}", dir, rest),
    }
}

fn strip_fragment(query: &str) -> &str {
    query.find('#').map_or(query, |idx| &query[..idx])
}
