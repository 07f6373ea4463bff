//! Request target translation module
//!
//! Maps a raw HTTP request target onto a path below the served root, plus the
//! small escaping helpers needed to render paths back into HTML and URLs.

use std::path::{Path, PathBuf};

/// Filesystem location a request target resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Path below the root (not yet checked against symlinks)
    pub fs_path: PathBuf,
    /// Whether the request path ended with `/`
    pub trailing_slash: bool,
}

/// Split a request target into path and query, dropping any fragment
pub fn split_target(target: &str) -> (&str, Option<&str>) {
    let target = target.split_once('#').map_or(target, |(before, _)| before);
    match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    }
}

/// Translate a request target into a path below `root`
///
/// The path is percent-decoded and normalized lexically: empty and `.`
/// segments are dropped, `..` removes the previous segment and can never climb
/// above `root`, and segments that still contain a separator are ignored.
pub fn translate_path(root: &Path, target: &str) -> ResolvedPath {
    let (path, _) = split_target(target);
    let trailing_slash = path.trim_end().ends_with('/');
    let decoded = percent_decode(path);

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s if s.contains(['\\', '\0']) || s.contains(std::path::MAIN_SEPARATOR) => {}
            s => segments.push(s),
        }
    }

    let mut fs_path = root.to_path_buf();
    fs_path.extend(segments);

    ResolvedPath {
        fs_path,
        trailing_slash,
    }
}

/// Decode `%XX` escapes; malformed escapes are kept literally
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Percent-encode a path for use in an `href`, keeping `/` and unreserved characters
pub fn percent_encode_path(input: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(input.len());
    for &b in input.as_bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~' | b'/') {
            out.push(char::from(b));
        } else {
            out.push('%');
            out.push(char::from(HEX[usize::from(b >> 4)]));
            out.push(char::from(HEX[usize::from(b & 0x0f)]));
        }
    }
    out
}

/// Escape text for inclusion in HTML element content or quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}
