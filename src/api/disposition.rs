// Save-name derivation for binary downloads.
use regex::Regex;
use std::sync::OnceLock;

pub const FALLBACK_FILENAME: &str = "file.pdf";

static FILENAME_RE: OnceLock<Regex> = OnceLock::new();

fn filename_re() -> &'static Regex {
    FILENAME_RE.get_or_init(|| Regex::new(r#"filename="([^"]+)""#).expect("valid filename pattern"))
}

/// Filename from a `Content-Disposition` header value, URI-decoded.
/// Falls back to [`FALLBACK_FILENAME`] when the header is missing, has no
/// quoted `filename`, or the value doesn't decode.
pub fn filename_from_disposition(header: Option<&str>) -> String {
    header
        .and_then(|value| filename_re().captures(value))
        .and_then(|caps| caps.get(1))
        .and_then(|m| percent_decode(m.as_str()))
        .map(|name| sanitize(&name))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}

/// Strict percent-decoding: a truncated or non-hex escape, or bytes that
/// aren't UTF-8, reject the whole value.
fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            let hi = (hex[0] as char).to_digit(16)?;
            let lo = (hex[1] as char).to_digit(16)?;
            out.push(((hi << 4) | lo) as u8);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

// Only the final path component is kept so a header can't steer the write
// outside the download folder.
fn sanitize(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default();
    if last == "." || last == ".." {
        String::new()
    } else {
        last.trim().to_string()
    }
}
