/// Parameter keys the repository leaks into visible filenames.
const NOISE_KEYS: &[&str] = &["sequence=", "isallowed=", "origin=", "download="];

/// Best-effort cleanup of a server-supplied filename.
///
/// The repository emits names polluted with query parameters
/// (`q1.pdf?sequence=1&isAllowed=y`), stray quoting and markup whitespace.
/// This strips the noise, whitelists filename-safe characters and
/// guarantees a non-empty, extension-qualified result. It must tolerate
/// adversarial input without panicking; it is not a general sanitizer.
pub fn normalize_filename(raw: &str) -> String {
    let mut name = raw.trim().trim_matches(['"', '\''].as_ref()).to_string();

    // Everything after the first '?' is query-string residue.
    if let Some(idx) = name.find('?') {
        name.truncate(idx);
    }

    name = strip_noise_suffixes(&name);

    if name.trim().is_empty() {
        name = "document".to_string();
    }

    let cleaned: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | ' ' | '.' | '-'))
        .collect();

    let mut name = collapse_whitespace(&cleaned);
    if name.is_empty() {
        name = "document".to_string();
    }
    if !name.contains('.') {
        name.push_str(".pdf");
    }
    name
}

/// Remove `key=value` and `;`-delimited residue that survives the '?'
/// truncation.
fn strip_noise_suffixes(name: &str) -> String {
    let mut out = match name.find(['?', '&', ';']) {
        Some(idx) => name[..idx].to_string(),
        None => name.to_string(),
    };

    // Whitespace-separated residue like "q1.pdf sequence=1".
    loop {
        let Some((at, key_len)) = find_noise_key(&out) else {
            break;
        };
        let ws_start = out[..at].trim_end().len();
        let value_end = out[at + key_len..]
            .find(|c: char| !c.is_alphanumeric())
            .map_or(out.len(), |rel| at + key_len + rel);
        out.replace_range(ws_start..value_end, "");
    }

    out
}

/// Locates the first noise key preceded by whitespace, case-insensitively.
fn find_noise_key(text: &str) -> Option<(usize, usize)> {
    // ASCII lowercasing keeps byte offsets valid in the original string.
    let lower = text.to_ascii_lowercase();
    for key in NOISE_KEYS {
        let mut from = 0;
        while let Some(rel) = lower[from..].find(key) {
            let at = from + rel;
            let preceded = text[..at].chars().next_back().is_some_and(char::is_whitespace);
            if preceded {
                return Some((at, key.len()));
            }
            from = at + key.len();
        }
    }
    None
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_space = false;
    for c in text.chars() {
        if c == ' ' {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(c);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// Pick a fallback extension from a Content-Type header value.
pub fn extension_for_content_type(content_type: &str) -> &'static str {
    let ct = content_type.to_ascii_lowercase();
    if ct.contains("pdf") {
        ".pdf"
    } else if ct.contains("image") {
        ".jpg"
    } else if ct.contains("text") {
        ".txt"
    } else if ct.contains("word") {
        ".doc"
    } else {
        ".pdf"
    }
}

/// Last path segment of a URL, query string included; the normalizer's
/// noise stripping handles the rest.
pub(crate) fn url_tail(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
