//! Line classification shared by the SSH and git config readers.
//!
//! Both readers are best-effort: they recognise the handful of constructs
//! this tool writes and skip everything else.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Blank,
    Comment,
    /// `[...]` header, brackets removed.
    Section(&'a str),
    Entry { key: &'a str, value: &'a str },
}

/// Classify a git config line (`[section]`, `key = value`, `#`/`;` comments).
pub fn git_line(raw: &str) -> Line<'_> {
    let line = raw.trim();
    if line.is_empty() {
        return Line::Blank;
    }
    if line.starts_with('#') || line.starts_with(';') {
        return Line::Comment;
    }
    if let Some(rest) = line.strip_prefix('[') {
        let inner = match rest.rfind(']') {
            Some(end) => &rest[..end],
            None => rest,
        };
        return Line::Section(inner.trim());
    }
    match line.split_once('=') {
        Some((key, value)) => Line::Entry {
            key: key.trim(),
            value: unquote(value.trim()),
        },
        // Bare boolean key
        None => Line::Entry {
            key: line,
            value: "",
        },
    }
}

/// Classify an ssh_config line (`Keyword value` or `Keyword=value`).
pub fn ssh_line(raw: &str) -> Line<'_> {
    let line = raw.trim();
    if line.is_empty() {
        return Line::Blank;
    }
    if line.starts_with('#') {
        return Line::Comment;
    }

    let split_at = line
        .find(|c: char| c.is_whitespace() || c == '=')
        .unwrap_or(line.len());
    let (key, rest) = line.split_at(split_at);
    let value = rest
        .trim_start()
        .strip_prefix('=')
        .unwrap_or(rest)
        .trim();
    Line::Entry {
        key,
        value: unquote(value),
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
