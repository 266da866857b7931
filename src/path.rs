//! Path decomposition
//!
//! Pure helpers over slash-separated paths. Every function here works on the
//! normalized form: no leading or trailing separator, no empty segments.

const SEPARATOR: char = '/';

/// Trim separators and collapse empty segments.
pub fn normalize(path: &str) -> String {
    path.split(SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Join two paths and normalize the result.
pub fn join(base: &str, rest: &str) -> String {
    normalize(&format!("{}/{}", base, rest))
}

/// Split a normalized path into (parent, base name). The parent of a single
/// segment is the empty path.
pub fn split_parent(path: &str) -> (&str, &str) {
    match path.rfind(SEPARATOR) {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    }
}

/// Split a path into its first segment (the repository) and the remainder.
pub fn split_repository(path: &str) -> (String, String) {
    let normalized = normalize(path);
    match normalized.split_once(SEPARATOR) {
        Some((repository, rest)) => (repository.to_string(), rest.to_string()),
        None => (normalized, String::new()),
    }
}

/// Ancestors of a normalized path, from the immediate parent up to the first
/// segment. The empty path is never yielded.
pub fn ancestors(path: &str) -> Ancestors<'_> {
    Ancestors { rest: path }
}

/// Iterator returned by [`ancestors`]; each item is strictly shorter than the last.
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let idx = self.rest.rfind(SEPARATOR)?;
        self.rest = &self.rest[..idx];
        Some(self.rest)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.rest.matches(SEPARATOR).count();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Ancestors<'_> {}

/// Express a normalized key relative to a normalized root. Returns None when
/// the key is outside the root.
pub fn rebase(key: &str, root: &str) -> Option<String> {
    if root.is_empty() {
        return Some(key.to_string());
    }
    if key == root {
        return Some(String::new());
    }
    key.strip_prefix(root)
        .and_then(|rest| rest.strip_prefix(SEPARATOR))
        .map(str::to_string)
}
