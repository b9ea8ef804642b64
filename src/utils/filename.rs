// Upload filename handling

use unicode_normalization::UnicodeNormalization;

/// Reduce a client-supplied filename to a safe, flat ASCII name.
///
/// Compatibility-decomposes and drops non-ASCII, turns `/` into a space,
/// joins whitespace-separated parts with `_`, removes anything outside
/// `[A-Za-z0-9_.-]` (a `\` is dropped, not treated as a separator) and
/// strips leading/trailing `.` and `_`. May return an empty string.
pub fn sanitize_filename(filename: &str) -> String {
    let ascii: String = filename.nfkd().filter(char::is_ascii).collect();
    let ascii = ascii.replace('/', " ");
    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// Name without its last extension
pub fn file_stem(filename: &str) -> &str {
    filename.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(filename)
}

/// Whether a requested name may be looked up inside a storage directory
pub fn is_safe_lookup_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '\0'])
}
