//! URL slug derivation for catalog entries.

/// Convert a display name to a URL-friendly slug.
///
/// Lowercases ASCII, collapses every run of characters outside `[a-z0-9]`
/// into a single `-`, and trims leading and trailing dashes.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            pending_dash = true;
        }
    }
    out
}
