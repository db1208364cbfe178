//! URL slugs for articles and tags.

use shared_types::RecordId;

/// Lowercase ASCII alphanumerics joined by single dashes, at most `max_len` bytes.
///
/// Returns an empty string when the input has no ASCII alphanumerics.
pub fn slugify(text: &str, max_len: usize) -> String {
    join_words(text, max_len, |c| c.is_ascii_alphanumeric())
}

/// Slug for a tag name. Keeps non-ASCII letters so Arabic tags get a key.
pub fn tag_slug(name: &str) -> String {
    join_words(name, usize::MAX, char::is_alphanumeric)
}

/// Fallback slug when the title yields nothing usable.
pub fn fallback_slug(id: RecordId) -> String {
    format!("article-{}", id.short())
}

/// Candidates `base`, `base-2`, `base-3`… up to `max_attempts` entries.
pub fn slug_candidates(base: &str, max_attempts: u32) -> impl Iterator<Item = String> + '_ {
    std::iter::once(base.to_string())
        .chain((2..=max_attempts).map(move |n| format!("{}-{}", base, n)))
}

fn join_words(text: &str, max_len: usize, keep: impl Fn(char) -> bool) -> String {
    let mut out = String::new();
    let mut pending_dash = false;

    for c in text.chars() {
        if keep(c) {
            if pending_dash && !out.is_empty() {
                if out.len() + 1 >= max_len {
                    break;
                }
                out.push('-');
            }
            pending_dash = false;
            let lower: String = c.to_lowercase().collect();
            if out.len() + lower.len() > max_len {
                break;
            }
            out.push_str(&lower);
        } else {
            pending_dash = true;
        }
    }

    out
}
