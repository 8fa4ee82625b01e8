//! URL-safe slug derivation for human-readable names.

use deunicode::deunicode_char;

/// Derive a lowercase, hyphenated slug from `name`.
///
/// Non-ASCII characters are transliterated with `deunicode` (so `Код` becomes
/// `kod` and `Café` becomes `cafe`), `&` reads as `and`, apostrophes vanish,
/// and every other run of characters outside `[a-z0-9]` becomes a single
/// hyphen. Hyphens never lead or trail.
///
/// The result is empty only when `name` has nothing transliterable, such as
/// pure punctuation.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for ch in name.chars() {
        match ch {
            '\'' | '\u{2019}' => continue,
            '&' => push_ascii(&mut slug, &mut pending_hyphen, "and"),
            c if c.is_ascii() => {
                let mut buf = [0; 4];
                push_ascii(&mut slug, &mut pending_hyphen, c.encode_utf8(&mut buf));
            }
            c => match deunicode_char(c) {
                Some(ascii) => push_ascii(&mut slug, &mut pending_hyphen, ascii),
                None => pending_hyphen = true,
            },
        }
    }

    slug
}

/// Append `ascii`, turning anything outside `[A-Za-z0-9]` into a pending hyphen.
fn push_ascii(slug: &mut String, pending_hyphen: &mut bool, ascii: &str) {
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if *pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            *pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            *pending_hyphen = true;
        }
    }
}
