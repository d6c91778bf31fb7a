/// Text helpers shared by the content loader and the search index.
///
/// `normalize` is applied identically to query terms and indexed fields so
/// matching ignores case and accents.
use unicode_normalization::UnicodeNormalization;

const COMBINING_MARKS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036f}';

/// Lowercase, strip combining diacritical marks (after canonical
/// decomposition) and trim surrounding whitespace.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .nfd()
        .filter(|c| !COMBINING_MARKS.contains(c))
        .collect();
    stripped.to_lowercase().trim().to_string()
}

/// Turn a heading into a URL fragment, e.g. "Pourquoi écrire le test ?" ->
/// "pourquoi-ecrire-le-test".
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in normalize(text).chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}
