//! Filesystem-safe identifiers derived from dataset titles
//!
//! Dataset titles in the catalog are Portuguese prose ("Catálogo de Teses e
//! Dissertações"). Downloads are grouped into one directory per dataset, named
//! by the slug of its title.

use unicode_normalization::UnicodeNormalization;

/// Convert arbitrary text into a slug matching `[a-z0-9]+(-[a-z0-9]+)*`
///
/// The text is lowercased and canonically decomposed, every non-ASCII
/// remnant (combining accents included) is dropped, each run of characters
/// outside `[a-z0-9]` collapses into one hyphen and leading/trailing hyphens
/// are trimmed. Text without any ASCII alphanumeric yields an empty string.
///
/// # Examples
///
/// ```
/// use capes_fetcher::app::slugify;
///
/// assert_eq!(
///     slugify("Catálogo de Teses e Dissertações"),
///     "catalogo-de-teses-e-dissertacoes"
/// );
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    let ascii = text
        .to_lowercase()
        .nfd()
        .filter(char::is_ascii)
        .map(|c| c.to_ascii_lowercase())
        .collect::<Vec<_>>();

    for c in ascii {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }

    slug
}
