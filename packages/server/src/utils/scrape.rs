use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;

/// Extensions accepted when filtering scraped image URLs.
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

static IMG_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<img[^>]+src=["']([^"']+)["']"#).unwrap());
static IMG_DATA_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<img[^>]+data-src=["']([^"']+)["']"#).unwrap());
static SOURCE_SRCSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<source[^>]+srcset=["']([^"']+)["']"#).unwrap());

/// Collect candidate image URLs from raw HTML.
///
/// Matches `<img src>`, `<img data-src>` and `<source srcset>` attribute
/// values, resolves each against the page URL and keeps only those whose
/// path extension is an allowed image type. Returns absolute, deduplicated
/// URLs in no particular order.
pub fn extract_image_urls(base: &Url, html: &str) -> HashSet<String> {
    let mut found = HashSet::new();

    for pattern in [&*IMG_SRC, &*IMG_DATA_SRC, &*SOURCE_SRCSET] {
        for capture in pattern.captures_iter(html) {
            let raw = capture[1].trim();

            // srcset lists candidates with width/density descriptors; only
            // the first URL is taken.
            let Some(candidate) = raw.split(',').next().and_then(|c| c.split_whitespace().next())
            else {
                continue;
            };

            let Ok(absolute) = base.join(candidate) else {
                continue;
            };

            if has_allowed_extension(absolute.path()) {
                found.insert(absolute.to_string());
            }
        }
    }

    found
}

fn has_allowed_extension(path: &str) -> bool {
    match path.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}
