//! HTML media extractor
//!
//! Pulls image and video source references out of a page. Parsing is done
//! with html5ever (via `scraper`), which recovers from any malformed input,
//! so extraction never fails: garbage simply yields nothing.

use crate::media::{MediaKind, MediaTriple};
use scraper::{Html, Selector};

/// Extracts media references from an HTML document
///
/// # Extraction Rules
///
/// **Include:**
/// - `<img src="...">` as `IMAGE`
/// - `<source src="...">` nested anywhere inside a `<video>` as `VIDEO`
///
/// **Exclude:**
/// - Any value not starting with `http://` or `https://` after trimming
///   (relative, protocol-relative `//host/...`, `data:` and `blob:` URLs)
///
/// Images come first, then videos; each kind keeps document order.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `source_url` - The page URL, copied into every triple
///
/// # Example
///
/// ```
/// use media_harvester::ingest::extract_media;
/// use media_harvester::MediaKind;
///
/// let html = r#"<img src="https://a/b.png"><img src="rel.png">"#;
/// let found = extract_media(html, "https://a/");
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].kind, MediaKind::Image);
/// ```
pub fn extract_media(html: &str, source_url: &str) -> Vec<MediaTriple> {
    let document = Html::parse_document(html);

    let mut found = collect(&document, "img[src]", MediaKind::Image, source_url);
    found.extend(collect(
        &document,
        "video source[src]",
        MediaKind::Video,
        source_url,
    ));
    found
}

fn collect(document: &Html, selector: &str, kind: MediaKind, source_url: &str) -> Vec<MediaTriple> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("src"))
        .filter_map(absolute_media_url)
        .map(|media_url| MediaTriple::new(source_url, media_url, kind))
        .collect()
}

/// Returns the trimmed value if it is an absolute http(s) URL
fn absolute_media_url(src: &str) -> Option<&str> {
    let src = src.trim();
    if src.starts_with("http://") || src.starts_with("https://") {
        Some(src)
    } else {
        None
    }
}
