use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static LINK_SELECTORS: Lazy<[Selector; 3]> = Lazy::new(|| {
    ["a[href]", "link[href]", "base[href]"]
        .map(|css| Selector::parse(css).expect("static selector is valid"))
});

/// Raw `href` values from anchor, link and base tags, anchors first, each
/// group in document order.
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    LINK_SELECTORS
        .iter()
        .flat_map(|selector| document.select(selector))
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
