//! Paragraph text extraction from article HTML.

use scraper::{ElementRef, Html, Selector};

use crate::errors::ServiceError;

/// Elements whose content never counts as article text.
const EXCLUDED_TAGS: [&str; 5] = ["script", "style", "nav", "header", "footer"];

/// Extracts the visible paragraph text of an HTML page's first `<article>`.
#[derive(Clone)]
pub struct ArticleExtractor {
    article: Selector,
    paragraph: Selector,
}

impl ArticleExtractor {
    pub fn new() -> Result<Self, ServiceError> {
        Ok(Self {
            article: parse_selector("article")?,
            paragraph: parse_selector("p")?,
        })
    }

    /// Extract article text from `html`, keeping at most `max_chars` characters.
    ///
    /// Each paragraph's text nodes are trimmed and concatenated, and paragraphs
    /// are joined with a single space. Paragraphs and text inside script,
    /// style, navigation, header and footer elements are dropped.
    ///
    /// Returns `None` when the page has no `<article>` element.
    pub fn extract(&self, html: &str, max_chars: usize) -> Option<String> {
        let document = Html::parse_document(html);
        let article = document.select(&self.article).next()?;

        let paragraphs: Vec<String> = article
            .select(&self.paragraph)
            .filter(|paragraph| !is_hidden(paragraph, &article))
            .map(paragraph_text)
            .collect();

        Some(paragraphs.join(" ").chars().take(max_chars).collect())
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ServiceError> {
    Selector::parse(selector)
        .map_err(|e| ServiceError::config(format!("Invalid selector {:?}: {}", selector, e)))
}

/// Whether `element` sits inside an excluded element below `root`.
fn is_hidden(element: &ElementRef<'_>, root: &ElementRef<'_>) -> bool {
    has_excluded(
        element
            .ancestors()
            .take_while(|ancestor| ancestor.id() != root.id())
            .filter_map(ElementRef::wrap),
    )
}

fn has_excluded<'a>(mut elements: impl Iterator<Item = ElementRef<'a>>) -> bool {
    elements.any(|element| EXCLUDED_TAGS.contains(&element.value().name()))
}

fn paragraph_text(paragraph: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in paragraph.descendants() {
        let Some(piece) = node.value().as_text() else {
            continue;
        };
        let hidden = has_excluded(
            node.ancestors()
                .take_while(|ancestor| ancestor.id() != paragraph.id())
                .filter_map(ElementRef::wrap),
        );
        if !hidden {
            text.push_str(piece.trim());
        }
    }
    text
}
