//! Article body retrieval.
//!
//! Fetches the page behind a feed item's link and extracts the visible
//! paragraph text of its primary `<article>` element.

mod extract;
mod fetcher;

pub use extract::ArticleExtractor;
pub use fetcher::HttpArticleFetcher;
