//! Paginated listing client.

use std::borrow::Cow;
use std::pin::Pin;

use aircheck_http::{HttpClient, HttpError, RequestOpts};
use futures::Stream;

use crate::types::ArticleMeta;

/// Boxed stream of listing results, one item per article.
pub type AnyStream<T> = Pin<Box<dyn Stream<Item = Result<T, HttpError>> + Send>>;

/// Client for the article-search API, scoped to one site section.
#[derive(Clone)]
pub struct ListingClient {
    http: HttpClient,
    section: String,
    page_size: u32,
}

impl ListingClient {
    /// `base_url` is the full search endpoint; pages are requested with
    /// `section`, `size` and `offset` query parameters.
    pub fn new(base_url: &str, section: &str, page_size: u32) -> Result<Self, HttpError> {
        Ok(Self {
            http: HttpClient::new(base_url)?,
            section: section.to_string(),
            page_size: page_size.max(1),
        })
    }

    /// Swap in a preconfigured HTTP client (custom UA, retry policy).
    pub fn with_http(mut self, http: HttpClient) -> Self {
        self.http = http;
        self
    }

    /// Fetch one fixed-size page starting at `offset`.
    pub async fn search_page(&self, offset: u32) -> Result<Vec<ArticleMeta>, HttpError> {
        let query: Vec<(&str, Cow<'_, str>)> = vec![
            ("section", Cow::Borrowed(self.section.as_str())),
            ("size", Cow::Owned(self.page_size.to_string())),
            ("offset", Cow::Owned(offset.to_string())),
        ];
        let opts = RequestOpts {
            query: Some(query),
            ..Default::default()
        };
        self.http.get_json("", opts).await
    }

    /// Stream listing items page by page, up to `max_pages`. The stream ends
    /// normally on a short or empty page (the listing is exhausted).
    pub fn listing_stream(&self, max_pages: u32) -> AnyStream<ArticleMeta> {
        let client = self.clone();
        Box::pin(async_stream::try_stream! {
            let mut page_idx = 0u32;
            loop {
                if page_idx >= max_pages {
                    break;
                }
                let offset = page_idx * client.page_size;
                let page = client.search_page(offset).await?;
                let count = page.len();
                tracing::info!(
                    target: "search",
                    section = %client.section,
                    page = page_idx,
                    offset,
                    count,
                    "listing.page"
                );

                for item in page {
                    yield item;
                }

                if is_last_page(count, client.page_size) {
                    tracing::info!(
                        target: "search",
                        section = %client.section,
                        pages = page_idx + 1,
                        "listing.exhausted"
                    );
                    break;
                }
                page_idx += 1;
            }
        })
    }
}

fn is_last_page(returned: usize, page_size: u32) -> bool {
    returned < page_size as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_or_empty_pages_end_the_listing() {
        assert!(is_last_page(0, 30));
        assert!(is_last_page(29, 30));
        assert!(!is_last_page(30, 30));
    }

    #[test]
    fn page_size_floor_is_one() {
        let client = ListingClient::new("https://www.example.com/api/article-search", "transcript", 0)
            .expect("client builds");
        assert_eq!(client.page_size, 1);
    }
}
