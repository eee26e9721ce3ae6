//! Token-driven pagination shared by every list call.

use std::fmt;
use std::future::Future;

/// One page of results and the cursor for the next one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}

/// A listing that can be fetched one page at a time
pub trait PageSource {
    type Item;
    type Error;

    fn fetch_page(
        &mut self,
        page_token: Option<&str>,
    ) -> impl Future<Output = Result<Page<Self::Item>, Self::Error>>;
}

/// A fetch that failed part way, with everything collected before the failure
#[derive(Debug)]
pub struct PartialFetch<T, E> {
    pub items: Vec<T>,
    pub error: E,
}

impl<T, E: fmt::Display> fmt::Display for PartialFetch<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (after {} items)", self.error, self.items.len())
    }
}

/// Fetch every page, in order, until the source stops returning a page token.
///
/// Empty pages do not end the listing; only a missing (or empty) token does.
pub async fn fetch_all<S: PageSource>(
    source: &mut S,
) -> Result<Vec<S::Item>, PartialFetch<S::Item, S::Error>> {
    fetch_all_with(source, |_| {}).await
}

/// Like [`fetch_all`], calling `on_page` with each page's items as soon as it arrives
pub async fn fetch_all_with<S: PageSource>(
    source: &mut S,
    mut on_page: impl FnMut(&[S::Item]),
) -> Result<Vec<S::Item>, PartialFetch<S::Item, S::Error>> {
    let mut items = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let page = match source.fetch_page(page_token.as_deref()).await {
            Ok(page) => page,
            Err(error) => return Err(PartialFetch { items, error }),
        };

        on_page(&page.items);
        items.extend(page.items);

        match page.next_page_token.filter(|token| !token.is_empty()) {
            Some(token) => page_token = Some(token),
            None => return Ok(items),
        }
    }
}
