//! Page-at-a-time access to the variation space

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use super::generator::{generate_at, DotVariations};
use super::total_pages;
use crate::error::{DotifyError, Result};
use crate::types::{Page, ParsedEmail, Variation, DEFAULT_PAGE_SIZE};

/// Indices handed to one blocking task by [`Pager::page_concurrent`]
const CHUNK_SIZE: u64 = 64;

/// Numbers shown around the current page in [`page_window`]
const MAX_VISIBLE_PAGES: u64 = 5;

/// Splits the variation space of one address into fixed-size pages
#[derive(Debug, Clone)]
pub struct Pager {
    variations: DotVariations,
    page_size: u64,
}

impl Pager {
    pub fn new(parsed: &ParsedEmail, page_size: u64) -> Result<Self> {
        if page_size == 0 {
            return Err(DotifyError::validation("Page size must be greater than 0"));
        }
        Ok(Self {
            variations: DotVariations::new(parsed)?,
            page_size,
        })
    }

    pub fn with_default_size(parsed: &ParsedEmail) -> Result<Self> {
        Self::new(parsed, DEFAULT_PAGE_SIZE)
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn total(&self) -> u64 {
        self.variations.total()
    }

    pub fn total_pages(&self) -> u64 {
        total_pages(self.total(), self.page_size)
    }

    /// Page (1-indexed) that holds `index`
    pub fn page_of(&self, index: u64) -> Result<u64> {
        if index >= self.total() {
            return Err(DotifyError::index_out_of_range(index, self.total()));
        }
        Ok(index / self.page_size + 1)
    }

    /// Half-open index range covered by `page`
    fn bounds(&self, page: u64) -> Result<(u64, u64)> {
        let total_pages = self.total_pages();

        // An empty space still has a (blank) first page
        if total_pages == 0 && page == 1 {
            return Ok((0, 0));
        }
        if page == 0 || page > total_pages {
            return Err(DotifyError::page_out_of_range(page, total_pages));
        }

        let start = (page - 1) * self.page_size;
        let end = start.saturating_add(self.page_size).min(self.total());
        Ok((start, end))
    }

    fn build_page(&self, number: u64, items: Vec<Variation>) -> Page {
        Page {
            number,
            page_size: self.page_size,
            total_pages: self.total_pages(),
            total: self.total(),
            items,
        }
    }

    /// Generate one page sequentially
    pub fn page(&self, number: u64) -> Result<Page> {
        let (start, end) = self.bounds(number)?;
        let items = generate_range(
            self.variations.username(),
            self.variations.domain(),
            start,
            end,
        )?;

        tracing::debug!(page = number, start, end, "Generated page");
        Ok(self.build_page(number, items))
    }

    /// Generate one page with chunks spread over blocking tasks.
    ///
    /// Items come back in index order, identical to [`Pager::page`].
    pub async fn page_concurrent(&self, number: u64) -> Result<Page> {
        let (start, end) = self.bounds(number)?;

        let mut handles = Vec::new();
        let mut chunk_start = start;
        while chunk_start < end {
            let chunk_end = chunk_start.saturating_add(CHUNK_SIZE).min(end);
            let username = self.variations.username().to_string();
            let domain = self.variations.domain().to_string();
            handles.push(tokio::task::spawn_blocking(move || {
                generate_range(&username, &domain, chunk_start, chunk_end)
            }));
            chunk_start = chunk_end;
        }

        let chunks = handles.len();
        let mut items = Vec::with_capacity((end - start) as usize);
        for joined in join_all(handles).await {
            items.extend(joined??);
        }

        tracing::debug!(page = number, start, end, chunks, "Generated page concurrently");
        Ok(self.build_page(number, items))
    }
}

fn generate_range(username: &str, domain: &str, start: u64, end: u64) -> Result<Vec<Variation>> {
    (start..end)
        .map(|index| {
            generate_at(username, domain, index).map(|address| Variation { index, address })
        })
        .collect()
}

/// Entry in a page navigation bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageMarker {
    Page(u64),
    Gap,
}

impl std::fmt::Display for PageMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageMarker::Page(n) => write!(f, "{}", n),
            PageMarker::Gap => write!(f, "..."),
        }
    }
}

/// Page numbers to show around `current`.
///
/// Up to five consecutive pages, plus the first and last page with gap
/// markers for skipped ranges. Empty when there is at most one page.
pub fn page_window(current: u64, total_pages: u64) -> Vec<PageMarker> {
    if total_pages <= 1 {
        return Vec::new();
    }

    let current = current.clamp(1, total_pages);
    let mut start = current.saturating_sub(2).max(1);
    let end = (start + MAX_VISIBLE_PAGES - 1).min(total_pages);
    if end - start < MAX_VISIBLE_PAGES - 1 {
        start = (end + 1).saturating_sub(MAX_VISIBLE_PAGES).max(1);
    }

    let mut markers = Vec::with_capacity(MAX_VISIBLE_PAGES as usize + 4);
    if start > 1 {
        markers.push(PageMarker::Page(1));
        if start > 2 {
            markers.push(PageMarker::Gap);
        }
    }
    markers.extend((start..=end).map(PageMarker::Page));
    if end < total_pages {
        if end < total_pages - 1 {
            markers.push(PageMarker::Gap);
        }
        markers.push(PageMarker::Page(total_pages));
    }

    markers
}
