use crate::inventory_export::domain::{DateWindow, FilterQuery, InventoryRecord};
use crate::shared::Result;

/// Where the next page of a window's results comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLocation {
    /// First page: query the endpoint with this filter
    Filter(FilterQuery),
    /// Continuation link returned by the previous page
    NextLink(String),
}

/// Position within the paginated results for one window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    pub window: DateWindow,
    /// 1-based page number, for diagnostics
    pub page: usize,
    pub location: PageLocation,
}

impl PageCursor {
    pub fn first(window: DateWindow, filter: FilterQuery) -> Self {
        Self {
            window,
            page: 1,
            location: PageLocation::Filter(filter),
        }
    }

    pub fn follow(&self, link: String) -> Self {
        Self {
            window: self.window,
            page: self.page + 1,
            location: PageLocation::NextLink(link),
        }
    }
}

/// One page of results plus the continuation link, if any
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryPage {
    pub records: Vec<InventoryRecord>,
    pub next: Option<String>,
}

/// InventoryRepository port for fetching container inventory
///
/// This port abstracts the vendor API. Implementations fetch exactly one page
/// per call; [`InventoryRepository::pages`] drives pagination.
pub trait InventoryRepository {
    /// Fetches the page described by `cursor`
    ///
    /// # Errors
    /// - `ExportError::Authentication` when credentials are rejected and no
    ///   fallback succeeds (fatal for the run)
    /// - `ExportError::Fetch` for any other failure (fatal for the window only)
    fn fetch_page(&self, cursor: &PageCursor) -> Result<InventoryPage>;

    /// Lazily walks every page for `window`
    fn pages(&self, window: DateWindow, filter: FilterQuery) -> InventoryPages<'_, Self>
    where
        Self: Sized,
    {
        InventoryPages {
            repository: self,
            cursor: Some(PageCursor::first(window, filter)),
        }
    }

    /// Collects every record for `window`, stopping at the first error
    fn fetch_window(&self, window: DateWindow, filter: FilterQuery) -> Result<Vec<InventoryRecord>>
    where
        Self: Sized,
    {
        let mut records = Vec::new();
        for page in self.pages(window, filter) {
            records.extend(page?);
        }
        Ok(records)
    }
}

/// Page-by-page iterator over one window's records.
///
/// Ends after a page without a continuation link, after an empty page, or
/// right after yielding an error.
pub struct InventoryPages<'a, R> {
    repository: &'a R,
    cursor: Option<PageCursor>,
}

impl<R: InventoryRepository> Iterator for InventoryPages<'_, R> {
    type Item = Result<Vec<InventoryRecord>>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.take()?;
        match self.repository.fetch_page(&cursor) {
            Ok(page) => {
                if page.records.is_empty() {
                    return None;
                }
                self.cursor = page.next.map(|link| cursor.follow(link));
                Some(Ok(page.records))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
