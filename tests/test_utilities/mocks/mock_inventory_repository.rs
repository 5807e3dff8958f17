use chrono::NaiveDate;
use container_inventory_export::prelude::*;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// What the mock answers for one window
#[derive(Clone)]
enum Scripted {
    Pages(Vec<Vec<Value>>),
    FetchFailure(u16),
    AuthFailure,
}

/// Mock InventoryRepository keyed by window start date.
///
/// Windows without a script answer with a single empty page. Every page
/// request is recorded so tests can count API calls.
#[derive(Default, Clone)]
pub struct MockInventoryRepository {
    scripts: HashMap<NaiveDate, Scripted>,
    pub requests: Arc<Mutex<Vec<PageCursor>>>,
}

impl MockInventoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `pages` in order for the window starting at `start`
    pub fn with_pages(mut self, start: NaiveDate, pages: Vec<Vec<Value>>) -> Self {
        self.scripts.insert(start, Scripted::Pages(pages));
        self
    }

    pub fn with_fetch_failure(mut self, start: NaiveDate, status: u16) -> Self {
        self.scripts.insert(start, Scripted::FetchFailure(status));
        self
    }

    pub fn with_auth_failure(mut self, start: NaiveDate) -> Self {
        self.scripts.insert(start, Scripted::AuthFailure);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Distinct window starts that were requested, in order
    pub fn requested_starts(&self) -> Vec<NaiveDate> {
        let mut starts: Vec<NaiveDate> = Vec::new();
        for cursor in self.requests.lock().unwrap().iter() {
            if starts.last() != Some(&cursor.window.start()) {
                starts.push(cursor.window.start());
            }
        }
        starts
    }
}

impl InventoryRepository for MockInventoryRepository {
    fn fetch_page(&self, cursor: &PageCursor) -> Result<InventoryPage> {
        self.requests.lock().unwrap().push(cursor.clone());

        match self.scripts.get(&cursor.window.start()) {
            None => Ok(InventoryPage::default()),
            Some(Scripted::FetchFailure(status)) => Err(ExportError::Fetch {
                window: cursor.window.to_string(),
                status: Some(*status),
                details: "scripted failure".to_string(),
            }
            .into()),
            Some(Scripted::AuthFailure) => Err(ExportError::Authentication {
                status: Some(401),
                details: "scripted rejection".to_string(),
            }
            .into()),
            Some(Scripted::Pages(pages)) => {
                let index = cursor.page - 1;
                let records = pages
                    .get(index)
                    .map(|page| {
                        page.iter()
                            .map(|value| serde_json::from_value(value.clone()).unwrap())
                            .collect()
                    })
                    .unwrap_or_default();
                let next = (index + 1 < pages.len()).then(|| format!("page={}", index + 2));
                Ok(InventoryPage { records, next })
            }
        }
    }
}
