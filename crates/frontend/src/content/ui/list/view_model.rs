use contracts::content::entry::ContentEntry;
use leptos::prelude::*;

use crate::content::api;

/// Entries fetched per request.
pub const PAGE_SIZE: i64 = 10;

/// ViewModel for one type's listing. Pages accumulate; "load more" appends
/// the next page to what is already shown.
#[derive(Clone, Copy)]
pub struct ContentListViewModel {
    type_slug: StoredValue<String>,
    pub entries: RwSignal<Vec<ContentEntry>>,
    pub loading: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
    /// Last page fetched, zero-based.
    page: RwSignal<i64>,
    pub has_more: RwSignal<bool>,
}

impl ContentListViewModel {
    pub fn new(type_slug: String) -> Self {
        Self {
            type_slug: StoredValue::new(type_slug),
            entries: RwSignal::new(Vec::new()),
            loading: RwSignal::new(false),
            error: RwSignal::new(None),
            page: RwSignal::new(0),
            has_more: RwSignal::new(false),
        }
    }

    pub fn load_first(&self) {
        self.entries.set(Vec::new());
        self.load_page(0);
    }

    pub fn load_more(&self) {
        if self.loading.get_untracked() {
            return;
        }
        self.load_page(self.page.get_untracked() + 1);
    }

    fn load_page(&self, page: i64) {
        let vm = *self;
        vm.loading.set(true);
        vm.error.set(None);
        let slug = self.type_slug.with_value(|s| s.clone());
        wasm_bindgen_futures::spawn_local(async move {
            match api::fetch_page(&slug, page * PAGE_SIZE, PAGE_SIZE).await {
                Ok(result) => {
                    vm.has_more.set(result.data.len() as i64 == PAGE_SIZE);
                    vm.page.set(page);
                    vm.entries.update(|all| all.extend(result.data));
                    vm.loading.set(false);
                }
                Err(e) => {
                    vm.error.set(Some(e));
                    vm.loading.set(false);
                }
            }
        });
    }
}
