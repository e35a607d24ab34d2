use contracts::content::entry::ContentEntry;
use leptos::prelude::*;

use crate::content::api;

/// ViewModel for one entry's read-only page.
#[derive(Clone, Copy)]
pub struct ContentDetailsViewModel {
    pub entry: RwSignal<Option<ContentEntry>>,
    pub loading: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
}

impl ContentDetailsViewModel {
    pub fn new() -> Self {
        Self {
            entry: RwSignal::new(None),
            loading: RwSignal::new(false),
            error: RwSignal::new(None),
        }
    }

    pub fn load(&self, type_slug: String, slug: String) {
        let vm = *self;
        vm.loading.set(true);
        vm.error.set(None);
        wasm_bindgen_futures::spawn_local(async move {
            match api::fetch_entry(&type_slug, &slug).await {
                Ok(entry) => {
                    vm.entry.set(Some(entry));
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

impl Default for ContentDetailsViewModel {
    fn default() -> Self {
        Self::new()
    }
}
