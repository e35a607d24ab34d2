use contracts::api::UploadedFileBody;
use contracts::content::entry::{ContentEntry, EntryPatch};
use contracts::content::value::{FieldValue, FileRef};
use leptos::prelude::*;

use crate::content::api;

/// How long the saved flash stays visible, in milliseconds.
const SAVED_FLASH_MS: u32 = 4_000;

/// Patch key carrying the draft flag. Reserved: a configured field of this
/// name would collide with the entry column.
pub const DRAFT_KEY: &str = "draft";

/// ViewModel for the generic entry edit form.
///
/// Edits accumulate in a working copy of the entry's field values; one
/// save request sends the whole copy and the server validates every field
/// against its descriptor.
#[derive(Clone, Copy)]
pub struct ContentEditViewModel {
    type_slug: StoredValue<String>,
    slug: StoredValue<String>,
    pub entry: RwSignal<Option<ContentEntry>>,
    pub draft_fields: RwSignal<EntryPatch>,
    pub draft_flag: RwSignal<bool>,
    pub loading: RwSignal<bool>,
    pub load_error: RwSignal<Option<String>>,
    pub saving: RwSignal<bool>,
    pub save_error: RwSignal<Option<String>>,
    pub saved: RwSignal<bool>,
}

impl ContentEditViewModel {
    pub fn new(type_slug: String, slug: String) -> Self {
        Self {
            type_slug: StoredValue::new(type_slug),
            slug: StoredValue::new(slug),
            entry: RwSignal::new(None),
            draft_fields: RwSignal::new(EntryPatch::new()),
            draft_flag: RwSignal::new(false),
            loading: RwSignal::new(false),
            load_error: RwSignal::new(None),
            saving: RwSignal::new(false),
            save_error: RwSignal::new(None),
            saved: RwSignal::new(false),
        }
    }

    pub fn load(&self) {
        let vm = *self;
        vm.loading.set(true);
        vm.load_error.set(None);
        let type_slug = self.type_slug.with_value(|s| s.clone());
        let slug = self.slug.with_value(|s| s.clone());
        wasm_bindgen_futures::spawn_local(async move {
            match api::fetch_entry(&type_slug, &slug).await {
                Ok(entry) => {
                    vm.draft_fields.set(entry.fields.clone());
                    vm.draft_flag.set(entry.draft);
                    vm.entry.set(Some(entry));
                    vm.loading.set(false);
                }
                Err(e) => {
                    vm.load_error.set(Some(e));
                    vm.loading.set(false);
                }
            }
        });
    }

    pub fn set_field(&self, name: String, value: FieldValue) {
        self.draft_fields.update(|fields| {
            fields.insert(name, value);
        });
    }

    /// Push selected files to storage, then place the stored refs in the
    /// field. A multi-file field keeps what it already holds; a single-file
    /// field is replaced.
    pub fn upload(&self, name: String, multiple: bool, files: Vec<web_sys::File>) {
        if files.is_empty() {
            return;
        }
        let vm = *self;
        vm.save_error.set(None);
        wasm_bindgen_futures::spawn_local(async move {
            let mut uploaded = Vec::new();
            for file in files {
                match api::upload_file(file).await {
                    Ok(stored) => uploaded.push(stored_ref(stored)),
                    Err(e) => {
                        vm.save_error.set(Some(format!("Upload failed: {}", e)));
                        return;
                    }
                }
            }
            vm.draft_fields.update(|fields| {
                let mut refs = if multiple {
                    fields
                        .get(&name)
                        .and_then(|v| v.as_files())
                        .map(<[FileRef]>::to_vec)
                        .unwrap_or_default()
                } else {
                    Vec::new()
                };
                refs.extend(uploaded);
                fields.insert(name, FieldValue::Files(refs));
            });
        });
    }

    /// Save the working copy as one request. A constraint rejection comes
    /// back as the save error.
    pub fn save(&self) {
        if self.saving.get_untracked() {
            return;
        }
        let vm = *self;
        vm.saving.set(true);
        vm.save_error.set(None);
        vm.saved.set(false);
        let type_slug = self.type_slug.with_value(|s| s.clone());
        let slug = self.slug.with_value(|s| s.clone());
        let mut patch = self.draft_fields.get_untracked();
        patch.insert(
            DRAFT_KEY.to_string(),
            FieldValue::Bool(self.draft_flag.get_untracked()),
        );
        wasm_bindgen_futures::spawn_local(async move {
            match api::update_entry(&type_slug, &slug, &patch).await {
                Ok(entry) => {
                    vm.draft_fields.set(entry.fields.clone());
                    vm.draft_flag.set(entry.draft);
                    vm.entry.set(Some(entry));
                    vm.saving.set(false);
                    vm.saved.set(true);
                    gloo_timers::future::TimeoutFuture::new(SAVED_FLASH_MS).await;
                    vm.saved.set(false);
                }
                Err(e) => {
                    vm.saving.set(false);
                    vm.save_error.set(Some(e));
                }
            }
        });
    }
}

fn stored_ref(stored: UploadedFileBody) -> FileRef {
    FileRef {
        path: stored.path,
        name: stored.name,
        mime: stored.mime,
        size: stored.size,
    }
}
