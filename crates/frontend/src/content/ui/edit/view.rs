use leptos::prelude::*;

use super::view_model::ContentEditViewModel;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::ui::{Button, Toggle};
use crate::shared::dynamic_field::DynamicFieldEdit;

#[component]
pub fn ContentEditPage(type_slug: String, slug: String) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    let vm = ContentEditViewModel::new(type_slug.clone(), slug);
    vm.load();

    let content_type =
        Signal::derive(move || ctx.config.get().content_type(&type_slug).cloned());

    view! {
        <div class="page content-edit">
            <h2 class="content-edit__heading">
                {move || content_type.get()
                    .map(|ty| format!("Edit {}", ty.name))
                    .unwrap_or_else(|| "Edit".to_string())}
            </h2>

            {move || vm.load_error.get().map(|e| view! {
                <div class="content-edit__error">{e}</div>
            })}

            <Show when=move || vm.loading.get()>
                <p class="content-edit__loading">"Loading..."</p>
            </Show>

            {move || {
                let ty = content_type.get()?;
                if vm.entry.with(|e| e.is_none()) {
                    return None;
                }
                let fields = ty.fields.clone();
                Some(view! {
                    <div class="content-edit__form">
                        <For
                            each=move || fields.clone()
                            key=|field| field.name.clone()
                            children=move |field| {
                                let name = field.name.clone();
                                let value_name = name.clone();
                                let upload_name = name.clone();
                                let multiple = field.multiple;
                                let value = Signal::derive(move || {
                                    vm.draft_fields.with(|fields| fields.get(&value_name).cloned())
                                });
                                view! {
                                    <DynamicFieldEdit
                                        field=field
                                        value=value
                                        on_change=Callback::new(move |value| {
                                            vm.set_field(name.clone(), value);
                                        })
                                        on_files=Callback::new(move |files| {
                                            vm.upload(upload_name.clone(), multiple, files);
                                        })
                                    />
                                }
                            }
                        />

                        {ty.publishing.drafts.then(|| view! {
                            <Toggle
                                id="content-edit-draft"
                                label="Draft"
                                checked=vm.draft_flag
                                on_change=Callback::new(move |flag| vm.draft_flag.set(flag))
                            />
                        })}

                        {move || vm.save_error.get().map(|e| view! {
                            <div class="content-edit__error">{e}</div>
                        })}

                        <div class="content-edit__actions">
                            <Button
                                disabled=Signal::derive(move || vm.saving.get())
                                on_click=Callback::new(move |_| vm.save())
                            >
                                {move || if vm.saving.get() { "Saving..." } else { "Save" }}
                            </Button>
                            <Show when=move || vm.saved.get()>
                                <span class="content-edit__saved">"Saved"</span>
                            </Show>
                        </div>
                    </div>
                })
            }}
        </div>
    }
}
