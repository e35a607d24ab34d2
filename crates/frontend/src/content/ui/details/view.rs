use leptos::prelude::*;

use super::view_model::ContentDetailsViewModel;
use crate::content::summary::ContentSummaryView;
use crate::layout::global_context::AppGlobalContext;

#[component]
pub fn ContentDetailPage(type_slug: String, slug: String) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    let vm = ContentDetailsViewModel::new();
    vm.load(type_slug.clone(), slug);

    let content_type =
        Signal::derive(move || ctx.config.get().content_type(&type_slug).cloned());

    view! {
        <div class="page content-detail">
            {move || vm.error.get().map(|e| view! {
                <div class="content-detail__error">{e}</div>
            })}

            <Show when=move || vm.loading.get()>
                <p class="content-detail__loading">"Loading..."</p>
            </Show>

            {move || {
                let ty = content_type.get()?;
                let entry = vm.entry.get()?;
                Some(view! {
                    <ContentSummaryView content_type=ty entry=entry />
                })
            }}
        </div>
    }
}
