use leptos::prelude::*;

use super::view_model::ContentListViewModel;
use crate::content::summary::ContentSummaryView;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::ui::Button;

#[component]
pub fn ContentListPage(type_slug: String) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    let vm = ContentListViewModel::new(type_slug.clone());
    vm.load_first();

    let content_type =
        Signal::derive(move || ctx.config.get().content_type(&type_slug).cloned());

    view! {
        <div class="page content-list">
            {move || match content_type.get() {
                Some(ty) => {
                    let name = ty.name.clone();
                    view! {
                        <div class="content-list__entries">
                            <h2 class="content-list__heading">{name}</h2>
                            <For
                                each=move || vm.entries.get()
                                key=|entry| entry.id.clone()
                                children=move |entry| {
                                    view! {
                                        <ContentSummaryView
                                            content_type=ty.clone()
                                            entry=entry
                                            links=true
                                        />
                                    }
                                }
                            />
                        </div>
                    }
                    .into_any()
                }
                // The registry knows nothing under this slug; nothing to list.
                None => view! {
                    <p class="content-list__missing">"Unknown content type"</p>
                }
                .into_any(),
            }}

            {move || vm.error.get().map(|e| view! {
                <div class="content-list__error">{e}</div>
            })}

            <Show when=move || vm.loading.get()>
                <p class="content-list__loading">"Loading..."</p>
            </Show>

            <Show when=move || vm.has_more.get() && !vm.loading.get()>
                <Button
                    variant="secondary"
                    on_click=Callback::new(move |_| vm.load_more())
                >
                    "Load more"
                </Button>
            </Show>
        </div>
    }
}
