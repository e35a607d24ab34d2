use leptos::prelude::*;

use crate::content::ui::details::ContentDetailPage;
use crate::content::ui::edit::ContentEditPage;
use crate::content::ui::list::ContentListPage;
use crate::layout::global_context::{href_for, AppGlobalContext, Page};
use crate::layout::Shell;
use crate::system::users::ui::settings::SettingsPage;

/// Landing page: the configured content types, linked to their listings.
#[component]
fn HomePage() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    view! {
        <div class="page home">
            <h2 class="home__title">{move || ctx.config.get().title}</h2>
            <ul class="home__types">
                <For
                    each=move || ctx.config.get().content.types
                    key=|ty| ty.slug.clone()
                    children=move |ty| {
                        let page = Page::ContentList {
                            type_slug: ty.slug.clone(),
                        };
                        let href = href_for(&page);
                        let target = StoredValue::new(page);
                        view! {
                            <li class="home__type">
                                <a
                                    href=href
                                    on:click=move |ev| {
                                        ev.prevent_default();
                                        ctx.navigate(target.with_value(|p| p.clone()));
                                    }
                                >
                                    {ty.name.clone()}
                                </a>
                            </li>
                        }
                    }
                />
            </ul>
        </div>
    }
}

/// The routed page body, resolved from the page signal.
#[component]
fn PageView() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    move || match ctx.page.get() {
        Page::Home => view! { <HomePage /> }.into_any(),
        Page::ContentList { type_slug } => {
            view! { <ContentListPage type_slug=type_slug /> }.into_any()
        }
        Page::ContentDetail { type_slug, slug } => {
            view! { <ContentDetailPage type_slug=type_slug slug=slug /> }.into_any()
        }
        Page::ContentEdit { type_slug, slug } => {
            view! { <ContentEditPage type_slug=type_slug slug=slug /> }.into_any()
        }
        Page::Settings => view! { <SettingsPage /> }.into_any(),
    }
}

#[component]
fn MainLayout() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    // Initialize router integration. This runs once when the component is created.
    ctx.init_router_integration();

    view! {
        <Shell content=|| view! { <PageView /> }.into_any() />
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    view! {
        <Show
            when=move || ctx.config_loaded.get()
            fallback=|| view! { <p class="app-loading">"Loading..."</p> }
        >
            <MainLayout />
        </Show>
    }
}
