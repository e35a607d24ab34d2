//! Application header: brand title, per-type navigation, account link.

use leptos::prelude::*;

use crate::layout::global_context::{href_for, AppGlobalContext, Page};

#[component]
pub fn Header() -> impl IntoView {
    let ctx =
        leptos::context::use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    view! {
        <header class="header">
            <div class="header__brand">
                <NavLink page=Page::Home>
                    <span class="header__title">{move || ctx.config.get().title}</span>
                </NavLink>
            </div>
            <nav class="header__nav">
                <For
                    each=move || ctx.config.get().content.types
                    key=|content_type| content_type.slug.clone()
                    children=move |content_type| {
                        view! {
                            <NavLink page=Page::ContentList {
                                type_slug: content_type.slug.clone(),
                            }>{content_type.name.clone()}</NavLink>
                        }
                    }
                />
                <NavLink page=Page::Settings>"Settings"</NavLink>
            </nav>
            <div class="header__account">
                {move || {
                    ctx.current_user
                        .get()
                        .map(|user| {
                            let shown = user
                                .profile
                                .display_name
                                .unwrap_or(user.username);
                            view! { <span class="header__user">{shown}</span> }
                        })
                }}
            </div>
        </header>
    }
}

/// In-app link: keeps a real `href` for the browser, routes through the
/// page signal on plain clicks.
#[component]
pub fn NavLink(page: Page, children: Children) -> impl IntoView {
    let ctx =
        leptos::context::use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let href = href_for(&page);
    let target = StoredValue::new(page);

    view! {
        <a
            class="header__link"
            class=("header__link--active", move || {
                target.with_value(|p| ctx.page.get() == *p)
            })
            href=href
            on:click=move |ev| {
                ev.prevent_default();
                ctx.navigate(target.with_value(|p| p.clone()));
            }
        >
            {children()}
        </a>
    }
}
