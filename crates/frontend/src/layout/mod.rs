pub mod global_context;
pub mod header;

use header::Header;
use leptos::prelude::*;

/// Application shell: header bar above the routed page content.
///
/// ```text
/// +------------------------------------------+
/// |                 Header                    |
/// +------------------------------------------+
/// |                 Content                   |
/// +------------------------------------------+
/// ```
#[component]
pub fn Shell<C>(content: C) -> impl IntoView
where
    C: Fn() -> AnyView + 'static + Send,
{
    view! {
        <div class="app-layout">
            <Header />
            <main class="app-main">
                {content()}
            </main>
        </div>
    }
}
