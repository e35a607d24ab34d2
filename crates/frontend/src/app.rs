use crate::layout::global_context::AppGlobalContext;
use crate::routes::routes::AppRoutes;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    // Provide the AppGlobalContext store to the whole app via context.
    let ctx = AppGlobalContext::new();
    provide_context(ctx);

    // Configuration and the signed-in account load in the background.
    ctx.load_initial_data();

    view! {
        <AppRoutes />
    }
}
