use leptos::prelude::*;
use web_sys::HtmlInputElement;

/// File picker handing the selected `web_sys::File` handles to the caller.
/// Storing bytes anywhere is the caller's job.
#[component]
pub fn Upload(
    /// Label text (optional)
    #[prop(optional, into)]
    label: MaybeProp<String>,
    /// Selection handler
    #[prop(optional)]
    on_select: Option<Callback<Vec<web_sys::File>>>,
    /// MIME filter for the picker
    #[prop(optional, into)]
    accept: MaybeProp<String>,
    /// Allow selecting several files
    #[prop(optional)]
    multiple: bool,
    /// Camera/microphone capture hint
    #[prop(optional, into)]
    capture: MaybeProp<String>,
    /// Required attribute
    #[prop(optional)]
    required: bool,
    /// Disabled state
    #[prop(optional)]
    disabled: bool,
    /// ID for the input element
    #[prop(optional, into)]
    id: MaybeProp<String>,
) -> impl IntoView {
    let input_id = move || id.get().unwrap_or_default();

    view! {
        <div class="form__group">
            {move || label.get().map(|l| view! {
                <label class="form__label" for=input_id>
                    {l}
                </label>
            })}
            <input
                id=input_id
                class="form__file"
                type="file"
                accept=move || accept.get()
                multiple=multiple
                capture=move || capture.get()
                required=required
                disabled=disabled
                on:change=move |ev| {
                    let input: HtmlInputElement = event_target(&ev);
                    let mut selected = Vec::new();
                    if let Some(files) = input.files() {
                        for i in 0..files.length() {
                            if let Some(file) = files.item(i) {
                                selected.push(file);
                            }
                        }
                    }
                    if let Some(handler) = on_select {
                        handler.run(selected);
                    }
                }
            />
        </div>
    }
}
