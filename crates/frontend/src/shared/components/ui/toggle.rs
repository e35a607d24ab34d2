use leptos::prelude::*;

/// On/off switch backed by a checkbox input
#[component]
pub fn Toggle(
    /// Label text (optional)
    #[prop(optional, into)]
    label: MaybeProp<String>,
    /// Checked state
    #[prop(into)]
    checked: Signal<bool>,
    /// Change event handler
    #[prop(optional)]
    on_change: Option<Callback<bool>>,
    /// Disabled state
    #[prop(optional)]
    disabled: bool,
    /// ID for the underlying input element
    #[prop(optional, into)]
    id: MaybeProp<String>,
) -> impl IntoView {
    let toggle_id = move || id.get().unwrap_or_default();
    let wrapper_class = move || {
        if disabled {
            "form__toggle-wrapper form__toggle-wrapper--disabled"
        } else {
            "form__toggle-wrapper"
        }
    };

    view! {
        <div class=wrapper_class>
            <label class="form__toggle" for=toggle_id>
                <input
                    id=toggle_id
                    type="checkbox"
                    class="form__toggle-input"
                    prop:checked=move || checked.get()
                    disabled=disabled
                    on:change=move |ev| {
                        if let Some(handler) = on_change {
                            handler.run(event_target_checked(&ev));
                        }
                    }
                />
                <span class="form__toggle-slider"></span>
            </label>
            {move || label.get().map(|l| view! {
                <span class="form__toggle-label">{l}</span>
            })}
        </div>
    }
}
