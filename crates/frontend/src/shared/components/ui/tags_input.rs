use leptos::prelude::*;

/// Tag list editor: chips plus a text input that commits on Enter or comma
#[component]
pub fn TagsInput(
    /// Label text (optional)
    #[prop(optional, into)]
    label: MaybeProp<String>,
    /// Current tag list
    #[prop(into)]
    value: Signal<Vec<String>>,
    /// Change event handler, called with the full new list
    #[prop(optional)]
    on_change: Option<Callback<Vec<String>>>,
    /// Placeholder text
    #[prop(optional, into)]
    placeholder: MaybeProp<String>,
    /// Disabled state
    #[prop(optional)]
    disabled: bool,
    /// ID for the text input element
    #[prop(optional, into)]
    id: MaybeProp<String>,
) -> impl IntoView {
    let draft = RwSignal::new(String::new());
    let input_id = move || id.get().unwrap_or_default();
    let input_placeholder = move || {
        placeholder
            .get()
            .unwrap_or_else(|| "Add a tag and press Enter".to_string())
    };

    let commit_draft = move || {
        let tag = draft.get_untracked().trim().to_string();
        if tag.is_empty() {
            return;
        }
        let mut tags = value.get_untracked();
        if !tags.contains(&tag) {
            tags.push(tag);
            if let Some(handler) = on_change {
                handler.run(tags);
            }
        }
        draft.set(String::new());
    };

    let remove_tag = move |tag: String| {
        let mut tags = value.get_untracked();
        tags.retain(|t| t != &tag);
        if let Some(handler) = on_change {
            handler.run(tags);
        }
    };

    view! {
        <div class="form__group">
            {move || label.get().map(|l| view! {
                <label class="form__label" for=input_id>
                    {l}
                </label>
            })}
            <div class="tags-input">
                <For
                    each=move || value.get()
                    key=|tag| tag.clone()
                    children=move |tag| {
                        let tag_for_remove = tag.clone();
                        view! {
                            <span class="tags-input__chip">
                                {tag.clone()}
                                <button
                                    type="button"
                                    class="tags-input__remove"
                                    disabled=disabled
                                    on:click=move |_| remove_tag(tag_for_remove.clone())
                                >
                                    "×"
                                </button>
                            </span>
                        }
                    }
                />
                <input
                    id=input_id
                    class="form__input tags-input__field"
                    type="text"
                    prop:value=move || draft.get()
                    placeholder=input_placeholder
                    disabled=disabled
                    on:input=move |ev| draft.set(event_target_value(&ev))
                    on:keydown=move |ev: leptos::ev::KeyboardEvent| {
                        let key = ev.key();
                        if key == "Enter" || key == "," {
                            ev.prevent_default();
                            commit_draft();
                        }
                    }
                />
            </div>
        </div>
    }
}
