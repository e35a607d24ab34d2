use contracts::content::field::{EditorWidget, FieldDescriptor, FieldType};
use contracts::content::validation::validate_field;
use contracts::content::value::{FieldValue, FileRef};
use leptos::prelude::*;

use crate::shared::components::ui::{
    Input, RadioGroup, Select, TagsInput, Textarea, Toggle, Upload,
};

/// Editable rendering of one dynamic field.
///
/// The component owns the per-instance runtime state: `touched` turns on at
/// the first edit and stays on while mounted, `error` tracks the latest
/// validation result. The value itself belongs to the caller; every edit
/// replaces it wholesale through `on_change`.
#[component]
pub fn DynamicFieldEdit(
    /// Descriptor of the field; immutable while mounted
    field: FieldDescriptor,
    /// Current value, owned by the caller
    #[prop(into)]
    value: Signal<Option<FieldValue>>,
    /// Called with the replacement value on every edit
    on_change: Callback<FieldValue>,
    /// Fallback message when the descriptor configures none
    #[prop(optional, into)]
    error_message: MaybeProp<String>,
    /// Raw file handles of an upload selection; storing the bytes and
    /// delete/replace bookkeeping stay with the caller
    #[prop(optional)]
    on_files: Option<Callback<Vec<web_sys::File>>>,
) -> impl IntoView {
    let touched = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    // Message preference: descriptor, then caller, then the built-in
    // constraint message.
    let descriptor = StoredValue::new(field.clone());
    let apply = Callback::new(move |new_value: FieldValue| {
        touched.set(true);
        let message = descriptor.with_value(|field| {
            validate_field(field, Some(&new_value)).err().map(|err| {
                field
                    .error_message
                    .clone()
                    .or_else(|| error_message.get())
                    .unwrap_or_else(|| err.to_string())
            })
        });
        error.set(message);
        on_change.run(new_value);
    });

    let required = field.required;
    let label = field.display_label().to_string();
    let field_id = field.name.clone();

    let container_class = move || {
        let mut classes = String::from("input-group");
        if required {
            classes.push_str(" input-group--required");
        }
        if touched.get() && error.get().is_some() {
            classes.push_str(" input-group--error");
        }
        classes
    };

    let editor_text = Signal::derive(move || {
        value
            .get()
            .map(|v| v.to_editor_text())
            .unwrap_or_default()
    });
    let choice_text = Signal::derive(move || {
        value
            .get()
            .and_then(|v| v.as_text().map(str::to_string))
            .unwrap_or_default()
    });

    let widget: AnyView = match field.kind.editor() {
        EditorWidget::TextLine => {
            let pattern = field.effective_pattern().map(str::to_string);
            view! {
                <Input
                    value=editor_text
                    on_input=Callback::new(move |text: String| apply.run(FieldValue::Text(text)))
                    placeholder=field.placeholder.clone()
                    required=required
                    min_length=field.min_length
                    max_length=field.max_length
                    pattern=pattern
                    id=field.name.clone()
                />
            }
            .into_any()
        }
        EditorWidget::NumberInput => view! {
            <Input
                value=editor_text
                input_type="number"
                on_input=Callback::new(move |text: String| {
                    // An unparseable entry travels as text so validation
                    // can flag the shape instead of dropping the edit.
                    let next = match text.parse::<f64>() {
                        Ok(n) => FieldValue::Number(n),
                        Err(_) => FieldValue::Text(text),
                    };
                    apply.run(next);
                })
                placeholder=field.placeholder.clone()
                required=required
                min=field.min
                max=field.max
                id=field.name.clone()
            />
        }
        .into_any(),
        EditorWidget::MultiLine => view! {
            <Textarea
                value=editor_text
                on_input=Callback::new(move |text: String| apply.run(FieldValue::Text(text)))
                placeholder=field.placeholder.clone()
                required=required
                min_length=field.min_length
                max_length=field.max_length
                rows=5
                id=field.name.clone()
            />
        }
        .into_any(),
        EditorWidget::RawStructure => {
            // Stored structures are shown serialized; the edited text goes
            // back out verbatim, callers parse when they need structure.
            let serialized = Signal::derive(move || {
                value
                    .get()
                    .map(|v| match v {
                        FieldValue::Text(text) => text,
                        other => serde_json::to_string(&other).unwrap_or_default(),
                    })
                    .unwrap_or_default()
            });
            view! {
                <Textarea
                    value=serialized
                    on_input=Callback::new(move |text: String| apply.run(FieldValue::Text(text)))
                    required=required
                    min_length=field.min_length
                    max_length=field.max_length
                    rows=5
                    id=field.name.clone()
                    class="form__textarea--code"
                />
            }
            .into_any()
        }
        EditorWidget::Toggle => {
            let checked = Signal::derive(move || {
                value.get().and_then(|v| v.as_bool()).unwrap_or(false)
            });
            view! {
                <Toggle
                    checked=checked
                    on_change=Callback::new(move |flag: bool| apply.run(FieldValue::Bool(flag)))
                    id=field.name.clone()
                />
            }
            .into_any()
        }
        EditorWidget::TagsEditor => {
            let tags = Signal::derive(move || {
                value
                    .get()
                    .and_then(|v| v.as_tags().map(<[String]>::to_vec))
                    .unwrap_or_default()
            });
            view! {
                <TagsInput
                    value=tags
                    on_change=Callback::new(move |tags: Vec<String>| apply.run(FieldValue::Tags(tags)))
                    placeholder=field.placeholder.clone()
                    id=field.name.clone()
                />
            }
            .into_any()
        }
        EditorWidget::SelectMenu => {
            let options: Vec<(String, String)> = field
                .options
                .iter()
                .map(|o| (o.value.clone(), o.label.clone()))
                .collect();
            view! {
                <Select
                    value=choice_text
                    on_change=Callback::new(move |choice: String| apply.run(FieldValue::Text(choice)))
                    options=options
                    placeholder=field.placeholder.clone()
                    required=required
                    id=field.name.clone()
                />
            }
            .into_any()
        }
        EditorWidget::RadioGroup => {
            let options: Vec<(String, String)> = field
                .options
                .iter()
                .map(|o| (o.value.clone(), o.label.clone()))
                .collect();
            view! {
                <RadioGroup
                    value=choice_text
                    on_change=Callback::new(move |choice: String| apply.run(FieldValue::Text(choice)))
                    options=options
                    name=field.name.clone()
                />
            }
            .into_any()
        }
        EditorWidget::Upload => {
            // The capture hint only applies to plain file uploads.
            let capture = match field.kind {
                FieldType::File => field.capture.clone(),
                _ => None,
            };
            view! {
                <Upload
                    accept=field.effective_accept().to_string()
                    multiple=field.multiple
                    capture=capture
                    required=required
                    id=field.name.clone()
                    on_select=Callback::new(move |files: Vec<web_sys::File>| {
                        let refs: Vec<FileRef> = files
                            .iter()
                            .map(|file| FileRef {
                                path: String::new(),
                                name: file.name(),
                                mime: file.type_(),
                                size: file.size() as u64,
                            })
                            .collect();
                        apply.run(FieldValue::Files(refs));
                        if let Some(handler) = on_files {
                            handler.run(files);
                        }
                    })
                />
            }
            .into_any()
        }
    };

    view! {
        <div class=container_class>
            <label class="form__label" for=field_id>{label}</label>
            {widget}
            <Show when=move || touched.get() && error.get().is_some()>
                <div class="input-group__error">
                    {move || error.get().unwrap_or_default()}
                </div>
            </Show>
        </div>
    }
}
