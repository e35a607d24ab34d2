use contracts::content::field::{DisplayWidget, FieldDescriptor};
use contracts::content::value::{FieldValue, FileRef};
use leptos::prelude::*;

use crate::shared::api_utils::file_url;
use crate::shared::components::ui::Badge;

/// Resolved read-only rendering of one field value.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewFragment {
    /// Nothing to show; callers usually skip the row entirely.
    Empty,
    Text(String),
    Chips(Vec<String>),
    Images(Vec<FileRef>),
    FileLinks(Vec<FileRef>),
    Flag(bool),
    Link(String),
    Code(String),
}

/// Resolve a descriptor plus its stored value to a displayable fragment.
///
/// Pure: no signals, no DOM. A missing or empty value resolves to
/// [`ViewFragment::Empty`] for every type; a value whose shape does not fit
/// the descriptor falls back to its text rendering instead of failing.
pub fn view_fragment(field: &FieldDescriptor, value: Option<&FieldValue>) -> ViewFragment {
    let value = match value {
        Some(v) if !v.is_empty() => v,
        _ => return ViewFragment::Empty,
    };

    match field.kind.display() {
        DisplayWidget::Text => ViewFragment::Text(value.to_editor_text()),
        DisplayWidget::Chips => match value.as_tags() {
            Some(tags) => ViewFragment::Chips(tags.to_vec()),
            None => ViewFragment::Text(value.to_editor_text()),
        },
        DisplayWidget::Images => match file_refs(value) {
            Some(files) => ViewFragment::Images(files),
            None => ViewFragment::Text(value.to_editor_text()),
        },
        DisplayWidget::FileLinks => match file_refs(value) {
            Some(files) => ViewFragment::FileLinks(files),
            None => ViewFragment::Text(value.to_editor_text()),
        },
        DisplayWidget::Flag => match value.as_bool() {
            Some(flag) => ViewFragment::Flag(flag),
            None => ViewFragment::Text(value.to_editor_text()),
        },
        DisplayWidget::Link => match value.as_text() {
            Some(url) => ViewFragment::Link(url.to_string()),
            None => ViewFragment::Text(value.to_editor_text()),
        },
        DisplayWidget::Code => match value {
            // Edited text passes through verbatim, stored structures are
            // pretty-printed.
            FieldValue::Text(text) => ViewFragment::Code(text.clone()),
            other => {
                ViewFragment::Code(serde_json::to_string_pretty(other).unwrap_or_default())
            }
        },
    }
}

/// File list of a value. Older documents stored upload fields as a plain
/// path string, or as an array of path strings; both still resolve.
fn file_refs(value: &FieldValue) -> Option<Vec<FileRef>> {
    match value {
        FieldValue::Files(files) => Some(files.clone()),
        FieldValue::Text(path) => Some(vec![path_ref(path)]),
        FieldValue::Tags(paths) => Some(paths.iter().map(|p| path_ref(p)).collect()),
        _ => None,
    }
}

fn path_ref(path: &str) -> FileRef {
    FileRef {
        path: path.to_string(),
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        mime: String::new(),
        size: 0,
    }
}

/// Read-only rendering of one dynamic field.
///
/// Resolution happens in [`view_fragment`]; this component only maps the
/// fragment to markup. An empty fragment renders nothing, label included.
#[component]
pub fn DynamicFieldView(
    /// Descriptor of the field
    field: FieldDescriptor,
    /// Stored value, if any
    #[prop(optional_no_strip)]
    value: Option<FieldValue>,
    /// Render the field label above the value
    #[prop(optional)]
    show_label: bool,
) -> impl IntoView {
    let fragment = view_fragment(&field, value.as_ref());
    if fragment == ViewFragment::Empty {
        return ().into_any();
    }
    let label = field.display_label().to_string();

    let rendered: AnyView = match fragment {
        ViewFragment::Empty => ().into_any(),
        ViewFragment::Text(text) => {
            view! { <span class="field-view__text">{text}</span> }.into_any()
        }
        ViewFragment::Chips(tags) => view! {
            <div class="field-view__chips">
                {tags
                    .into_iter()
                    .map(|tag| view! { <Badge>{tag}</Badge> })
                    .collect_view()}
            </div>
        }
        .into_any(),
        ViewFragment::Images(files) => view! {
            <div class="field-view__images">
                {files
                    .into_iter()
                    .map(|file| view! {
                        <img
                            class="field-view__image"
                            src=file_url(&file.path)
                            alt=file.name
                        />
                    })
                    .collect_view()}
            </div>
        }
        .into_any(),
        ViewFragment::FileLinks(files) => view! {
            <ul class="field-view__files">
                {files
                    .into_iter()
                    .map(|file| view! {
                        <li class="field-view__file">
                            <a href=file_url(&file.path) download=file.name.clone()>
                                {file.name.clone()}
                            </a>
                        </li>
                    })
                    .collect_view()}
            </ul>
        }
        .into_any(),
        ViewFragment::Flag(flag) => {
            let (variant, text) = if flag { ("success", "Yes") } else { ("neutral", "No") };
            view! { <Badge variant=variant>{text}</Badge> }.into_any()
        }
        ViewFragment::Link(url) => view! {
            <a class="field-view__link" href=url.clone() target="_blank" rel="noopener">
                {url.clone()}
            </a>
        }
        .into_any(),
        ViewFragment::Code(code) => view! {
            <pre class="field-view__code"><code>{code}</code></pre>
        }
        .into_any(),
    };

    view! {
        <div class="field-view">
            {show_label.then(|| view! { <span class="field-view__label">{label}</span> })}
            {rendered}
        </div>
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::content::field::FieldType;

    fn field(kind: FieldType) -> FieldDescriptor {
        FieldDescriptor::new("sample", kind, "Sample")
    }

    #[test]
    fn every_type_resolves_empty_without_a_value() {
        let kinds = [
            FieldType::Text,
            FieldType::Number,
            FieldType::TextArea,
            FieldType::Markdown,
            FieldType::Image,
            FieldType::File,
            FieldType::Boolean,
            FieldType::Tags,
            FieldType::Select,
            FieldType::Radio,
            FieldType::VideoUrl,
            FieldType::Json,
            FieldType::Unknown,
        ];
        for kind in kinds {
            assert_eq!(
                view_fragment(&field(kind), None),
                ViewFragment::Empty,
                "kind: {:?}",
                kind
            );
            // An untouched default is empty too, except for booleans where
            // false is a real value and displays as a flag.
            let expected = if kind == FieldType::Boolean {
                ViewFragment::Flag(false)
            } else {
                ViewFragment::Empty
            };
            assert_eq!(
                view_fragment(&field(kind), Some(&FieldValue::default_for(&kind))),
                expected,
                "kind: {:?}",
                kind
            );
        }
    }

    #[test]
    fn tags_resolve_to_one_chip_per_entry() {
        let value = FieldValue::Tags(vec!["rust".into(), "cms".into()]);
        let fragment = view_fragment(&field(FieldType::Tags), Some(&value));
        assert_eq!(
            fragment,
            ViewFragment::Chips(vec!["rust".into(), "cms".into()])
        );
    }

    #[test]
    fn numbers_display_without_trailing_fraction() {
        let fragment = view_fragment(&field(FieldType::Number), Some(&FieldValue::Number(4.0)));
        assert_eq!(fragment, ViewFragment::Text("4".into()));
    }

    #[test]
    fn booleans_display_as_flags_even_when_false() {
        let fragment = view_fragment(&field(FieldType::Boolean), Some(&FieldValue::Bool(false)));
        assert_eq!(fragment, ViewFragment::Flag(false));
    }

    #[test]
    fn legacy_path_string_resolves_to_one_image() {
        let value = FieldValue::Text("files/ab12-photo.png".into());
        let fragment = view_fragment(&field(FieldType::Image), Some(&value));
        match fragment {
            ViewFragment::Images(files) => {
                assert_eq!(files.len(), 1);
                assert_eq!(files[0].path, "files/ab12-photo.png");
                assert_eq!(files[0].name, "ab12-photo.png");
            }
            other => panic!("expected images, got {:?}", other),
        }
    }

    #[test]
    fn legacy_path_array_resolves_to_file_links() {
        // A JSON array of strings deserializes as tags; upload fields still
        // treat each entry as a path.
        let value: FieldValue = serde_json::from_str(r#"["files/a.pdf", "files/b.pdf"]"#).unwrap();
        let fragment = view_fragment(&field(FieldType::File), Some(&value));
        match fragment {
            ViewFragment::FileLinks(files) => {
                assert_eq!(files.len(), 2);
                assert_eq!(files[1].name, "b.pdf");
            }
            other => panic!("expected file links, got {:?}", other),
        }
    }

    #[test]
    fn wrong_shape_falls_back_to_text() {
        let fragment = view_fragment(
            &field(FieldType::Tags),
            Some(&FieldValue::Text("not, actual, tags".into())),
        );
        assert_eq!(fragment, ViewFragment::Text("not, actual, tags".into()));

        let fragment = view_fragment(&field(FieldType::Boolean), Some(&FieldValue::Number(1.0)));
        assert_eq!(fragment, ViewFragment::Text("1".into()));
    }

    #[test]
    fn video_url_resolves_to_a_link() {
        let value = FieldValue::Text("https://example.com/v/1".into());
        let fragment = view_fragment(&field(FieldType::VideoUrl), Some(&value));
        assert_eq!(fragment, ViewFragment::Link("https://example.com/v/1".into()));
    }

    #[test]
    fn raw_text_passes_through_code_verbatim() {
        let value = FieldValue::Text("{\"draft\": tru".into());
        let fragment = view_fragment(&field(FieldType::Json), Some(&value));
        assert_eq!(fragment, ViewFragment::Code("{\"draft\": tru".into()));
    }

    #[test]
    fn stored_structures_pretty_print_as_code() {
        let value = FieldValue::Json(serde_json::json!({"a": 1}));
        let fragment = view_fragment(&field(FieldType::Json), Some(&value));
        match fragment {
            ViewFragment::Code(code) => assert!(code.contains("\"a\": 1")),
            other => panic!("expected code, got {:?}", other),
        }
    }
}
