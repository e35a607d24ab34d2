//! Entry summary card
//!
//! Renders one entry the way its type configures it: the title field
//! first, then the remaining fields, tag fields last. Listing pages link
//! the title to the detail page; the detail page renders it unlinked.

use contracts::content::content_type::ContentType;
use contracts::content::entry::ContentEntry;
use contracts::content::field::FieldType;
use contracts::content::value::FieldValue;
use contracts::system::permissions::{has_any_role, has_permission};
use leptos::prelude::*;

use crate::layout::global_context::{href_for, AppGlobalContext, Page};
use crate::shared::components::ui::Badge;
use crate::shared::date_utils::time_ago;
use crate::shared::dynamic_field::DynamicFieldView;

#[component]
pub fn ContentSummaryView(
    content_type: ContentType,
    entry: ContentEntry,
    /// Link the title to the entry's detail page.
    #[prop(optional)]
    links: bool,
) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    let detail_page = Page::ContentDetail {
        type_slug: content_type.slug.clone(),
        slug: entry.slug.clone(),
    };
    let edit_page = Page::ContentEdit {
        type_slug: content_type.slug.clone(),
        slug: entry.slug.clone(),
    };

    // Capability checks re-run when the signed-in account changes.
    let author = entry.author.clone();
    let update_roles = content_type.permissions.update.clone();
    let admin_roles = content_type.permissions.admin.clone();
    let can_edit = Signal::derive(move || {
        ctx.current_user.with(|user| {
            let user = user.as_ref();
            has_permission(user, &[admin_roles.as_slice(), update_roles.as_slice()])
                || user.map_or(false, |u| u.id == author)
        })
    });

    let comments_enabled = content_type.comments.enabled;
    let read_roles = content_type.comments.read.clone();
    let write_roles = content_type.comments.write.clone();
    let comment_count = entry.comments;
    let comments_line = Signal::derive(move || {
        if !comments_enabled {
            return None;
        }
        ctx.current_user.with(|user| {
            let user = user.as_ref();
            if !has_any_role(user, &read_roles) {
                return None;
            }
            let count = comment_count?;
            if count == 0 && has_any_role(user, &write_roles) {
                Some("Add a comment".to_string())
            } else {
                Some(format!("{} comments", count))
            }
        })
    });

    let title_name = content_type.publishing.title.clone();
    let title_view = content_type.title_field().map(|field| {
        let text = entry
            .field(&field.name)
            .map(FieldValue::to_editor_text)
            .unwrap_or_default();
        if links {
            let href = href_for(&detail_page);
            let target = detail_page.clone();
            view! {
                <a
                    class="content-summary__title-link"
                    href=href
                    on:click=move |ev| {
                        ev.prevent_default();
                        ctx.navigate(target.clone());
                    }
                >
                    <h1 class="content-summary__title">{text}</h1>
                </a>
            }
            .into_any()
        } else {
            view! { <h1 class="content-summary__title">{text}</h1> }.into_any()
        }
    });

    let body_views = content_type
        .fields
        .iter()
        .filter(|f| Some(f.name.as_str()) != title_name.as_deref() && f.kind != FieldType::Tags)
        .map(|field| {
            let value = entry.field(&field.name).cloned();
            view! {
                <div class="content-summary__field">
                    <DynamicFieldView field=field.clone() value=value />
                </div>
            }
        })
        .collect_view();

    // Tag fields close the card, whatever their declared position.
    let tag_views = content_type
        .fields
        .iter()
        .filter(|f| Some(f.name.as_str()) != title_name.as_deref() && f.kind == FieldType::Tags)
        .map(|field| {
            let value = entry.field(&field.name).cloned();
            view! {
                <div class="content-summary__field">
                    <DynamicFieldView field=field.clone() value=value />
                </div>
            }
        })
        .collect_view();

    let created = time_ago(entry.created_at);
    let draft = entry.draft;
    let edit_href = href_for(&edit_page);
    let edit_target = StoredValue::new(edit_page);

    view! {
        <div class="content-summary">
            {draft.then(|| view! {
                <Badge variant="warning" class="content-summary__status">
                    "Draft - Not published"
                </Badge>
            })}
            <div class="content-summary__fields">
                {title_view}
                {body_views}
                {tag_views}
            </div>
            <div class="content-summary__meta">
                <span class="content-summary__created-at">{created}</span>
                {move || comments_line.get().map(|text| view! {
                    <span class="content-summary__comments">{text}</span>
                })}
                <Show when=move || can_edit.get()>
                    <a
                        class="content-summary__edit"
                        href=edit_href.clone()
                        on:click=move |ev| {
                            ev.prevent_default();
                            ctx.navigate(edit_target.with_value(|p| p.clone()));
                        }
                    >
                        "Edit"
                    </a>
                </Show>
            </div>
        </div>
    }
}
