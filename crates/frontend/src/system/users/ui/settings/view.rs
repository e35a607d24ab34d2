use contracts::content::field::{FieldDescriptor, DEFAULT_UPLOAD_ACCEPT};
use leptos::prelude::*;

use super::view_model::SettingsViewModel;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::api_utils::file_url;
use crate::shared::components::ui::{Button, Input, Upload};
use crate::shared::dynamic_field::DynamicFieldEdit;
use crate::system::users::settings_form::{
    GroupStatus, GroupSubmission, ScalarField, SettingsAction, SettingsGroup,
};

/// Account settings page: independently saved groups over one shared store.
#[component]
pub fn SettingsPage() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let profile_fields = Signal::derive(move || ctx.config.get().user.profile.fields.clone());

    let vm = SettingsViewModel::new(profile_fields);
    vm.load_if_needed();

    view! {
        <div class="settings">
            <h2 class="settings__title">"Account Settings"</h2>

            {move || vm.load_error.get().map(|e| view! {
                <div class="settings__error">{e}</div>
            })}

            <ScalarBlock
                vm=vm
                title="Username"
                label="Username"
                input_id="settings-username"
                field=ScalarField::Username
                group=SettingsGroup::Username
                submission=GroupSubmission::Username
                save_label="Save username"
            />
            <ScalarBlock
                vm=vm
                title="Email"
                label="Email"
                input_id="settings-email"
                field=ScalarField::Email
                group=SettingsGroup::Email
                submission=GroupSubmission::Email
                save_label="Save email"
                input_type="email"
            />
            <ScalarBlock
                vm=vm
                title="Display name"
                label="Display name"
                input_id="settings-display-name"
                field=ScalarField::DisplayName
                group=SettingsGroup::DisplayName
                submission=GroupSubmission::DisplayName
                save_label="Save display name"
            />
            <PictureBlock vm=vm />
            <ProfileBlock vm=vm fields=profile_fields />
            <PasswordBlock vm=vm />
            <DeleteAccountBlock vm=vm />
        </div>
    }
}

/// Section chrome shared by every group: title, body, then the group's
/// error or success line.
#[component]
fn SettingsBlock(
    title: &'static str,
    #[prop(into)] status: Signal<GroupStatus>,
    /// Success flash text, "Saved" when omitted.
    #[prop(optional)]
    success_text: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    let success_text = success_text.unwrap_or("Saved");

    view! {
        <section class="settings__block">
            <h3 class="settings__block-title">{title}</h3>
            {children()}
            {move || status.get().error.map(|message| view! {
                <div class="settings__error">{message}</div>
            })}
            <Show when=move || status.get().success>
                <div class="settings__success">{success_text}</div>
            </Show>
        </section>
    }
}

/// One text input plus its save button, for the scalar groups.
#[component]
fn ScalarBlock(
    vm: SettingsViewModel,
    title: &'static str,
    label: &'static str,
    input_id: &'static str,
    field: ScalarField,
    group: SettingsGroup,
    submission: GroupSubmission,
    save_label: &'static str,
    #[prop(optional, into)] input_type: MaybeProp<String>,
) -> impl IntoView {
    let submission = StoredValue::new(submission);
    let value = Signal::derive(move || vm.state.with(|s| s.scalar_value(field)));
    let status = Signal::derive(move || vm.state.with(|s| s.status(group)));

    view! {
        <SettingsBlock title=title status=status>
            <Input
                label=label
                id=input_id
                value=value
                input_type=input_type
                on_input=Callback::new(move |text| {
                    vm.dispatch(SettingsAction::UpdateField(field, text));
                })
            />
            <Button
                disabled=Signal::derive(move || status.get().loading)
                on_click=Callback::new(move |_| {
                    vm.submit(submission.with_value(|s| s.clone()));
                })
            >
                {move || if status.get().loading { "Saving..." } else { save_label }}
            </Button>
        </SettingsBlock>
    }
}

/// Current picture plus the upload control. Saving starts on selection;
/// there is no separate save button.
#[component]
fn PictureBlock(vm: SettingsViewModel) -> impl IntoView {
    let status = Signal::derive(move || vm.state.with(|s| s.status(SettingsGroup::Picture)));
    let picture = Signal::derive(move || vm.state.with(|s| s.picture.value.clone()));

    view! {
        <SettingsBlock title="Picture" status=status success_text="Picture updated">
            <Show when=move || picture.get().is_some()>
                <img
                    class="settings__picture"
                    src=move || file_url(&picture.get().unwrap_or_default())
                    alt="Profile picture"
                />
            </Show>
            <Upload
                id="settings-picture"
                label="Upload a new picture"
                accept=DEFAULT_UPLOAD_ACCEPT
                on_select=Callback::new(move |files| vm.upload_picture(files))
            />
        </SettingsBlock>
    }
}

/// Configured profile fields, rendered through the dynamic field editor
/// and saved as one group.
#[component]
fn ProfileBlock(vm: SettingsViewModel, #[prop(into)] fields: Signal<Vec<FieldDescriptor>>) -> impl IntoView {
    let status = Signal::derive(move || vm.state.with(|s| s.status(SettingsGroup::Profile)));

    view! {
        <SettingsBlock title="Profile" status=status>
            <For
                each=move || fields.get()
                key=|field| field.name.clone()
                children=move |field| {
                    let name = field.name.clone();
                    let value_name = name.clone();
                    let value = Signal::derive(move || {
                        vm.state.with(|s| s.profile.value.get(&value_name).cloned())
                    });
                    view! {
                        <DynamicFieldEdit
                            field=field
                            value=value
                            on_change=Callback::new(move |value| {
                                vm.dispatch(SettingsAction::UpdateProfileField(name.clone(), value));
                            })
                        />
                    }
                }
            />
            <Button
                disabled=Signal::derive(move || status.get().loading)
                on_click=Callback::new(move |_| vm.submit(GroupSubmission::Profile))
            >
                {move || if status.get().loading { "Saving..." } else { "Save profile" }}
            </Button>
        </SettingsBlock>
    }
}

/// Password change form. Entries live here only; the store never sees them.
#[component]
fn PasswordBlock(vm: SettingsViewModel) -> impl IntoView {
    let current = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let repeat_new_password = RwSignal::new(String::new());

    let status = Signal::derive(move || vm.state.with(|s| s.status(SettingsGroup::Password)));

    // Entries clear once the change is confirmed.
    Effect::new(move |_| {
        if status.get().success {
            current.set(String::new());
            new_password.set(String::new());
            repeat_new_password.set(String::new());
        }
    });

    view! {
        <SettingsBlock title="Change password" status=status success_text="Password changed">
            <Input
                label="Current password"
                id="settings-current-password"
                input_type="password"
                autocomplete="current-password"
                value=current
                on_input=Callback::new(move |text| current.set(text))
            />
            <Input
                label="New password"
                id="settings-new-password"
                input_type="password"
                autocomplete="new-password"
                value=new_password
                on_input=Callback::new(move |text| new_password.set(text))
            />
            <Input
                label="Repeat new password"
                id="settings-repeat-new-password"
                input_type="password"
                autocomplete="new-password"
                value=repeat_new_password
                on_input=Callback::new(move |text| repeat_new_password.set(text))
            />
            <Button
                disabled=Signal::derive(move || status.get().loading)
                on_click=Callback::new(move |_| {
                    vm.submit(GroupSubmission::Password {
                        current: current.get_untracked(),
                        new_password: new_password.get_untracked(),
                        repeat_new_password: repeat_new_password.get_untracked(),
                    });
                })
            >
                {move || if status.get().loading { "Saving..." } else { "Change password" }}
            </Button>
        </SettingsBlock>
    }
}

#[component]
fn DeleteAccountBlock(vm: SettingsViewModel) -> impl IntoView {
    let password = RwSignal::new(String::new());
    let status = Signal::derive(move || vm.state.with(|s| s.status(SettingsGroup::DeleteAccount)));

    view! {
        <SettingsBlock title="Delete account" status=status success_text="Account deleted">
            <p class="settings__warning">
                "Deleting the account removes it permanently, along with its profile and uploaded files."
            </p>
            <Input
                label="Password"
                id="settings-delete-password"
                input_type="password"
                autocomplete="current-password"
                value=password
                on_input=Callback::new(move |text| password.set(text))
            />
            <Button
                variant="secondary"
                class="button--danger"
                disabled=Signal::derive(move || status.get().loading)
                on_click=Callback::new(move |_| {
                    vm.submit(GroupSubmission::DeleteAccount {
                        password: password.get_untracked(),
                    });
                })
            >
                {move || if status.get().loading { "Deleting..." } else { "Delete account" }}
            </Button>
        </SettingsBlock>
    }
}
