use contracts::content::field::FieldDescriptor;
use leptos::prelude::*;

use crate::system::users::api;
use crate::system::users::settings_form::{
    begin_submit, GroupSubmission, ScalarField, SettingsAction, SettingsFormState, SettingsGroup,
    UpdateRequest,
};

/// How long a success flash stays visible, in milliseconds.
const SUCCESS_FLASH_MS: u32 = 4_000;

/// ViewModel for the account settings page.
///
/// All form state lives in the settings store; the view model runs the
/// submission protocol around it: validate, send the one allowed request,
/// record the outcome.
#[derive(Clone, Copy)]
pub struct SettingsViewModel {
    pub state: RwSignal<SettingsFormState>,
    pub load_error: RwSignal<Option<String>>,
    profile_fields: Signal<Vec<FieldDescriptor>>,
}

impl SettingsViewModel {
    pub fn new(profile_fields: Signal<Vec<FieldDescriptor>>) -> Self {
        Self {
            state: RwSignal::new(SettingsFormState::default()),
            load_error: RwSignal::new(None),
            profile_fields,
        }
    }

    pub fn dispatch(&self, action: SettingsAction) {
        self.state.update(|state| state.apply(action));
    }

    /// Load the account once. The store seeds a single time; a reload
    /// would clobber in-progress edits.
    pub fn load_if_needed(&self) {
        if self.state.get_untracked().seeded {
            return;
        }
        let state = self.state;
        let load_error = self.load_error;
        wasm_bindgen_futures::spawn_local(async move {
            match api::fetch_me().await {
                Ok(user) => state.update(|s| {
                    // The guard runs again here; a slow second load must not
                    // reseed over edits either.
                    if !s.seeded {
                        s.apply(SettingsAction::SetInitialData(user));
                    }
                }),
                Err(e) => load_error.set(Some(format!("Failed to load account: {}", e))),
            }
        });
    }

    /// Validate a group and, when validation passes, issue its one request.
    pub fn submit(&self, submission: GroupSubmission) {
        let profile_fields = self.profile_fields.get_untracked();
        let request = self
            .state
            .try_update(|state| begin_submit(state, &profile_fields, &submission))
            .flatten();
        let Some(request) = request else {
            return;
        };

        let group = request.group();
        let state = self.state;
        let vm = *self;
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = match request {
                UpdateRequest::Username { username } => {
                    api::update_username(username).await.map(|_| ())
                }
                UpdateRequest::Email { email } => api::update_email(email).await.map(|_| ()),
                UpdateRequest::Profile { patch } => api::update_profile(&patch).await.map(|_| ()),
                UpdateRequest::Password {
                    current,
                    new_password,
                } => api::change_password(current, new_password).await,
                UpdateRequest::DeleteAccount { password } => api::delete_account(password).await,
            };
            match outcome {
                Ok(()) => {
                    state.update(|s| s.apply(SettingsAction::SaveFieldSuccess(group)));
                    vm.clear_success_later(group);
                }
                Err(message) => {
                    state.update(|s| s.apply(SettingsAction::SaveFieldError(group, message)));
                }
            }
        });
    }

    /// Store the first selected file as the new picture. Upload starts on
    /// selection; there is no separate save step for the avatar.
    pub fn upload_picture(&self, files: Vec<web_sys::File>) {
        let Some(file) = files.into_iter().next() else {
            return;
        };
        let state = self.state;
        let vm = *self;
        state.update(|s| s.apply(SettingsAction::SaveField(SettingsGroup::Picture)));
        wasm_bindgen_futures::spawn_local(async move {
            match api::upload_picture(file).await {
                Ok(user) => {
                    state.update(|s| {
                        if let Some(path) = user.profile.picture {
                            s.apply(SettingsAction::UpdateField(ScalarField::Picture, path));
                        }
                        s.apply(SettingsAction::SaveFieldSuccess(SettingsGroup::Picture));
                    });
                    vm.clear_success_later(SettingsGroup::Picture);
                }
                Err(message) => state.update(|s| {
                    s.apply(SettingsAction::SaveFieldError(SettingsGroup::Picture, message));
                }),
            }
        });
    }

    fn clear_success_later(&self, group: SettingsGroup) {
        let state = self.state;
        wasm_bindgen_futures::spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(SUCCESS_FLASH_MS).await;
            state.update(|s| s.apply(SettingsAction::ClearSaveSuccess(group)));
        });
    }
}
