//! Account settings form state
//!
//! One store for the whole settings page, split into groups that load and
//! save independently. All transitions go through [`SettingsFormState::apply`];
//! nothing outside this module mutates a group directly.
//!
//! Submission runs through [`begin_submit`]: validate the group, and either
//! record the validation error and stop, or mark the group saving and hand
//! back the one request the caller must issue.

use std::collections::BTreeMap;

use contracts::content::field::FieldDescriptor;
use contracts::content::value::FieldValue;
use contracts::system::users::{ProfilePatch, User};

use super::validators;

/// Runtime state of one group: the value under edit plus request status.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldGroup<T> {
    pub value: T,
    pub error: Option<String>,
    pub loading: bool,
    pub success: bool,
}

impl<T> FieldGroup<T> {
    /// Fresh group holding a value, with no status recorded.
    pub fn with_value(value: T) -> Self {
        Self {
            value,
            error: None,
            loading: false,
            success: false,
        }
    }

    /// Status snapshot, value excluded.
    pub fn status(&self) -> GroupStatus {
        GroupStatus {
            error: self.error.clone(),
            loading: self.loading,
            success: self.success,
        }
    }
}

/// Request status of a group, value excluded; what display code needs to
/// render the inline error/loading/success line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupStatus {
    pub error: Option<String>,
    pub loading: bool,
    pub success: bool,
}

/// The independently saved groups of the settings page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsGroup {
    Username,
    Email,
    DisplayName,
    Picture,
    Profile,
    Password,
    DeleteAccount,
}

/// Scalar attributes edited as a single text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarField {
    Username,
    Email,
    DisplayName,
    /// Storage path of the uploaded picture.
    Picture,
}

/// Every transition the settings store supports. Adding a variant forces
/// every match over actions to handle it.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsAction {
    /// Seed all group values from the loaded account. Callers apply this
    /// only while the store is unseeded; re-seeding would clobber edits.
    SetInitialData(User),
    UpdateField(ScalarField, String),
    /// Merge one key into the profile mapping, preserving the rest.
    UpdateProfileField(String, FieldValue),
    /// Set or clear a group's message without touching its value.
    SetValidationError(SettingsGroup, Option<String>),
    /// A submission attempt starts: loading on, previous outcome cleared.
    SaveField(SettingsGroup),
    SaveFieldSuccess(SettingsGroup),
    SaveFieldError(SettingsGroup, String),
    /// Turn off the success flash once it has been shown long enough.
    ClearSaveSuccess(SettingsGroup),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettingsFormState {
    pub seeded: bool,
    pub username: FieldGroup<String>,
    pub email: FieldGroup<String>,
    pub display_name: FieldGroup<String>,
    pub picture: FieldGroup<Option<String>>,
    pub profile: FieldGroup<BTreeMap<String, FieldValue>>,
    pub password: FieldGroup<()>,
    pub delete_account: FieldGroup<()>,
}

impl SettingsFormState {
    pub fn apply(&mut self, action: SettingsAction) {
        match action {
            SettingsAction::SetInitialData(user) => {
                // Statuses reset along with values; the seeded groups start
                // over from the loaded account.
                self.username = FieldGroup::with_value(user.username);
                self.email = FieldGroup::with_value(user.email);
                self.display_name =
                    FieldGroup::with_value(user.profile.display_name.unwrap_or_default());
                self.picture = FieldGroup::with_value(user.profile.picture);
                self.profile = FieldGroup::with_value(user.profile.fields);
                self.seeded = true;
            }
            SettingsAction::UpdateField(field, value) => match field {
                ScalarField::Username => self.username.value = value,
                ScalarField::Email => self.email.value = value,
                ScalarField::DisplayName => self.display_name.value = value,
                ScalarField::Picture => self.picture.value = Some(value),
            },
            SettingsAction::UpdateProfileField(name, value) => {
                self.profile.value.insert(name, value);
            }
            SettingsAction::SetValidationError(group, message) => {
                self.group_mut(group).set_error(message);
            }
            SettingsAction::SaveField(group) => self.group_mut(group).begin_save(),
            SettingsAction::SaveFieldSuccess(group) => self.group_mut(group).finish_save_ok(),
            SettingsAction::SaveFieldError(group, message) => {
                self.group_mut(group).finish_save_err(message);
            }
            SettingsAction::ClearSaveSuccess(group) => self.group_mut(group).clear_success(),
        }
    }

    /// Snapshot of a group's status for display.
    pub fn status(&self, group: SettingsGroup) -> GroupStatus {
        match group {
            SettingsGroup::Username => self.username.status(),
            SettingsGroup::Email => self.email.status(),
            SettingsGroup::DisplayName => self.display_name.status(),
            SettingsGroup::Picture => self.picture.status(),
            SettingsGroup::Profile => self.profile.status(),
            SettingsGroup::Password => self.password.status(),
            SettingsGroup::DeleteAccount => self.delete_account.status(),
        }
    }

    /// Current value of a scalar group.
    pub fn scalar_value(&self, field: ScalarField) -> String {
        match field {
            ScalarField::Username => self.username.value.clone(),
            ScalarField::Email => self.email.value.clone(),
            ScalarField::DisplayName => self.display_name.value.clone(),
            ScalarField::Picture => self.picture.value.clone().unwrap_or_default(),
        }
    }

    fn group_mut(&mut self, group: SettingsGroup) -> &mut dyn GroupTransitions {
        match group {
            SettingsGroup::Username => &mut self.username,
            SettingsGroup::Email => &mut self.email,
            SettingsGroup::DisplayName => &mut self.display_name,
            SettingsGroup::Picture => &mut self.picture,
            SettingsGroup::Profile => &mut self.profile,
            SettingsGroup::Password => &mut self.password,
            SettingsGroup::DeleteAccount => &mut self.delete_account,
        }
    }
}

/// Status transitions shared by every group, whatever its value type.
trait GroupTransitions {
    fn set_error(&mut self, message: Option<String>);
    fn begin_save(&mut self);
    fn finish_save_ok(&mut self);
    fn finish_save_err(&mut self, message: String);
    fn clear_success(&mut self);
}

impl<T> GroupTransitions for FieldGroup<T> {
    fn set_error(&mut self, message: Option<String>) {
        self.error = message;
    }

    fn begin_save(&mut self) {
        self.loading = true;
        self.error = None;
        self.success = false;
    }

    fn finish_save_ok(&mut self) {
        self.loading = false;
        self.error = None;
        self.success = true;
    }

    fn finish_save_err(&mut self, message: String) {
        self.loading = false;
        self.success = false;
        self.error = Some(message);
    }

    fn clear_success(&mut self) {
        self.success = false;
    }
}

// ============================================================================
// Submission
// ============================================================================

/// Raw form values of one group at the moment its save button is pressed.
///
/// Scalar and profile groups read their value from the store; password
/// entries never enter the store and arrive here directly.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupSubmission {
    Username,
    Email,
    DisplayName,
    Profile,
    Password {
        current: String,
        new_password: String,
        repeat_new_password: String,
    },
    DeleteAccount {
        password: String,
    },
}

/// The one network request a validated submission produces.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateRequest {
    Username { username: String },
    Email { email: String },
    Profile { patch: ProfilePatch },
    Password { current: String, new_password: String },
    DeleteAccount { password: String },
}

impl UpdateRequest {
    /// Group whose status tracks this request.
    pub fn group(&self) -> SettingsGroup {
        match self {
            Self::Username { .. } => SettingsGroup::Username,
            Self::Email { .. } => SettingsGroup::Email,
            Self::Profile { patch } => {
                // A one-key displayName patch is the display-name group's
                // own save; anything else is the profile group.
                if patch.len() == 1 && patch.contains_key("displayName") {
                    SettingsGroup::DisplayName
                } else {
                    SettingsGroup::Profile
                }
            }
            Self::Password { .. } => SettingsGroup::Password,
            Self::DeleteAccount { .. } => SettingsGroup::DeleteAccount,
        }
    }
}

/// Validate a group and start its submission.
///
/// On a validation failure the group's message is set and `None` comes back:
/// nothing may be sent. On success the group enters its loading state and
/// the returned request is the single call the caller issues, finishing
/// with `SaveFieldSuccess` or `SaveFieldError`.
pub fn begin_submit(
    state: &mut SettingsFormState,
    profile_fields: &[FieldDescriptor],
    submission: &GroupSubmission,
) -> Option<UpdateRequest> {
    let (group, checked) = match submission {
        GroupSubmission::Username => (
            SettingsGroup::Username,
            validators::validate_username(&state.username.value).map(|_| {
                UpdateRequest::Username {
                    username: state.username.value.clone(),
                }
            }),
        ),
        GroupSubmission::Email => (
            SettingsGroup::Email,
            validators::validate_email(&state.email.value).map(|_| UpdateRequest::Email {
                email: state.email.value.clone(),
            }),
        ),
        GroupSubmission::DisplayName => (
            SettingsGroup::DisplayName,
            validators::validate_display_name(&state.display_name.value).map(|_| {
                let mut patch = ProfilePatch::new();
                patch.insert(
                    "displayName".to_string(),
                    FieldValue::Text(state.display_name.value.clone()),
                );
                UpdateRequest::Profile { patch }
            }),
        ),
        GroupSubmission::Profile => (
            SettingsGroup::Profile,
            validators::validate_profile(profile_fields, &state.profile.value).map(|_| {
                UpdateRequest::Profile {
                    patch: state.profile.value.clone(),
                }
            }),
        ),
        GroupSubmission::Password {
            current,
            new_password,
            repeat_new_password,
        } => (
            SettingsGroup::Password,
            validators::validate_password_change(current, new_password, repeat_new_password)
                .map(|_| UpdateRequest::Password {
                    current: current.clone(),
                    new_password: new_password.clone(),
                }),
        ),
        GroupSubmission::DeleteAccount { password } => (
            SettingsGroup::DeleteAccount,
            validators::validate_delete_account(password).map(|_| UpdateRequest::DeleteAccount {
                password: password.clone(),
            }),
        ),
    };

    match checked {
        Err(message) => {
            state.apply(SettingsAction::SetValidationError(group, Some(message)));
            None
        }
        Ok(request) => {
            state.apply(SettingsAction::SaveField(group));
            Some(request)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use contracts::content::field::FieldType;
    use contracts::system::users::UserProfile;

    fn demo_user() -> User {
        let mut fields = BTreeMap::new();
        fields.insert("bio".to_string(), FieldValue::Text("Engineer".into()));
        User {
            id: "u-1".into(),
            username: "ada".into(),
            email: "ada@example.com".into(),
            email_verified: true,
            profile: UserProfile {
                display_name: Some("Ada".into()),
                picture: Some("files/ada.png".into()),
                fields,
            },
            roles: vec!["user".into()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn seeded_state() -> SettingsFormState {
        let mut state = SettingsFormState::default();
        state.apply(SettingsAction::SetInitialData(demo_user()));
        state
    }

    #[test]
    fn seeding_fills_every_group_value() {
        let state = seeded_state();
        assert!(state.seeded);
        assert_eq!(state.username.value, "ada");
        assert_eq!(state.email.value, "ada@example.com");
        assert_eq!(state.display_name.value, "Ada");
        assert_eq!(state.picture.value.as_deref(), Some("files/ada.png"));
        assert_eq!(
            state.profile.value.get("bio"),
            Some(&FieldValue::Text("Engineer".into()))
        );
    }

    #[test]
    fn seeding_twice_with_the_same_account_changes_nothing() {
        let mut once = SettingsFormState::default();
        once.apply(SettingsAction::SetInitialData(demo_user()));
        let mut twice = once.clone();
        twice.apply(SettingsAction::SetInitialData(demo_user()));
        assert_eq!(once, twice);
    }

    #[test]
    fn updating_a_value_leaves_status_untouched() {
        let mut state = seeded_state();
        state.apply(SettingsAction::SetValidationError(
            SettingsGroup::Username,
            Some("taken".into()),
        ));
        state.apply(SettingsAction::UpdateField(
            ScalarField::Username,
            "grace".into(),
        ));
        assert_eq!(state.username.value, "grace");
        assert_eq!(state.username.error.as_deref(), Some("taken"));
        assert!(!state.username.loading);
    }

    #[test]
    fn profile_updates_merge_key_by_key() {
        let mut state = seeded_state();
        state.apply(SettingsAction::UpdateProfileField(
            "website".into(),
            FieldValue::Text("https://ada.dev".into()),
        ));
        state.apply(SettingsAction::UpdateProfileField(
            "bio".into(),
            FieldValue::Text("Mathematician".into()),
        ));
        assert_eq!(
            state.profile.value.get("website"),
            Some(&FieldValue::Text("https://ada.dev".into()))
        );
        assert_eq!(
            state.profile.value.get("bio"),
            Some(&FieldValue::Text("Mathematician".into()))
        );
    }

    #[test]
    fn save_then_success_resolves_the_group() {
        let mut state = seeded_state();
        state.apply(SettingsAction::SaveField(SettingsGroup::Email));
        assert!(state.email.loading);
        assert_eq!(state.email.error, None);
        assert!(!state.email.success);

        state.apply(SettingsAction::SaveFieldSuccess(SettingsGroup::Email));
        assert!(!state.email.loading);
        assert_eq!(state.email.error, None);
        assert!(state.email.success);

        state.apply(SettingsAction::ClearSaveSuccess(SettingsGroup::Email));
        assert!(!state.email.success);
    }

    #[test]
    fn save_then_error_records_the_message() {
        let mut state = seeded_state();
        state.apply(SettingsAction::SaveField(SettingsGroup::Username));
        state.apply(SettingsAction::SaveFieldError(
            SettingsGroup::Username,
            "Username already taken".into(),
        ));
        assert!(!state.username.loading);
        assert!(!state.username.success);
        assert_eq!(
            state.username.error.as_deref(),
            Some("Username already taken")
        );
    }

    #[test]
    fn failed_groups_leave_the_rest_of_the_form_alone() {
        let mut state = seeded_state();
        state.apply(SettingsAction::SaveField(SettingsGroup::Password));
        state.apply(SettingsAction::SaveFieldError(
            SettingsGroup::Password,
            "Wrong password".into(),
        ));
        assert_eq!(state.username, seeded_state().username);
        assert_eq!(state.profile, seeded_state().profile);
    }

    #[test]
    fn short_username_is_stopped_before_any_request() {
        let mut state = seeded_state();
        state.apply(SettingsAction::UpdateField(ScalarField::Username, "ab".into()));

        let request = begin_submit(&mut state, &[], &GroupSubmission::Username);
        assert_eq!(request, None);
        assert_eq!(
            state.username.error.as_deref(),
            Some("Username must be at least 3 characters")
        );
        assert!(!state.username.loading);
    }

    #[test]
    fn valid_username_produces_exactly_one_request() {
        let mut state = seeded_state();
        state.apply(SettingsAction::UpdateField(ScalarField::Username, "abc".into()));

        let request = begin_submit(&mut state, &[], &GroupSubmission::Username);
        assert_eq!(
            request,
            Some(UpdateRequest::Username {
                username: "abc".into()
            })
        );
        assert!(state.username.loading);
        assert_eq!(state.username.error, None);
    }

    #[test]
    fn display_name_saves_as_a_one_key_profile_patch() {
        let mut state = seeded_state();
        state.apply(SettingsAction::UpdateField(
            ScalarField::DisplayName,
            "Countess".into(),
        ));

        let request = begin_submit(&mut state, &[], &GroupSubmission::DisplayName);
        let Some(request) = request else {
            panic!("expected a request");
        };
        assert_eq!(request.group(), SettingsGroup::DisplayName);
        match request {
            UpdateRequest::Profile { patch } => {
                assert_eq!(
                    patch.get("displayName"),
                    Some(&FieldValue::Text("Countess".into()))
                );
                assert_eq!(patch.len(), 1);
            }
            other => panic!("expected profile patch, got {:?}", other),
        }
        assert!(state.display_name.loading);
    }

    #[test]
    fn mismatched_password_entries_never_reach_the_network() {
        let mut state = seeded_state();
        let submission = GroupSubmission::Password {
            current: "old-secret".into(),
            new_password: "eight888".into(),
            repeat_new_password: "eight889".into(),
        };
        let request = begin_submit(&mut state, &[], &submission);
        assert_eq!(request, None);
        assert_eq!(
            state.password.error.as_deref(),
            Some("New passwords do not match")
        );

        let matching = GroupSubmission::Password {
            current: "old-secret".into(),
            new_password: "eight888".into(),
            repeat_new_password: "eight888".into(),
        };
        let request = begin_submit(&mut state, &[], &matching);
        assert_eq!(
            request,
            Some(UpdateRequest::Password {
                current: "old-secret".into(),
                new_password: "eight888".into(),
            })
        );
    }

    #[test]
    fn profile_submission_checks_configured_constraints() {
        let mut required = FieldDescriptor::new("bio", FieldType::TextArea, "Bio");
        required.required = true;

        let mut state = seeded_state();
        state.apply(SettingsAction::UpdateProfileField(
            "bio".into(),
            FieldValue::Text("".into()),
        ));
        let request = begin_submit(
            &mut state,
            std::slice::from_ref(&required),
            &GroupSubmission::Profile,
        );
        assert_eq!(request, None);
        assert_eq!(state.profile.error.as_deref(), Some("Bio is required"));

        state.apply(SettingsAction::UpdateProfileField(
            "bio".into(),
            FieldValue::Text("Engineer".into()),
        ));
        let request = begin_submit(
            &mut state,
            std::slice::from_ref(&required),
            &GroupSubmission::Profile,
        );
        match request {
            Some(UpdateRequest::Profile { patch }) => {
                assert_eq!(
                    patch.get("bio"),
                    Some(&FieldValue::Text("Engineer".into()))
                );
            }
            other => panic!("expected profile request, got {:?}", other),
        }
        assert!(state.profile.loading);
    }
}
