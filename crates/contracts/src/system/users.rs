//! User account contracts

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::value::FieldValue;

/// Editable profile of a user.
///
/// `display_name` and `picture` are fixed; everything else is configured
/// through the profile field descriptors and sits in the flattened map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub email_verified: bool,
    pub profile: UserProfile,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Per-group update payloads
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUsernameDto {
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEmailDto {
    pub email: String,
}

/// Partial profile update: changed keys only, merged server-side into the
/// stored profile. `displayName` travels as a regular key here.
pub type ProfilePatch = BTreeMap<String, FieldValue>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordDto {
    /// Current password, verified before the change is applied.
    pub password: String,
    #[serde(rename = "newpassword")]
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAccountDto {
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_keeps_configured_fields_flattened() {
        let json = r#"{
            "displayName": "Ada",
            "picture": "files/ada.png",
            "bio": "Engineer",
            "links": ["https://example.com"]
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.display_name.as_deref(), Some("Ada"));
        assert_eq!(
            profile.fields.get("bio").and_then(|v| v.as_text()),
            Some("Engineer")
        );

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back["displayName"], "Ada");
        assert_eq!(back["bio"], "Engineer");
    }

    #[test]
    fn password_change_uses_wire_field_names() {
        let dto = ChangePasswordDto {
            password: "current".into(),
            new_password: "next-secret".into(),
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["password"], "current");
        assert_eq!(json["newpassword"], "next-secret");
    }
}
