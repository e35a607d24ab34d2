//! Capability checks consumed by display logic
//!
//! Enforcement lives in the server's collaborators; these helpers only
//! decide what the interface offers.

use super::users::User;

/// Role granted to everyone, signed in or not.
pub const PUBLIC_ROLE: &str = "public";

/// True when the user holds any of the allowed roles.
pub fn has_any_role(user: Option<&User>, allowed: &[String]) -> bool {
    if allowed.iter().any(|role| role == PUBLIC_ROLE) {
        return true;
    }
    let Some(user) = user else {
        return false;
    };
    user.roles.iter().any(|role| allowed.iter().any(|a| a == role))
}

/// True when any of the capability role lists admits the user.
pub fn has_permission(user: Option<&User>, capabilities: &[&[String]]) -> bool {
    capabilities
        .iter()
        .any(|allowed| has_any_role(user, allowed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::users::UserProfile;
    use chrono::Utc;

    fn user_with_roles(roles: &[&str]) -> User {
        User {
            id: "u1".into(),
            username: "ada".into(),
            email: "ada@example.com".into(),
            email_verified: true,
            profile: UserProfile::default(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn public_opens_a_capability_to_everyone() {
        let allowed = vec!["public".to_string()];
        assert!(has_any_role(None, &allowed));
        assert!(has_any_role(Some(&user_with_roles(&["user"])), &allowed));
    }

    #[test]
    fn role_intersection_grants_access() {
        let allowed = vec!["admin".to_string(), "editor".to_string()];
        assert!(!has_any_role(None, &allowed));
        assert!(!has_any_role(Some(&user_with_roles(&["user"])), &allowed));
        assert!(has_any_role(Some(&user_with_roles(&["editor"])), &allowed));
    }

    #[test]
    fn any_capability_in_the_list_is_enough() {
        let admin = vec!["admin".to_string()];
        let update = vec!["user".to_string()];
        let user = user_with_roles(&["user"]);
        assert!(has_permission(Some(&user), &[&admin, &update]));
        assert!(!has_permission(Some(&user), &[&admin]));
    }
}
