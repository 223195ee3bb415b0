//! Route guarding for the role-restricted dashboards. Pure and synchronous:
//! navigation is the only effect, and the caller performs it.

use crate::types::api::UserInfo;
use crate::types::role::Role;

#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome {
    /// Session present and the role matches; render for this user.
    Allow(UserInfo),
    /// No session, or the wrong role; navigate to this route instead.
    Redirect(&'static str),
}

/// Decide whether a dashboard requiring `required` may render for `session`.
/// No session goes to `/login`; a mismatched role goes to its own home.
pub fn decide(required: Role, session: Option<UserInfo>) -> GuardOutcome {
    match session {
        None => GuardOutcome::Redirect("/login"),
        Some(user) if user.role == required => GuardOutcome::Allow(user),
        Some(user) => GuardOutcome::Redirect(user.role.home_path()),
    }
}

/// Where `/` lands: role home for a live session, `/login` otherwise.
pub fn landing(session: Option<&UserInfo>) -> &'static str {
    match session {
        None => "/login",
        Some(user) => user.role.home_path(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: Role) -> UserInfo {
        UserInfo {
            id: 1,
            name: "Jane".to_string(),
            email: "jane@x.com".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn no_session_redirects_to_login() {
        assert_eq!(decide(Role::Admin, None), GuardOutcome::Redirect("/login"));
        assert_eq!(landing(None), "/login");
    }

    #[test]
    fn matching_role_is_allowed() {
        let admin = user(Role::Admin);
        assert_eq!(
            decide(Role::Admin, Some(admin.clone())),
            GuardOutcome::Allow(admin)
        );
    }

    #[test]
    fn wrong_role_redirects_to_own_home() {
        assert_eq!(
            decide(Role::Admin, Some(user(Role::Student))),
            GuardOutcome::Redirect("/student")
        );
        assert_eq!(
            decide(Role::Student, Some(user(Role::Admin))),
            GuardOutcome::Redirect("/admin")
        );
    }

    #[test]
    fn landing_follows_the_session_role() {
        assert_eq!(landing(Some(&user(Role::Admin))), "/admin");
        assert_eq!(landing(Some(&user(Role::Student))), "/student");
    }
}
