//! Static role to permission table.
//!
//! Roles are stored on the account; permissions are never persisted. A
//! missing or unrecognised role holds no permissions.

use std::fmt;
use std::str::FromStr;

use serde_json::json;

use crate::domain::{Error, UserRole};

/// Capabilities granted by a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    ViewArticles,
    CreateArticles,
    EditArticles,
    DeleteArticles,
    ViewEvents,
    CreateEvents,
    EditEvents,
    DeleteEvents,
    ManageUsers,
    ViewAnalytics,
    CreateGifts,
    ViewTickets,
    PurchaseTickets,
    ViewGifts,
    UseGifts,
}

impl Permission {
    /// Stable snake-case identifier.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ViewArticles => "view_articles",
            Self::CreateArticles => "create_articles",
            Self::EditArticles => "edit_articles",
            Self::DeleteArticles => "delete_articles",
            Self::ViewEvents => "view_events",
            Self::CreateEvents => "create_events",
            Self::EditEvents => "edit_events",
            Self::DeleteEvents => "delete_events",
            Self::ManageUsers => "manage_users",
            Self::ViewAnalytics => "view_analytics",
            Self::CreateGifts => "create_gifts",
            Self::ViewTickets => "view_tickets",
            Self::PurchaseTickets => "purchase_tickets",
            Self::ViewGifts => "view_gifts",
            Self::UseGifts => "use_gifts",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown permission name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission: {0}")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ALL_PERMISSIONS
            .iter()
            .copied()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| UnknownPermission(value.to_owned()))
    }
}

const ALL_PERMISSIONS: [Permission; 15] = [
    Permission::ViewArticles,
    Permission::CreateArticles,
    Permission::EditArticles,
    Permission::DeleteArticles,
    Permission::ViewEvents,
    Permission::CreateEvents,
    Permission::EditEvents,
    Permission::DeleteEvents,
    Permission::ManageUsers,
    Permission::ViewAnalytics,
    Permission::CreateGifts,
    Permission::ViewTickets,
    Permission::PurchaseTickets,
    Permission::ViewGifts,
    Permission::UseGifts,
];

const ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::ViewArticles,
    Permission::CreateArticles,
    Permission::EditArticles,
    Permission::DeleteArticles,
    Permission::ViewEvents,
    Permission::CreateEvents,
    Permission::EditEvents,
    Permission::DeleteEvents,
    Permission::ManageUsers,
    Permission::ViewAnalytics,
    Permission::CreateGifts,
];

const PLANNER_PERMISSIONS: &[Permission] = &[
    Permission::ViewArticles,
    Permission::ViewEvents,
    Permission::CreateEvents,
    Permission::EditEvents,
    Permission::ViewTickets,
];

const USER_PERMISSIONS: &[Permission] = &[
    Permission::ViewArticles,
    Permission::ViewEvents,
    Permission::PurchaseTickets,
    Permission::ViewGifts,
    Permission::UseGifts,
];

/// Display name shown for an unknown or missing role.
pub const UNKNOWN_ROLE_DISPLAY_NAME: &str = "不明";

/// Permissions granted to `role`; empty when no role is known.
///
/// # Examples
/// ```
/// use localconnect::domain::{Permission, UserRole, permissions_for};
///
/// assert!(permissions_for(Some(UserRole::Planner)).contains(&Permission::CreateEvents));
/// assert!(permissions_for(None).is_empty());
/// ```
pub fn permissions_for(role: Option<UserRole>) -> &'static [Permission] {
    match role {
        Some(UserRole::Admin) => ADMIN_PERMISSIONS,
        Some(UserRole::Planner) => PLANNER_PERMISSIONS,
        Some(UserRole::User) => USER_PERMISSIONS,
        None => &[],
    }
}

/// Whether `role` grants `permission`.
pub fn has_permission(role: Option<UserRole>, permission: Permission) -> bool {
    permissions_for(role).contains(&permission)
}

/// Whether `role` is exactly `required`.
pub fn check_role(role: Option<UserRole>, required: UserRole) -> bool {
    role == Some(required)
}

/// Whether `role` is any of `allowed`.
pub fn check_roles(role: Option<UserRole>, allowed: &[UserRole]) -> bool {
    role.is_some_and(|role| allowed.contains(&role))
}

/// Japanese display name for `role`.
pub fn role_display_name(role: Option<UserRole>) -> &'static str {
    match role {
        Some(UserRole::Admin) => "管理者",
        Some(UserRole::Planner) => "イベントプランナー",
        Some(UserRole::User) => "ユーザー",
        None => UNKNOWN_ROLE_DISPLAY_NAME,
    }
}

/// Fail with `403 Forbidden` unless `role` grants `permission`.
pub fn require_permission(role: Option<UserRole>, permission: Permission) -> Result<(), Error> {
    if has_permission(role, permission) {
        return Ok(());
    }
    Err(
        Error::forbidden(format!("missing permission: {permission}")).with_details(json!({
            "permission": permission.as_str(),
            "role": role.map(UserRole::as_str),
            "code": "missing_permission",
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(UserRole::Admin, Permission::CreateArticles, true)]
    #[case(UserRole::Admin, Permission::CreateGifts, true)]
    #[case(UserRole::Admin, Permission::ManageUsers, true)]
    #[case(UserRole::Admin, Permission::PurchaseTickets, false)]
    #[case(UserRole::Planner, Permission::CreateEvents, true)]
    #[case(UserRole::Planner, Permission::ViewTickets, true)]
    #[case(UserRole::Planner, Permission::CreateArticles, false)]
    #[case(UserRole::Planner, Permission::DeleteEvents, false)]
    #[case(UserRole::User, Permission::UseGifts, true)]
    #[case(UserRole::User, Permission::PurchaseTickets, true)]
    #[case(UserRole::User, Permission::CreateEvents, false)]
    #[case(UserRole::User, Permission::CreateGifts, false)]
    fn permission_table_matches_roles(
        #[case] role: UserRole,
        #[case] permission: Permission,
        #[case] expected: bool,
    ) {
        assert_eq!(has_permission(Some(role), permission), expected);
    }

    #[test]
    fn unknown_role_has_no_permissions() {
        assert!(
            ALL_PERMISSIONS
                .iter()
                .all(|permission| !has_permission(None, *permission))
        );
        assert_eq!(role_display_name(None), UNKNOWN_ROLE_DISPLAY_NAME);
    }

    #[test]
    fn table_sizes_match_definitions() {
        assert_eq!(permissions_for(Some(UserRole::Admin)).len(), 11);
        assert_eq!(permissions_for(Some(UserRole::Planner)).len(), 5);
        assert_eq!(permissions_for(Some(UserRole::User)).len(), 5);
    }

    #[test]
    fn role_checks() {
        assert!(check_role(Some(UserRole::Admin), UserRole::Admin));
        assert!(!check_role(None, UserRole::User));
        assert!(check_roles(
            Some(UserRole::Planner),
            &[UserRole::Admin, UserRole::Planner]
        ));
        assert!(!check_roles(Some(UserRole::User), &[UserRole::Admin]));
        assert!(!check_roles(None, &[UserRole::User]));
    }

    #[test]
    fn display_names_are_localised() {
        assert_eq!(role_display_name(Some(UserRole::Admin)), "管理者");
        assert_eq!(
            role_display_name(Some(UserRole::Planner)),
            "イベントプランナー"
        );
        assert_eq!(role_display_name(Some(UserRole::User)), "ユーザー");
    }

    #[test]
    fn permissions_parse_from_names() {
        assert_eq!("use_gifts".parse(), Ok(Permission::UseGifts));
        assert!("fly".parse::<Permission>().is_err());
    }

    #[test]
    fn require_permission_reports_forbidden_details() {
        let error = require_permission(Some(UserRole::User), Permission::CreateArticles)
            .expect_err("plain users cannot create articles");
        assert_eq!(error.code(), ErrorCode::Forbidden);
        let details = error.details().expect("details present");
        assert_eq!(details["permission"], "create_articles");
        assert_eq!(details["role"], "user");
    }
}
