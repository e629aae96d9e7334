use crate::types::db::{role, user};
use crate::types::internal::permission::Permission;

/// The requester resolved by the authentication layer.
///
/// Replaces mixin-style anonymous-user polymorphism with a tagged variant:
/// permission checks work uniformly whether or not anyone is logged in,
/// and `Anonymous` always answers false.
#[derive(Debug, Clone)]
pub enum CurrentUser {
    Authenticated { user: user::Model, role: role::Model },
    Anonymous,
}

impl CurrentUser {
    /// True iff the requester's role grants every bit of `perm`
    pub fn can(&self, perm: Permission) -> bool {
        match self {
            CurrentUser::Authenticated { role, .. } => role.has_permission(perm),
            CurrentUser::Anonymous => false,
        }
    }

    pub fn is_administrator(&self) -> bool {
        self.can(Permission::ADMIN)
    }

    pub fn user(&self) -> Option<&user::Model> {
        match self {
            CurrentUser::Authenticated { user, .. } => Some(user),
            CurrentUser::Anonymous => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticated_with(permissions: i32) -> CurrentUser {
        CurrentUser::Authenticated {
            user: user::Model {
                id: 1,
                email: "user@example.com".to_string(),
                username: "user".to_string(),
                password_hash: "$argon2id$stub".to_string(),
                role_id: 1,
                confirmed: true,
                member_since: 0,
                last_seen: 0,
            },
            role: role::Model {
                id: 1,
                name: "Test".to_string(),
                is_default: false,
                permissions,
            },
        }
    }

    #[test]
    fn test_anonymous_can_nothing() {
        let anon = CurrentUser::Anonymous;
        assert!(!anon.can(Permission::FOLLOW));
        assert!(!anon.can(Permission::ADMIN));
        assert!(!anon.is_administrator());
        assert!(anon.user().is_none());
    }

    #[test]
    fn test_authenticated_user_checks_role_mask() {
        let current = authenticated_with(Permission::user().bits());
        assert!(current.can(Permission::WRITE));
        assert!(!current.can(Permission::MODERATE));
        assert!(!current.is_administrator());
    }

    #[test]
    fn test_administrator_detected_by_admin_bit() {
        let current = authenticated_with(Permission::administrator().bits());
        assert!(current.is_administrator());
        assert!(current.can(Permission::MODERATE));
    }
}
