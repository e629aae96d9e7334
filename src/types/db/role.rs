use sea_orm::entity::prelude::*;

use crate::types::internal::permission::Permission;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub is_default: bool,
    pub permissions: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user::Entity")]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// True iff every bit of `perm` is set in this role's mask
    pub fn has_permission(&self, perm: Permission) -> bool {
        self.permissions & perm.bits() == perm.bits()
    }

    /// Set the bits of `perm`; a no-op if already granted
    pub fn add_permission(&mut self, perm: Permission) {
        if !self.has_permission(perm) {
            self.permissions |= perm.bits();
        }
    }

    /// Clear the bits of `perm`; a no-op if not granted
    pub fn remove_permission(&mut self, perm: Permission) {
        if self.has_permission(perm) {
            self.permissions &= !perm.bits();
        }
    }

    /// Clear the entire mask
    pub fn reset_permissions(&mut self) {
        self.permissions = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role_with_mask(permissions: i32) -> Model {
        Model {
            id: 1,
            name: "Test".to_string(),
            is_default: false,
            permissions,
        }
    }

    #[test]
    fn test_has_permission_on_seeded_user_mask() {
        let role = role_with_mask(Permission::user().bits());
        assert_eq!(role.permissions, 7);
        assert!(role.has_permission(Permission::FOLLOW));
        assert!(role.has_permission(Permission::WRITE));
        assert!(!role.has_permission(Permission::MODERATE));
        assert!(!role.has_permission(Permission::ADMIN));
    }

    #[test]
    fn test_add_permission_sets_bit() {
        let mut role = role_with_mask(0);
        role.add_permission(Permission::COMMENT);
        assert!(role.has_permission(Permission::COMMENT));
        assert_eq!(role.permissions, Permission::COMMENT.bits());
    }

    #[test]
    fn test_add_permission_twice_leaves_mask_unchanged() {
        let mut role = role_with_mask(0);
        role.add_permission(Permission::MODERATE);
        let after_first = role.permissions;
        role.add_permission(Permission::MODERATE);
        assert_eq!(role.permissions, after_first);
    }

    #[test]
    fn test_remove_permission_clears_bit() {
        let mut role = role_with_mask(Permission::user().bits());
        role.remove_permission(Permission::WRITE);
        assert!(!role.has_permission(Permission::WRITE));
        assert!(role.has_permission(Permission::FOLLOW));
        assert!(role.has_permission(Permission::COMMENT));
    }

    #[test]
    fn test_remove_absent_permission_is_noop() {
        let mut role = role_with_mask(Permission::user().bits());
        let before = role.permissions;
        role.remove_permission(Permission::ADMIN);
        assert_eq!(role.permissions, before);
    }

    #[test]
    fn test_add_then_remove_restores_original_mask() {
        let mut role = role_with_mask(Permission::user().bits());
        let original = role.permissions;
        role.add_permission(Permission::MODERATE);
        role.remove_permission(Permission::MODERATE);
        assert_eq!(role.permissions, original);
    }

    #[test]
    fn test_reset_permissions_clears_everything() {
        let mut role = role_with_mask(Permission::administrator().bits());
        role.reset_permissions();
        assert_eq!(role.permissions, 0);
        assert!(!role.has_permission(Permission::FOLLOW));
    }

    #[test]
    fn test_has_permission_requires_every_bit_of_compound_mask() {
        let role = role_with_mask(Permission::FOLLOW.bits());
        assert!(!role.has_permission(Permission::FOLLOW | Permission::COMMENT));
    }
}
