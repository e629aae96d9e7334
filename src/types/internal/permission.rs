use bitflags::bitflags;

bitflags! {
    /// Capability bit flags combined into per-role permission masks
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Permission: i32 {
        /// Follow other users
        const FOLLOW = 0x01;
        /// Comment on posts
        const COMMENT = 0x02;
        /// Write posts
        const WRITE = 0x04;
        /// Moderate comments from other users
        const MODERATE = 0x08;
        /// Full administrative access
        const ADMIN = 0x10;
    }
}

impl Permission {
    /// Permission set for ordinary users
    pub fn user() -> Self {
        Permission::FOLLOW | Permission::COMMENT | Permission::WRITE
    }

    /// Permission set for moderators
    pub fn moderator() -> Self {
        Self::user() | Permission::MODERATE
    }

    /// Permission set for administrators (every flag)
    pub fn administrator() -> Self {
        Permission::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_values_match_bit_positions() {
        assert_eq!(Permission::FOLLOW.bits(), 1);
        assert_eq!(Permission::COMMENT.bits(), 2);
        assert_eq!(Permission::WRITE.bits(), 4);
        assert_eq!(Permission::MODERATE.bits(), 8);
        assert_eq!(Permission::ADMIN.bits(), 16);
    }

    #[test]
    fn test_user_mask_is_seven() {
        // FOLLOW | COMMENT | WRITE = 1 | 2 | 4 = 7
        assert_eq!(Permission::user().bits(), 7);
    }

    #[test]
    fn test_user_mask_does_not_grant_moderate() {
        let mask = Permission::user();
        assert!(mask.contains(Permission::WRITE));
        assert!(!mask.contains(Permission::MODERATE));
        assert!(!mask.contains(Permission::ADMIN));
    }

    #[test]
    fn test_adding_a_flag_twice_is_idempotent() {
        let once = Permission::user() | Permission::MODERATE;
        let twice = once | Permission::MODERATE;
        assert_eq!(once, twice);
    }

    #[test]
    fn test_add_then_remove_cancels_out() {
        let original = Permission::user();
        let round_trip = (original | Permission::MODERATE) - Permission::MODERATE;
        assert_eq!(round_trip, original);
    }

    #[test]
    fn test_administrator_mask_contains_every_flag() {
        let mask = Permission::administrator();
        for flag in [
            Permission::FOLLOW,
            Permission::COMMENT,
            Permission::WRITE,
            Permission::MODERATE,
            Permission::ADMIN,
        ] {
            assert!(mask.contains(flag));
        }
    }
}
