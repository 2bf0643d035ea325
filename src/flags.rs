//! Closed enumerations backed by bits of a 32-bit control mask.
//!
//! Each member maps to at most one bit. Members without a bit (for example
//! [`AccountOption::PasswordExpired`]) return `0` from `bit()` and are resolved
//! by callers from other attributes; never feed a `0` bit to
//! [`bit_set`](crate::bits::bit_set) and never read it as "false".

use crate::bits::bit_is_set;

/// `userAccountControl`
pub const ATTRIBUTE_USER_ACCOUNT_CONTROL: &str = "userAccountControl";
/// `groupType`
pub const ATTRIBUTE_GROUP_TYPE: &str = "groupType";
/// `pwdLastSet`
pub const ATTRIBUTE_PWD_LAST_SET: &str = "pwdLastSet";
/// `member`, the DNs of a group's direct members.
pub const ATTRIBUTE_MEMBER: &str = "member";

/// User account options shown as checkboxes on an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AccountOption {
    Disabled,
    CantChangePassword,
    PasswordExpired,
    DontExpirePassword,
    UseDesKey,
    SmartcardRequired,
    CantDelegate,
    DontRequirePreauth,
}

impl AccountOption {
    pub const ALL: [Self; 8] = [
        Self::Disabled,
        Self::CantChangePassword,
        Self::PasswordExpired,
        Self::DontExpirePassword,
        Self::UseDesKey,
        Self::SmartcardRequired,
        Self::CantDelegate,
        Self::DontRequirePreauth,
    ];

    /// The `userAccountControl` bit, or `0` when the option is not stored there.
    #[inline]
    #[must_use]
    pub const fn bit(self) -> u32 {
        match self {
            Self::Disabled => 0x0000_0002,
            Self::DontExpirePassword => 0x0001_0000,
            Self::UseDesKey => 0x0020_0000,
            Self::SmartcardRequired => 0x0004_0000,
            Self::DontRequirePreauth => 0x0040_0000,
            Self::CantDelegate => 0x0010_0000,
            // Derived from pwdLastSet and the object's ACL respectively.
            Self::CantChangePassword | Self::PasswordExpired => 0,
        }
    }

    /// Whether the option lives in `userAccountControl`.
    #[inline]
    #[must_use]
    pub const fn has_bit(self) -> bool {
        self.bit() != 0
    }

    /// Reads the option from a `userAccountControl` mask.
    ///
    /// `None` for options that have no bit.
    #[inline]
    #[must_use]
    pub const fn is_set_in(self, mask: u32) -> Option<bool> {
        if self.has_bit() {
            Some(bit_is_set(mask, self.bit()))
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Disabled => "Account disabled",
            Self::CantChangePassword => "User cannot change password",
            Self::PasswordExpired => "User must change password on next logon",
            Self::DontExpirePassword => "Don't expire password",
            Self::UseDesKey => "Store password using reversible encryption",
            Self::SmartcardRequired => "Smartcard is required for interactive logon",
            Self::CantDelegate => "Account is sensitive and cannot be delegated",
            Self::DontRequirePreauth => "Don't require Kerberos preauthentication",
        }
    }
}

/// Scope of a group, one of three mutually exclusive `groupType` bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupScope {
    Global,
    DomainLocal,
    Universal,
}

impl GroupScope {
    pub const ALL: [Self; 3] = [Self::Global, Self::DomainLocal, Self::Universal];

    /// Union of every scope bit.
    pub const MASK: u32 = 0x0000_0002 | 0x0000_0004 | 0x0000_0008;

    #[inline]
    #[must_use]
    pub const fn bit(self) -> u32 {
        match self {
            Self::Global => 0x0000_0002,
            Self::DomainLocal => 0x0000_0004,
            Self::Universal => 0x0000_0008,
        }
    }

    /// First scope whose bit is set in a `groupType` mask.
    #[inline]
    #[must_use]
    pub fn from_mask(mask: u32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|scope| bit_is_set(mask, scope.bit()))
    }

    /// `mask` with its scope bits replaced by this scope.
    #[inline]
    #[must_use]
    pub const fn apply_to(self, mask: u32) -> u32 {
        (mask & !Self::MASK) | self.bit()
    }

    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Global => "Global",
            Self::DomainLocal => "Domain Local",
            Self::Universal => "Universal",
        }
    }
}

/// Security groups carry the security bit; distribution groups do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupType {
    Security,
    Distribution,
}

impl GroupType {
    pub const ALL: [Self; 2] = [Self::Security, Self::Distribution];

    /// `GROUP_TYPE_SECURITY_ENABLED`
    pub const SECURITY_BIT: u32 = 0x8000_0000;

    /// The `groupType` bit, `0` for distribution groups which are the
    /// absence of the security bit.
    #[inline]
    #[must_use]
    pub const fn bit(self) -> u32 {
        match self {
            Self::Security => Self::SECURITY_BIT,
            Self::Distribution => 0,
        }
    }

    #[inline]
    #[must_use]
    pub const fn from_mask(mask: u32) -> Self {
        if bit_is_set(mask, Self::SECURITY_BIT) {
            Self::Security
        } else {
            Self::Distribution
        }
    }

    /// `mask` with the security bit set or cleared for this type.
    #[inline]
    #[must_use]
    pub const fn apply_to(self, mask: u32) -> u32 {
        crate::bits::bit_set(mask, Self::SECURITY_BIT, matches!(self, Self::Security))
    }

    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Security => "Security",
            Self::Distribution => "Distribution",
        }
    }

    /// Noun phrase form, e.g. for a "New ..." title.
    #[inline]
    #[must_use]
    pub const fn label_adjective(self) -> &'static str {
        match self {
            Self::Security => "Security Group",
            Self::Distribution => "Distribution Group",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::bit_set;

    #[test]
    fn account_option_bit_table() {
        assert_eq!(AccountOption::Disabled.bit(), 0x0000_0002);
        assert_eq!(AccountOption::DontExpirePassword.bit(), 0x0001_0000);
        assert_eq!(AccountOption::PasswordExpired.bit(), 0);
        assert_eq!(AccountOption::CantChangePassword.bit(), 0);
    }

    #[test]
    fn options_without_bit_are_unknown_not_false() {
        assert_eq!(AccountOption::PasswordExpired.is_set_in(u32::MAX), None);
        assert_eq!(AccountOption::Disabled.is_set_in(0x0202), Some(true));
        assert_eq!(AccountOption::Disabled.is_set_in(0x0200), Some(false));
    }

    #[test]
    fn bits_are_distinct() {
        let mut seen = 0u32;
        for option in AccountOption::ALL.into_iter().filter(|o| o.has_bit()) {
            assert_eq!(seen & option.bit(), 0, "{option:?} overlaps");
            seen = bit_set(seen, option.bit(), true);
        }
    }

    #[test]
    fn group_scope_round_trip() {
        // Global security group as stored by the directory.
        let mask = 0x8000_0002;
        assert_eq!(GroupScope::from_mask(mask), Some(GroupScope::Global));
        let universal = GroupScope::Universal.apply_to(mask);
        assert_eq!(universal, 0x8000_0008);
        assert_eq!(GroupScope::from_mask(universal), Some(GroupScope::Universal));
        assert_eq!(GroupScope::from_mask(0), None);
    }

    #[test]
    fn group_type_round_trip() {
        assert_eq!(GroupType::from_mask(0x8000_0004), GroupType::Security);
        assert_eq!(GroupType::from_mask(0x0000_0004), GroupType::Distribution);
        assert_eq!(GroupType::Distribution.apply_to(0x8000_0004), 0x0000_0004);
        assert_eq!(GroupType::Security.apply_to(0x0000_0004), 0x8000_0004);
        assert_eq!(GroupType::Security.label_adjective(), "Security Group");
    }
}
