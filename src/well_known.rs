//! Well-known SIDs and domain-relative RIDs.
//!
//! Source: https://learn.microsoft.com/windows/win32/secauthz/well-known-sids
//!
//! The absolute SIDs are plain [`Sid`] constants. Domain accounts and groups
//! only have a fixed RID; combine it with a domain SID through
//! [`domain_principal`].

use crate::{Sid, SidIdentifierAuthority};

#[allow(
    clippy::panic,
    reason = "only evaluated in constant initializers, where it fails the build"
)]
const fn well_known<const N: usize>(
    identifier_authority: SidIdentifierAuthority,
    sub_authority: [u32; N],
) -> Sid {
    match Sid::from_array(Sid::REVISION, identifier_authority, sub_authority) {
        Some(sid) => sid,
        None => panic!("well-known SID with an invalid sub-authority count"),
    }
}

const fn nt<const N: usize>(sub_authority: [u32; N]) -> Sid {
    well_known(SidIdentifierAuthority::NT_AUTHORITY, sub_authority)
}

// ---- Basic Authorities ----

/// Null SID (S-1-0-0)
pub const NULL: Sid = well_known(SidIdentifierAuthority::NULL_AUTHORITY, [0]);

/// World SID (S-1-1-0)
pub const WORLD: Sid = well_known(SidIdentifierAuthority::SECURITY_WORLD_AUTHORITY, [0]);

/// Local SID (S-1-2-0)
pub const LOCAL: Sid = well_known(SidIdentifierAuthority::SECURITY_LOCAL_AUTHORITY, [0]);

/// Creator Owner SID (S-1-3-0)
pub const CREATOR_OWNER: Sid = well_known(SidIdentifierAuthority::SECURITY_CREATOR_AUTHORITY, [0]);

/// Creator Group SID (S-1-3-1)
pub const CREATOR_GROUP: Sid = well_known(SidIdentifierAuthority::SECURITY_CREATOR_AUTHORITY, [1]);

// ---- NT Authority (S-1-5) ----

/// Self (S-1-5-10), the principal the ACE applies to.
pub const PRINCIPAL_SELF: Sid = nt([10]);

/// Authenticated Users (S-1-5-11)
pub const AUTHENTICATED_USERS: Sid = nt([11]);

/// Local System (S-1-5-18)
pub const LOCAL_SYSTEM: Sid = nt([18]);

/// Local Service (S-1-5-19)
pub const LOCAL_SERVICE: Sid = nt([19]);

/// Network Service (S-1-5-20)
pub const NETWORK_SERVICE: Sid = nt([20]);

// ---- BUILTIN Domain (S-1-5-32) ----

/// BUILTIN\Administrators (S-1-5-32-544)
pub const BUILTIN_ADMINISTRATORS: Sid = nt([32, 544]);

/// BUILTIN\Users (S-1-5-32-545)
pub const BUILTIN_USERS: Sid = nt([32, 545]);

/// BUILTIN\Guests (S-1-5-32-546)
pub const BUILTIN_GUESTS: Sid = nt([32, 546]);

/// BUILTIN\Account Operators (S-1-5-32-548)
pub const BUILTIN_ACCOUNT_OPERATORS: Sid = nt([32, 548]);

/// BUILTIN\Server Operators (S-1-5-32-549)
pub const BUILTIN_SERVER_OPERATORS: Sid = nt([32, 549]);

/// BUILTIN\Print Operators (S-1-5-32-550)
pub const BUILTIN_PRINT_OPERATORS: Sid = nt([32, 550]);

/// BUILTIN\Backup Operators (S-1-5-32-551)
pub const BUILTIN_BACKUP_OPERATORS: Sid = nt([32, 551]);

// ---- Domain relative identifiers ----

pub const DOMAIN_USER_RID_ADMIN: u32 = 500;
pub const DOMAIN_USER_RID_GUEST: u32 = 501;
pub const DOMAIN_USER_RID_KRBTGT: u32 = 502;
/// Domain Admins
pub const DOMAIN_GROUP_RID_ADMINS: u32 = 512;
/// Domain Users, the default `primaryGroupID` of users.
pub const DOMAIN_GROUP_RID_USERS: u32 = 513;
pub const DOMAIN_GROUP_RID_GUESTS: u32 = 514;
/// Domain Computers, the default `primaryGroupID` of computers.
pub const DOMAIN_GROUP_RID_COMPUTERS: u32 = 515;
pub const DOMAIN_GROUP_RID_CONTROLLERS: u32 = 516;
pub const DOMAIN_GROUP_RID_CERT_ADMINS: u32 = 517;
pub const DOMAIN_GROUP_RID_SCHEMA_ADMINS: u32 = 518;
pub const DOMAIN_GROUP_RID_ENTERPRISE_ADMINS: u32 = 519;
pub const DOMAIN_GROUP_RID_POLICY_ADMINS: u32 = 520;

/// SID of a domain-relative principal, e.g. the group named by a user's
/// `primaryGroupID`.
///
/// ```rust
/// # use adldap::{Sid, well_known};
/// let domain: Sid = "S-1-5-21-1004336348-1177238915-682003330".parse().unwrap();
/// let users = well_known::domain_principal(&domain, well_known::DOMAIN_GROUP_RID_USERS).unwrap();
/// assert_eq!(users.to_string(), "S-1-5-21-1004336348-1177238915-682003330-513");
/// ```
#[inline]
#[must_use]
pub fn domain_principal(domain: &Sid, rid: u32) -> Option<Sid> {
    domain.with_rid(rid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(NULL.to_string(), "S-1-0-0");
        assert_eq!(WORLD.to_string(), "S-1-1-0");
        assert_eq!(CREATOR_GROUP.to_string(), "S-1-3-1");
        assert_eq!(LOCAL_SYSTEM.to_string(), "S-1-5-18");
        assert_eq!(BUILTIN_BACKUP_OPERATORS.to_string(), "S-1-5-32-551");
    }

    #[test]
    fn builtin_rids() {
        assert_eq!(BUILTIN_ADMINISTRATORS.rid(), 544);
        assert_eq!(BUILTIN_USERS.domain_sid(), Some(nt([32])));
    }
}
