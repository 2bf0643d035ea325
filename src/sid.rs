//! Security identifiers as stored in `objectSid` and related attributes.
//!
//! [`Sid`] is a plain value type: a revision, a 6-byte identifier authority
//! and up to 15 sub-authorities kept inline. It converts to and from both the
//! canonical text form (`S-1-5-21-...-1104`) and the directory's binary form.
//!
//! # Binary layout
//! ```text
//! offset  size  field
//! 0       1     revision (always 1)
//! 1       1     sub-authority count (1..=15)
//! 2       6     identifier authority, big-endian
//! 8       4*n   sub-authorities, little-endian u32
//! ```

use core::fmt::{self, Debug, Display};
use core::str::FromStr;

use arrayvec::ArrayVec;
use parsing::SidComponents;

pub use parsing::{InvalidSidFormat, MAX_SUBAUTHORITY_COUNT, MIN_SUBAUTHORITY_COUNT};

use crate::SidIdentifierAuthority;
use crate::utils::{self, sid_binary_len, sub_authority_size_guard, validate_sid_bytes};

/// Size of the fixed header (revision, count, authority).
pub const SID_HEAD_SIZE: usize = 8;

/// Largest binary SID: header plus 15 sub-authorities.
pub const MAX_SID_BINARY_LEN: usize = sid_binary_len(MAX_SUBAUTHORITY_COUNT);

/// Windows Security Identifier.
///
/// # Invariants
/// - `sub_authority_count` ∈ 1..=15.
/// - Slots of the inline array past `sub_authority_count` are zero, so the
///   derived `PartialEq` and `Hash` only see meaningful data.
///
/// # Examples
/// ```rust
/// # use adldap::{Sid, SidIdentifierAuthority};
/// let sid: Sid = "S-1-5-21-1004336348-1177238915-682003330-512".parse().unwrap();
/// assert_eq!(sid.rid(), 512);
/// assert_eq!(sid.identifier_authority, SidIdentifierAuthority::NT_AUTHORITY);
/// assert_eq!(sid.to_string(), "S-1-5-21-1004336348-1177238915-682003330-512");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sid {
    /// The SID revision value, generally 1.
    pub revision: u8,
    sub_authority_count: u8,
    /// The SID identifier authority value.
    pub identifier_authority: SidIdentifierAuthority,
    sub_authority: [u32; MAX_SUBAUTHORITY_COUNT as usize],
}

impl Sid {
    /// The only revision the directory emits.
    pub const REVISION: u8 = parsing::SID_REVISION;

    /// Const constructor from a fixed-size list of sub-authorities.
    ///
    /// Returns `None` when `N` is outside 1..=15. This is what the `sid!`
    /// macro expands to.
    ///
    /// # Examples
    /// ```rust
    /// # use adldap::{Sid, SidIdentifierAuthority};
    /// const ADMINS: Option<Sid> =
    ///     Sid::from_array(1, SidIdentifierAuthority::NT_AUTHORITY, [32, 544]);
    /// assert_eq!(ADMINS.unwrap().to_string(), "S-1-5-32-544");
    /// ```
    #[inline]
    #[must_use]
    pub const fn from_array<const N: usize>(
        revision: u8,
        identifier_authority: SidIdentifierAuthority,
        sub_authority: [u32; N],
    ) -> Option<Self> {
        if !sub_authority_size_guard(N) {
            return None;
        }
        let mut inline = [0u32; MAX_SUBAUTHORITY_COUNT as usize];
        let mut i = 0;
        while i < N {
            inline[i] = sub_authority[i];
            i += 1;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "N is bounded by the size guard above"
        )]
        let sub_authority_count = N as u8;
        Some(Self {
            revision,
            sub_authority_count,
            identifier_authority,
            sub_authority: inline,
        })
    }

    /// Creates a revision 1 SID from parts, validating the sub-authority count.
    ///
    /// Returns `None` if `sub_authority` length is out of bounds (not in 1..=15).
    #[inline]
    #[must_use]
    pub fn try_new<I: Into<SidIdentifierAuthority>, S: AsRef<[u32]>>(
        identifier_authority: I,
        sub_authority: S,
    ) -> Option<Self> {
        let sub_authority = sub_authority.as_ref();
        if !sub_authority_size_guard(sub_authority.len()) {
            return None;
        }
        let mut inline = [0u32; MAX_SUBAUTHORITY_COUNT as usize];
        inline
            .get_mut(..sub_authority.len())?
            .copy_from_slice(sub_authority);
        Some(Self {
            revision: Self::REVISION,
            sub_authority_count: u8::try_from(sub_authority.len()).ok()?,
            identifier_authority: identifier_authority.into(),
            sub_authority: inline,
        })
    }

    /// Number of sub-authorities in use.
    #[inline]
    #[must_use]
    pub const fn sub_authority_count(&self) -> u8 {
        self.sub_authority_count
    }

    /// The sub-authorities in use, in order.
    #[inline]
    #[must_use]
    pub fn get_sub_authorities(&self) -> &[u32] {
        self.sub_authority
            .get(..self.sub_authority_count as usize)
            .unwrap_or_default()
    }

    /// The relative identifier: the last sub-authority.
    #[inline]
    #[must_use]
    pub fn rid(&self) -> u32 {
        self.get_sub_authorities().last().copied().unwrap_or_default()
    }

    /// The SID of the issuing domain, i.e. this SID without its RID.
    ///
    /// Returns `None` for a SID with a single sub-authority.
    #[inline]
    #[must_use]
    pub fn domain_sid(&self) -> Option<Self> {
        let (_, domain) = self.get_sub_authorities().split_last()?;
        Self::try_new(self.identifier_authority, domain)
    }

    /// Appends `rid` to this SID, e.g. to build a principal SID from a domain
    /// SID and a `primaryGroupID`.
    #[inline]
    #[must_use]
    pub fn with_rid(&self, rid: u32) -> Option<Self> {
        let mut subs: ArrayVec<u32, { MAX_SUBAUTHORITY_COUNT as usize }> =
            self.get_sub_authorities().iter().copied().collect();
        subs.try_push(rid).ok()?;
        let mut sid = Self::try_new(self.identifier_authority, &subs)?;
        sid.revision = self.revision;
        Some(sid)
    }

    /// Length in bytes of [`Sid::to_binary`].
    #[inline]
    #[must_use]
    pub const fn binary_len(&self) -> usize {
        sid_binary_len(self.sub_authority_count)
    }

    /// Parses the directory's binary representation.
    ///
    /// # Errors
    /// [`InvalidSidFormat`] if the buffer has the wrong revision, an out of
    /// range sub-authority count, or a length that does not match the count.
    ///
    /// # Examples
    /// ```rust
    /// # use adldap::Sid;
    /// let bytes: [u8; 16] = [
    ///     1,    // Revision
    ///     2,    // SubAuthorityCount
    ///     0, 0, 0, 0, 0, 5, // IdentifierAuthority = NT AUTHORITY
    ///     32, 0, 0, 0,      // SubAuthority[0] = 32
    ///     32, 2, 0, 0       // SubAuthority[1] = 544 (0x220 little endian)
    /// ];
    /// let sid = Sid::from_bytes(&bytes).unwrap();
    /// assert_eq!(sid.to_string(), "S-1-5-32-544");
    /// ```
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, InvalidSidFormat> {
        validate_sid_bytes(bytes)?;
        let (head, tail) = bytes.split_at_checked(SID_HEAD_SIZE).ok_or(InvalidSidFormat)?;
        let mut authority = [0u8; 6];
        authority.copy_from_slice(head.get(2..).ok_or(InvalidSidFormat)?);
        let subs: ArrayVec<u32, { MAX_SUBAUTHORITY_COUNT as usize }> = tail
            .chunks_exact(size_of::<u32>())
            .map(|chunk| {
                let mut word = [0u8; 4];
                word.copy_from_slice(chunk);
                u32::from_le_bytes(word)
            })
            .collect();
        Self::try_new(SidIdentifierAuthority::new(authority), &subs).ok_or(InvalidSidFormat)
    }

    /// Serializes to the directory's binary representation.
    ///
    /// # Examples
    /// ```rust
    /// # use adldap::well_known;
    /// let bytes = well_known::BUILTIN_ADMINISTRATORS.to_binary();
    /// assert_eq!(bytes.as_slice(), [1, 2, 0, 0, 0, 0, 0, 5, 32, 0, 0, 0, 32, 2, 0, 0]);
    /// ```
    #[inline]
    #[must_use]
    pub fn to_binary(&self) -> ArrayVec<u8, MAX_SID_BINARY_LEN> {
        let mut out = ArrayVec::new();
        out.push(self.revision);
        out.push(self.sub_authority_count);
        out.extend(self.identifier_authority.value);
        for sub in self.get_sub_authorities() {
            out.extend(sub.to_le_bytes());
        }
        out
    }
}

impl Display for Sid {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}-{}", self.revision, self.identifier_authority)?;
        for &sub_auth in self.get_sub_authorities() {
            write!(f, "-{sub_auth}")?;
        }
        Ok(())
    }
}

impl Debug for Sid {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        utils::debug_print(stringify!(Sid), self, f)
    }
}

impl FromStr for Sid {
    type Err = InvalidSidFormat;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components = SidComponents::from_str(s)?;
        Self::try_new(components.identifier_authority, &components.sub_authority)
            .ok_or(InvalidSidFormat)
    }
}

impl TryFrom<&[u8]> for Sid {
    type Error = InvalidSidFormat;

    #[inline]
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(value)
    }
}

#[allow(clippy::unwrap_used, reason = "Unwrap is not an issue in test")]
#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::sid_identifier_authority::test::arb_identifier_authority;
    use proptest::prelude::*;

    pub fn arb_sid() -> impl Strategy<Value = Sid> {
        (
            arb_identifier_authority(),
            proptest::collection::vec(any::<u32>(), 1..=15),
        )
            .prop_map(|(identifier_authority, sub_authorities)| {
                Sid::try_new(identifier_authority, &sub_authorities).unwrap()
            })
    }

    proptest! {
        #[test]
        fn sid_display_round_trip(sid in arb_sid()) {
            let display = sid.to_string();
            prop_assert!(display.starts_with("S-1-"), "Display does not start with S-1-: {}", display);

            let dash_count = display.matches('-').count();
            let expected = (sid.sub_authority_count() as usize) + 2;
            prop_assert_eq!(dash_count, expected, "Dash count {} vs sub_authority_count {}", dash_count, expected);
            prop_assert_eq!(display.parse::<Sid>().unwrap(), sid);
        }

        #[test]
        fn sid_binary_round_trip(sid in arb_sid()) {
            let binary = sid.to_binary();
            prop_assert_eq!(binary.len(), sid.binary_len());
            prop_assert_eq!(Sid::from_bytes(&binary).unwrap(), sid);
        }

        #[test]
        fn sid_rid_is_last_display_component(sid in arb_sid()) {
            let display = sid.to_string();
            let tail = display.rsplit('-').next().unwrap();
            prop_assert_eq!(tail, sid.rid().to_string());
        }
    }

    #[test]
    fn domain_sid_and_with_rid_are_inverse() {
        let user: Sid = "S-1-5-21-1004336348-1177238915-682003330-1104".parse().unwrap();
        let domain = user.domain_sid().unwrap();
        assert_eq!(domain.to_string(), "S-1-5-21-1004336348-1177238915-682003330");
        assert_eq!(domain.with_rid(1104).unwrap(), user);
        assert_eq!(
            domain.with_rid(513).unwrap().to_string(),
            "S-1-5-21-1004336348-1177238915-682003330-513"
        );
    }

    #[test]
    fn domain_sid_of_single_sub_authority_is_none() {
        let system: Sid = "S-1-5-18".parse().unwrap();
        assert!(system.domain_sid().is_none(), "S-1-5-18 has no domain part");
    }

    #[test]
    fn from_array_rejects_empty_and_oversized() {
        assert!(Sid::from_array(1, SidIdentifierAuthority::NT_AUTHORITY, []).is_none(), "empty");
        assert!(Sid::from_array(1, SidIdentifierAuthority::NT_AUTHORITY, [0u32; 16]).is_none(), "16 subs");
    }

    #[test]
    fn text_and_binary_agree_on_revision() {
        assert_eq!("S-2-5-32-544".parse::<Sid>(), Err(InvalidSidFormat));
        let bytes = [2u8, 2, 0, 0, 0, 0, 0, 5, 32, 0, 0, 0, 0x20, 0x02, 0, 0];
        assert_eq!(Sid::from_bytes(&bytes), Err(InvalidSidFormat));
        let sid: Sid = "S-1-5-32-544".parse().unwrap();
        assert_eq!(sid.revision, Sid::REVISION);
    }

    #[test]
    fn test_debug() {
        let sid: Sid = "S-1-0-0".parse().unwrap();
        assert_eq!(format!("{sid:?}"), "Sid(S-1-0-0)");
    }
}
