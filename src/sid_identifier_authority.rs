use core::fmt::{self, Display};

/// The 6-byte identifier authority of a SID, stored big-endian.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SidIdentifierAuthority {
    pub value: [u8; 6],
}

impl SidIdentifierAuthority {
    /// `S-1-0`
    pub const NULL_AUTHORITY: Self = Self::new([0, 0, 0, 0, 0, 0]);
    /// `S-1-1`
    pub const SECURITY_WORLD_AUTHORITY: Self = Self::new([0, 0, 0, 0, 0, 1]);
    /// `S-1-2`
    pub const SECURITY_LOCAL_AUTHORITY: Self = Self::new([0, 0, 0, 0, 0, 2]);
    /// `S-1-3`
    pub const SECURITY_CREATOR_AUTHORITY: Self = Self::new([0, 0, 0, 0, 0, 3]);
    /// `S-1-5`, the authority of every domain account.
    pub const NT_AUTHORITY: Self = Self::new([0, 0, 0, 0, 0, 5]);

    #[inline]
    #[must_use]
    pub const fn new(value: [u8; 6]) -> Self {
        Self { value }
    }

    /// Numeric value of the authority (at most 48 bits).
    #[inline]
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        let [a, b, c, d, e, f] = self.value;
        u64::from_be_bytes([0, 0, a, b, c, d, e, f])
    }
}

impl From<[u8; 6]> for SidIdentifierAuthority {
    #[inline]
    fn from(value: [u8; 6]) -> Self {
        Self { value }
    }
}

impl From<SidIdentifierAuthority> for [u8; 6] {
    #[inline]
    fn from(value: SidIdentifierAuthority) -> Self {
        value.value
    }
}

/// Decimal when the value fits in 32 bits, `0x`-prefixed hex otherwise.
impl Display for SidIdentifierAuthority {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.as_u64();
        if value <= 0xFFFF_FFFF {
            write!(f, "{value}")
        } else {
            write!(f, "0x{value:X}")
        }
    }
}
