//! Object GUIDs (`objectGUID`, `schemaIDGUID`, ...).
//!
//! The directory stores a GUID as 16 bytes in mixed-endian order: the first
//! three text groups are little-endian (byte-reversed relative to their hex
//! text), the last two are stored in text order.
//!
//! ```text
//! text    33221100-5544-7766-8899-aabbccddeeff
//! binary  00 11 22 33 44 55 66 77 88 99 aa bb cc dd ee ff
//! ```

use core::fmt::{self, Debug, Display};
use core::str::FromStr;

use parsing::GuidComponents;
pub use parsing::InvalidGuidFormat;

use crate::utils;

/// Length of a binary GUID.
pub const GUID_LEN: usize = 16;

/// A 16-byte GUID held in directory byte order.
///
/// # Examples
/// ```rust
/// # use adldap::Guid;
/// let guid: Guid = "33221100-5544-7766-8899-aabbccddeeff".parse().unwrap();
/// assert_eq!(guid.as_bytes()[..4], [0x00, 0x11, 0x22, 0x33]);
/// assert_eq!(guid.to_string(), "33221100-5544-7766-8899-aabbccddeeff");
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Guid([u8; GUID_LEN]);

impl Guid {
    /// The all-zero GUID.
    pub const NIL: Self = Self([0; GUID_LEN]);

    /// Wraps bytes that are already in directory order.
    #[inline]
    #[must_use]
    pub const fn from_bytes(bytes: [u8; GUID_LEN]) -> Self {
        Self(bytes)
    }

    /// Wraps a raw attribute value.
    ///
    /// # Errors
    /// [`InvalidGuidFormat`] unless `bytes` is exactly 16 bytes long.
    #[inline]
    pub fn from_slice(bytes: &[u8]) -> Result<Self, InvalidGuidFormat> {
        <[u8; GUID_LEN]>::try_from(bytes)
            .map(Self)
            .map_err(|_| InvalidGuidFormat)
    }

    /// Bytes in directory order, ready to be written to the attribute.
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; GUID_LEN] {
        &self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        let mut i = 0;
        while i < GUID_LEN {
            if self.0[i] != 0 {
                return false;
            }
            i += 1;
        }
        true
    }
}

impl FromStr for Guid {
    type Err = InvalidGuidFormat;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let GuidComponents { groups } = s.parse()?;
        let [g1, g2, g3, g4, g5] = groups;
        let bytes = g1
            .iter()
            .rev()
            .chain(g2.iter().rev())
            .chain(g3.iter().rev())
            .chain(g4.iter())
            .chain(g5.iter())
            .copied();
        let mut out = [0u8; GUID_LEN];
        for (slot, byte) in out.iter_mut().zip(bytes) {
            *slot = byte;
        }
        Ok(Self(out))
    }
}

impl Display for Guid {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [
            b0, b1, b2, b3, b4, b5, b6, b7, b8, b9, b10, b11, b12, b13, b14, b15,
        ] = self.0;
        write!(
            f,
            "{}-{}-{}-{}-{}",
            hex::encode([b3, b2, b1, b0]),
            hex::encode([b5, b4]),
            hex::encode([b7, b6]),
            hex::encode([b8, b9]),
            hex::encode([b10, b11, b12, b13, b14, b15]),
        )
    }
}

impl Debug for Guid {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        utils::debug_print(stringify!(Guid), self, f)
    }
}

impl From<[u8; GUID_LEN]> for Guid {
    #[inline]
    fn from(value: [u8; GUID_LEN]) -> Self {
        Self(value)
    }
}

impl From<Guid> for [u8; GUID_LEN] {
    #[inline]
    fn from(value: Guid) -> Self {
        value.0
    }
}

impl TryFrom<&[u8]> for Guid {
    type Error = InvalidGuidFormat;

    #[inline]
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(value)
    }
}

impl AsRef<[u8]> for Guid {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
