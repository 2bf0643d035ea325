//! Text grammars shared by `adldap` and `adldap-macro`.
//!
//! Only the textual forms live here: the canonical `S-R-I-S...` SID string
//! and the hyphenated GUID string. Binary layouts are owned by `adldap`.
use core::str::FromStr;

use arrayvec::ArrayVec;
use thiserror::Error;

/// Minimum number of sub-authorities accepted in a SID.
pub const MIN_SUBAUTHORITY_COUNT: u8 = 1;
/// Maximum number of sub-authorities a SID can carry.
pub const MAX_SUBAUTHORITY_COUNT: u8 = 15;

/// The only SID revision in use; the binary form rejects any other.
pub const SID_REVISION: u8 = 1;

/// Highest identifier authority representable in 6 bytes.
const MAX_IDENTIFIER_AUTHORITY: u64 = 0xFFFF_FFFF_FFFF;

pub struct SidComponents {
    /// The SID revision value, generally 1.
    pub revision: u8,
    /// The SID identifier authority value, big-endian.
    pub identifier_authority: [u8; 6],
    /// The SID sub-authority values.
    pub sub_authority: ArrayVec<u32, { MAX_SUBAUTHORITY_COUNT as usize }>,
}

/// Error returned when a SID string does not follow `S-1-<authority>-<sub>...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid format for Sid")]
pub struct InvalidSidFormat;

/// Error returned when a GUID string is not five hyphen-separated hex groups
/// of 4, 2, 2, 2 and 6 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid format for Guid")]
pub struct InvalidGuidFormat;

fn parse_identifier_authority(text: &str) -> Result<[u8; 6], InvalidSidFormat> {
    let value = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex_digits) => u64::from_str_radix(hex_digits, 16),
        None => text.parse::<u64>(),
    }
    .map_err(|_| InvalidSidFormat)?;
    if value > MAX_IDENTIFIER_AUTHORITY {
        return Err(InvalidSidFormat);
    }
    let [_, _, a, b, c, d, e, f] = value.to_be_bytes();
    Ok([a, b, c, d, e, f])
}

impl FromStr for SidComponents {
    type Err = InvalidSidFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut s_cmp = s.split('-');
        if !s_cmp
            .next()
            .is_some_and(|head| head.eq_ignore_ascii_case("s"))
        {
            return Err(InvalidSidFormat);
        }
        let revision = s_cmp
            .next()
            .ok_or(InvalidSidFormat)?
            .parse::<u8>()
            .map_err(|_| InvalidSidFormat)?;
        if revision != SID_REVISION {
            return Err(InvalidSidFormat);
        }

        let identifier_authority = s_cmp
            .next()
            .ok_or(InvalidSidFormat)
            .and_then(parse_identifier_authority)?;
        let mut sub_authority = ArrayVec::new();
        for item in s_cmp {
            let item = item.parse::<u32>().map_err(|_| InvalidSidFormat)?;
            sub_authority.try_push(item).map_err(|_| InvalidSidFormat)?;
        }
        if sub_authority.len() < MIN_SUBAUTHORITY_COUNT as usize {
            return Err(InvalidSidFormat);
        }

        Ok(Self {
            revision,
            identifier_authority,
            sub_authority,
        })
    }
}

/// Byte length of each hyphen-separated group of a GUID string.
pub const GUID_GROUP_LENGTHS: [usize; 5] = [4, 2, 2, 2, 6];

/// The 16 bytes of a GUID in the order they are written in text.
///
/// No byte swapping is applied here; the directory's mixed-endian binary
/// order is produced by `adldap::Guid`.
pub struct GuidComponents {
    pub groups: [ArrayVec<u8, 6>; 5],
}

impl FromStr for GuidComponents {
    type Err = InvalidGuidFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s
            .strip_prefix('{')
            .and_then(|inner| inner.strip_suffix('}'))
            .unwrap_or(s);
        let mut groups: [ArrayVec<u8, 6>; 5] = Default::default();
        let mut parts = s.split('-');
        for (group, expected_len) in groups.iter_mut().zip(GUID_GROUP_LENGTHS) {
            let part = parts.next().ok_or(InvalidGuidFormat)?;
            if part.len() != expected_len * 2 {
                return Err(InvalidGuidFormat);
            }
            let mut buffer = [0u8; 6];
            let target = buffer.get_mut(..expected_len).ok_or(InvalidGuidFormat)?;
            hex::decode_to_slice(part, target).map_err(|_| InvalidGuidFormat)?;
            group
                .try_extend_from_slice(target)
                .map_err(|_| InvalidGuidFormat)?;
        }
        if parts.next().is_some() {
            return Err(InvalidGuidFormat);
        }
        Ok(Self { groups })
    }
}
