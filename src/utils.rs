use core::fmt::{self, Display};

use parsing::InvalidSidFormat;

use crate::sid::{MAX_SUBAUTHORITY_COUNT, MIN_SUBAUTHORITY_COUNT, SID_HEAD_SIZE};

pub const fn sub_authority_size_guard(size: usize) -> bool {
    MIN_SUBAUTHORITY_COUNT as usize <= size && size <= MAX_SUBAUTHORITY_COUNT as usize
}

/// Byte length of a binary SID carrying `count` sub-authorities.
pub const fn sid_binary_len(count: u8) -> usize {
    SID_HEAD_SIZE + count as usize * size_of::<u32>()
}

/// Validates a raw SID blob the way the directory's `IsValidSid` would and
/// returns its sub-authority count.
///
/// - revision is [`crate::Sid::REVISION`]
/// - `sub_authority_count` in [1..=15]
/// - total size == 8 + 4 * `sub_authority_count`
/// - identifier authority is 6 bytes (big-endian); any value is accepted
pub fn validate_sid_bytes(buf: &[u8]) -> Result<u8, InvalidSidFormat> {
    let (&revision, rest) = buf.split_first().ok_or(InvalidSidFormat)?;
    let &count = rest.first().ok_or(InvalidSidFormat)?;
    if revision != crate::Sid::REVISION {
        return Err(InvalidSidFormat);
    }
    if !sub_authority_size_guard(count as usize) {
        return Err(InvalidSidFormat);
    }
    if buf.len() != sid_binary_len(count) {
        return Err(InvalidSidFormat);
    }
    Ok(count)
}

/// Writes `Name(display)`, used by value types whose `Debug` should read
/// like their textual form.
pub fn debug_print<T: Display>(name: &str, value: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{name}({value})")
}
