//! Bit operations on the 32-bit control masks stored in `userAccountControl`
//! and `groupType`.

/// Sets or clears `bit` in `mask`.
///
/// ```rust
/// # use adldap::bits::{bit_set, bit_is_set};
/// let mask = bit_set(0, 0x2, true);
/// assert!(bit_is_set(mask, 0x2));
/// assert_eq!(bit_set(mask, 0x2, false), 0);
/// ```
#[inline]
#[must_use]
pub const fn bit_set(mask: u32, bit: u32, enabled: bool) -> u32 {
    if enabled { mask | bit } else { mask & !bit }
}

#[inline]
#[must_use]
pub const fn bit_is_set(mask: u32, bit: u32) -> bool {
    (mask & bit) != 0
}

/// Reads a directory integer attribute as a mask.
///
/// The directory stores these as signed 32-bit decimals (a security group's
/// `groupType` is `-2147483646`), but unsigned text is accepted too.
#[inline]
#[must_use]
pub fn parse_mask(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    raw.parse::<i32>()
        .map(|signed| u32::from_ne_bytes(signed.to_ne_bytes()))
        .or_else(|_| raw.parse::<u32>())
        .ok()
}

/// Renders a mask the way the directory stores it: signed 32-bit decimal.
#[inline]
#[must_use]
pub fn format_mask(mask: u32) -> String {
    i32::from_ne_bytes(mask.to_ne_bytes()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn set_then_clear() {
        assert!(bit_is_set(bit_set(0, 0x2, true), 0x2), "bit was set");
        assert!(!bit_is_set(bit_set(0x2, 0x2, false), 0x2), "bit was cleared");
    }

    #[test]
    fn signed_masks() {
        assert_eq!(parse_mask("-2147483646"), Some(0x8000_0002));
        assert_eq!(parse_mask("2147483650"), Some(0x8000_0002));
        assert_eq!(parse_mask("66048"), Some(0x0001_0200));
        assert_eq!(parse_mask("abc"), None);
        assert_eq!(format_mask(0x8000_0002), "-2147483646");
        assert_eq!(format_mask(512), "512");
    }

    proptest! {
        #[test]
        fn set_only_touches_given_bit(mask in any::<u32>(), shift in 0u32..32, enabled in any::<bool>()) {
            let bit = 1u32 << shift;
            let out = bit_set(mask, bit, enabled);
            prop_assert_eq!(bit_is_set(out, bit), enabled);
            prop_assert_eq!(out & !bit, mask & !bit);
        }

        #[test]
        fn format_then_parse(mask in any::<u32>()) {
            prop_assert_eq!(parse_mask(&format_mask(mask)), Some(mask));
        }
    }
}
