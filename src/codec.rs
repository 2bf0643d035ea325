//! Conversions between raw directory values and typed values.
//!
//! The directory transports every value as bytes. Most attributes are text,
//! `objectGUID` and `objectSid` are binary, and datetimes come in three
//! encodings depending on the schema (see [`datetime`]).
//!
//! The string helpers in this module never fail loudly: malformed input yields
//! an empty result, which is what callers display or send.

pub mod datetime;
mod value;

pub use datetime::{
    LARGE_INTEGER_DATETIME_NEVER_1, LARGE_INTEGER_DATETIME_NEVER_2, MILLIS_TO_100_NANOS,
    datetime_from_string, datetime_to_string, large_integer_datetime_is_never,
};
pub use value::{AttributeKind, NeverForm, Timestamp, TypedValue, decode_value, encode_value};

use tracing::trace;

use crate::{Guid, Sid};

/// Boolean `true` as stored by the directory.
pub const LDAP_BOOL_TRUE: &str = "TRUE";
/// Boolean `false` as stored by the directory.
pub const LDAP_BOOL_FALSE: &str = "FALSE";

/// `"TRUE"` is true, every other literal is false.
#[inline]
#[must_use]
pub fn ad_string_to_bool(raw: &str) -> bool {
    raw == LDAP_BOOL_TRUE
}

#[inline]
#[must_use]
pub const fn bool_to_ad_string(value: bool) -> &'static str {
    if value { LDAP_BOOL_TRUE } else { LDAP_BOOL_FALSE }
}

/// Text GUID to the 16 bytes the directory stores, empty when malformed.
///
/// ```rust
/// # use adldap::codec::{guid_bytes_to_string, guid_string_to_bytes};
/// let bytes = guid_string_to_bytes("00112233-4455-6677-8899-aabbccddeeff");
/// assert_eq!(&bytes[..4], &[0x33, 0x22, 0x11, 0x00]);
/// assert_eq!(guid_bytes_to_string(&bytes), "00112233-4455-6677-8899-aabbccddeeff");
/// ```
#[inline]
#[must_use]
pub fn guid_string_to_bytes(text: &str) -> Vec<u8> {
    text.parse::<Guid>()
        .inspect_err(|err| trace!(text, %err, "unparsable GUID"))
        .map(|guid| guid.as_bytes().to_vec())
        .unwrap_or_default()
}

/// Binary GUID to its lowercase text form, empty unless `bytes` is 16 long.
#[inline]
#[must_use]
pub fn guid_bytes_to_string(bytes: &[u8]) -> String {
    Guid::from_slice(bytes)
        .map(|guid| guid.to_string())
        .unwrap_or_default()
}

/// Text SID to its binary form, empty when malformed.
#[inline]
#[must_use]
pub fn sid_string_to_bytes(text: &str) -> Vec<u8> {
    text.parse::<Sid>()
        .inspect_err(|err| trace!(text, %err, "unparsable SID"))
        .map(|sid| sid.to_binary().to_vec())
        .unwrap_or_default()
}

/// Binary SID to `S-1-...` text, empty when malformed.
#[inline]
#[must_use]
pub fn sid_bytes_to_string(bytes: &[u8]) -> String {
    Sid::from_bytes(bytes)
        .map(|sid| sid.to_string())
        .unwrap_or_default()
}

/// Relative identifier of a binary SID as text, empty when malformed.
///
/// ```rust
/// # use adldap::codec::{extract_rid_from_sid, sid_string_to_bytes};
/// let bytes = sid_string_to_bytes("S-1-5-21-1004336348-1177238915-682003330-1104");
/// assert_eq!(extract_rid_from_sid(&bytes), "1104");
/// assert_eq!(extract_rid_from_sid(&[1, 2, 3]), "");
/// ```
#[inline]
#[must_use]
pub fn extract_rid_from_sid(bytes: &[u8]) -> String {
    Sid::from_bytes(bytes)
        .map(|sid| sid.rid().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sid::test::arb_sid;
    use proptest::prelude::*;

    #[test]
    fn booleans() {
        assert!(ad_string_to_bool("TRUE"), "TRUE is true");
        assert!(!ad_string_to_bool("FALSE"), "FALSE is false");
        assert!(!ad_string_to_bool("true"), "literal is case-sensitive");
        assert!(!ad_string_to_bool(""), "empty is false");
        assert_eq!(bool_to_ad_string(true), "TRUE");
        assert_eq!(bool_to_ad_string(false), "FALSE");
    }

    #[test]
    fn guid_wrappers() {
        let text = "6f4c0b3a-91d2-4e5f-8a7b-0c1d2e3f4a5b";
        let bytes = guid_string_to_bytes(text);
        assert_eq!(bytes.len(), 16);
        assert_eq!(guid_bytes_to_string(&bytes), text);
        assert_eq!(
            guid_bytes_to_string(&guid_string_to_bytes(&text.to_uppercase())),
            text
        );
        assert!(guid_string_to_bytes("not-a-guid").is_empty(), "malformed");
        assert_eq!(guid_bytes_to_string(&bytes[..15]), "");
    }

    #[test]
    fn sid_wrappers() {
        let text = "S-1-5-32-544";
        let bytes = sid_string_to_bytes(text);
        assert_eq!(
            bytes,
            [1, 2, 0, 0, 0, 0, 0, 5, 32, 0, 0, 0, 0x20, 0x02, 0, 0]
        );
        assert_eq!(sid_bytes_to_string(&bytes), text);
        assert_eq!(extract_rid_from_sid(&bytes), "544");
        assert!(sid_string_to_bytes("S-1-5").is_empty(), "no sub-authority");
        assert!(sid_string_to_bytes("garbage").is_empty(), "malformed");
        assert!(sid_string_to_bytes("S-2-5-32-544").is_empty(), "revision 2");
        assert_eq!(sid_bytes_to_string(&bytes[..10]), "");
    }

    proptest! {
        #[test]
        fn rid_is_last_display_component(sid in arb_sid()) {
            let bytes = sid_string_to_bytes(&sid.to_string());
            let text = sid_bytes_to_string(&bytes);
            let last = text.rsplit('-').next().unwrap_or_default();
            prop_assert_eq!(extract_rid_from_sid(&bytes), last);
        }
    }
}
