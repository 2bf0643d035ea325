use core::fmt::{self, Display};

use chrono::{DateTime, Utc};
use tracing::trace;

use super::datetime::{
    LARGE_INTEGER_DATETIME_NEVER_1, LARGE_INTEGER_DATETIME_NEVER_2, datetime_from_string,
    datetime_to_string,
};
use super::{ad_string_to_bool, bool_to_ad_string};
use crate::bits::{format_mask, parse_mask};
use crate::schema::{AttributeType, LargeIntegerSubtype, SchemaResolver};

/// Shape of an attribute's values, derived from its schema type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    String,
    Boolean,
    Datetime,
    /// Decimal number.
    Integer,
    BitFlags,
    Binary,
}

impl AttributeKind {
    /// Classifies `attribute`. Without a schema every value is a string.
    #[inline]
    #[must_use]
    pub fn of<S: SchemaResolver + ?Sized>(attribute: &str, schema: Option<&S>) -> Self {
        let Some(schema) = schema else {
            return Self::String;
        };
        match schema.attribute_type(attribute) {
            AttributeType::Boolean => Self::Boolean,
            AttributeType::LargeInteger => {
                if schema.large_integer_subtype(attribute) == LargeIntegerSubtype::Datetime {
                    Self::Datetime
                } else {
                    Self::String
                }
            }
            AttributeType::UtcTime | AttributeType::GeneralizedTime => Self::Datetime,
            AttributeType::Enumeration | AttributeType::Integer => {
                if schema.is_bit_mask(attribute) {
                    Self::BitFlags
                } else {
                    Self::Integer
                }
            }
            AttributeType::Octet | AttributeType::Sid | AttributeType::NtSecDesc => Self::Binary,
            AttributeType::StringCase
            | AttributeType::Ia5
            | AttributeType::Numeric
            | AttributeType::ObjectIdentifier
            | AttributeType::Printable
            | AttributeType::Teletex
            | AttributeType::Unicode
            | AttributeType::DnString
            | AttributeType::DnBinary
            | AttributeType::DsDn
            | AttributeType::Unknown => Self::String,
        }
    }
}

/// Which `LargeInteger` "never" sentinel a value carried.
///
/// The two are not interchangeable on write: `pwdLastSet` only accepts `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NeverForm {
    /// `0`
    Zero,
    /// `9223372036854775807`
    Max,
}

impl NeverForm {
    #[inline]
    #[must_use]
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            LARGE_INTEGER_DATETIME_NEVER_1 => Some(Self::Zero),
            LARGE_INTEGER_DATETIME_NEVER_2 => Some(Self::Max),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => LARGE_INTEGER_DATETIME_NEVER_1,
            Self::Max => LARGE_INTEGER_DATETIME_NEVER_2,
        }
    }
}

/// A decoded datetime value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timestamp {
    /// One of the `LargeInteger` "never" sentinels.
    Never(NeverForm),
    At(DateTime<Utc>),
    /// The raw value did not decode.
    Invalid,
}

impl Timestamp {
    #[inline]
    #[must_use]
    pub const fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::At(instant) => Some(*instant),
            Self::Never(_) | Self::Invalid => None,
        }
    }
}

impl From<Option<DateTime<Utc>>> for Timestamp {
    #[inline]
    fn from(value: Option<DateTime<Utc>>) -> Self {
        value.map_or(Self::Invalid, Self::At)
    }
}

/// A single attribute value with its [`AttributeKind`] resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypedValue {
    String(String),
    Boolean(bool),
    Datetime(Timestamp),
    Integer(i64),
    BitFlags(u32),
    Binary(Vec<u8>),
}

impl TypedValue {
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> AttributeKind {
        match self {
            Self::String(_) => AttributeKind::String,
            Self::Boolean(_) => AttributeKind::Boolean,
            Self::Datetime(_) => AttributeKind::Datetime,
            Self::Integer(_) => AttributeKind::Integer,
            Self::BitFlags(_) => AttributeKind::BitFlags,
            Self::Binary(_) => AttributeKind::Binary,
        }
    }
}

/// Human readable rendering. Binary values are shown as hex.
impl Display for TypedValue {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(text) => f.write_str(text),
            Self::Boolean(value) => f.write_str(bool_to_ad_string(*value)),
            Self::Datetime(Timestamp::Never(_)) => f.write_str("(never)"),
            Self::Datetime(Timestamp::At(instant)) => write!(f, "{}", instant.to_rfc3339()),
            Self::Datetime(Timestamp::Invalid) => f.write_str("(invalid)"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::BitFlags(mask) => write!(f, "0x{mask:08x}"),
            Self::Binary(bytes) => f.write_str(&hex::encode(bytes)),
        }
    }
}

/// Decodes one raw value of `attribute`.
///
/// Text that is not UTF-8 is decoded lossily. A bit-flag value that does not
/// parse decodes to an empty mask, an integer that does not parse stays text.
#[must_use]
pub fn decode_value<S: SchemaResolver + ?Sized>(
    attribute: &str,
    raw: &[u8],
    schema: Option<&S>,
) -> TypedValue {
    let kind = AttributeKind::of(attribute, schema);
    if kind == AttributeKind::Binary {
        return TypedValue::Binary(raw.to_vec());
    }
    let text = String::from_utf8_lossy(raw);
    match kind {
        AttributeKind::Boolean => TypedValue::Boolean(ad_string_to_bool(&text)),
        AttributeKind::Datetime => {
            let is_large_integer = schema
                .is_some_and(|schema| schema.attribute_type(attribute) == AttributeType::LargeInteger);
            match NeverForm::from_raw(&text) {
                Some(form) if is_large_integer => TypedValue::Datetime(Timestamp::Never(form)),
                _ => TypedValue::Datetime(datetime_from_string(attribute, &text, schema).into()),
            }
        }
        AttributeKind::Integer => match text.trim().parse::<i64>() {
            Ok(value) => TypedValue::Integer(value),
            Err(err) => {
                trace!(attribute, raw = %text, %err, "unparsable integer, kept as text");
                TypedValue::String(text.into_owned())
            }
        },
        AttributeKind::BitFlags => TypedValue::BitFlags(parse_mask(&text).unwrap_or_else(|| {
            trace!(attribute, raw = %text, "unparsable mask, using 0");
            0
        })),
        AttributeKind::String | AttributeKind::Binary => TypedValue::String(text.into_owned()),
    }
}

/// Encodes `value` as the raw bytes to send for `attribute`.
///
/// [`Timestamp::Never`] encodes to the sentinel it was decoded from and
/// [`Timestamp::Invalid`] to nothing.
#[must_use]
pub fn encode_value<S: SchemaResolver + ?Sized>(
    attribute: &str,
    value: &TypedValue,
    schema: Option<&S>,
) -> Vec<u8> {
    match value {
        TypedValue::String(text) => text.as_bytes().to_vec(),
        TypedValue::Boolean(value) => bool_to_ad_string(*value).as_bytes().to_vec(),
        TypedValue::Datetime(Timestamp::At(instant)) => {
            datetime_to_string(attribute, instant, schema).into_bytes()
        }
        TypedValue::Datetime(Timestamp::Never(form)) => form.as_str().as_bytes().to_vec(),
        TypedValue::Integer(value) => value.to_string().into_bytes(),
        TypedValue::Datetime(Timestamp::Invalid) => Vec::new(),
        TypedValue::BitFlags(mask) => format_mask(*mask).into_bytes(),
        TypedValue::Binary(bytes) => bytes.clone(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Unwrap is not an issue in test")]
mod tests {
    use super::*;
    use crate::schema::SchemaTable;
    use chrono::TimeZone;

    #[test]
    fn kinds_follow_schema() {
        let schema = SchemaTable::with_defaults();
        let kind = |attribute| AttributeKind::of(attribute, Some(&schema));
        assert_eq!(kind("showInAdvancedViewOnly"), AttributeKind::Boolean);
        assert_eq!(kind("pwdLastSet"), AttributeKind::Datetime);
        assert_eq!(kind("whenChanged"), AttributeKind::Datetime);
        assert_eq!(kind("uSNChanged"), AttributeKind::String);
        assert_eq!(kind("userAccountControl"), AttributeKind::BitFlags);
        assert_eq!(kind("searchFlags"), AttributeKind::BitFlags);
        assert_eq!(kind("primaryGroupID"), AttributeKind::Integer);
        assert_eq!(kind("sAMAccountType"), AttributeKind::Integer);
        assert_eq!(kind("objectSid"), AttributeKind::Binary);
        assert_eq!(kind("cn"), AttributeKind::String);
        assert_eq!(kind("neverHeardOfIt"), AttributeKind::String);
        assert_eq!(
            AttributeKind::of::<SchemaTable>("objectSid", None),
            AttributeKind::String
        );
    }

    #[test]
    fn decode_each_kind() {
        let schema = Some(SchemaTable::with_defaults());
        let schema = schema.as_ref();
        assert_eq!(
            decode_value("isCriticalSystemObject", b"TRUE", schema),
            TypedValue::Boolean(true)
        );
        assert_eq!(
            decode_value("groupType", b"-2147483646", schema),
            TypedValue::BitFlags(0x8000_0002)
        );
        assert_eq!(
            decode_value("userAccountControl", b"junk", schema),
            TypedValue::BitFlags(0)
        );
        assert_eq!(
            decode_value("objectGUID", &[0xff, 0x00], schema),
            TypedValue::Binary(vec![0xff, 0x00])
        );
        assert_eq!(
            decode_value("accountExpires", b"9223372036854775807", schema),
            TypedValue::Datetime(Timestamp::Never(NeverForm::Max))
        );
        assert_eq!(
            decode_value("pwdLastSet", b"0", schema),
            TypedValue::Datetime(Timestamp::Never(NeverForm::Zero))
        );
        assert_eq!(
            decode_value("primaryGroupID", b"513", schema),
            TypedValue::Integer(513)
        );
        assert_eq!(
            decode_value("primaryGroupID", b"n/a", schema),
            TypedValue::String("n/a".to_owned())
        );
        assert_eq!(
            decode_value("whenCreated", b"20210304050607.0Z", schema),
            TypedValue::Datetime(Timestamp::At(
                Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap()
            ))
        );
        assert_eq!(
            decode_value("whenCreated", b"yesterday", schema),
            TypedValue::Datetime(Timestamp::Invalid)
        );
    }

    #[test]
    fn generalized_time_zero_is_not_never() {
        let schema = SchemaTable::with_defaults();
        assert_eq!(
            decode_value("whenCreated", b"0", Some(&schema)),
            TypedValue::Datetime(Timestamp::Invalid)
        );
    }

    #[test]
    fn encode_each_kind() {
        let schema = SchemaTable::with_defaults();
        let schema = Some(&schema);
        assert_eq!(encode_value("x", &TypedValue::Boolean(false), schema), b"FALSE");
        assert_eq!(
            encode_value("groupType", &TypedValue::BitFlags(0x8000_0004), schema),
            b"-2147483644"
        );
        assert_eq!(
            encode_value(
                "accountExpires",
                &TypedValue::Datetime(Timestamp::Never(NeverForm::Max)),
                schema
            ),
            b"9223372036854775807"
        );
        assert_eq!(
            encode_value(
                "pwdLastSet",
                &TypedValue::Datetime(Timestamp::Never(NeverForm::Zero)),
                schema
            ),
            b"0"
        );
        assert_eq!(
            encode_value("sAMAccountType", &TypedValue::Integer(805_306_368), schema),
            b"805306368"
        );
        let when = Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(
            encode_value("pwdLastSet", &TypedValue::Datetime(Timestamp::At(when)), schema),
            b"132593079670000000"
        );
        assert!(
            encode_value("pwdLastSet", &TypedValue::Datetime(Timestamp::Invalid), schema).is_empty(),
            "invalid datetime encodes to nothing"
        );
    }

    #[test]
    fn decode_then_encode_keeps_raw_text() {
        let schema = SchemaTable::with_defaults();
        for (attribute, raw) in [
            ("cn", "Alice"),
            ("userAccountControl", "66048"),
            ("groupType", "-2147483646"),
            ("whenChanged", "20210304050607.5Z"),
            ("pwdLastSet", "132593079670000000"),
            ("pwdLastSet", "0"),
            ("accountExpires", "0"),
            ("accountExpires", "9223372036854775807"),
            ("primaryGroupID", "513"),
            ("sAMAccountType", "805306368"),
        ] {
            let value = decode_value(attribute, raw.as_bytes(), Some(&schema));
            assert_eq!(
                encode_value(attribute, &value, Some(&schema)),
                raw.as_bytes(),
                "{attribute}"
            );
        }
    }

    #[test]
    fn display() {
        assert_eq!(TypedValue::BitFlags(0x202).to_string(), "0x00000202");
        assert_eq!(TypedValue::Binary(vec![0xab, 0x01]).to_string(), "ab01");
        assert_eq!(
            TypedValue::Datetime(Timestamp::Never(NeverForm::Zero)).to_string(),
            "(never)"
        );
        assert_eq!(TypedValue::Integer(513).to_string(), "513");
        assert_eq!(TypedValue::Boolean(true).to_string(), "TRUE");
    }
}
