//! Datetime attributes in their three directory encodings.
//!
//! | syntax            | text form                        |
//! |-------------------|----------------------------------|
//! | `LargeInteger`    | FILETIME ticks, base 10          |
//! | `GeneralizedTime` | `yyyyMMddhhmmss.<fraction>Z`     |
//! | `UTCTime`         | `yyMMddhhmmss.<fraction>Z`       |
//!
//! The fraction is the sub-second part with trailing zeros removed and at
//! least one digit, so whole seconds render as `.0Z` like the directory does.

use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone, Utc};
use tracing::trace;

use crate::schema::{AttributeType, LargeIntegerSubtype, SchemaResolver};

/// `LargeInteger` datetime value meaning "never".
pub const LARGE_INTEGER_DATETIME_NEVER_1: &str = "0";
/// `LargeInteger` datetime value meaning "never" (`i64::MAX`).
pub const LARGE_INTEGER_DATETIME_NEVER_2: &str = "9223372036854775807";

/// FILETIME ticks (100 ns) per millisecond.
pub const MILLIS_TO_100_NANOS: i64 = 10_000;

/// Seconds from 1601-01-01 to the Unix epoch.
const NTFS_EPOCH_UNIX_SECONDS: i64 = -11_644_473_600;

const GENERALIZED_TIME_FORMAT: &str = "%Y%m%d%H%M%S%.fZ";
const UTC_TIME_FORMAT: &str = "%y%m%d%H%M%S%.fZ";

/// `1601-01-01T00:00:00Z`, origin of FILETIME.
#[inline]
#[must_use]
pub fn ntfs_epoch() -> DateTime<Utc> {
    DateTime::from_timestamp(NTFS_EPOCH_UNIX_SECONDS, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Whether a raw `LargeInteger` datetime is one of the "never" sentinels.
///
/// Check this before treating a decoded value as a point in time: `"0"`
/// decodes to the epoch itself.
#[inline]
#[must_use]
pub fn large_integer_datetime_is_never(raw: &str) -> bool {
    raw == LARGE_INTEGER_DATETIME_NEVER_1 || raw == LARGE_INTEGER_DATETIME_NEVER_2
}

/// FILETIME ticks to an instant, truncated to the millisecond.
#[inline]
#[must_use]
pub fn filetime_to_datetime(ticks: i64) -> Option<DateTime<Utc>> {
    #[expect(
        clippy::integer_division,
        reason = "FILETIME resolution is deliberately truncated to milliseconds"
    )]
    let millis = ticks / MILLIS_TO_100_NANOS;
    ntfs_epoch().checked_add_signed(TimeDelta::try_milliseconds(millis)?)
}

/// Instant to FILETIME ticks, from whole milliseconds since the epoch.
#[inline]
#[must_use]
pub fn datetime_to_filetime<Tz: TimeZone>(datetime: &DateTime<Tz>) -> Option<i64> {
    let elapsed = datetime.with_timezone(&Utc) - ntfs_epoch();
    elapsed.num_milliseconds().checked_mul(MILLIS_TO_100_NANOS)
}

fn format_with_fraction<Tz: TimeZone>(datetime: &DateTime<Tz>, pattern: &str) -> String {
    let utc = datetime.with_timezone(&Utc);
    let millis = utc.timestamp_subsec_millis();
    let fraction = if millis == 0 {
        "0".to_owned()
    } else {
        format!("{millis:03}").trim_end_matches('0').to_owned()
    };
    format!("{}.{fraction}Z", utc.format(pattern))
}

fn parse_pattern(raw: &str, pattern: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw.trim(), pattern)
        .map(|naive| naive.and_utc())
        .inspect_err(|err| trace!(raw, %err, "datetime does not match pattern"))
        .ok()
}

/// Encodes `datetime` for `attribute` according to its schema type.
///
/// Returns an empty string when there is no schema, or when the attribute is
/// not one of the datetime syntaxes.
///
/// ```rust
/// # use adldap::codec::datetime_to_string;
/// # use adldap::schema::SchemaTable;
/// # use chrono::{TimeZone, Utc};
/// let schema = SchemaTable::with_defaults();
/// let when = Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap();
/// assert_eq!(datetime_to_string("whenChanged", &when, Some(&schema)), "20210304050607.0Z");
/// assert_eq!(datetime_to_string("pwdLastSet", &when, Some(&schema)), "132593079670000000");
/// ```
#[must_use]
pub fn datetime_to_string<Tz: TimeZone, S: SchemaResolver + ?Sized>(
    attribute: &str,
    datetime: &DateTime<Tz>,
    schema: Option<&S>,
) -> String {
    let Some(schema) = schema else {
        return String::new();
    };
    match schema.attribute_type(attribute) {
        AttributeType::LargeInteger => datetime_to_filetime(datetime)
            .map(|ticks| ticks.to_string())
            .unwrap_or_default(),
        AttributeType::UtcTime => format_with_fraction(datetime, "%y%m%d%H%M%S"),
        AttributeType::GeneralizedTime => format_with_fraction(datetime, "%Y%m%d%H%M%S"),
        _ => String::new(),
    }
}

/// Decodes a raw datetime value of `attribute`.
///
/// `None` is the invalid datetime: no schema, a non-datetime attribute, or
/// text that does not parse. Results are always UTC.
///
/// A `LargeInteger` attribute whose subtype is not
/// [`LargeIntegerSubtype::Datetime`] is parsed as generalized time instead of
/// as ticks.
#[must_use]
pub fn datetime_from_string<S: SchemaResolver + ?Sized>(
    attribute: &str,
    raw: &str,
    schema: Option<&S>,
) -> Option<DateTime<Utc>> {
    let schema = schema?;
    match schema.attribute_type(attribute) {
        AttributeType::LargeInteger => {
            if schema.large_integer_subtype(attribute) == LargeIntegerSubtype::Datetime {
                let ticks = raw
                    .trim()
                    .parse::<i64>()
                    .inspect_err(|err| trace!(attribute, raw, %err, "invalid FILETIME"))
                    .ok()?;
                filetime_to_datetime(ticks)
            } else {
                parse_pattern(raw, GENERALIZED_TIME_FORMAT)
            }
        }
        AttributeType::GeneralizedTime => parse_pattern(raw, GENERALIZED_TIME_FORMAT),
        AttributeType::UtcTime => parse_pattern(raw, UTC_TIME_FORMAT),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Unwrap is not an issue in test")]
mod tests {
    use super::*;
    use crate::schema::{AttributeSchema, SchemaTable};
    use chrono::Timelike;
    use proptest::prelude::*;

    fn schema() -> SchemaTable {
        let mut table = SchemaTable::with_defaults();
        table.insert(
            "msDS-UtcStamp",
            AttributeSchema {
                attribute_type: AttributeType::UtcTime,
                ..AttributeSchema::default()
            },
        );
        table
    }

    #[test]
    fn epoch_is_1601() {
        assert_eq!(ntfs_epoch().to_rfc3339(), "1601-01-01T00:00:00+00:00");
        assert_eq!(filetime_to_datetime(0).unwrap(), ntfs_epoch());
    }

    #[test]
    fn never_sentinels() {
        assert!(large_integer_datetime_is_never("0"), "zero is never");
        assert!(
            large_integer_datetime_is_never("9223372036854775807"),
            "i64::MAX is never"
        );
        assert!(
            !large_integer_datetime_is_never("132593079670000000"),
            "a real timestamp is not never"
        );
    }

    #[test]
    fn large_integer_known_value() {
        let schema = schema();
        let decoded = datetime_from_string("pwdLastSet", "132593079670000000", Some(&schema));
        assert_eq!(
            decoded.unwrap(),
            Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap()
        );
    }

    #[test]
    fn large_integer_truncates_to_millis() {
        let schema = schema();
        let decoded = datetime_from_string("pwdLastSet", "132593079671239999", Some(&schema)).unwrap();
        assert_eq!(decoded.nanosecond(), 123_000_000);
    }

    #[test]
    fn generalized_time_formats() {
        let schema = schema();
        let when = Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap();
        let with_millis = when + TimeDelta::milliseconds(89);
        assert_eq!(
            datetime_to_string("whenCreated", &with_millis, Some(&schema)),
            "20210304050607.089Z"
        );
        assert_eq!(
            datetime_from_string("whenCreated", "20210304050607.0Z", Some(&schema)).unwrap(),
            when
        );
        assert_eq!(
            datetime_from_string("whenCreated", "20210304050607Z", Some(&schema)).unwrap(),
            when
        );
    }

    #[test]
    fn utc_time_uses_two_digit_year() {
        let schema = schema();
        let when = Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap();
        let text = datetime_to_string("msDS-UtcStamp", &when, Some(&schema));
        assert_eq!(text, "210304050607.0Z");
        assert_eq!(
            datetime_from_string("msDS-UtcStamp", &text, Some(&schema)).unwrap(),
            when
        );
    }

    #[test]
    fn non_datetime_large_integer_falls_back_to_generalized_time() {
        let schema = schema();
        assert_eq!(
            datetime_from_string("uSNChanged", "20210304050607.0Z", Some(&schema)).unwrap(),
            Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap()
        );
        assert_eq!(datetime_from_string("uSNChanged", "12345", Some(&schema)), None);
    }

    #[test]
    fn missing_schema_or_type_yields_empty() {
        let when = Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(datetime_to_string::<_, SchemaTable>("whenCreated", &when, None), "");
        assert_eq!(
            datetime_from_string::<SchemaTable>("whenCreated", "20210304050607.0Z", None),
            None
        );
        let schema = schema();
        assert_eq!(datetime_to_string("description", &when, Some(&schema)), "");
        assert_eq!(datetime_from_string("description", "x", Some(&schema)), None);
        assert_eq!(datetime_from_string("whenCreated", "garbage", Some(&schema)), None);
    }

    proptest! {
        #[test]
        fn large_integer_round_trip_is_exact_to_the_millisecond(millis in 0i64..400_000_000_000_000) {
            let schema = schema();
            let when = ntfs_epoch() + TimeDelta::milliseconds(millis);
            let text = datetime_to_string("accountExpires", &when, Some(&schema));
            prop_assert_eq!(datetime_from_string("accountExpires", &text, Some(&schema)), Some(when));
        }

        #[test]
        fn generalized_time_round_trip_to_the_second(secs in 0i64..253_402_300_799, millis in 0i64..1000) {
            let schema = schema();
            let when = DateTime::from_timestamp(secs, 0).unwrap() + TimeDelta::milliseconds(millis);
            let text = datetime_to_string("whenChanged", &when, Some(&schema));
            let decoded = datetime_from_string("whenChanged", &text, Some(&schema)).unwrap();
            prop_assert_eq!(decoded.timestamp(), when.timestamp());
        }
    }
}
