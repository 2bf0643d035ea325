//! Attribute type classification consumed by the codec.
//!
//! The directory schema is an external collaborator: anything implementing
//! [`SchemaResolver`] can classify attributes. [`SchemaTable`] is a small
//! map-backed resolver that can be loaded from configuration.

use std::collections::HashMap;

/// Attribute syntax as declared by the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AttributeType {
    Boolean,
    Enumeration,
    Integer,
    LargeInteger,
    StringCase,
    Ia5,
    NtSecDesc,
    Numeric,
    ObjectIdentifier,
    Octet,
    Printable,
    Sid,
    Teletex,
    Unicode,
    UtcTime,
    GeneralizedTime,
    DnString,
    DnBinary,
    DsDn,
    /// The schema has no classification for the attribute.
    #[default]
    Unknown,
}

/// Interpretation of a `LargeInteger` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LargeIntegerSubtype {
    #[default]
    Integer,
    /// FILETIME ticks since 1601-01-01.
    Datetime,
    /// Negative tick count, e.g. `maxPwdAge`.
    Timespan,
}

/// Integer attributes whose value is a set of bit flags rather than a number.
pub const BIT_MASK_ATTRIBUTES: &[&str] = &[
    "userAccountControl",
    "groupType",
    "systemFlags",
    "searchFlags",
    "instanceType",
];

/// Classifies attributes by name.
pub trait SchemaResolver {
    fn attribute_type(&self, attribute: &str) -> AttributeType;

    fn large_integer_subtype(&self, attribute: &str) -> LargeIntegerSubtype;

    /// Whether an `Integer`/`Enumeration` attribute holds bit flags.
    ///
    /// Defaults to membership in [`BIT_MASK_ATTRIBUTES`].
    #[inline]
    fn is_bit_mask(&self, attribute: &str) -> bool {
        BIT_MASK_ATTRIBUTES
            .iter()
            .any(|name| name.eq_ignore_ascii_case(attribute))
    }
}

impl<S: SchemaResolver + ?Sized> SchemaResolver for &S {
    #[inline]
    fn attribute_type(&self, attribute: &str) -> AttributeType {
        (**self).attribute_type(attribute)
    }

    #[inline]
    fn large_integer_subtype(&self, attribute: &str) -> LargeIntegerSubtype {
        (**self).large_integer_subtype(attribute)
    }

    #[inline]
    fn is_bit_mask(&self, attribute: &str) -> bool {
        (**self).is_bit_mask(attribute)
    }
}

/// Schema entry of a single attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeSchema {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub attribute_type: AttributeType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub large_integer_subtype: LargeIntegerSubtype,
    /// The integer value is a flag mask, see [`SchemaResolver::is_bit_mask`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub bit_mask: bool,
}

/// Map-backed [`SchemaResolver`]. Attribute names are case-insensitive.
///
/// With the `serde` feature it deserializes from
/// ```json
/// { "attributes": { "pwdLastSet": { "type": "large_integer", "large_integer_subtype": "datetime" } } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "SchemaTableRepr", into = "SchemaTableRepr"))]
pub struct SchemaTable {
    attributes: HashMap<String, AttributeSchema>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(dead_code, reason = "only used through serde conversions")]
struct SchemaTableRepr {
    attributes: HashMap<String, AttributeSchema>,
}

impl From<SchemaTableRepr> for SchemaTable {
    fn from(value: SchemaTableRepr) -> Self {
        let mut table = Self::new();
        for (name, schema) in value.attributes {
            table.insert(&name, schema);
        }
        table
    }
}

impl From<SchemaTable> for SchemaTableRepr {
    fn from(value: SchemaTable) -> Self {
        Self {
            attributes: value.attributes,
        }
    }
}

impl SchemaTable {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with the attributes this crate reads and writes itself.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        for name in [
            "accountExpires",
            "pwdLastSet",
            "lastLogon",
            "lastLogonTimestamp",
            "lastLogoff",
            "badPasswordTime",
            "lockoutTime",
        ] {
            table.insert_large_integer(name, LargeIntegerSubtype::Datetime);
        }
        for name in ["maxPwdAge", "minPwdAge", "lockoutDuration"] {
            table.insert_large_integer(name, LargeIntegerSubtype::Timespan);
        }
        for name in ["uSNChanged", "uSNCreated"] {
            table.insert_large_integer(name, LargeIntegerSubtype::Integer);
        }
        let typed = [
            ("whenCreated", AttributeType::GeneralizedTime),
            ("whenChanged", AttributeType::GeneralizedTime),
            ("dSCorePropagationData", AttributeType::GeneralizedTime),
            ("userAccountControl", AttributeType::Integer),
            ("groupType", AttributeType::Integer),
            ("systemFlags", AttributeType::Integer),
            ("searchFlags", AttributeType::Enumeration),
            ("instanceType", AttributeType::Integer),
            ("primaryGroupID", AttributeType::Integer),
            ("sAMAccountType", AttributeType::Integer),
            ("objectGUID", AttributeType::Octet),
            ("objectSid", AttributeType::Sid),
            ("nTSecurityDescriptor", AttributeType::NtSecDesc),
            ("showInAdvancedViewOnly", AttributeType::Boolean),
            ("isCriticalSystemObject", AttributeType::Boolean),
            ("cn", AttributeType::Unicode),
            ("name", AttributeType::Unicode),
            ("description", AttributeType::Unicode),
            ("sAMAccountName", AttributeType::Unicode),
            ("userPrincipalName", AttributeType::Unicode),
            ("distinguishedName", AttributeType::DsDn),
            ("member", AttributeType::DsDn),
            ("memberOf", AttributeType::DsDn),
            ("objectClass", AttributeType::ObjectIdentifier),
        ];
        for (name, attribute_type) in typed {
            table.insert(
                name,
                AttributeSchema {
                    attribute_type,
                    bit_mask: BIT_MASK_ATTRIBUTES
                        .iter()
                        .any(|mask| mask.eq_ignore_ascii_case(name)),
                    ..AttributeSchema::default()
                },
            );
        }
        table
    }

    #[inline]
    pub fn insert(&mut self, attribute: &str, schema: AttributeSchema) {
        self.attributes.insert(attribute.to_ascii_lowercase(), schema);
    }

    #[inline]
    pub fn insert_large_integer(&mut self, attribute: &str, subtype: LargeIntegerSubtype) {
        self.insert(
            attribute,
            AttributeSchema {
                attribute_type: AttributeType::LargeInteger,
                large_integer_subtype: subtype,
                bit_mask: false,
            },
        );
    }

    #[inline]
    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&AttributeSchema> {
        self.attributes.get(&attribute.to_ascii_lowercase())
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl SchemaResolver for SchemaTable {
    #[inline]
    fn attribute_type(&self, attribute: &str) -> AttributeType {
        self.get(attribute)
            .map(|schema| schema.attribute_type)
            .unwrap_or_default()
    }

    #[inline]
    fn large_integer_subtype(&self, attribute: &str) -> LargeIntegerSubtype {
        self.get(attribute)
            .map(|schema| schema.large_integer_subtype)
            .unwrap_or_default()
    }

    /// Only entries marked `bit_mask` are masks.
    #[inline]
    fn is_bit_mask(&self, attribute: &str) -> bool {
        self.get(attribute).is_some_and(|schema| schema.bit_mask)
    }
}
