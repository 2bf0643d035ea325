//! Typed read access to a fetched directory entry.

use chrono::{DateTime, Utc};

use crate::bits::parse_mask;
use crate::codec::{
    Timestamp, TypedValue, ad_string_to_bool, decode_value, large_integer_datetime_is_never,
};
use crate::connection::Attributes;
use crate::dn::DistinguishedName;
use crate::flags::{
    ATTRIBUTE_GROUP_TYPE, ATTRIBUTE_PWD_LAST_SET, ATTRIBUTE_USER_ACCOUNT_CONTROL, AccountOption,
    GroupScope, GroupType,
};
use crate::schema::SchemaResolver;
use crate::{Guid, Sid};

/// `objectClass`
pub const ATTRIBUTE_OBJECT_CLASS: &str = "objectClass";
/// `objectGUID`
pub const ATTRIBUTE_OBJECT_GUID: &str = "objectGUID";
/// `objectSid`
pub const ATTRIBUTE_OBJECT_SID: &str = "objectSid";

/// An entry as returned by `get_all_attributes`.
///
/// Attribute lookups are case-insensitive. Accessors return `None` (or an
/// empty collection) for attributes the entry does not have.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirectoryObject {
    dn: DistinguishedName,
    attributes: Attributes,
}

impl DirectoryObject {
    #[inline]
    #[must_use]
    pub const fn new(dn: DistinguishedName, attributes: Attributes) -> Self {
        Self { dn, attributes }
    }

    #[inline]
    #[must_use]
    pub const fn dn(&self) -> &DistinguishedName {
        &self.dn
    }

    #[inline]
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Raw values of `attribute`, empty if absent.
    #[must_use]
    pub fn get_values(&self, attribute: &str) -> &[Vec<u8>] {
        self.attributes
            .get(attribute)
            .or_else(|| {
                self.attributes
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(attribute))
                    .map(|(_, values)| values)
            })
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// First raw value of `attribute`.
    #[inline]
    #[must_use]
    pub fn get_value(&self, attribute: &str) -> Option<&[u8]> {
        self.get_values(attribute).first().map(Vec::as_slice)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, attribute: &str) -> bool {
        !self.get_values(attribute).is_empty()
    }

    /// First value as text, lossily decoded.
    #[inline]
    #[must_use]
    pub fn get_string(&self, attribute: &str) -> Option<String> {
        self.get_value(attribute)
            .map(|raw| String::from_utf8_lossy(raw).into_owned())
    }

    #[inline]
    #[must_use]
    pub fn get_strings(&self, attribute: &str) -> Vec<String> {
        self.get_values(attribute)
            .iter()
            .map(|raw| String::from_utf8_lossy(raw).into_owned())
            .collect()
    }

    #[inline]
    #[must_use]
    pub fn get_bool(&self, attribute: &str) -> Option<bool> {
        self.get_string(attribute)
            .map(|text| ad_string_to_bool(&text))
    }

    #[inline]
    #[must_use]
    pub fn get_int(&self, attribute: &str) -> Option<i64> {
        self.get_string(attribute)?.trim().parse().ok()
    }

    #[inline]
    #[must_use]
    pub fn get_mask(&self, attribute: &str) -> Option<u32> {
        parse_mask(&self.get_string(attribute)?)
    }

    /// First value decoded as a datetime; `None` for "never" and invalid
    /// values alike. Use [`Self::get_timestamp`] to tell them apart.
    #[inline]
    #[must_use]
    pub fn get_datetime<S: SchemaResolver + ?Sized>(
        &self,
        attribute: &str,
        schema: &S,
    ) -> Option<DateTime<Utc>> {
        self.get_timestamp(attribute, schema)?.instant()
    }

    #[inline]
    #[must_use]
    pub fn get_timestamp<S: SchemaResolver + ?Sized>(
        &self,
        attribute: &str,
        schema: &S,
    ) -> Option<Timestamp> {
        match decode_value(attribute, self.get_value(attribute)?, Some(schema)) {
            TypedValue::Datetime(timestamp) => Some(timestamp),
            _ => None,
        }
    }

    /// Whether an account option is on.
    ///
    /// `PasswordExpired` is read from `pwdLastSet`; `CantChangePassword` is
    /// stored in the security descriptor and is always `None`.
    #[must_use]
    pub fn get_account_option(&self, option: AccountOption) -> Option<bool> {
        match option {
            AccountOption::PasswordExpired => self
                .get_string(ATTRIBUTE_PWD_LAST_SET)
                .map(|raw| raw == "0"),
            AccountOption::CantChangePassword => None,
            _ => option.is_set_in(self.get_mask(ATTRIBUTE_USER_ACCOUNT_CONTROL)?),
        }
    }

    #[inline]
    #[must_use]
    pub fn get_group_scope(&self) -> Option<GroupScope> {
        GroupScope::from_mask(self.get_mask(ATTRIBUTE_GROUP_TYPE)?)
    }

    #[inline]
    #[must_use]
    pub fn get_group_type(&self) -> Option<GroupType> {
        self.get_mask(ATTRIBUTE_GROUP_TYPE).map(GroupType::from_mask)
    }

    #[inline]
    #[must_use]
    pub fn object_guid(&self) -> Option<Guid> {
        Guid::from_slice(self.get_value(ATTRIBUTE_OBJECT_GUID)?).ok()
    }

    #[inline]
    #[must_use]
    pub fn object_sid(&self) -> Option<Sid> {
        Sid::from_bytes(self.get_value(ATTRIBUTE_OBJECT_SID)?).ok()
    }

    /// Relative identifier of `objectSid`.
    #[inline]
    #[must_use]
    pub fn rid(&self) -> Option<u32> {
        self.object_sid().map(|sid| sid.rid())
    }

    /// Whether `objectClass` lists `class`.
    #[inline]
    #[must_use]
    pub fn is_class(&self, class: &str) -> bool {
        self.get_values(ATTRIBUTE_OBJECT_CLASS)
            .iter()
            .any(|value| value.eq_ignore_ascii_case(class.as_bytes()))
    }

    /// Whether `accountExpires` says the account never expires.
    #[inline]
    #[must_use]
    pub fn account_never_expires(&self) -> bool {
        self.get_string("accountExpires")
            .is_none_or(|raw| large_integer_datetime_is_never(&raw))
    }
}
