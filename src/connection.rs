//! The connection adapter: one session with one directory server.
//!
//! [`DirectoryConnection`] wraps a [`Transport`] and forwards directory
//! operations to its [`Session`]. It computes the search base from the domain
//! name, keeps the connection state and surfaces transport statuses unchanged.
//!
//! ```text
//! Disconnected --login ok-----> Connected
//!      |
//!      +------login failed----> Failed(status)   (terminal)
//! ```
//!
//! Every operation takes `&mut self`: a connection is used from one thread at
//! a time.

mod status;
mod transport;

pub use status::Status;
pub use transport::{Attributes, Session, Transport};

use chrono::{DateTime, TimeZone};
use tracing::{debug, info, instrument, warn};

use crate::bits::{bit_set, format_mask, parse_mask};
use crate::codec::datetime_to_string;
use crate::dn::{self, DistinguishedName};
use crate::error::{Error, Result};
use crate::flags::{
    ATTRIBUTE_GROUP_TYPE, ATTRIBUTE_MEMBER, ATTRIBUTE_PWD_LAST_SET,
    ATTRIBUTE_USER_ACCOUNT_CONTROL, AccountOption, GroupScope, GroupType,
};
use crate::object::DirectoryObject;
use crate::schema::SchemaResolver;
use crate::settings::ConnectionSettings;

/// `pwdLastSet` value forcing a password change at next logon.
const PWD_LAST_SET_EXPIRED: &str = "0";
/// `pwdLastSet` value the server replaces with the current time.
const PWD_LAST_SET_NOW: &str = "-1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
    /// Login failed with this status. A new connection must be created to
    /// try again.
    Failed(Status),
}

/// A directory connection over transport `T`.
///
/// # Examples
/// ```rust,ignore
/// let mut connection = DirectoryConnection::new(transport);
/// connection.connect("ldap://dc1.example.com", "example.com")?;
/// let users = connection.search("(objectClass=user)")?;
/// ```
pub struct DirectoryConnection<T: Transport> {
    transport: T,
    session: Option<T::Session>,
    state: ConnectionState,
    uri: String,
    search_base: String,
}

impl<T: Transport> DirectoryConnection<T> {
    #[inline]
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            session: None,
            state: ConnectionState::Disconnected,
            uri: String::new(),
            search_base: String::new(),
        }
    }

    /// Logs in to `uri` and searches under the base derived from `domain`.
    ///
    /// The search base is computed before the login, so it is available even
    /// when the login fails.
    ///
    /// # Errors
    /// - [`Error::AlreadyAttempted`] if this connection already tried.
    /// - [`Error::ConnectionFailure`] with the transport status when login
    ///   fails; the connection is then [`ConnectionState::Failed`].
    pub fn connect(&mut self, uri: &str, domain: &str) -> Result<()> {
        if self.state != ConnectionState::Disconnected {
            return Err(Error::AlreadyAttempted);
        }
        self.uri = uri.to_owned();
        self.search_base = dn::domain_to_search_base(domain);

        match self.transport.login(uri) {
            Ok(session) => {
                info!(uri, search_base = %self.search_base, "connected to directory");
                self.session = Some(session);
                self.state = ConnectionState::Connected;
                Ok(())
            }
            Err(status) => {
                warn!(uri, %status, "failed to connect to directory");
                self.state = ConnectionState::Failed(status);
                Err(Error::ConnectionFailure(status))
            }
        }
    }

    /// [`Self::connect`] with validated settings.
    ///
    /// # Errors
    /// See [`ConnectionSettings::validate`] and [`Self::connect`].
    #[inline]
    pub fn connect_with(&mut self, settings: &ConnectionSettings) -> Result<()> {
        settings.validate()?;
        self.connect(&settings.uri, &settings.domain)
    }

    #[inline]
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self.state, ConnectionState::Connected)
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    /// `DC=` form of the domain given to `connect`.
    #[inline]
    #[must_use]
    pub fn search_base(&self) -> &str {
        &self.search_base
    }

    #[inline]
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    #[inline]
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Status of the most recent transport call.
    ///
    /// `None` before any connection attempt.
    #[inline]
    #[must_use]
    pub fn get_ldap_result(&self) -> Option<Status> {
        match (&self.session, self.state) {
            (Some(session), _) => Some(session.last_result()),
            (None, ConnectionState::Failed(status)) => Some(status),
            (None, _) => None,
        }
    }

    fn forward<R>(
        &mut self,
        operation: &'static str,
        dn: &str,
        call: impl FnOnce(&mut T::Session) -> core::result::Result<R, Status>,
    ) -> Result<R> {
        let session = self.session.as_mut().ok_or(Error::NotConnected)?;
        debug!(operation, dn, "directory operation");
        call(session).map_err(|status| {
            warn!(operation, dn, %status, "directory operation failed");
            Error::Transport(status)
        })
    }

    /// DNs matching `filter` under the connection's search base.
    ///
    /// # Errors
    /// [`Error::NotConnected`] or the transport failure.
    #[inline]
    pub fn search(&mut self, filter: &str) -> Result<Vec<String>> {
        let search_base = self.search_base.clone();
        self.search_in(filter, &search_base)
    }

    /// # Errors
    /// [`Error::NotConnected`] or the transport failure.
    #[inline]
    #[instrument(level = "debug", skip(self, search_base))]
    pub fn search_in(&mut self, filter: &str, search_base: &str) -> Result<Vec<String>> {
        self.forward("search", search_base, |session| {
            session.search(filter, search_base)
        })
    }

    /// Direct children of `dn`.
    ///
    /// # Errors
    /// [`Error::NotConnected`] or the transport failure.
    #[inline]
    pub fn list(&mut self, dn: &str) -> Result<Vec<String>> {
        self.forward("list", dn, |session| session.list(dn))
    }

    /// # Errors
    /// [`Error::NotConnected`] or the transport failure.
    #[inline]
    pub fn add(&mut self, dn: &str, object_classes: &[&str]) -> Result<()> {
        self.forward("add", dn, |session| session.add(dn, object_classes))
    }

    /// # Errors
    /// [`Error::NotConnected`] or the transport failure.
    #[inline]
    pub fn delete(&mut self, dn: &str) -> Result<()> {
        self.forward("delete", dn, |session| session.delete(dn))
    }

    /// Renames with a full naming component such as `CN=bob`.
    ///
    /// # Errors
    /// [`Error::NotConnected`] or the transport failure.
    #[inline]
    pub fn rename(&mut self, dn: &str, new_rdn: &str) -> Result<()> {
        self.forward("rename", dn, |session| session.rename(dn, new_rdn))
    }

    /// # Errors
    /// [`Error::NotConnected`] or the transport failure.
    #[inline]
    pub fn move_object(&mut self, dn: &str, new_container: &str) -> Result<()> {
        self.forward("move", dn, |session| session.move_object(dn, new_container))
    }

    /// # Errors
    /// [`Error::NotConnected`] or the transport failure.
    #[inline]
    pub fn attribute_add(&mut self, dn: &str, attribute: &str, value: &str) -> Result<()> {
        self.attribute_add_binary(dn, attribute, value.as_bytes())
    }

    /// # Errors
    /// [`Error::NotConnected`] or the transport failure.
    #[inline]
    pub fn attribute_add_binary(&mut self, dn: &str, attribute: &str, value: &[u8]) -> Result<()> {
        self.forward("attribute_add", dn, |session| {
            session.attribute_add(dn, attribute, value)
        })
    }

    /// # Errors
    /// [`Error::NotConnected`] or the transport failure.
    #[inline]
    pub fn attribute_replace(&mut self, dn: &str, attribute: &str, value: &str) -> Result<()> {
        self.attribute_replace_binary(dn, attribute, value.as_bytes())
    }

    /// # Errors
    /// [`Error::NotConnected`] or the transport failure.
    #[inline]
    pub fn attribute_replace_binary(
        &mut self,
        dn: &str,
        attribute: &str,
        value: &[u8],
    ) -> Result<()> {
        self.forward("attribute_replace", dn, |session| {
            session.attribute_replace(dn, attribute, value)
        })
    }

    /// Deletes `value` from `attribute`, or every value when `value` is
    /// `None`.
    ///
    /// # Errors
    /// [`Error::NotConnected`] or the transport failure.
    #[inline]
    pub fn attribute_delete(&mut self, dn: &str, attribute: &str, value: Option<&str>) -> Result<()> {
        self.forward("attribute_delete", dn, |session| {
            session.attribute_delete(dn, attribute, value.map(str::as_bytes))
        })
    }

    /// # Errors
    /// [`Error::NotConnected`] or the transport failure.
    #[inline]
    pub fn get_all_attributes(&mut self, dn: &str) -> Result<Attributes> {
        self.forward("get_all_attributes", dn, |session| {
            session.get_all_attributes(dn)
        })
    }

    /// Canonical name of `dn` through the transport's converter.
    ///
    /// Does not need a session.
    ///
    /// # Errors
    /// [`Error::InvalidDn`] when the converter rejects `dn`.
    #[inline]
    pub fn canonicalize(&self, dn: &str) -> Result<String> {
        Ok(dn::canonicalize(dn, &self.transport)?)
    }

    /// Creates an object named `name` of `object_class` under `parent` and
    /// returns its DN.
    ///
    /// # Errors
    /// [`Error::NotConnected`] or the transport failure.
    pub fn object_create(
        &mut self,
        name: &str,
        parent: &str,
        object_class: &str,
    ) -> Result<DistinguishedName> {
        let dn = dn::build(name, parent, object_class);
        self.add(&dn, &[object_class])?;
        Ok(DistinguishedName::new_unchecked(dn))
    }

    /// Renames the object to `new_name`, keeping its naming attribute, and
    /// returns the new DN.
    ///
    /// # Errors
    /// [`Error::NotConnected`] or the transport failure.
    pub fn object_rename(&mut self, dn: &str, new_name: &str) -> Result<DistinguishedName> {
        let new_dn = dn::rename(dn, new_name);
        self.rename(dn, dn::rdn_of(&new_dn))?;
        Ok(DistinguishedName::new_unchecked(new_dn))
    }

    /// Moves the object under `new_parent` and returns the new DN.
    ///
    /// # Errors
    /// [`Error::NotConnected`] or the transport failure.
    pub fn object_move(&mut self, dn: &str, new_parent: &str) -> Result<DistinguishedName> {
        self.move_object(dn, new_parent)?;
        Ok(DistinguishedName::new_unchecked(dn::move_to(dn, new_parent)))
    }

    /// Reads every attribute of `dn`.
    ///
    /// # Errors
    /// [`Error::InvalidDn`] for text that is not a DN, [`Error::NotConnected`]
    /// or the transport failure.
    pub fn fetch_object(&mut self, dn: &str) -> Result<DirectoryObject> {
        let name: DistinguishedName = dn.parse()?;
        let attributes = self.get_all_attributes(dn)?;
        Ok(DirectoryObject::new(name, attributes))
    }

    fn read_mask(&mut self, dn: &str, attribute: &str) -> Result<u32> {
        let object = DirectoryObject::new(
            DistinguishedName::new_unchecked(dn.to_owned()),
            self.get_all_attributes(dn)?,
        );
        let Some(text) = object.get_string(attribute) else {
            return Ok(0);
        };
        parse_mask(&text).ok_or_else(|| Error::ParseFailure {
            attribute: attribute.to_owned(),
            value: text,
        })
    }

    fn update_mask(
        &mut self,
        dn: &str,
        attribute: &str,
        update: impl FnOnce(u32) -> u32,
    ) -> Result<()> {
        let mask = update(self.read_mask(dn, attribute)?);
        self.attribute_replace(dn, attribute, &format_mask(mask))
    }

    /// Turns an account option on or off.
    ///
    /// # Errors
    /// - [`Error::UnsupportedOption`] for `CantChangePassword`, which lives
    ///   in the security descriptor.
    /// - [`Error::ParseFailure`] if `userAccountControl` is not a number.
    /// - [`Error::NotConnected`] or the transport failure.
    pub fn user_set_account_option(
        &mut self,
        dn: &str,
        option: AccountOption,
        enabled: bool,
    ) -> Result<()> {
        match option {
            AccountOption::CantChangePassword => Err(Error::UnsupportedOption(option)),
            AccountOption::PasswordExpired => {
                let value = if enabled {
                    PWD_LAST_SET_EXPIRED
                } else {
                    PWD_LAST_SET_NOW
                };
                self.attribute_replace(dn, ATTRIBUTE_PWD_LAST_SET, value)
            }
            _ => self.update_mask(dn, ATTRIBUTE_USER_ACCOUNT_CONTROL, |mask| {
                bit_set(mask, option.bit(), enabled)
            }),
        }
    }

    /// # Errors
    /// [`Error::ParseFailure`] if `groupType` is not a number,
    /// [`Error::NotConnected`] or the transport failure.
    #[inline]
    pub fn group_set_scope(&mut self, dn: &str, scope: GroupScope) -> Result<()> {
        self.update_mask(dn, ATTRIBUTE_GROUP_TYPE, |mask| scope.apply_to(mask))
    }

    /// # Errors
    /// [`Error::ParseFailure`] if `groupType` is not a number,
    /// [`Error::NotConnected`] or the transport failure.
    #[inline]
    pub fn group_set_type(&mut self, dn: &str, group_type: GroupType) -> Result<()> {
        self.update_mask(dn, ATTRIBUTE_GROUP_TYPE, |mask| group_type.apply_to(mask))
    }

    /// Adds `member_dn` to the `member` attribute of `group_dn`.
    ///
    /// # Errors
    /// [`Error::NotConnected`] or the transport failure, e.g. when the
    /// object is already a member.
    #[inline]
    pub fn group_add_member(&mut self, group_dn: &str, member_dn: &str) -> Result<()> {
        self.attribute_add(group_dn, ATTRIBUTE_MEMBER, member_dn)
    }

    /// Removes `member_dn` from the `member` attribute of `group_dn`.
    ///
    /// # Errors
    /// [`Error::NotConnected`] or the transport failure, e.g. when the
    /// object is not a member.
    #[inline]
    pub fn group_remove_member(&mut self, group_dn: &str, member_dn: &str) -> Result<()> {
        self.attribute_delete(group_dn, ATTRIBUTE_MEMBER, Some(member_dn))
    }

    /// Writes `datetime` in the encoding the schema gives `attribute`.
    ///
    /// # Errors
    /// [`Error::UnresolvedAttributeType`] when the attribute has no datetime
    /// syntax, [`Error::NotConnected`] or the transport failure.
    pub fn attribute_replace_datetime<Tz: TimeZone, S: SchemaResolver + ?Sized>(
        &mut self,
        dn: &str,
        attribute: &str,
        datetime: &DateTime<Tz>,
        schema: &S,
    ) -> Result<()> {
        let value = datetime_to_string(attribute, datetime, Some(schema));
        if value.is_empty() {
            return Err(Error::UnresolvedAttributeType {
                attribute: attribute.to_owned(),
            });
        }
        self.attribute_replace(dn, attribute, &value)
    }
}
