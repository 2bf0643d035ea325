use std::collections::BTreeMap;

use super::Status;
use crate::dn::DnCanonicalizer;

/// Every value of every attribute of one entry, keyed by attribute name.
pub type Attributes = BTreeMap<String, Vec<Vec<u8>>>;

/// An authenticated session with a directory server.
///
/// Values cross this boundary as raw bytes. Each method reports the
/// transport's own [`Status`] on failure, and [`Session::last_result`]
/// returns the status of the most recent call.
pub trait Session {
    /// DNs of the entries under `search_base` matching `filter`.
    fn search(&mut self, filter: &str, search_base: &str) -> Result<Vec<String>, Status>;

    /// DNs of the direct children of `dn`.
    fn list(&mut self, dn: &str) -> Result<Vec<String>, Status>;

    fn add(&mut self, dn: &str, object_classes: &[&str]) -> Result<(), Status>;

    fn delete(&mut self, dn: &str) -> Result<(), Status>;

    /// `new_rdn` is a full naming component, e.g. `CN=bob`.
    fn rename(&mut self, dn: &str, new_rdn: &str) -> Result<(), Status>;

    fn move_object(&mut self, dn: &str, new_container: &str) -> Result<(), Status>;

    fn attribute_add(&mut self, dn: &str, attribute: &str, value: &[u8]) -> Result<(), Status>;

    fn attribute_replace(&mut self, dn: &str, attribute: &str, value: &[u8])
    -> Result<(), Status>;

    /// Deletes one value, or every value when `value` is `None`.
    fn attribute_delete(
        &mut self,
        dn: &str,
        attribute: &str,
        value: Option<&[u8]>,
    ) -> Result<(), Status>;

    fn get_all_attributes(&mut self, dn: &str) -> Result<Attributes, Status>;

    fn last_result(&self) -> Status;
}

/// Opens sessions. Implemented by the LDAP client library binding.
///
/// The canonical name primitive is part of the transport since the directory
/// client library provides it.
pub trait Transport: DnCanonicalizer {
    type Session: Session;

    /// Connects and binds to `uri`.
    ///
    /// # Errors
    /// The transport's status when the server cannot be reached or the bind
    /// fails.
    fn login(&self, uri: &str) -> Result<Self::Session, Status>;
}
