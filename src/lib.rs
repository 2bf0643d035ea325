//! # Active Directory boundary layer
//!
//! Building blocks for talking to an Active Directory server through an LDAP
//! client library:
//! - [`dn`]: distinguished-name algebra (name, parent, rename, move, search
//!   base from a domain name, canonical names).
//! - [`codec`]: attribute value encodings; FILETIME and generalized time
//!   datetimes, `TRUE`/`FALSE` booleans, binary [`Guid`] and [`Sid`].
//! - [`bits`] and [`flags`]: `userAccountControl` and `groupType` masks.
//! - [`schema`]: attribute syntax classification consumed by the codec.
//! - [`filter`]: search filter construction.
//! - [`DirectoryConnection`]: a connection adapter over a pluggable
//!   [`Transport`], with typed helpers for common edits.
//!
//! The LDAP wire protocol itself is provided by the [`Transport`]
//! implementation.
//!
//! ## Examples
//! ### DN algebra
//! ```rust
//! use adldap::dn;
//!
//! let user = "CN=alice,OU=Sales,DC=example,DC=com";
//! assert_eq!(dn::name_of(user).unwrap(), "alice");
//! assert_eq!(dn::parent_of(user), "OU=Sales,DC=example,DC=com");
//! assert_eq!(dn::domain_to_search_base("example.com"), "DC=example,DC=com");
//! ```
//!
//! ### Decode an attribute
//! ```rust
//! use adldap::codec::{NeverForm, Timestamp, TypedValue, decode_value};
//! use adldap::schema::SchemaTable;
//!
//! let schema = SchemaTable::with_defaults();
//! let value = decode_value("accountExpires", b"9223372036854775807", Some(&schema));
//! assert_eq!(value, TypedValue::Datetime(Timestamp::Never(NeverForm::Max)));
//! ```
//!
//! ### Compile-time literals
//! ```rust
//! # #[cfg(feature = "macro")]
//! # {
//! use adldap::{Sid, sid};
//!
//! const ADMINS: Sid = sid!("S-1-5-32-544");
//! assert_eq!(ADMINS.rid(), 544);
//! # }
//! ```
//!
//! ## Features
//! - `serde`: `Serialize`/`Deserialize` for the value types and the
//!   configuration types.
//! - `macro`: the `sid!` and `guid!` literals.

#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg))]

extern crate self as adldap;

pub mod bits;
pub mod codec;
pub mod connection;
pub mod dn;
mod error;
pub mod filter;
pub mod flags;
mod guid;
pub mod object;
pub mod schema;
mod settings;
pub mod sid;
pub mod well_known;

#[cfg(feature = "serde")]
mod serde_impl;

mod sid_identifier_authority;

/// Identifier authority component of a SID (6-byte value).
///
/// See also: [`Sid::identifier_authority`].
pub use sid_identifier_authority::SidIdentifierAuthority;

pub use connection::{ConnectionState, DirectoryConnection, Session, Status, Transport};
pub use dn::{DistinguishedName, InvalidDn};
pub use error::{Error, Result};
pub use guid::{Guid, InvalidGuidFormat};
pub use object::DirectoryObject;
pub use settings::ConnectionSettings;
pub use sid::{InvalidSidFormat, Sid};

#[cfg(feature = "macro")]
pub use adldap_macro::{guid, sid};

/// Internal utilities for validation and layout calculations.
pub(crate) mod utils;
