use thiserror::Error;

use crate::connection::Status;
use crate::dn::InvalidDn;
use crate::flags::AccountOption;

/// Errors returned by [`DirectoryConnection`](crate::DirectoryConnection)
/// and the typed accessors built on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An operation was attempted before a successful connect.
    #[error("not connected to a directory")]
    NotConnected,

    /// `connect` was called on an adapter that already tried once.
    #[error("this connection has already been used to connect")]
    AlreadyAttempted,

    /// Login failed. Contains the transport status unchanged.
    #[error("failed to connect to the directory ({0})")]
    ConnectionFailure(Status),

    #[error(transparent)]
    InvalidDn(#[from] InvalidDn),

    /// The schema does not give the attribute a datetime syntax.
    #[error("attribute {attribute} has no datetime syntax in the schema")]
    UnresolvedAttributeType { attribute: String },

    /// A stored value could not be read as the expected type.
    #[error("cannot parse value {value:?} of attribute {attribute}")]
    ParseFailure { attribute: String, value: String },

    /// A directory operation failed. Contains the transport status unchanged.
    #[error("directory operation failed ({0})")]
    Transport(Status),

    #[error("account option \"{}\" cannot be changed through the directory", .0.label())]
    UnsupportedOption(AccountOption),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

impl Error {
    /// The transport status carried by the error, if any.
    #[inline]
    #[must_use]
    pub const fn status(&self) -> Option<Status> {
        match self {
            Self::ConnectionFailure(status) | Self::Transport(status) => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            Error::Transport(Status::OBJECT_NOT_FOUND).to_string(),
            "directory operation failed (object not found, status 6)"
        );
        assert_eq!(
            Error::UnsupportedOption(AccountOption::CantChangePassword).to_string(),
            "account option \"User cannot change password\" cannot be changed through the directory"
        );
    }

    #[test]
    fn status_is_kept() {
        assert_eq!(
            Error::ConnectionFailure(Status::SERVER_CONNECT_FAILURE).status(),
            Some(Status::SERVER_CONNECT_FAILURE)
        );
        assert_eq!(Error::NotConnected.status(), None);
    }
}
