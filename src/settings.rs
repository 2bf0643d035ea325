//! Connection parameters.

use crate::connection::Status;
use crate::dn::domain_to_search_base;
use crate::error::{Error, Result};

/// Where to connect and which domain to search.
///
/// With the `serde` feature it can be read from any configuration format:
/// ```json
/// { "uri": "ldap://dc1.example.com", "domain": "EXAMPLE.COM" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectionSettings {
    /// LDAP URI of the server, e.g. `ldap://dc1.example.com`.
    pub uri: String,
    /// DNS name of the domain, e.g. `example.com`.
    pub domain: String,
}

impl ConnectionSettings {
    #[inline]
    #[must_use]
    pub fn new(uri: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            domain: domain.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn search_base(&self) -> String {
        domain_to_search_base(&self.domain)
    }

    /// # Errors
    /// [`Error::ConnectionFailure`] with [`Status::MISSING_CONFIG_PARAMETER`]
    /// when the URI or the domain is blank.
    #[inline]
    pub fn validate(&self) -> Result<()> {
        if self.uri.trim().is_empty() || self.domain.trim().is_empty() {
            return Err(Error::ConnectionFailure(Status::MISSING_CONFIG_PARAMETER));
        }
        Ok(())
    }
}
