use core::fmt::{self, Display};

/// Result code reported by the transport.
///
/// The value is opaque: it is carried through unchanged, and only the codes
/// below have names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Status(pub i32);

impl Status {
    pub const SUCCESS: Self = Self(1);
    pub const COULDNT_OPEN_CONFIG_FILE: Self = Self(2);
    pub const MISSING_CONFIG_PARAMETER: Self = Self(3);
    pub const SERVER_CONNECT_FAILURE: Self = Self(4);
    pub const LDAP_OPERATION_FAILURE: Self = Self(5);
    pub const OBJECT_NOT_FOUND: Self = Self(6);
    pub const ATTRIBUTE_ENTRY_NOT_FOUND: Self = Self(7);
    pub const INVALID_DN: Self = Self(8);
    pub const RESOLV_ERROR: Self = Self(9);

    #[inline]
    #[must_use]
    pub const fn code(self) -> i32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 == Self::SUCCESS.0
    }

    /// Description of a named code.
    #[inline]
    #[must_use]
    pub const fn description(self) -> Option<&'static str> {
        Some(match self.0 {
            1 => "success",
            2 => "could not open config file",
            3 => "missing config parameter",
            4 => "server connect failure",
            5 => "LDAP operation failure",
            6 => "object not found",
            7 => "attribute entry not found",
            8 => "invalid DN",
            9 => "DNS resolution error",
            _ => return None,
        })
    }
}

impl Display for Status {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.description() {
            Some(description) => write!(f, "{description}, status {}", self.0),
            None => write!(f, "status {}", self.0),
        }
    }
}

impl From<i32> for Status {
    #[inline]
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<Status> for i32 {
    #[inline]
    fn from(value: Status) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Status::SUCCESS.to_string(), "success, status 1");
        assert_eq!(Status(-7).to_string(), "status -7");
        assert!(Status::SUCCESS.is_success(), "1 is success");
        assert!(!Status(0).is_success(), "0 is not success");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_transparent() {
        serde_test::assert_tokens(&Status::INVALID_DN, &[serde_test::Token::I32(8)]);
    }
}
