//! Distinguished-name algebra.
//!
//! A DN is a comma-separated list of `Attribute=Value` components with the
//! object's own naming component first and the root last:
//! `CN=foo,CN=bar,DC=domain,DC=com`. Every operation here is a plain text
//! transform; escaped commas or equals signs inside values are not
//! interpreted.

use core::fmt::{self, Display};
use core::str::FromStr;

use delegate::delegate;
use thiserror::Error;
use tracing::trace;

/// Object class whose DNs are prefixed with `OU=` instead of `CN=`.
pub const CLASS_OU: &str = "organizationalUnit";

/// Error returned for text that cannot be treated as a DN.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid distinguished name: {dn:?}")]
pub struct InvalidDn {
    pub dn: String,
}

impl InvalidDn {
    fn new(dn: &str) -> Self {
        Self { dn: dn.to_owned() }
    }
}

/// The external primitive that turns a DN into its AD canonical name.
pub trait DnCanonicalizer {
    /// `CN=foo,CN=bar,DC=domain,DC=com` => `domain.com/bar/foo`.
    ///
    /// Returns `None` when the DN cannot be converted.
    fn canonicalize_dn(&self, dn: &str) -> Option<String>;
}

impl<C: DnCanonicalizer + ?Sized> DnCanonicalizer for &C {
    #[inline]
    fn canonicalize_dn(&self, dn: &str) -> Option<String> {
        (**self).canonicalize_dn(dn)
    }
}

/// In-process canonical name conversion.
///
/// Leading `DC=` components form the dotted domain; the remaining components
/// are emitted root first, separated by `/`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeCanonicalizer;

impl DnCanonicalizer for NativeCanonicalizer {
    fn canonicalize_dn(&self, dn: &str) -> Option<String> {
        if dn.is_empty() {
            return None;
        }
        let mut domain: Vec<&str> = Vec::new();
        let mut path: Vec<&str> = Vec::new();
        for component in dn.split(',') {
            let (attribute, value) = component.split_once('=')?;
            if attribute.trim().eq_ignore_ascii_case("DC") {
                domain.push(value);
            } else {
                if !domain.is_empty() {
                    // Containers below the domain components are not a DN.
                    return None;
                }
                path.push(value);
            }
        }
        if domain.is_empty() {
            return None;
        }
        let mut canonical = domain.join(".");
        for value in path.iter().rev() {
            canonical.push('/');
            canonical.push_str(value);
        }
        Some(canonical)
    }
}

/// First component, unmodified.
///
/// `"CN=foo,CN=bar,DC=domain,DC=com"` => `"CN=foo"`
#[inline]
#[must_use]
pub fn rdn_of(dn: &str) -> &str {
    dn.split_once(',').map_or(dn, |(rdn, _)| rdn)
}

/// Value of the first component.
///
/// `"CN=foo,CN=bar,DC=domain,DC=com"` => `"foo"`
///
/// # Errors
/// [`InvalidDn`] when the DN has no `=` before its first `,`, or no `,` at
/// all (a single-component DN is a root, which has no name here).
#[inline]
pub fn name_of(dn: &str) -> Result<&str, InvalidDn> {
    let (rdn, _) = dn.split_once(',').ok_or_else(|| InvalidDn::new(dn))?;
    let (_, name) = rdn.split_once('=').ok_or_else(|| InvalidDn::new(dn))?;
    Ok(name)
}

/// Everything after the first component; empty for a single-component DN.
#[inline]
#[must_use]
pub fn parent_of(dn: &str) -> &str {
    dn.split_once(',').map_or("", |(_, parent)| parent)
}

/// Canonical name of the parent container.
///
/// # Errors
/// [`InvalidDn`] when the canonicalizer rejects the parent DN.
#[inline]
pub fn parent_canonical<C: DnCanonicalizer + ?Sized>(
    dn: &str,
    canonicalizer: &C,
) -> Result<String, InvalidDn> {
    canonicalize(parent_of(dn), canonicalizer)
}

/// Replaces the value of the first component, keeping its attribute prefix.
///
/// ```rust
/// # use adldap::dn;
/// assert_eq!(dn::rename("CN=foo,CN=bar,DC=d,DC=c", "baz"), "CN=baz,CN=bar,DC=d,DC=c");
/// ```
#[inline]
#[must_use]
pub fn rename(dn: &str, new_name: &str) -> String {
    let rdn = rdn_of(dn);
    let prefix = rdn.find('=').map_or("", |i| rdn.get(..=i).unwrap_or_default());
    let rest = dn.get(rdn.len()..).unwrap_or_default();
    format!("{prefix}{new_name}{rest}")
}

/// Re-parents the object: `rdn_of(dn) + "," + new_parent`.
///
/// ```rust
/// # use adldap::dn;
/// assert_eq!(
///     dn::move_to("CN=foo,CN=bar,DC=d,DC=c", "OU=x,DC=d,DC=c"),
///     "CN=foo,OU=x,DC=d,DC=c"
/// );
/// ```
#[inline]
#[must_use]
pub fn move_to(dn: &str, new_parent: &str) -> String {
    format!("{},{new_parent}", rdn_of(dn))
}

/// `CN=foo,CN=bar,DC=domain,DC=com` => `domain.com/bar/foo`
///
/// # Errors
/// [`InvalidDn`] when the canonicalizer fails.
#[inline]
pub fn canonicalize<C: DnCanonicalizer + ?Sized>(
    dn: &str,
    canonicalizer: &C,
) -> Result<String, InvalidDn> {
    canonicalizer.canonicalize_dn(dn).ok_or_else(|| {
        trace!(dn, "canonicalization failed");
        InvalidDn::new(dn)
    })
}

/// DN of a new object named `name` under `parent`.
///
/// ```rust
/// # use adldap::dn;
/// assert_eq!(dn::build("Sales", "DC=d,DC=c", "organizationalUnit"), "OU=Sales,DC=d,DC=c");
/// assert_eq!(dn::build("alice", "OU=Sales,DC=d,DC=c", "user"), "CN=alice,OU=Sales,DC=d,DC=c");
/// ```
#[inline]
#[must_use]
pub fn build(name: &str, parent: &str, object_class: &str) -> String {
    let prefix = if object_class == CLASS_OU { "OU" } else { "CN" };
    format!("{prefix}={name},{parent}")
}

/// `"SUB.EXAMPLE.COM"` => `"DC=sub,DC=example,DC=com"`
///
/// Every dot is replaced, not only the first.
#[inline]
#[must_use]
pub fn domain_to_search_base(domain: &str) -> String {
    format!("DC={}", domain.to_lowercase().replace('.', ",DC="))
}

/// An owned distinguished name.
///
/// # Examples
/// ```rust
/// # use adldap::DistinguishedName;
/// let dn: DistinguishedName = "CN=alice,OU=Sales,DC=example,DC=com".parse().unwrap();
/// assert_eq!(dn.name().unwrap(), "alice");
/// assert_eq!(dn.parent().as_str(), "OU=Sales,DC=example,DC=com");
/// assert_eq!(dn.renamed("bob").as_str(), "CN=bob,OU=Sales,DC=example,DC=com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DistinguishedName(String);

impl DistinguishedName {
    /// Wraps text without validation.
    #[inline]
    #[must_use]
    pub const fn new_unchecked(dn: String) -> Self {
        Self(dn)
    }

    delegate! {
        to self.0 {
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str;
            #[inline]
            #[must_use]
            pub fn len(&self) -> usize;
            #[inline]
            #[must_use]
            pub fn is_empty(&self) -> bool;
        }
    }

    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    #[inline]
    #[must_use]
    pub fn rdn(&self) -> &str {
        rdn_of(&self.0)
    }

    /// # Errors
    /// See [`name_of`].
    #[inline]
    pub fn name(&self) -> Result<&str, InvalidDn> {
        name_of(&self.0)
    }

    /// The parent DN; empty when this is a root.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Self {
        Self(parent_of(&self.0).to_owned())
    }

    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        parent_of(&self.0).is_empty()
    }

    #[inline]
    #[must_use]
    pub fn renamed(&self, new_name: &str) -> Self {
        Self(rename(&self.0, new_name))
    }

    #[inline]
    #[must_use]
    pub fn moved_to(&self, new_parent: &Self) -> Self {
        Self(move_to(&self.0, new_parent.as_str()))
    }

    /// # Errors
    /// See [`canonicalize`].
    #[inline]
    pub fn canonical<C: DnCanonicalizer + ?Sized>(
        &self,
        canonicalizer: &C,
    ) -> Result<String, InvalidDn> {
        canonicalize(&self.0, canonicalizer)
    }

    /// Search base of a DNS domain name.
    #[inline]
    #[must_use]
    pub fn from_domain(domain: &str) -> Self {
        Self(domain_to_search_base(domain))
    }
}

impl FromStr for DistinguishedName {
    type Err = InvalidDn;

    /// Accepts any text whose components all contain `=`.
    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.split(',').all(|component| component.contains('=')) {
            return Err(InvalidDn::new(s));
        }
        Ok(Self(s.to_owned()))
    }
}

impl Display for DistinguishedName {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DistinguishedName {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<DistinguishedName> for String {
    #[inline]
    fn from(value: DistinguishedName) -> Self {
        value.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Unwrap is not an issue in test")]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DN: &str = "CN=foo,CN=bar,DC=d,DC=c";

    #[test]
    fn decompose() {
        assert_eq!(rdn_of(DN), "CN=foo");
        assert_eq!(name_of(DN).unwrap(), "foo");
        assert_eq!(parent_of(DN), "CN=bar,DC=d,DC=c");
    }

    #[test]
    fn single_component() {
        assert_eq!(rdn_of("DC=com"), "DC=com");
        assert_eq!(parent_of("DC=com"), "");
        assert_eq!(
            name_of("DC=com"),
            Err(InvalidDn {
                dn: "DC=com".to_owned()
            })
        );
        assert!(name_of("foo,DC=com").is_err(), "no '=' in first component");
    }

    #[test]
    fn rename_and_move() {
        assert_eq!(rename(DN, "baz"), "CN=baz,CN=bar,DC=d,DC=c");
        assert_eq!(rename("OU=old,DC=d", "new"), "OU=new,DC=d");
        assert_eq!(move_to(DN, "OU=x,DC=d,DC=c"), "CN=foo,OU=x,DC=d,DC=c");
    }

    #[test]
    fn build_prefix_follows_class() {
        assert_eq!(build("x", "DC=d", CLASS_OU), "OU=x,DC=d");
        assert_eq!(build("x", "DC=d", "group"), "CN=x,DC=d");
    }

    #[test]
    fn search_base_replaces_every_dot() {
        assert_eq!(domain_to_search_base("EXAMPLE.COM"), "DC=example,DC=com");
        assert_eq!(
            domain_to_search_base("SUB.EXAMPLE.COM"),
            "DC=sub,DC=example,DC=com"
        );
    }

    #[test]
    fn native_canonical_names() {
        let canon = NativeCanonicalizer;
        assert_eq!(
            canonicalize("CN=foo,CN=bar,DC=domain,DC=com", &canon).unwrap(),
            "domain.com/bar/foo"
        );
        assert_eq!(canonicalize("DC=domain,DC=com", &canon).unwrap(), "domain.com");
        assert_eq!(
            parent_canonical("CN=foo,CN=bar,DC=domain,DC=com", &canon).unwrap(),
            "domain.com/bar"
        );
        assert!(canonicalize("", &canon).is_err(), "empty DN");
        assert!(canonicalize("CN=foo", &canon).is_err(), "no domain part");
        assert!(canonicalize("foo,DC=com", &canon).is_err(), "missing '='");
    }

    #[test]
    fn parse_distinguished_name() {
        assert!("CN=a,DC=b".parse::<DistinguishedName>().is_ok(), "valid DN");
        assert!("".parse::<DistinguishedName>().is_err(), "empty");
        assert!("CN=a,b".parse::<DistinguishedName>().is_err(), "component without '='");
        let root: DistinguishedName = "DC=com".parse().unwrap();
        assert!(root.is_root(), "single component is root");
        let moved = "CN=a,OU=x,DC=com"
            .parse::<DistinguishedName>()
            .unwrap()
            .moved_to(&root);
        assert_eq!(moved.to_string(), "CN=a,DC=com");
    }

    proptest! {
        #[test]
        fn search_base_has_one_component_per_label(labels in proptest::collection::vec("[A-Za-z0-9]{1,12}", 1..6)) {
            let domain = labels.join(".");
            let base = domain_to_search_base(&domain);
            let components: Vec<&str> = base.split(',').collect();
            prop_assert_eq!(components.len(), labels.len());
            for (component, label) in components.iter().zip(&labels) {
                let expected = format!("DC={}", label.to_lowercase());
                prop_assert_eq!(*component, expected.as_str());
            }
        }

        #[test]
        fn rename_keeps_parent(name in "[a-z]{1,10}", new_name in "[a-z]{1,10}", parent in "(OU|CN)=[a-z]{1,8},DC=[a-z]{1,8}") {
            let dn = build(&name, &parent, "user");
            let renamed = rename(&dn, &new_name);
            prop_assert_eq!(parent_of(&renamed), parent.as_str());
            prop_assert_eq!(name_of(&renamed).unwrap(), new_name.as_str());
        }
    }
}
