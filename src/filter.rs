//! Search filter building (RFC 4515).
//!
//! ```rust
//! # use adldap::filter::{Condition, filter_and, filter_condition};
//! let filter = filter_and([
//!     filter_condition(Condition::Equals, "objectClass", "user"),
//!     filter_condition(Condition::StartsWith, "cn", "adm"),
//! ]);
//! assert_eq!(filter, "(&(objectClass=user)(cn=adm*))");
//! ```

/// Comparison applied to an attribute by [`filter_condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Condition {
    Equals,
    NotEquals,
    StartsWith,
    EndsWith,
    Contains,
    /// The attribute has at least one value. The value argument is ignored.
    Set,
    /// The attribute has no value. The value argument is ignored.
    Unset,
}

/// Escapes characters with special meaning inside a filter value.
#[inline]
#[must_use]
pub fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\5c"),
            '*' => out.push_str("\\2a"),
            '(' => out.push_str("\\28"),
            ')' => out.push_str("\\29"),
            '\0' => out.push_str("\\00"),
            other => out.push(other),
        }
    }
    out
}

/// Single-attribute filter. `value` is escaped.
#[inline]
#[must_use]
pub fn filter_condition(condition: Condition, attribute: &str, value: &str) -> String {
    let value = escape_value(value);
    match condition {
        Condition::Equals => format!("({attribute}={value})"),
        Condition::NotEquals => format!("(!({attribute}={value}))"),
        Condition::StartsWith => format!("({attribute}={value}*)"),
        Condition::EndsWith => format!("({attribute}=*{value})"),
        Condition::Contains => format!("({attribute}=*{value}*)"),
        Condition::Set => format!("({attribute}=*)"),
        Condition::Unset => format!("(!({attribute}=*))"),
    }
}

fn combine<I>(operator: char, filters: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut parts: Vec<String> = filters
        .into_iter()
        .filter(|filter| !filter.as_ref().is_empty())
        .map(|filter| filter.as_ref().to_owned())
        .collect();
    match parts.len() {
        0 => String::new(),
        1 => parts.pop().unwrap_or_default(),
        _ => format!("({operator}{})", parts.concat()),
    }
}

/// Conjunction of `filters`. Empty filters are skipped, a single filter is
/// returned unchanged and no filter gives an empty string.
#[inline]
#[must_use]
pub fn filter_and<I>(filters: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    combine('&', filters)
}

/// Disjunction of `filters`, same rules as [`filter_and`].
#[inline]
#[must_use]
pub fn filter_or<I>(filters: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    combine('|', filters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaping() {
        assert_eq!(escape_value("John*"), "John\\2a");
        assert_eq!(escape_value("a(b)c"), "a\\28b\\29c");
        assert_eq!(escape_value("back\\slash"), "back\\5cslash");
        assert_eq!(escape_value("nul\0"), "nul\\00");
        assert_eq!(escape_value("plain"), "plain");
    }

    #[test]
    fn conditions() {
        assert_eq!(filter_condition(Condition::Equals, "cn", "x"), "(cn=x)");
        assert_eq!(filter_condition(Condition::NotEquals, "cn", "x"), "(!(cn=x))");
        assert_eq!(filter_condition(Condition::StartsWith, "cn", "x"), "(cn=x*)");
        assert_eq!(filter_condition(Condition::EndsWith, "cn", "x"), "(cn=*x)");
        assert_eq!(filter_condition(Condition::Contains, "cn", "x*"), "(cn=*x\\2a*)");
        assert_eq!(filter_condition(Condition::Set, "mail", "ignored"), "(mail=*)");
        assert_eq!(filter_condition(Condition::Unset, "mail", ""), "(!(mail=*))");
    }

    #[test]
    fn combinators() {
        assert_eq!(filter_and(Vec::<String>::new()), "");
        assert_eq!(filter_or(["(cn=a)"]), "(cn=a)");
        assert_eq!(filter_or(["(cn=a)", "", "(cn=b)"]), "(|(cn=a)(cn=b))");
        assert_eq!(
            filter_and([filter_or(["(cn=a)", "(cn=b)"]), "(objectClass=group)".to_owned()]),
            "(&(|(cn=a)(cn=b))(objectClass=group))"
        );
    }
}
