use core::fmt;
use core::marker::PhantomData;
use core::str::FromStr;
use serde::{Deserialize, Deserializer, de};
use serde::{Serialize, Serializer};

use crate::dn::DistinguishedName;
use crate::{Guid, Sid};

impl Serialize for Sid {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            serializer.serialize_bytes(&self.to_binary())
        }
    }
}

impl Serialize for Guid {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            serializer.serialize_bytes(self.as_bytes())
        }
    }
}

// Text for human readable formats, directory binary form otherwise.
fn deserialize_text_or_bytes<'de, D, T>(
    deserializer: D,
    expecting: &'static str,
) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    for<'a> T: FromStr + TryFrom<&'a [u8]>,
{
    struct Visitor<T> {
        expecting: &'static str,
        _marker: PhantomData<T>,
    }

    impl<T> de::Visitor<'_> for Visitor<T>
    where
        for<'a> T: FromStr + TryFrom<&'a [u8]>,
    {
        type Value = T;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str(self.expecting)
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            T::from_str(v).map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }

        fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            T::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Bytes(v), &self))
        }
    }

    let visitor = Visitor::<T> {
        expecting,
        _marker: PhantomData,
    };
    if deserializer.is_human_readable() {
        deserializer.deserialize_str(visitor)
    } else {
        deserializer.deserialize_bytes(visitor)
    }
}

impl<'de> Deserialize<'de> for Sid {
    #[inline]
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_text_or_bytes(
            deserializer,
            "a SID as a string (e.g., \"S-1-...\") or as raw binary",
        )
    }
}

impl<'de> Deserialize<'de> for Guid {
    #[inline]
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_text_or_bytes(
            deserializer,
            "a GUID as a hyphenated string or as 16 raw bytes",
        )
    }
}

impl Serialize for DistinguishedName {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DistinguishedName {
    #[inline]
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DistinguishedNameVisitor;

        impl de::Visitor<'_> for DistinguishedNameVisitor {
            type Value = DistinguishedName;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a distinguished name such as 'CN=name,DC=domain,DC=com'")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                DistinguishedName::from_str(v)
                    .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_str(DistinguishedNameVisitor)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Unwrap is not an issue in test")]
mod test {
    const BYTES: &[u8] = &[1, 2, 0, 0, 0, 0, 0, 5, 32, 0, 0, 0, 0x20, 0x02, 0, 0];
    const GUID_BYTES: &[u8] = &[
        0x33, 0x22, 0x11, 0x00, 0x55, 0x44, 0x77, 0x66, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee,
        0xff,
    ];

    use crate::dn::DistinguishedName;
    use crate::well_known::BUILTIN_ADMINISTRATORS;
    use crate::{Guid, Sid};
    use serde_test::{self, Configure, Token};

    #[test]
    fn test_binary_sid() {
        serde_test::assert_tokens(&BUILTIN_ADMINISTRATORS.compact(), &[Token::Bytes(BYTES)]);
    }

    #[test]
    fn test_human_sid() {
        serde_test::assert_tokens(
            &BUILTIN_ADMINISTRATORS.readable(),
            &[Token::Str("S-1-5-32-544")],
        );
    }

    #[test]
    fn test_invalid_sid() {
        serde_test::assert_de_tokens_error::<serde_test::Readable<Sid>>(
            &[Token::Str("S-1-5")],
            "invalid value: string \"S-1-5\", expected a SID as a string (e.g., \"S-1-...\") or as raw binary",
        );
    }

    #[test]
    fn test_guid() {
        let guid: Guid = "00112233-4455-6677-8899-aabbccddeeff".parse().unwrap();
        serde_test::assert_tokens(&guid.compact(), &[Token::Bytes(GUID_BYTES)]);
        serde_test::assert_tokens(
            &guid.readable(),
            &[Token::Str("00112233-4455-6677-8899-aabbccddeeff")],
        );
    }

    #[test]
    fn test_distinguished_name() {
        let dn: DistinguishedName = "CN=alice,DC=d,DC=c".parse().unwrap();
        serde_test::assert_tokens(&dn, &[Token::Str("CN=alice,DC=d,DC=c")]);
        serde_test::assert_de_tokens_error::<DistinguishedName>(
            &[Token::Str("alice")],
            "invalid value: string \"alice\", expected a distinguished name such as 'CN=name,DC=domain,DC=com'",
        );
    }

    #[test]
    fn test_json() {
        let json = serde_json::to_string(&BUILTIN_ADMINISTRATORS).unwrap();
        assert_eq!(json, "\"S-1-5-32-544\"");
        let sid: Sid = serde_json::from_str(&json).unwrap();
        assert_eq!(sid, BUILTIN_ADMINISTRATORS);
    }
}
