use std::{fmt, str::FromStr};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, Visitor},
};

use crate::error::{Result, TraceError};

/// Number of hex digits in the canonical text form of an [`Id`].
pub const ID_HEX_LEN: usize = 16;

/// A unique, uniformly distributed 64-bit identifier.
///
/// Formats as 16 lowercase, zero-padded hex digits and serializes as a quoted
/// hex string. Decoding also accepts a plain JSON integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Id(u64);

impl Id {
    pub const ZERO: Id = Id(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Parses exactly 16 hex digits, in either case.
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() != ID_HEX_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TraceError::MalformedId);
        }
        u64::from_str_radix(s, 16)
            .map(Id)
            .map_err(|_| TraceError::MalformedId)
    }
}

impl From<u64> for Id {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Id> for u64 {
    fn from(id: Id) -> Self {
        id.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for Id {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self> {
        Id::parse(s)
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct IdVisitor;

impl Visitor<'_> for IdVisitor {
    type Value = Id;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a 16-digit hex string or an unsigned integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Id, E> {
        Id::parse(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Id, E> {
        Ok(Id(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Id, E> {
        u64::try_from(v)
            .map(Id)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Id, D::Error> {
        deserializer.deserialize_any(IdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_zero_padded_lowercase() {
        assert_eq!(Id::new(0).to_string(), "0000000000000000");
        assert_eq!(Id::new(100).to_string(), "0000000000000064");
        assert_eq!(Id::new(u64::MAX).to_string(), "ffffffffffffffff");
    }

    #[test]
    fn parses_either_case() {
        assert_eq!(Id::parse("000000000098E004").unwrap(), Id::new(10018820));
        assert_eq!(Id::parse("000000000098e004").unwrap(), Id::new(10018820));
    }

    #[test]
    fn rejects_wrong_length_and_non_hex() {
        for bad in ["", "64", "000000000000064", "00000000000000064", "000g000000000064", "+00000000000064f"] {
            assert!(matches!(Id::parse(bad), Err(TraceError::MalformedId)), "{bad}");
        }
    }

    #[test]
    fn serializes_as_hex_string() {
        let json = serde_json::to_string(&Id::new(10018820)).unwrap();
        assert_eq!(json, r#""000000000098e004""#);
    }

    #[test]
    fn deserializes_hex_string_or_integer() {
        let from_hex: Id = serde_json::from_str(r#""000000000098e004""#).unwrap();
        let from_int: Id = serde_json::from_str("10018820").unwrap();
        assert_eq!(from_hex, Id::new(10018820));
        assert_eq!(from_int, Id::new(10018820));
    }

    #[test]
    fn rejects_non_id_json() {
        assert!(serde_json::from_str::<Id>("[]").is_err());
        assert!(serde_json::from_str::<Id>(r#""woo""#).is_err());
        assert!(serde_json::from_str::<Id>("-1").is_err());
    }
}
