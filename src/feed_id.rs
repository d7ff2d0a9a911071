//! Feed identifiers.
//! A feed id is 32 bytes, hex encoded on the wire. The first two bytes carry the report schema
//! version, e.g. `0x0003...` is a v3 feed.
use std::{fmt::Display, str::FromStr};

use eyre::Result;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeedId(pub [u8; 32]);

impl FeedId {
    /// Schema version encoded in the two leading bytes, big-endian.
    pub fn schema_version(&self) -> u16 {
        u16::from_be_bytes([self.0[0], self.0[1]])
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl FromStr for FeedId {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.trim().trim_start_matches("0x");
        let bytes = hex::decode(digits)
            .map_err(|e| eyre::eyre!("feed id {} is not valid hex: {}", s, e))?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|bytes: Vec<u8>| {
            eyre::eyre!("feed id {} must be 32 bytes, got {}", s, bytes.len())
        })?;
        Ok(FeedId(bytes))
    }
}

impl Display for FeedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::fmt::Debug for FeedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FeedId({})", self.to_hex())
    }
}

impl Serialize for FeedId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for FeedId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ETH_USD_V3: &str = "0x000359843a543ee2fe414dc14c7e7920ef10f4372990b79d6361cdc0dd1ba782";

    #[test]
    fn parses_prefixed_and_bare_hex() {
        let prefixed: FeedId = ETH_USD_V3.parse().unwrap();
        let bare: FeedId = ETH_USD_V3.trim_start_matches("0x").parse().unwrap();
        assert_eq!(prefixed, bare);
        assert_eq!(prefixed.to_string(), ETH_USD_V3);
    }

    #[test]
    fn reads_schema_version_from_prefix() {
        let feed_id: FeedId = ETH_USD_V3.parse().unwrap();
        assert_eq!(feed_id.schema_version(), 3);
    }

    #[test]
    fn rejects_wrong_length() {
        let err = "0x0003".parse::<FeedId>().unwrap_err();
        assert!(err.to_string().contains("must be 32 bytes"));
    }

    #[test]
    fn rejects_non_hex() {
        assert!("0xzz".parse::<FeedId>().is_err());
    }
}
