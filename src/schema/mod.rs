//! # Schema Registry
//! Maps a feed's schema version onto the ABI layout of its report blob.
//! Every layout starts with the same six fields, followed by the version specific payload.

use std::fmt::Display;

use crate::decoder::DecodeError;
use crate::feed_id::FeedId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    FeedId,
    Uint(usize),
    Int(usize),
    Tuple(&'static [FieldSpec]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

macro_rules! layout {
    ($($name:literal => $kind:expr),* $(,)?) => {
        &[
            field("feedId", FieldKind::FeedId),
            field("validFromTimestamp", FieldKind::Uint(32)),
            field("observationsTimestamp", FieldKind::Uint(32)),
            field("nativeFee", FieldKind::Uint(192)),
            field("linkFee", FieldKind::Uint(192)),
            field("expiresAt", FieldKind::Uint(32)),
            $(field($name, $kind),)*
        ]
    };
}

const V2: &[FieldSpec] = layout! {
    "benchmarkPrice" => FieldKind::Int(192),
};

const V3: &[FieldSpec] = layout! {
    "benchmarkPrice" => FieldKind::Int(192),
    "bid" => FieldKind::Int(192),
    "ask" => FieldKind::Int(192),
};

const V4: &[FieldSpec] = layout! {
    "price" => FieldKind::Int(192),
    "marketStatus" => FieldKind::Uint(32),
};

const V5: &[FieldSpec] = layout! {
    "rate" => FieldKind::Int(192),
    "timestamp" => FieldKind::Uint(32),
    "duration" => FieldKind::Uint(32),
};

const V6: &[FieldSpec] = layout! {
    "price" => FieldKind::Int(192),
    "price2" => FieldKind::Int(192),
    "price3" => FieldKind::Int(192),
    "price4" => FieldKind::Int(192),
    "price5" => FieldKind::Int(192),
};

const V7: &[FieldSpec] = layout! {
    "exchangeRate" => FieldKind::Int(192),
};

const V8: &[FieldSpec] = layout! {
    "lastUpdateTimestamp" => FieldKind::Uint(64),
    "midPrice" => FieldKind::Int(192),
    "marketStatus" => FieldKind::Uint(32),
};

const V9: &[FieldSpec] = layout! {
    "navPerShare" => FieldKind::Int(192),
    "navDate" => FieldKind::Uint(64),
    "aum" => FieldKind::Int(192),
    "ripcord" => FieldKind::Uint(32),
};

const V10: &[FieldSpec] = layout! {
    "lastUpdateTimestamp" => FieldKind::Uint(64),
    "price" => FieldKind::Int(192),
    "marketStatus" => FieldKind::Uint(32),
    "currentMultiplier" => FieldKind::Int(192),
    "newMultiplier" => FieldKind::Int(192),
    "activationDateTime" => FieldKind::Uint(32),
    "tokenizedPrice" => FieldKind::Int(192),
};

/// Report schema versions this client knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    V2,
    V3,
    V4,
    V5,
    V6,
    V7,
    V8,
    V9,
    V10,
}

impl SchemaVersion {
    pub fn from_u16(version: u16) -> Option<SchemaVersion> {
        match version {
            2 => Some(SchemaVersion::V2),
            3 => Some(SchemaVersion::V3),
            4 => Some(SchemaVersion::V4),
            5 => Some(SchemaVersion::V5),
            6 => Some(SchemaVersion::V6),
            7 => Some(SchemaVersion::V7),
            8 => Some(SchemaVersion::V8),
            9 => Some(SchemaVersion::V9),
            10 => Some(SchemaVersion::V10),
            _ => None,
        }
    }

    pub fn number(self) -> u16 {
        match self {
            SchemaVersion::V2 => 2,
            SchemaVersion::V3 => 3,
            SchemaVersion::V4 => 4,
            SchemaVersion::V5 => 5,
            SchemaVersion::V6 => 6,
            SchemaVersion::V7 => 7,
            SchemaVersion::V8 => 8,
            SchemaVersion::V9 => 9,
            SchemaVersion::V10 => 10,
        }
    }

    pub fn layout(self) -> &'static [FieldSpec] {
        match self {
            SchemaVersion::V2 => V2,
            SchemaVersion::V3 => V3,
            SchemaVersion::V4 => V4,
            SchemaVersion::V5 => V5,
            SchemaVersion::V6 => V6,
            SchemaVersion::V7 => V7,
            SchemaVersion::V8 => V8,
            SchemaVersion::V9 => V9,
            SchemaVersion::V10 => V10,
        }
    }
}

impl Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.number())
    }
}

/// Resolves the schema version of a feed, failing for versions outside the registry.
pub fn lookup(feed_id: &FeedId) -> Result<SchemaVersion, DecodeError> {
    let version = feed_id.schema_version();
    SchemaVersion::from_u16(version).ok_or(DecodeError::UnsupportedVersion {
        feed_id: *feed_id,
        version,
    })
}
