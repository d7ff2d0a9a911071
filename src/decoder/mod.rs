//! # Binary Decoder
//! Turns a full report blob into typed fields following the layout from the schema registry.
//!
//! A full report is the ABI encoding of
//! `(bytes32[3] context, bytes reportBlob, bytes32[] rs, bytes32[] ss, bytes32 rawVs)`.
//! Only `reportBlob` carries report data, the rest is signature material which we don't verify.

use std::fmt::Display;

use ethers::abi::{self, ParamType, Token};
use ethers::types::{I256, U256};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::feed_id::FeedId;
use crate::schema::{self, FieldKind, FieldSpec, SchemaVersion};

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("report blob is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("malformed report: {0}")]
    Abi(#[from] abi::Error),

    #[error("unsupported schema version {version} for feed {feed_id}")]
    UnsupportedVersion { feed_id: FeedId, version: u16 },

    #[error("report belongs to feed {found}, expected {expected}")]
    FeedIdMismatch { expected: FeedId, found: FeedId },

    #[error("unexpected value {found} for field {field}")]
    UnexpectedToken { field: &'static str, found: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    FeedId(FeedId),
    Uint(U256),
    Int(I256),
    Record(Vec<Field>),
}

impl FieldValue {
    /// Numeric view of the value, unsigned integers are reinterpreted as non-negative.
    pub fn as_i256(&self) -> Option<I256> {
        match self {
            FieldValue::Int(value) => Some(*value),
            FieldValue::Uint(value) => I256::try_from(*value).ok(),
            _ => None,
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        match self {
            FieldValue::Record(fields) => fields.iter().find(|f| f.name == name).map(|f| &f.value),
            _ => None,
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::FeedId(feed_id) => write!(f, "{}", feed_id),
            FieldValue::Uint(value) => write!(f, "{}", value),
            FieldValue::Int(value) => write!(f, "{}", value),
            FieldValue::Record(fields) => {
                write!(f, "{{ ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", field.name, field.value)?;
                }
                write!(f, " }}")
            }
        }
    }
}

// Big integers go out as decimal strings, JSON numbers can't hold 192 bits.
impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::FeedId(feed_id) => feed_id.serialize(serializer),
            FieldValue::Uint(value) => serializer.collect_str(value),
            FieldValue::Int(value) => serializer.collect_str(value),
            FieldValue::Record(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for field in fields {
                    map.serialize_entry(field.name, &field.value)?;
                }
                map.end()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub value: FieldValue,
}

/// Decoded report payload. Field order follows the schema layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedReport {
    pub version: SchemaVersion,
    pub fields: Vec<Field>,
}

impl DecodedReport {
    /// Looks up a field by dotted path, e.g. `payload.benchmarkPrice` descends into the
    /// `payload` record.
    pub fn get(&self, path: &str) -> Option<&FieldValue> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut value = self
            .fields
            .iter()
            .find(|f| f.name == first)
            .map(|f| &f.value)?;
        for segment in segments {
            value = value.get(segment)?;
        }
        Some(value)
    }
}

impl Serialize for DecodedReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry("version", &self.version.number())?;
        for field in &self.fields {
            map.serialize_entry(field.name, &field.value)?;
        }
        map.end()
    }
}

fn envelope_params() -> Vec<ParamType> {
    vec![
        ParamType::FixedArray(Box::new(ParamType::FixedBytes(32)), 3),
        ParamType::Bytes,
        ParamType::Array(Box::new(ParamType::FixedBytes(32))),
        ParamType::Array(Box::new(ParamType::FixedBytes(32))),
        ParamType::FixedBytes(32),
    ]
}

fn param_type(kind: &FieldKind) -> ParamType {
    match kind {
        FieldKind::FeedId => ParamType::FixedBytes(32),
        FieldKind::Uint(bits) => ParamType::Uint(*bits),
        FieldKind::Int(bits) => ParamType::Int(*bits),
        FieldKind::Tuple(fields) => {
            ParamType::Tuple(fields.iter().map(|f| param_type(&f.kind)).collect())
        }
    }
}

fn field_value(spec: &FieldSpec, token: Token) -> Result<FieldValue, DecodeError> {
    match (&spec.kind, token) {
        (FieldKind::FeedId, Token::FixedBytes(bytes)) => {
            let bytes: [u8; 32] = bytes.try_into().map_err(|bytes: Vec<u8>| {
                DecodeError::UnexpectedToken {
                    field: spec.name,
                    found: format!("{} byte feed id", bytes.len()),
                }
            })?;
            Ok(FieldValue::FeedId(FeedId(bytes)))
        }
        (FieldKind::Uint(_), Token::Uint(value)) => Ok(FieldValue::Uint(value)),
        // Signed words come back sign-extended to 256 bits.
        (FieldKind::Int(_), Token::Int(value)) => Ok(FieldValue::Int(I256::from_raw(value))),
        (FieldKind::Tuple(fields), Token::Tuple(tokens)) => {
            Ok(FieldValue::Record(decode_fields(fields, tokens)?))
        }
        (_, token) => Err(DecodeError::UnexpectedToken {
            field: spec.name,
            found: format!("{:?}", token),
        }),
    }
}

fn decode_fields(layout: &[FieldSpec], tokens: Vec<Token>) -> Result<Vec<Field>, DecodeError> {
    layout
        .iter()
        .zip(tokens)
        .map(|(spec, token)| {
            Ok(Field {
                name: spec.name,
                value: field_value(spec, token)?,
            })
        })
        .collect()
}

/// Decodes a bare report blob against a layout.
pub fn decode_blob(blob: &[u8], layout: &[FieldSpec]) -> Result<Vec<Field>, DecodeError> {
    let params: Vec<ParamType> = layout.iter().map(|f| param_type(&f.kind)).collect();
    let tokens = abi::decode(&params, blob)?;
    decode_fields(layout, tokens)
}

/// Extracts the report blob from a full report, dropping the signature material.
fn report_blob(full_report: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let tokens = abi::decode(&envelope_params(), full_report)?;
    match tokens.into_iter().nth(1) {
        Some(Token::Bytes(blob)) => Ok(blob),
        other => Err(DecodeError::UnexpectedToken {
            field: "reportBlob",
            found: format!("{:?}", other),
        }),
    }
}

/// Decodes a hex encoded full report for the given feed.
pub fn decode(full_report: &str, feed_id: &FeedId) -> Result<DecodedReport, DecodeError> {
    let version = schema::lookup(feed_id)?;
    let bytes = hex::decode(full_report.trim().trim_start_matches("0x"))?;
    let blob = report_blob(&bytes)?;
    let fields = decode_blob(&blob, version.layout())?;

    let decoded = DecodedReport { version, fields };
    match decoded.get("feedId") {
        Some(FieldValue::FeedId(found)) if found != feed_id => Err(DecodeError::FeedIdMismatch {
            expected: *feed_id,
            found: *found,
        }),
        _ => Ok(decoded),
    }
}
