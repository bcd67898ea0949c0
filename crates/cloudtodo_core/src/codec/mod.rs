//! Local cache serialization for todo items.
//!
//! # Responsibility
//! - Encode a `TodoItem` into a versioned, tagged key-value blob.
//! - Decode blobs through an explicit version dispatch table.
//!
//! # Invariants
//! - Every encoded blob carries `version = CURRENT_VERSION`.
//! - Blobs without a `version` key are read as version 1.
//! - Decoding never panics; corrupt input yields `DecodeError`.

mod v1;

use crate::model::field::{FieldMap, FieldValue, TodoField};
use crate::model::todo::{TodoItem, TodoValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Blob key holding the schema version.
pub const VERSION_KEY: &str = "version";
/// Schema version written by `encode`.
pub const CURRENT_VERSION: i64 = 1;

pub type DecodeResult<T> = Result<T, DecodeError>;

#[derive(Clone, Copy)]
struct BlobDecoder {
    version: i64,
    decode: fn(&FieldMap) -> DecodeResult<TodoItem>,
}

const DECODERS: &[BlobDecoder] = &[BlobDecoder {
    version: 1,
    decode: v1::decode_fields,
}];

/// Error for local cache blobs that cannot be rehydrated.
#[derive(Debug)]
pub enum DecodeError {
    /// Bytes are not a tagged field container.
    MalformedBlob(serde_json::Error),
    MissingField(&'static str),
    WrongType {
        key: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    UnsupportedVersion(i64),
    InvalidPriority(i64),
    InvalidId(TodoValidationError),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedBlob(err) => write!(f, "malformed todo blob: {err}"),
            Self::MissingField(key) => write!(f, "todo blob is missing `{key}`"),
            Self::WrongType {
                key,
                expected,
                found,
            } => write!(f, "todo blob field `{key}` expects {expected}, got {found}"),
            Self::UnsupportedVersion(version) => write!(
                f,
                "todo blob version {version} is not supported (latest {})",
                latest_version()
            ),
            Self::InvalidPriority(value) => {
                write!(f, "todo blob has invalid priority ordinal {value}")
            }
            Self::InvalidId(err) => write!(f, "todo blob has invalid id: {err}"),
        }
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MalformedBlob(err) => Some(err),
            Self::InvalidId(err) => Some(err),
            _ => None,
        }
    }
}

/// Error for items that cannot be written as a blob.
#[derive(Debug)]
pub struct EncodeError(serde_json::Error);

impl Display for EncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to encode todo blob: {}", self.0)
    }
}

impl Error for EncodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

/// Returns the newest blob version this build can decode.
pub fn latest_version() -> i64 {
    DECODERS.last().map_or(0, |decoder| decoder.version)
}

impl TodoItem {
    /// Returns all fields keyed by local key, without the version tag.
    pub fn to_field_map(&self) -> FieldMap {
        TodoField::ALL
            .into_iter()
            .map(|field| (field.local_key().to_string(), self.local_value(field)))
            .collect()
    }

    /// Rebuilds an item from a tagged field container.
    ///
    /// The container's `version` entry selects the decoder.
    pub fn from_field_map(fields: &FieldMap) -> DecodeResult<Self> {
        let version = match fields.get(VERSION_KEY) {
            None => 1,
            Some(FieldValue::Integer(version)) => *version,
            Some(other) => {
                return Err(DecodeError::WrongType {
                    key: VERSION_KEY,
                    expected: "integer",
                    found: other.type_name(),
                });
            }
        };

        let decoder = DECODERS
            .iter()
            .find(|decoder| decoder.version == version)
            .ok_or(DecodeError::UnsupportedVersion(version))?;
        (decoder.decode)(fields)
    }

    /// Serializes this item for the local cache.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let mut fields = self.to_field_map();
        fields.insert(
            VERSION_KEY.to_string(),
            FieldValue::Integer(CURRENT_VERSION),
        );
        serde_json::to_vec(&fields).map_err(EncodeError)
    }

    /// Rehydrates an item from a local cache blob.
    pub fn decode(bytes: &[u8]) -> DecodeResult<Self> {
        let fields: FieldMap =
            serde_json::from_slice(bytes).map_err(DecodeError::MalformedBlob)?;
        Self::from_field_map(&fields)
    }
}
