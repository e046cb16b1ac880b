//! Decoded attribute records and the decoder seam the matcher pool calls into.

mod dicom;

pub use dicom::DicomDecoder;

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::Path;

use crate::AttributeTag;

/// Read-only view over one decoded attribute group (primary dataset or file meta header).
///
/// Only `try_get_string` and `contains` are required; the typed getters parse the string form,
/// which is how DICOM stores dates and integer strings anyway.
pub trait AttributeRecord {
    /// First value of the attribute as text, with DICOM padding removed.
    fn try_get_string(&self, tag: AttributeTag) -> Option<String>;

    /// True if the attribute is present, even when empty.
    fn contains(&self, tag: AttributeTag) -> bool;

    fn try_get_integer(&self, tag: AttributeTag) -> Option<i64> {
        self.try_get_string(tag)?.trim().parse().ok()
    }

    /// `DA` values and the date part of `DT` values.
    fn try_get_date(&self, tag: AttributeTag) -> Option<NaiveDate> {
        let value = self.try_get_string(tag)?;
        let digits = value.trim().get(..8)?;
        parse_strict_date(digits)
    }
}

/// Parse exactly eight ASCII digits as `yyyyMMdd`.
pub fn parse_strict_date(text: &str) -> Option<NaiveDate> {
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y%m%d").ok()
}

/// Strip DICOM value padding and keep the first of a multi-valued attribute.
pub(crate) fn first_value(raw: &str) -> String {
    raw.split('\\')
        .next()
        .unwrap_or_default()
        .trim_end_matches(['\0', ' '])
        .to_string()
}

/// In-memory tag -> text record. Used for the file meta group and by library callers that
/// already hold decoded values.
#[derive(Clone, Debug, Default)]
pub struct AttributeMap {
    values: BTreeMap<AttributeTag, String>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: AttributeTag, value: impl Into<String>) -> &mut Self {
        self.values.insert(tag, value.into());
        self
    }

    pub fn with(mut self, tag: AttributeTag, value: impl Into<String>) -> Self {
        self.insert(tag, value);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl AttributeRecord for AttributeMap {
    fn try_get_string(&self, tag: AttributeTag) -> Option<String> {
        self.values.get(&tag).map(|v| first_value(v))
    }

    fn contains(&self, tag: AttributeTag) -> bool {
        self.values.contains_key(&tag)
    }
}

/// Outcome of a successful decode attempt.
pub enum Decoded {
    /// Zero, one, or two records (primary dataset first, then file meta).
    Records(Vec<Box<dyn AttributeRecord>>),
    /// Readable, but not a file of this format.
    NotThisFormat,
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt file {path}: {msg}")]
    Corrupt { path: String, msg: String },
}

/// Turns a candidate path into attribute records. Shared by every matcher worker.
pub trait RecordDecoder: Send + Sync {
    fn open(&self, path: &Path) -> Result<Decoded, DecodeError>;
}
