//! Tag resolution against a data dictionary.

use dicom_core::dictionary::{DataDictionary, DataDictionaryEntry};
use dicom_dictionary_std::StandardDataDictionary;

use crate::AttributeTag;

/// Resolves tag text into an [`AttributeTag`]. Returns `None` on any failure.
pub trait TagDictionary {
    /// Exact, case-sensitive keyword lookup (e.g. `AccessionNumber`).
    fn resolve_by_name(&self, name: &str) -> Option<AttributeTag>;

    /// Numeric form: `(GGGG,EEEE)`, `GGGG,EEEE` or `GGGGEEEE`, hexadecimal.
    fn parse_numeric(&self, text: &str) -> Option<AttributeTag>;

    /// Numeric form when `text` starts with `(` or a digit, keyword otherwise.
    fn resolve(&self, text: &str) -> Option<AttributeTag> {
        match text.chars().next() {
            None => None,
            Some(c) if c == '(' || c.is_ascii_digit() => self.parse_numeric(text),
            Some(_) => self.resolve_by_name(text),
        }
    }
}

impl TagDictionary for StandardDataDictionary {
    fn resolve_by_name(&self, name: &str) -> Option<AttributeTag> {
        self.by_name(name).map(|entry| entry.tag())
    }

    fn parse_numeric(&self, text: &str) -> Option<AttributeTag> {
        text.parse::<AttributeTag>().ok()
    }
}
