//! Query predicates over decoded attribute records.
//!
//! A query is `Tag`, `Tag<op>Value` with op one of `<= >= != = < >`, where the tag is a keyword
//! (`AccessionNumber`) or a numeric pair (`(0008,0050)`). A bare tag tests for presence.

pub mod parser;
pub mod tags;

pub use parser::{OPERATORS, QueryError, compile, find_operator};
pub use tags::TagDictionary;

use chrono::NaiveDate;
use dicom_dictionary_std::StandardDataDictionary;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::AttributeTag;
use crate::record::{AttributeRecord, parse_strict_date};

/// Right-hand side of `<`, `<=`, `>`, `>=`, typed once at compile time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    Date(NaiveDate),
    Integer(i64),
    Text(String),
}

impl Operand {
    /// Strict `yyyyMMdd` date first, then integer, then plain text.
    pub fn from_text(value: &str) -> Self {
        if let Some(date) = parse_strict_date(value) {
            Operand::Date(date)
        } else if let Ok(n) = value.parse::<i64>() {
            Operand::Integer(n)
        } else {
            Operand::Text(value.to_string())
        }
    }

    /// How the record's value orders against this operand. `None` if the attribute is missing
    /// or cannot be read as the operand's type.
    fn compare(&self, record: &dyn AttributeRecord, tag: AttributeTag) -> Option<Ordering> {
        match self {
            Operand::Date(d) => record.try_get_date(tag).map(|v| v.cmp(d)),
            Operand::Integer(n) => record.try_get_integer(tag).map(|v| v.cmp(n)),
            Operand::Text(s) => record
                .try_get_string(tag)
                .map(|v| v.as_bytes().cmp(s.as_bytes())),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Date(d) => write!(f, "{}", d.format("%Y%m%d")),
            Operand::Integer(n) => write!(f, "{n}"),
            Operand::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Clone, Debug)]
pub enum Query {
    /// Case-insensitive, `%` wildcard, whole-value match. Missing attribute never matches.
    Equals {
        tag: AttributeTag,
        value: String,
        pattern: Regex,
    },
    /// Exact negation of [`Query::Equals`]; a missing attribute matches.
    NotEquals {
        tag: AttributeTag,
        value: String,
        pattern: Regex,
    },
    LowerThan {
        tag: AttributeTag,
        operand: Operand,
        inclusive: bool,
    },
    GreaterThan {
        tag: AttributeTag,
        operand: Operand,
        inclusive: bool,
    },
    /// Attribute is present.
    ContainsTag { tag: AttributeTag },
}

impl Query {
    pub fn tag(&self) -> AttributeTag {
        match self {
            Query::Equals { tag, .. }
            | Query::NotEquals { tag, .. }
            | Query::LowerThan { tag, .. }
            | Query::GreaterThan { tag, .. }
            | Query::ContainsTag { tag } => *tag,
        }
    }

    pub fn matches(&self, record: &dyn AttributeRecord) -> bool {
        match self {
            Query::Equals { tag, pattern, .. } => wildcard_match(record, *tag, pattern),
            Query::NotEquals { tag, pattern, .. } => !wildcard_match(record, *tag, pattern),
            Query::LowerThan {
                tag,
                operand,
                inclusive,
            } => match operand.compare(record, *tag) {
                Some(Ordering::Less) => true,
                Some(Ordering::Equal) => *inclusive,
                _ => false,
            },
            Query::GreaterThan {
                tag,
                operand,
                inclusive,
            } => match operand.compare(record, *tag) {
                Some(Ordering::Greater) => true,
                Some(Ordering::Equal) => *inclusive,
                _ => false,
            },
            Query::ContainsTag { tag } => record.contains(*tag),
        }
    }

    /// True if this query holds for any of `records`.
    pub fn matches_any(&self, records: &[Box<dyn AttributeRecord>]) -> bool {
        records.iter().any(|r| self.matches(r.as_ref()))
    }
}

fn wildcard_match(record: &dyn AttributeRecord, tag: AttributeTag, pattern: &Regex) -> bool {
    record
        .try_get_string(tag)
        .is_some_and(|v| pattern.is_match(&v))
}

/// Every query holds for at least one of `records` (AND across queries, OR across records).
/// A file with no records never matches.
pub fn matches_all(queries: &[Query], records: &[Box<dyn AttributeRecord>]) -> bool {
    !records.is_empty() && queries.iter().all(|q| q.matches_any(records))
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Equals { tag, value, .. } => write!(f, "{tag} = {value}"),
            Query::NotEquals { tag, value, .. } => write!(f, "{tag} != {value}"),
            Query::LowerThan {
                tag,
                operand,
                inclusive,
            } => write!(f, "{tag} {} {operand}", if *inclusive { "<=" } else { "<" }),
            Query::GreaterThan {
                tag,
                operand,
                inclusive,
            } => write!(f, "{tag} {} {operand}", if *inclusive { ">=" } else { ">" }),
            Query::ContainsTag { tag } => write!(f, "{tag} present"),
        }
    }
}

impl FromStr for Query {
    type Err = QueryError;

    /// Compile against the standard DICOM data dictionary.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        compile(s, &StandardDataDictionary)
    }
}
