//! Query text -> [`Query`].

use regex::{Regex, RegexBuilder};

use super::tags::TagDictionary;
use super::{Operand, Query};

/// Supported operators. Order matters: on a tie at the same index the earlier entry wins,
/// so two-character operators beat their one-character prefixes.
pub const OPERATORS: [&str; 6] = ["<=", ">=", "!=", "=", "<", ">"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("query is empty")]
    Empty,
    #[error(
        "query '{0}' is not a known tag and contains none of the supported operators: '<=', '>=', '!=', '=', '<', '>'"
    )]
    UnparsableQuery(String),
    #[error("unknown tag '{tag}' in query '{query}'")]
    UnknownTag { query: String, tag: String },
    #[error("invalid value '{value}' in query '{query}': {msg}")]
    InvalidValue {
        query: String,
        value: String,
        msg: String,
    },
}

/// Earliest operator occurrence as `(index, operator)`.
pub fn find_operator(text: &str) -> Option<(usize, &'static str)> {
    let mut best: Option<(usize, &'static str)> = None;
    for op in OPERATORS {
        if let Some(idx) = text.find(op)
            && best.is_none_or(|(best_idx, _)| idx < best_idx)
        {
            best = Some((idx, op));
        }
    }
    best
}

/// Compile one query string, resolving tags with `dictionary`.
pub fn compile<D: TagDictionary + ?Sized>(text: &str, dictionary: &D) -> Result<Query, QueryError> {
    if text.trim().is_empty() {
        return Err(QueryError::Empty);
    }

    let Some((idx, op)) = find_operator(text) else {
        let name = text.trim();
        return dictionary
            .resolve(name)
            .map(|tag| Query::ContainsTag { tag })
            .ok_or_else(|| QueryError::UnparsableQuery(text.to_string()));
    };

    let tag_text = text[..idx].trim();
    let value = text[idx + op.len()..].trim().to_string();
    let tag = dictionary
        .resolve(tag_text)
        .ok_or_else(|| QueryError::UnknownTag {
            query: text.to_string(),
            tag: tag_text.to_string(),
        })?;

    let query = match op {
        "=" => Query::Equals {
            tag,
            pattern: wildcard_pattern(text, &value)?,
            value,
        },
        "!=" => Query::NotEquals {
            tag,
            pattern: wildcard_pattern(text, &value)?,
            value,
        },
        "<" | "<=" => Query::LowerThan {
            tag,
            operand: Operand::from_text(&value),
            inclusive: op == "<=",
        },
        ">" | ">=" => Query::GreaterThan {
            tag,
            operand: Operand::from_text(&value),
            inclusive: op == ">=",
        },
        _ => return Err(QueryError::UnparsableQuery(text.to_string())),
    };
    Ok(query)
}

/// `%` matches any run of characters; everything else is literal. Anchored, case-insensitive.
fn wildcard_pattern(query: &str, value: &str) -> Result<Regex, QueryError> {
    let body = value
        .split('%')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    RegexBuilder::new(&format!("^(?:{body})$"))
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|e| QueryError::InvalidValue {
            query: query.to_string(),
            value: value.to_string(),
            msg: e.to_string(),
        })
}
