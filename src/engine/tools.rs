//! Path and filter utilities

use anyhow::{Context, Result};
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Case-insensitive file name glob. Supports `*` (any run) and `?` (one character).
#[derive(Clone, Debug)]
pub struct GlobPattern {
    chars: Vec<char>,
}

impl GlobPattern {
    pub fn new(pattern: &str) -> Self {
        Self {
            chars: fold_case(pattern),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        glob_match_chars(&self.chars, &fold_case(name))
    }

    /// True for `*`, which lets the walk skip matching entirely.
    pub fn is_match_all(&self) -> bool {
        self.chars.iter().all(|&c| c == '*') && !self.chars.is_empty()
    }
}

fn fold_case(s: &str) -> Vec<char> {
    s.chars().flat_map(char::to_lowercase).collect()
}

/// Simple glob pattern matching (supports * and ?), case-insensitive.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    GlobPattern::new(pattern).matches(text)
}

/// Greedy two-pointer match. On a mismatch only the most recent `*` is retried, one character
/// further along the text, so the cost is at most `pattern.len() * text.len()`.
fn glob_match_chars(pattern: &[char], text: &[char]) -> bool {
    let (mut p, mut t) = (0, 0);
    // (pattern index after the last `*`, text index that `*` currently extends to)
    let mut star: Option<(usize, usize)> = None;
    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                p += 1;
                star = Some((p, t));
            }
            Some(&c) if c == '?' || c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match star {
                Some((star_p, star_t)) => {
                    p = star_p;
                    t = star_t + 1;
                    star = Some((star_p, t));
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|&c| c == '*')
}

/// True if the file existed before `started_at`. Uses creation time, or modification time where
/// the platform does not report it. Unknown times are treated as old.
pub fn created_before(meta: &Metadata, started_at: SystemTime) -> bool {
    match meta.created().or_else(|_| meta.modified()) {
        Ok(t) => t < started_at,
        Err(_) => true,
    }
}

/// Returns true if the walk should hand `path` to the matcher pool.
pub fn should_include_in_walk(path: &Path, pattern: &GlobPattern, started_at: SystemTime) -> bool {
    if !pattern.is_match_all() {
        let Some(name) = path.file_name() else {
            return false;
        };
        if !pattern.matches(&name.to_string_lossy()) {
            return false;
        }
    }
    match std::fs::metadata(path) {
        Ok(meta) => meta.is_file() && created_before(&meta, started_at),
        Err(_) => false,
    }
}

/// Canonicalize the search root, failing when it does not exist or is not a directory.
pub fn canonicalize_root(path: &Path) -> Result<PathBuf> {
    let root = path
        .canonicalize()
        .with_context(|| format!("Directory {} does not exist", path.display()))?;
    if !root.is_dir() {
        anyhow::bail!("{} is not a directory", path.display());
    }
    Ok(root)
}
