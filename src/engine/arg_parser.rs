use clap::Parser;
use std::path::PathBuf;

use crate::query::Query;
use crate::utils::config::MAX_PARALLELISM;

struct DefaultArgs;

impl DefaultArgs {
    pub const DIR: &'static str = ".";
}

/// Find DICOM files by metadata.
#[derive(Clone, Parser)]
#[command(name = "dcmfind")]
#[command(
    about = "Search a directory for DICOM files whose metadata matches every --query.",
    after_help = "Query syntax: TAG, or TAG<op>VALUE with op one of <= >= != = < >.\n\
                  TAG is a keyword (AccessionNumber) or a pair ((0008,0050)).\n\
                  = and != are case-insensitive and treat % as a wildcard."
)]
pub struct Cli {
    /// Search for DICOM files in this directory. Default: current directory.
    #[arg(long, short = 'd', value_name = "DIR", default_value = DefaultArgs::DIR)]
    pub directory: PathBuf,

    /// Only consider files whose name matches this pattern (* and ?, case-insensitive). Default: *
    #[arg(long, short = 'f', value_name = "GLOB")]
    pub file_pattern: Option<String>,

    /// Search recursively in nested directories. Default: true.
    #[arg(long, short = 'r', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub recursive: Option<bool>,

    /// Follow symbolic links.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// Stop after this many results.
    #[arg(long, short = 'l', value_parser = clap::value_parser!(u64).range(1..))]
    pub limit: Option<u64>,

    /// Query to apply. Repeat to require several (all must match).
    #[arg(long, short = 'q', value_name = "QUERY", value_parser = parse_query)]
    pub query: Vec<Query>,

    /// Number of files decoded in parallel (1-256). Default: 8.
    #[arg(long, short = 'p', value_parser = clap::value_parser!(u32).range(1..=MAX_PARALLELISM as i64))]
    pub parallelism: Option<u32>,

    /// Show the file currently being examined. Default: false. Ignored when stdout is not a terminal.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub progress: Option<bool>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}

fn parse_query(s: &str) -> Result<Query, crate::query::QueryError> {
    s.parse()
}
