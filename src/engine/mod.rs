//! Engine module: command line, console rendering and path helpers

pub mod arg_parser;
pub mod cli;
pub mod console;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::{build_request, handle_run, validate_request};
pub use console::{ConsoleWriter, run_reporter};
pub use tools::{GlobPattern, glob_match, should_include_in_walk};
