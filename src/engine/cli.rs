//! CLI command handler: validate everything up front, then run the search pipeline.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::io::IsTerminal;
use std::sync::Arc;

use crate::engine::arg_parser::Cli;
use crate::engine::console::{ConsoleWriter, terminal_width};
use crate::engine::tools::canonicalize_root;
use crate::pipeline::CancelToken;
use crate::utils::{
    DcmfindToml, MAX_PARALLELISM, apply_file_to_request, load_dcmfind_toml, setup_logging,
};
use crate::{DicomDecoder, SearchRequest, search};

/// Build the request: defaults, then `.dcmfind.toml`, then CLI flags. Progress is off unless
/// requested, and only shown when `interactive` (stdout is a terminal).
pub fn build_request(
    cli: &Cli,
    file: Option<&DcmfindToml>,
    interactive: bool,
) -> Result<SearchRequest> {
    let root = canonicalize_root(&cli.directory)?;
    let mut request = SearchRequest {
        root,
        ..SearchRequest::default()
    };
    if let Some(file) = file {
        apply_file_to_request(file, &mut request);
    }
    if let Some(pattern) = &cli.file_pattern {
        request.file_pattern = pattern.clone();
    }
    if let Some(recursive) = cli.recursive {
        request.recursive = recursive;
    }
    if let Some(follow_links) = cli.follow_links {
        request.follow_links = follow_links;
    }
    if let Some(limit) = cli.limit {
        request.limit = Some(usize::try_from(limit).unwrap_or(usize::MAX));
    }
    if let Some(parallelism) = cli.parallelism {
        request.parallelism = parallelism as usize;
    }
    if let Some(progress) = cli.progress {
        request.show_progress = progress;
    }
    request.show_progress &= interactive;
    request.queries = cli.query.clone();

    validate_request(&request)?;
    Ok(request)
}

/// Checks that cannot be expressed as clap value parsers.
pub fn validate_request(request: &SearchRequest) -> Result<()> {
    if request.file_pattern.trim().is_empty() {
        anyhow::bail!("File pattern is empty");
    }
    if request.parallelism == 0 || request.parallelism > MAX_PARALLELISM {
        anyhow::bail!(
            "Parallelism must be between 1 and {}, got {}",
            MAX_PARALLELISM,
            request.parallelism
        );
    }
    if request.limit == Some(0) {
        anyhow::bail!("Limit must be at least 1");
    }
    Ok(())
}

/// Validate, then search and stream results to stdout. Ctrl+C cancels the search cleanly.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let root = canonicalize_root(&cli.directory)?;
    let (file, file_err) = match load_dcmfind_toml(&root) {
        Ok(file) => (file, None),
        Err(e) => (None, Some(e)),
    };
    let verbose = cli
        .verbose
        .or_else(|| file.as_ref().and_then(|f| f.settings.verbose))
        .unwrap_or(false);
    setup_logging(verbose);
    if let Some(e) = file_err {
        warn!("Ignoring settings file: {:#}", e);
    }

    let interactive = std::io::stdout().is_terminal();
    let request = build_request(cli, file.as_ref(), interactive)?;
    for q in &request.queries {
        debug!("query: {}", q);
    }

    let cancel = CancelToken::new();
    let cancel_handler = cancel.clone();
    ctrlc::set_handler(move || cancel_handler.cancel()).context("set Ctrl+C handler")?;

    let width = interactive.then(terminal_width).flatten();
    let mut writer = ConsoleWriter::new(std::io::stdout().lock(), width, interactive);
    let summary = search(&request, Arc::new(DicomDecoder::new()), &cancel, &mut writer)?;
    debug!(
        "{} of {} candidates decoded, {} matched, {} shown",
        summary.decoded, summary.candidates, summary.matched, summary.emitted
    );
    Ok(())
}
