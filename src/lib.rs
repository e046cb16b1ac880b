//! dcmfind: find DICOM files by metadata.
//!
//! A walk thread feeds candidate paths to a pool of matcher threads; each decodes its file and
//! evaluates every [`Query`]. Matches go through a limiter to a single console reporter.

pub mod engine;
pub mod pipeline;
pub mod query;
pub mod record;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use query::{Query, QueryError};
pub use record::{AttributeMap, AttributeRecord, DicomDecoder, RecordDecoder};

use anyhow::Context;
use log::debug;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use engine::console::{ConsoleWriter, run_reporter};
use pipeline::CancelToken;

/// Result alias used by public dcmfind API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Run one search and render its events through `writer`.
///
/// Returns once every stage has shut down. A closed output (e.g. piping into `head`) ends the
/// search early without an error.
pub fn search<W: Write>(
    request: &SearchRequest,
    decoder: Arc<dyn RecordDecoder>,
    cancel: &CancelToken,
    writer: &mut ConsoleWriter<W>,
) -> Result<SearchSummary> {
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        request
    );
    let handles = pipeline::run_pipeline(request, decoder, cancel)?;
    let reported = run_reporter(&handles.console_rx, writer, cancel);
    if reported.is_err() {
        cancel.cancel();
    }
    let summary = pipeline::shutdown_pipeline_handles(handles)?;
    match reported {
        Ok(_) => Ok(summary),
        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(summary),
        Err(e) => Err(e).context("write results"),
    }
}

/// Run one search without a console and return the matching paths (in arrival order).
pub fn find_paths(
    request: &SearchRequest,
    decoder: Arc<dyn RecordDecoder>,
) -> Result<(Vec<PathBuf>, SearchSummary)> {
    let request = SearchRequest {
        show_progress: false,
        ..request.clone()
    };
    let cancel = CancelToken::new();
    let handles = pipeline::run_pipeline(&request, decoder, &cancel)?;
    let paths: Vec<PathBuf> = handles
        .console_rx
        .iter()
        .filter_map(|event| match event {
            ConsoleEvent::Result(p) => Some(p),
            ConsoleEvent::Progress(_) => None,
        })
        .collect();
    let summary = pipeline::shutdown_pipeline_handles(handles)?;
    Ok((paths, summary))
}
