//! File enumerator: walks the root and feeds candidate paths to the matcher pool.

use crossbeam_channel::Sender;
use log::debug;
use std::io;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use super::cancel::send_or_cancel;
use super::context::{WalkContext, WalkStats};
use crate::engine::tools::should_include_in_walk;

/// One result from a directory walk: either a file to consider or an error with optional path.
pub enum WalkOutcome {
    Ok(PathBuf),
    Err { msg: String, path: Option<PathBuf> },
}

/// Convert a walkdir result into [`WalkOutcome`]. Directories and other non-files yield `None`.
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> Option<WalkOutcome> {
    match r {
        Ok(entry) if entry.file_type().is_file() => Some(WalkOutcome::Ok(entry.into_path())),
        Ok(_) => None,
        Err(err) => Some(WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        }),
    }
}

fn walkdir_iter(ctx: &WalkContext) -> Box<dyn Iterator<Item = WalkOutcome>> {
    use walkdir::WalkDir;
    let mut walker = WalkDir::new(&ctx.root)
        .min_depth(1)
        .follow_links(ctx.follow_links);
    if !ctx.recursive {
        walker = walker.max_depth(1);
    }
    Box::new(walker.into_iter().filter_map(to_outcome_walkdir))
}

pub fn spawn_walk_thread(
    path_tx: Sender<PathBuf>,
    ctx: WalkContext,
) -> io::Result<JoinHandle<WalkStats>> {
    thread::Builder::new()
        .name("dcmfind-walk".into())
        .spawn(move || {
            let iter = walkdir_iter(&ctx);
            run_walk_loop(path_tx, &ctx, iter)
        })
}

/// Run the common walk loop: consume `iter` of [`WalkOutcome`], filter with `should_include_in_walk`,
/// send included paths to `path_tx`. Errors are logged and counted, never fatal.
/// Stops early on cancellation or when the matchers are gone. `path_tx` is dropped on every exit
/// path, which closes the candidate queue.
pub fn run_walk_loop<I>(path_tx: Sender<PathBuf>, ctx: &WalkContext, iter: I) -> WalkStats
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut stats = WalkStats::default();
    for outcome in iter {
        if ctx.cancel.is_cancelled() {
            debug!("walk: cancelled");
            break;
        }
        match outcome {
            WalkOutcome::Ok(path) => {
                if !should_include_in_walk(&path, &ctx.pattern, ctx.started_at) {
                    continue;
                }
                if !send_or_cancel(&path_tx, path, &ctx.cancel) {
                    break;
                }
                stats.candidates += 1;
            }
            WalkOutcome::Err { msg, path } => {
                match path {
                    Some(p) => debug!("walk: skipping {}: {}", p.display(), msg),
                    None => debug!("walk: skipping entry: {}", msg),
                }
                stats.skipped += 1;
            }
        }
    }
    drop(path_tx);
    debug!(
        "walk: done, {} candidates, {} skipped",
        stats.candidates, stats.skipped
    );
    stats
}
