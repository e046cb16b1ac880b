//! Pipeline context and tuning: shared data passed into each stage and queue sizing.

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use std::path::PathBuf;
use std::thread::JoinHandle;
use std::time::SystemTime;

use super::cancel::CancelToken;
use super::matcher::MatchStats;
use crate::engine::tools::GlobPattern;
use crate::utils::config::QUEUE_SLOTS_PER_WORKER;
use crate::{ConsoleEvent, SearchRequest};

/// Queue capacities derived from the worker count.
#[derive(Clone, Debug)]
pub struct PipelineTuning {
    pub num_threads: usize,
    /// Capacity of the candidate path queue (walk -> matchers).
    pub path_cap: usize,
    /// Capacity of the console event queue (matchers/limiter -> reporter).
    pub console_cap: usize,
}

impl PipelineTuning {
    pub fn for_parallelism(parallelism: usize) -> Self {
        let num_threads = parallelism.max(1);
        let cap = num_threads.saturating_mul(QUEUE_SLOTS_PER_WORKER);
        Self {
            num_threads,
            path_cap: cap,
            console_cap: cap,
        }
    }
}

/// Shared context for the walk thread.
pub struct WalkContext {
    pub root: PathBuf,
    pub pattern: GlobPattern,
    pub recursive: bool,
    pub follow_links: bool,
    /// Files created at or after this instant are ignored.
    pub started_at: SystemTime,
    pub cancel: CancelToken,
}

impl WalkContext {
    pub fn new(request: &SearchRequest, cancel: &CancelToken) -> Self {
        Self {
            root: request.root.clone(),
            pattern: GlobPattern::new(&request.file_pattern),
            recursive: request.recursive,
            follow_links: request.follow_links,
            started_at: SystemTime::now(),
            cancel: cancel.clone(),
        }
    }
}

/// What the walk thread reports when it finishes.
#[derive(Clone, Copy, Debug, Default)]
pub struct WalkStats {
    pub candidates: usize,
    pub skipped: usize,
}

/// Handles returned by [`run_pipeline`](super::run_pipeline): the caller drains `console_rx`
/// and then joins the threads with [`shutdown_pipeline_handles`](super::shutdown_pipeline_handles).
pub struct PipelineHandles {
    pub console_rx: Receiver<ConsoleEvent>,
    pub walk_handle: JoinHandle<WalkStats>,
    pub supervisor_handle: JoinHandle<MatchStats>,
    pub limiter_handle: JoinHandle<super::LimiterOutcome>,
    pub cancel: CancelToken,
}

/// All queues of one search. Each stage takes the ends it owns.
pub struct PipelineChannels {
    pub path_tx: Sender<PathBuf>,
    pub path_rx: Receiver<PathBuf>,
    pub matched_tx: Sender<PathBuf>,
    pub matched_rx: Receiver<PathBuf>,
    pub console_tx: Sender<ConsoleEvent>,
    pub console_rx: Receiver<ConsoleEvent>,
}

pub fn create_pipeline_channels(tuning: &PipelineTuning) -> PipelineChannels {
    let (path_tx, path_rx) = bounded::<PathBuf>(tuning.path_cap);
    let (matched_tx, matched_rx) = unbounded::<PathBuf>();
    let (console_tx, console_rx) = bounded::<ConsoleEvent>(tuning.console_cap);
    PipelineChannels {
        path_tx,
        path_rx,
        matched_tx,
        matched_rx,
        console_tx,
        console_rx,
    }
}
