use anyhow::{Context, Result};
use log::debug;
use std::sync::Arc;

use super::cancel::CancelToken;
use super::context::{PipelineHandles, PipelineTuning, WalkContext, create_pipeline_channels};
use super::limiter::spawn_limiter_thread;
use super::matcher::{MatchCounters, MatcherShared, spawn_matcher_pool};
use super::walk::spawn_walk_thread;
use crate::record::RecordDecoder;
use crate::{SearchRequest, SearchSummary};

/// Start walk -> matchers -> limiter. The caller drains `console_rx` (it closes once the limiter
/// and every matcher are done) and then calls [`shutdown_pipeline_handles`].
///
/// If a thread cannot be spawned the search is cancelled, so every stage already started exits
/// on its own.
pub fn run_pipeline(
    request: &SearchRequest,
    decoder: Arc<dyn RecordDecoder>,
    cancel: &CancelToken,
) -> Result<PipelineHandles> {
    start_stages(request, decoder, cancel).inspect_err(|_| cancel.cancel())
}

fn start_stages(
    request: &SearchRequest,
    decoder: Arc<dyn RecordDecoder>,
    cancel: &CancelToken,
) -> Result<PipelineHandles> {
    let tuning = PipelineTuning::for_parallelism(request.parallelism);
    debug!("{:?}", tuning);
    let channels = create_pipeline_channels(&tuning);

    let walk_handle = spawn_walk_thread(channels.path_tx, WalkContext::new(request, cancel))
        .context("spawn walk thread")?;

    let shared = MatcherShared {
        queries: request.queries.clone().into(),
        decoder,
        cancel: cancel.clone(),
        counters: Arc::new(MatchCounters::default()),
    };
    let progress_tx = request.show_progress.then(|| channels.console_tx.clone());
    let supervisor_handle = spawn_matcher_pool(
        channels.path_rx,
        channels.matched_tx,
        progress_tx,
        shared,
        tuning.num_threads,
    )
    .context("spawn matcher threads")?;

    let limiter_handle = spawn_limiter_thread(
        channels.matched_rx,
        channels.console_tx,
        request.limit,
        cancel.clone(),
    )
    .context("spawn limiter thread")?;

    Ok(PipelineHandles {
        console_rx: channels.console_rx,
        walk_handle,
        supervisor_handle,
        limiter_handle,
        cancel: cancel.clone(),
    })
}

/// Join every stage after the console queue has been drained and collect their counters.
pub fn shutdown_pipeline_handles(handles: PipelineHandles) -> Result<SearchSummary> {
    let PipelineHandles {
        console_rx,
        walk_handle,
        supervisor_handle,
        limiter_handle,
        cancel,
    } = handles;
    // Unblocks any stage still waiting on a full console queue.
    drop(console_rx);

    let limiter = limiter_handle
        .join()
        .map_err(|_| anyhow::anyhow!("limiter thread panicked"))?;
    // Matchers and the walk may still be blocked on queues nobody reads any more.
    cancel.cancel();
    let matchers = supervisor_handle
        .join()
        .map_err(|_| anyhow::anyhow!("matcher supervisor panicked"))?;
    let walk = walk_handle
        .join()
        .map_err(|_| anyhow::anyhow!("walk thread panicked"))?;

    let summary = SearchSummary {
        candidates: walk.candidates,
        skipped: walk.skipped,
        decode_attempts: matchers.decode_attempts,
        decoded: matchers.decoded,
        matched: matchers.matched,
        emitted: limiter.emitted,
        limit_reached: limiter.limit_reached,
    };
    debug!("{:?}", summary);
    Ok(summary)
}
