use crossbeam_channel::{Receiver, Sender};
use log::{debug, warn};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use super::cancel::{CancelToken, recv_or_cancel, send_or_cancel};
use crate::ConsoleEvent;
use crate::query::{Query, matches_all};
use crate::record::{Decoded, RecordDecoder};

/// Counters shared by all matcher workers.
#[derive(Debug, Default)]
pub struct MatchCounters {
    pub decode_attempts: AtomicUsize,
    pub decoded: AtomicUsize,
    pub matched: AtomicUsize,
}

/// Snapshot of [`MatchCounters`] returned by the supervisor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub decode_attempts: usize,
    pub decoded: usize,
    pub matched: usize,
}

impl MatchCounters {
    fn snapshot(&self) -> MatchStats {
        MatchStats {
            decode_attempts: self.decode_attempts.load(Ordering::Relaxed),
            decoded: self.decoded.load(Ordering::Relaxed),
            matched: self.matched.load(Ordering::Relaxed),
        }
    }
}

/// Everything a worker needs besides its queue ends.
#[derive(Clone)]
pub struct MatcherShared {
    pub queries: Arc<[Query]>,
    pub decoder: Arc<dyn RecordDecoder>,
    pub cancel: CancelToken,
    pub counters: Arc<MatchCounters>,
}

/// Single matcher worker: read paths from path_rx, decode, evaluate queries, send matches on
/// matched_tx. Progress events are offered without blocking and dropped when the console is behind.
fn matcher_worker_loop(
    path_rx: Receiver<PathBuf>,
    matched_tx: Sender<PathBuf>,
    progress_tx: Option<Sender<ConsoleEvent>>,
    shared: MatcherShared,
) {
    while let Some(path) = recv_or_cancel(&path_rx, &shared.cancel) {
        if let Some(tx) = &progress_tx {
            let _ = tx.try_send(ConsoleEvent::Progress(path.clone()));
        }
        shared
            .counters
            .decode_attempts
            .fetch_add(1, Ordering::Relaxed);
        let records = match shared.decoder.open(&path) {
            Ok(Decoded::Records(records)) if !records.is_empty() => records,
            Ok(_) => continue,
            Err(e) => {
                debug!("matcher: {}", e);
                continue;
            }
        };
        shared.counters.decoded.fetch_add(1, Ordering::Relaxed);
        if !matches_all(&shared.queries, &records) {
            continue;
        }
        shared.counters.matched.fetch_add(1, Ordering::Relaxed);
        if !send_or_cancel(&matched_tx, path, &shared.cancel) {
            break;
        }
    }
}

/// Spawn `num_threads` workers plus a supervisor that joins them all and only then drops the
/// last `matched_tx`, closing the matched-results queue. Returns the supervisor handle.
///
/// On a spawn error the workers already running are left to the caller, which cancels them.
pub fn spawn_matcher_pool(
    path_rx: Receiver<PathBuf>,
    matched_tx: Sender<PathBuf>,
    progress_tx: Option<Sender<ConsoleEvent>>,
    shared: MatcherShared,
    num_threads: usize,
) -> io::Result<JoinHandle<MatchStats>> {
    let workers = (0..num_threads)
        .map(|i| {
            let path_rx = path_rx.clone();
            let matched_tx = matched_tx.clone();
            let progress_tx = progress_tx.clone();
            let shared = shared.clone();
            thread::Builder::new()
                .name(format!("dcmfind-matcher-{i}"))
                .spawn(move || matcher_worker_loop(path_rx, matched_tx, progress_tx, shared))
        })
        .collect::<io::Result<Vec<JoinHandle<()>>>>()?;
    drop(path_rx);
    drop(progress_tx);

    thread::Builder::new()
        .name("dcmfind-supervisor".into())
        .spawn(move || {
            for (i, h) in workers.into_iter().enumerate() {
                if h.join().is_err() {
                    warn!("matcher worker {} panicked", i);
                }
            }
            drop(matched_tx);
            let stats = shared.counters.snapshot();
            debug!(
                "matchers: done, {} decode attempts, {} decoded, {} matched",
                stats.decode_attempts, stats.decoded, stats.matched
            );
            stats
        })
}
