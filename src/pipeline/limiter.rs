//! Result limiter: single consumer of matched paths that caps the number of results.

use crossbeam_channel::{Receiver, Sender};
use log::debug;
use std::io;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use super::cancel::{CancelToken, recv_or_cancel, send_or_cancel};
use crate::ConsoleEvent;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LimiterOutcome {
    /// Results forwarded to the console.
    pub emitted: usize,
    /// The limit was met and the search was cancelled.
    pub limit_reached: bool,
}

/// Forward matches as [`ConsoleEvent::Result`] until the input closes, the search is cancelled,
/// or `limit` results have been forwarded. Meeting the limit cancels every other stage.
/// `console_tx` is dropped on return.
pub fn run_limiter(
    matched_rx: Receiver<PathBuf>,
    console_tx: Sender<ConsoleEvent>,
    limit: Option<usize>,
    cancel: &CancelToken,
) -> LimiterOutcome {
    let mut outcome = LimiterOutcome::default();
    let mut count = 0_usize;
    while let Some(path) = recv_or_cancel(&matched_rx, cancel) {
        count += 1;
        if limit.is_some_and(|l| count > l) {
            outcome.limit_reached = true;
            cancel.cancel();
            break;
        }
        if !send_or_cancel(&console_tx, ConsoleEvent::Result(path), cancel) {
            break;
        }
        outcome.emitted += 1;
        if limit == Some(count) {
            debug!("limiter: limit of {} reached, cancelling search", count);
            outcome.limit_reached = true;
            cancel.cancel();
            break;
        }
    }
    drop(console_tx);
    outcome
}

pub fn spawn_limiter_thread(
    matched_rx: Receiver<PathBuf>,
    console_tx: Sender<ConsoleEvent>,
    limit: Option<usize>,
    cancel: CancelToken,
) -> io::Result<JoinHandle<LimiterOutcome>> {
    thread::Builder::new()
        .name("dcmfind-limiter".into())
        .spawn(move || run_limiter(matched_rx, console_tx, limit, &cancel))
}
