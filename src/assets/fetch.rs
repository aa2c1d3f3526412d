use std::{
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc,
    },
    time::Duration,
};

use crate::{
    assets::decode::{PreparedImage, decode_image},
    foundation::error::{FrameSeqError, FrameSeqResult},
};

/// One frame retrieval issued by the frame store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    /// 0-based slot in the frame set.
    pub slot: usize,
    pub path: PathBuf,
}

#[derive(Clone, Debug)]
pub enum FetchOutcome {
    Loaded(PreparedImage),
    /// Retrieval or decode failed; the reason is kept for logs only.
    Failed(String),
}

#[derive(Clone, Debug)]
pub struct FetchCompletion {
    pub slot: usize,
    pub outcome: FetchOutcome,
}

impl FetchCompletion {
    pub fn loaded(slot: usize, image: PreparedImage) -> Self {
        Self {
            slot,
            outcome: FetchOutcome::Loaded(image),
        }
    }

    pub fn failed(slot: usize, reason: impl Into<String>) -> Self {
        Self {
            slot,
            outcome: FetchOutcome::Failed(reason.into()),
        }
    }

    fn from_result(slot: usize, result: FrameSeqResult<PreparedImage>) -> Self {
        match result {
            Ok(image) => Self::loaded(slot, image),
            Err(e) => Self::failed(slot, e.to_string()),
        }
    }
}

/// Out-of-process frame retrieval.
///
/// Completions may arrive in any order and are handed back on the caller's thread through
/// [`FrameFetcher::poll_completions`]. After [`FrameFetcher::cancel`] no further completions
/// are returned.
pub trait FrameFetcher {
    fn begin(&mut self, requests: Vec<FetchRequest>);

    /// Drain finished retrievals without blocking.
    fn poll_completions(&mut self) -> Vec<FetchCompletion>;

    /// Block up to `timeout` for at least one completion, then drain what is ready.
    fn wait_completions(&mut self, timeout: Duration) -> Vec<FetchCompletion> {
        let _ = timeout;
        self.poll_completions()
    }

    fn cancel(&mut self);
}

/// Filesystem fetcher: reads and decodes each frame on the rayon pool.
pub struct FsFetcher {
    tx: mpsc::Sender<FetchCompletion>,
    rx: Option<mpsc::Receiver<FetchCompletion>>,
    cancelled: Arc<AtomicBool>,
    in_flight: usize,
}

impl Default for FsFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FsFetcher {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx: Some(rx),
            cancelled: Arc::new(AtomicBool::new(false)),
            in_flight: 0,
        }
    }

    /// Requests issued but not yet drained.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    fn record_drained(&mut self, n: usize) {
        self.in_flight = self.in_flight.saturating_sub(n);
    }
}

fn read_and_decode(path: &Path) -> FrameSeqResult<PreparedImage> {
    let bytes = std::fs::read(path)
        .map_err(|e| FrameSeqError::io(format!("read frame '{}': {e}", path.display())))?;
    decode_image(&bytes)
}

impl FrameFetcher for FsFetcher {
    fn begin(&mut self, requests: Vec<FetchRequest>) {
        if self.is_cancelled() {
            return;
        }
        self.in_flight += requests.len();
        for req in requests {
            let tx = self.tx.clone();
            let cancelled = Arc::clone(&self.cancelled);
            rayon::spawn(move || {
                if cancelled.load(Ordering::Acquire) {
                    return;
                }
                let result = read_and_decode(&req.path);
                let completion = FetchCompletion::from_result(req.slot, result);
                if cancelled.load(Ordering::Acquire) {
                    return;
                }
                // The receiver is gone once cancelled; a failed send is expected then.
                let _ = tx.send(completion);
            });
        }
    }

    fn poll_completions(&mut self) -> Vec<FetchCompletion> {
        let Some(rx) = self.rx.as_ref() else {
            return Vec::new();
        };
        let out: Vec<FetchCompletion> = rx.try_iter().collect();
        self.record_drained(out.len());
        out
    }

    fn wait_completions(&mut self, timeout: Duration) -> Vec<FetchCompletion> {
        if self.in_flight == 0 {
            return Vec::new();
        }
        let Some(rx) = self.rx.as_ref() else {
            return Vec::new();
        };
        let mut out = Vec::new();
        if let Ok(first) = rx.recv_timeout(timeout) {
            out.push(first);
            out.extend(rx.try_iter());
        }
        self.record_drained(out.len());
        out
    }

    fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::Release);
        self.rx = None;
        self.in_flight = 0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
