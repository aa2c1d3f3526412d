use crate::{
    assets::{
        decode::PreparedImage,
        fetch::{FetchCompletion, FetchOutcome, FetchRequest, FrameFetcher},
        naming::FramePathTemplate,
    },
    foundation::core::FrameIndex,
};

/// Load state of one position in the sequence.
#[derive(Clone, Debug)]
pub enum FrameSlot {
    Pending,
    Ready(PreparedImage),
    /// Retrieval failed; the slot keeps its position but never paints.
    Broken,
}

impl FrameSlot {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn is_renderable(&self) -> bool {
        matches!(self, Self::Ready(img) if !img.is_empty())
    }
}

/// Ordered frames, one slot per requested index. `len()` never changes.
#[derive(Clone, Debug)]
pub struct FrameSet {
    slots: Vec<FrameSlot>,
}

impl FrameSet {
    fn pending(count: usize) -> Self {
        Self {
            slots: vec![FrameSlot::Pending; count],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: FrameIndex) -> Option<&FrameSlot> {
        self.slots.get(index.0)
    }

    /// Image at `index` if it loaded and has a drawable size.
    pub fn renderable(&self, index: FrameIndex) -> Option<&PreparedImage> {
        match self.slots.get(index.0)? {
            FrameSlot::Ready(img) if !img.is_empty() => Some(img),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrameSlot> {
        self.slots.iter()
    }
}

/// Integer load percentage in `0..=100`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadProgress(pub u8);

impl LoadProgress {
    pub const COMPLETE: Self = Self(100);

    /// `round(100 * resolved / total)`, held at 99 until every frame has resolved.
    pub fn from_counts(resolved: usize, total: usize) -> Self {
        if total == 0 || resolved >= total {
            return Self::COMPLETE;
        }
        let pct = ((resolved as f64) * 100.0 / (total as f64)).round() as u8;
        Self(pct.min(99))
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    pub fn is_complete(self) -> bool {
        self == Self::COMPLETE
    }
}

/// Preloads a frame sequence and aggregates per-frame completions.
///
/// Each slot counts toward progress exactly once, whether it loaded or failed, regardless of
/// completion order or duplicated completion signals.
#[derive(Debug)]
pub struct FrameStore {
    template: FramePathTemplate,
    frames: FrameSet,
    resolved: usize,
    failed: usize,
    started: bool,
}

impl FrameStore {
    pub fn new(template: FramePathTemplate, count: usize) -> Self {
        Self {
            template,
            frames: FrameSet::pending(count),
            resolved: 0,
            failed: 0,
            started: false,
        }
    }

    /// Issue one request per slot. Only the first call has any effect.
    #[tracing::instrument(skip(self, fetcher), fields(count = self.frames.len()))]
    pub fn start<F: FrameFetcher + ?Sized>(&mut self, fetcher: &mut F) -> bool {
        if self.started {
            tracing::debug!("frame store already started; ignoring repeated start");
            return false;
        }
        self.started = true;

        let requests: Vec<FetchRequest> = (0..self.frames.len())
            .map(|slot| FetchRequest {
                slot,
                path: self.template.path_for_slot(slot),
            })
            .collect();
        tracing::debug!(base = %self.template.base_path().display(), "issuing frame requests");
        fetcher.begin(requests);
        true
    }

    /// Apply one completion. Returns `false` when it was a duplicate or out of range.
    pub fn resolve(&mut self, completion: FetchCompletion) -> bool {
        let FetchCompletion { slot, outcome } = completion;
        let Some(entry) = self.frames.slots.get_mut(slot) else {
            tracing::warn!(slot, "completion for unknown frame slot");
            return false;
        };
        if entry.is_resolved() {
            tracing::trace!(slot, "duplicate completion ignored");
            return false;
        }

        *entry = match outcome {
            FetchOutcome::Loaded(img) => FrameSlot::Ready(img),
            FetchOutcome::Failed(reason) => {
                tracing::warn!(slot, %reason, "frame failed to load");
                self.failed += 1;
                FrameSlot::Broken
            }
        };
        self.resolved += 1;
        true
    }

    pub fn progress(&self) -> LoadProgress {
        LoadProgress::from_counts(self.resolved, self.frames.len())
    }

    pub fn all_resolved(&self) -> bool {
        self.resolved == self.frames.len()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn resolved_count(&self) -> usize {
        self.resolved
    }

    pub fn failed_count(&self) -> usize {
        self.failed
    }

    pub fn frames(&self) -> &FrameSet {
        &self.frames
    }

    pub fn template(&self) -> &FramePathTemplate {
        &self.template
    }
}

/// Create a store for `count` frames and start loading through `fetcher`.
pub fn load<F: FrameFetcher + ?Sized>(
    template: FramePathTemplate,
    count: usize,
    fetcher: &mut F,
) -> FrameStore {
    let mut store = FrameStore::new(template, count);
    store.start(fetcher);
    store
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
