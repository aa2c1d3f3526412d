use std::time::Duration;

use crate::{
    assets::{
        fetch::{FetchCompletion, FrameFetcher},
        store::{FrameSet, FrameStore, LoadProgress},
    },
    foundation::{
        core::{FrameIndex, ViewportSize},
        error::FrameSeqResult,
    },
    playback::{config::PlaybackConfig, mailbox::PaintMailbox},
    render::{
        renderer::{FrameRenderer, RenderOutcome},
        surface::Surface,
    },
    scroll::mapper::ScrollMapper,
    viewport::tracker::ViewportTracker,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Loading,
    /// Terminal for the controller's lifetime.
    Ready,
}

/// What the host must do after a scroll notification.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollResponse {
    /// Not ready yet; nothing will be painted.
    Ignored,
    /// Schedule one display-refresh callback, then call
    /// [`PlaybackController::on_display_refresh`].
    RefreshRequested,
    /// A refresh is already pending and will paint the newer index.
    Coalesced,
}

/// Drives scroll-linked playback of a preloaded frame sequence onto a host surface.
///
/// Scroll notifications never paint directly: they post into a single-slot mailbox that is
/// drained by [`PlaybackController::on_display_refresh`]. Resizes and the first transition to
/// [`PlaybackState::Ready`] paint immediately.
pub struct PlaybackController<F: FrameFetcher, S: Surface> {
    config: PlaybackConfig,
    state: PlaybackState,
    store: FrameStore,
    fetcher: F,
    surface: Option<S>,
    viewport: ViewportTracker,
    mapper: ScrollMapper,
    renderer: FrameRenderer,
    mailbox: PaintMailbox,
    latest: FrameIndex,
    torn_down: bool,
}

impl<F: FrameFetcher, S: Surface> PlaybackController<F, S> {
    pub fn new(
        config: PlaybackConfig,
        fetcher: F,
        surface: Option<S>,
        viewport: ViewportSize,
    ) -> FrameSeqResult<Self> {
        config.validate()?;
        let template = config.template()?;
        Ok(Self {
            store: FrameStore::new(template, config.total_frames),
            mapper: ScrollMapper::new(config.total_frames),
            config,
            state: PlaybackState::Idle,
            fetcher,
            surface,
            viewport: ViewportTracker::new(viewport),
            renderer: FrameRenderer::new(),
            mailbox: PaintMailbox::new(),
            latest: FrameIndex(0),
            torn_down: false,
        })
    }

    /// Size the surface and start loading. Only the first call has any effect.
    pub fn mount(&mut self) -> bool {
        if self.state != PlaybackState::Idle {
            tracing::debug!(state = ?self.state, "mount ignored; already mounted");
            return false;
        }
        self.apply_backing_size();
        self.store.start(&mut self.fetcher);
        self.transition(PlaybackState::Loading);
        true
    }

    /// Apply one fetch completion delivered by the host.
    pub fn on_frame_completion(&mut self, completion: FetchCompletion) {
        if self.state != PlaybackState::Loading {
            return;
        }
        if self.store.resolve(completion) {
            self.finish_loading_if_resolved();
        }
    }

    /// Drain completions the fetcher has ready without blocking.
    pub fn pump(&mut self) -> LoadProgress {
        if self.state == PlaybackState::Loading {
            for completion in self.fetcher.poll_completions() {
                self.on_frame_completion(completion);
            }
        }
        self.progress()
    }

    /// Like [`PlaybackController::pump`], but waits up to `timeout` for the next completion.
    pub fn pump_timeout(&mut self, timeout: Duration) -> LoadProgress {
        if self.state == PlaybackState::Loading {
            for completion in self.fetcher.wait_completions(timeout) {
                self.on_frame_completion(completion);
            }
        }
        self.progress()
    }

    pub fn on_scroll(&mut self, progress: f64) -> ScrollResponse {
        let index = self.mapper.map(progress);
        self.latest = index;
        if self.state != PlaybackState::Ready {
            return ScrollResponse::Ignored;
        }
        if self.mailbox.post(index) {
            ScrollResponse::RefreshRequested
        } else {
            ScrollResponse::Coalesced
        }
    }

    /// Display-refresh callback: paint the most recently requested frame, if any.
    pub fn on_display_refresh(&mut self) -> Option<RenderOutcome> {
        let index = self.mailbox.take()?;
        if self.state != PlaybackState::Ready {
            return None;
        }
        Some(self.paint(index))
    }

    /// Apply a resize notification and, once ready, repaint the latest frame at the backing size.
    ///
    /// Every notification repaints, including one that repeats the current viewport.
    pub fn on_resize(&mut self, viewport: ViewportSize) -> Option<RenderOutcome> {
        if let Some(change) = self.viewport.update(viewport) {
            tracing::debug!(
                width = change.current.width,
                height = change.current.height,
                dpr = change.current.device_pixel_ratio,
                "viewport resized"
            );
        }
        self.apply_backing_size();
        self.renderer.invalidate();
        if self.state != PlaybackState::Ready {
            return None;
        }
        Some(self.paint(self.latest))
    }

    /// Hand a surface to the controller, returning any previously attached one.
    pub fn attach_surface(&mut self, surface: S) -> Option<S> {
        let previous = self.surface.replace(surface);
        self.apply_backing_size();
        self.renderer.invalidate();
        if self.state == PlaybackState::Ready {
            self.paint(self.latest);
        }
        previous
    }

    pub fn detach_surface(&mut self) -> Option<S> {
        self.renderer.invalidate();
        self.surface.take()
    }

    /// Release pending work and give the surface back to the host.
    pub fn unmount(mut self) -> Option<S> {
        self.teardown();
        self.surface.take()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == PlaybackState::Ready
    }

    pub fn progress(&self) -> LoadProgress {
        self.store.progress()
    }

    /// Frame for the most recent scroll notification, painted or not.
    pub fn latest_index(&self) -> FrameIndex {
        self.latest
    }

    pub fn pending_paint(&self) -> Option<FrameIndex> {
        self.mailbox.peek()
    }

    pub fn last_painted(&self) -> Option<FrameIndex> {
        self.renderer.last_painted()
    }

    pub fn paint_count(&self) -> u64 {
        self.renderer.paint_count()
    }

    pub fn frames(&self) -> &FrameSet {
        self.store.frames()
    }

    pub fn store(&self) -> &FrameStore {
        &self.store
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport.current()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    fn finish_loading_if_resolved(&mut self) {
        if self.state != PlaybackState::Loading || !self.store.all_resolved() {
            return;
        }
        self.transition(PlaybackState::Ready);
        self.renderer.invalidate();
        self.paint(FrameIndex(0));
    }

    fn paint(&mut self, index: FrameIndex) -> RenderOutcome {
        self.renderer
            .render(self.surface.as_mut(), self.store.frames(), index)
    }

    fn apply_backing_size(&mut self) {
        let size = self.viewport.backing_size();
        if let Some(surface) = self.surface.as_mut() {
            surface.set_pixel_size(size);
        }
    }

    fn transition(&mut self, next: PlaybackState) {
        tracing::debug!(from = ?self.state, to = ?next, "playback state change");
        self.state = next;
    }

    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.fetcher.cancel();
        self.mailbox.clear();
        tracing::debug!(state = ?self.state, "playback torn down");
    }
}

impl<F: FrameFetcher, S: Surface> Drop for PlaybackController<F, S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/controller.rs"]
mod tests;
