use super::*;
use crate::{
    assets::{decode::PreparedImage, fetch::FetchRequest},
    foundation::core::{DrawRect, SurfaceSize},
    render::renderer::RenderOutcome,
};

#[derive(Default)]
struct ManualFetcher {
    begun: Vec<FetchRequest>,
    begin_calls: usize,
    queued: Vec<FetchCompletion>,
    cancelled: bool,
}

impl FrameFetcher for ManualFetcher {
    fn begin(&mut self, requests: Vec<FetchRequest>) {
        self.begin_calls += 1;
        self.begun.extend(requests);
    }

    fn poll_completions(&mut self) -> Vec<FetchCompletion> {
        if self.cancelled {
            return Vec::new();
        }
        std::mem::take(&mut self.queued)
    }

    fn cancel(&mut self) {
        self.cancelled = true;
        self.queued.clear();
    }
}

#[derive(Default)]
struct RecordingSurface {
    size: SurfaceSize,
    resizes: Vec<SurfaceSize>,
    draws: Vec<(u32, DrawRect)>,
}

impl Surface for RecordingSurface {
    fn pixel_size(&self) -> SurfaceSize {
        self.size
    }

    fn set_pixel_size(&mut self, size: SurfaceSize) {
        self.size = size;
        self.resizes.push(size);
    }

    fn clear(&mut self) {}

    fn draw_image(&mut self, image: &PreparedImage, rect: DrawRect) {
        // Frames are tagged by their width so tests can tell them apart.
        self.draws.push((image.width(), rect));
    }
}

fn tagged(slot: usize) -> PreparedImage {
    let w = slot as u32 + 1;
    PreparedImage::from_premul_rgba8(w, 1, vec![255; w as usize * 4]).unwrap()
}

fn viewport() -> ViewportSize {
    ViewportSize::new(800.0, 600.0, 2.0)
}

fn controller(n: usize) -> PlaybackController<ManualFetcher, RecordingSurface> {
    PlaybackController::new(
        PlaybackConfig::new("/seq", n),
        ManualFetcher::default(),
        Some(RecordingSurface::default()),
        viewport(),
    )
    .unwrap()
}

fn load_all(c: &mut PlaybackController<ManualFetcher, RecordingSurface>, n: usize) {
    for slot in 0..n {
        c.on_frame_completion(FetchCompletion::loaded(slot, tagged(slot)));
    }
}

fn draws(c: &PlaybackController<ManualFetcher, RecordingSurface>) -> Vec<u32> {
    c.surface()
        .unwrap()
        .draws
        .iter()
        .map(|(tag, _)| *tag)
        .collect()
}

#[test]
fn invalid_config_is_rejected() {
    let err = PlaybackController::new(
        PlaybackConfig::new("/seq", 0),
        ManualFetcher::default(),
        Some(RecordingSurface::default()),
        viewport(),
    )
    .err()
    .unwrap();
    assert!(matches!(err, crate::FrameSeqError::Validation(_)));
}

#[test]
fn mount_sizes_surface_and_requests_every_frame_once() {
    let mut c = controller(3);
    assert_eq!(c.state(), PlaybackState::Idle);
    assert!(c.mount());
    assert!(!c.mount());
    assert_eq!(c.state(), PlaybackState::Loading);
    assert_eq!(
        c.surface().unwrap().size,
        SurfaceSize {
            width: 1600,
            height: 1200
        }
    );
    assert_eq!(c.fetcher.begin_calls, 1);
    let paths: Vec<_> = c.fetcher.begun.iter().map(|r| r.path.clone()).collect();
    assert_eq!(
        paths,
        vec![
            std::path::PathBuf::from("/seq/frame-001.jpg"),
            std::path::PathBuf::from("/seq/frame-002.jpg"),
            std::path::PathBuf::from("/seq/frame-003.jpg"),
        ]
    );
}

#[test]
fn scroll_while_loading_is_ignored_but_remembered() {
    let mut c = controller(4);
    c.mount();
    assert_eq!(c.on_scroll(1.0), ScrollResponse::Ignored);
    assert_eq!(c.latest_index(), FrameIndex(3));
    assert_eq!(c.pending_paint(), None);
    assert!(c.on_display_refresh().is_none());
    assert_eq!(c.paint_count(), 0);
}

#[test]
fn ready_paints_first_frame_in_any_completion_order() {
    let mut c = controller(3);
    c.mount();
    c.on_frame_completion(FetchCompletion::loaded(2, tagged(2)));
    c.on_frame_completion(FetchCompletion::loaded(0, tagged(0)));
    assert_eq!(c.progress(), LoadProgress(67));
    assert!(!c.is_ready());
    c.on_frame_completion(FetchCompletion::loaded(1, tagged(1)));

    assert!(c.is_ready());
    assert!(c.progress().is_complete());
    assert_eq!(draws(&c), vec![1]);
    assert_eq!(c.last_painted(), Some(FrameIndex(0)));
}

#[test]
fn duplicate_completion_does_not_finish_loading() {
    let mut c = controller(2);
    c.mount();
    c.on_frame_completion(FetchCompletion::loaded(0, tagged(0)));
    c.on_frame_completion(FetchCompletion::loaded(0, tagged(0)));
    assert_eq!(c.state(), PlaybackState::Loading);
    assert_eq!(c.progress(), LoadProgress(50));
}

#[test]
fn failed_frames_still_count_toward_ready() {
    let mut c = controller(2);
    c.mount();
    c.on_frame_completion(FetchCompletion::failed(0, "404"));
    c.on_frame_completion(FetchCompletion::loaded(1, tagged(1)));
    assert!(c.is_ready());
    // Frame 0 is broken, so the ready paint is skipped.
    assert_eq!(c.paint_count(), 0);
    assert_eq!(c.store().failed_count(), 1);

    assert_eq!(c.on_scroll(1.0), ScrollResponse::RefreshRequested);
    assert!(c.on_display_refresh().unwrap().painted());
    assert_eq!(draws(&c), vec![2]);
}

#[test]
fn scroll_burst_coalesces_into_one_paint_of_latest_index() {
    let mut c = controller(10);
    c.mount();
    load_all(&mut c, 10);
    assert_eq!(c.paint_count(), 1);

    assert_eq!(c.on_scroll(0.1), ScrollResponse::RefreshRequested);
    assert_eq!(c.on_scroll(0.5), ScrollResponse::Coalesced);
    assert_eq!(c.on_scroll(0.8), ScrollResponse::Coalesced);
    assert_eq!(c.pending_paint(), Some(FrameIndex(7)));

    assert!(c.on_display_refresh().unwrap().painted());
    assert!(c.on_display_refresh().is_none());
    assert_eq!(draws(&c), vec![1, 8]);
}

#[test]
fn refresh_for_unchanged_frame_skips_the_paint() {
    let mut c = controller(5);
    c.mount();
    load_all(&mut c, 5);
    let _ = c.on_scroll(0.0);
    assert_eq!(
        c.on_display_refresh(),
        Some(RenderOutcome::SkippedUnchanged)
    );
    assert_eq!(c.paint_count(), 1);
}

#[test]
fn resize_repaints_latest_frame_at_new_backing_size() {
    let mut c = controller(5);
    c.mount();
    load_all(&mut c, 5);
    let _ = c.on_scroll(1.0);
    assert!(c.on_display_refresh().unwrap().painted());

    let outcome = c.on_resize(ViewportSize::new(400.0, 300.0, 1.0));
    assert!(outcome.unwrap().painted());
    assert_eq!(
        c.surface().unwrap().size,
        SurfaceSize {
            width: 400,
            height: 300
        }
    );
    assert_eq!(draws(&c), vec![1, 5, 5]);
}

#[test]
fn identical_resize_still_repaints() {
    let mut c = controller(2);
    c.mount();
    load_all(&mut c, 2);
    assert!(matches!(
        c.on_resize(viewport()),
        Some(RenderOutcome::Painted(_))
    ));
    assert_eq!(c.paint_count(), 2);
    assert_eq!(draws(&c), vec![1, 1]);
}

#[test]
fn resize_before_ready_only_resizes() {
    let mut c = controller(2);
    c.mount();
    assert!(c.on_resize(ViewportSize::new(100.0, 50.0, 1.0)).is_none());
    assert_eq!(
        c.surface().unwrap().size,
        SurfaceSize {
            width: 100,
            height: 50
        }
    );
    assert_eq!(c.paint_count(), 0);
}

#[test]
fn pump_drains_fetcher_completions() {
    let mut c = controller(2);
    c.mount();
    c.fetcher
        .queued
        .push(FetchCompletion::loaded(1, tagged(1)));
    assert_eq!(c.pump(), LoadProgress(50));
    c.fetcher
        .queued
        .push(FetchCompletion::loaded(0, tagged(0)));
    assert!(c.pump().is_complete());
    assert!(c.is_ready());
}

#[test]
fn completions_before_mount_are_ignored() {
    let mut c = controller(1);
    c.on_frame_completion(FetchCompletion::loaded(0, tagged(0)));
    assert_eq!(c.state(), PlaybackState::Idle);
    assert_eq!(c.store().resolved_count(), 0);
}

#[test]
fn detached_surface_skips_paints_and_reattach_repaints() {
    let mut c = controller(3);
    c.mount();
    load_all(&mut c, 3);
    let detached = c.detach_surface().unwrap();
    assert_eq!(detached.draws.len(), 1);

    let _ = c.on_scroll(1.0);
    assert_eq!(
        c.on_display_refresh(),
        Some(RenderOutcome::SkippedNoSurface)
    );

    assert!(c.attach_surface(RecordingSurface::default()).is_none());
    assert_eq!(draws(&c), vec![3]);
    assert_eq!(
        c.surface().unwrap().size,
        SurfaceSize {
            width: 1600,
            height: 1200
        }
    );
}

#[test]
fn unmount_cancels_fetcher_and_returns_surface() {
    let mut c = controller(3);
    c.mount();
    c.on_frame_completion(FetchCompletion::loaded(0, tagged(0)));
    let surface = c.unmount().unwrap();
    assert!(surface.draws.is_empty());
    assert_eq!(surface.resizes.len(), 1);
}

#[test]
fn teardown_runs_once() {
    let mut c = controller(1);
    c.mount();
    c.teardown();
    assert!(c.fetcher.cancelled);
    assert!(c.torn_down);
    c.teardown();
    assert!(c.fetcher.cancelled);
}
