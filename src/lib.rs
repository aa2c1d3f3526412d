#![forbid(unsafe_code)]
//! Scroll-driven playback of a preloaded image sequence.
//!
//! A [`PlaybackController`] preloads `N` numbered frames through a [`FrameFetcher`], maps
//! normalized scroll progress to a frame index, and paints that frame cover-fit onto a host
//! [`Surface`] at most once per display refresh.

pub mod assets;
pub mod foundation;
pub mod playback;
pub mod render;
pub mod scroll;
pub mod viewport;

pub use assets::{
    decode::{PreparedImage, decode_image},
    fetch::{FetchCompletion, FetchOutcome, FetchRequest, FrameFetcher, FsFetcher},
    naming::FramePathTemplate,
    store::{FrameSet, FrameSlot, FrameStore, LoadProgress, load},
};
pub use foundation::core::{DrawRect, FrameIndex, SurfaceSize, ViewportSize};
pub use foundation::error::{FrameSeqError, FrameSeqResult};
pub use playback::{
    config::PlaybackConfig,
    controller::{PlaybackController, PlaybackState, ScrollResponse},
    mailbox::PaintMailbox,
};
pub use render::{
    renderer::{FrameRenderer, RenderOutcome, cover_fit},
    surface::{CpuSurface, Surface},
};
pub use scroll::{
    ease::Ease,
    mapper::{ScrollMapper, frame_index_for_progress},
    track::{ControlPoint, Lerp, Track},
};
pub use viewport::tracker::{ViewportChange, ViewportTracker};
