use super::*;

#[test]
fn identical_resize_is_not_a_change() {
    let vp = ViewportSize::new(800.0, 600.0, 1.0);
    let mut tracker = ViewportTracker::new(vp);
    assert!(tracker.update(vp).is_none());
    assert_eq!(tracker.current(), vp);
}

#[test]
fn dpr_change_changes_backing_size() {
    let mut tracker = ViewportTracker::new(ViewportSize::new(800.0, 600.0, 1.0));
    let change = tracker
        .update(ViewportSize::new(800.0, 600.0, 2.0))
        .unwrap();
    assert!(change.backing_size_changed());
    assert_eq!(
        change.backing_size(),
        SurfaceSize {
            width: 1600,
            height: 1200
        }
    );
    assert_eq!(tracker.backing_size(), change.backing_size());
    assert_eq!(change.previous.device_pixel_ratio, 1.0);
}

#[test]
fn sub_pixel_logical_change_may_keep_backing_size() {
    let mut tracker = ViewportTracker::new(ViewportSize::new(800.0, 600.0, 1.0));
    let change = tracker
        .update(ViewportSize::new(800.4, 600.0, 1.0))
        .unwrap();
    assert!(!change.backing_size_changed());
}
