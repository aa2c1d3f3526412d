use super::*;

#[test]
fn first_post_requests_refresh_later_posts_overwrite() {
    let mut mb = PaintMailbox::new();
    assert!(mb.post(FrameIndex(3)));
    assert!(!mb.post(FrameIndex(7)));
    assert!(!mb.post(FrameIndex(5)));
    assert_eq!(mb.peek(), Some(FrameIndex(5)));
    assert_eq!(mb.take(), Some(FrameIndex(5)));
    assert_eq!(mb.take(), None);
    assert!(mb.post(FrameIndex(1)));
}

#[test]
fn clear_drops_pending_request() {
    let mut mb = PaintMailbox::new();
    mb.post(FrameIndex(2));
    mb.clear();
    assert_eq!(mb.take(), None);
}
