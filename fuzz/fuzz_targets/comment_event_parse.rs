#![no_main]

use codex_bridge_github::{parse_comment_event, ISSUE_COMMENT_EVENT_NAME};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    if let Ok(Some(event)) = parse_comment_event(ISSUE_COMMENT_EVENT_NAME, &raw) {
        assert!(!event.thread.owner.is_empty());
        assert!(!event.thread.repo.is_empty());
    }
    assert!(matches!(parse_comment_event("push", &raw), Ok(None)));
});
