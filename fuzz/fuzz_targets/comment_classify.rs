#![no_main]

use codex_bridge_core::BridgeConfig;
use codex_bridge_github::{classify_comment_event, Classification, CommentEvent, ThreadRef};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let body = String::from_utf8_lossy(data);
    let event = CommentEvent::created(
        body.to_string(),
        "fuzzer",
        ThreadRef {
            owner: "acme".to_string(),
            repo: "widgets".to_string(),
            issue_number: 1,
            is_pull_request: false,
        },
    );
    let config = BridgeConfig::default();
    let first = classify_comment_event(&event, &config);
    assert_eq!(first, classify_comment_event(&event, &config));
    if let Classification::Actionable(instruction) = first {
        assert!(!instruction.prompt.is_empty());
        assert_eq!(instruction.prompt.trim(), instruction.prompt);
        assert!(body.trim_start().starts_with(&config.trigger_prefix));
    }
});
