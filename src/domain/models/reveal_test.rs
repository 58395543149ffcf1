use std::time::Duration;
use std::time::Instant;

use super::RevealPhase;
use super::RevealState;

#[test]
fn it_starts_idle() {
    let state = RevealState::new("abc");
    assert_eq!(state.phase(), RevealPhase::Idle);
    assert_eq!(state.revealed(), 0);
    assert_eq!(state.total(), 3);
    assert_eq!(state.visible_text(), "");
}

#[test]
fn it_finishes_empty_text_on_arm() {
    let mut state = RevealState::new("");
    state.arm(Instant::now());
    assert!(state.is_done());
    assert_eq!(state.due_at(), None);
}

#[test]
fn it_counts_chars_not_bytes() {
    let mut state = RevealState::new("नमस्ते");
    assert_eq!(state.total(), 6);

    state.arm(Instant::now());
    state.advance();
    assert_eq!(state.visible_text(), "न");
}

#[test]
fn it_reveals_until_done() {
    let mut state = RevealState::new("hey");
    let now = Instant::now();

    state.arm(now);
    assert!(state.advance());
    assert_eq!(state.visible_text(), "h");
    assert_eq!(state.due_at(), None);

    state.arm(now + Duration::from_millis(20));
    assert!(state.advance());
    state.arm(now + Duration::from_millis(40));
    assert!(!state.advance());

    assert!(state.is_done());
    assert_eq!(state.visible_text(), "hey");
    assert_eq!(state.revealed(), state.total());
}

#[test]
fn it_ignores_advance_once_done() {
    let mut state = RevealState::new("a");
    state.arm(Instant::now());
    state.advance();
    assert!(state.is_done());

    assert!(!state.advance());
    state.arm(Instant::now());
    assert!(state.is_done());
    assert_eq!(state.revealed(), 1);
}
