use std::time::Duration;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::RevealScheduler;
use crate::domain::models::ExchangeId;
use crate::domain::models::RevealPhase;

fn scheduler() -> RevealScheduler {
    return RevealScheduler::new(StdRng::seed_from_u64(42), 15, 40);
}

/// Jumps to each deadline in turn until nothing is left to do.
fn run_to_completion(scheduler: &mut RevealScheduler, id: ExchangeId) -> usize {
    let mut ticks = 0;
    let mut last_revealed = 0;

    while let Some(deadline) = scheduler.next_deadline() {
        assert!(scheduler.tick(deadline));
        ticks += 1;

        let revealed = scheduler.get(id).unwrap().revealed();
        assert!(revealed >= last_revealed);
        last_revealed = revealed;

        assert!(ticks < 10_000, "reveal never finished");
    }

    return ticks;
}

#[test]
fn it_schedules_the_first_character_within_the_delay_range() {
    let mut scheduler = scheduler();
    let now = Instant::now();
    scheduler.start(ExchangeId(1), "hello", now);

    let deadline = scheduler.next_deadline().unwrap();
    assert!(deadline >= now + Duration::from_millis(15));
    assert!(deadline <= now + Duration::from_millis(40));
    assert_eq!(scheduler.get(ExchangeId(1)).unwrap().phase(), RevealPhase::Revealing);
}

#[test]
fn it_does_nothing_before_the_deadline() {
    let mut scheduler = scheduler();
    let now = Instant::now();
    scheduler.start(ExchangeId(1), "hello", now);

    assert!(!scheduler.tick(now));
    assert_eq!(scheduler.get(ExchangeId(1)).unwrap().revealed(), 0);
}

#[test]
fn it_reveals_one_character_per_due_tick() {
    let mut scheduler = scheduler();
    let now = Instant::now();
    scheduler.start(ExchangeId(1), "hello", now);

    let later = now + Duration::from_millis(40);
    assert!(scheduler.tick(later));
    assert_eq!(scheduler.get(ExchangeId(1)).unwrap().visible_text(), "h");

    let deadline = scheduler.next_deadline().unwrap();
    assert!(deadline >= later + Duration::from_millis(15));
    assert!(deadline <= later + Duration::from_millis(40));
}

#[test]
fn it_reaches_the_full_text_and_stops() {
    let mut scheduler = scheduler();
    let text = "No answer found. Your query has been logged.";
    scheduler.start(ExchangeId(7), text, Instant::now());

    let ticks = run_to_completion(&mut scheduler, ExchangeId(7));

    let state = scheduler.get(ExchangeId(7)).unwrap();
    assert_eq!(ticks, text.chars().count());
    assert!(state.is_done());
    assert_eq!(state.visible_text(), text);
    assert_eq!(scheduler.next_deadline(), None);
    assert!(!scheduler.is_animating());
}

#[test]
fn it_finishes_empty_text_immediately() {
    let mut scheduler = scheduler();
    scheduler.start(ExchangeId(1), "", Instant::now());

    assert!(scheduler.get(ExchangeId(1)).unwrap().is_done());
    assert_eq!(scheduler.next_deadline(), None);
}

#[test]
fn it_animates_several_exchanges_independently() {
    let mut scheduler = scheduler();
    let now = Instant::now();
    scheduler.start(ExchangeId(1), "short", now);
    scheduler.start(ExchangeId(2), "a much longer answer", now);

    while let Some(deadline) = scheduler.next_deadline() {
        scheduler.tick(deadline);
    }

    assert_eq!(scheduler.get(ExchangeId(1)).unwrap().visible_text(), "short");
    assert_eq!(
        scheduler.get(ExchangeId(2)).unwrap().visible_text(),
        "a much longer answer"
    );
}

#[test]
fn it_cancels_everything_on_clear() {
    let mut scheduler = scheduler();
    scheduler.start(ExchangeId(1), "hello", Instant::now());

    scheduler.clear();

    assert_eq!(scheduler.next_deadline(), None);
    assert!(scheduler.get(ExchangeId(1)).is_none());
    assert!(!scheduler.tick(Instant::now() + Duration::from_secs(1)));
}
