use std::thread;
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use roundbot::time::budget::secs_to_duration;
use roundbot::time::{BranchingScaled, Deadline, FrontLoaded, SlicePolicy, Uniform};
use roundbot::TimeBudget;

fn close(a: Duration, secs: f64) -> bool { (a.as_secs_f64() - secs).abs() < 1e-6 }

#[test]
fn pool_is_charged_per_turn_and_reset_after_the_round() {
    let mut b = TimeBudget::from_secs(3, 30.0);
    let uniform = Uniform::default();
    assert_eq!(b.turns_remaining(), 3);
    assert!(close(uniform.slice(&b, 20), 9.95));

    b.record_turn(Duration::from_secs(4));
    assert_eq!(b.turns_remaining(), 2);
    assert_eq!(b.pool_remaining(), Duration::from_secs(26));
    assert!(close(uniform.slice(&b, 20), 12.95));

    b.record_turn(Duration::from_secs(10));
    assert_eq!(b.turns_remaining(), 1);
    assert_eq!(b.pool_remaining(), Duration::from_secs(16));

    // the last turn of the round is not charged; everything resets
    b.record_turn(Duration::from_secs(15));
    assert_eq!(b.turns_remaining(), 3);
    assert_eq!(b.pool_remaining(), Duration::from_secs(30));
}

#[test]
fn overspending_saturates_at_zero() {
    let mut b = TimeBudget::from_secs(3, 1.0);
    b.record_turn(Duration::from_secs(5));
    assert_eq!(b.pool_remaining(), Duration::ZERO);
    assert_eq!(Uniform::default().slice(&b, 10), Duration::ZERO);
}

#[test]
fn start_turn_anchors_until_recorded() {
    let mut b = TimeBudget::from_secs(2, 10.0);
    assert_eq!(b.turn_anchor(), None);
    let t = b.start_turn();
    assert_eq!(b.turn_anchor(), Some(t));
    b.set_move_slice(Duration::from_secs(2));
    assert_eq!(b.move_slice(), Duration::from_secs(2));
    b.record_turn(t.elapsed());
    assert_eq!(b.turn_anchor(), None);
}

#[test]
fn zero_turn_rounds_behave_like_one() {
    let mut b = TimeBudget::new(0, Duration::from_secs(5));
    assert_eq!(b.round_turns(), 1);
    b.record_turn(Duration::from_secs(1));
    assert_eq!(b.turns_remaining(), 1);
    assert_eq!(b.pool_remaining(), Duration::from_secs(5));
}

#[test]
fn narrow_positions_get_a_smaller_slice() {
    let b = TimeBudget::from_secs(3, 30.0);
    let p = BranchingScaled::default();
    assert!(close(p.slice(&b, 4), 6.965));
    assert!(close(p.slice(&b, 5), 9.95));
    assert!(close(p.slice(&b, 30), 9.95));
}

#[test]
fn front_loaded_spends_more_early_and_never_overdraws() {
    let p = FrontLoaded::default();
    let mut b = TimeBudget::from_secs(3, 30.0);
    let first = p.slice(&b, 20);
    assert!(close(first, 10.0 * (1.0 + 0.5 * 2.0 / 3.0) - 0.05));
    assert!(first > Uniform::default().slice(&b, 20));

    b.record_turn(first);
    b.record_turn(p.slice(&b, 20));
    assert_eq!(b.turns_remaining(), 1);
    let last = p.slice(&b, 20);
    assert!(close(last, b.pool_remaining().as_secs_f64() - 0.05));

    // a nearly drained pool still leaves a margin per turn
    let mut b = TimeBudget::from_secs(3, 1.0);
    b.record_turn(Duration::from_millis(900));
    let s = p.slice(&b, 20);
    assert!(s.as_secs_f64() <= 0.1 - 2.0 * 0.05 + 1e-9);
}

#[test]
fn empty_pool_gives_no_time() {
    let b = TimeBudget::new(3, Duration::ZERO);
    assert_eq!(Uniform::default().slice(&b, 10), Duration::ZERO);
    assert_eq!(BranchingScaled::default().slice(&b, 2), Duration::ZERO);
    assert_eq!(FrontLoaded::default().slice(&b, 10), Duration::ZERO);
}

#[test]
fn negative_seconds_clamp_to_zero() {
    assert_eq!(secs_to_duration(-1.0), Duration::ZERO);
    assert_eq!(secs_to_duration(f64::NAN), Duration::ZERO);
    assert_eq!(secs_to_duration(2.0), Duration::from_secs(2));
}

#[test]
fn deadline_counts_down_from_its_anchor() {
    let d = Deadline::starting_now(Duration::from_millis(40));
    assert!(!d.expired());
    assert!(d.remaining() <= Duration::from_millis(40));
    assert_eq!(d.allotted(), Duration::from_millis(40));
    thread::sleep(Duration::from_millis(50));
    assert!(d.expired());
    assert_eq!(d.remaining(), Duration::ZERO);

    let now = Instant::now();
    let zero = Deadline::new(now, Duration::ZERO);
    assert!(zero.expired());
    assert_eq!(zero.at(), Some(now));
}

#[test]
fn huge_durations_saturate_instead_of_panicking() {
    assert_eq!(secs_to_duration(1e20), Duration::MAX);
    assert_eq!(secs_to_duration(f64::INFINITY), Duration::MAX);
    let b = TimeBudget::from_secs(3, 1e20);
    assert_eq!(b.round_pool(), Duration::MAX);
    assert!(Uniform::default().slice(&b, 10) > Duration::from_secs(3600));

    let endless = Deadline::starting_now(Duration::MAX);
    assert_eq!(endless.at(), None);
    assert!(!endless.expired());
    assert!(endless.remaining() > Duration::from_secs(3600));
}
