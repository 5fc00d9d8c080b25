//! Integration tests for the wheel engine: spin lifecycle, ticks, drag/flick.

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use team_fortune_web::events::CueSink;
use team_fortune_web::{resolve_winner, GameError, SpinProgress, WheelEngine};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Cue {
    SpinStart,
    Tick,
    Win,
}

/// Records every cue in order, for asserting emission contracts.
#[derive(Default)]
struct RecordingCues {
    events: RefCell<Vec<Cue>>,
}

impl RecordingCues {
    fn events(&self) -> Vec<Cue> {
        self.events.borrow().clone()
    }

    fn count(&self, cue: Cue) -> usize {
        self.events.borrow().iter().filter(|c| **c == cue).count()
    }
}

impl CueSink for RecordingCues {
    fn spin_start(&self) {
        self.events.borrow_mut().push(Cue::SpinStart);
    }
    fn tick(&self) {
        self.events.borrow_mut().push(Cue::Tick);
    }
    fn win(&self) {
        self.events.borrow_mut().push(Cue::Win);
    }
}

fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Run a spin to completion in fixed steps, returning the winner index.
fn run_spin(wheel: &mut WheelEngine, step_ms: f64, cues: &RecordingCues) -> usize {
    let duration = wheel.spin_duration_ms().expect("spin in progress");
    let mut elapsed = 0.0;
    loop {
        elapsed = (elapsed + step_ms).min(duration);
        match wheel.advance(elapsed, cues) {
            SpinProgress::Finished { winner_index } => return winner_index,
            SpinProgress::Spinning { .. } => continue,
            SpinProgress::Idle => panic!("spin vanished before finishing"),
        }
    }
}

#[test]
fn resolve_winner_is_in_range_and_deterministic() {
    for n in 1..=12 {
        for i in 0..100 {
            let rotation = i as f64 * 0.37 - 18.5;
            let winner = resolve_winner(rotation, n);
            assert!(winner < n);
            assert_eq!(winner, resolve_winner(rotation, n));
        }
    }
}

#[test]
fn resolve_winner_matches_pointer_alignment() {
    // 4 candidates, slices of pi/2 starting at angle 0. With no rotation the
    // pointer at 3pi/2 sits over slice 3.
    assert_eq!(resolve_winner(0.0, 4), 3);
    // Rotating the wheel by half a slice-width steps the pointer back.
    assert_eq!(resolve_winner(FRAC_PI_2, 4), 2);
    assert_eq!(resolve_winner(PI, 4), 1);
    assert_eq!(resolve_winner(1.5 * PI, 4), 0);
    // Full turns change nothing.
    assert_eq!(resolve_winner(TAU * 7.0, 4), 3);
    assert_eq!(resolve_winner(-TAU * 3.0 + PI, 4), 1);
}

#[test]
fn begin_spin_rejects_empty_candidates() {
    let mut wheel = WheelEngine::new();
    let cues = RecordingCues::default();
    assert_eq!(
        wheel.begin_spin(0, None, &mut rng(1), &cues),
        Err(GameError::NoCandidates)
    );
    assert!(cues.events().is_empty());
}

#[test]
fn begin_spin_rejects_double_spin() {
    let mut wheel = WheelEngine::new();
    let cues = RecordingCues::default();
    wheel.begin_spin(8, None, &mut rng(2), &cues).unwrap();
    assert_eq!(
        wheel.begin_spin(8, None, &mut rng(2), &cues),
        Err(GameError::SpinInProgress)
    );
    // Only the first spin emitted its start cue.
    assert_eq!(cues.count(Cue::SpinStart), 1);
}

#[test]
fn spin_finishes_with_winner_matching_pure_resolution() {
    let mut wheel = WheelEngine::new();
    let cues = RecordingCues::default();
    wheel.begin_spin(8, None, &mut rng(42), &cues).unwrap();
    let winner = run_spin(&mut wheel, 16.0, &cues);
    assert!(winner < 8);
    assert!(!wheel.is_spinning());
    // The terminal rotation fully determines the winner.
    assert_eq!(winner, resolve_winner(wheel.rotation(), 8));
}

#[test]
fn exactly_one_win_cue_and_it_fires_last() {
    let mut wheel = WheelEngine::new();
    let cues = RecordingCues::default();
    wheel.begin_spin(8, None, &mut rng(7), &cues).unwrap();
    run_spin(&mut wheel, 16.0, &cues);

    let events = cues.events();
    assert_eq!(events.first(), Some(&Cue::SpinStart));
    assert_eq!(events.last(), Some(&Cue::Win));
    assert_eq!(cues.count(Cue::Win), 1);
    // A 5-10 turn spin over 8 slices crosses many boundaries.
    assert!(cues.count(Cue::Tick) >= 5 * 8);

    // Once idle, advancing emits nothing further.
    assert_eq!(wheel.advance(99_999.0, &cues), SpinProgress::Idle);
    assert_eq!(cues.events().len(), events.len());
}

#[test]
fn tick_count_is_independent_of_frame_pacing() {
    // Same seed, same spin plan; one engine steps finely, the other jumps
    // straight to the end. No boundary crossing may be skipped or repeated.
    let mut fine = WheelEngine::new();
    let mut coarse = WheelEngine::new();
    let fine_cues = RecordingCues::default();
    let coarse_cues = RecordingCues::default();

    fine.begin_spin(8, None, &mut rng(99), &fine_cues).unwrap();
    coarse.begin_spin(8, None, &mut rng(99), &coarse_cues).unwrap();

    let fine_winner = run_spin(&mut fine, 7.0, &fine_cues);
    let duration = coarse.spin_duration_ms().unwrap();
    let coarse_winner = match coarse.advance(duration, &coarse_cues) {
        SpinProgress::Finished { winner_index } => winner_index,
        other => panic!("expected finish, got {:?}", other),
    };

    assert_eq!(fine_winner, coarse_winner);
    assert_eq!(fine_cues.count(Cue::Tick), coarse_cues.count(Cue::Tick));
    assert_relative_eq!(fine.rotation(), coarse.rotation(), max_relative = 1e-12);
}

#[test]
fn rotation_decelerates_monotonically() {
    let mut wheel = WheelEngine::new();
    let cues = RecordingCues::default();
    wheel.begin_spin(8, None, &mut rng(3), &cues).unwrap();
    let duration = wheel.spin_duration_ms().unwrap();

    let mut last_rotation = wheel.rotation();
    let mut last_delta = f64::INFINITY;
    let step = duration / 100.0;
    for i in 1..100 {
        match wheel.advance(step * i as f64, &cues) {
            SpinProgress::Spinning { rotation } => {
                let delta = rotation - last_rotation;
                assert!(delta >= 0.0, "rotation went backwards");
                assert!(delta <= last_delta + 1e-9, "wheel sped up while easing out");
                last_rotation = rotation;
                last_delta = delta;
            }
            other => panic!("unexpected progress: {:?}", other),
        }
    }
}

#[test]
fn drag_moves_wheel_and_slow_release_does_not_spin() {
    let mut wheel = WheelEngine::new();
    let cues = RecordingCues::default();

    wheel.begin_drag(0.0, 0.0);
    // 0.01 rad over 10 ms = 0.001 rad/ms, below the 0.005 flick threshold.
    wheel.update_drag(0.01, 10.0);
    assert_relative_eq!(wheel.rotation(), 0.01);
    let spun = wheel.end_drag(8, &mut rng(5), &cues).unwrap();
    assert!(!spun);
    assert!(!wheel.is_spinning());
    // Wheel stays where it was released.
    assert_relative_eq!(wheel.rotation(), 0.01);
}

#[test]
fn fast_release_flicks_into_a_spin() {
    let mut wheel = WheelEngine::new();
    let cues = RecordingCues::default();

    wheel.begin_drag(0.0, 0.0);
    // 0.1 rad over 10 ms = 0.01 rad/ms, above the threshold.
    wheel.update_drag(0.1, 10.0);
    let spun = wheel.end_drag(8, &mut rng(5), &cues).unwrap();
    assert!(spun);
    assert!(wheel.is_spinning());
    assert_eq!(cues.count(Cue::SpinStart), 1);

    let winner = run_spin(&mut wheel, 16.0, &cues);
    assert!(winner < 8);
}

#[test]
fn drag_is_ignored_while_spinning() {
    let mut wheel = WheelEngine::new();
    let cues = RecordingCues::default();
    wheel.begin_spin(8, None, &mut rng(11), &cues).unwrap();
    let rotation_before = wheel.rotation();

    wheel.begin_drag(1.0, 0.0);
    wheel.update_drag(2.0, 10.0);
    assert_relative_eq!(wheel.rotation(), rotation_before);
    // No drag was registered, so releasing does nothing either.
    assert!(!wheel.end_drag(8, &mut rng(11), &cues).unwrap());
    assert!(wheel.is_spinning());
}

#[test]
fn drag_velocity_uses_wrapped_angle_difference() {
    let mut wheel = WheelEngine::new();
    let cues = RecordingCues::default();

    // Crossing the -pi/+pi seam: from just below +pi to just above -pi is a
    // small forward step, not a near-full backward turn.
    wheel.begin_drag(PI - 0.01, 0.0);
    wheel.update_drag(-PI + 0.01, 10.0);
    let spun = wheel.end_drag(8, &mut rng(5), &cues).unwrap();
    // 0.02 rad over 10 ms = 0.002 rad/ms, below the threshold.
    assert!(!spun);
}
