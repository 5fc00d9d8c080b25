//! Wheel engine: spin animation state and winner resolution.
//!
//! The engine owns a single continuous rotation (radians, unnormalized while
//! animating) and, during a spin, a plan that maps elapsed time to rotation.
//! It knows nothing about teams or rounds; callers hand it a candidate count
//! per draw and map the resolved index back onto their pool order.

use crate::events::CueSink;
use crate::models::GameError;
use rand::Rng;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Angle of the fixed winner pointer at the top of the wheel, in the canvas
/// coordinate convention (angle 0 points right, angles grow clockwise).
/// The slice lying under this angle after the wheel stops is the winner.
/// Changing this silently shifts which candidate a stopping angle selects.
pub const POINTER_ANGLE: f64 = 1.5 * PI;

/// Offset used when counting slice-boundary crossings for tick cues.
const TICK_OFFSET: f64 = FRAC_PI_2;

/// Every spin runs at least this long.
const MIN_SPIN_MS: f64 = 3000.0;
/// Random extra duration on top of the minimum.
const EXTRA_SPIN_MS: f64 = 2000.0;

/// Full turns for a scripted (non-flick) spin: 5 plus up to 5 random.
const MIN_TURNS: f64 = 5.0;
const EXTRA_TURNS: f64 = 5.0;

/// A flick velocity above 1.0 scales to this many turns per unit.
const FLICK_TURN_FACTOR: f64 = 2.0;

/// Minimum drag release velocity (rad/ms) that counts as a flick.
pub const FLICK_VELOCITY_MIN: f64 = 0.005;

/// Scale from drag velocity (rad/ms) to the flick velocity seeding a spin.
const FLICK_SPIN_SCALE: f64 = 100.0;

/// Slice index used for tick detection. Negative while the wheel sits left
/// of the tick origin, hence the signed type.
fn tick_slice(rotation: f64, slice: f64) -> i64 {
    ((rotation - TICK_OFFSET) / slice).floor() as i64
}

/// Winning candidate index for a terminal rotation. Pure: the same
/// (rotation, candidate_count) always yields the same index, in `[0, N)`.
pub fn resolve_winner(rotation: f64, candidate_count: usize) -> usize {
    debug_assert!(candidate_count > 0);
    let slice = TAU / candidate_count as f64;
    let normalized = rotation.rem_euclid(TAU);
    let pointer = (POINTER_ANGLE - normalized).rem_euclid(TAU);
    ((pointer / slice).floor() as usize) % candidate_count
}

/// An in-flight spin: start/end rotation and total duration, fixed at launch.
#[derive(Clone, Debug)]
struct SpinPlan {
    start_rotation: f64,
    end_rotation: f64,
    duration_ms: f64,
    candidate_count: usize,
    /// Last slice index a tick cue was emitted for.
    last_tick_slice: i64,
}

/// Manual drag in progress (only while idle).
#[derive(Clone, Debug)]
struct DragState {
    /// Pointer angle minus wheel rotation at grab time.
    grab_offset: f64,
    last_angle: f64,
    last_time_ms: f64,
    /// Angular velocity in rad/ms, from the most recent move.
    velocity: f64,
}

/// Result of advancing the animation to a given elapsed time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpinProgress {
    /// No spin in progress.
    Idle,
    /// Still decelerating; current rotation for rendering.
    Spinning { rotation: f64 },
    /// The spin just completed and resolved this candidate index.
    Finished { winner_index: usize },
}

/// The wheel: rotation state plus optional spin or drag.
#[derive(Debug, Default)]
pub struct WheelEngine {
    rotation: f64,
    spin: Option<SpinPlan>,
    drag: Option<DragState>,
}

impl WheelEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current rotation in radians (unnormalized).
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn is_spinning(&self) -> bool {
        self.spin.is_some()
    }

    /// Total duration of the in-flight spin, if any.
    pub fn spin_duration_ms(&self) -> Option<f64> {
        self.spin.as_ref().map(|s| s.duration_ms)
    }

    /// Start a spin over `candidate_count` equal slices.
    ///
    /// Duration is 3000 ms plus up to 2000 ms random. Total turns come from
    /// the flick velocity when one above 1.0 is supplied, otherwise 5 plus up
    /// to 5 random. Fails while another spin is running or with no candidates;
    /// a second spin is never queued.
    pub fn begin_spin(
        &mut self,
        candidate_count: usize,
        flick_velocity: Option<f64>,
        rng: &mut impl Rng,
        cues: &impl CueSink,
    ) -> Result<(), GameError> {
        if self.spin.is_some() {
            return Err(GameError::SpinInProgress);
        }
        if candidate_count == 0 {
            return Err(GameError::NoCandidates);
        }
        self.drag = None;

        let duration_ms = MIN_SPIN_MS + rng.gen::<f64>() * EXTRA_SPIN_MS;
        let turns = match flick_velocity {
            Some(v) if v > 1.0 => v * FLICK_TURN_FACTOR,
            _ => MIN_TURNS + rng.gen::<f64>() * EXTRA_TURNS,
        };
        let slice = TAU / candidate_count as f64;
        self.spin = Some(SpinPlan {
            start_rotation: self.rotation,
            end_rotation: self.rotation + turns * TAU,
            duration_ms,
            candidate_count,
            last_tick_slice: tick_slice(self.rotation, slice),
        });
        cues.spin_start();
        Ok(())
    }

    /// Advance the animation to `elapsed_ms` since spin start and return the
    /// resulting state. Rotation is computed from elapsed time under a
    /// quartic ease-out, not from per-frame deltas, so an external frame
    /// pacer can call this at any cadence without drift.
    ///
    /// One tick cue fires per slice boundary crossed since the last call,
    /// in increasing order, regardless of how far a single call jumps. On
    /// completion the win cue fires exactly once, after all ticks, and the
    /// engine returns to idle.
    pub fn advance(&mut self, elapsed_ms: f64, cues: &impl CueSink) -> SpinProgress {
        let Some(spin) = self.spin.as_mut() else {
            return SpinProgress::Idle;
        };

        let progress = (elapsed_ms / spin.duration_ms).clamp(0.0, 1.0);
        let eased = 1.0 - (1.0 - progress).powi(4);
        let rotation = spin.start_rotation + (spin.end_rotation - spin.start_rotation) * eased;
        self.rotation = rotation;

        let slice = TAU / spin.candidate_count as f64;
        let current = tick_slice(rotation, slice);
        while spin.last_tick_slice < current {
            spin.last_tick_slice += 1;
            cues.tick();
        }

        if progress < 1.0 {
            SpinProgress::Spinning { rotation }
        } else {
            let candidate_count = spin.candidate_count;
            self.spin = None;
            let winner_index = resolve_winner(rotation, candidate_count);
            cues.win();
            SpinProgress::Finished { winner_index }
        }
    }

    /// Grab the wheel at `pointer_angle`. Ignored while spinning.
    pub fn begin_drag(&mut self, pointer_angle: f64, now_ms: f64) {
        if self.spin.is_some() {
            return;
        }
        self.drag = Some(DragState {
            grab_offset: pointer_angle - self.rotation,
            last_angle: pointer_angle,
            last_time_ms: now_ms,
            velocity: 0.0,
        });
    }

    /// Follow the pointer during a drag, tracking angular velocity from the
    /// smallest wrapped angle difference. Ignored while spinning or not dragging.
    pub fn update_drag(&mut self, pointer_angle: f64, now_ms: f64) {
        if self.spin.is_some() {
            return;
        }
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let dt = now_ms - drag.last_time_ms;
        if dt > 0.0 {
            let mut diff = pointer_angle - drag.last_angle;
            while diff < -PI {
                diff += TAU;
            }
            while diff > PI {
                diff -= TAU;
            }
            drag.velocity = diff / dt;
        }
        self.rotation = pointer_angle - drag.grab_offset;
        drag.last_angle = pointer_angle;
        drag.last_time_ms = now_ms;
    }

    /// Release the wheel. A release above the flick threshold starts a spin
    /// seeded with the drag velocity; below it the wheel stays put.
    /// Returns whether a spin was started.
    pub fn end_drag(
        &mut self,
        candidate_count: usize,
        rng: &mut impl Rng,
        cues: &impl CueSink,
    ) -> Result<bool, GameError> {
        let Some(drag) = self.drag.take() else {
            return Ok(false);
        };
        if drag.velocity.abs() > FLICK_VELOCITY_MIN {
            self.begin_spin(
                candidate_count,
                Some(drag.velocity.abs() * FLICK_SPIN_SCALE),
                rng,
                cues,
            )?;
            return Ok(true);
        }
        Ok(false)
    }
}
