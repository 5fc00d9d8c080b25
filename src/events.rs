//! Boundary traits for external effect sinks.
//!
//! The core emits discrete cues (audio) and lifecycle notifications
//! (commentary/voice) through these traits. All methods are fire-and-forget
//! with no-op defaults, so a missing sink never affects correctness.

/// Receives discrete audio cues from the wheel.
pub trait CueSink {
    /// A spin has started.
    fn spin_start(&self) {}
    /// The wheel crossed into a new slice.
    fn tick(&self) {}
    /// A winner was resolved. Always the last cue of a spin.
    fn win(&self) {}
    /// Both teams are assembled; fire the celebratory effect.
    fn round_complete(&self) {}
}

/// Receives round lifecycle notifications (e.g. a voice commentator).
pub trait CommentarySink {
    /// A new round has started.
    fn round_started(&self) {}
    /// The wheel resolved a winner with this display name.
    fn winner_announced(&self, _name: &str) {}
}

/// Sink that ignores every event. Useful when no audio or commentary is wired.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl CueSink for NullSink {}
impl CommentarySink for NullSink {}
