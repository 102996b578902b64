//! Simulation time.
//!
//! Nothing in the core reads a wall clock. The caller passes the current
//! simulation time in milliseconds, and [`SimClock`] turns successive values
//! into a clamped elapsed time plus a *frame scale*: the ratio between the
//! elapsed time and the reference frame the per-frame speeds were tuned for.
//! At 60 frames per second the scale is 1.0; at 30 it is 2.0.
//!
//! [`FixedStep`] is an accumulator for drivers that want to run the engine
//! at a fixed rate regardless of how time arrives.

use serde::{Deserialize, Serialize};

/// Timing of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameTime {
    /// Simulation time at the end of the frame
    pub now_ms: f64,
    /// Clamped time since the previous frame
    pub elapsed_ms: f64,
    /// `elapsed_ms / reference_frame_ms`
    pub scale: f64,
}

impl FrameTime {
    /// Frame scale as `f32`, for multiplying per-frame displacements.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn scale_f32(&self) -> f32 {
        self.scale as f32
    }
}

/// Converts caller-supplied timestamps into frame timings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimClock {
    reference_frame_ms: f64,
    max_delta_ms: f64,
    now_ms: f64,
    last_ms: Option<f64>,
}

impl SimClock {
    /// Creates a clock starting at time zero.
    #[must_use]
    pub const fn new(reference_frame_ms: f64, max_delta_ms: f64) -> Self {
        Self {
            reference_frame_ms,
            max_delta_ms,
            now_ms: 0.0,
            last_ms: None,
        }
    }

    /// Returns the time of the most recent frame.
    #[must_use]
    pub const fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Returns the reference frame length.
    #[must_use]
    pub const fn reference_frame_ms(&self) -> f64 {
        self.reference_frame_ms
    }

    /// Advances to `now_ms`.
    ///
    /// The first frame counts as exactly one reference frame. Time running
    /// backwards yields a zero-length frame; long stalls are clamped to the
    /// maximum delta.
    pub fn advance_to(&mut self, now_ms: f64) -> FrameTime {
        let elapsed_ms = match self.last_ms {
            None => self.reference_frame_ms,
            Some(last) => (now_ms - last).clamp(0.0, self.max_delta_ms),
        };
        let elapsed_ms = if elapsed_ms.is_finite() { elapsed_ms } else { 0.0 };

        if now_ms.is_finite() {
            self.last_ms = Some(now_ms);
            self.now_ms = now_ms;
        }

        FrameTime {
            now_ms: self.now_ms,
            elapsed_ms,
            scale: elapsed_ms / self.reference_frame_ms,
        }
    }
}

/// Fixed-rate accumulator.
///
/// ```
/// use ironfront_core::clock::FixedStep;
///
/// let mut step = FixedStep::new(10.0);
/// assert_eq!(step.push(25.0), 2);
/// assert_eq!(step.push(5.0), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedStep {
    step_ms: f64,
    accumulator_ms: f64,
}

impl FixedStep {
    /// Creates an accumulator emitting one step per `step_ms`.
    #[must_use]
    pub const fn new(step_ms: f64) -> Self {
        Self {
            step_ms,
            accumulator_ms: 0.0,
        }
    }

    /// Returns the step length.
    #[must_use]
    pub const fn step_ms(&self) -> f64 {
        self.step_ms
    }

    /// Adds elapsed time and returns how many whole steps are now due.
    pub fn push(&mut self, elapsed_ms: f64) -> u32 {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(self.step_ms) || !valid(elapsed_ms) {
            return 0;
        }
        self.accumulator_ms += elapsed_ms;
        let mut steps = 0;
        while self.accumulator_ms >= self.step_ms {
            self.accumulator_ms -= self.step_ms;
            steps += 1;
        }
        steps
    }

    /// Fraction of a step left in the accumulator, in `[0, 1)`.
    #[must_use]
    pub fn remainder(&self) -> f64 {
        if self.step_ms > 0.0 {
            self.accumulator_ms / self.step_ms
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f64 = 1000.0 / 60.0;

    mod clock_tests {
        use super::*;

        #[test]
        fn first_frame_is_one_reference_frame() {
            let mut clock = SimClock::new(FRAME, 250.0);
            let frame = clock.advance_to(5000.0);
            assert!((frame.elapsed_ms - FRAME).abs() < 1e-9);
            assert!((frame.scale - 1.0).abs() < 1e-9);
            assert_eq!(clock.now_ms(), 5000.0);
        }

        #[test]
        fn scale_tracks_elapsed_time() {
            let mut clock = SimClock::new(FRAME, 250.0);
            clock.advance_to(0.0);
            let frame = clock.advance_to(2.0 * FRAME);
            assert!((frame.scale - 2.0).abs() < 1e-9);
        }

        #[test]
        fn stalls_are_clamped() {
            let mut clock = SimClock::new(FRAME, 250.0);
            clock.advance_to(0.0);
            assert_eq!(clock.advance_to(10_000.0).elapsed_ms, 250.0);
        }

        #[test]
        fn backwards_time_is_zero_length() {
            let mut clock = SimClock::new(FRAME, 250.0);
            clock.advance_to(1000.0);
            let frame = clock.advance_to(900.0);
            assert_eq!(frame.elapsed_ms, 0.0);
            assert_eq!(frame.scale, 0.0);
        }

        #[test]
        fn non_finite_time_is_ignored() {
            let mut clock = SimClock::new(FRAME, 250.0);
            clock.advance_to(1000.0);
            let frame = clock.advance_to(f64::NAN);
            assert_eq!(frame.elapsed_ms, 0.0);
            assert_eq!(clock.now_ms(), 1000.0);
        }
    }

    mod fixed_step_tests {
        use super::*;

        #[test]
        fn carries_remainder() {
            let mut step = FixedStep::new(16.0);
            assert_eq!(step.push(10.0), 0);
            assert_eq!(step.push(10.0), 1);
            assert!((step.remainder() - 0.25).abs() < 1e-9);
        }

        #[test]
        fn ignores_negative_time() {
            let mut step = FixedStep::new(16.0);
            assert_eq!(step.push(-100.0), 0);
            assert_eq!(step.remainder(), 0.0);
        }
    }
}
