//! Finite-duration interpolation helpers.
//!
//! Every animation here is a plain state machine advanced by `dt` once per
//! tick and queried for its current value. Nothing schedules follow-up work:
//! a two-phase motion (up then down) is a single `PingPong` whose phase is
//! derived from its progress.

use rand::Rng;

/// Easing curves used by the avatar and station animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    /// Overshoots slightly before settling (hover pop).
    BackOut,
}

impl Ease {
    /// Map linear progress `t` in `[0, 1]` onto the curve.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::QuadIn => t * t,
            Ease::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Ease::BackOut => {
                const C1: f32 = 1.5;
                const C3: f32 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
        }
    }
}

/// A one-shot interpolation from `from` to `to` over `duration` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    ease: Ease,
}

impl Tween {
    /// A tween resting at `value`.
    #[must_use]
    pub fn at(value: f32) -> Self {
        Self { from: value, to: value, duration: 0.0, elapsed: 0.0, ease: Ease::Linear }
    }

    #[must_use]
    pub fn new(from: f32, to: f32, duration: f32, ease: Ease) -> Self {
        Self { from, to, duration: duration.max(0.0), elapsed: 0.0, ease }
    }

    /// Linear progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    #[must_use]
    pub fn finished(&self) -> bool {
        self.progress() >= 1.0
    }

    #[must_use]
    pub fn value(&self) -> f32 {
        self.from + (self.to - self.from) * self.ease.apply(self.progress())
    }

    #[must_use]
    pub fn target(&self) -> f32 {
        self.to
    }

    /// Advance by `dt` seconds and return the new value.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.value()
    }

    /// Restart towards `to`, continuing from wherever the tween is now so a
    /// retarget mid-flight never jumps.
    pub fn retarget(&mut self, to: f32, duration: f32, ease: Ease) {
        if (to - self.to).abs() <= f32::EPSILON && !self.finished() {
            return;
        }
        *self = Tween::new(self.value(), to, duration, ease);
    }
}

/// Out-and-back motion: `0 → peak → 0`, each half lasting `half_duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PingPong {
    peak: f32,
    half_duration: f32,
    elapsed: f32,
    active: bool,
    out_ease: Ease,
    back_ease: Ease,
}

impl PingPong {
    #[must_use]
    pub fn new(peak: f32, half_duration: f32, out_ease: Ease, back_ease: Ease) -> Self {
        Self {
            peak,
            half_duration: half_duration.max(f32::EPSILON),
            elapsed: 0.0,
            active: false,
            out_ease,
            back_ease,
        }
    }

    /// Start (or restart) the motion from zero.
    pub fn trigger(&mut self) {
        self.elapsed = 0.0;
        self.active = true;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Change the shape without interrupting a running motion.
    pub fn reshape(&mut self, peak: f32, half_duration: f32) {
        self.peak = peak;
        self.half_duration = half_duration.max(f32::EPSILON);
    }

    #[must_use]
    pub fn value(&self) -> f32 {
        if !self.active {
            return 0.0;
        }
        let t = self.elapsed / self.half_duration;
        if t < 1.0 {
            self.peak * self.out_ease.apply(t)
        } else {
            self.peak * (1.0 - self.back_ease.apply(t - 1.0))
        }
    }

    /// Advance by `dt` seconds and return the current offset.
    pub fn advance(&mut self, dt: f32) -> f32 {
        if self.active {
            self.elapsed += dt.max(0.0);
            if self.elapsed >= self.half_duration * 2.0 {
                self.active = false;
                self.elapsed = 0.0;
            }
        }
        self.value()
    }
}

/// Limb swing while walking, decaying back to rest when idle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkCycle {
    pub phase: f32,
    pub amplitude: f32,
    swing: f32,
}

impl Default for WalkCycle {
    fn default() -> Self {
        Self { phase: 0.0, amplitude: 0.6, swing: 0.0 }
    }
}

impl WalkCycle {
    /// Advance the cycle and return the current swing angle (radians).
    ///
    /// Opposite limbs use the negated angle.
    pub fn tick(&mut self, dt: f32, moving: bool, cycle_speed: f32) -> f32 {
        if moving {
            self.phase += dt * cycle_speed;
            self.swing = self.phase.sin() * self.amplitude;
        } else {
            let factor = (dt * 3.0).min(1.0);
            self.swing *= 1.0 - factor;
        }
        self.swing
    }
}

/// Randomized eye blink.
///
/// Each tick a blink starts with probability `1 - e^(-rate * dt)`, which is
/// the chance of at least one event of a Poisson process with `rate` events
/// per second. The expected blink frequency is therefore the same at any frame
/// rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blink {
    pub rate_per_second: f32,
    pub speed: f32,
    progress: Option<f32>,
}

impl Blink {
    #[must_use]
    pub fn new(rate_per_second: f32, speed: f32) -> Self {
        Self { rate_per_second, speed, progress: None }
    }

    #[must_use]
    pub fn is_blinking(&self) -> bool {
        self.progress.is_some()
    }

    /// Probability that a blink starts during a tick of `dt` seconds.
    #[must_use]
    pub fn trigger_probability(&self, dt: f32) -> f64 {
        let p = 1.0 - (-f64::from(self.rate_per_second.max(0.0)) * f64::from(dt.max(0.0))).exp();
        p.clamp(0.0, 1.0)
    }

    /// Advance the blink and return the eye's vertical scale (1 = open).
    pub fn tick<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) -> f32 {
        match self.progress {
            None => {
                if rng.gen_bool(self.trigger_probability(dt)) {
                    self.progress = Some(0.0);
                }
            }
            Some(p) => {
                let next = p + dt * self.speed;
                self.progress = (next < 1.0).then_some(next);
            }
        }
        self.eye_scale()
    }

    #[must_use]
    pub fn eye_scale(&self) -> f32 {
        match self.progress {
            None => 1.0,
            Some(p) if p < 0.5 => 1.0 - p * 2.0,
            Some(p) => (p - 0.5) * 2.0,
        }
    }
}
