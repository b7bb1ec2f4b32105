use crate::{MAX_TIME, MIN_TIME};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
ADSR Envelope
=============

A linear ADSR envelope evaluated directly from elapsed time. Nothing is
integrated sample by sample: given how long ago the note started (and, once
released, how long ago it was released) the gain is a pure function of the
four parameters.

Vocabulary
----------

  t_on        Seconds since note-on. Drives Attack, Decay and Sustain.

  t_off       Seconds since note-off. Drives Release only.

  gain        The envelope output (0.0 to 1.0). The voice multiplies it by
              its velocity, so a voice's audible level peaks at `velocity`
              and settles at `sustain * velocity`.

  release     Starts from the gain captured at the instant of note-off, not
  start       from the sustain level. Releasing during the attack therefore
              ramps down from wherever the attack had reached.


The Shape
---------

  Gain
    1.0 ┐     ╱╲
        │    ╱  ╲___________
    S   │   ╱               ╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Time
        Attack Decay  Sustain  Release
         (A)   (D)      (S)      (R)

  Attack   t_on < A            gain = t_on / A
  Decay    A <= t_on < A + D   gain = 1 - (1 - S) * (t_on - A) / D
  Sustain  t_on >= A + D       gain = S
  Release  released            gain = start * (1 - t_off / R), 0 once t_off >= R

Every segment is a straight line, so the envelope is continuous at each
boundary and the expected value at any instant is trivial to compute in a
test.


Parameter Ranges
----------------

  attack, decay, release   clamped to [0.001, 2.0] seconds
  sustain                  clamped to [0.0, 1.0]

The lower bound on the time parameters keeps every division well defined.
Parameters are clamped once, on construction; an Envelope can never hold an
out-of-range value.
*/

pub const DEFAULT_ATTACK: f32 = 0.05;
pub const DEFAULT_DECAY: f32 = 0.1;
pub const DEFAULT_SUSTAIN: f32 = 0.7;
pub const DEFAULT_RELEASE: f32 = 0.2;

/// Which segment of the envelope a given instant falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,    // Voice is free, gain = 0
    Attack,  // Ramping 0 → 1
    Decay,   // Ramping 1 → sustain
    Sustain, // Holding sustain while the note is held
    Release, // Ramping captured gain → 0
}

/// ADSR parameters. Immutable: edits produce a new value.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(from = "RawEnvelope")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    attack: f32,  // seconds to ramp 0 → 1
    decay: f32,   // seconds to ramp 1 → sustain
    sustain: f32, // level held while the note is down
    release: f32, // seconds to ramp captured gain → 0
}

/// Deserialization goes through the clamping constructor.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawEnvelope {
    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,
}

#[cfg(feature = "serde")]
impl From<RawEnvelope> for Envelope {
    fn from(raw: RawEnvelope) -> Self {
        Envelope::adsr(raw.attack, raw.decay, raw.sustain, raw.release)
    }
}

#[inline]
fn clamp_time(seconds: f32) -> f32 {
    if seconds.is_nan() {
        MIN_TIME
    } else {
        seconds.clamp(MIN_TIME, MAX_TIME)
    }
}

impl Envelope {
    /// The envelope every note-on starts with.
    pub fn new() -> Self {
        Self::adsr(DEFAULT_ATTACK, DEFAULT_DECAY, DEFAULT_SUSTAIN, DEFAULT_RELEASE)
    }

    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack: clamp_time(attack),
            decay: clamp_time(decay),
            sustain: crate::clamp_unit(sustain),
            release: clamp_time(release),
        }
    }

    pub fn attack(&self) -> f32 {
        self.attack
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }

    pub fn sustain(&self) -> f32 {
        self.sustain
    }

    pub fn release(&self) -> f32 {
        self.release
    }

    pub fn with_attack(self, attack: f32) -> Self {
        Self::adsr(attack, self.decay, self.sustain, self.release)
    }

    pub fn with_decay(self, decay: f32) -> Self {
        Self::adsr(self.attack, decay, self.sustain, self.release)
    }

    pub fn with_sustain(self, sustain: f32) -> Self {
        Self::adsr(self.attack, self.decay, sustain, self.release)
    }

    pub fn with_release(self, release: f32) -> Self {
        Self::adsr(self.attack, self.decay, self.sustain, release)
    }

    /// Gain while the note is held, `t_on` seconds after note-on.
    pub fn gate_gain(&self, t_on: f64) -> f32 {
        let t = t_on.max(0.0);
        let attack = self.attack as f64;
        let decay = self.decay as f64;
        let sustain = self.sustain as f64;

        let gain = if t < attack {
            t / attack
        } else if t < attack + decay {
            1.0 - (1.0 - sustain) * ((t - attack) / decay)
        } else {
            sustain
        };

        (gain as f32).clamp(0.0, 1.0)
    }

    /// Gain `t_off` seconds after note-off, starting from `start_gain`.
    ///
    /// Exactly zero once `t_off >= release`.
    pub fn release_gain(&self, start_gain: f32, t_off: f64) -> f32 {
        let t = t_off.max(0.0);
        let release = self.release as f64;
        if t >= release {
            return 0.0;
        }

        let start = crate::clamp_unit(start_gain) as f64;
        ((start * (1.0 - t / release)) as f32).clamp(0.0, 1.0)
    }

    /// Segment for a note `t_on` seconds old, released `t_off` seconds ago.
    pub fn stage(&self, t_on: f64, t_off: Option<f64>) -> EnvelopeStage {
        match t_off {
            Some(t) if t >= self.release as f64 => EnvelopeStage::Idle,
            Some(_) => EnvelopeStage::Release,
            None if t_on < self.attack as f64 => EnvelopeStage::Attack,
            None if t_on < self.attack as f64 + self.decay as f64 => EnvelopeStage::Decay,
            None => EnvelopeStage::Sustain,
        }
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn parameters_are_clamped_on_construction() {
        let env = Envelope::adsr(0.0, 5.0, 1.5, -1.0);
        assert_eq!(env.attack(), 0.001);
        assert_eq!(env.decay(), 2.0);
        assert_eq!(env.sustain(), 1.0);
        assert_eq!(env.release(), 0.001);

        let env = Envelope::adsr(f32::NAN, 0.1, f32::NAN, 0.2);
        assert_eq!(env.attack(), 0.001);
        assert_eq!(env.sustain(), 0.0);
    }

    #[test]
    fn default_shape() {
        let env = Envelope::default();
        assert_eq!(env, Envelope::adsr(0.05, 0.1, 0.7, 0.2));
    }

    #[test]
    fn attack_ramps_linearly() {
        let env = Envelope::adsr(0.1, 0.1, 0.5, 0.1);
        assert_eq!(env.gate_gain(0.0), 0.0);
        assert!((env.gate_gain(0.05) - 0.5).abs() < EPS);
        assert_eq!(env.stage(0.05, None), EnvelopeStage::Attack);
    }

    #[test]
    fn continuous_at_attack_boundary() {
        let env = Envelope::adsr(0.02, 0.3, 0.4, 0.1);
        let before = env.gate_gain(0.02 - 1e-7);
        let after = env.gate_gain(0.02 + 1e-7);
        assert!((before - after).abs() < 1e-3, "{before} vs {after}");
        assert!((after - 1.0).abs() < 1e-3);
    }

    #[test]
    fn decay_lands_on_sustain() {
        let env = Envelope::adsr(0.01, 0.1, 0.6, 0.2);
        assert!((env.gate_gain(0.01 + 0.05) - 0.8).abs() < EPS);
        let entry = env.gate_gain(0.1105);
        assert!((entry - 0.6).abs() < EPS);
        assert_eq!(env.stage(0.1105, None), EnvelopeStage::Sustain);
        assert!((env.gate_gain(30.0) - 0.6).abs() < EPS);
    }

    #[test]
    fn release_starts_from_captured_gain() {
        let env = Envelope::adsr(0.1, 0.1, 0.5, 0.2);
        let captured = env.gate_gain(0.05);
        assert!((env.release_gain(captured, 0.0) - captured).abs() < EPS);
        assert!((env.release_gain(captured, 0.1) - captured * 0.5).abs() < EPS);
        assert_eq!(env.stage(0.05, Some(0.1)), EnvelopeStage::Release);
    }

    #[test]
    fn release_reaches_exact_zero() {
        let env = Envelope::adsr(0.01, 0.01, 0.9, 0.05);
        assert!(env.release_gain(0.9, 0.049) > 0.0);
        assert_eq!(env.release_gain(0.9, 0.0501), 0.0);
        assert_eq!(env.release_gain(0.9, 10.0), 0.0);
        assert_eq!(env.stage(1.0, Some(0.0501)), EnvelopeStage::Idle);
    }

    #[test]
    fn edits_keep_other_parameters() {
        let env = Envelope::adsr(0.1, 0.2, 0.3, 0.4).with_sustain(0.9).with_release(9.0);
        assert_eq!(env.attack(), 0.1);
        assert_eq!(env.decay(), 0.2);
        assert_eq!(env.sustain(), 0.9);
        assert_eq!(env.release(), 2.0);
    }
}
