//! Monitor state and core simulation types
//!
//! Everything the render and beat drivers mutate lives here. State is
//! process-lifetime only; a restart begins again from the seed.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::particle::ParticleSystem;
use super::waveform::WaveParams;
use crate::consts::*;

/// Beat impulse over time: jumps to 1.0 on a beat, holds, then eases back to 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PulseEnvelope {
    /// Seconds since the last beat (None once fully decayed)
    since_beat: Option<f32>,
}

impl PulseEnvelope {
    /// Restart the envelope at full intensity
    pub fn trigger(&mut self) {
        self.since_beat = Some(0.0);
    }

    pub fn advance(&mut self, dt: f32) {
        if let Some(t) = self.since_beat {
            let t = t + dt;
            self.since_beat = if t >= PULSE_HOLD + PULSE_DECAY {
                None
            } else {
                Some(t)
            };
        }
    }

    /// Current intensity in [0, 1]
    pub fn intensity(&self) -> f32 {
        match self.since_beat {
            None => 0.0,
            Some(t) if t < PULSE_HOLD => 1.0,
            Some(t) => {
                // Ease-in: slow start, fast finish
                let u = ((t - PULSE_HOLD) / PULSE_DECAY).clamp(0.0, 1.0);
                1.0 - u * u
            }
        }
    }
}

/// Heart simulation values read by the waveform and the HUD
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatState {
    /// Accumulated waveform phase (never wrapped here)
    pub phase: f32,
    /// Beat impulse in [0, 1]
    pub pulse: f32,
    /// Waveform gain: 1.0 at rest, up to 1.3 at the beat peak
    pub amplitude: f32,
    /// Displayed heart rate, redrawn on each beat
    pub bpm: u32,
    /// Display-only signal quality, 0.87..=0.97
    pub signal_strength: f32,
    pub envelope: PulseEnvelope,
}

impl Default for HeartbeatState {
    fn default() -> Self {
        Self {
            phase: 0.0,
            pulse: 0.0,
            amplitude: BASE_AMPLITUDE,
            bpm: INITIAL_BPM,
            signal_strength: 0.95,
            envelope: PulseEnvelope::default(),
        }
    }
}

impl HeartbeatState {
    /// Refresh pulse and amplitude from the envelope
    pub fn sync_pulse(&mut self) {
        self.pulse = self.envelope.intensity();
        self.amplitude = BASE_AMPLITUDE + (BEAT_AMPLITUDE - BASE_AMPLITUDE) * self.pulse;
    }

    /// Signal strength as a function of phase
    pub fn signal_for_phase(phase: f32) -> f32 {
        0.92 + (phase * 3.0).sin() * 0.05
    }

    pub fn wave_params(&self) -> WaveParams {
        WaveParams {
            phase: self.phase,
            amplitude: self.amplitude,
            pulse: self.pulse,
        }
    }
}

/// Complete visualization state (deterministic for a given seed)
#[derive(Debug, Clone)]
pub struct MonitorState {
    /// Seed the RNG was created from
    pub seed: u64,
    /// Drives burst contents and bpm draws
    pub rng: Pcg32,
    pub heartbeat: HeartbeatState,
    pub particles: ParticleSystem,
    /// Render steps run
    pub time_ticks: u64,
    /// Whole seconds counted by the metrics driver
    pub elapsed_secs: u64,
    /// Beats fired so far
    pub beats: u64,
}

impl MonitorState {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            heartbeat: HeartbeatState::default(),
            particles: ParticleSystem::new(),
            time_ticks: 0,
            elapsed_secs: 0,
            beats: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let mut env = PulseEnvelope::default();
        assert_eq!(env, PulseEnvelope::default());

        env.trigger();
        assert_eq!(env.intensity(), 1.0);

        env.advance(0.1);
        assert_eq!(env.intensity(), 1.0, "held through the first 150ms");

        env.advance(0.2); // 0.3s: halfway through decay
        let mid = env.intensity();
        assert!((mid - 0.75).abs() < 1e-4, "ease-in decay, got {mid}");

        env.advance(0.2); // 0.5s: done
        assert_eq!(env.intensity(), 0.0);
        assert_eq!(env, PulseEnvelope::default(), "fully decayed envelope resets");
    }

    #[test]
    fn test_envelope_retrigger() {
        let mut env = PulseEnvelope::default();
        env.trigger();
        env.advance(0.4);
        assert!(env.intensity() < 0.5);
        env.trigger();
        assert_eq!(env.intensity(), 1.0);
    }

    #[test]
    fn test_amplitude_follows_pulse() {
        let mut hb = HeartbeatState::default();
        hb.envelope.trigger();
        hb.sync_pulse();
        assert_eq!(hb.pulse, 1.0);
        assert!((hb.amplitude - BEAT_AMPLITUDE).abs() < 1e-6);

        hb.envelope.advance(1.0);
        hb.sync_pulse();
        assert_eq!(hb.pulse, 0.0);
        assert_eq!(hb.amplitude, BASE_AMPLITUDE);
    }

    #[test]
    fn test_signal_range() {
        for i in 0..1000 {
            let s = HeartbeatState::signal_for_phase(i as f32 * 0.02);
            assert!((0.87..=0.97).contains(&s));
        }
    }
}
