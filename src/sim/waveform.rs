//! ECG waveform sampling
//!
//! A stateless generator that turns (phase, amplitude, pulse) into a polyline
//! shaped like a stylized PQRST cycle. Screen coordinates: y grows downward,
//! so negative offsets draw upward.

use glam::Vec2;
use std::f32::consts::PI;

use crate::consts::{DEFAULT_WAVEFORM_SAMPLES, MIN_WAVEFORM_SAMPLES};

/// Inputs for one sampled frame of the waveform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    /// Accumulated phase (advanced every render step)
    pub phase: f32,
    /// Vertical gain, 1.0 at rest and raised on each beat
    pub amplitude: f32,
    /// Beat impulse in [0, 1]
    pub pulse: f32,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            phase: 0.0,
            amplitude: 1.0,
            pulse: 0.0,
        }
    }
}

/// Which part of the cardiac cycle a cycle position falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveFeature {
    Baseline,
    P,
    Q,
    R,
    S,
    T,
}

impl WaveFeature {
    /// Classify a position within the cycle (expected in [0, 1))
    pub fn at(cycle_pos: f32) -> Self {
        if cycle_pos > 0.2 && cycle_pos < 0.3 {
            WaveFeature::P
        } else if cycle_pos > 0.35 && cycle_pos < 0.5 {
            let qrs = (cycle_pos - 0.35) / 0.15;
            if qrs < 0.2 {
                WaveFeature::Q
            } else if qrs < 0.6 {
                WaveFeature::R
            } else {
                WaveFeature::S
            }
        } else if cycle_pos > 0.55 && cycle_pos < 0.75 {
            WaveFeature::T
        } else {
            WaveFeature::Baseline
        }
    }
}

/// Position within the repeating cycle for a horizontal progress value.
///
/// Always lands in [0, 1), including when the phase has run ahead of the
/// progress (the usual case once the animation has been going a while).
#[inline]
pub fn cycle_position(progress: f32, phase: f32) -> f32 {
    let c = (progress - phase).rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if c >= 1.0 { 0.0 } else { c }
}

/// Small sinusoidal ripple under the whole trace
#[inline]
pub fn baseline_offset(progress: f32, phase: f32) -> f32 {
    ((progress - phase) * PI * 8.0).sin() * 3.0
}

/// Vertical offset contributed by the PQRST feature at `cycle_pos`
pub fn feature_offset(cycle_pos: f32, amplitude: f32, pulse: f32) -> f32 {
    match WaveFeature::at(cycle_pos) {
        WaveFeature::Baseline => 0.0,
        WaveFeature::P => {
            let p = (cycle_pos - 0.2) / 0.1;
            -(p * PI).sin() * 15.0 * amplitude
        }
        WaveFeature::Q => {
            let q = (cycle_pos - 0.35) / 0.15;
            (q * PI * 5.0).sin() * 8.0 * amplitude
        }
        WaveFeature::R => {
            let q = (cycle_pos - 0.35) / 0.15;
            let r = (q - 0.2) / 0.4;
            -(r * PI).sin() * 80.0 * amplitude * (1.0 + pulse * 0.5)
        }
        WaveFeature::S => {
            let q = (cycle_pos - 0.35) / 0.15;
            let s = (q - 0.6) / 0.4;
            (s * PI).sin() * 20.0 * amplitude
        }
        WaveFeature::T => {
            let t = (cycle_pos - 0.55) / 0.2;
            -(t * PI).sin() * 25.0 * amplitude
        }
    }
}

/// Samples the ECG trace across a strip of the given size
#[derive(Debug, Clone, Copy)]
pub struct WaveformGenerator {
    samples: usize,
}

impl Default for WaveformGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_WAVEFORM_SAMPLES)
    }
}

impl WaveformGenerator {
    /// Sample counts below two are raised to two so both edges are covered
    pub fn new(samples: usize) -> Self {
        Self {
            samples: samples.max(MIN_WAVEFORM_SAMPLES),
        }
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Vertical offset from the midline at horizontal progress `progress`
    pub fn offset_at(&self, progress: f32, params: &WaveParams) -> f32 {
        let cycle_pos = cycle_position(progress, params.phase);
        baseline_offset(progress, params.phase)
            + feature_offset(cycle_pos, params.amplitude, params.pulse)
    }

    /// Sample the trace into a polyline spanning [0, width] horizontally
    /// and centered on height / 2.
    pub fn sample(&self, params: &WaveParams, width: f32, height: f32) -> Vec<Vec2> {
        let mid_y = height / 2.0;
        let last = (self.samples - 1) as f32;

        (0..self.samples)
            .map(|i| {
                let progress = i as f32 / last;
                Vec2::new(progress * width, mid_y + self.offset_at(progress, params))
            })
            .collect()
    }
}
