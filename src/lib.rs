//! Heartbeat Flow - an animated ECG and data-particle visualization
//!
//! Core modules:
//! - `sim`: Deterministic simulation (waveform sampling, particles, heartbeat scheduling)
//! - `hud`: Display values derived from simulation state
//! - `renderer`: Tessellation and WebGPU rendering pipeline
//! - `settings`: User preferences and quality presets

pub mod hud;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use hud::HudSnapshot;
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Visualization configuration constants
pub mod consts {
    /// Fixed render-driver timestep (the original 16ms animation timer)
    pub const SIM_DT: f32 = 0.016;
    /// Maximum render steps per frame; the rest of the backlog is dropped
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta accepted from the host loop (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Phase advance per render step
    pub const PHASE_STEP: f32 = 0.02;

    /// Waveform defaults
    pub const DEFAULT_WAVEFORM_SAMPLES: usize = 300;
    pub const MIN_WAVEFORM_SAMPLES: usize = 2;
    pub const BASE_AMPLITUDE: f32 = 1.0;
    pub const BEAT_AMPLITUDE: f32 = 1.3;

    /// Particle decay per render step
    pub const OPACITY_DECAY: f32 = 0.008;
    pub const SCALE_DECAY: f32 = 0.005;
    /// Particles never shrink below this scale
    pub const MIN_SCALE: f32 = 0.1;

    /// Burst sizes (inclusive)
    pub const BURST_MIN: usize = 15;
    pub const BURST_MAX: usize = 25;

    /// Heart rate range (inclusive) and the rate at startup
    pub const BPM_MIN: u32 = 68;
    pub const BPM_MAX: u32 = 76;
    pub const INITIAL_BPM: u32 = 72;

    /// Pulse envelope timing (seconds): full intensity, then eased decay
    pub const PULSE_HOLD: f32 = 0.15;
    pub const PULSE_DECAY: f32 = 0.3;

    /// Metrics counter period (seconds)
    pub const METRICS_PERIOD: f32 = 1.0;

    /// Normalized viewport position where bursts originate
    pub const ORIGIN_X: f32 = 0.15;
    pub const ORIGIN_Y: f32 = 0.5;

    /// Height of the ECG strip in pixels
    pub const ECG_STRIP_HEIGHT: f32 = 300.0;
    /// Horizontal padding around the ECG strip
    pub const ECG_STRIP_PADDING: f32 = 40.0;
    /// ECG background grid spacing in pixels
    pub const GRID_SPACING: f32 = 20.0;
}

/// Normalized point where every particle burst starts
#[inline]
pub fn burst_origin() -> Vec2 {
    Vec2::new(consts::ORIGIN_X, consts::ORIGIN_Y)
}

/// Seconds between beats for a heart rate
#[inline]
pub fn beat_period(bpm: u32) -> f32 {
    60.0 / bpm.max(1) as f32
}

/// Format a second count as `mm:ss` (minutes are not wrapped at 60)
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(59), "00:59");
        assert_eq!(format_elapsed(61), "01:01");
        assert_eq!(format_elapsed(3600), "60:00");
        assert_eq!(format_elapsed(6005), "100:05");
    }

    #[test]
    fn test_beat_period() {
        assert!((beat_period(60) - 1.0).abs() < 1e-6);
        assert!((beat_period(72) - 60.0 / 72.0).abs() < 1e-6);
        // Zero never divides by zero
        assert!(beat_period(0).is_finite());
    }
}
