//! HUD display values
//!
//! Everything the overlay shows, derived from the simulation state in one
//! place so the browser DOM updater and the native logger agree.

use serde::{Deserialize, Serialize};

use crate::format_elapsed;
use crate::sim::MonitorState;

/// Signal strength above which the signal card pulses
pub const SIGNAL_ACTIVE_THRESHOLD: f32 = 0.9;

/// A frame's worth of overlay values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub bpm: u32,
    /// Signal strength as a rounded percentage
    pub signal_percent: u8,
    pub signal_active: bool,
    pub data_processed: u64,
    pub active_particles: usize,
    /// Runtime as `mm:ss`
    pub runtime: String,
    pub show_metrics: bool,
}

impl HudSnapshot {
    pub fn capture(state: &MonitorState, show_metrics: bool) -> Self {
        let signal = state.heartbeat.signal_strength;
        Self {
            bpm: state.heartbeat.bpm,
            signal_percent: signal_percent(signal),
            signal_active: signal > SIGNAL_ACTIVE_THRESHOLD,
            data_processed: state.particles.data_processed(),
            active_particles: state.particles.active_count(),
            runtime: format_elapsed(state.elapsed_secs),
            show_metrics,
        }
    }

    /// Single-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "{} BPM | signal {}% | {} data points | {} particles | {}",
            self.bpm, self.signal_percent, self.data_processed, self.active_particles, self.runtime
        )
    }
}

/// Convert a 0-1 signal strength into a 0-100 percentage
pub fn signal_percent(signal: f32) -> u8 {
    (signal * 100.0).round().clamp(0.0, 100.0) as u8
}
