//! Deterministic simulation module
//!
//! All visualization logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by spawn order)
//! - No rendering or platform dependencies

pub mod particle;
pub mod scheduler;
pub mod state;
pub mod tick;
pub mod waveform;

pub use particle::{Particle, ParticleColor, ParticleShape, ParticleSystem};
pub use scheduler::{FrameReport, HeartbeatScheduler};
pub use state::{HeartbeatState, MonitorState, PulseEnvelope};
pub use tick::{BeatEvent, beat, metrics_tick, tick};
pub use waveform::{
    WaveFeature, WaveParams, WaveformGenerator, baseline_offset, cycle_position, feature_offset,
};
