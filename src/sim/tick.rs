//! Fixed timestep simulation steps
//!
//! The three drivers' actions: the render step, the heartbeat event and the
//! metrics second. Scheduling lives in `scheduler`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{HeartbeatState, MonitorState};
use crate::burst_origin;
use crate::consts::*;

/// What a heartbeat did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeatEvent {
    /// Sequence number (1-based)
    pub index: u64,
    /// Particles spawned by this beat's burst
    pub burst: usize,
    /// Heart rate drawn for the next interval
    pub bpm: u32,
}

/// Advance the render driver by one fixed step
pub fn tick(state: &mut MonitorState) {
    state.time_ticks += 1;

    let hb = &mut state.heartbeat;
    hb.phase += PHASE_STEP;
    hb.envelope.advance(SIM_DT);
    hb.sync_pulse();
    hb.signal_strength = HeartbeatState::signal_for_phase(hb.phase);

    state.particles.tick();
}

/// Fire a heartbeat: pulse, particle burst, new heart rate
pub fn beat(state: &mut MonitorState) -> BeatEvent {
    state.heartbeat.envelope.trigger();
    state.heartbeat.sync_pulse();

    let burst = state.particles.burst_random(burst_origin(), &mut state.rng);
    state.heartbeat.bpm = state.rng.random_range(BPM_MIN..=BPM_MAX);
    state.beats += 1;

    let event = BeatEvent {
        index: state.beats,
        burst,
        bpm: state.heartbeat.bpm,
    };
    log::debug!(
        "Beat {}: burst of {} particles, next at {} BPM",
        event.index,
        event.burst,
        event.bpm
    );
    event
}

/// Advance the elapsed-time counter by one second
pub fn metrics_tick(state: &mut MonitorState) {
    state.elapsed_secs += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_advances_phase() {
        let mut state = MonitorState::new(12345);
        for _ in 0..50 {
            tick(&mut state);
        }
        assert_eq!(state.time_ticks, 50);
        assert!((state.heartbeat.phase - 1.0).abs() < 1e-4);
        assert!(
            (state.heartbeat.signal_strength - HeartbeatState::signal_for_phase(state.heartbeat.phase))
                .abs()
                < 1e-6
        );
    }

    #[test]
    fn test_beat_bursts_and_redraws_bpm() {
        let mut state = MonitorState::new(12345);
        let event = beat(&mut state);

        assert_eq!(event.index, 1);
        assert!((BURST_MIN..=BURST_MAX).contains(&event.burst));
        assert!((BPM_MIN..=BPM_MAX).contains(&event.bpm));
        assert_eq!(state.heartbeat.bpm, event.bpm);
        assert_eq!(state.particles.active_count(), event.burst);
        assert_eq!(state.particles.data_processed(), event.burst as u64);
        assert_eq!(state.heartbeat.pulse, 1.0);
        assert!((state.heartbeat.amplitude - BEAT_AMPLITUDE).abs() < 1e-6);
    }

    #[test]
    fn test_pulse_decays_after_beat() {
        let mut state = MonitorState::new(7);
        beat(&mut state);
        // 150ms hold is about 9 steps of 16ms
        for _ in 0..9 {
            tick(&mut state);
        }
        assert_eq!(state.heartbeat.pulse, 1.0);
        // Fully decayed well before the next beat
        for _ in 0..30 {
            tick(&mut state);
        }
        assert_eq!(state.heartbeat.pulse, 0.0);
        assert_eq!(state.heartbeat.amplitude, BASE_AMPLITUDE);
    }

    #[test]
    fn test_metrics_tick() {
        let mut state = MonitorState::new(1);
        metrics_tick(&mut state);
        metrics_tick(&mut state);
        assert_eq!(state.elapsed_secs, 2);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = MonitorState::new(99999);
        let mut state2 = MonitorState::new(99999);

        for _ in 0..5 {
            let e1 = beat(&mut state1);
            let e2 = beat(&mut state2);
            assert_eq!(e1, e2);
            for _ in 0..20 {
                tick(&mut state1);
                tick(&mut state2);
            }
        }

        assert_eq!(state1.particles.iter().count(), state2.particles.iter().count());
        for (a, b) in state1.particles.iter().zip(state2.particles.iter()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.color, b.color);
            assert_eq!(a.shape, b.shape);
        }
    }
}
