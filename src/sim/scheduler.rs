//! Heartbeat scheduling
//!
//! Runs the render, beat and metrics drivers off one fixed-step timeline.
//! The host calls `advance` with its frame delta; every driver is counted in
//! render steps, so the whole run is reproducible from the seed and the
//! sequence of deltas.

use super::state::MonitorState;
use super::tick::{BeatEvent, beat, metrics_tick, tick};
use crate::beat_period;
use crate::consts::*;

/// Summary of one `advance` call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Render steps run
    pub steps: u32,
    /// Beats fired, in order
    pub beats: Vec<BeatEvent>,
    /// Seconds added to the elapsed counter
    pub seconds: u32,
    /// True when simulated time was lost, either to the MAX_FRAME_DT clamp
    /// or to backlog beyond MAX_SUBSTEPS
    pub dropped: bool,
}

/// Accumulator state for the three periodic drivers
#[derive(Debug, Clone)]
pub struct HeartbeatScheduler {
    accumulator: f32,
    since_beat: f32,
    since_second: f32,
    period: f32,
    /// When set, no driver advances
    pub paused: bool,
}

impl HeartbeatScheduler {
    /// Scheduler whose first beat comes one period after start
    pub fn new(state: &MonitorState) -> Self {
        Self {
            accumulator: 0.0,
            since_beat: 0.0,
            since_second: 0.0,
            period: beat_period(state.heartbeat.bpm),
            paused: false,
        }
    }

    /// Seconds between the last beat and the next one
    pub fn beat_period(&self) -> f32 {
        self.period
    }

    /// Seconds until the next beat fires
    pub fn until_next_beat(&self) -> f32 {
        (self.period - self.since_beat).max(0.0)
    }

    /// Feed a frame delta (seconds) and run as many fixed steps as it covers
    pub fn advance(&mut self, state: &mut MonitorState, dt: f32) -> FrameReport {
        let mut report = FrameReport::default();
        if self.paused {
            return report;
        }

        // Stalls (tab switch, debugger) are clamped, not replayed
        if dt > MAX_FRAME_DT {
            log::trace!("Clamping {:.3}s frame to {:.3}s", dt, MAX_FRAME_DT);
            report.dropped = true;
        }
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        while self.accumulator >= SIM_DT && report.steps < MAX_SUBSTEPS {
            self.step(state, &mut report);
            self.accumulator -= SIM_DT;
        }

        // Host fell behind; drop the rest instead of catching up
        if self.accumulator >= SIM_DT {
            log::trace!("Dropping {:.3}s of backlog", self.accumulator);
            self.accumulator = 0.0;
            report.dropped = true;
        }

        report
    }

    /// One render step plus any beat or second that falls due within it
    fn step(&mut self, state: &mut MonitorState, report: &mut FrameReport) {
        tick(state);
        report.steps += 1;

        self.since_beat += SIM_DT;
        if self.since_beat >= self.period {
            self.since_beat -= self.period;
            let event = beat(state);
            // bpm changed, so the next interval does too
            self.period = beat_period(event.bpm);
            report.beats.push(event);
        }

        self.since_second += SIM_DT;
        if self.since_second >= METRICS_PERIOD {
            self.since_second -= METRICS_PERIOD;
            metrics_tick(state);
            report.seconds += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run `secs` of simulated time in 60 Hz frames
    fn run(scheduler: &mut HeartbeatScheduler, state: &mut MonitorState, secs: f32) -> Vec<FrameReport> {
        let frames = (secs * 60.0).round() as usize;
        (0..frames)
            .map(|_| scheduler.advance(state, 1.0 / 60.0))
            .collect()
    }

    #[test]
    fn test_first_beat_after_one_period() {
        let mut state = MonitorState::new(42);
        let mut scheduler = HeartbeatScheduler::new(&state);
        assert!((scheduler.beat_period() - 60.0 / 72.0).abs() < 1e-6);

        // Just short of 60/72 s
        let reports = run(&mut scheduler, &mut state, 0.75);
        assert!(reports.iter().all(|r| r.beats.is_empty()));
        assert_eq!(state.beats, 0);

        run(&mut scheduler, &mut state, 0.2);
        assert_eq!(state.beats, 1);
    }

    #[test]
    fn test_period_follows_new_bpm() {
        let mut state = MonitorState::new(7);
        let mut scheduler = HeartbeatScheduler::new(&state);

        let mut seen = 0;
        for report in run(&mut scheduler, &mut state, 20.0) {
            for event in &report.beats {
                assert!((BPM_MIN..=BPM_MAX).contains(&event.bpm));
                seen += 1;
            }
            if !report.beats.is_empty() {
                let bpm = state.heartbeat.bpm;
                assert!((scheduler.beat_period() - 60.0 / bpm as f32).abs() < 1e-6);
            }
        }
        // 20s at 68..=76 BPM
        assert!((22..=26).contains(&seen), "saw {seen} beats");
    }

    #[test]
    fn test_elapsed_seconds() {
        let mut state = MonitorState::new(1);
        let mut scheduler = HeartbeatScheduler::new(&state);
        run(&mut scheduler, &mut state, 5.05);
        assert_eq!(state.elapsed_secs, 5);
    }

    #[test]
    fn test_paused_freezes_everything() {
        let mut state = MonitorState::new(1);
        let mut scheduler = HeartbeatScheduler::new(&state);
        scheduler.paused = true;
        let reports = run(&mut scheduler, &mut state, 3.0);
        assert!(reports.iter().all(|r| r.steps == 0));
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.heartbeat.phase, 0.0);
        assert_eq!(state.beats, 0);
    }

    #[test]
    fn test_long_frame_is_capped() {
        let mut state = MonitorState::new(1);
        let mut scheduler = HeartbeatScheduler::new(&state);
        // A five second stall is clamped to MAX_FRAME_DT
        let report = scheduler.advance(&mut state, 5.0);
        assert!(report.steps <= MAX_SUBSTEPS);
        assert_eq!(report.steps, (MAX_FRAME_DT / SIM_DT) as u32);
        assert_eq!(state.elapsed_secs, 0);
    }

    #[test]
    fn test_stall_reports_dropped_time() {
        let mut state = MonitorState::new(1);
        let mut scheduler = HeartbeatScheduler::new(&state);
        assert!(scheduler.advance(&mut state, 5.0).dropped);

        // A frame right at the clamp loses nothing
        assert!(!scheduler.advance(&mut state, MAX_FRAME_DT).dropped);
        // Ordinary frames never report drops
        let reports = run(&mut scheduler, &mut state, 2.0);
        assert!(reports.iter().all(|r| !r.dropped));
    }

    #[test]
    fn test_until_next_beat_counts_down() {
        let mut state = MonitorState::new(3);
        let mut scheduler = HeartbeatScheduler::new(&state);
        assert!((scheduler.until_next_beat() - scheduler.beat_period()).abs() < 1e-6);

        run(&mut scheduler, &mut state, 0.5);
        let left = scheduler.until_next_beat();
        assert!(left > 0.0 && left < scheduler.beat_period());
        assert!((left - (60.0 / 72.0 - 0.5)).abs() < 0.02, "left {left}");
    }

    #[test]
    fn test_negative_delta_ignored() {
        let mut state = MonitorState::new(1);
        let mut scheduler = HeartbeatScheduler::new(&state);
        let report = scheduler.advance(&mut state, -1.0);
        assert_eq!(report.steps, 0);
    }

    #[test]
    fn test_particle_population_stays_bounded() {
        let mut state = MonitorState::new(2024);
        let mut scheduler = HeartbeatScheduler::new(&state);
        run(&mut scheduler, &mut state, 30.0);
        // Particles live 2s, beats come at most 76/min: at most 3 bursts alive
        assert!(state.particles.active_count() <= 3 * BURST_MAX);
        assert!(state.particles.data_processed() >= state.particles.active_count() as u64);
    }
}
