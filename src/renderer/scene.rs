//! Frame assembly
//!
//! Turns the simulation state into one triangle list: background, beat
//! flash, dust, ECG strip (grid, trace, particles) and the pulse origin.
//! Back-to-front order; later vertices draw on top.

use glam::Vec2;
use std::f32::consts::TAU;

use super::shapes;
use super::vertex::{Vertex, colors, with_alpha};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{MonitorState, WaveformGenerator};

/// Seconds for the background dust to drift one screen height
const DUST_CYCLE_SECS: f32 = 20.0;

/// Pixel rectangle the ECG trace and particles are drawn into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripLayout {
    pub min: Vec2,
    pub size: Vec2,
}

impl StripLayout {
    /// Fixed-height strip, padded horizontally, centered vertically
    pub fn for_viewport(width: f32, height: f32) -> Self {
        let strip_w = (width - 2.0 * ECG_STRIP_PADDING).max(1.0);
        let strip_h = ECG_STRIP_HEIGHT.min(height).max(1.0);
        Self {
            min: Vec2::new(ECG_STRIP_PADDING.min(width / 2.0), (height - strip_h) / 2.0),
            size: Vec2::new(strip_w, strip_h),
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Map a normalized strip position to pixels
    pub fn to_pixels(&self, normalized: Vec2) -> Vec2 {
        self.min + normalized * self.size
    }
}

/// Builds frames for a viewport
#[derive(Debug, Clone)]
pub struct SceneBuilder {
    pub width: f32,
    pub height: f32,
    generator: WaveformGenerator,
    segments: u32,
    dust: usize,
    glow: bool,
    beat_flash: bool,
    pulse_motion: bool,
}

impl SceneBuilder {
    pub fn new(width: f32, height: f32, settings: &Settings) -> Self {
        Self {
            width,
            height,
            generator: WaveformGenerator::new(settings.quality.waveform_samples()),
            segments: settings.quality.circle_segments(),
            dust: settings.quality.background_dust(),
            glow: settings.effective_glow(),
            beat_flash: settings.effective_beat_flash(),
            pulse_motion: settings.pulse_motion(),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn layout(&self) -> StripLayout {
        StripLayout::for_viewport(self.width, self.height)
    }

    /// The ECG trace for this frame in pixel coordinates
    pub fn ecg_points(&self, state: &MonitorState) -> Vec<Vec2> {
        let layout = self.layout();
        self.generator
            .sample(&state.heartbeat.wave_params(), layout.size.x, layout.size.y)
            .into_iter()
            .map(|p| p + layout.min)
            .collect()
    }

    /// Build the full triangle list for one frame
    pub fn build(&self, state: &MonitorState) -> Vec<Vertex> {
        let layout = self.layout();
        let origin = layout.to_pixels(crate::burst_origin());
        let pulse = state.heartbeat.pulse;

        let mut vertices = Vec::with_capacity(self.generator.samples() * 12 + 4096);

        self.background(&mut vertices);

        if self.beat_flash && pulse > 0.0 {
            let red = with_alpha(colors::PULSE_RED, pulse * 0.15);
            vertices.extend(shapes::radial_gradient(
                origin,
                500.0,
                red,
                with_alpha(red, 0.0),
                self.segments * 2,
            ));
        }

        self.dust(state, &mut vertices);

        vertices.extend(shapes::grid(layout.min, layout.max(), GRID_SPACING, colors::GRID));

        // ECG trace
        let points = self.ecg_points(state);
        let last = (points.len() - 1).max(1) as f32;
        if self.glow {
            vertices.extend(shapes::polyline(&points, 16.0, |_| colors::ECG_GLOW));
        }
        vertices.extend(shapes::polyline(&points, 4.0, |i| {
            shapes::ecg_gradient(i as f32 / last, 1.0)
        }));

        // Particles
        for particle in state.particles.iter() {
            let center = layout.to_pixels(particle.pos);
            let rgb = particle.color.rgb();
            let color = [rgb[0], rgb[1], rgb[2], particle.opacity];
            if self.glow {
                let glow = with_alpha(color, particle.opacity * 0.4);
                vertices.extend(shapes::radial_gradient(
                    center,
                    particle.draw_size() / 2.0 + 8.0,
                    glow,
                    with_alpha(glow, 0.0),
                    self.segments,
                ));
            }
            vertices.extend(shapes::particle_shape(
                particle.shape,
                center,
                particle.draw_size(),
                color,
                self.segments,
            ));
        }

        // Pulse origin
        let scale = if self.pulse_motion {
            1.0 + (pulse * TAU).sin() * 0.3
        } else {
            1.0
        };
        vertices.extend(shapes::radial_gradient(
            origin,
            30.0 * scale,
            colors::PULSE_RED,
            with_alpha(colors::PULSE_RED, 0.0),
            self.segments * 2,
        ));
        vertices.extend(shapes::circle(origin, 8.0 * scale, colors::PULSE_RED, self.segments));

        vertices
    }

    fn background(&self, vertices: &mut Vec<Vertex>) {
        let mid_y = self.height / 2.0;
        vertices.extend(shapes::rect(
            Vec2::ZERO,
            Vec2::new(self.width, mid_y),
            [
                colors::BACKGROUND_TOP,
                colors::BACKGROUND_TOP,
                colors::BACKGROUND_MID,
                colors::BACKGROUND_MID,
            ],
        ));
        vertices.extend(shapes::rect(
            Vec2::new(0.0, mid_y),
            Vec2::new(self.width, self.height),
            [
                colors::BACKGROUND_MID,
                colors::BACKGROUND_MID,
                colors::BACKGROUND_BOTTOM,
                colors::BACKGROUND_BOTTOM,
            ],
        ));
    }

    /// Slowly falling dust whose size and brightness follow the signal strength
    fn dust(&self, state: &MonitorState, vertices: &mut Vec<Vertex>) {
        if self.dust == 0 || self.width <= 0.0 || self.height <= 0.0 {
            return;
        }
        let secs = state.time_ticks as f32 * SIM_DT;
        let offset = (secs / DUST_CYCLE_SECS).fract() * self.height;
        let signal = state.heartbeat.signal_strength;
        let size = 2.0 + signal * 2.0;
        let color = with_alpha(colors::DUST, signal * 0.3 + 0.1);
        let count = self.dust as f32;

        for i in 0..self.dust {
            let fi = i as f32;
            let x = (fi * self.width / count + offset * 0.2).rem_euclid(self.width);
            let y = (fi * 19.0 + offset + (fi * 0.4).sin() * 40.0).rem_euclid(self.height);
            vertices.extend(shapes::circle(Vec2::new(x, y), size / 2.0, color, 6));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::QualityPreset;
    use crate::sim::beat;

    #[test]
    fn test_strip_layout() {
        let layout = StripLayout::for_viewport(800.0, 600.0);
        assert_eq!(layout.min, Vec2::new(40.0, 150.0));
        assert_eq!(layout.size, Vec2::new(720.0, 300.0));
        assert!(
            layout
                .to_pixels(Vec2::new(0.15, 0.5))
                .abs_diff_eq(Vec2::new(148.0, 300.0), 1e-3)
        );

        // Short viewport clamps the strip height
        let short = StripLayout::for_viewport(800.0, 200.0);
        assert_eq!(short.size.y, 200.0);
        assert_eq!(short.min.y, 0.0);
    }

    #[test]
    fn test_ecg_points_inside_strip_horizontally() {
        let settings = Settings::default();
        let scene = SceneBuilder::new(800.0, 600.0, &settings);
        let state = MonitorState::new(1);
        let points = scene.ecg_points(&state);

        assert_eq!(points.len(), settings.quality.waveform_samples());
        assert!((points[0].x - 40.0).abs() < 1e-4);
        assert!((points[points.len() - 1].x - 760.0).abs() < 1e-3);
    }

    #[test]
    fn test_resize_moves_trace() {
        let settings = Settings::default();
        let mut scene = SceneBuilder::new(800.0, 600.0, &settings);
        let state = MonitorState::new(1);

        scene.resize(1280.0, 720.0);
        assert_eq!(scene.layout(), StripLayout::for_viewport(1280.0, 720.0));
        let points = scene.ecg_points(&state);
        assert!((points[points.len() - 1].x - 1240.0).abs() < 1e-3);
    }

    #[test]
    fn test_particles_add_vertices() {
        let mut settings = Settings::default();
        settings.apply_preset(QualityPreset::Low);
        let scene = SceneBuilder::new(800.0, 600.0, &settings);
        let mut state = MonitorState::new(1);

        let before = scene.build(&state).len();
        let event = beat(&mut state);
        let after = scene.build(&state).len();

        // Every particle shape contributes at least 12 vertices
        assert!(after >= before + event.burst * 12);
    }

    #[test]
    fn test_beat_flash_respects_reduced_motion() {
        let mut state = MonitorState::new(1);
        beat(&mut state);

        let normal = SceneBuilder::new(800.0, 600.0, &Settings::default());
        let calm = SceneBuilder::new(
            800.0,
            600.0,
            &Settings {
                reduced_motion: true,
                ..Default::default()
            },
        );
        assert!(normal.build(&state).len() > calm.build(&state).len());
    }

    #[test]
    fn test_zero_viewport_does_not_panic() {
        let scene = SceneBuilder::new(0.0, 0.0, &Settings::default());
        let state = MonitorState::new(1);
        let vertices = scene.build(&state);
        assert!(vertices.iter().all(|v| v.position[0].is_finite() && v.position[1].is_finite()));
    }
}
