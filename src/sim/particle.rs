//! Heartbeat data particles
//!
//! Particles live in normalized viewport coordinates and are aged once per
//! render step. They are spawned in bursts on each beat and removed as soon
//! as they have faded out.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Palette a particle is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    Cyan,
    Blue,
    Mint,
    Purple,
}

impl ParticleColor {
    pub const ALL: [ParticleColor; 4] = [
        ParticleColor::Cyan,
        ParticleColor::Blue,
        ParticleColor::Mint,
        ParticleColor::Purple,
    ];

    /// Linear RGB components
    pub fn rgb(&self) -> [f32; 3] {
        match self {
            ParticleColor::Cyan => [0.2, 0.85, 0.95],
            ParticleColor::Blue => [0.2, 0.45, 1.0],
            ParticleColor::Mint => [0.35, 0.95, 0.75],
            ParticleColor::Purple => [0.7, 0.35, 0.95],
        }
    }
}

/// Outline a particle is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleShape {
    Circle,
    Square,
    Diamond,
    Hexagon,
}

impl ParticleShape {
    pub const ALL: [ParticleShape; 4] = [
        ParticleShape::Circle,
        ParticleShape::Square,
        ParticleShape::Diamond,
        ParticleShape::Hexagon,
    ];
}

/// A single data particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    /// Normalized position (0-1 across the ECG strip)
    pub pos: Vec2,
    /// Per-step delta in normalized units
    pub vel: Vec2,
    /// Base size in pixels
    pub size: f32,
    pub color: ParticleColor,
    pub shape: ParticleShape,
    /// 1.0 at spawn, fades to 0
    pub opacity: f32,
    /// 1.0 at spawn, shrinks to MIN_SCALE
    pub scale: f32,
    pub active: bool,
    /// Render steps lived
    #[serde(default)]
    pub age: u32,
}

impl Particle {
    /// Advance one render step
    pub fn step(&mut self) {
        if !self.active {
            return;
        }
        self.pos += self.vel;
        self.age += 1;
        // Derived from age rather than accumulated, so the fade lands on zero
        // at exactly 1 / OPACITY_DECAY steps.
        let age = self.age as f32;
        self.opacity = (1.0 - OPACITY_DECAY * age).max(0.0);
        self.scale = (1.0 - SCALE_DECAY * age).max(MIN_SCALE);
        if self.opacity <= 0.0 {
            self.active = false;
        }
    }

    /// Size on screen after scaling
    pub fn draw_size(&self) -> f32 {
        self.size * self.scale
    }
}

/// The live particle collection plus the cumulative spawn counter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    /// Total particles ever spawned ("data points processed")
    data_processed: u64,
    next_id: u32,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Age every particle by one step and drop the ones that have faded
    pub fn tick(&mut self) {
        for particle in self.particles.iter_mut() {
            particle.step();
        }
        self.particles.retain(|p| p.active);
    }

    /// Spawn `count` particles at `origin`
    pub fn burst<R: Rng + ?Sized>(&mut self, origin: Vec2, count: usize, rng: &mut R) {
        self.particles.reserve(count);
        for _ in 0..count {
            let id = self.next_id;
            self.next_id = self.next_id.wrapping_add(1);

            let vel = Vec2::new(
                rng.random_range(0.003..=0.008),
                rng.random_range(-0.002..=0.002),
            );
            let color = ParticleColor::ALL[rng.random_range(0..ParticleColor::ALL.len())];
            let shape = ParticleShape::ALL[rng.random_range(0..ParticleShape::ALL.len())];

            self.particles.push(Particle {
                id,
                pos: origin,
                vel,
                size: rng.random_range(4.0..=12.0),
                color,
                shape,
                opacity: 1.0,
                scale: 1.0,
                active: true,
                age: 0,
            });
        }
        self.data_processed += count as u64;
    }

    /// Spawn a burst of BURST_MIN..=BURST_MAX particles, returning the count
    pub fn burst_random<R: Rng + ?Sized>(&mut self, origin: Vec2, rng: &mut R) -> usize {
        let count = rng.random_range(BURST_MIN..=BURST_MAX);
        self.burst(origin, count, rng);
        count
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn active_count(&self) -> usize {
        self.particles.iter().filter(|p| p.active).count()
    }

    pub fn data_processed(&self) -> u64 {
        self.data_processed
    }
}
