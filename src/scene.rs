//! Scene graph for the hero backdrop: starfield, DNA helix, orbiting
//! particles, sprite planes, lights and the asynchronously filled model slot.
//!
//! Construction happens once at startup from seeded randomness; per-frame
//! mutation is the updater's job and every entity carries the fixed
//! parameters that mutation derives from.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const CYAN: u32 = 0x00ffff;
pub const MAGENTA: u32 = 0xff006e;
pub const BACKGROUND: u32 = 0x0a0e27;
pub const AMBIENT: u32 = 0x4a90e2;
pub const UFO_GLOW: u32 = 0x88ffff;

pub const STAR_SIZE: f32 = 0.7;
pub const BEAD_RADIUS: f32 = 0.2;
pub const BEAD_EMISSIVE_INTENSITY: f32 = 0.5;
pub const PARTICLE_RADIUS: f32 = 0.3;
pub const PARTICLE_EMISSIVE_INTENSITY: f32 = 0.7;
pub const AVATAR_RADIUS: f32 = 6.0;
pub const RING_INNER_RADIUS: f32 = 6.3;
pub const RING_OUTER_RADIUS: f32 = 6.7;
pub const RING_OPACITY: f32 = 0.6;
pub const ROCKET_WIDTH: f32 = 5.0;
pub const ROCKET_HEIGHT: f32 = 8.0;

/// Convert an `0xRRGGBB` color to RGB components in `[0, 1]`.
pub fn hex_color(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// Closed form for bead `index` of `count`: eight turns of radius 3 spanning
/// height -15..15, centered at x = -15.
pub fn helix_position(index: usize, count: usize) -> Vec3 {
    let f = index as f32 / count as f32;
    let angle = f * PI * 8.0;
    Vec3::new(angle.cos() * 3.0 - 15.0, f * 30.0 - 15.0, angle.sin() * 3.0)
}

/// Construction-time knobs; defaults are the scene as designed.
#[derive(Clone, Debug)]
pub struct SceneParams {
    pub star_count: usize,
    pub particle_count: usize,
    pub bead_count: usize,
    pub seed: u64,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            star_count: 3000,
            particle_count: 150,
            bead_count: 200,
            seed: 0,
        }
    }
}

/// Static point sprites filling the far field.
#[derive(Clone, Debug)]
pub struct Starfield {
    pub positions: Vec<Vec3>,
    pub size: f32,
}

/// One sphere of the helix. Position never changes; the updater spins it
/// about its own vertical axis.
#[derive(Clone, Debug)]
pub struct HelixBead {
    pub position: Vec3,
    pub rotation_y: f32,
}

/// Tetrahedron on a circular orbit in its own horizontal plane.
/// `angle`, `radius` and `speed` are fixed at creation; only `angle`
/// accumulates and `position` follows it.
#[derive(Clone, Debug)]
pub struct Particle {
    pub angle: f32,
    pub radius: f32,
    pub speed: f32,
    pub position: Vec3,
    pub color: Vec3,
    pub emissive: Vec3,
}

/// Textured circle showing the site avatar. Static.
#[derive(Clone, Debug)]
pub struct Avatar {
    pub position: Vec3,
}

/// Glowing annulus just behind the avatar; its roll angle tracks scroll.
#[derive(Clone, Debug)]
pub struct Ring {
    pub position: Vec3,
    pub rotation_z: f32,
}

/// Sprite plane that climbs, sways and wraps around.
#[derive(Clone, Debug)]
pub struct Rocket {
    pub position: Vec3,
    pub rotation_z: f32,
}

/// Transform state of the loaded model.
#[derive(Clone, Debug)]
pub struct Ufo {
    pub position: Vec3,
    pub base_y: f32,
    pub rotation_y: f32,
    pub scale: f32,
}

impl Ufo {
    pub fn new() -> Self {
        Self {
            position: Vec3::new(-10.0, 5.0, 0.0),
            base_y: 5.0,
            rotation_y: 0.0,
            scale: 3.0,
        }
    }
}

impl Default for Ufo {
    fn default() -> Self {
        Self::new()
    }
}

/// One-way latch for the asynchronous model load. Starts `Pending`, flips to
/// `Ready` or `Failed` at most once per session.
#[derive(Clone, Debug)]
pub enum ModelSlot {
    Pending,
    Ready(Ufo),
    Failed,
}

#[derive(Clone, Debug)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub range: f32,
}

/// The whole scene. Created once, mutated every frame, never rebuilt.
#[derive(Clone, Debug)]
pub struct HeroScene {
    pub stars: Starfield,
    pub beads: Vec<HelixBead>,
    pub particles: Vec<Particle>,
    pub avatar: Avatar,
    pub ring: Ring,
    pub rocket: Rocket,
    pub ufo: ModelSlot,
    pub lights: [PointLight; 2],
    pub ambient_color: Vec3,
    pub ambient_intensity: f32,
    pub background: Vec3,
    pub fog_near: f32,
    pub fog_far: f32,
}

impl HeroScene {
    pub fn new(params: &SceneParams) -> Self {
        let mut rng = StdRng::seed_from_u64(params.seed);

        let stars = Starfield {
            positions: (0..params.star_count)
                .map(|_| {
                    Vec3::new(
                        rng.gen_range(-100.0..100.0),
                        rng.gen_range(-100.0..100.0),
                        rng.gen_range(-100.0..100.0),
                    )
                })
                .collect(),
            size: STAR_SIZE,
        };

        let beads = (0..params.bead_count)
            .map(|i| HelixBead {
                position: helix_position(i, params.bead_count),
                rotation_y: 0.0,
            })
            .collect();

        // Color and emissive are independent draws, so a particle may glow
        // in the other accent color than it is painted in.
        let particles = (0..params.particle_count)
            .map(|_| {
                let angle = rng.gen_range(0.0..TAU);
                let radius = rng.gen_range(15.0..40.0);
                let speed = rng.gen_range(0.001..0.004);
                let y = rng.gen_range(-20.0..20.0);
                Particle {
                    angle,
                    radius,
                    speed,
                    position: Vec3::new(angle.cos() * radius, y, angle.sin() * radius),
                    color: hex_color(if rng.gen_bool(0.5) { CYAN } else { MAGENTA }),
                    emissive: hex_color(if rng.gen_bool(0.5) { CYAN } else { MAGENTA }),
                }
            })
            .collect();

        Self {
            stars,
            beads,
            particles,
            avatar: Avatar {
                position: Vec3::new(30.0, 0.0, 5.0),
            },
            ring: Ring {
                position: Vec3::new(30.0, 0.0, 4.9),
                rotation_z: 0.0,
            },
            rocket: Rocket {
                position: Vec3::new(27.0, -10.0, 20.0),
                rotation_z: 0.0,
            },
            ufo: ModelSlot::Pending,
            lights: [
                PointLight {
                    position: Vec3::new(20.0, 10.0, 10.0),
                    color: hex_color(CYAN),
                    intensity: 2.0,
                    range: 50.0,
                },
                PointLight {
                    position: Vec3::new(-20.0, -10.0, 5.0),
                    color: hex_color(MAGENTA),
                    intensity: 1.5,
                    range: 50.0,
                },
            ],
            ambient_color: hex_color(AMBIENT),
            ambient_intensity: 0.3,
            background: hex_color(BACKGROUND),
            fog_near: 50.0,
            fog_far: 100.0,
        }
    }

    /// Latch the model slot to ready. Only a pending slot flips.
    pub fn model_ready(&mut self) {
        if matches!(self.ufo, ModelSlot::Pending) {
            self.ufo = ModelSlot::Ready(Ufo::new());
        }
    }

    /// Latch the model slot to failed. Only a pending slot flips.
    pub fn model_failed(&mut self) {
        if matches!(self.ufo, ModelSlot::Pending) {
            self.ufo = ModelSlot::Failed;
        }
    }

    /// Light that hovers above the model, present only once it is loaded.
    pub fn ufo_light(&self) -> Option<PointLight> {
        match &self.ufo {
            ModelSlot::Ready(ufo) => Some(PointLight {
                position: ufo.position + Vec3::new(0.0, 2.0, 0.0),
                color: hex_color(UFO_GLOW),
                intensity: 1.5,
                range: 20.0,
            }),
            _ => None,
        }
    }
}
