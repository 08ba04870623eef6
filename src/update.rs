//! Per-frame animation step and the scroll/resize mappings.

use crate::camera::Camera;
use crate::clock::SceneClock;
use crate::host::{FrameScheduler, Viewport};
use crate::scene::{HeroScene, ModelSlot, SceneParams};

pub const ROCKET_CLIMB_PER_TICK: f32 = 0.12;
pub const ROCKET_CEILING: f32 = 45.0;
pub const ROCKET_FLOOR: f32 = -45.0;
pub const ROCKET_SWAY_RATE: f32 = 2.0;
pub const ROCKET_SWAY_AMPLITUDE: f32 = 0.015;
pub const UFO_SPIN_PER_TICK: f32 = 0.01;
pub const UFO_BOB_RATE: f32 = 1.5;
pub const UFO_BOB_AMPLITUDE: f32 = 1.2;
pub const SCROLL_CAMERA_RATE: f32 = -0.008;
pub const SCROLL_RING_RATE: f32 = 0.001;

/// Everything the animation mutates, owned in one place and passed explicitly
/// to the handlers. The renderer reads it; nothing else writes it.
pub struct Backdrop {
    pub scene: HeroScene,
    pub camera: Camera,
    pub clock: SceneClock,
    pub viewport: Viewport,
}

impl Backdrop {
    pub fn new(params: &SceneParams, viewport: Viewport) -> Self {
        Self {
            scene: HeroScene::new(params),
            camera: Camera::new(viewport.aspect()),
            clock: SceneClock::new(),
            viewport,
        }
    }

    /// One animation tick. Advances scene time by the fixed step, moves every
    /// animated entity from its own fixed parameters, and re-registers for
    /// the next tick. Never blocks, never fails.
    pub fn advance(&mut self, scheduler: &dyn FrameScheduler) {
        let time = self.clock.tick();

        for particle in &mut self.scene.particles {
            particle.angle += particle.speed;
            particle.position.x = particle.angle.cos() * particle.radius;
            particle.position.z = particle.angle.sin() * particle.radius;
        }

        for (i, bead) in self.scene.beads.iter_mut().enumerate() {
            bead.rotation_y = time + i as f32 * 0.01;
        }

        let rocket = &mut self.scene.rocket;
        rocket.position.y += ROCKET_CLIMB_PER_TICK;
        rocket.rotation_z = (time * ROCKET_SWAY_RATE).sin() * ROCKET_SWAY_AMPLITUDE;
        // Hard reset, not a modulo: the overshoot beyond the ceiling is
        // discarded and the climb restarts exactly at the floor.
        if rocket.position.y > ROCKET_CEILING {
            rocket.position.y = ROCKET_FLOOR;
        }

        // Absent model: skip entirely. No placeholder moves, nothing fails.
        if let ModelSlot::Ready(ufo) = &mut self.scene.ufo {
            ufo.position.y = ufo.base_y + (time * UFO_BOB_RATE).sin() * UFO_BOB_AMPLITUDE;
            ufo.rotation_y += UFO_SPIN_PER_TICK;
        }

        scheduler.schedule_frame();
    }

    /// Scroll mapping. Stateless in the offset: the same offset always
    /// produces the same pose.
    pub fn handle_scroll(&mut self, offset: f32) {
        self.camera.position.y = offset * SCROLL_CAMERA_RATE;
        self.scene.ring.rotation_z = offset * SCROLL_RING_RATE;
    }

    /// Resize mapping: exact aspect from the new dimensions, viewport
    /// recorded for the surface reconfigure.
    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
        self.viewport = Viewport::new(width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TIME_STEP;

    struct NullScheduler;

    impl FrameScheduler for NullScheduler {
        fn schedule_frame(&self) {}
    }

    fn small_backdrop() -> Backdrop {
        let params = SceneParams {
            star_count: 10,
            particle_count: 8,
            bead_count: 16,
            seed: 7,
        };
        Backdrop::new(&params, Viewport::new(1280, 720))
    }

    #[test]
    fn bead_rotation_is_time_plus_index_offset() {
        let mut backdrop = small_backdrop();

        backdrop.advance(&NullScheduler);
        backdrop.advance(&NullScheduler);
        backdrop.advance(&NullScheduler);

        let time = backdrop.clock.time();
        for (i, bead) in backdrop.scene.beads.iter().enumerate() {
            assert_eq!(bead.rotation_y, time + i as f32 * 0.01);
        }
    }

    #[test]
    fn particles_hold_their_orbit_radius_and_height() {
        let mut backdrop = small_backdrop();
        let heights: Vec<f32> = backdrop
            .scene
            .particles
            .iter()
            .map(|p| p.position.y)
            .collect();

        for _ in 0..500 {
            backdrop.advance(&NullScheduler);
        }

        for (particle, y0) in backdrop.scene.particles.iter().zip(&heights) {
            let planar = particle.position.x.hypot(particle.position.z);
            assert!((planar - particle.radius).abs() < 1e-3);
            assert_eq!(particle.position.y, *y0);
        }
    }

    #[test]
    fn rocket_resets_to_floor_after_crossing_ceiling() {
        let mut backdrop = small_backdrop();

        // From y = -10 the climb needs ceil(55 / 0.12) ticks to pass 45.
        let mut reset_seen = false;
        for _ in 0..1000 {
            let before = backdrop.scene.rocket.position.y;
            backdrop.advance(&NullScheduler);
            let after = backdrop.scene.rocket.position.y;
            if before + ROCKET_CLIMB_PER_TICK > ROCKET_CEILING {
                assert_eq!(after, ROCKET_FLOOR);
                reset_seen = true;
                break;
            }
        }
        assert!(reset_seen, "rocket never wrapped in 1000 ticks");
    }

    #[test]
    fn rocket_sway_follows_the_clock() {
        let mut backdrop = small_backdrop();
        backdrop.advance(&NullScheduler);

        let time = backdrop.clock.time();
        assert_eq!(
            backdrop.scene.rocket.rotation_z,
            (time * ROCKET_SWAY_RATE).sin() * ROCKET_SWAY_AMPLITUDE
        );
    }

    #[test]
    fn pending_model_is_skipped_without_panic() {
        let mut backdrop = small_backdrop();
        for _ in 0..100 {
            backdrop.advance(&NullScheduler);
        }
        assert!(matches!(backdrop.scene.ufo, ModelSlot::Pending));
    }

    #[test]
    fn ready_model_bobs_and_spins() {
        let mut backdrop = small_backdrop();
        backdrop.scene.model_ready();

        backdrop.advance(&NullScheduler);
        backdrop.advance(&NullScheduler);

        let time = backdrop.clock.time();
        let ModelSlot::Ready(ufo) = &backdrop.scene.ufo else {
            panic!("model slot lost its latch");
        };
        assert_eq!(
            ufo.position.y,
            ufo.base_y + (time * UFO_BOB_RATE).sin() * UFO_BOB_AMPLITUDE
        );
        assert_eq!(ufo.rotation_y, 2.0 * UFO_SPIN_PER_TICK);
    }

    #[test]
    fn model_bob_oscillates_without_drift() {
        let mut backdrop = small_backdrop();
        backdrop.scene.model_ready();

        for _ in 0..10_000 {
            backdrop.advance(&NullScheduler);
            let ModelSlot::Ready(ufo) = &backdrop.scene.ufo else {
                panic!("model slot lost its latch");
            };
            assert!((ufo.position.y - ufo.base_y).abs() <= UFO_BOB_AMPLITUDE + 1e-4);
        }
    }

    #[test]
    fn scroll_mapping_is_exact_and_idempotent() {
        let mut backdrop = small_backdrop();

        backdrop.handle_scroll(1000.0);
        assert_eq!(backdrop.camera.position.y, -8.0);
        assert_eq!(backdrop.scene.ring.rotation_z, 1.0);

        backdrop.handle_scroll(1000.0);
        assert_eq!(backdrop.camera.position.y, -8.0);
        assert_eq!(backdrop.scene.ring.rotation_z, 1.0);

        backdrop.handle_scroll(0.0);
        assert_eq!(backdrop.camera.position.y, 0.0);
        assert_eq!(backdrop.scene.ring.rotation_z, 0.0);
    }

    #[test]
    fn resize_sets_exact_aspect() {
        let mut backdrop = small_backdrop();
        backdrop.handle_resize(800, 600);

        assert_eq!(backdrop.camera.aspect, 800.0 / 600.0);
        assert_eq!(backdrop.viewport, Viewport::new(800, 600));
    }

    #[test]
    fn advance_ticks_exactly_one_step() {
        let mut backdrop = small_backdrop();

        backdrop.advance(&NullScheduler);
        assert_eq!(backdrop.clock.time(), TIME_STEP);

        backdrop.advance(&NullScheduler);
        assert_eq!(backdrop.clock.time(), TIME_STEP + TIME_STEP);
    }
}
