use std::cell::RefCell;

use hero_backdrop::clock::TIME_STEP;
use hero_backdrop::scene::{ModelSlot, SceneParams};
use hero_backdrop::update::{
    ROCKET_CLIMB_PER_TICK, SCROLL_CAMERA_RATE, SCROLL_RING_RATE, UFO_BOB_AMPLITUDE, UFO_BOB_RATE,
};
use hero_backdrop::{dispatch, Backdrop, FrameScheduler, HostSignal, Viewport};

/// Mock scheduler for testing
struct MockScheduler {
    scheduled: RefCell<usize>,
}

impl MockScheduler {
    fn new() -> Self {
        Self {
            scheduled: RefCell::new(0),
        }
    }

    fn count(&self) -> usize {
        *self.scheduled.borrow()
    }
}

impl FrameScheduler for MockScheduler {
    fn schedule_frame(&self) {
        *self.scheduled.borrow_mut() += 1;
    }
}

fn test_params() -> SceneParams {
    SceneParams {
        star_count: 50,
        particle_count: 20,
        bead_count: 30,
        seed: 42,
    }
}

fn test_backdrop() -> Backdrop {
    Backdrop::new(&test_params(), Viewport::new(1280, 720))
}

#[cfg(test)]
mod frame_tests {
    use super::*;

    #[test]
    fn test_fixed_step_ignores_wall_clock() {
        let mut backdrop = test_backdrop();
        let scheduler = MockScheduler::new();

        dispatch(&mut backdrop, HostSignal::Frame, &scheduler);
        std::thread::sleep(std::time::Duration::from_millis(30));
        dispatch(&mut backdrop, HostSignal::Frame, &scheduler);

        assert_eq!(backdrop.clock.time(), TIME_STEP + TIME_STEP);
    }

    #[test]
    fn test_every_frame_reschedules_exactly_once() {
        let mut backdrop = test_backdrop();
        let scheduler = MockScheduler::new();

        for _ in 0..25 {
            dispatch(&mut backdrop, HostSignal::Frame, &scheduler);
        }

        assert_eq!(scheduler.count(), 25);
    }

    #[test]
    fn test_beads_spin_in_lockstep() {
        let mut backdrop = test_backdrop();
        let scheduler = MockScheduler::new();

        for _ in 0..17 {
            dispatch(&mut backdrop, HostSignal::Frame, &scheduler);
        }

        let time = backdrop.clock.time();
        for (i, bead) in backdrop.scene.beads.iter().enumerate() {
            assert_eq!(bead.rotation_y, time + i as f32 * 0.01);
        }
    }

    #[test]
    fn test_particle_angles_advance_by_their_own_speed() {
        let backdrop_start = test_backdrop();
        let mut backdrop = test_backdrop();
        let scheduler = MockScheduler::new();

        let frames = 12;
        for _ in 0..frames {
            dispatch(&mut backdrop, HostSignal::Frame, &scheduler);
        }

        for (before, after) in backdrop_start
            .scene
            .particles
            .iter()
            .zip(&backdrop.scene.particles)
        {
            let expected = (0..frames).fold(before.angle, |a, _| a + before.speed);
            assert_eq!(after.angle, expected);
            assert_eq!(after.position.x, after.angle.cos() * after.radius);
            assert_eq!(after.position.z, after.angle.sin() * after.radius);
        }
    }

    #[test]
    fn test_rocket_climbs_every_frame() {
        let mut backdrop = test_backdrop();
        let scheduler = MockScheduler::new();
        let start = backdrop.scene.rocket.position.y;

        dispatch(&mut backdrop, HostSignal::Frame, &scheduler);

        assert_eq!(
            backdrop.scene.rocket.position.y,
            start + ROCKET_CLIMB_PER_TICK
        );
    }
}

#[cfg(test)]
mod scroll_tests {
    use super::*;

    #[test]
    fn test_scroll_maps_linearly_to_camera_and_ring() {
        let mut backdrop = test_backdrop();
        let scheduler = MockScheduler::new();

        dispatch(
            &mut backdrop,
            HostSignal::Scroll { offset: 1000.0 },
            &scheduler,
        );
        assert_eq!(backdrop.camera.position.y, 1000.0 * SCROLL_CAMERA_RATE);
        assert_eq!(backdrop.scene.ring.rotation_z, 1000.0 * SCROLL_RING_RATE);

        dispatch(
            &mut backdrop,
            HostSignal::Scroll { offset: 2500.0 },
            &scheduler,
        );
        assert_eq!(backdrop.camera.position.y, -20.0);
        assert_eq!(backdrop.scene.ring.rotation_z, 2.5);
    }

    #[test]
    fn test_scroll_does_not_advance_scene_time() {
        let mut backdrop = test_backdrop();
        let scheduler = MockScheduler::new();

        dispatch(
            &mut backdrop,
            HostSignal::Scroll { offset: 700.0 },
            &scheduler,
        );

        assert_eq!(backdrop.clock.time(), 0.0);
        assert_eq!(scheduler.count(), 0);
    }

    #[test]
    fn test_scroll_between_frames_keeps_animation_continuous() {
        let mut backdrop = test_backdrop();
        let scheduler = MockScheduler::new();

        dispatch(&mut backdrop, HostSignal::Frame, &scheduler);
        dispatch(
            &mut backdrop,
            HostSignal::Scroll { offset: 300.0 },
            &scheduler,
        );
        dispatch(&mut backdrop, HostSignal::Frame, &scheduler);

        assert_eq!(backdrop.clock.time(), TIME_STEP + TIME_STEP);
        assert_eq!(backdrop.camera.position.y, 300.0 * SCROLL_CAMERA_RATE);
    }
}

#[cfg(test)]
mod resize_tests {
    use super::*;

    #[test]
    fn test_resize_chain_keeps_last_aspect() {
        let mut backdrop = test_backdrop();
        let scheduler = MockScheduler::new();

        for (width, height) in [(1920, 1080), (640, 480), (800, 1200)] {
            dispatch(
                &mut backdrop,
                HostSignal::Resize { width, height },
                &scheduler,
            );
        }

        assert_eq!(backdrop.camera.aspect, 800.0 / 1200.0);
        assert_eq!(backdrop.viewport, Viewport::new(800, 1200));
    }

    #[test]
    fn test_resize_preserves_scrolled_camera_height() {
        let mut backdrop = test_backdrop();
        let scheduler = MockScheduler::new();

        dispatch(
            &mut backdrop,
            HostSignal::Scroll { offset: 1000.0 },
            &scheduler,
        );
        dispatch(
            &mut backdrop,
            HostSignal::Resize {
                width: 640,
                height: 480,
            },
            &scheduler,
        );

        assert_eq!(backdrop.camera.position.y, -8.0);
    }
}

#[cfg(test)]
mod model_tests {
    use super::*;

    #[test]
    fn test_model_failure_keeps_scene_animating() {
        let mut backdrop = test_backdrop();
        let scheduler = MockScheduler::new();
        backdrop.scene.model_failed();

        let rocket_start = backdrop.scene.rocket.position.y;
        for _ in 0..100 {
            dispatch(&mut backdrop, HostSignal::Frame, &scheduler);
        }

        assert!(matches!(backdrop.scene.ufo, ModelSlot::Failed));
        assert_ne!(backdrop.scene.rocket.position.y, rocket_start);
        assert_eq!(scheduler.count(), 100);
    }

    #[test]
    fn test_late_ready_model_bobs_from_current_time() {
        let mut backdrop = test_backdrop();
        let scheduler = MockScheduler::new();

        for _ in 0..500 {
            dispatch(&mut backdrop, HostSignal::Frame, &scheduler);
        }
        backdrop.scene.model_ready();
        dispatch(&mut backdrop, HostSignal::Frame, &scheduler);

        let time = backdrop.clock.time();
        let ModelSlot::Ready(ufo) = &backdrop.scene.ufo else {
            panic!("model slot should be ready");
        };
        assert_eq!(
            ufo.position.y,
            ufo.base_y + (time * UFO_BOB_RATE).sin() * UFO_BOB_AMPLITUDE
        );
    }
}

#[cfg(test)]
mod determinism_tests {
    use super::*;

    #[test]
    fn test_same_signal_sequence_reaches_same_state() {
        let mut a = test_backdrop();
        let mut b = test_backdrop();
        let scheduler = MockScheduler::new();

        let signals = [
            HostSignal::Frame,
            HostSignal::Scroll { offset: 420.0 },
            HostSignal::Frame,
            HostSignal::Resize {
                width: 1024,
                height: 768,
            },
            HostSignal::Frame,
            HostSignal::Frame,
        ];
        for signal in signals {
            dispatch(&mut a, signal, &scheduler);
            dispatch(&mut b, signal, &scheduler);
        }

        assert_eq!(a.clock.time(), b.clock.time());
        assert_eq!(a.camera.position, b.camera.position);
        assert_eq!(a.scene.rocket.position, b.scene.rocket.position);
        for (bead_a, bead_b) in a.scene.beads.iter().zip(&b.scene.beads) {
            assert_eq!(bead_a.rotation_y, bead_b.rotation_y);
        }
        for (pa, pb) in a.scene.particles.iter().zip(&b.scene.particles) {
            assert_eq!(pa.position, pb.position);
        }
    }
}
