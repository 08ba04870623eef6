use glam::Vec3;
use hero_backdrop::scene::{
    helix_position, hex_color, HeroScene, ModelSlot, SceneParams, CYAN, MAGENTA,
};

fn test_params() -> SceneParams {
    SceneParams {
        star_count: 120,
        particle_count: 40,
        bead_count: 64,
        seed: 7,
    }
}

#[test]
fn test_scene_counts_match_params() {
    let params = test_params();
    let scene = HeroScene::new(&params);

    assert_eq!(scene.stars.positions.len(), params.star_count);
    assert_eq!(scene.particles.len(), params.particle_count);
    assert_eq!(scene.beads.len(), params.bead_count);
}

#[test]
fn test_default_scene_is_full_size() {
    let params = SceneParams::default();
    assert_eq!(params.star_count, 3000);
    assert_eq!(params.particle_count, 150);
    assert_eq!(params.bead_count, 200);
}

#[test]
fn test_stars_stay_inside_the_far_field_cube() {
    let scene = HeroScene::new(&test_params());
    for star in &scene.stars.positions {
        assert!(star.x.abs() <= 100.0);
        assert!(star.y.abs() <= 100.0);
        assert!(star.z.abs() <= 100.0);
    }
}

#[test]
fn test_beads_sit_on_the_helix() {
    let params = test_params();
    let scene = HeroScene::new(&params);

    for (i, bead) in scene.beads.iter().enumerate() {
        assert_eq!(bead.position, helix_position(i, params.bead_count));
        assert_eq!(bead.rotation_y, 0.0);
    }
}

#[test]
fn test_helix_spans_its_column() {
    let count = 64;
    for i in 0..count {
        let p = helix_position(i, count);
        let planar = (p.x + 15.0).hypot(p.z);
        assert!((planar - 3.0).abs() < 1e-4, "bead {} off the cylinder", i);
        assert!((-15.0..15.0).contains(&p.y));
    }
}

#[test]
fn test_particles_start_on_their_orbits() {
    let scene = HeroScene::new(&test_params());
    let cyan = hex_color(CYAN);
    let magenta = hex_color(MAGENTA);

    for particle in &scene.particles {
        assert!((15.0..40.0).contains(&particle.radius));
        assert!((0.001..0.004).contains(&particle.speed));
        assert!(particle.position.y.abs() <= 20.0);

        let planar = particle.position.x.hypot(particle.position.z);
        assert!((planar - particle.radius).abs() < 1e-3);

        assert!(particle.color == cyan || particle.color == magenta);
        assert!(particle.emissive == cyan || particle.emissive == magenta);
    }
}

#[test]
fn test_fixed_placements() {
    let scene = HeroScene::new(&test_params());

    assert_eq!(scene.avatar.position, Vec3::new(30.0, 0.0, 5.0));
    assert_eq!(scene.ring.position, Vec3::new(30.0, 0.0, 4.9));
    assert_eq!(scene.ring.rotation_z, 0.0);
    assert_eq!(scene.rocket.position, Vec3::new(27.0, -10.0, 20.0));
    assert!(matches!(scene.ufo, ModelSlot::Pending));
}

#[test]
fn test_lights_and_fog() {
    let scene = HeroScene::new(&test_params());

    assert_eq!(scene.lights[0].position, Vec3::new(20.0, 10.0, 10.0));
    assert_eq!(scene.lights[0].color, hex_color(CYAN));
    assert_eq!(scene.lights[1].position, Vec3::new(-20.0, -10.0, 5.0));
    assert_eq!(scene.lights[1].color, hex_color(MAGENTA));
    assert!(scene.fog_near < scene.fog_far);
    assert!(scene.ufo_light().is_none());
}

#[test]
fn test_same_seed_reproduces_the_scene() {
    let params = test_params();
    let a = HeroScene::new(&params);
    let b = HeroScene::new(&params);

    assert_eq!(a.stars.positions, b.stars.positions);
    for (pa, pb) in a.particles.iter().zip(&b.particles) {
        assert_eq!(pa.angle, pb.angle);
        assert_eq!(pa.radius, pb.radius);
        assert_eq!(pa.speed, pb.speed);
        assert_eq!(pa.color, pb.color);
        assert_eq!(pa.emissive, pb.emissive);
    }
}

#[test]
fn test_different_seeds_differ() {
    let mut other = test_params();
    other.seed = 8;

    let a = HeroScene::new(&test_params());
    let b = HeroScene::new(&other);

    assert_ne!(a.stars.positions, b.stars.positions);
}
