use std::f32::consts::TAU;

use galaxy_gallery::galaxy::{generate, GalaxyParameters};
use galaxy_gallery::math::Color;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

const EPSILON: f32 = 1e-4;

fn assert_color_near(actual: Color, expected: Color) {
    let (a, e) = (actual.to_array(), expected.to_array());
    for i in 0..3 {
        assert!(
            (a[i] - e[i]).abs() < EPSILON,
            "color {:?} != {:?}",
            a,
            e
        );
    }
}

#[test]
fn test_generates_exactly_count_particles() {
    let mut rng = StdRng::seed_from_u64(1);
    for count in [0, 1, 7, 1000] {
        let params = GalaxyParameters {
            count,
            ..Default::default()
        };
        assert_eq!(generate(&params, &mut rng).len(), count);
    }
}

#[test]
fn test_zero_count_is_empty_cloud() {
    let mut rng = StdRng::seed_from_u64(1);
    let params = GalaxyParameters {
        count: 0,
        ..Default::default()
    };
    let cloud = generate(&params, &mut rng);
    assert!(cloud.is_empty());
    assert!(cloud.to_geometry().is_empty());
}

#[test]
fn test_vertical_position_is_jitter_only() {
    let mut rng = StdRng::seed_from_u64(2);
    let params = GalaxyParameters {
        count: 2000,
        randomness: 0.0,
        ..Default::default()
    };
    for particle in generate(&params, &mut rng).particles() {
        assert_eq!(particle.position.y, 0.0);
    }

    let params = GalaxyParameters {
        count: 2000,
        randomness: 0.3,
        ..Default::default()
    };
    for particle in generate(&params, &mut rng).particles() {
        assert!(particle.position.y.abs() <= 0.3);
    }
}

#[test]
fn test_particles_stay_within_radius_plus_jitter() {
    let mut rng = StdRng::seed_from_u64(3);
    let params = GalaxyParameters {
        count: 5000,
        radius: 4.0,
        randomness: 0.5,
        ..Default::default()
    };
    // Each axis jitters by at most `randomness`
    let bound = params.radius + params.randomness * 2f32.sqrt() + EPSILON;
    for particle in generate(&params, &mut rng).particles() {
        let planar = Vec3::new(particle.position.x, 0.0, particle.position.z).length();
        assert!(planar <= bound, "{} > {}", planar, bound);
    }
}

#[test]
fn test_color_follows_radial_fraction() {
    let mut rng = StdRng::seed_from_u64(4);
    let params = GalaxyParameters {
        count: 500,
        radius: 5.0,
        randomness: 0.0,
        inside_color: Color::from_hex("#ff6030").unwrap(),
        outside_color: Color::from_hex("#1b3984").unwrap(),
        ..Default::default()
    };
    for particle in generate(&params, &mut rng).particles() {
        let radius = Vec3::new(particle.position.x, 0.0, particle.position.z).length();
        let expected = params
            .inside_color
            .lerp(params.outside_color, radius / params.radius);
        assert_color_near(particle.color, expected);
    }
}

#[test]
fn test_color_boundaries() {
    let inside = Color::from_hex("#ff0000").unwrap();
    let outside = Color::from_hex("#0000ff").unwrap();
    assert_color_near(inside.lerp(outside, 0.0), inside);
    assert_color_near(inside.lerp(outside, 1.0), outside);

    // Zero radius collapses every particle to the core
    let mut rng = StdRng::seed_from_u64(5);
    let params = GalaxyParameters {
        count: 50,
        radius: 0.0,
        randomness: 0.0,
        inside_color: inside,
        outside_color: outside,
        ..Default::default()
    };
    for particle in generate(&params, &mut rng).particles() {
        assert_eq!(particle.position, Vec3::ZERO);
        assert_color_near(particle.color, inside);
    }
}

#[test]
fn test_negative_radius_collapses_to_core() {
    let inside = Color::from_hex("#ff0000").unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let params = GalaxyParameters {
        count: 50,
        radius: -5.0,
        randomness: 0.0,
        inside_color: inside,
        ..Default::default()
    };
    let cloud = generate(&params, &mut rng);
    assert_eq!(cloud.len(), 50);
    for particle in cloud.particles() {
        assert!(particle.position.length() < 1e-6);
        assert_color_near(particle.color, inside);
    }

    // Jitter still applies around the core
    let params = GalaxyParameters {
        randomness: 0.2,
        ..params
    };
    for particle in generate(&params, &mut rng).particles() {
        let p = particle.position;
        assert!(p.x.abs() <= 0.2 && p.y.abs() <= 0.2 && p.z.abs() <= 0.2);
    }
}

#[test]
fn test_three_particle_scenario() {
    let mut rng = StdRng::seed_from_u64(7);
    let params = GalaxyParameters {
        count: 3,
        branches: 3,
        radius: 5.0,
        randomness: 0.0,
        spin: 0.0,
        inside_color: Color::from_hex("#ff0000").unwrap(),
        outside_color: Color::from_hex("#0000ff").unwrap(),
        ..Default::default()
    };
    let cloud = generate(&params, &mut rng);
    assert_eq!(cloud.len(), 3);

    for (i, particle) in cloud.particles().enumerate() {
        let p = particle.position;
        let radius = Vec3::new(p.x, 0.0, p.z).length();
        assert!(radius > 0.0 && radius < 5.0);
        assert_eq!(p.y, 0.0);

        let angle = p.z.atan2(p.x).rem_euclid(TAU);
        let expected = i as f32 * TAU / 3.0;
        let diff = (angle - expected).abs();
        assert!(diff.min(TAU - diff) < 1e-3, "particle {} at {}", i, angle);

        // On the red-blue line, blue share proportional to radius
        let [r, g, b] = particle.color.to_array();
        let fraction = radius / 5.0;
        assert!(g.abs() < EPSILON);
        assert!((r - (1.0 - fraction)).abs() < EPSILON);
        assert!((b - fraction).abs() < EPSILON);
    }
}

#[test]
fn test_zero_branches_puts_everything_on_one_arm() {
    let mut rng = StdRng::seed_from_u64(8);
    let params = GalaxyParameters {
        count: 100,
        branches: 0,
        spin: 0.0,
        randomness: 0.0,
        ..Default::default()
    };
    for particle in generate(&params, &mut rng).particles() {
        assert!(particle.position.z.abs() < EPSILON);
        assert!(particle.position.x >= 0.0);
    }
}

#[test]
fn test_same_seed_same_cloud() {
    let params = GalaxyParameters {
        count: 256,
        ..Default::default()
    };
    let a = generate(&params, &mut StdRng::seed_from_u64(42));
    let b = generate(&params, &mut StdRng::seed_from_u64(42));
    let c = generate(&params, &mut StdRng::seed_from_u64(43));
    assert_eq!(a, b);
    assert_ne!(a, c);
}
