use lumel_geom::{Rect2, Transform, Vec2, Vec3};
use lumel_raster::{
    LightingEnv, LightmapImage, ShadeParams, accumulate_indirect, dilate, evaluate_direct,
    rasterize_direct,
};
use lumel_scene::{LightRecord, LightRecordKind, MeshRecord};
use proptest::prelude::*;

fn sun_down() -> LightRecord {
    LightRecord {
        kind: LightRecordKind::Directional {
            direction: Vec3::new(0.0, -1.0, 0.0),
        },
        color: Vec3::splat(1.0),
        energy: 1.0,
        cast_shadow: true,
        name: "sun".into(),
    }
}

fn unit_quad_record() -> MeshRecord {
    MeshRecord {
        positions: vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 2.0),
            Vec3::new(0.0, 0.0, 2.0),
        ],
        normals: vec![Vec3::UP; 4],
        uv2s: vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ],
        indices: vec![0, 1, 2, 0, 2, 3],
        transform: Transform::IDENTITY,
        albedo: Vec3::splat(1.0),
        node_path: "root/quad".into(),
        sub_instance: 0,
        size_hint: None,
        atlas_layer: 0,
        uv_rect: Rect2::UNIT,
    }
}

fn env_with<'a>(lights: &'a [LightRecord], params: ShadeParams) -> LightingEnv<'a> {
    LightingEnv {
        lights,
        occluders: &[],
        params,
    }
}

#[test]
fn rasterized_quad_covers_image_uniformly() {
    let lights = [sun_down()];
    let params = ShadeParams {
        use_lambert_normalization: false,
        ..Default::default()
    };
    let env = env_with(&lights, params);
    let mesh = unit_quad_record();
    let mut img = LightmapImage::new(16, 16).unwrap();
    rasterize_direct(&mesh, &env, &mut img);

    // A quad spanning the full UV square lights every texel the same.
    let expected = img.get(8, 8);
    assert!(expected[0] > 0.0);
    for y in 0..16 {
        for x in 0..16 {
            let t = img.get(x, y);
            assert_eq!(t[3], 1.0, "texel ({x},{y}) lacks coverage");
            assert!((t[0] - expected[0]).abs() < 1e-5);
            assert!((t[1] - expected[1]).abs() < 1e-5);
            assert!((t[2] - expected[2]).abs() < 1e-5);
        }
    }
}

#[test]
fn covered_texels_never_fall_below_ambient_floor() {
    let lights = [sun_down()];
    let params = ShadeParams {
        ambient_energy: 0.25,
        use_lambert_normalization: false,
        ..Default::default()
    };
    let env = env_with(&lights, params);
    let mesh = unit_quad_record();
    let mut img = LightmapImage::new(8, 8).unwrap();
    rasterize_direct(&mesh, &env, &mut img);

    for y in 0..8 {
        for x in 0..8 {
            let t = img.get(x, y);
            assert!(t[0] >= 0.25 - 1e-6 && t[1] >= 0.25 - 1e-6 && t[2] >= 0.25 - 1e-6);
        }
    }
}

#[test]
fn degenerate_uv_triangles_write_nothing() {
    let lights = [sun_down()];
    let env = env_with(&lights, ShadeParams::default());
    let mut mesh = unit_quad_record();
    // Collapse all UVs to a point: zero-area islands.
    mesh.uv2s = vec![Vec2::new(0.5, 0.5); 4];
    let mut img = LightmapImage::new(8, 8).unwrap();
    rasterize_direct(&mesh, &env, &mut img);
    for y in 0..8 {
        for x in 0..8 {
            assert!(!img.is_covered(x, y));
        }
    }
}

#[test]
fn out_of_range_indices_are_skipped() {
    let lights = [sun_down()];
    let env = env_with(&lights, ShadeParams::default());
    let mut mesh = unit_quad_record();
    mesh.indices = vec![0, 1, 99, 0, 2, 3];
    let mut img = LightmapImage::new(8, 8).unwrap();
    // The invalid triangle is dropped; the valid one still rasterizes.
    rasterize_direct(&mesh, &env, &mut img);
    assert!(img.is_covered(1, 6));
}

#[test]
fn evaluate_is_pure_and_bit_deterministic() {
    let lights = [
        sun_down(),
        LightRecord {
            kind: LightRecordKind::Omni {
                position: Vec3::new(0.3, 2.0, 0.7),
                range: 10.0,
                attenuation: 1.0,
            },
            color: Vec3::new(1.0, 0.8, 0.6),
            energy: 2.0,
            cast_shadow: false,
            name: "lamp".into(),
        },
    ];
    let env = env_with(&lights, ShadeParams::default());
    let pos = Vec3::new(0.1, 0.0, 0.2);
    let a = evaluate_direct(&env, pos, Vec3::UP, Vec3::splat(0.8));
    let b = evaluate_direct(&env, pos, Vec3::UP, Vec3::splat(0.8));
    assert_eq!(a.x.to_bits(), b.x.to_bits());
    assert_eq!(a.y.to_bits(), b.y.to_bits());
    assert_eq!(a.z.to_bits(), b.z.to_bits());
}

#[test]
fn omni_light_attenuates_with_distance_and_cuts_at_range() {
    let lights = [LightRecord {
        kind: LightRecordKind::Omni {
            position: Vec3::new(0.0, 1.0, 0.0),
            range: 2.0,
            attenuation: 1.0,
        },
        color: Vec3::splat(1.0),
        energy: 1.0,
        cast_shadow: false,
        name: "lamp".into(),
    }];
    let params = ShadeParams {
        use_lambert_normalization: false,
        ..Default::default()
    };
    let env = env_with(&lights, params);

    let near = evaluate_direct(&env, Vec3::new(0.0, 0.5, 0.0), Vec3::UP, Vec3::splat(1.0));
    let far = evaluate_direct(&env, Vec3::new(0.0, -0.5, 0.0), Vec3::UP, Vec3::splat(1.0));
    assert!(near.x > far.x);

    // Beyond range the contribution is exactly the ambient floor (zero).
    let outside = evaluate_direct(&env, Vec3::new(0.0, -3.0, 0.0), Vec3::UP, Vec3::splat(1.0));
    assert_eq!(outside.x, 0.0);
}

#[test]
fn spot_cone_cuts_off_outside_angle() {
    let spot = |pos: Vec3| {
        let lights = [LightRecord {
            kind: LightRecordKind::Spot {
                position: Vec3::new(0.0, 2.0, 0.0),
                direction: Vec3::new(0.0, -1.0, 0.0),
                range: 10.0,
                attenuation: 1.0,
                cos_spot_angle: (30.0f32).to_radians().cos(),
                inv_spot_attenuation: 1.0,
            },
            color: Vec3::splat(1.0),
            energy: 4.0,
            cast_shadow: false,
            name: "spot".into(),
        }];
        let params = ShadeParams {
            use_lambert_normalization: false,
            ..Default::default()
        };
        let env = env_with(&lights, params);
        evaluate_direct(&env, pos, Vec3::UP, Vec3::splat(1.0))
    };

    let inside = spot(Vec3::new(0.0, 0.0, 0.0));
    assert!(inside.x > 0.0);
    // Sample far to the side: the direction to the light leaves the cone.
    let outside = spot(Vec3::new(8.0, 0.0, 0.0));
    assert_eq!(outside.x, 0.0);
}

#[test]
fn lambert_normalization_divides_by_pi() {
    let lights = [sun_down()];
    let base = ShadeParams {
        use_lambert_normalization: false,
        ..Default::default()
    };
    let lambert = ShadeParams {
        use_lambert_normalization: true,
        ..base
    };
    let pos = Vec3::ZERO;
    let plain = evaluate_direct(&env_with(&lights, base), pos, Vec3::UP, Vec3::splat(1.0));
    let norm = evaluate_direct(&env_with(&lights, lambert), pos, Vec3::UP, Vec3::splat(1.0));
    assert!((plain.x / norm.x - std::f32::consts::PI).abs() < 1e-4);
}

#[test]
fn albedo_and_energy_scale_multiply_result() {
    let lights = [sun_down()];
    let params = ShadeParams {
        use_lambert_normalization: false,
        lightmap_energy_scale: 2.0,
        ..Default::default()
    };
    let env = env_with(&lights, params);
    let tinted = evaluate_direct(&env, Vec3::ZERO, Vec3::UP, Vec3::new(0.5, 1.0, 0.25));
    assert!((tinted.x - 1.0).abs() < 1e-5);
    assert!((tinted.y - 2.0).abs() < 1e-5);
    assert!((tinted.z - 0.5).abs() < 1e-5);
}

#[test]
fn dilation_fills_uncovered_neighbors_and_leaves_isolated_holes() {
    let mut img = LightmapImage::new(8, 8).unwrap();
    img.set(2, 2, [1.0, 0.5, 0.0, 1.0]);

    let out = dilate(&img, 1);
    // Chebyshev-1 neighbor of the covered texel gets its color.
    assert!(out.is_covered(3, 3));
    assert_eq!(out.get(3, 3)[0], 1.0);
    // A texel with no covered neighbor in radius stays uncovered.
    assert!(!out.is_covered(6, 6));
    // The source image is not mutated.
    assert!(!img.is_covered(3, 3));
}

#[test]
fn dilation_averages_multiple_covered_neighbors() {
    let mut img = LightmapImage::new(3, 1).unwrap();
    img.set(0, 0, [1.0, 0.0, 0.0, 1.0]);
    img.set(2, 0, [0.0, 1.0, 0.0, 1.0]);
    let out = dilate(&img, 1);
    let t = out.get(1, 0);
    assert!((t[0] - 0.5).abs() < 1e-6 && (t[1] - 0.5).abs() < 1e-6);
}

#[test]
fn dilation_radius_zero_is_identity() {
    let mut img = LightmapImage::new(4, 4).unwrap();
    img.set(1, 1, [0.3, 0.3, 0.3, 1.0]);
    assert_eq!(dilate(&img, 0), img);
}

#[test]
fn fully_covered_image_unaffected_by_dilation() {
    let mut img = LightmapImage::new(4, 4).unwrap();
    img.fill([0.25, 0.5, 0.75, 1.0]);
    assert!(img.fully_covered());
    assert_eq!(dilate(&img, 3), img);
}

#[test]
fn zero_bounces_is_a_noop() {
    let mut img = LightmapImage::new(4, 4).unwrap();
    img.fill([0.5, 0.5, 0.5, 1.0]);
    let mut maps = vec![img.clone()];
    accumulate_indirect(&mut maps, 0, 1.0, |_| panic!("no bounce expected"));
    assert_eq!(maps[0], img);
}

#[test]
fn bounces_add_energy_to_covered_regions() {
    let mut img = LightmapImage::new(8, 8).unwrap();
    img.fill([0.5, 0.5, 0.5, 1.0]);
    let before = img.get(4, 4)[0];
    let mut maps = vec![img];
    let mut seen = Vec::new();
    accumulate_indirect(&mut maps, 2, 1.0, |b| seen.push(b));
    assert_eq!(seen, vec![0, 1]);
    assert!(maps[0].get(4, 4)[0] > before);
}

#[test]
fn later_bounces_contribute_less() {
    let mut img = LightmapImage::new(8, 8).unwrap();
    img.fill([1.0, 1.0, 1.0, 1.0]);

    let mut one = vec![img.clone()];
    accumulate_indirect(&mut one, 1, 1.0, |_| {});
    let gain_one = one[0].get(4, 4)[0] - 1.0;

    let mut two = vec![img];
    accumulate_indirect(&mut two, 2, 1.0, |_| {});
    let gain_two = two[0].get(4, 4)[0] - 1.0;

    let second_bounce_gain = gain_two - gain_one;
    assert!(second_bounce_gain > 0.0);
    assert!(second_bounce_gain < gain_one);
}

proptest! {
    #[test]
    fn prop_dilation_grows_coverage_and_preserves_covered_texels(
        seeds in proptest::collection::vec((0usize..12, 0usize..12), 1..8),
        radius in 1i32..4,
    ) {
        let mut img = LightmapImage::new(12, 12).unwrap();
        for &(x, y) in &seeds {
            img.set(x, y, [0.7, 0.7, 0.7, 1.0]);
        }
        let out = dilate(&img, radius);

        let mut before = 0usize;
        let mut after = 0usize;
        for y in 0..12 {
            for x in 0..12 {
                if img.is_covered(x, y) {
                    before += 1;
                    // Covered texels come through untouched.
                    prop_assert_eq!(out.get(x, y), img.get(x, y));
                }
                if out.is_covered(x, y) {
                    after += 1;
                }
            }
        }
        prop_assert!(after >= before);
        // Dilating the result again changes nothing once it saturates.
        let again = dilate(&out, radius);
        for y in 0..12 {
            for x in 0..12 {
                if out.is_covered(x, y) {
                    prop_assert_eq!(again.get(x, y), out.get(x, y));
                }
            }
        }
    }
}
