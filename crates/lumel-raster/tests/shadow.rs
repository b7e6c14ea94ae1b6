use lumel_geom::{Rect2, Transform, Vec2, Vec3};
use lumel_raster::{build_ray_meshes, is_shadowed};
use lumel_scene::{LightRecord, LightRecordKind, MeshRecord};

const BIAS: f32 = 0.0005;

/// Horizontal quad at height `y`, spanning [-1,1] on X/Z.
fn blocker_at(y: f32) -> MeshRecord {
    MeshRecord {
        positions: vec![
            Vec3::new(-1.0, y, -1.0),
            Vec3::new(1.0, y, -1.0),
            Vec3::new(1.0, y, 1.0),
            Vec3::new(-1.0, y, 1.0),
        ],
        normals: vec![Vec3::UP; 4],
        uv2s: vec![Vec2::ZERO; 4],
        indices: vec![0, 1, 2, 0, 2, 3],
        transform: Transform::IDENTITY,
        albedo: Vec3::splat(1.0),
        node_path: "blocker".into(),
        sub_instance: 0,
        size_hint: None,
        atlas_layer: 0,
        uv_rect: Rect2::UNIT,
    }
}

fn omni_at(position: Vec3) -> LightRecord {
    LightRecord {
        kind: LightRecordKind::Omni {
            position,
            range: 100.0,
            attenuation: 1.0,
        },
        color: Vec3::splat(1.0),
        energy: 1.0,
        cast_shadow: true,
        name: "lamp".into(),
    }
}

fn sun(direction: Vec3) -> LightRecord {
    LightRecord {
        kind: LightRecordKind::Directional { direction },
        color: Vec3::splat(1.0),
        energy: 1.0,
        cast_shadow: true,
        name: "sun".into(),
    }
}

#[test]
fn intervening_triangle_shadows_point_light() {
    let occluders = build_ray_meshes(&[blocker_at(1.0)]);
    let light = omni_at(Vec3::new(0.0, 2.0, 0.0));
    assert!(is_shadowed(&occluders, Vec3::ZERO, Vec3::UP, BIAS, &light));
}

#[test]
fn unobstructed_path_is_lit() {
    let occluders = build_ray_meshes(&[blocker_at(1.0)]);
    // Light below the blocker plane: straight path never crosses it.
    let light = omni_at(Vec3::new(0.0, 0.5, 3.0));
    assert!(!is_shadowed(&occluders, Vec3::ZERO, Vec3::UP, BIAS, &light));
}

#[test]
fn directional_light_blocked_by_overhead_geometry() {
    let occluders = build_ray_meshes(&[blocker_at(5.0)]);
    let down = sun(Vec3::new(0.0, -1.0, 0.0));
    assert!(is_shadowed(&occluders, Vec3::ZERO, Vec3::UP, BIAS, &down));

    // Sideways sun: the overhead plane is out of the ray's path.
    let side = sun(Vec3::new(-1.0, 0.0, 0.0));
    assert!(!is_shadowed(&occluders, Vec3::ZERO, Vec3::UP, BIAS, &side));
}

#[test]
fn surface_does_not_shadow_itself_through_bias() {
    // Sample sits on the blocker itself; the biased origin must escape it.
    let occluders = build_ray_meshes(&[blocker_at(0.0)]);
    let light = omni_at(Vec3::new(0.0, 2.0, 0.0));
    assert!(!is_shadowed(&occluders, Vec3::ZERO, Vec3::UP, BIAS, &light));
}

#[test]
fn light_within_bias_distance_is_never_shadowed() {
    let occluders = build_ray_meshes(&[blocker_at(1.0)]);
    let light = omni_at(Vec3::new(0.0, BIAS * 0.5, 0.0));
    assert!(!is_shadowed(&occluders, Vec3::ZERO, Vec3::UP, BIAS, &light));
}

#[test]
fn occluder_beyond_light_does_not_shadow() {
    // Blocker above the light; the segment to the light stops short of it.
    let occluders = build_ray_meshes(&[blocker_at(3.0)]);
    let light = omni_at(Vec3::new(0.0, 2.0, 0.0));
    assert!(!is_shadowed(&occluders, Vec3::ZERO, Vec3::UP, BIAS, &light));
}

#[test]
fn build_ray_meshes_skips_invalid_records() {
    let mut degenerate = blocker_at(0.0);
    degenerate.positions.truncate(2);
    degenerate.indices.clear();
    let meshes = build_ray_meshes(&[degenerate, blocker_at(1.0)]);
    assert_eq!(meshes.len(), 1);
    assert_eq!(meshes[0].tris.len(), 2);
    // AABB encloses the quad.
    assert!(meshes[0].aabb.min.x <= -1.0 && meshes[0].aabb.max.x >= 1.0);
}

#[test]
fn implicit_triangulation_builds_occluders() {
    let mut rec = blocker_at(1.0);
    // Expand to a non-indexed triangle list.
    rec.positions = vec![
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, 1.0, -1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, 1.0, 1.0),
    ];
    rec.indices.clear();
    let occluders = build_ray_meshes(&[rec]);
    assert_eq!(occluders[0].tris.len(), 2);
    let light = omni_at(Vec3::new(0.0, 2.0, 0.0));
    assert!(is_shadowed(&occluders, Vec3::ZERO, Vec3::UP, BIAS, &light));
}

#[test]
fn shadowed_light_contributes_zero() {
    use lumel_raster::{LightingEnv, ShadeParams, evaluate_direct};

    let occluders = build_ray_meshes(&[blocker_at(1.0)]);
    let lights = [omni_at(Vec3::new(0.0, 2.0, 0.0))];
    let params = ShadeParams {
        use_lambert_normalization: false,
        ..Default::default()
    };
    let env = LightingEnv {
        lights: &lights,
        occluders: &occluders,
        params,
    };
    let lit = evaluate_direct(&env, Vec3::ZERO, Vec3::UP, Vec3::splat(1.0));
    assert_eq!(lit.x, 0.0);

    // Same sample with shadowing disabled sees the light again.
    let env = LightingEnv {
        lights: &lights,
        occluders: &occluders,
        params: ShadeParams {
            use_shadowing: false,
            ..params
        },
    };
    let lit = evaluate_direct(&env, Vec3::ZERO, Vec3::UP, Vec3::splat(1.0));
    assert!(lit.x > 0.0);
}
