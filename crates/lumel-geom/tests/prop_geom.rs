use lumel_geom::{Aabb, Transform, Vec3};
use proptest::num::f32::NORMAL;
use proptest::prelude::*;
use proptest::strategy::Strategy;

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}
fn approx_abs_rel(a: f32, b: f32, atol: f32, rtol: f32) -> bool {
    let diff = (a - b).abs();
    let scale = a.abs().max(b.abs());
    diff <= atol + rtol * scale
}
fn vapprox_abs_rel(a: Vec3, b: Vec3, atol: f32, rtol: f32) -> bool {
    approx_abs_rel(a.x, b.x, atol, rtol)
        && approx_abs_rel(a.y, b.y, atol, rtol)
        && approx_abs_rel(a.z, b.z, atol, rtol)
}

fn bounded_f32() -> impl Strategy<Value = f32> {
    NORMAL.prop_filter("bounded", |v| v.is_finite() && v.abs() <= 1e5)
}

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (bounded_f32(), bounded_f32(), bounded_f32()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    // expand_to never shrinks and always covers the added point.
    #[test]
    fn aabb_expand_to_covers_point(a in arb_vec3(), b in arb_vec3(), p in arb_vec3()) {
        let mut bb = Aabb::at_point(a);
        bb.expand_to(b);
        bb.expand_to(p);
        prop_assert!(bb.min.x <= p.x && p.x <= bb.max.x);
        prop_assert!(bb.min.y <= p.y && p.y <= bb.max.y);
        prop_assert!(bb.min.z <= p.z && p.z <= bb.max.z);
        prop_assert!(bb.min.x <= bb.max.x && bb.min.y <= bb.max.y && bb.min.z <= bb.max.z);
    }

    // A ray cast from inside the box always hits it.
    #[test]
    fn aabb_ray_from_inside_hits(a in arb_vec3(), b in arb_vec3(), d in arb_vec3()) {
        prop_assume!(d.length() > 1e-3);
        let mut bb = Aabb::at_point(a);
        bb.expand_to(b);
        let center = (bb.min + bb.max) / 2.0;
        prop_assert!(bb.intersects_ray(center, d.normalized(), 1e6));
    }

    // Translation-only transforms preserve distances between points.
    #[test]
    fn transform_translation_preserves_distance(
        o in arb_vec3(),
        p in arb_vec3(),
        q in arb_vec3(),
    ) {
        let t = Transform::from_origin(o);
        let before = (p - q).length();
        let after = (t.xform(p) - t.xform(q)).length();
        prop_assert!(approx_abs_rel(after, before, 1e-4, 1e-5));
    }

    // xform is xform_basis plus the origin.
    #[test]
    fn transform_xform_decomposes(o in arb_vec3(), p in arb_vec3()) {
        let t = Transform::from_origin(o);
        prop_assert!(vapprox_abs_rel(t.xform(p), t.xform_basis(p) + o, 1e-5, 1e-5));
    }

    // Uniform scale scales direction lengths by |s|.
    #[test]
    fn transform_scaled_lengths(p in arb_vec3(), s in bounded_f32()) {
        prop_assume!(s.abs() > 1e-3 && s.abs() < 1e3);
        let t = Transform::IDENTITY.scaled(s);
        let before = p.length();
        let after = t.xform_basis(p).length();
        prop_assert!(approx_abs_rel(after, before * s.abs(), 1e-3, 1e-4));
    }
}

#[test]
fn vec3_normalized_zero_is_zero() {
    let z = Vec3::ZERO.normalized();
    assert!(approx(z.length(), 0.0, 1e-9));
}
