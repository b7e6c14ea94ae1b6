//! Minimal geometry types for the baking crates (no renderer dependency).
#![forbid(unsafe_code)]

use core::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned rectangle in normalized UV space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect2 {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect2 {
    #[inline]
    pub const fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Full `[0,1]^2` rectangle.
    pub const UNIT: Rect2 = Rect2 {
        pos: Vec2 { x: 0.0, y: 0.0 },
        size: Vec2 { x: 1.0, y: 1.0 },
    };
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const UP: Vec3 = Vec3 {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v }
    }

    #[inline]
    pub fn dot(self, rhs: Vec3) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline]
    pub fn cross(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    #[inline]
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len > 0.0 { self / len } else { self }
    }

    #[inline]
    pub fn min(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x.min(rhs.x), self.y.min(rhs.y), self.z.min(rhs.z))
    }

    #[inline]
    pub fn max(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x.max(rhs.x), self.y.max(rhs.y), self.z.max(rhs.z))
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn div(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Degenerate box around a single point; grow with `expand_to`.
    #[inline]
    pub const fn at_point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    #[inline]
    pub fn expand_to(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Slab test against a ray segment `[0, t_max]` starting at `origin`.
    /// Zero direction components are nudged so the division stays finite.
    pub fn intersects_ray(&self, origin: Vec3, dir: Vec3, t_max: f32) -> bool {
        let inv = Vec3::new(
            1.0 / if dir.x == 0.0 { 1e-20 } else { dir.x },
            1.0 / if dir.y == 0.0 { 1e-20 } else { dir.y },
            1.0 / if dir.z == 0.0 { 1e-20 } else { dir.z },
        );
        let t0 = Vec3::new(
            (self.min.x - origin.x) * inv.x,
            (self.min.y - origin.y) * inv.y,
            (self.min.z - origin.z) * inv.z,
        );
        let t1 = Vec3::new(
            (self.max.x - origin.x) * inv.x,
            (self.max.y - origin.y) * inv.y,
            (self.max.z - origin.z) * inv.z,
        );
        let lo = t0.min(t1);
        let hi = t0.max(t1);
        let t_enter = lo.x.max(lo.y).max(lo.z).max(0.0);
        let t_exit = hi.x.min(hi.y).min(hi.z).min(t_max);
        t_exit >= t_enter
    }
}

/// Rigid-ish transform: a 3x3 basis (may include scale) plus a translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Basis rows: `rows[r]` dotted with a vector gives component `r`.
    pub basis: [Vec3; 3],
    pub origin: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        basis: [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ],
        origin: Vec3::ZERO,
    };

    #[inline]
    pub const fn from_origin(origin: Vec3) -> Self {
        Transform {
            basis: Transform::IDENTITY.basis,
            origin,
        }
    }

    /// Full point transform: basis then translation.
    #[inline]
    pub fn xform(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            self.basis[0].dot(p),
            self.basis[1].dot(p),
            self.basis[2].dot(p),
        ) + self.origin
    }

    /// Direction transform: basis only, no translation.
    #[inline]
    pub fn xform_basis(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.basis[0].dot(v),
            self.basis[1].dot(v),
            self.basis[2].dot(v),
        )
    }

    /// Uniform scale applied on top of the current basis.
    pub fn scaled(&self, s: f32) -> Transform {
        Transform {
            basis: [self.basis[0] * s, self.basis[1] * s, self.basis[2] * s],
            origin: self.origin,
        }
    }

    /// Column `i` of the basis matrix. Column 2 is the local -Z forward
    /// reference used for light directions.
    #[inline]
    pub fn basis_column(&self, i: usize) -> Vec3 {
        match i {
            0 => Vec3::new(self.basis[0].x, self.basis[1].x, self.basis[2].x),
            1 => Vec3::new(self.basis[0].y, self.basis[1].y, self.basis[2].y),
            _ => Vec3::new(self.basis[0].z, self.basis[1].z, self.basis[2].z),
        }
    }

    /// Composition: `(a * b).xform(p) == a.xform(b.xform(p))`.
    pub fn mul(&self, child: &Transform) -> Transform {
        let col = |j: usize| child.basis_column(j);
        let row = |r: Vec3| Vec3::new(r.dot(col(0)), r.dot(col(1)), r.dot(col(2)));
        Transform {
            basis: [row(self.basis[0]), row(self.basis[1]), row(self.basis[2])],
            origin: self.xform(child.origin),
        }
    }

    /// Rotation about the X axis by `angle` radians.
    pub fn rotation_x(angle: f32) -> Transform {
        let (s, c) = angle.sin_cos();
        Transform {
            basis: [
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, c, -s),
                Vec3::new(0.0, s, c),
            ],
            origin: Vec3::ZERO,
        }
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f32) -> Transform {
        let (s, c) = angle.sin_cos();
        Transform {
            basis: [
                Vec3::new(c, 0.0, s),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(-s, 0.0, c),
            ],
            origin: Vec3::ZERO,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::IDENTITY
    }
}
