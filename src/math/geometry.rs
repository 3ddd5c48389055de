//! Point, line and plane helpers shared by picking and editing

use crate::core::types::Vec3;

/// Tolerance used for degenerate triangles and edge-inclusive tests
pub const EPSILON: f32 = 1e-5;

/// Perpendicular distance from `point` to the infinite line through `origin`
/// along `direction`. A zero direction degrades to point-to-point distance.
pub fn point_line_distance(point: Vec3, origin: Vec3, direction: Vec3) -> f32 {
    let len = direction.length();
    let to_point = point - origin;
    if len == 0.0 {
        return to_point.length();
    }
    to_point.cross(direction).length() / len
}

/// Unnormalized face normal of triangle `abc`: `(b - a) x (c - a)`.
///
/// Its length is twice the triangle area, so summing these weights faces by area.
pub fn triangle_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a)
}

/// Barycentric weights of `p` against triangle `abc`, projected on the XZ plane.
///
/// Returns `None` for triangles that are degenerate in XZ.
pub fn barycentric_xz(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<Vec3> {
    let denom = (b.z - c.z) * (a.x - c.x) + (c.x - b.x) * (a.z - c.z);
    if denom.abs() < EPSILON {
        return None;
    }
    let wa = ((b.z - c.z) * (p.x - c.x) + (c.x - b.x) * (p.z - c.z)) / denom;
    let wb = ((c.z - a.z) * (p.x - c.x) + (a.x - c.x) * (p.z - c.z)) / denom;
    Some(Vec3::new(wa, wb, 1.0 - wa - wb))
}

/// Edge-inclusive point-in-triangle test on the XZ plane
pub fn point_in_triangle_xz(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> bool {
    match barycentric_xz(p, a, b, c) {
        Some(w) => w.x >= -EPSILON && w.y >= -EPSILON && w.z >= -EPSILON,
        None => false,
    }
}

/// Height of the plane through `abc` above the XZ position of `p`
pub fn plane_height_at(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    barycentric_xz(p, a, b, c).map(|w| w.x * a.y + w.y * b.y + w.z * c.y)
}

/// Squared distance between two points ignoring height
pub fn horizontal_distance_squared(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    dx * dx + dz * dz
}

/// Express `v` in the orthonormal basis `(x, y, z)`
pub fn to_basis(v: Vec3, x: Vec3, y: Vec3, z: Vec3) -> Vec3 {
    Vec3::new(v.dot(x), v.dot(y), v.dot(z))
}

/// Inverse of [`to_basis`]
pub fn from_basis(v: Vec3, x: Vec3, y: Vec3, z: Vec3) -> Vec3 {
    x * v.x + y * v.y + z * v.z
}
