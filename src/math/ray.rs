//! Ray type and operations

use crate::core::types::{Vec3, Mat4};

/// A ray defined by origin and direction
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray (direction should be normalized)
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get point along ray at parameter t
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Parameter of the point on the infinite line closest to `point`
    pub fn closest_t(&self, point: Vec3) -> f32 {
        let len_sq = self.direction.length_squared();
        if len_sq == 0.0 {
            return 0.0;
        }
        (point - self.origin).dot(self.direction) / len_sq
    }

    /// Perpendicular distance from `point` to the line carrying this ray
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        super::geometry::point_line_distance(point, self.origin, self.direction)
    }

    /// Transform ray by matrix.
    ///
    /// The direction is left unnormalized so that distances measured in the
    /// target space stay consistent with a non-uniform scale.
    pub fn transform(&self, matrix: &Mat4) -> Ray {
        Ray::new(
            matrix.transform_point3(self.origin),
            matrix.transform_vector3(self.direction),
        )
    }
}
