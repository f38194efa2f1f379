//! Small vector helpers on top of nalgebra.

use nalgebra::{Point3, Vector3};

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    (b - a).norm()
}

/// Midpoint of two points.
#[inline]
pub fn midpoint(a: &Point3<f64>, b: &Point3<f64>) -> Point3<f64> {
    Point3::from((a.coords + b.coords) * 0.5)
}

/// Angle between two vectors in radians.
///
/// The cosine is clamped to `[-1, 1]` so rounding never produces `NaN`.
/// Returns 0 if either vector has zero length.
pub fn angle(v1: &Vector3<f64>, v2: &Vector3<f64>) -> f64 {
    let denom = v1.norm() * v2.norm();
    if denom <= f64::EPSILON {
        return 0.0;
    }
    let cos_alpha = (v1.dot(v2) / denom).clamp(-1.0, 1.0);
    cos_alpha.acos()
}

/// Average of a set of points, or `None` if the set is empty.
pub fn centroid<'a, It>(points: It) -> Option<Point3<f64>>
where
    It: IntoIterator<Item = &'a Point3<f64>>,
{
    let mut sum = Vector3::zeros();
    let mut count = 0usize;
    for p in points {
        sum += p.coords;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(Point3::from(sum / count as f64))
    }
}

/// Largest value in the slice, `-inf` when empty.
pub fn max_float(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// How close the corner at `corner` is to a right angle.
///
/// Returns `1 - |cos θ|`: 1 for a right angle, 0 for a flat or
/// degenerate corner.
pub fn corner_squareness(prev: &Point3<f64>, corner: &Point3<f64>, next: &Point3<f64>) -> f64 {
    let a = prev - corner;
    let b = next - corner;
    let denom = a.norm() * b.norm();
    if denom <= f64::EPSILON {
        return 0.0;
    }
    1.0 - (a.dot(&b) / denom).clamp(-1.0, 1.0).abs()
}

/// Sum of [`corner_squareness`] over every corner of a closed polygon.
pub fn polygon_squareness(points: &[Point3<f64>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    (0..n)
        .map(|i| corner_squareness(&points[(i + n - 1) % n], &points[i], &points[(i + 1) % n]))
        .sum()
}
