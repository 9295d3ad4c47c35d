//! Cubic path curves over four control points.

use nalgebra::Vector3;

/// Which cubic a path segment follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveKind {
    /// Interpolates the first and last control points.
    Bezier,
    /// Uniform B-spline segment; approximates all four control points.
    BSpline,
}

impl CurveKind {
    /// Evaluate the curve at parameter `t`.
    pub fn evaluate(self, points: &[Vector3<f32>; 4], t: f32) -> Vector3<f32> {
        match self {
            CurveKind::Bezier => bezier(points, t),
            CurveKind::BSpline => bspline(points, t),
        }
    }

    /// Position the curve rests at once its segment is complete.
    ///
    /// A Bézier path is pinned to its last control point. A B-spline keeps
    /// its evaluation at `t = 1`, which in general is none of its points.
    pub fn end_point(self, points: &[Vector3<f32>; 4]) -> Vector3<f32> {
        match self {
            CurveKind::Bezier => points[3],
            CurveKind::BSpline => bspline(points, 1.0),
        }
    }
}

/// Cubic Bernstein blend.
pub fn bezier(points: &[Vector3<f32>; 4], t: f32) -> Vector3<f32> {
    let s = 1.0 - t;
    points[0] * (s * s * s)
        + points[1] * (3.0 * s * s * t)
        + points[2] * (3.0 * s * t * t)
        + points[3] * (t * t * t)
}

/// Uniform cubic B-spline basis weights at `u`.
pub fn bspline_weights(u: f32) -> [f32; 4] {
    let u2 = u * u;
    let u3 = u2 * u;
    let s = 1.0 - u;
    [
        s * s * s / 6.0,
        (3.0 * u3 - 6.0 * u2 + 4.0) / 6.0,
        (-3.0 * u3 + 3.0 * u2 + 3.0 * u + 1.0) / 6.0,
        u3 / 6.0,
    ]
}

/// Uniform cubic B-spline segment.
pub fn bspline(points: &[Vector3<f32>; 4], u: f32) -> Vector3<f32> {
    let [b0, b1, b2, b3] = bspline_weights(u);
    points[0] * b0 + points[1] * b1 + points[2] * b2 + points[3] * b3
}
