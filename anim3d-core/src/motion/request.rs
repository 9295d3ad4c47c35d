//! Motion requests as data.

use nalgebra::{Point3, Vector3};

use super::curve::CurveKind;
use crate::transform::ShearAxis;

/// A request to enqueue on a [`TransformScheduler`](super::TransformScheduler).
///
/// Durations are in seconds; angles in radians.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionRequest {
    Translate {
        target: Vector3<f32>,
        duration: f32,
    },
    Scale {
        target: Vector3<f32>,
        duration: f32,
    },
    RotateAxis {
        angle: f32,
        duration: f32,
        axis: Vector3<f32>,
    },
    RotateAroundPoint {
        angle: f32,
        duration: f32,
        axis: Vector3<f32>,
        pivot: Point3<f32>,
    },
    Shear {
        axis: ShearAxis,
        first: f32,
        second: f32,
        duration: f32,
    },
    Path {
        kind: CurveKind,
        points: [Vector3<f32>; 4],
        duration: f32,
    },
}

impl MotionRequest {
    /// Shear along `axis` by the two other coordinates, given in x, y, z
    /// order: `(y, z)` for X, `(x, z)` for Y and `(x, y)` for Z.
    pub fn shear(axis: ShearAxis, a: f32, b: f32, duration: f32) -> Self {
        let (first, second) = axis.cyclic_factors(a, b);
        MotionRequest::Shear {
            axis,
            first,
            second,
            duration,
        }
    }

    /// Requested duration in seconds.
    pub fn duration(&self) -> f32 {
        match self {
            MotionRequest::Translate { duration, .. }
            | MotionRequest::Scale { duration, .. }
            | MotionRequest::RotateAxis { duration, .. }
            | MotionRequest::RotateAroundPoint { duration, .. }
            | MotionRequest::Shear { duration, .. }
            | MotionRequest::Path { duration, .. } => *duration,
        }
    }

    /// Short name of the channel this request is played on.
    pub fn channel_name(&self) -> &'static str {
        match self {
            MotionRequest::Translate { .. } => "translate",
            MotionRequest::Scale { .. } => "scale",
            MotionRequest::RotateAxis { .. } => "rotate-axis",
            MotionRequest::RotateAroundPoint { .. } => "rotate-around-point",
            MotionRequest::Shear { .. } => "shear",
            MotionRequest::Path { .. } => "path",
        }
    }
}
