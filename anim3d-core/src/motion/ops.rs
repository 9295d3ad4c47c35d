//! The motion kinds played by the scheduler's channels.

use nalgebra::{Matrix4, Point3, Unit, Vector3};

use super::channel::Motion;
use super::curve::CurveKind;
use crate::transform::{self, ShearAxis};

/// Move the model's position to `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Translate {
    pub target: Vector3<f32>,
}

impl Motion for Translate {
    type Value = Vector3<f32>;

    fn sample(&self, initial: &Vector3<f32>, progress: f32) -> Vector3<f32> {
        initial.lerp(&self.target, progress)
    }

    fn settle(&self, _initial: &Vector3<f32>) -> Vector3<f32> {
        self.target
    }
}

/// Change the model's per-axis scale to `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    pub target: Vector3<f32>,
}

impl Motion for Scale {
    type Value = Vector3<f32>;

    fn sample(&self, initial: &Vector3<f32>, progress: f32) -> Vector3<f32> {
        initial.lerp(&self.target, progress)
    }

    fn settle(&self, _initial: &Vector3<f32>) -> Vector3<f32> {
        self.target
    }
}

/// Rotate by `angle` radians around `axis`, on top of every rotation
/// already completed.
///
/// The channel value is the accumulated rotation matrix. Each segment sweeps
/// from 0 to `angle` and folds the full rotation in when it settles.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisRotation {
    pub angle: f32,
    pub axis: Option<Unit<Vector3<f32>>>,
}

impl AxisRotation {
    /// A rotation around `axis`. A zero-length axis yields no rotation.
    pub fn new(angle: f32, axis: Vector3<f32>) -> Self {
        let axis = Unit::try_new(axis, f32::EPSILON);
        if axis.is_none() {
            log::warn!("rotation axis has zero length; segment will not rotate");
        }
        Self { angle, axis }
    }

    fn rotate(&self, accumulated: &Matrix4<f32>, angle: f32) -> Matrix4<f32> {
        match &self.axis {
            Some(axis) => accumulated * transform::axis_rotation(axis, angle),
            None => *accumulated,
        }
    }
}

impl Motion for AxisRotation {
    type Value = Matrix4<f32>;

    fn sample(&self, initial: &Matrix4<f32>, progress: f32) -> Matrix4<f32> {
        self.rotate(initial, self.angle * progress)
    }

    fn settle(&self, initial: &Matrix4<f32>) -> Matrix4<f32> {
        self.rotate(initial, self.angle)
    }
}

/// Rotate by `angle` radians around an axis passing through `pivot`.
///
/// Pivot rotations accumulate in their own matrix, kept apart from the
/// model-local axis rotations.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotRotation {
    pub angle: f32,
    pub axis: Option<Unit<Vector3<f32>>>,
    pub pivot: Point3<f32>,
}

impl PivotRotation {
    pub fn new(angle: f32, axis: Vector3<f32>, pivot: Point3<f32>) -> Self {
        let axis = Unit::try_new(axis, f32::EPSILON);
        if axis.is_none() {
            log::warn!("pivot rotation axis has zero length; segment will not rotate");
        }
        Self { angle, axis, pivot }
    }

    fn rotate(&self, accumulated: &Matrix4<f32>, angle: f32) -> Matrix4<f32> {
        match &self.axis {
            Some(axis) => transform::pivot_rotation(axis, angle, &self.pivot) * accumulated,
            None => *accumulated,
        }
    }
}

impl Motion for PivotRotation {
    type Value = Matrix4<f32>;

    fn sample(&self, initial: &Matrix4<f32>, progress: f32) -> Matrix4<f32> {
        self.rotate(initial, self.angle * progress)
    }

    fn settle(&self, initial: &Matrix4<f32>) -> Matrix4<f32> {
        self.rotate(initial, self.angle)
    }
}

/// Shear factors along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shear {
    pub axis: ShearAxis,
    pub first: f32,
    pub second: f32,
}

impl Shear {
    /// No shear.
    pub fn none(axis: ShearAxis) -> Self {
        Self {
            axis,
            first: 0.0,
            second: 0.0,
        }
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        transform::shear_matrix(self.axis, self.first, self.second)
    }
}

impl Default for Shear {
    fn default() -> Self {
        Self::none(ShearAxis::X)
    }
}

/// Interpolate the shear towards `target`.
///
/// Only one shear axis is in effect at a time. A segment on the same axis
/// as the current shear continues from its factors; switching axis drops
/// the old shear and grows the new one from zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ShearTo {
    pub target: Shear,
}

impl Motion for ShearTo {
    type Value = Shear;

    fn initial(&self, resting: &Shear) -> Shear {
        if resting.axis == self.target.axis {
            *resting
        } else {
            Shear::none(self.target.axis)
        }
    }

    fn sample(&self, initial: &Shear, progress: f32) -> Shear {
        Shear {
            axis: self.target.axis,
            first: initial.first + (self.target.first - initial.first) * progress,
            second: initial.second + (self.target.second - initial.second) * progress,
        }
    }

    fn settle(&self, _initial: &Shear) -> Shear {
        self.target
    }
}

/// Follow a cubic curve through four control points.
///
/// The curve fully determines the position; the value the model had when
/// the segment started plays no part.
#[derive(Debug, Clone, PartialEq)]
pub struct PathMotion {
    pub kind: CurveKind,
    pub points: [Vector3<f32>; 4],
}

impl Motion for PathMotion {
    type Value = Vector3<f32>;

    fn sample(&self, _initial: &Vector3<f32>, progress: f32) -> Vector3<f32> {
        self.kind.evaluate(&self.points, progress)
    }

    fn settle(&self, _initial: &Vector3<f32>) -> Vector3<f32> {
        self.kind.end_point(&self.points)
    }
}
