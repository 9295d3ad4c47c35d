//! Per-model transform scheduler.

use nalgebra::{Matrix4, Point3, Vector3};

use super::channel::Channel;
use super::curve::CurveKind;
use super::ops::{AxisRotation, PathMotion, PivotRotation, Scale, Shear, ShearTo, Translate};
use super::request::MotionRequest;
use crate::transform::{self, ShearAxis};

/// Queues motion requests for one model and resolves them into a model
/// matrix once per frame.
///
/// Six channels run independently: translation, scale, axis rotation, pivot
/// rotation, shear and path. Each plays its requests strictly in the order
/// they were made. A request only starts when the channel reaches it, so it
/// always gets its full duration.
///
/// [`evaluate`](Self::evaluate) must be called with non-decreasing times.
#[derive(Debug, Clone)]
pub struct TransformScheduler {
    translation: Channel<Translate>,
    scale: Channel<Scale>,
    rotation: Channel<AxisRotation>,
    pivot: Channel<PivotRotation>,
    shear: Channel<ShearTo>,
    path: Channel<PathMotion>,
}

impl TransformScheduler {
    /// A scheduler at the origin, unit scale, no rotation and no shear.
    pub fn new() -> Self {
        Self {
            translation: Channel::new("translate", Vector3::zeros()),
            scale: Channel::new("scale", Vector3::repeat(1.0)),
            rotation: Channel::new("rotate-axis", Matrix4::identity()),
            pivot: Channel::new("rotate-around-point", Matrix4::identity()),
            shear: Channel::new("shear", Shear::default()),
            path: Channel::new("path", Vector3::zeros()),
        }
    }

    /// Move to `target` over `duration` seconds.
    pub fn translate(&mut self, target: Vector3<f32>, duration: f32) {
        self.request(MotionRequest::Translate { target, duration });
    }

    /// Scale to `target` over `duration` seconds.
    pub fn scale(&mut self, target: Vector3<f32>, duration: f32) {
        self.request(MotionRequest::Scale { target, duration });
    }

    /// Rotate by `angle` radians around `axis` over `duration` seconds.
    pub fn rotate_axis(&mut self, angle: f32, duration: f32, axis: Vector3<f32>) {
        self.request(MotionRequest::RotateAxis {
            angle,
            duration,
            axis,
        });
    }

    /// Rotate by `angle` radians around the vertical axis through `pivot`.
    pub fn rotate_around_point(&mut self, angle: f32, duration: f32, pivot: Point3<f32>) {
        self.rotate_around_point_axis(angle, duration, Vector3::y(), pivot);
    }

    /// Rotate by `angle` radians around `axis` through `pivot`.
    pub fn rotate_around_point_axis(
        &mut self,
        angle: f32,
        duration: f32,
        axis: Vector3<f32>,
        pivot: Point3<f32>,
    ) {
        self.request(MotionRequest::RotateAroundPoint {
            angle,
            duration,
            axis,
            pivot,
        });
    }

    /// Shear x by `y` times y plus `z` times z.
    pub fn shear_x(&mut self, y: f32, z: f32, duration: f32) {
        self.request(MotionRequest::shear(ShearAxis::X, y, z, duration));
    }

    /// Shear y by `x` times x plus `z` times z.
    pub fn shear_y(&mut self, x: f32, z: f32, duration: f32) {
        self.request(MotionRequest::shear(ShearAxis::Y, x, z, duration));
    }

    /// Shear z by `x` times x plus `y` times y.
    pub fn shear_z(&mut self, x: f32, y: f32, duration: f32) {
        self.request(MotionRequest::shear(ShearAxis::Z, x, y, duration));
    }

    /// Follow a cubic Bézier curve. The model ends exactly on `p3`.
    pub fn bezier(
        &mut self,
        p0: Vector3<f32>,
        p1: Vector3<f32>,
        p2: Vector3<f32>,
        p3: Vector3<f32>,
        duration: f32,
    ) {
        self.request(MotionRequest::Path {
            kind: CurveKind::Bezier,
            points: [p0, p1, p2, p3],
            duration,
        });
    }

    /// Follow a uniform cubic B-spline segment. The model ends on the
    /// curve's value at parameter 1.
    pub fn bspline(
        &mut self,
        p0: Vector3<f32>,
        p1: Vector3<f32>,
        p2: Vector3<f32>,
        p3: Vector3<f32>,
        duration: f32,
    ) {
        self.request(MotionRequest::Path {
            kind: CurveKind::BSpline,
            points: [p0, p1, p2, p3],
            duration,
        });
    }

    /// Enqueue a request described as data.
    pub fn request(&mut self, request: MotionRequest) {
        log::debug!(
            "queued {} motion ({}s)",
            request.channel_name(),
            request.duration()
        );
        match request {
            MotionRequest::Translate { target, duration } => {
                self.translation.push(Translate { target }, duration)
            }
            MotionRequest::Scale { target, duration } => {
                self.scale.push(Scale { target }, duration)
            }
            MotionRequest::RotateAxis {
                angle,
                duration,
                axis,
            } => self.rotation.push(AxisRotation::new(angle, axis), duration),
            MotionRequest::RotateAroundPoint {
                angle,
                duration,
                axis,
                pivot,
            } => self
                .pivot
                .push(PivotRotation::new(angle, axis, pivot), duration),
            MotionRequest::Shear {
                axis,
                first,
                second,
                duration,
            } => {
                let target = Shear {
                    axis,
                    first,
                    second,
                };
                self.shear.push(ShearTo { target }, duration)
            }
            MotionRequest::Path {
                kind,
                points,
                duration,
            } => self.path.push(PathMotion { kind, points }, duration),
        }
    }

    /// Advance every channel to `now` (seconds) and return the model matrix.
    ///
    /// While a path segment plays it overrides the translation, and the
    /// position it reaches becomes the starting point of later translations.
    pub fn evaluate(&mut self, now: f32) -> Matrix4<f32> {
        let mut position = self.translation.advance(now);
        if let Some(on_path) = self.path.advance_active(now) {
            self.translation.rest_at(on_path);
            position = on_path;
        }

        let shear = self.shear.advance(now).matrix();
        let pivot = self.pivot.advance(now);
        let rotation = self.rotation.advance(now);
        let scale = self.scale.advance(now);

        transform::compose(&position, &shear, &pivot, &rotation, &scale)
    }

    /// Position resolved by the last evaluation.
    pub fn position(&self) -> Vector3<f32> {
        *self.translation.value()
    }

    /// Per-axis scale resolved by the last evaluation.
    pub fn scale_factors(&self) -> Vector3<f32> {
        *self.scale.value()
    }

    /// Axis rotation resolved by the last evaluation, including every
    /// completed rotation.
    pub fn rotation(&self) -> Matrix4<f32> {
        *self.rotation.value()
    }

    /// Pivot rotation resolved by the last evaluation.
    pub fn pivot_rotation(&self) -> Matrix4<f32> {
        *self.pivot.value()
    }

    /// Shear resolved by the last evaluation.
    pub fn shear(&self) -> Shear {
        *self.shear.value()
    }

    /// True when every channel is idle with nothing queued.
    pub fn is_idle(&self) -> bool {
        self.translation.is_idle()
            && self.scale.is_idle()
            && self.rotation.is_idle()
            && self.pivot.is_idle()
            && self.shear.is_idle()
            && self.path.is_idle()
    }

    /// Number of requests waiting behind the active ones, over all channels.
    pub fn pending(&self) -> usize {
        self.translation.pending_len()
            + self.scale.pending_len()
            + self.rotation.pending_len()
            + self.pivot.pending_len()
            + self.shear.pending_len()
            + self.path.pending_len()
    }
}

impl Default for TransformScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_idle_scheduler_is_identity() {
        let mut scheduler = TransformScheduler::new();
        assert_eq!(scheduler.evaluate(0.0), Matrix4::identity());
        assert_eq!(scheduler.evaluate(10.0), Matrix4::identity());
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_scale_midpoint() {
        let mut scheduler = TransformScheduler::new();
        scheduler.scale(Vector3::new(2.0, 2.0, 2.0), 4.0);
        scheduler.evaluate(0.0);
        let m = scheduler.evaluate(2.0);
        assert_eq!(scheduler.scale_factors(), Vector3::new(1.5, 1.5, 1.5));
        assert_eq!(m[(0, 0)], 1.5);
    }

    #[test]
    fn test_shear_y_argument_order() {
        let mut scheduler = TransformScheduler::new();
        scheduler.shear_y(2.0, 3.0, 0.0);
        let m = scheduler.evaluate(0.0);
        // y' = y + 2x + 3z
        let p = m.transform_point(&Point3::new(1.0, 0.0, 1.0));
        assert_eq!(p, Point3::new(1.0, 5.0, 1.0));
    }

    #[test]
    fn test_path_overrides_translation() {
        let mut scheduler = TransformScheduler::new();
        scheduler.translate(Vector3::new(5.0, 0.0, 0.0), 2.0);
        let end = Vector3::new(0.0, 0.0, 4.0);
        scheduler.bezier(
            Vector3::zeros(),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 1.0, 4.0),
            end,
            1.0,
        );

        scheduler.evaluate(0.0);
        scheduler.evaluate(0.5);
        scheduler.evaluate(1.0);
        assert_eq!(scheduler.position(), end);

        // Path finished; translation resumes its own interpolation
        scheduler.evaluate(1.5);
        assert!((scheduler.position() - Vector3::new(3.75, 0.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_translation_after_path_starts_from_path_end() {
        let mut scheduler = TransformScheduler::new();
        let end = Vector3::new(1.0, 1.0, 1.0);
        scheduler.bezier(Vector3::zeros(), Vector3::zeros(), end, end, 1.0);
        scheduler.evaluate(0.0);
        scheduler.evaluate(1.0);

        scheduler.translate(Vector3::new(3.0, 1.0, 1.0), 2.0);
        scheduler.evaluate(2.0);
        assert_eq!(scheduler.position(), end);
        scheduler.evaluate(3.0);
        assert_eq!(scheduler.position(), Vector3::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn test_pivot_rotation_persists() {
        let mut scheduler = TransformScheduler::new();
        scheduler.rotate_around_point(PI, 1.0, Point3::new(1.0, 0.0, 0.0));
        scheduler.evaluate(0.0);
        scheduler.evaluate(1.0);
        let m = scheduler.evaluate(5.0);
        let origin = m.transform_point(&Point3::origin());
        assert!((origin - Point3::new(2.0, 0.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_request_dispatch() {
        let mut scheduler = TransformScheduler::new();
        scheduler.request(MotionRequest::Translate {
            target: Vector3::new(1.0, 2.0, 3.0),
            duration: 1.0,
        });
        scheduler.request(MotionRequest::Scale {
            target: Vector3::new(2.0, 2.0, 2.0),
            duration: 1.0,
        });
        scheduler.request(MotionRequest::Scale {
            target: Vector3::new(1.0, 1.0, 1.0),
            duration: 1.0,
        });
        assert_eq!(scheduler.pending(), 3);
        scheduler.evaluate(0.0);
        assert_eq!(scheduler.pending(), 1);
        assert!(!scheduler.is_idle());
    }

    #[test]
    fn test_direct_methods_match_requests() {
        let mut direct = TransformScheduler::new();
        direct.rotate_axis(1.0, 2.0, Vector3::x());
        direct.shear_z(0.5, 0.25, 1.0);
        direct.bspline(Vector3::zeros(), Vector3::x(), Vector3::y(), Vector3::z(), 1.0);

        let mut queued = TransformScheduler::new();
        queued.request(MotionRequest::RotateAxis {
            angle: 1.0,
            duration: 2.0,
            axis: Vector3::x(),
        });
        queued.request(MotionRequest::shear(ShearAxis::Z, 0.5, 0.25, 1.0));
        queued.request(MotionRequest::Path {
            kind: CurveKind::BSpline,
            points: [Vector3::zeros(), Vector3::x(), Vector3::y(), Vector3::z()],
            duration: 1.0,
        });

        for t in [0.0, 0.5, 1.0, 2.0] {
            assert_eq!(direct.evaluate(t), queued.evaluate(t));
        }
    }

    #[test]
    fn test_nan_duration_does_not_stall_later_requests() {
        let mut scheduler = TransformScheduler::new();
        scheduler.translate(Vector3::new(1.0, 0.0, 0.0), f32::NAN);
        scheduler.translate(Vector3::new(2.0, 0.0, 0.0), 0.0);
        scheduler.evaluate(0.0);
        let m = scheduler.evaluate(1.0);
        assert_eq!(scheduler.position(), Vector3::new(2.0, 0.0, 0.0));
        assert!(m.iter().all(|v| v.is_finite()));
    }
}
