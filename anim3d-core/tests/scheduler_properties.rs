use std::f32::consts::FRAC_PI_2;

use anim3d_core::motion::channel::Channel;
use anim3d_core::motion::ops::Translate;
use anim3d_core::transform;
use anim3d_core::{CurveKind, MotionRequest, ShearAxis, TransformScheduler};
use nalgebra::{Matrix4, Point3, Unit, Vector3};

fn translation_of(m: &Matrix4<f32>) -> Vector3<f32> {
    Vector3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)])
}

#[test]
fn translation_hits_start_and_end_exactly() {
    let mut scheduler = TransformScheduler::new();
    scheduler.translate(Vector3::new(0.3, -0.7, 1.1), 3.0);

    let start = scheduler.evaluate(0.25);
    assert_eq!(translation_of(&start), Vector3::zeros());

    let end = scheduler.evaluate(3.25);
    assert_eq!(translation_of(&end), Vector3::new(0.3, -0.7, 1.1));
    assert_eq!(scheduler.position(), Vector3::new(0.3, -0.7, 1.1));
}

#[test]
fn progress_is_monotonic() {
    let mut scheduler = TransformScheduler::new();
    scheduler.translate(Vector3::new(10.0, 0.0, 0.0), 5.0);
    scheduler.evaluate(0.0);

    let mut last = 0.0;
    for step in 1..=50 {
        let x = translation_of(&scheduler.evaluate(step as f32 * 0.1)).x;
        assert!(x >= last, "x went backwards at step {step}");
        assert!((0.0..=10.0).contains(&x));
        last = x;
    }
}

#[test]
fn fifo_second_starts_after_first_resolves() {
    let mut channel = Channel::new("translate", Vector3::zeros());
    channel.push(
        Translate {
            target: Vector3::x(),
        },
        1.0,
    );
    channel.push(
        Translate {
            target: Vector3::y(),
        },
        1.0,
    );

    channel.advance(0.0);
    assert_eq!(channel.active().map(|s| s.motion.target), Some(Vector3::x()));
    channel.advance(0.9);
    assert_eq!(channel.active().map(|s| s.motion.target), Some(Vector3::x()));

    // First resolves here; second is still queued
    assert_eq!(channel.advance(1.4), Vector3::x());
    assert!(channel.active().is_none());
    assert_eq!(channel.pending_len(), 1);

    channel.advance(2.0);
    let second = channel.active().map(|s| (s.start, s.initial));
    assert_eq!(second, Some((2.0, Vector3::x())));
}

#[test]
fn zero_duration_jumps_without_nan() {
    let mut scheduler = TransformScheduler::new();
    scheduler.scale(Vector3::new(0.5, 0.5, 0.5), 0.0);
    scheduler.translate(Vector3::new(1.0, 2.0, 3.0), 0.0);
    scheduler.rotate_axis(FRAC_PI_2, 0.0, Vector3::y());
    scheduler.shear_x(0.5, 0.5, 0.0);

    let m = scheduler.evaluate(7.0);
    assert!(m.iter().all(|v| v.is_finite()));
    assert_eq!(scheduler.scale_factors(), Vector3::new(0.5, 0.5, 0.5));
    assert_eq!(translation_of(&m), Vector3::new(1.0, 2.0, 3.0));
}

#[test]
fn negative_duration_is_instant() {
    let mut scheduler = TransformScheduler::new();
    scheduler.translate(Vector3::new(4.0, 0.0, 0.0), -2.0);
    let m = scheduler.evaluate(1.0);
    assert_eq!(translation_of(&m), Vector3::new(4.0, 0.0, 0.0));
}

#[test]
fn two_quarter_turns_make_a_half_turn() {
    let mut scheduler = TransformScheduler::new();
    scheduler.rotate_axis(FRAC_PI_2, 1.0, Vector3::y());
    scheduler.rotate_axis(FRAC_PI_2, 1.0, Vector3::y());

    for t in [0.0, 0.5, 1.0, 1.0, 1.5, 2.0] {
        scheduler.evaluate(t);
    }

    let half_turn = Matrix4::new_rotation(Vector3::new(0.0, std::f32::consts::PI, 0.0));
    assert!((scheduler.rotation() - half_turn).norm() < 1e-5);

    // Holds once the queue is empty
    let later = scheduler.evaluate(10.0);
    assert!((later - half_turn).norm() < 1e-5);
}

#[test]
fn rotation_in_progress_builds_on_completed_ones() {
    let mut scheduler = TransformScheduler::new();
    scheduler.rotate_axis(FRAC_PI_2, 0.0, Vector3::z());
    scheduler.rotate_axis(FRAC_PI_2, 2.0, Vector3::z());
    scheduler.evaluate(0.0);
    scheduler.evaluate(1.0);
    let m = scheduler.evaluate(2.0);

    // 90 degrees done plus half of the second 90
    let p = m.transform_point(&Point3::new(1.0, 0.0, 0.0));
    let angle = 135f32.to_radians();
    assert!((p - Point3::new(angle.cos(), angle.sin(), 0.0)).norm() < 1e-5);
}

#[test]
fn bezier_ends_on_last_control_point() {
    let mut scheduler = TransformScheduler::new();
    let p3 = Vector3::new(0.7, -0.2, 1.9);
    scheduler.bezier(
        Vector3::new(0.1, 0.0, 0.0),
        Vector3::new(0.3, 1.0, 0.0),
        Vector3::new(0.9, 1.0, 0.5),
        p3,
        2.0,
    );
    scheduler.evaluate(0.0);
    let m = scheduler.evaluate(2.0);
    assert_eq!(translation_of(&m), p3);
}

#[test]
fn bspline_ends_on_curve_value() {
    let ones = Vector3::new(1.0, 1.0, 1.0);
    let mut scheduler = TransformScheduler::new();
    scheduler.bspline(ones, ones, ones, ones, 1.0);
    scheduler.evaluate(0.0);
    let m = scheduler.evaluate(1.0);
    assert!((translation_of(&m) - ones).norm() < 1e-6);

    let points = [
        Vector3::zeros(),
        Vector3::new(0.0, 6.0, 0.0),
        Vector3::new(6.0, 6.0, 0.0),
        Vector3::new(6.0, 0.0, 0.0),
    ];
    scheduler.request(MotionRequest::Path {
        kind: CurveKind::BSpline,
        points,
        duration: 1.0,
    });
    scheduler.evaluate(2.0);
    let m = scheduler.evaluate(3.0);
    // (p1 + 4 p2 + p3) / 6
    assert!((translation_of(&m) - Vector3::new(5.0, 5.0, 0.0)).norm() < 1e-5);
}

#[test]
fn scale_midpoint_is_exact() {
    let mut scheduler = TransformScheduler::new();
    scheduler.scale(Vector3::new(2.0, 2.0, 2.0), 4.0);
    scheduler.evaluate(0.0);
    let m = scheduler.evaluate(2.0);
    assert_eq!(scheduler.scale_factors(), Vector3::new(1.5, 1.5, 1.5));
    assert_eq!((m[(0, 0)], m[(1, 1)], m[(2, 2)]), (1.5, 1.5, 1.5));
}

#[test]
fn same_time_evaluation_is_stable_mid_segment() {
    let mut scheduler = TransformScheduler::new();
    scheduler.translate(Vector3::new(1.0, 1.0, 0.0), 2.0);
    scheduler.rotate_axis(1.0, 2.0, Vector3::x());
    scheduler.evaluate(0.0);
    let a = scheduler.evaluate(0.75);
    let b = scheduler.evaluate(0.75);
    assert_eq!(a, b);
}

#[test]
fn queued_requests_do_not_expire_while_waiting() {
    let mut scheduler = TransformScheduler::new();
    scheduler.translate(Vector3::new(2.0, 0.0, 0.0), 1.0);
    scheduler.translate(Vector3::new(4.0, 0.0, 0.0), 2.0);

    scheduler.evaluate(0.0);
    scheduler.evaluate(1.0);
    // Long pause before the next frame
    scheduler.evaluate(30.0);
    let m = scheduler.evaluate(31.0);
    assert_eq!(translation_of(&m), Vector3::new(3.0, 0.0, 0.0));
}

#[test]
fn composition_order_is_translate_shear_pivot_rotate_scale() {
    let position = Vector3::new(1.0, -0.5, 2.0);
    let factors = Vector3::new(2.0, 1.0, 0.5);
    let pivot = Point3::new(0.5, 0.0, -1.0);

    let mut scheduler = TransformScheduler::new();
    scheduler.translate(position, 0.0);
    scheduler.scale(factors, 0.0);
    scheduler.rotate_axis(FRAC_PI_2, 0.0, Vector3::z());
    scheduler.rotate_around_point(FRAC_PI_2, 0.0, pivot);
    scheduler.shear_y(0.5, 0.25, 0.0);
    let m = scheduler.evaluate(0.0);

    let y_axis = Unit::new_normalize(Vector3::y());
    let z_axis = Unit::new_normalize(Vector3::z());
    let expected = transform::translation(&position)
        * transform::shear_matrix(ShearAxis::Y, 0.25, 0.5)
        * transform::pivot_rotation(&y_axis, FRAC_PI_2, &pivot)
        * transform::axis_rotation(&z_axis, FRAC_PI_2)
        * transform::scaling(&factors);
    assert!((m - expected).norm() < 1e-5);

    // Any other order gives a different matrix
    let swapped = transform::translation(&position)
        * transform::pivot_rotation(&y_axis, FRAC_PI_2, &pivot)
        * transform::shear_matrix(ShearAxis::Y, 0.25, 0.5)
        * transform::axis_rotation(&z_axis, FRAC_PI_2)
        * transform::scaling(&factors);
    assert!((m - swapped).norm() > 1e-2);
}

#[test]
fn nan_duration_completes_and_later_requests_run() {
    let mut scheduler = TransformScheduler::new();
    scheduler.translate(Vector3::new(1.0, 0.0, 0.0), f32::NAN);
    scheduler.translate(Vector3::new(2.0, 0.0, 0.0), 0.0);

    for t in [0.0, 1.0, 1.0e6] {
        scheduler.evaluate(t);
    }
    assert_eq!(scheduler.position(), Vector3::new(2.0, 0.0, 0.0));
    assert!(scheduler.is_idle());
}
