//! Matrix algebra shared by the motion scheduler and the renderers
use nalgebra::{Matrix4, Point3, Rotation3, Unit, Vector3};

/// The axis a shear acts along.
///
/// A shear along `X` offsets x by multiples of y and z, and so on cyclically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShearAxis {
    X,
    Y,
    Z,
}

impl ShearAxis {
    /// Row index of the sheared coordinate.
    pub fn index(self) -> usize {
        match self {
            ShearAxis::X => 0,
            ShearAxis::Y => 1,
            ShearAxis::Z => 2,
        }
    }

    /// Reorder the two off-axis factors, given in x, y, z order, into the
    /// `(first, second)` cyclic order used by [`shear_matrix`].
    pub fn cyclic_factors(self, a: f32, b: f32) -> (f32, f32) {
        match self {
            // (y, z) and (x, y) are already cyclic
            ShearAxis::X | ShearAxis::Z => (a, b),
            // (x, z) becomes (z, x)
            ShearAxis::Y => (b, a),
        }
    }
}

/// Create a translation matrix
pub fn translation(offset: &Vector3<f32>) -> Matrix4<f32> {
    Matrix4::new_translation(offset)
}

/// Create a non-uniform scale matrix
pub fn scaling(factors: &Vector3<f32>) -> Matrix4<f32> {
    Matrix4::new_nonuniform_scaling(factors)
}

/// Rotation of `angle` radians around a unit axis through the origin.
pub fn axis_rotation(axis: &Unit<Vector3<f32>>, angle: f32) -> Matrix4<f32> {
    Rotation3::from_axis_angle(axis, angle).to_homogeneous()
}

/// Rotation of `angle` radians around an axis passing through `pivot`.
///
/// Equivalent to `T(pivot) * R(angle) * T(-pivot)`.
pub fn pivot_rotation(
    axis: &Unit<Vector3<f32>>,
    angle: f32,
    pivot: &Point3<f32>,
) -> Matrix4<f32> {
    let offset = pivot.coords;
    translation(&offset) * axis_rotation(axis, angle) * translation(&-offset)
}

/// Shear matrix for one axis.
///
/// `first` multiplies the next axis in cyclic order and `second` the one after
/// it, so `shear_matrix(ShearAxis::X, a, b)` maps `x` to `x + a*y + b*z`.
pub fn shear_matrix(axis: ShearAxis, first: f32, second: f32) -> Matrix4<f32> {
    let row = axis.index();
    let mut matrix = Matrix4::identity();
    matrix[(row, (row + 1) % 3)] = first;
    matrix[(row, (row + 2) % 3)] = second;
    matrix
}

/// Compose the per-channel matrices in the fixed model order:
/// translate, shear, pivot rotation, axis rotation, scale.
pub fn compose(
    position: &Vector3<f32>,
    shear: &Matrix4<f32>,
    pivot: &Matrix4<f32>,
    rotation: &Matrix4<f32>,
    scale: &Vector3<f32>,
) -> Matrix4<f32> {
    translation(position) * shear * pivot * rotation * scaling(scale)
}

/// Create a model-view-projection matrix
pub fn mvp_matrix(
    model: &Matrix4<f32>,
    view: &Matrix4<f32>,
    projection: &Matrix4<f32>,
) -> Matrix4<f32> {
    projection * view * model
}
