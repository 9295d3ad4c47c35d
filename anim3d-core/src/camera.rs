//! Camera supplying view and projection matrices to the renderers
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Direction for camera movement relative to where it looks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 3.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: 45f32.to_radians(),
            aspect: width as f32 / height.max(1) as f32,
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Update the aspect ratio after a resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// View matrix (world to camera)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Projection matrix (camera to clip space)
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                // Visible height equals the distance to the target
                let half_h = 0.5 * (self.position - self.target).norm();
                let half_w = half_h * self.aspect;
                Matrix4::new_orthographic(-half_w, half_w, -half_h, half_h, self.near, self.far)
            }
        }
    }

    /// Slide the camera and its target together
    pub fn move_relative(&mut self, direction: CameraMovement, amount: f32) {
        let forward = (self.target - self.position)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(|| -Vector3::z());
        let right = forward
            .cross(&self.up)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::x);
        let step = match direction {
            CameraMovement::Forward => forward,
            CameraMovement::Backward => -forward,
            CameraMovement::Right => right,
            CameraMovement::Left => -right,
        } * amount;
        self.position += step;
        self.target += step;
    }
}

/// Project a point through `mvp` to screen space
///
/// Returns `(x, y, depth)` with depth in normalized device coordinates,
/// or `None` when the point falls outside the view volume.
pub fn project_clip(
    mvp: &Matrix4<f32>,
    point: &Point3<f32>,
    width: u32,
    height: u32,
) -> Option<(f32, f32, f32)> {
    let clip: Vector4<f32> = mvp * point.to_homogeneous();

    // Behind the camera or degenerate
    if clip.w <= 1e-6 {
        return None;
    }

    let ndc = clip.xyz() / clip.w;
    if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 || ndc.z.abs() > 1.0 {
        return None;
    }

    let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
    let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;
    Some((screen_x, screen_y, ndc.z))
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
