//! ASCII rasterizer for terminal rendering
use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix3, Matrix4, Vector3};
use std::io::Write;

use anim3d_core::{project_clip, transform, Camera, Mesh, Triangle};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Dimmest character used for any visible face, so surfaces facing away
/// from the light still show their silhouette.
const MIN_SHADE: usize = 1;

/// Z-buffered renderer that turns meshes into terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
}

/// Per-mesh state shared by all of its triangles
struct Pass {
    mvp: Matrix4<f32>,
    normal_matrix: Matrix3<f32>,
    light_dir: Vector3<f32>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Reallocate the buffers for a new terminal size
    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    /// Number of cells covered by geometry since the last clear
    pub fn covered_cells(&self) -> usize {
        self.depth_buffer.iter().filter(|d| d.is_finite()).count()
    }

    pub fn render_mesh(&mut self, mesh: &Mesh, model_matrix: &Matrix4<f32>, camera: &Camera) {
        let linear: Matrix3<f32> = model_matrix.fixed_view::<3, 3>(0, 0).into_owned();
        // Inverse transpose keeps normals perpendicular under shear and
        // non-uniform scale
        let normal_matrix = linear
            .try_inverse()
            .map(|m| m.transpose())
            .unwrap_or(linear);
        let light_dir = (camera.position - camera.target)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::z);

        let pass = Pass {
            mvp: transform::mvp_matrix(
                model_matrix,
                &camera.view_matrix(),
                &camera.projection_matrix(),
            ),
            normal_matrix,
            light_dir,
        };

        for triangle in &mesh.triangles {
            self.render_triangle(triangle, &pass);
        }
    }

    fn render_triangle(&mut self, triangle: &Triangle, pass: &Pass) {
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match project_clip(
                &pass.mvp,
                &vertex.position,
                self.width as u32,
                self.height as u32,
            ) {
                Some(projected) => *slot = projected,
                None => return, // Triangle is clipped
            }
        }

        let normal = (pass.normal_matrix * triangle.calculate_normal())
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros);
        let brightness = normal.dot(&pass.light_dir).abs();
        self.rasterize_triangle(&screen_coords, shade(brightness));
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char) {
        let [v0, v1, v2] = *coords;

        // Bounding box clipped to the screen
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), p)
                else {
                    // Degenerate on screen
                    return;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = character;
                }
            }
        }
    }

    /// Queue the frame row by row; the caller flushes.
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            writer.queue(MoveTo(0, y as u16))?;
            let row = &self.char_buffer[y * self.width..(y + 1) * self.width];
            for &c in row {
                let color = color_for(c);
                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(c))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Map brightness in [0, 1] onto the luminosity ramp
fn shade(brightness: f32) -> char {
    let top = LUMINOSITY_RAMP.len() - 1;
    let index = (brightness.clamp(0.0, 1.0) * top as f32).round() as usize;
    LUMINOSITY_RAMP[index.clamp(MIN_SHADE, top)]
}

fn color_for(c: char) -> Color {
    match c {
        ' ' | '.' | ':' => Color::DarkGrey,
        '-' | '=' => Color::Grey,
        '+' | '*' => Color::White,
        _ => Color::Cyan,
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);
    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    Some((w0, w1, 1.0 - w0 - w1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_for(renderer: &AsciiRenderer) -> Camera {
        Camera::new(renderer.width as u32, renderer.height as u32)
    }

    fn cell(renderer: &AsciiRenderer, x: usize, y: usize) -> char {
        renderer.char_buffer[y * renderer.width + x]
    }

    #[test]
    fn test_cube_covers_centre() {
        let mut renderer = AsciiRenderer::new(40, 40);
        let camera = camera_for(&renderer);
        renderer.render_mesh(&Mesh::cube(1.0), &Matrix4::identity(), &camera);

        assert!(renderer.covered_cells() > 0);
        let centre = cell(&renderer, 20, 20);
        assert_ne!(centre, ' ');
        // Front face looks straight at the camera
        assert_eq!(centre, '@');
        assert_eq!(cell(&renderer, 0, 0), ' ');
    }

    #[test]
    fn test_translated_mesh_moves_on_screen() {
        let mut renderer = AsciiRenderer::new(40, 40);
        let camera = camera_for(&renderer);
        let model = transform::translation(&Vector3::new(0.8, 0.0, 0.0));
        renderer.render_mesh(&Mesh::cube(0.5), &model, &camera);

        assert_eq!(cell(&renderer, 20, 20), ' ');
        assert!(renderer.covered_cells() > 0);
    }

    #[test]
    fn test_clear_resets_buffers() {
        let mut renderer = AsciiRenderer::new(20, 20);
        let camera = camera_for(&renderer);
        renderer.render_mesh(&Mesh::cube(1.0), &Matrix4::identity(), &camera);
        renderer.clear();
        assert_eq!(renderer.covered_cells(), 0);
    }

    #[test]
    fn test_mesh_behind_camera_is_skipped() {
        let mut renderer = AsciiRenderer::new(20, 20);
        let camera = camera_for(&renderer);
        let model = transform::translation(&Vector3::new(0.0, 0.0, 10.0));
        renderer.render_mesh(&Mesh::cube(1.0), &model, &camera);
        assert_eq!(renderer.covered_cells(), 0);
    }

    #[test]
    fn test_draw_positions_every_row() {
        let renderer = AsciiRenderer::new(4, 3);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        // One cursor move per row, never a raw newline
        assert_eq!(text.matches('H').count(), 3);
        assert!(!text.contains('\n'));
    }

    #[test]
    fn test_shade_keeps_silhouette() {
        assert_eq!(shade(0.0), '.');
        assert_eq!(shade(1.0), '@');
        assert_eq!(shade(2.0), '@');
    }
}
