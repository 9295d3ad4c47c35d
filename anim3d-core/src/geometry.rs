//! Geometry primitives for drawable sub-meshes
use nalgebra::{Point3, Vector3};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self::from_parts(Point3::new(x, y, z), Vector3::new(nx, ny, nz))
    }

    pub fn from_parts(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Build a triangle from positions alone, using the face normal for
    /// every vertex.
    pub fn flat(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        let normal = face_normal(&a, &b, &c);
        Self::new(
            Vertex::from_parts(a, normal),
            Vertex::from_parts(b, normal),
            Vertex::from_parts(c, normal),
        )
    }

    /// Face normal from the winding of the vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let [v0, v1, v2] = &self.vertices;
        face_normal(&v0.position, &v1.position, &v2.position)
    }
}

/// Counter-clockwise face normal. Degenerate faces get a zero vector.
fn face_normal(a: &Point3<f32>, b: &Point3<f32>, c: &Point3<f32>) -> Vector3<f32> {
    (b - a)
        .cross(&(c - a))
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vector3::zeros)
}

/// One drawable piece of a model
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub name: String,
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            name: String::new(),
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let mut points = self
            .triangles
            .iter()
            .flat_map(|t| t.vertices.iter().map(|v| v.position));
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| {
            (min.inf(&p), max.sup(&p))
        }))
    }

    /// Axis-aligned cube centred on the origin
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        // (normal, u, v) with u x v == normal so every face winds outwards
        let faces = [
            (Vector3::x(), Vector3::y(), Vector3::z()),
            (-Vector3::x(), Vector3::z(), Vector3::y()),
            (Vector3::y(), Vector3::z(), Vector3::x()),
            (-Vector3::y(), Vector3::x(), Vector3::z()),
            (Vector3::z(), Vector3::x(), Vector3::y()),
            (-Vector3::z(), Vector3::y(), Vector3::x()),
        ];

        let mut mesh = Self::named("cube");
        for (normal, u, v) in faces {
            let corner = |su: f32, sv: f32| {
                let p = (normal + u * su + v * sv) * half;
                Vertex::from_parts(Point3::from(p), normal)
            };
            let (a, b, c, d) = (
                corner(-1.0, -1.0),
                corner(1.0, -1.0),
                corner(1.0, 1.0),
                corner(-1.0, 1.0),
            );
            mesh.add_triangle(Triangle::new(a, b, c));
            mesh.add_triangle(Triangle::new(a, c, d));
        }
        mesh
    }
}
