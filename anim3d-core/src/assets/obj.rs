//! Wavefront OBJ parser (positions, normals and faces)
//!
//! Texture coordinates, materials and smoothing groups are skipped. Each `o`
//! or `g` statement starts a new sub-mesh; polygons are fan-triangulated.
use nalgebra::{Point3, Vector3};
use nom::{
    character::complete::{char as symbol, i64 as integer, space0, space1},
    combinator::{all_consuming, map, opt},
    multi::separated_list1,
    number::complete::float,
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};

use super::{AssetLoadError, AssetResult};
use crate::geometry::{Mesh, Triangle, Vertex};

/// One corner of a face: position index and optional normal index, both
/// as written in the file (1-based, or negative for relative).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Corner {
    position: i64,
    normal: Option<i64>,
}

struct ObjBuilder {
    positions: Vec<Point3<f32>>,
    normals: Vec<Vector3<f32>>,
    meshes: Vec<Mesh>,
    current: Mesh,
}

impl ObjBuilder {
    fn new(name: &str) -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            meshes: Vec::new(),
            current: Mesh::named(name),
        }
    }

    fn start_group(&mut self, name: &str) {
        let next = Mesh::named(name);
        let finished = std::mem::replace(&mut self.current, next);
        if !finished.is_empty() {
            self.meshes.push(finished);
        }
    }

    fn add_face(&mut self, corners: &[Corner], line: usize) -> AssetResult<()> {
        if corners.len() < 3 {
            return Err(line_error(line, "face needs at least three vertices"));
        }

        let mut resolved = Vec::with_capacity(corners.len());
        for corner in corners {
            let position = self.positions[resolve(corner.position, self.positions.len(), line)?];
            let normal = match corner.normal {
                Some(index) => Some(self.normals[resolve(index, self.normals.len(), line)?]),
                None => None,
            };
            resolved.push((position, normal));
        }

        for k in 1..resolved.len() - 1 {
            let fan = [resolved[0], resolved[k], resolved[k + 1]];
            let triangle = match fan {
                [(a, Some(na)), (b, Some(nb)), (c, Some(nc))] => Triangle::new(
                    Vertex::from_parts(a, na),
                    Vertex::from_parts(b, nb),
                    Vertex::from_parts(c, nc),
                ),
                [(a, _), (b, _), (c, _)] => Triangle::flat(a, b, c),
            };
            self.current.add_triangle(triangle);
        }
        Ok(())
    }

    fn finish(mut self) -> Vec<Mesh> {
        if !self.current.is_empty() {
            self.meshes.push(self.current);
        }
        self.meshes
    }
}

/// Turn an OBJ index into a slice index.
fn resolve(index: i64, len: usize, line: usize) -> AssetResult<usize> {
    let resolved = match index {
        i if i > 0 => Some(i - 1),
        i if i < 0 => (len as i64).checked_add(i),
        _ => None,
    };
    match resolved {
        Some(i) if i >= 0 && (i as usize) < len => Ok(i as usize),
        _ => Err(line_error(line, format!("index {index} out of range"))),
    }
}

fn line_error(line: usize, message: impl std::fmt::Display) -> AssetLoadError {
    AssetLoadError::parse("OBJ", format!("line {line}: {message}"))
}

/// Parse OBJ text into sub-meshes. `name` labels geometry that appears
/// before any group statement.
pub fn parse_obj(text: &str, name: &str) -> AssetResult<Vec<Mesh>> {
    let mut builder = ObjBuilder::new(name);

    for (number, raw) in text.lines().enumerate() {
        let line = number + 1;
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }
        let (keyword, args) = content
            .split_once(char::is_whitespace)
            .unwrap_or((content, ""));
        let args = args.trim();

        match keyword {
            "v" => {
                let v = parse_args(vector_with_w, args, line)?;
                builder.positions.push(Point3::from(v));
            }
            "vn" => {
                let n = parse_args(vector, args, line)?;
                builder.normals.push(n);
            }
            "f" => {
                let corners = parse_args(face, args, line)?;
                builder.add_face(&corners, line)?;
            }
            "o" | "g" => builder.start_group(args),
            _ => {}
        }
    }

    Ok(builder.finish())
}

fn parse_args<'a, T>(
    parser: impl FnMut(&'a str) -> IResult<&'a str, T>,
    args: &'a str,
    line: usize,
) -> AssetResult<T> {
    all_consuming(terminated(parser, space0))(args)
        .map(|(_, value)| value)
        .map_err(|e| line_error(line, format!("{e:?}")))
}

fn vector(input: &str) -> IResult<&str, Vector3<f32>> {
    map(
        tuple((float, preceded(space1, float), preceded(space1, float))),
        |(x, y, z)| Vector3::new(x, y, z),
    )(input)
}

/// Position with the optional homogeneous weight, which is ignored.
fn vector_with_w(input: &str) -> IResult<&str, Vector3<f32>> {
    terminated(vector, opt(preceded(space1, float)))(input)
}

fn face(input: &str) -> IResult<&str, Vec<Corner>> {
    separated_list1(space1, corner)(input)
}

/// `v`, `v/vt`, `v//vn` or `v/vt/vn`
fn corner(input: &str) -> IResult<&str, Corner> {
    let (input, position) = integer(input)?;
    let (input, rest) = opt(preceded(
        symbol('/'),
        pair(opt(integer), opt(preceded(symbol('/'), integer))),
    ))(input)?;
    let normal = rest.and_then(|(_texture, normal)| normal);
    Ok((input, Corner { position, normal }))
}
