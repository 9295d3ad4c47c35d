//! STL file parser for binary and ASCII formats
use nalgebra::{Point3, Vector3};
use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    combinator::opt,
    multi::{count, many0},
    number::complete::{float, le_f32, le_u16, le_u32},
    sequence::{preceded, tuple},
    IResult,
};

use super::{AssetLoadError, AssetResult};
use crate::geometry::{Mesh, Triangle, Vertex};

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> AssetResult<Mesh> {
    if data.len() < HEADER_LEN + 4 {
        return Err(AssetLoadError::parse("STL", "file too small to be a valid STL"));
    }

    let (body, triangle_count) = binary_header(data)
        .map_err(|e| AssetLoadError::parse("STL", format!("bad header: {e:?}")))?;
    let triangle_count = triangle_count as usize;
    if body.len() < triangle_count.saturating_mul(FACET_LEN) {
        return Err(AssetLoadError::parse(
            "STL",
            format!("header declares {triangle_count} triangles but the file is truncated"),
        ));
    }

    let (_, triangles) = count(binary_facet, triangle_count)(body)
        .map_err(|e| AssetLoadError::parse("STL", format!("bad facet: {e:?}")))?;
    Ok(Mesh {
        name: String::new(),
        triangles,
    })
}

fn binary_header(input: &[u8]) -> IResult<&[u8], u32> {
    preceded(take(HEADER_LEN), le_u32)(input)
}

fn binary_vector(input: &[u8]) -> IResult<&[u8], Vector3<f32>> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Triangle> {
    let (input, normal) = binary_vector(input)?;
    let (input, (a, b, c)) = tuple((binary_vector, binary_vector, binary_vector))(input)?;
    // Attribute byte count, unused
    let (input, _) = le_u16(input)?;

    let vertex = |p: Vector3<f32>| Vertex::from_parts(Point3::from(p), normal);
    Ok((input, Triangle::new(vertex(a), vertex(b), vertex(c))))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> AssetResult<Mesh> {
    match ascii_solid(input) {
        Ok((_, mesh)) => Ok(mesh),
        Err(e) => Err(AssetLoadError::parse("STL", format!("{e:?}"))),
    }
}

fn ascii_solid(input: &str) -> IResult<&str, Mesh> {
    let (input, name) = preceded(
        tuple((multispace0, tag("solid"))),
        opt(preceded(tag(" "), not_line_ending)),
    )(input)?;
    let (input, triangles) = many0(ascii_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;

    let mesh = Mesh {
        name: name.unwrap_or_default().trim().to_string(),
        triangles,
    };
    Ok((input, mesh))
}

fn ascii_facet(input: &str) -> IResult<&str, Triangle> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, normal) = ascii_vector(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, (a, b, c)) = tuple((ascii_vertex, ascii_vertex, ascii_vertex))(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    let vertex = |p: Vector3<f32>| Vertex::from_parts(Point3::from(p), normal);
    Ok((input, Triangle::new(vertex(a), vertex(b), vertex(c))))
}

fn ascii_vertex(input: &str) -> IResult<&str, Vector3<f32>> {
    preceded(tuple((multispace0, tag("vertex"))), ascii_vector)(input)
}

fn ascii_vector(input: &str) -> IResult<&str, Vector3<f32>> {
    let (input, (x, y, z)) = tuple((
        preceded(multispace0, float),
        preceded(multispace1, float),
        preceded(multispace1, float),
    ))(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

/// Detect and parse STL file (binary or ASCII)
///
/// Binary files may also start with `solid` in their header, so ASCII is
/// only accepted when it parses cleanly.
pub fn parse_stl(data: &[u8]) -> AssetResult<Mesh> {
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            match parse_ascii_stl(text) {
                Ok(mesh) => return Ok(mesh),
                Err(e) => log::debug!("not ASCII STL, trying binary: {e}"),
            }
        }
    }

    parse_binary_stl(data)
}
