/// STL loading for custom tower models (binary and ASCII)
use nalgebra::{Point3, Vector3};
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::many0,
    number::complete::float,
    sequence::preceded,
    IResult,
};
use std::path::Path;

use crate::geometry::{Mesh, Triangle, Vertex};

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

#[derive(thiserror::Error, Debug)]
pub enum StlError {
    #[error("file too small to be a valid STL ({0} bytes)")]
    TooSmall(usize),

    #[error("unexpected end of file: header announces {expected} facets, found {found}")]
    Truncated { expected: usize, found: usize },

    #[error("failed to parse ASCII STL: {0}")]
    Parse(String),

    #[error("failed to read STL file: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, StlError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(StlError::TooSmall(data.len()));
    }

    let count = u32::from_le_bytes([data[80], data[81], data[82], data[83]]) as usize;
    let body = &data[HEADER_LEN + 4..];
    let available = body.len() / FACET_LEN;
    if available < count {
        return Err(StlError::Truncated {
            expected: count,
            found: available,
        });
    }

    let mut mesh = Mesh::with_capacity(count);
    for facet in body.chunks_exact(FACET_LEN).take(count) {
        let vector = |offset: usize| {
            Vector3::new(
                le_f32(facet, offset),
                le_f32(facet, offset + 4),
                le_f32(facet, offset + 8),
            )
        };
        let normal = vector(0);
        // Trailing 2 bytes are the attribute byte count
        mesh.add_triangle(facet_triangle(
            normal,
            [vector(12).into(), vector(24).into(), vector(36).into()],
        ));
    }

    Ok(mesh)
}

fn le_f32(bytes: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Exporters often leave the stored normal zeroed; fall back to the winding
fn facet_triangle(normal: Vector3<f32>, corners: [Point3<f32>; 3]) -> Triangle {
    let [a, b, c] = corners;
    match normal.try_normalize(1e-12) {
        Some(n) => Triangle::new(Vertex::at(a, n), Vertex::at(b, n), Vertex::at(c, n)),
        None => Triangle::from_points(a, b, c),
    }
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh, StlError> {
    match ascii_solid(input) {
        Ok((_, triangles)) => Ok(Mesh { triangles }),
        Err(e) => Err(StlError::Parse(e.to_string())),
    }
}

fn ascii_solid(input: &str) -> IResult<&str, Vec<Triangle>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = not_line_ending(input)?; // Optional name
    let (input, triangles) = many0(facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    Ok((input, triangles))
}

fn facet(input: &str) -> IResult<&str, Triangle> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, normal) = vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, a) = vertex(input)?;
    let (input, b) = vertex(input)?;
    let (input, c) = vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, facet_triangle(normal, [a.into(), b.into(), c.into()])))
}

fn vertex(input: &str) -> IResult<&str, Vector3<f32>> {
    preceded(preceded(multispace0, tag("vertex")), vector3)(input)
}

fn vector3(input: &str) -> IResult<&str, Vector3<f32>> {
    let (input, x) = preceded(multispace0, float)(input)?;
    let (input, y) = preceded(multispace1, float)(input)?;
    let (input, z) = preceded(multispace1, float)(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

/// Detect and parse STL file (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Mesh, StlError> {
    // Binary files may also start with "solid", so ASCII is only a first guess
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(mesh) = parse_ascii_stl(text) {
                return Ok(mesh);
            }
        }
    }

    parse_binary_stl(data)
}

/// Convert a Z-up model into the viewer frame: Y up, bounding box centered
/// on the origin so it lines up with generated towers.
pub fn into_scene_frame(mesh: Mesh) -> Mesh {
    let swap = |p: Point3<f32>| Point3::new(p.x, p.z, -p.y);
    let swap_normal = |n: Vector3<f32>| Vector3::new(n.x, n.z, -n.y);

    let mut mesh = Mesh {
        triangles: mesh
            .triangles
            .into_iter()
            .map(|t| {
                let [a, b, c] = t.vertices.map(|v| Vertex::at(swap(v.position), swap_normal(v.normal)));
                Triangle::new(a, b, c)
            })
            .collect(),
    };

    if let Some((min, max)) = mesh.bounds() {
        let center = nalgebra::center(&min, &max).coords;
        for triangle in &mut mesh.triangles {
            for vertex in &mut triangle.vertices {
                vertex.position -= center;
            }
        }
    }
    mesh
}

/// Load a Z-up STL model for use as a tower
pub fn load_stl(path: impl AsRef<Path>) -> Result<Mesh, StlError> {
    let data = std::fs::read(path)?;
    Ok(into_scene_frame(parse_stl(&data)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TETRA: &str = "solid tetra
  facet normal 0 0 -1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
  facet normal 0 0 0
    outer loop
      vertex 0 0 0
      vertex 0 1 0
      vertex 0 0 4
    endloop
  endfacet
endsolid tetra
";

    fn binary(triangles: &[[f32; 12]]) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_LEN];
        data.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
        for facet in triangles {
            for value in facet {
                data.extend_from_slice(&value.to_le_bytes());
            }
            data.extend_from_slice(&[0, 0]);
        }
        data
    }

    #[test]
    fn test_parse_binary_header() {
        let mesh = parse_binary_stl(&binary(&[])).unwrap();
        assert_eq!(mesh.triangles.len(), 0);
    }

    #[test]
    fn test_parse_binary_facets() {
        let data = binary(&[[0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]]);
        let mesh = parse_binary_stl(&data).unwrap();
        assert_eq!(mesh.triangles.len(), 1);
        assert_eq!(mesh.triangles[0].vertices[1].position, Point3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.triangles[0].vertices[0].normal, Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_binary_too_small_or_truncated() {
        assert!(matches!(parse_binary_stl(&[0u8; 10]), Err(StlError::TooSmall(10))));
        let mut data = binary(&[[0.0; 12]]);
        data[80] = 2;
        assert!(matches!(
            parse_binary_stl(&data),
            Err(StlError::Truncated { expected: 2, found: 1 })
        ));
    }

    #[test]
    fn test_parse_ascii() {
        let mesh = parse_stl(TETRA.as_bytes()).unwrap();
        assert_eq!(mesh.triangles.len(), 2);
        // Zeroed normal is recomputed from the winding
        let normal = mesh.triangles[1].vertices[0].normal;
        assert_relative_eq!(normal.x.abs(), 1.0);
    }

    #[test]
    fn test_scene_frame_uses_z_as_height() {
        let mesh = into_scene_frame(parse_ascii_stl(TETRA).unwrap());
        assert_relative_eq!(mesh.vertical_extent(), 4.0);
        let (min, max) = mesh.bounds().unwrap();
        assert_relative_eq!(min.y, -2.0);
        assert_relative_eq!(max.y, 2.0);
    }
}
