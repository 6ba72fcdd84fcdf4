/// Triangle meshes and the primitive builders used for towers, rings and equipment
use nalgebra::{Point3, Vector3};
use std::f32::consts::TAU;

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }

    pub fn at(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices, wound counter-clockwise
/// when seen from the side its normal points to
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

    /// Build a triangle from bare positions, using the face normal for every vertex.
    pub fn from_points(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        let normal = face_normal(&a, &b, &c).unwrap_or_else(Vector3::zeros);
        Self::new(Vertex::at(a, normal), Vertex::at(b, normal), Vertex::at(c, normal))
    }

    /// Face normal from the winding order, `None` for a degenerate (zero-area) face
    pub fn face_normal(&self) -> Option<Vector3<f32>> {
        face_normal(
            &self.vertices[0].position,
            &self.vertices[1].position,
            &self.vertices[2].position,
        )
    }
}

fn face_normal(a: &Point3<f32>, b: &Point3<f32>, c: &Point3<f32>) -> Option<Vector3<f32>> {
    let edge1 = b - a;
    let edge2 = c - a;
    edge1.cross(&edge2).try_normalize(1e-12)
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Append all triangles of `other`.
    pub fn merge(&mut self, other: Mesh) {
        self.triangles.extend(other.triangles);
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Axis-aligned bounding box as `(min, max)`, `None` for an empty mesh
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

    /// Height of the bounding box along Y. Custom models carry no explicit
    /// height, so camera framing reads it from here.
    pub fn vertical_extent(&self) -> f32 {
        self.bounds().map_or(0.0, |(min, max)| max.y - min.y)
    }

    /// Axis-aligned box centered at the origin. Zero dimensions are allowed
    /// and produce a degenerate, still well-formed mesh.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let (x, y, z) = (width / 2.0, height / 2.0, depth / 2.0);
        let mut mesh = Self::with_capacity(12);
        let p = Point3::new;

        // Front, back
        mesh.add_quad([p(-x, -y, z), p(x, -y, z), p(x, y, z), p(-x, y, z)], Vector3::z());
        mesh.add_quad([p(x, -y, -z), p(-x, -y, -z), p(-x, y, -z), p(x, y, -z)], -Vector3::z());
        // Top, bottom
        mesh.add_quad([p(-x, y, z), p(x, y, z), p(x, y, -z), p(-x, y, -z)], Vector3::y());
        mesh.add_quad([p(-x, -y, -z), p(x, -y, -z), p(x, -y, z), p(-x, -y, z)], -Vector3::y());
        // Right, left
        mesh.add_quad([p(x, -y, z), p(x, -y, -z), p(x, y, -z), p(x, y, z)], Vector3::x());
        mesh.add_quad([p(-x, -y, -z), p(-x, -y, z), p(-x, y, z), p(-x, y, -z)], -Vector3::x());

        mesh
    }

    /// Cube of equal edge length
    pub fn cube(size: f32) -> Self {
        Self::cuboid(size, size, size)
    }

    /// Capped tapered cylinder centered at the origin with its axis along Y.
    /// Angle 0 sits on +Z and grows towards +X.
    pub fn frustum(radius_top: f32, radius_bottom: f32, height: f32, segments: usize) -> Self {
        let segments = segments.max(3);
        let half = height / 2.0;
        let ring = |radius: f32, y: f32| -> Vec<Point3<f32>> {
            (0..=segments)
                .map(|i| {
                    let theta = TAU * i as f32 / segments as f32;
                    Point3::new(radius * theta.sin(), y, radius * theta.cos())
                })
                .collect()
        };
        let top = ring(radius_top, half);
        let bottom = ring(radius_bottom, -half);
        let top_center = Point3::new(0.0, half, 0.0);
        let bottom_center = Point3::new(0.0, -half, 0.0);

        let mut mesh = Self::with_capacity(segments * 4);
        for i in 0..segments {
            let (b0, b1, t0, t1) = (bottom[i], bottom[i + 1], top[i], top[i + 1]);
            mesh.add_side(b0, b1, t1);
            mesh.add_side(b0, t1, t0);
            mesh.add_triangle(Triangle::from_points(top_center, t0, t1));
            mesh.add_triangle(Triangle::from_points(bottom_center, b1, b0));
        }

        // A cone tip or a zero-radius cap leaves zero-area faces behind
        mesh.triangles.retain(|t| t.face_normal().is_some());
        mesh
    }

    /// Straight cylinder, a frustum with equal radii
    pub fn cylinder(radius: f32, height: f32, segments: usize) -> Self {
        Self::frustum(radius, radius, height, segments)
    }

    /// Single triangle visible from both sides
    pub fn double_sided_triangle(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        let mut mesh = Self::with_capacity(2);
        mesh.add_triangle(Triangle::from_points(a, b, c));
        mesh.add_triangle(Triangle::from_points(a, c, b));
        mesh
    }

    fn add_quad(&mut self, corners: [Point3<f32>; 4], normal: Vector3<f32>) {
        let [a, b, c, d] = corners;
        self.add_triangle(Triangle::new(
            Vertex::at(a, normal),
            Vertex::at(b, normal),
            Vertex::at(c, normal),
        ));
        self.add_triangle(Triangle::new(
            Vertex::at(a, normal),
            Vertex::at(c, normal),
            Vertex::at(d, normal),
        ));
    }

    fn add_side(&mut self, a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) {
        // Smooth shading: radial normal per vertex
        let radial = |p: Point3<f32>| {
            Vector3::new(p.x, 0.0, p.z)
                .try_normalize(1e-12)
                .unwrap_or_else(Vector3::zeros)
        };
        self.add_triangle(Triangle::new(
            Vertex::at(a, radial(a)),
            Vertex::at(b, radial(b)),
            Vertex::at(c, radial(c)),
        ));
    }
}
