//! Polygon meshes that expand into triangle groups.
//!
//! A mesh is plain vertex and face data; [`Scene::mesh`](crate::Scene::mesh)
//! turns it into triangle objects, optionally dropping faces turned away
//! from a camera.

use lume_math::{Vec3, Vec3Ext};

/// Vertex positions and counter-clockwise triangle faces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions
    pub vertices: Vec<Vec3>,

    /// Triangles as indices into `vertices`
    pub faces: Vec<[usize; 3]>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vec3>, faces: Vec<[usize; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Axis-aligned unit cube centered at the origin, faces wound outward.
    pub fn cube() -> Self {
        let vertices = vec![
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(0.5, -0.5, -0.5),
            Vec3::new(0.5, 0.5, -0.5),
            Vec3::new(-0.5, 0.5, -0.5),
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(0.5, -0.5, 0.5),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(-0.5, 0.5, 0.5),
        ];
        let faces = vec![
            [4, 5, 6], [4, 6, 7], // +Z
            [1, 0, 3], [1, 3, 2], // -Z
            [5, 1, 2], [5, 2, 6], // +X
            [0, 4, 7], [0, 7, 3], // -X
            [7, 6, 2], [7, 2, 3], // +Y
            [0, 1, 5], [0, 5, 4], // -Y
        ];
        Self { vertices, faces }
    }

    /// Mean of the vertex positions.
    pub fn centroid(&self) -> Vec3 {
        if self.vertices.is_empty() {
            return Vec3::ZERO;
        }
        self.vertices.iter().sum::<Vec3>() / self.vertices.len() as f32
    }

    /// Distance from the centroid to the farthest vertex.
    pub fn bounding_radius(&self) -> f32 {
        let center = self.centroid();
        self.vertices
            .iter()
            .map(|v| v.distance(center))
            .fold(0.0, f32::max)
    }

    pub fn translate(mut self, offset: Vec3) -> Self {
        for v in &mut self.vertices {
            *v += offset;
        }
        self
    }

    /// Scale per axis about the centroid.
    pub fn scale(mut self, factor: Vec3) -> Self {
        let center = self.centroid();
        for v in &mut self.vertices {
            *v = center + (*v - center) * factor;
        }
        self
    }

    /// Rotate about the vertical axis through the centroid.
    pub fn rotate_y(self, angle: f32) -> Self {
        self.rotate(Vec3::Y, angle)
    }

    /// Rotate about `axis` through the centroid.
    pub fn rotate(mut self, axis: Vec3, angle: f32) -> Self {
        let center = self.centroid();
        for v in &mut self.vertices {
            *v = v.rotate_around(center, axis, angle);
        }
        self
    }
}
