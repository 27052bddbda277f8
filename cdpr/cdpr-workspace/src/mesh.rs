//! Triangle meshes bounding a workspace.

use nalgebra::Vector3;

/// An indexed triangle mesh.
///
/// Faces are wound counter-clockwise when seen from outside.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Vector3<f64>>,
    /// Triangles as vertex index triples.
    pub faces: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Regular octahedron with unit vertices on the coordinate axes.
    #[must_use]
    pub fn octahedron() -> Self {
        Self {
            vertices: vec![
                Vector3::x(),
                -Vector3::x(),
                Vector3::y(),
                -Vector3::y(),
                Vector3::z(),
                -Vector3::z(),
            ],
            faces: vec![
                [0, 2, 4],
                [2, 1, 4],
                [1, 3, 4],
                [3, 0, 4],
                [2, 0, 5],
                [1, 2, 5],
                [3, 1, 5],
                [0, 3, 5],
            ],
        }
    }

    /// Whether the mesh has no faces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Corner positions of each face.
    pub fn triangles(&self) -> impl Iterator<Item = [Vector3<f64>; 3]> + '_ {
        self.faces
            .iter()
            .map(|face| face.map(|i| self.vertices[i as usize]))
    }

    /// Total area of all faces.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| 0.5 * (b - a).cross(&(c - a)).norm())
            .sum()
    }

    /// Signed enclosed volume by the divergence theorem.
    ///
    /// Positive for closed meshes with outward winding.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| a.dot(&b.cross(&c)))
            .sum::<f64>()
            / 6.0
    }

    /// Absolute enclosed volume.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_octahedron_measures() {
        let mesh = TriangleMesh::octahedron();
        assert_relative_eq!(mesh.signed_volume(), 4.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(mesh.surface_area(), 4.0 * 3.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_octahedron_faces_point_outward() {
        let mesh = TriangleMesh::octahedron();
        for [a, b, c] in mesh.triangles() {
            let normal = (b - a).cross(&(c - a));
            assert!(normal.dot(&(a + b + c)) > 0.0);
        }
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = TriangleMesh::new();
        assert!(mesh.is_empty());
        assert_relative_eq!(mesh.volume(), 0.0);
        assert_relative_eq!(mesh.surface_area(), 0.0);
    }
}
