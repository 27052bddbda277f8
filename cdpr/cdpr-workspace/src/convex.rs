//! Incremental 3D convex hull.
//!
//! Starts from a non-degenerate tetrahedron and adds the remaining points one
//! at a time, replacing the faces a point can see by a fan connecting it to the
//! horizon.

// Point counts stay far below u32::MAX
#![allow(clippy::cast_possible_truncation)]

use hashbrown::{HashMap, HashSet};
use nalgebra::Vector3;

use crate::mesh::TriangleMesh;

/// Relative tolerance for coplanarity and visibility tests.
const EPSILON: f64 = 1e-10;

/// Convex hull of a point set with outward-wound faces.
///
/// Returns an empty mesh when fewer than four points are given or all points
/// are coplanar.
#[must_use]
pub fn convex_hull(points: &[Vector3<f64>]) -> TriangleMesh {
    if points.len() < 4 {
        return TriangleMesh::new();
    }
    let scale = points
        .iter()
        .map(|p| p.amax())
        .fold(0.0_f64, f64::max)
        .max(1.0);
    let eps = EPSILON * scale;

    let Some(seed) = initial_tetrahedron(points, eps) else {
        return TriangleMesh::new();
    };

    let interior = seed.iter().map(|&i| points[i]).sum::<Vector3<f64>>() / 4.0;
    let [a, b, c, d] = seed;
    let mut faces: Vec<[usize; 3]> = [[a, b, c], [a, b, d], [a, c, d], [b, c, d]]
        .into_iter()
        .map(|face| orient_outward(face, points, &interior))
        .collect();

    for (index, point) in points.iter().enumerate() {
        if seed.contains(&index) {
            continue;
        }

        let (visible, kept): (Vec<[usize; 3]>, Vec<[usize; 3]>) = faces
            .into_iter()
            .partition(|face| signed_distance(face, points, point) > eps);
        faces = kept;
        if visible.is_empty() {
            continue;
        }

        let visible_edges: HashSet<(usize, usize)> = visible
            .iter()
            .flat_map(|&[p, q, r]| [(p, q), (q, r), (r, p)])
            .collect();
        for &(p, q) in &visible_edges {
            if !visible_edges.contains(&(q, p)) {
                faces.push([p, q, index]);
            }
        }
    }

    compact(points, &faces)
}

fn initial_tetrahedron(points: &[Vector3<f64>], eps: f64) -> Option<[usize; 4]> {
    let farthest = |score: &dyn Fn(&Vector3<f64>) -> f64| {
        points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, score(p)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
    };

    let (a, _) = farthest(&|p| -p.x)?;
    let pa = points[a];
    let (b, dist) = farthest(&|p| (p - pa).norm())?;
    if dist <= eps {
        return None;
    }
    let pb = points[b];
    let axis = (pb - pa).normalize();
    let (c, dist) = farthest(&|p| (p - pa).cross(&axis).norm())?;
    if dist <= eps {
        return None;
    }
    let pc = points[c];
    let normal = (pb - pa).cross(&(pc - pa)).normalize();
    let (d, dist) = farthest(&|p| (p - pa).dot(&normal).abs())?;
    if dist <= eps {
        return None;
    }
    Some([a, b, c, d])
}

fn normal(face: &[usize; 3], points: &[Vector3<f64>]) -> Vector3<f64> {
    let [a, b, c] = face.map(|i| points[i]);
    (b - a).cross(&(c - a))
}

/// Distance of `point` above the plane of `face`, along its outward normal.
fn signed_distance(face: &[usize; 3], points: &[Vector3<f64>], point: &Vector3<f64>) -> f64 {
    let n = normal(face, points);
    let length = n.norm();
    if length == 0.0 {
        return 0.0;
    }
    (point - points[face[0]]).dot(&n) / length
}

fn orient_outward(face: [usize; 3], points: &[Vector3<f64>], interior: &Vector3<f64>) -> [usize; 3] {
    if signed_distance(&face, points, interior) > 0.0 {
        [face[0], face[2], face[1]]
    } else {
        face
    }
}

/// Keep only the points referenced by faces.
fn compact(points: &[Vector3<f64>], faces: &[[usize; 3]]) -> TriangleMesh {
    let mut remap: HashMap<usize, u32> = HashMap::new();
    let mut mesh = TriangleMesh::new();
    for face in faces {
        let mapped = face.map(|i| {
            *remap.entry(i).or_insert_with(|| {
                mesh.vertices.push(points[i]);
                (mesh.vertices.len() - 1) as u32
            })
        });
        mesh.faces.push(mapped);
    }
    mesh
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cube_points(n: usize) -> Vec<Vector3<f64>> {
        let mut points = Vec::new();
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    let s = |v: usize| v as f64 / (n - 1) as f64;
                    points.push(Vector3::new(s(i), s(j), s(k)));
                }
            }
        }
        points
    }

    #[test]
    fn test_unit_cube() {
        let hull = convex_hull(&cube_points(4));
        assert_relative_eq!(hull.signed_volume(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(hull.surface_area(), 6.0, epsilon = 1e-9);
    }

    #[test]
    fn test_tetrahedron() {
        let points = vec![
            Vector3::zeros(),
            Vector3::x(),
            Vector3::y(),
            Vector3::z(),
            Vector3::new(0.1, 0.1, 0.1),
        ];
        let hull = convex_hull(&points);
        assert_eq!(hull.faces.len(), 4);
        assert_eq!(hull.vertices.len(), 4);
        assert_relative_eq!(hull.signed_volume(), 1.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(convex_hull(&[Vector3::zeros(); 3]).is_empty());
        let planar: Vec<_> = cube_points(3).into_iter().filter(|p| p.z == 0.0).collect();
        assert!(convex_hull(&planar).is_empty());
        let line: Vec<_> = (0..10).map(|i| Vector3::x() * f64::from(i)).collect();
        assert!(convex_hull(&line).is_empty());
    }

    #[test]
    fn test_octahedron_points() {
        let mesh = TriangleMesh::octahedron();
        let hull = convex_hull(&mesh.vertices);
        assert_relative_eq!(hull.volume(), 4.0 / 3.0, epsilon = 1e-12);
    }
}
