//! Loop subdivision of triangle meshes.
//!
//! Every level splits each triangle into four. New edge vertices use Loop's
//! edge rule `3/8 (a + b) + 1/8 (c + d)`, where `c` and `d` are the vertices
//! opposite the edge; boundary edges use the midpoint. Existing vertices are
//! smoothed with Loop's vertex rule, or `3/4 v + 1/8 (n₁ + n₂)` on the
//! boundary.

// Vertex counts stay far below u32::MAX for the supported depths
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

use hashbrown::{HashMap, HashSet};
use nalgebra::Vector3;
use tracing::debug;

use crate::mesh::TriangleMesh;

type Edge = (u32, u32);

/// Normalize edge so smaller vertex index comes first.
const fn normalize_edge(v0: u32, v1: u32) -> Edge {
    if v0 <= v1 { (v0, v1) } else { (v1, v0) }
}

/// Subdivide `depth` times. Depth zero returns a copy.
#[must_use]
pub fn subdivide(mesh: &TriangleMesh, depth: usize) -> TriangleMesh {
    let mut current = mesh.clone();
    for level in 0..depth {
        current = loop_subdivide(&current);
        debug!(
            level = level + 1,
            faces = current.faces.len(),
            vertices = current.vertices.len(),
            "Subdivided search directions"
        );
    }
    current
}

/// One level of Loop subdivision.
#[must_use]
pub fn loop_subdivide(mesh: &TriangleMesh) -> TriangleMesh {
    let opposite = build_edge_opposites(mesh);
    let neighbors = build_vertex_neighbors(mesh);
    let boundary_neighbors = build_boundary_neighbors(&opposite, mesh.vertices.len());

    let mut vertices: Vec<Vector3<f64>> = mesh
        .vertices
        .iter()
        .enumerate()
        .map(|(vi, vertex)| match boundary_neighbors[vi].as_slice() {
            [n1, n2] => {
                vertex * 0.75 + (mesh.vertices[*n1 as usize] + mesh.vertices[*n2 as usize]) * 0.125
            }
            [] => interior_vertex_position(vertex, &neighbors[vi], &mesh.vertices),
            // Non-manifold corner: leave in place.
            _ => *vertex,
        })
        .collect();
    vertices.reserve(opposite.len());

    let mut edge_vertices: HashMap<Edge, u32> = HashMap::with_capacity(opposite.len());
    let mut edge_vertex = |a: u32, b: u32, vertices: &mut Vec<Vector3<f64>>| -> u32 {
        let edge = normalize_edge(a, b);
        if let Some(&index) = edge_vertices.get(&edge) {
            return index;
        }
        let pa = mesh.vertices[a as usize];
        let pb = mesh.vertices[b as usize];
        let position = match opposite.get(&edge).map(Vec::as_slice) {
            Some([c, d]) => {
                (pa + pb) * 0.375
                    + (mesh.vertices[*c as usize] + mesh.vertices[*d as usize]) * 0.125
            }
            _ => (pa + pb) * 0.5,
        };
        let index = vertices.len() as u32;
        vertices.push(position);
        edge_vertices.insert(edge, index);
        index
    };

    let mut faces = Vec::with_capacity(mesh.faces.len() * 4);
    for &[v0, v1, v2] in &mesh.faces {
        let m01 = edge_vertex(v0, v1, &mut vertices);
        let m12 = edge_vertex(v1, v2, &mut vertices);
        let m20 = edge_vertex(v2, v0, &mut vertices);

        faces.push([v0, m01, m20]);
        faces.push([v1, m12, m01]);
        faces.push([v2, m20, m12]);
        faces.push([m01, m12, m20]);
    }

    TriangleMesh { vertices, faces }
}

/// Vertices opposite each edge, one per adjacent face.
fn build_edge_opposites(mesh: &TriangleMesh) -> HashMap<Edge, Vec<u32>> {
    let mut opposite: HashMap<Edge, Vec<u32>> = HashMap::new();
    for face in &mesh.faces {
        for i in 0..3 {
            let edge = normalize_edge(face[i], face[(i + 1) % 3]);
            opposite.entry(edge).or_default().push(face[(i + 2) % 3]);
        }
    }
    opposite
}

fn build_vertex_neighbors(mesh: &TriangleMesh) -> Vec<Vec<u32>> {
    let mut neighbors: Vec<HashSet<u32>> = vec![HashSet::new(); mesh.vertices.len()];
    for face in &mesh.faces {
        for i in 0..3 {
            let a = face[i];
            let b = face[(i + 1) % 3];
            neighbors[a as usize].insert(b);
            neighbors[b as usize].insert(a);
        }
    }
    neighbors
        .into_iter()
        .map(|set| set.into_iter().collect())
        .collect()
}

/// Neighbors along boundary edges (edges with a single adjacent face).
fn build_boundary_neighbors(opposite: &HashMap<Edge, Vec<u32>>, count: usize) -> Vec<Vec<u32>> {
    let mut neighbors = vec![Vec::new(); count];
    for (&(a, b), faces) in opposite {
        if faces.len() == 1 {
            neighbors[a as usize].push(b);
            neighbors[b as usize].push(a);
        }
    }
    neighbors
}

fn interior_vertex_position(
    vertex: &Vector3<f64>,
    neighbors: &[u32],
    vertices: &[Vector3<f64>],
) -> Vector3<f64> {
    let n = neighbors.len();
    if n == 0 {
        return *vertex;
    }

    let beta = if n == 3 {
        3.0 / 16.0
    } else {
        3.0 / (8.0 * n as f64)
    };
    let alpha = (n as f64).mul_add(-beta, 1.0);

    let sum: Vector3<f64> = neighbors.iter().map(|&i| vertices[i as usize]).sum();
    vertex * alpha + sum * beta
}
