//! D-dimensional hypercube geometry
//!
//! Everything here is derived from bit arithmetic on vertex indices:
//!
//! - vertex `j` has coordinate `k` equal to `+1` if bit `k` of `j` is set, else `-1`
//! - an edge along axis `i` joins two vertices that differ only in bit `i`
//! - a square face spanning axes `i < j` has four corners that differ only in
//!   bits `i` and `j`
//!
//! For D = 4 (the tesseract) this gives 16 vertices, 32 edges and 24 squares.

use crate::bits::{insert_bit, insert_bit_pair};

/// Largest dimension whose vertex indices fit in a `u32`.
pub const MAX_DIMENSION: u32 = u32::BITS - 1;

/// Corner slots of the two triangles of a quad.
///
/// Corner `c` has bit 0 -> first axis, bit 1 -> second axis, so the quad
/// `0 1 3 2` is split along the `1-2` diagonal.
pub const QUAD_CORNER_PATTERN: [u32; 6] = [0, 1, 2, 2, 3, 1];

/// Number of vertices of the D-cube (`2^D`).
pub fn vertex_count(dim: u32) -> usize {
    check_dimension(dim);
    1usize << dim
}

/// Number of edges of the D-cube (`D * 2^(D-1)`).
pub fn edge_count(dim: u32) -> usize {
    check_dimension(dim);
    if dim == 0 {
        0
    } else {
        dim as usize * (1usize << (dim - 1))
    }
}

/// Number of square faces of the D-cube (`C(D,2) * 2^(D-2)`).
pub fn quad_count(dim: u32) -> usize {
    check_dimension(dim);
    if dim < 2 {
        0
    } else {
        axis_pair_count(dim) * (1usize << (dim - 2))
    }
}

/// Number of axis pairs, i.e. face groups (`C(D,2)`).
pub fn axis_pair_count(dim: u32) -> usize {
    let d = dim as usize;
    d * d.saturating_sub(1) / 2
}

/// Coordinates of vertex `index` of the D-cube.
pub fn vertex_coordinates(dim: u32, index: u32) -> impl Iterator<Item = f32> {
    (0..dim).map(move |k| if (index >> k) & 1 == 1 { 1.0 } else { -1.0 })
}

/// All `2^D` vertices in index order.
///
/// D = 0 yields a single vertex with no coordinates.
pub fn vertices(dim: u32) -> Vec<Vec<f32>> {
    (0..vertex_count(dim) as u32)
        .map(|j| vertex_coordinates(dim, j).collect())
        .collect()
}

/// All `D * 2^(D-1)` edges as vertex index pairs.
///
/// Ordered by axis, then by reduced index. The first endpoint has the axis bit
/// clear, the second has it set.
pub fn edges(dim: u32) -> Vec<[u32; 2]> {
    let mut result = Vec::with_capacity(edge_count(dim));
    if dim == 0 {
        return result;
    }

    for axis in 0..dim {
        for reduced in 0..(1u32 << (dim - 1)) {
            let u = insert_bit(reduced, axis, false);
            result.push([u, u | (1 << axis)]);
        }
    }

    result
}

/// All quads of the D-cube spanning one pair of axes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceGroup {
    /// The two axes spanned by every quad of the group, `axes[0] < axes[1]`
    pub axes: [u32; 2],
    /// Triangulated quads, six vertex indices each (see [`QUAD_CORNER_PATTERN`])
    pub quads: Vec<[u32; 6]>,
}

/// Square faces grouped by axis pair, pairs in ascending lexicographic order.
///
/// Empty for D < 2.
pub fn faces(dim: u32) -> Vec<FaceGroup> {
    check_dimension(dim);
    if dim < 2 {
        return Vec::new();
    }

    let mut groups = Vec::with_capacity(axis_pair_count(dim));
    for i in 0..dim {
        for j in (i + 1)..dim {
            let quads = (0..(1u32 << (dim - 2)))
                .map(|reduced| quad_indices(reduced, i, j))
                .collect();
            groups.push(FaceGroup { axes: [i, j], quads });
        }
    }

    groups
}

/// Six indices of the quad with reduced index `reduced` in the `(i, j)` group.
fn quad_indices(reduced: u32, i: u32, j: u32) -> [u32; 6] {
    QUAD_CORNER_PATTERN.map(|corner| {
        insert_bit_pair(reduced, i, corner & 1 == 1, j, corner & 2 == 2)
    })
}

fn check_dimension(dim: u32) {
    assert!(
        dim <= MAX_DIMENSION,
        "hypercube dimension {} exceeds the maximum of {}",
        dim,
        MAX_DIMENSION
    );
}

/// A D-cube with its vertices, edges and faces generated once.
#[derive(Clone, Debug)]
pub struct Hypercube {
    dim: u32,
    vertices: Vec<Vec<f32>>,
    edges: Vec<[u32; 2]>,
    faces: Vec<FaceGroup>,
}

impl Hypercube {
    /// Generate the D-cube
    ///
    /// # Panics
    /// If `dim` exceeds [`MAX_DIMENSION`].
    pub fn new(dim: u32) -> Self {
        Self {
            dim,
            vertices: vertices(dim),
            edges: edges(dim),
            faces: faces(dim),
        }
    }

    /// The 4-cube
    pub fn tesseract() -> Self {
        Self::new(4)
    }

    #[inline]
    pub fn dimension(&self) -> u32 {
        self.dim
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec<f32>] {
        &self.vertices
    }

    #[inline]
    pub fn edges(&self) -> &[[u32; 2]] {
        &self.edges
    }

    #[inline]
    pub fn faces(&self) -> &[FaceGroup] {
        &self.faces
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn quad_count(&self) -> usize {
        self.faces.iter().map(|group| group.quads.len()).sum()
    }

    /// Vertex positions as fixed `N`-component arrays, zero padded beyond D.
    ///
    /// # Panics
    /// If `N < D`: coordinates would be dropped.
    pub fn vertex_positions<const N: usize>(&self) -> Vec<[f32; N]> {
        assert!(
            N >= self.dim as usize,
            "{} position components cannot hold a {}-cube",
            N,
            self.dim
        );

        self.vertices
            .iter()
            .map(|coords| {
                let mut position = [0.0f32; N];
                position[..coords.len()].copy_from_slice(coords);
                position
            })
            .collect()
    }

    /// Edge endpoints flattened for a line-list index buffer
    pub fn edge_indices(&self) -> Vec<u32> {
        self.edges.iter().flatten().copied().collect()
    }

    /// Face triangles flattened for a triangle-list index buffer
    pub fn face_indices(&self) -> Vec<u32> {
        self.faces
            .iter()
            .flat_map(|group| group.quads.iter().flatten().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_vertex_counts_and_signs() {
        for d in 0..=8 {
            let verts = vertices(d);
            assert_eq!(verts.len(), 1 << d);

            let mut seen = HashSet::new();
            for v in &verts {
                assert_eq!(v.len(), d as usize);
                assert!(v.iter().all(|&c| c == 1.0 || c == -1.0));
                let key: Vec<i8> = v.iter().map(|&c| c as i8).collect();
                assert!(seen.insert(key), "duplicate vertex {:?}", v);
            }
        }
    }

    #[test]
    fn test_vertex_index_encodes_signs() {
        for (j, v) in vertices(5).iter().enumerate() {
            for (k, &c) in v.iter().enumerate() {
                assert_eq!(c > 0.0, (j >> k) & 1 == 1);
            }
        }
    }

    #[test]
    fn test_zero_dimension() {
        assert_eq!(vertices(0), vec![Vec::<f32>::new()]);
        assert!(edges(0).is_empty());
        assert!(faces(0).is_empty());
    }

    #[test]
    fn test_edges_cover_every_single_bit_pair_once() {
        for d in 1..=8u32 {
            let list = edges(d);
            assert_eq!(list.len(), edge_count(d));
            assert_eq!(list.len(), d as usize * (1 << (d - 1)));

            let mut seen = HashSet::new();
            for &[u, v] in &list {
                assert_eq!((u ^ v).count_ones(), 1, "edge ({}, {})", u, v);
                assert!(u < v);
                assert!(seen.insert((u, v)), "duplicate edge ({}, {})", u, v);
            }

            // every single-bit-differing pair shows up
            let n = 1u32 << d;
            let expected = (0..n)
                .flat_map(|u| (0..d).map(move |k| (u, u ^ (1 << k))))
                .filter(|(u, v)| u < v)
                .count();
            assert_eq!(seen.len(), expected);
        }
    }

    #[test]
    fn test_edges_ordered_by_axis() {
        let list = edges(3);
        for (n, &[u, v]) in list.iter().enumerate() {
            let axis = n / 4;
            assert_eq!(u ^ v, 1 << axis);
        }
    }

    #[test]
    fn test_faces_counts_and_corners() {
        for d in 2..=8u32 {
            let groups = faces(d);
            assert_eq!(groups.len(), axis_pair_count(d));

            let mut quads_seen = HashSet::new();
            for group in &groups {
                let [i, j] = group.axes;
                assert!(i < j);
                assert_eq!(group.quads.len(), 1 << (d - 2));

                let span = (1 << i) | (1 << j);
                for quad in &group.quads {
                    let distinct: HashSet<u32> = quad.iter().copied().collect();
                    assert_eq!(distinct.len(), 4, "quad {:?}", quad);

                    for &a in &distinct {
                        for &b in &distinct {
                            assert_eq!((a ^ b) & !span, 0, "corners {} {} leave axes {:?}", a, b, group.axes);
                        }
                    }

                    let mut key: Vec<u32> = distinct.into_iter().collect();
                    key.sort();
                    assert!(quads_seen.insert(key), "duplicate quad {:?}", quad);
                }
            }
            assert_eq!(quads_seen.len(), quad_count(d));
        }
    }

    #[test]
    fn test_axis_pairs_lexicographic() {
        let axes: Vec<[u32; 2]> = faces(4).iter().map(|g| g.axes).collect();
        assert_eq!(axes, vec![[0, 1], [0, 2], [0, 3], [1, 2], [1, 3], [2, 3]]);
    }

    #[test]
    fn test_faces_below_two_dimensions_empty() {
        assert!(faces(1).is_empty());
        assert_eq!(quad_count(1), 0);
    }

    #[test]
    fn test_tesseract_counts() {
        let t = Hypercube::tesseract();
        assert_eq!(t.vertex_count(), 16);
        assert_eq!(t.edge_count(), 32);
        assert_eq!(t.faces().len(), 6);
        assert!(t.faces().iter().all(|g| g.quads.len() == 4));
        assert_eq!(t.quad_count(), 24);
        assert_eq!(t.face_indices().len(), 144);
        assert_eq!(t.edge_indices().len(), 64);
    }

    #[test]
    fn test_square_overlay_quad() {
        let square = Hypercube::new(2);
        assert_eq!(
            square.vertices(),
            &[vec![-1.0, -1.0], vec![1.0, -1.0], vec![-1.0, 1.0], vec![1.0, 1.0]]
        );
        assert_eq!(square.faces().len(), 1);
        assert_eq!(square.faces()[0].quads, vec![[0, 1, 2, 2, 3, 1]]);
        assert_eq!(square.face_indices(), vec![0, 1, 2, 2, 3, 1]);
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(faces(5), faces(5));
        assert_eq!(edges(5), edges(5));
    }

    #[test]
    fn test_vertex_positions_padding() {
        let square = Hypercube::new(2);
        let padded = square.vertex_positions::<4>();
        assert_eq!(padded[3], [1.0, 1.0, 0.0, 0.0]);

        let exact = Hypercube::tesseract().vertex_positions::<4>();
        assert_eq!(exact[0], [-1.0; 4]);
        assert_eq!(exact[15], [1.0; 4]);
    }

    #[test]
    #[should_panic]
    fn test_vertex_positions_too_narrow() {
        Hypercube::tesseract().vertex_positions::<3>();
    }

    #[test]
    #[should_panic]
    fn test_dimension_too_large() {
        vertex_count(MAX_DIMENSION + 1);
    }
}
