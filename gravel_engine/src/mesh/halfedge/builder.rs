// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use nonmax::NonMaxU32;

use crate::prelude::*;

/// Receives progress notifications while a mesh is being built. The hook is
/// purely informational, nothing in the build depends on it.
pub trait BuildObserver {
    /// Called once the output tables have been sized, before any connectivity
    /// is linked. `counts.num_boundary_edges` is still zero at this point.
    fn on_allocated(&self, _counts: &MeshCounts) {}

    /// Called after twin resolution with the number of halfedges left without
    /// a twin.
    fn on_boundary_edges(&self, _count: usize) {}
}

/// The default observer. Forwards everything to the `log` facade.
pub struct LogObserver;

impl BuildObserver for LogObserver {
    fn on_allocated(&self, counts: &MeshCounts) {
        log::debug!(
            "Building half-edge structure: {} vertices, {} faces, {} halfedges",
            counts.num_vertices,
            counts.num_faces,
            counts.num_halfedges,
        );
    }

    fn on_boundary_edges(&self, count: usize) {
        log::debug!("Boundary edges: {count}");
    }
}

impl HalfEdgeMesh {
    /// Builds a validated halfedge mesh out of an n-gon polygon soup.
    ///
    /// Construction is a pure function of `ngon`: rebuilding from the same
    /// soup yields element-wise identical arrays. The input is trusted to be
    /// well-formed (in-range indices, at least three vertices per face); the
    /// loaders guarantee this. Structural problems that survive construction,
    /// like inconsistently oriented or non-manifold input, are caught by the
    /// validation stage and reported as a [`TopologyError`]. There is no
    /// partially built result, on error nothing is returned.
    #[profiling::function]
    pub fn build(ngon: &NGonMesh) -> Result<HalfEdgeMesh, TopologyError> {
        Self::build_with_observer(ngon, &LogObserver)
    }

    #[profiling::function]
    pub fn build_with_observer(
        ngon: &NGonMesh,
        observer: &dyn BuildObserver,
    ) -> Result<HalfEdgeMesh, TopologyError> {
        let num_vertices = ngon.positions.len();
        let num_faces = ngon.faces.len();
        let num_halfedges: usize = ngon.faces.iter().map(|f| f.vertex_indices.len()).sum();

        // All tables are allocated to their final size here. The construction
        // below only ever writes in-bounds.
        let mut mesh = HalfEdgeMesh {
            counts: MeshCounts {
                num_vertices,
                num_faces,
                num_halfedges,
                num_boundary_edges: 0,
            },

            vertex_positions: ngon.positions.iter().map(|p| p.extend(1.0)).collect(),
            vertex_colors: ngon.colors.iter().map(|c| c.extend(1.0)).collect(),
            vertex_normals: ngon.normals.iter().map(|n| n.extend(0.0)).collect(),
            vertex_tex_coords: ngon.tex_coords.clone(),
            vertex_halfedge: vec![None; num_vertices],

            face_halfedge: vec![0; num_faces],
            face_vert_counts: ngon.faces.iter().map(|f| f.count()).collect(),
            face_offsets: ngon.faces.iter().map(|f| f.offset).collect(),
            face_normals: ngon.faces.iter().map(|f| f.normal).collect(),
            face_centers: ngon.faces.iter().map(|f| f.center).collect(),
            face_areas: ngon.faces.iter().map(|f| f.area).collect(),

            halfedge_vertex: vec![0; num_halfedges],
            halfedge_face: vec![0; num_halfedges],
            halfedge_next: vec![0; num_halfedges],
            halfedge_prev: vec![0; num_halfedges],
            halfedge_twin: vec![None; num_halfedges],

            face_vertex_indices: ngon.face_vertex_indices.clone(),
        };

        observer.on_allocated(&mesh.counts);

        // Walk every face loop once, creating one halfedge per consecutive
        // vertex pair and registering the directed edge for twin resolution.
        // A directed edge registered twice (repeated vertex within a face, or
        // a non-manifold fan) overwrites the earlier registration; whether the
        // resulting twin assignment is consistent is decided by validation.
        let mut edge_map = HashMap::<(u32, u32), u32>::with_capacity(num_halfedges);
        let mut current_he: u32 = 0;

        for (face_id, face) in ngon.faces.iter().enumerate() {
            let first_he = current_he;
            let count = face.count();

            for (i, (v0, v1)) in face
                .vertex_indices
                .iter_cpy()
                .circular_tuple_windows()
                .enumerate()
            {
                let he = current_he;

                mesh.halfedge_vertex[he as usize] = v0;
                mesh.halfedge_face[he as usize] = face_id as u32;

                // Next/prev within the face loop
                mesh.halfedge_next[he as usize] = if i as u32 == count - 1 {
                    first_he
                } else {
                    he + 1
                };
                mesh.halfedge_prev[he as usize] = if i == 0 { first_he + count - 1 } else { he - 1 };

                // The first halfedge leaving a vertex becomes its outgoing edge
                if mesh.vertex_halfedge[v0 as usize].is_none() {
                    mesh.vertex_halfedge[v0 as usize] = NonMaxU32::new(he);
                }

                edge_map.insert((v0, v1), he);

                current_he += 1;
            }

            mesh.face_halfedge[face_id] = first_he;
        }

        // Twin resolution: a halfedge from v0 to v1 pairs up with whichever
        // halfedge registered the reverse direction. Both sides of a pair run
        // the same lookup, so the assignment ends up symmetric on its own.
        let mut boundary_edges = 0;
        for he in 0..num_halfedges {
            let v0 = mesh.halfedge_vertex[he];
            let v1 = mesh.halfedge_vertex[mesh.halfedge_next[he] as usize];

            match edge_map.get(&(v1, v0)) {
                Some(&twin) => mesh.halfedge_twin[he] = NonMaxU32::new(twin),
                None => boundary_edges += 1,
            }
        }
        mesh.counts.num_boundary_edges = boundary_edges;

        observer.on_boundary_edges(boundary_edges);

        validation::validate_topology(&mesh)?;

        Ok(mesh)
    }
}

#[cfg(test)]
pub mod test {
    use proptest::prelude::*;

    use crate::prelude::*;

    /// Checks every structural invariant the builder promises, through the
    /// public query API.
    pub fn assert_invariants(mesh: &HalfEdgeMesh) {
        for h in 0..mesh.num_halfedges() as u32 {
            assert_eq!(mesh.next(mesh.prev(h)), h);
            assert_eq!(mesh.prev(mesh.next(h)), h);

            if let Some(twin) = mesh.twin(h) {
                assert_eq!(mesh.twin(twin), Some(h));
                assert_eq!(mesh.origin(h), mesh.destination(twin));
                assert_eq!(mesh.destination(h), mesh.origin(twin));
            }
        }

        for f in 0..mesh.num_faces() as u32 {
            let loop_edges = mesh.face_halfedges(f).collect_vec();
            assert_eq!(loop_edges.len(), mesh.face_vert_counts()[f as usize] as usize);
            assert!(loop_edges.iter().all_unique());
            assert!(loop_edges.iter().all(|&h| mesh.halfedge_face(h) == f));
            assert_eq!(mesh.next(*loop_edges.last().unwrap()), loop_edges[0]);
        }

        for v in 0..mesh.num_vertices() as u32 {
            assert_eq!(mesh.origin(mesh.vertex_halfedge(v)), v);
        }
    }

    #[test]
    fn closed_cube() {
        let mesh = HalfEdgeMesh::build(&primitives::Box::build(Vec3::ZERO, Vec3::ONE)).unwrap();

        assert_eq!(mesh.num_vertices(), 8);
        assert_eq!(mesh.num_faces(), 6);
        assert_eq!(mesh.num_halfedges(), 24);
        assert_eq!(mesh.num_boundary_edges(), 0);
        assert!((0..24).all(|h| mesh.twin(h).is_some()));

        assert_invariants(&mesh);
    }

    #[test]
    fn isolated_triangle() {
        let ngon = primitives::Triangle::build(Vec3::ZERO, Vec3::X, Vec3::Y);
        let mesh = HalfEdgeMesh::build(&ngon).unwrap();

        assert_eq!(mesh.num_halfedges(), 3);
        assert_eq!(mesh.num_boundary_edges(), 3);
        assert!((0..3).all(|h| mesh.twin(h).is_none()));

        assert_invariants(&mesh);
    }

    #[test]
    fn quad_loop_is_a_cyclic_permutation() {
        let ngon = primitives::Quad::build(Vec3::ZERO, Vec3::Y, Vec3::X, Vec2::ONE);
        let mesh = HalfEdgeMesh::build(&ngon).unwrap();

        // Halfedges are created in face order, so origins follow the face's
        // vertex sequence
        assert_eq!((0..4).map(|h| mesh.origin(h)).collect_vec(), vec![0, 1, 2, 3]);
        assert_eq!((0..4).map(|h| mesh.next(h)).collect_vec(), vec![1, 2, 3, 0]);
        assert_eq!((0..4).map(|h| mesh.prev(h)).collect_vec(), vec![3, 0, 1, 2]);

        assert_invariants(&mesh);
    }

    #[test]
    fn empty_mesh_is_vacuously_valid() {
        let mesh = HalfEdgeMesh::build(&NGonMesh::default()).unwrap();

        assert_eq!(
            mesh.counts(),
            MeshCounts {
                num_vertices: 0,
                num_faces: 0,
                num_halfedges: 0,
                num_boundary_edges: 0,
            }
        );
    }

    #[test]
    fn closed_icosphere() {
        let mesh =
            HalfEdgeMesh::build(&primitives::IcoSphere::build(Vec3::ZERO, 1.0)).unwrap();

        assert_eq!(mesh.num_vertices(), 12);
        assert_eq!(mesh.num_faces(), 20);
        assert_eq!(mesh.num_halfedges(), 60);
        assert_eq!(mesh.num_boundary_edges(), 0);

        assert_invariants(&mesh);
    }

    #[test]
    fn vertex_outgoing_edge_is_first_occurrence() {
        let mesh = HalfEdgeMesh::build(&primitives::Box::build(Vec3::ZERO, Vec3::ONE)).unwrap();

        // The first face is [0, 1, 2, 3], so those vertices keep the
        // halfedges created for it even though later faces touch them too
        for v in 0..4 {
            assert_eq!(mesh.vertex_halfedge(v), v);
        }
    }

    #[test]
    fn rebuild_is_deterministic() {
        let ngon = primitives::IcoSphere::build(Vec3::ONE, 3.0);
        let a = HalfEdgeMesh::build(&ngon).unwrap();
        let b = HalfEdgeMesh::build(&ngon).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn attributes_are_copied_verbatim() {
        let ngon = primitives::Box::build(Vec3::ZERO, Vec3::splat(2.0));
        let mesh = HalfEdgeMesh::build(&ngon).unwrap();

        for (i, p) in ngon.positions.iter().enumerate() {
            assert_eq!(mesh.vertex_positions()[i], p.extend(1.0));
        }
        for (i, n) in ngon.normals.iter().enumerate() {
            assert_eq!(mesh.vertex_normals()[i], n.extend(0.0));
        }
        for (i, face) in ngon.faces.iter().enumerate() {
            assert_eq!(mesh.face_vert_counts()[i], face.count());
            assert_eq!(mesh.face_offsets()[i], face.offset);
            assert_eq!(mesh.face_normals()[i], face.normal);
            assert_eq!(mesh.face_centers()[i], face.center);
            assert_eq!(mesh.face_areas()[i], face.area);
        }
        assert_eq!(mesh.face_vertex_indices(), ngon.face_vertex_indices.as_slice());
    }

    /// A planar grid of `w` by `h` quads, all consistently oriented
    pub fn quad_grid(w: usize, h: usize) -> NGonMesh {
        let mut mesh = NGonMesh::default();
        for y in 0..=h {
            for x in 0..=w {
                mesh.positions.push(Vec3::new(x as f32, 0.0, y as f32));
            }
        }
        let v = |x: usize, y: usize| (y * (w + 1) + x) as u32;
        for y in 0..h {
            for x in 0..w {
                mesh.push_face([v(x, y), v(x + 1, y), v(x + 1, y + 1), v(x, y + 1)]);
            }
        }
        mesh.fill_missing_attributes();
        mesh
    }

    /// A closed disk: `n` triangles sharing a central vertex
    pub fn triangle_fan(n: usize) -> NGonMesh {
        use std::f32::consts::TAU;

        let mut mesh = NGonMesh::default();
        mesh.positions.push(Vec3::ZERO);
        for i in 0..n {
            let angle = TAU * i as f32 / n as f32;
            mesh.positions
                .push(Vec3::new(angle.cos(), 0.0, angle.sin()));
        }
        for i in 0..n {
            let a = (i % n) as u32 + 1;
            let b = ((i + 1) % n) as u32 + 1;
            mesh.push_face([0, a, b]);
        }
        mesh.fill_missing_attributes();
        mesh
    }

    proptest! {
        #[test]
        fn quad_grid_invariants(w in 1usize..6, h in 1usize..6) {
            let mesh = HalfEdgeMesh::build(&quad_grid(w, h)).unwrap();

            assert_eq!(mesh.num_vertices(), (w + 1) * (h + 1));
            assert_eq!(mesh.num_faces(), w * h);
            assert_eq!(mesh.num_halfedges(), 4 * w * h);
            // Only the perimeter edges have no twin
            assert_eq!(mesh.num_boundary_edges(), 2 * (w + h));

            assert_invariants(&mesh);
        }

        #[test]
        fn triangle_fan_invariants(n in 3usize..16) {
            let mesh = HalfEdgeMesh::build(&triangle_fan(n)).unwrap();

            assert_eq!(mesh.num_vertices(), n + 1);
            assert_eq!(mesh.num_faces(), n);
            assert_eq!(mesh.num_halfedges(), 3 * n);
            // The outer rim is the only boundary
            assert_eq!(mesh.num_boundary_edges(), n);

            assert_invariants(&mesh);
        }
    }
}
