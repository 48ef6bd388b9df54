// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::prelude::*;

/// Sentinel for "no value" in the i32 connectivity buffers. Only the twin
/// column ever holds it on a validated mesh. Consumers must treat it as "this
/// edge has no opposite", never as an index.
pub const NO_HALFEDGE: i32 = -1;

/// The complete mesh lowered to storage-buffer friendly arrays: one buffer per
/// attribute, one element per entity, all addressed by the same entity index.
/// Connectivity uses `i32` with [`NO_HALFEDGE`] marking boundary twins, so a
/// shader can branch on `< 0`.
#[derive(Clone, Debug)]
pub struct HalfEdgeStorageBuffers {
    pub counts: MeshCounts,

    /// Vertex positions, xyz = position, w = 1
    pub vertex_positions: Vec<Vec4>,
    /// Vertex colors, rgba
    pub vertex_colors: Vec<Vec4>,
    /// Vertex normals, xyz = normal, w = 0
    pub vertex_normals: Vec<Vec4>,
    pub vertex_tex_coords: Vec<Vec2>,
    /// One outgoing half-edge per vertex
    pub vertex_edges: Vec<i32>,

    /// One half-edge per face
    pub face_edges: Vec<i32>,
    /// Polygon vertex count (3, 4, 5, ...)
    pub face_vert_counts: Vec<i32>,
    /// Offset into `face_vertex_indices`
    pub face_offsets: Vec<i32>,
    pub face_normals: Vec<Vec4>,
    pub face_centers: Vec<Vec4>,
    pub face_areas: Vec<f32>,

    /// Origin vertex of each half-edge
    pub he_vertex: Vec<i32>,
    /// Adjacent face of each half-edge
    pub he_face: Vec<i32>,
    /// Next half-edge in the face loop
    pub he_next: Vec<i32>,
    /// Previous half-edge in the face loop
    pub he_prev: Vec<i32>,
    /// Opposite half-edge, [`NO_HALFEDGE`] at a boundary
    pub he_twin: Vec<i32>,

    /// Flattened face vertex indices
    pub face_vertex_indices: Vec<i32>,
}

/// The main representation to draw the mesh's faces as triangles on the GPU,
/// suitable for a `TriangleList` pipeline. Faces are fan-triangulated and
/// flat-shaded with their face normal.
#[derive(Clone, Debug)]
pub struct VertexIndexBuffers {
    /// Vertex positions, one per triangle corner
    pub positions: Vec<Vec3>,
    /// Vertex normals, one per triangle corner
    pub normals: Vec<Vec3>,
    /// Indices: 3*N where N is the number of triangles. Indices point to
    /// elements of `positions` and `normals`.
    pub indices: Vec<u32>,
}

/// Reinterprets a flat attribute or connectivity buffer as raw bytes for
/// upload.
pub fn cast_buffer_bytes<T: bytemuck::Pod>(buffer: &[T]) -> &[u8] {
    bytemuck::cast_slice(buffer)
}

fn to_i32(buffer: &[u32]) -> Vec<i32> {
    buffer.iter_cpy().map(|x| x as i32).collect()
}

impl HalfEdgeMesh {
    /// Lowers the whole mesh into [`HalfEdgeStorageBuffers`].
    #[profiling::function]
    pub fn generate_storage_buffers(&self) -> HalfEdgeStorageBuffers {
        HalfEdgeStorageBuffers {
            counts: self.counts,

            vertex_positions: self.vertex_positions.clone(),
            vertex_colors: self.vertex_colors.clone(),
            vertex_normals: self.vertex_normals.clone(),
            vertex_tex_coords: self.vertex_tex_coords.clone(),
            vertex_edges: self
                .vertex_halfedge
                .iter()
                .map(|h| h.map(|h| h.get() as i32).unwrap_or(NO_HALFEDGE))
                .collect(),

            face_edges: to_i32(&self.face_halfedge),
            face_vert_counts: to_i32(&self.face_vert_counts),
            face_offsets: to_i32(&self.face_offsets),
            face_normals: self.face_normals.clone(),
            face_centers: self.face_centers.clone(),
            face_areas: self.face_areas.clone(),

            he_vertex: to_i32(&self.halfedge_vertex),
            he_face: to_i32(&self.halfedge_face),
            he_next: to_i32(&self.halfedge_next),
            he_prev: to_i32(&self.halfedge_prev),
            he_twin: self
                .halfedge_twin
                .iter()
                .map(|t| t.map(|t| t.get() as i32).unwrap_or(NO_HALFEDGE))
                .collect(),

            face_vertex_indices: to_i32(&self.face_vertex_indices),
        }
    }

    /// Generates the [`VertexIndexBuffers`] for this mesh. Suitable to be
    /// uploaded to the GPU.
    #[profiling::function]
    pub fn generate_triangle_buffers(&self) -> VertexIndexBuffers {
        let mut positions = vec![];
        let mut normals = vec![];

        for f in 0..self.num_faces() as u32 {
            let normal = self.face_normals[f as usize].truncate();
            let vertices = self.face_vertices(f);
            let v1 = vertices[0];

            for (&v2, &v3) in vertices[1..].iter().tuple_windows() {
                positions.push(self.vertex_positions[v1 as usize].truncate());
                positions.push(self.vertex_positions[v2 as usize].truncate());
                positions.push(self.vertex_positions[v3 as usize].truncate());
                normals.push(normal);
                normals.push(normal);
                normals.push(normal);
            }
        }

        VertexIndexBuffers {
            indices: (0u32..positions.len() as u32).collect(),
            positions,
            normals,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::prelude::*;

    use super::*;

    #[test]
    fn cube_storage_buffers_have_no_boundary_sentinel() {
        let mesh = HalfEdgeMesh::build(&primitives::Box::build(Vec3::ZERO, Vec3::ONE)).unwrap();
        let buffers = mesh.generate_storage_buffers();

        assert_eq!(buffers.vertex_positions.len(), 8);
        assert_eq!(buffers.he_twin.len(), 24);
        assert!(buffers.he_twin.iter().all(|&t| t >= 0));
        assert!(buffers.vertex_edges.iter().all(|&e| e >= 0));
    }

    #[test]
    fn open_surface_marks_boundaries_with_the_sentinel() {
        let ngon = primitives::Triangle::build(Vec3::ZERO, Vec3::X, Vec3::Y);
        let buffers = HalfEdgeMesh::build(&ngon).unwrap().generate_storage_buffers();

        assert_eq!(buffers.he_twin, vec![NO_HALFEDGE; 3]);
    }

    #[test]
    fn storage_buffers_are_index_aligned() {
        let mesh =
            HalfEdgeMesh::build(&primitives::IcoSphere::build(Vec3::ZERO, 1.0)).unwrap();
        let buffers = mesh.generate_storage_buffers();

        assert_eq!(buffers.vertex_colors.len(), mesh.num_vertices());
        assert_eq!(buffers.vertex_normals.len(), mesh.num_vertices());
        assert_eq!(buffers.vertex_tex_coords.len(), mesh.num_vertices());
        assert_eq!(buffers.face_edges.len(), mesh.num_faces());
        assert_eq!(buffers.face_areas.len(), mesh.num_faces());
        assert_eq!(buffers.he_next.len(), mesh.num_halfedges());
        assert_eq!(buffers.he_prev.len(), mesh.num_halfedges());

        // The i32 view mirrors the typed view entry by entry
        for h in 0..mesh.num_halfedges() as u32 {
            assert_eq!(buffers.he_next[h as usize], mesh.next(h) as i32);
            assert_eq!(buffers.he_vertex[h as usize], mesh.origin(h) as i32);
        }
    }

    #[test]
    fn quad_fan_triangulates_into_two_triangles() {
        let ngon = primitives::Quad::build(Vec3::ZERO, Vec3::Y, Vec3::X, Vec2::ONE);
        let buffers = HalfEdgeMesh::build(&ngon).unwrap().generate_triangle_buffers();

        assert_eq!(buffers.positions.len(), 6);
        assert_eq!(buffers.normals.len(), 6);
        assert_eq!(buffers.indices, (0..6).collect::<Vec<u32>>());
    }

    #[test]
    fn byte_views_cover_the_whole_buffer() {
        let mesh = HalfEdgeMesh::build(&primitives::Box::build(Vec3::ZERO, Vec3::ONE)).unwrap();
        let buffers = mesh.generate_storage_buffers();

        assert_eq!(
            cast_buffer_bytes(&buffers.vertex_positions).len(),
            8 * std::mem::size_of::<Vec4>()
        );
        assert_eq!(cast_buffer_bytes(&buffers.he_twin).len(), 24 * 4);
    }
}
