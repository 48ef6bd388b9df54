// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use glam::{Vec2, Vec4};
use nonmax::NonMaxU32;

/// Construction of the half-edge tables from an n-gon polygon soup
pub mod builder;
pub use builder::*;

/// Structural consistency checks, run as the final stage of every build
pub mod validation;
pub use validation::*;

/// Read-only adjacency queries over a finished mesh
pub mod traversals;
pub use traversals::*;

/// Generate vertex and index buffers suitable to be uploaded to the GPU for rendering
pub mod gpu_buffer_generation;
pub use gpu_buffer_generation::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshCounts {
    /// The number of vertices
    pub num_vertices: usize,
    /// The number of faces
    pub num_faces: usize,
    /// The number of halfedges, i.e. the sum of every face's vertex count.
    /// Boundary edges have a single halfedge, so this is not simply twice the
    /// number of undirected edges.
    pub num_halfedges: usize,
    /// The number of halfedges without a twin
    pub num_boundary_edges: usize,
}

/// A halfedge mesh storing all its data in contiguous arrays. For each of the
/// main arrays, at position `i` there is the data for the entity with index
/// `i`. Entities reference each other through plain indices into these arrays,
/// so the whole structure can be handed to the GPU as a set of flat buffers.
///
/// A boundary is represented by a halfedge without a twin (non-existence is
/// encoded as `None`, which [`gpu_buffer_generation`] lowers to -1).
///
/// Values of this type can only be obtained through [`HalfEdgeMesh::build`],
/// which validates the connectivity before returning. There is no mutation
/// API. Everything downstream reads the arrays through the slice accessors or
/// the query methods in [`traversals`].
#[derive(Debug, Clone, PartialEq)]
pub struct HalfEdgeMesh {
    counts: MeshCounts,

    // Vertex tables (len: num_vertices)
    vertex_positions: Vec<Vec4>,
    vertex_colors: Vec<Vec4>,
    vertex_normals: Vec<Vec4>,
    vertex_tex_coords: Vec<Vec2>,
    /// One outgoing halfedge per vertex. None can only occur mid-build.
    vertex_halfedge: Vec<Option<NonMaxU32>>,

    // Face tables (len: num_faces)
    face_halfedge: Vec<u32>,
    face_vert_counts: Vec<u32>,
    face_offsets: Vec<u32>,
    face_normals: Vec<Vec4>,
    face_centers: Vec<Vec4>,
    face_areas: Vec<f32>,

    // Halfedge tables (len: num_halfedges)
    halfedge_vertex: Vec<u32>,
    halfedge_face: Vec<u32>,
    halfedge_next: Vec<u32>,
    halfedge_prev: Vec<u32>,
    halfedge_twin: Vec<Option<NonMaxU32>>,

    /// Flattened per-face vertex indices, addressed via face offset / count
    face_vertex_indices: Vec<u32>,
}

impl HalfEdgeMesh {
    pub fn counts(&self) -> MeshCounts {
        self.counts
    }

    pub fn num_vertices(&self) -> usize {
        self.counts.num_vertices
    }

    pub fn num_faces(&self) -> usize {
        self.counts.num_faces
    }

    pub fn num_halfedges(&self) -> usize {
        self.counts.num_halfedges
    }

    pub fn num_boundary_edges(&self) -> usize {
        self.counts.num_boundary_edges
    }

    /// Vertex positions, xyz = position, w = 1
    pub fn vertex_positions(&self) -> &[Vec4] {
        &self.vertex_positions
    }

    /// Vertex colors, rgba
    pub fn vertex_colors(&self) -> &[Vec4] {
        &self.vertex_colors
    }

    /// Vertex normals, xyz = normal, w = 0
    pub fn vertex_normals(&self) -> &[Vec4] {
        &self.vertex_normals
    }

    pub fn vertex_tex_coords(&self) -> &[Vec2] {
        &self.vertex_tex_coords
    }

    pub fn face_vert_counts(&self) -> &[u32] {
        &self.face_vert_counts
    }

    pub fn face_offsets(&self) -> &[u32] {
        &self.face_offsets
    }

    /// Face normals, xyz = normal, w = 0
    pub fn face_normals(&self) -> &[Vec4] {
        &self.face_normals
    }

    /// Face centroids, xyz = centroid, w = 1
    pub fn face_centers(&self) -> &[Vec4] {
        &self.face_centers
    }

    pub fn face_areas(&self) -> &[f32] {
        &self.face_areas
    }

    pub fn face_vertex_indices(&self) -> &[u32] {
        &self.face_vertex_indices
    }
}
