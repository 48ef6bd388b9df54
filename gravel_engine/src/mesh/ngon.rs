// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use glam::{Vec2, Vec3};
use gravel_commons::utils::{IteratorUtils, SVec, SliceUtils};

/// Primitive shapes, like boxes or spheres
pub mod primitives;

/// Import of Wavefront OBJ files into an [`NGonMesh`]
pub mod wavefront_obj;

/// A single polygon of an [`NGonMesh`]: an ordered vertex-index loop plus
/// geometric attributes derived once at load time. The index order defines the
/// face's orientation, and with it the adjacency of the whole mesh.
#[derive(Debug, Clone, Default)]
pub struct NGonFace {
    pub vertex_indices: SVec<u32>,
    /// Per-corner normal references from the `f` records, when present.
    pub normal_indices: SVec<u32>,
    /// Per-corner texcoord references from the `f` records, when present.
    pub tex_coord_indices: SVec<u32>,

    /// Face normal, w = 0
    pub normal: glam::Vec4,
    /// Face centroid, w = 1
    pub center: glam::Vec4,
    pub area: f32,
    /// Offset of this face's indices inside [`NGonMesh::face_vertex_indices`]
    pub offset: u32,
}

impl NGonFace {
    pub fn count(&self) -> u32 {
        self.vertex_indices.len() as u32
    }
}

/// A polygon soup of triangles, quads and general n-gons. All per-vertex
/// attribute tables are index-aligned and have one entry per vertex.
///
/// Values of this type are produced once, by [`wavefront_obj`] or
/// [`primitives`], and are never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct NGonMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub colors: Vec<Vec3>,
    pub faces: Vec<NGonFace>,
    /// Flattened concatenation of every face's vertex indices, addressed via
    /// each face's offset / count pair.
    pub face_vertex_indices: Vec<u32>,
}

impl NGonMesh {
    pub fn nb_vertices(&self) -> u32 {
        self.positions.len() as u32
    }

    pub fn nb_faces(&self) -> u32 {
        self.faces.len() as u32
    }

    /// Appends a face, deriving its geometric attributes from the positions
    /// already stored in the mesh. Faces must be pushed after their vertices.
    pub fn push_face(&mut self, vertex_indices: impl IntoIterator<Item = u32>) {
        let vertex_indices = vertex_indices.into_iter().collect_svec();
        debug_assert!(vertex_indices.len() >= 3);

        let offset = self.face_vertex_indices.len() as u32;
        let normal = face_normal(&self.positions, &vertex_indices);
        let center = face_centroid(&self.positions, &vertex_indices);
        let area = face_area(&self.positions, &vertex_indices);

        self.face_vertex_indices.extend(vertex_indices.iter_cpy());
        self.faces.push(NGonFace {
            vertex_indices,
            normal_indices: SVec::new(),
            tex_coord_indices: SVec::new(),
            normal: normal.extend(0.0),
            center: center.extend(1.0),
            area,
            offset,
        });
    }

    /// Pads (or truncates) the attribute tables so they stay index-aligned
    /// with the position table: +Z normals, zero texcoords, white colors.
    pub fn fill_missing_attributes(&mut self) {
        self.normals.resize(self.positions.len(), Vec3::Z);
        self.tex_coords.resize(self.positions.len(), Vec2::ZERO);
        self.colors.resize(self.positions.len(), Vec3::ONE);
    }
}

/// Face normal from the first three vertices. Degenerate faces get +Z.
pub fn face_normal(positions: &[Vec3], indices: &[u32]) -> Vec3 {
    if indices.len() < 3 {
        return Vec3::Z;
    }

    let v0 = positions[indices[0] as usize];
    let v1 = positions[indices[1] as usize];
    let v2 = positions[indices[2] as usize];

    let normal = (v1 - v0).cross(v2 - v0);
    let len = normal.length();

    if len > 0.0 {
        normal / len
    } else {
        Vec3::Z
    }
}

pub fn face_centroid(positions: &[Vec3], indices: &[u32]) -> Vec3 {
    let mut centroid = Vec3::ZERO;
    for &idx in indices {
        centroid += positions[idx as usize];
    }
    centroid / indices.len() as f32
}

/// Polygon area by fan triangulation from the first vertex.
pub fn face_area(positions: &[Vec3], indices: &[u32]) -> f32 {
    if indices.len() < 3 {
        return 0.0;
    }

    let v0 = positions[indices[0] as usize];
    let mut total_area = 0.0;

    for i in 1..indices.len() - 1 {
        let edge1 = positions[indices[i] as usize] - v0;
        let edge2 = positions[indices[i + 1] as usize] - v0;
        total_area += edge1.cross(edge2).length() * 0.5;
    }

    total_area
}
