// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::HalfEdgeMesh;

/// Adjacency queries. Each step is a plain array load, nothing allocates.
///
/// All of these take indices into the mesh's tables and panic on out-of-range
/// input, like slice indexing does.
impl HalfEdgeMesh {
    /// The next halfedge in the same face loop
    pub fn next(&self, h: u32) -> u32 {
        self.halfedge_next[h as usize]
    }

    /// The previous halfedge in the same face loop
    pub fn prev(&self, h: u32) -> u32 {
        self.halfedge_prev[h as usize]
    }

    /// The halfedge on the opposite side of the same undirected edge, or None
    /// at a boundary
    pub fn twin(&self, h: u32) -> Option<u32> {
        self.halfedge_twin[h as usize].map(|t| t.get())
    }

    /// The vertex this halfedge leaves from
    pub fn origin(&self, h: u32) -> u32 {
        self.halfedge_vertex[h as usize]
    }

    /// The vertex this halfedge points at
    pub fn destination(&self, h: u32) -> u32 {
        self.origin(self.next(h))
    }

    /// Source and destination vertices of a halfedge
    pub fn edge_endpoints(&self, h: u32) -> (u32, u32) {
        (self.origin(h), self.destination(h))
    }

    /// The face this halfedge borders
    pub fn halfedge_face(&self, h: u32) -> u32 {
        self.halfedge_face[h as usize]
    }

    pub fn is_boundary_halfedge(&self, h: u32) -> bool {
        self.halfedge_twin[h as usize].is_none()
    }

    /// The outgoing halfedge recorded for a vertex
    pub fn vertex_halfedge(&self, v: u32) -> u32 {
        self.vertex_halfedge[v as usize]
            .expect("Vertex should have a halfedge")
            .get()
    }

    /// The representative halfedge of a face, where its loop starts
    pub fn face_halfedge(&self, f: u32) -> u32 {
        self.face_halfedge[f as usize]
    }

    /// The ordered vertex indices of a face, straight out of the flattened
    /// index buffer
    pub fn face_vertices(&self, f: u32) -> &[u32] {
        let offset = self.face_offsets[f as usize] as usize;
        let count = self.face_vert_counts[f as usize] as usize;
        &self.face_vertex_indices[offset..offset + count]
    }

    /// Walks a face's halfedge loop, starting at its representative halfedge.
    /// Yields exactly as many halfedges as the face has vertices.
    pub fn face_halfedges(&self, f: u32) -> FaceHalfEdges<'_> {
        FaceHalfEdges {
            mesh: self,
            current: self.face_halfedge(f),
            remaining: self.face_vert_counts[f as usize],
        }
    }

    /// Circulates the halfedges leaving a vertex, starting at its recorded
    /// outgoing halfedge. Stops after a full turn, or early at the first
    /// boundary; for boundary vertices this only yields the fan on one side
    /// of the boundary.
    pub fn vertex_fan(&self, v: u32) -> VertexFan<'_> {
        let start = self.vertex_halfedge(v);
        VertexFan {
            mesh: self,
            start,
            current: Some(start),
            steps: 0,
        }
    }
}

pub struct FaceHalfEdges<'a> {
    mesh: &'a HalfEdgeMesh,
    current: u32,
    remaining: u32,
}

impl<'a> Iterator for FaceHalfEdges<'a> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let h = self.current;
        self.current = self.mesh.next(h);
        Some(h)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

impl<'a> ExactSizeIterator for FaceHalfEdges<'a> {}

pub struct VertexFan<'a> {
    mesh: &'a HalfEdgeMesh,
    start: u32,
    current: Option<u32>,
    steps: usize,
}

impl<'a> Iterator for VertexFan<'a> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let h = self.current.take()?;
        self.steps += 1;

        // Stepping to the twin of the incoming halfedge yields the next
        // outgoing halfedge around the origin. The step guard bails out of
        // fans corrupted into endless cycles.
        if self.steps <= self.mesh.num_halfedges() {
            match self.mesh.twin(self.mesh.prev(h)) {
                Some(t) if t != self.start => self.current = Some(t),
                _ => {}
            }
        }

        Some(h)
    }
}
