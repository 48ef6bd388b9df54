// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

use super::HalfEdgeMesh;

/// Structural corruption found while checking a freshly built mesh. Every
/// variant names the entity involved, so bad input can be diagnosed from the
/// error alone.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TopologyError {
    #[error("half-edge loop of face {face} is broken at half-edge {halfedge}")]
    LoopBroken { face: u32, halfedge: u32 },

    #[error(
        "half-edge loop of face {face} closes after {steps} steps, expected {expected}"
    )]
    LoopLengthMismatch { face: u32, steps: u32, expected: u32 },

    #[error("{count} half-edges have an asymmetric twin relation")]
    TwinAsymmetry { count: u32 },

    #[error("vertex {vertex} has no outgoing half-edge")]
    DanglingVertex { vertex: u32 },

    #[error("outgoing half-edge {halfedge} of vertex {vertex} originates elsewhere")]
    WrongOriginVertex { vertex: u32, halfedge: u32 },
}

/// Runs the three consistency passes over a fully populated mesh. Linear in
/// the size of the mesh. The builder calls this unconditionally before
/// releasing a mesh; a failure here means the input polygon soup produced
/// inconsistent adjacency, and the whole build is aborted.
#[profiling::function]
pub(crate) fn validate_topology(mesh: &HalfEdgeMesh) -> Result<(), TopologyError> {
    check_face_loops(mesh)?;
    check_twin_symmetry(mesh)?;
    check_vertex_edges(mesh)?;
    Ok(())
}

/// Every face loop must close back on itself, with consistent back-links, in
/// exactly as many steps as the face has vertices.
fn check_face_loops(mesh: &HalfEdgeMesh) -> Result<(), TopologyError> {
    let max_steps = mesh.counts.num_halfedges as u32 + 1;

    for face in 0..mesh.counts.num_faces as u32 {
        let start = mesh.face_halfedge[face as usize];
        let mut edge = start;
        let mut steps = 0;

        loop {
            let next = mesh.halfedge_next[edge as usize];
            match mesh.halfedge_prev.get(next as usize) {
                Some(&prev) if prev == edge => {}
                _ => return Err(TopologyError::LoopBroken { face, halfedge: edge }),
            }

            edge = next;
            steps += 1;

            // A loop longer than the whole mesh left the face's cycle
            if steps > max_steps {
                return Err(TopologyError::LoopBroken { face, halfedge: edge });
            }
            if edge == start {
                break;
            }
        }

        let expected = mesh.face_vert_counts[face as usize];
        if steps != expected {
            return Err(TopologyError::LoopLengthMismatch {
                face,
                steps,
                expected,
            });
        }
    }

    Ok(())
}

/// Twins must point back at each other and span the same undirected edge in
/// opposite directions. All violations are counted before failing, a single
/// bad pair usually means many, and the tally helps diagnosis.
fn check_twin_symmetry(mesh: &HalfEdgeMesh) -> Result<(), TopologyError> {
    let mut violations = 0;

    for he in 0..mesh.counts.num_halfedges {
        let twin = match mesh.halfedge_twin[he] {
            Some(twin) => twin.get() as usize,
            None => continue,
        };

        if twin >= mesh.counts.num_halfedges {
            violations += 1;
            continue;
        }

        if mesh.halfedge_twin[twin].map(|t| t.get() as usize) != Some(he) {
            violations += 1;
        }

        // The twin must run along the same edge, reversed
        let v0 = mesh.halfedge_vertex[he];
        let v1 = mesh.halfedge_vertex[mesh.halfedge_next[he] as usize];
        let tv0 = mesh.halfedge_vertex[twin];
        let tv1 = mesh.halfedge_vertex[mesh.halfedge_next[twin] as usize];
        if v0 != tv1 || v1 != tv0 {
            violations += 1;
        }
    }

    if violations > 0 {
        return Err(TopologyError::TwinAsymmetry { count: violations });
    }

    Ok(())
}

/// Every vertex must record an outgoing half-edge that actually starts there.
fn check_vertex_edges(mesh: &HalfEdgeMesh) -> Result<(), TopologyError> {
    for vertex in 0..mesh.counts.num_vertices as u32 {
        let halfedge = match mesh.vertex_halfedge[vertex as usize] {
            Some(halfedge) => halfedge.get(),
            None => return Err(TopologyError::DanglingVertex { vertex }),
        };

        match mesh.halfedge_vertex.get(halfedge as usize) {
            Some(&origin) if origin == vertex => {}
            _ => {
                return Err(TopologyError::WrongOriginVertex { vertex, halfedge });
            }
        }
    }

    Ok(())
}
