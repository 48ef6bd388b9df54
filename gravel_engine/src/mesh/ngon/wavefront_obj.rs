// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;
use std::str::SplitWhitespace;

use anyhow::{anyhow, bail, Context, Result};
use glam::{Vec2, Vec3};

use super::{face_area, face_centroid, face_normal, NGonFace, NGonMesh};

/// Loads a Wavefront OBJ file into an [`NGonMesh`].
///
/// Supports `v`, `vn`, `vt` and `f` records, with all four face-vertex
/// reference forms (`v`, `v/vt`, `v//vn`, `v/vt/vn`). Anything else is
/// ignored. Faces with fewer than three vertices are skipped.
pub fn load_obj(path: impl AsRef<Path>) -> Result<NGonMesh> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to open OBJ file: {}", path.display()))?;
    parse_obj(&contents).with_context(|| format!("While parsing {}", path.display()))
}

/// Same as [`load_obj`], but over in-memory OBJ contents.
pub fn parse_obj(contents: &str) -> Result<NGonMesh> {
    let mut mesh = NGonMesh::default();

    for (i, line) in contents.lines().enumerate() {
        let line_nr = i + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let x = parse_f32(&mut tokens, "position", line_nr)?;
                let y = parse_f32(&mut tokens, "position", line_nr)?;
                let z = parse_f32(&mut tokens, "position", line_nr)?;
                mesh.positions.push(Vec3::new(x, y, z));
            }
            Some("vn") => {
                let x = parse_f32(&mut tokens, "normal", line_nr)?;
                let y = parse_f32(&mut tokens, "normal", line_nr)?;
                let z = parse_f32(&mut tokens, "normal", line_nr)?;
                mesh.normals.push(Vec3::new(x, y, z).normalize());
            }
            Some("vt") => {
                let u = parse_f32(&mut tokens, "texcoord", line_nr)?;
                let v = parse_f32(&mut tokens, "texcoord", line_nr)?;
                mesh.tex_coords.push(Vec2::new(u, v));
            }
            Some("f") => {
                let mut face = NGonFace::default();
                for token in tokens {
                    let (v, vt, vn) = parse_face_ref(token, line_nr)?;
                    face.vertex_indices.push(v);
                    if let Some(vt) = vt {
                        face.tex_coord_indices.push(vt);
                    }
                    if let Some(vn) = vn {
                        face.normal_indices.push(vn);
                    }
                }

                if face.vertex_indices.len() < 3 {
                    continue;
                }
                if let Some(&idx) = face
                    .vertex_indices
                    .iter()
                    .find(|&&idx| idx as usize >= mesh.positions.len())
                {
                    bail!("Face vertex index {} out of range at line {line_nr}", idx + 1);
                }

                face.offset = mesh.face_vertex_indices.len() as u32;
                face.normal = face_normal(&mesh.positions, &face.vertex_indices).extend(0.0);
                face.center = face_centroid(&mesh.positions, &face.vertex_indices).extend(1.0);
                face.area = face_area(&mesh.positions, &face.vertex_indices);

                mesh.face_vertex_indices
                    .extend(face.vertex_indices.iter().copied());
                mesh.faces.push(face);
            }
            // o, g, s, usemtl, mtllib and friends carry no geometry
            _ => continue,
        }
    }

    mesh.fill_missing_attributes();

    let (mut tris, mut quads, mut ngons) = (0, 0, 0);
    for face in &mesh.faces {
        match face.vertex_indices.len() {
            3 => tris += 1,
            4 => quads += 1,
            _ => ngons += 1,
        }
    }
    log::debug!(
        "Loaded OBJ: {} vertices, {} faces ({tris} triangles, {quads} quads, {ngons} n-gons)",
        mesh.nb_vertices(),
        mesh.nb_faces(),
    );

    Ok(mesh)
}

fn parse_f32(tokens: &mut SplitWhitespace, what: &str, line_nr: usize) -> Result<f32> {
    let token = tokens
        .next()
        .ok_or_else(|| anyhow!("Missing {what} component at line {line_nr}"))?;
    token
        .parse::<f32>()
        .with_context(|| format!("Malformed {what} component {token:?} at line {line_nr}"))
}

/// Parses one `f`-record vertex reference into 0-based (position, texcoord,
/// normal) indices. OBJ indices are 1-based.
fn parse_face_ref(token: &str, line_nr: usize) -> Result<(u32, Option<u32>, Option<u32>)> {
    let mut parts = token.split('/');

    let v = parse_index(parts.next(), token, line_nr)?
        .ok_or_else(|| anyhow!("Malformed face reference {token:?} at line {line_nr}"))?;
    let vt = parse_index(parts.next(), token, line_nr)?;
    let vn = parse_index(parts.next(), token, line_nr)?;

    Ok((v, vt, vn))
}

fn parse_index(part: Option<&str>, token: &str, line_nr: usize) -> Result<Option<u32>> {
    let part = match part {
        None | Some("") => return Ok(None),
        Some(part) => part,
    };
    let idx = part
        .parse::<u32>()
        .with_context(|| format!("Malformed face reference {token:?} at line {line_nr}"))?;
    if idx == 0 {
        bail!("Face reference {token:?} at line {line_nr} is zero, OBJ indices start at 1");
    }
    Ok(Some(idx - 1))
}
