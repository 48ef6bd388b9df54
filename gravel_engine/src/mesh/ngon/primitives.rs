// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use glam::{Vec2, Vec3};

use super::NGonMesh;

pub struct Box;

impl Box {
    pub fn build(center: Vec3, size: Vec3) -> NGonMesh {
        let hsize = size * 0.5;

        let v1 = center + Vec3::new(-hsize.x, -hsize.y, -hsize.z);
        let v2 = center + Vec3::new(hsize.x, -hsize.y, -hsize.z);
        let v3 = center + Vec3::new(hsize.x, -hsize.y, hsize.z);
        let v4 = center + Vec3::new(-hsize.x, -hsize.y, hsize.z);

        let v5 = center + Vec3::new(-hsize.x, hsize.y, -hsize.z);
        let v6 = center + Vec3::new(-hsize.x, hsize.y, hsize.z);
        let v7 = center + Vec3::new(hsize.x, hsize.y, hsize.z);
        let v8 = center + Vec3::new(hsize.x, hsize.y, -hsize.z);

        let mut mesh = NGonMesh::default();
        mesh.positions = vec![v1, v2, v3, v4, v5, v6, v7, v8];

        mesh.push_face([0, 1, 2, 3]);
        mesh.push_face([4, 5, 6, 7]);
        mesh.push_face([4, 7, 1, 0]);
        mesh.push_face([3, 2, 6, 5]);
        mesh.push_face([5, 4, 0, 3]);
        mesh.push_face([6, 2, 1, 7]);

        mesh.fill_missing_attributes();
        mesh
    }
}

pub struct Quad;

impl Quad {
    pub fn build(center: Vec3, normal: Vec3, right: Vec3, size: Vec2) -> NGonMesh {
        let normal = normal.normalize();
        let right = right.normalize();
        let forward = normal.cross(right);

        let hsize = size * 0.5;

        let v1 = center + hsize.x * right + hsize.y * forward;
        let v2 = center - hsize.x * right + hsize.y * forward;
        let v3 = center - hsize.x * right - hsize.y * forward;
        let v4 = center + hsize.x * right - hsize.y * forward;

        let mut mesh = NGonMesh::default();
        mesh.positions = vec![v1, v2, v3, v4];
        mesh.push_face([0, 1, 2, 3]);
        mesh.fill_missing_attributes();
        mesh
    }
}

pub struct Triangle;

impl Triangle {
    pub fn build(a: Vec3, b: Vec3, c: Vec3) -> NGonMesh {
        let mut mesh = NGonMesh::default();
        mesh.positions = vec![a, b, c];
        mesh.push_face([0, 1, 2]);
        mesh.fill_missing_attributes();
        mesh
    }
}

pub struct IcoSphere;

impl IcoSphere {
    /// An icosahedron projected onto the sphere. Closed surface, every edge
    /// shared by exactly two faces.
    pub fn build(center: Vec3, radius: f32) -> NGonMesh {
        let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;

        let corners = [
            Vec3::new(-1.0, phi, 0.0),
            Vec3::new(1.0, phi, 0.0),
            Vec3::new(-1.0, -phi, 0.0),
            Vec3::new(1.0, -phi, 0.0),
            Vec3::new(0.0, -1.0, phi),
            Vec3::new(0.0, 1.0, phi),
            Vec3::new(0.0, -1.0, -phi),
            Vec3::new(0.0, 1.0, -phi),
            Vec3::new(phi, 0.0, -1.0),
            Vec3::new(phi, 0.0, 1.0),
            Vec3::new(-phi, 0.0, -1.0),
            Vec3::new(-phi, 0.0, 1.0),
        ];

        let mut mesh = NGonMesh::default();
        mesh.positions = corners
            .iter()
            .map(|&c| center + c.normalize() * radius)
            .collect();
        mesh.normals = corners.iter().map(|&c| c.normalize()).collect();

        let polygons: [[u32; 3]; 20] = [
            [0, 11, 5],
            [0, 5, 1],
            [0, 1, 7],
            [0, 7, 10],
            [0, 10, 11],
            [1, 5, 9],
            [5, 11, 4],
            [11, 10, 2],
            [10, 7, 6],
            [7, 1, 8],
            [3, 9, 4],
            [3, 4, 2],
            [3, 2, 6],
            [3, 6, 8],
            [3, 8, 9],
            [4, 9, 5],
            [2, 4, 11],
            [6, 2, 10],
            [8, 6, 7],
            [9, 8, 1],
        ];
        for polygon in polygons {
            mesh.push_face(polygon);
        }

        mesh.fill_missing_attributes();
        mesh
    }
}

#[cfg(test)]
mod test {
    use glam::{Vec2, Vec3};

    use super::*;

    #[test]
    fn box_counts() {
        let mesh = Box::build(Vec3::ZERO, Vec3::ONE);
        assert_eq!(mesh.nb_vertices(), 8);
        assert_eq!(mesh.nb_faces(), 6);
        assert_eq!(mesh.face_vertex_indices.len(), 24);
        assert!(mesh.faces.iter().all(|f| f.count() == 4));
    }

    #[test]
    fn icosphere_counts() {
        let mesh = IcoSphere::build(Vec3::ZERO, 2.0);
        assert_eq!(mesh.nb_vertices(), 12);
        assert_eq!(mesh.nb_faces(), 20);
        assert!(mesh.faces.iter().all(|f| f.count() == 3));
        for p in &mesh.positions {
            assert!((p.length() - 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn quad_lies_in_requested_plane() {
        let mesh = Quad::build(Vec3::ZERO, Vec3::Y, Vec3::X, Vec2::ONE);
        assert_eq!(mesh.nb_vertices(), 4);
        for p in &mesh.positions {
            assert!(p.y.abs() < 1e-6);
        }
    }
}
