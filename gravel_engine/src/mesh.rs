// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// The n-gon polygon soup produced by the loaders, with per-face geometric
/// attributes. This is the input format of the half-edge builder.
pub mod ngon;

/// The flat-array half-edge structure, its builder, validator, traversal
/// queries and GPU buffer generation.
pub mod halfedge;
