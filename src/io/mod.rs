// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame, landmark and configuration I/O.

pub mod landmarks;
pub mod media;
pub mod serialization;
