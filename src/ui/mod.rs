// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the fretcam window.

pub mod canvas;
pub mod chord_panel;
pub mod overlay;
pub mod status;
