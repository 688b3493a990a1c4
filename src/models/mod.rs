// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: fretboard geometry, chords, hands and session settings.

pub mod chord;
pub mod fretboard;
pub mod hand;
pub mod session;
