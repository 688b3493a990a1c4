// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Overlay construction.
//!
//! Builds the drawing primitives for a frame in frame pixel coordinates.
//! Painting them is left to the canvas, which keeps this module free of
//! any GUI state.

use crate::calibration::Calibrator;
use crate::models::fretboard::{Fretboard, Point, Region};
use crate::models::hand::FrameObservation;

pub type Rgb = [u8; 3];

pub const FRET_COLOR: Rgb = [200, 200, 200];
pub const STRING_COLOR: Rgb = [180, 180, 180];
pub const LABEL_COLOR: Rgb = [255, 255, 0];
pub const FINGERTIP_COLOR: Rgb = [255, 0, 0];
pub const CHORD_COLOR: Rgb = [0, 255, 0];
pub const SELECTION_COLOR: Rgb = [0, 255, 0];
pub const PENDING_COLOR: Rgb = [255, 165, 0];

const LINE_WIDTH: f32 = 2.0;
const FINGERTIP_RADIUS: f32 = 8.0;

/// One drawing instruction. Text is anchored at its bottom-left corner.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line { from: Point, to: Point, color: Rgb, width: f32 },
    Circle { center: Point, radius: f32, color: Rgb },
    Rect { region: Region, color: Rgb, width: f32 },
    Text { position: Point, text: String, color: Rgb, size: f32 },
}

/// Fret lines, string lines and string numbers.
pub fn fretboard(fb: &Fretboard) -> Vec<Primitive> {
    let mut out = Vec::new();

    for (from, to) in fb.fret_lines() {
        out.push(Primitive::Line { from, to, color: FRET_COLOR, width: LINE_WIDTH });
    }
    for (from, to) in fb.string_lines() {
        out.push(Primitive::Line { from, to, color: STRING_COLOR, width: LINE_WIDTH });
    }

    let region = fb.region();
    for string in 1..=fb.grid().strings {
        let Some(center) = fb.string_band_center(string) else {
            continue;
        };
        // Left of the board for horizontal strings, above it for vertical ones
        let position = if fb.orientation().strings_horizontal() {
            Point::new(region.x1 - 25.0, center.y + 6.0)
        } else {
            Point::new(center.x - 5.0, region.y1 - 8.0)
        };
        out.push(Primitive::Text {
            position,
            text: string.to_string(),
            color: LABEL_COLOR,
            size: 16.0,
        });
    }

    out
}

/// A dot and an `S<string>F<fret>` tag for every fingertip on the board.
pub fn fingertips(observation: &FrameObservation) -> Vec<Primitive> {
    observation
        .fingertips
        .iter()
        .flat_map(|tip| {
            [
                Primitive::Circle {
                    center: tip.position,
                    radius: FINGERTIP_RADIUS,
                    color: FINGERTIP_COLOR,
                },
                Primitive::Text {
                    position: Point::new(tip.position.x, tip.position.y - 10.0),
                    text: tip.cell.to_string(),
                    color: FINGERTIP_COLOR,
                    size: 13.0,
                },
            ]
        })
        .collect()
}

pub fn chord_label(label: &str) -> Primitive {
    Primitive::Text {
        position: Point::new(50.0, 50.0),
        text: format!("Chord: {}", label),
        color: CHORD_COLOR,
        size: 26.0,
    }
}

/// The live selection rectangle and operator instructions.
pub fn calibration(calibrator: &Calibrator) -> Vec<Primitive> {
    let mut out = vec![Primitive::Text {
        position: Point::new(20.0, 40.0),
        text: "Drag to select the fretboard, Enter to confirm, Esc to quit".to_string(),
        color: LABEL_COLOR,
        size: 18.0,
    }];

    if let Some(region) = calibrator.rectangle() {
        let color = if calibrator.can_confirm() {
            SELECTION_COLOR
        } else {
            PENDING_COLOR
        };
        out.push(Primitive::Rect { region, color, width: LINE_WIDTH });
    }

    out
}
