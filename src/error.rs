// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Domain error types.
//!
//! Validation failures in the fretboard model, chord table and session
//! configuration are reported through [`FretcamError`]. Application plumbing
//! wraps these in `anyhow::Error` with extra context.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FretcamError {
    /// Region has zero (or negative) width or height.
    #[error("Degenerate region ({x1}, {y1})-({x2}, {y2}): width and height must be positive")]
    DegenerateRegion { x1: f32, y1: f32, x2: f32, y2: f32 },

    /// Grid resolution with a zero dimension.
    #[error("Invalid grid {strings} strings x {frets} frets: both must be at least 1")]
    InvalidGrid { strings: u8, frets: u8 },

    /// A chord references a cell outside the grid.
    #[error("Chord '{chord}' uses cell (string {string}, fret {fret}) outside the {strings}x{frets} grid")]
    CellOutOfRange {
        chord: String,
        string: u8,
        fret: u8,
        strings: u8,
        frets: u8,
    },

    /// A chord with no required cells would match every frame.
    #[error("Chord '{0}' has no required cells")]
    EmptyChord(String),

    #[error("Chord '{0}' is defined more than once")]
    DuplicateChord(String),

    /// Confidence threshold outside [0, 1].
    #[error("Invalid {name} confidence {value}: must be within [0, 1]")]
    InvalidConfidence { name: &'static str, value: f32 },

    /// Fixed-proportion region that does not fit inside the frame.
    #[error("Invalid fixed region proportions: {0}")]
    InvalidProportions(String),

    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),

    /// Landmark record that cannot be interpreted.
    #[error("Malformed landmarks: {0}")]
    MalformedLandmarks(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = FretcamError::InvalidGrid { strings: 0, frets: 4 };
        assert_eq!(
            err.to_string(),
            "Invalid grid 0 strings x 4 frets: both must be at least 1"
        );

        let err = FretcamError::EmptyChord("C major".to_string());
        assert_eq!(err.to_string(), "Chord 'C major' has no required cells");
    }
}
