// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-frame chord detection.
//!
//! Ties the calibrated fretboard to the chord table: hands in, occupied
//! cells and a chord label out. Nothing carries over between frames except
//! the previous label, which is only used to log changes.

use crate::models::chord::ChordTable;
use crate::models::fretboard::Fretboard;
use crate::models::hand::{FrameObservation, Hand};

/// Result of one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub observation: FrameObservation,
    pub label: String,
}

pub struct ChordDetector {
    fretboard: Fretboard,
    chords: ChordTable,
    fingertips: Vec<usize>,
    frame_size: (u32, u32),
    last_label: Option<String>,
}

impl ChordDetector {
    pub fn new(
        fretboard: Fretboard,
        chords: ChordTable,
        fingertips: Vec<usize>,
        frame_size: (u32, u32),
    ) -> Self {
        Self {
            fretboard,
            chords,
            fingertips,
            frame_size,
            last_label: None,
        }
    }

    pub fn fretboard(&self) -> &Fretboard {
        &self.fretboard
    }

    /// Project the hands of one frame and match the occupied cells.
    pub fn observe(&mut self, hands: &[Hand]) -> Detection {
        let observation =
            FrameObservation::from_hands(hands, &self.fretboard, self.frame_size, &self.fingertips);
        let label = self.chords.detect(&observation.cells).to_string();

        if self.last_label.as_deref() != Some(label.as_str()) {
            log::debug!(
                "Chord: {} (cells: {:?})",
                label,
                observation.cells.iter().map(|c| c.to_string()).collect::<Vec<_>>()
            );
            self.last_label = Some(label.clone());
        }

        Detection { observation, label }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fretboard::{Cell, Grid, Orientation, Point, Region};
    use crate::models::hand::{Landmark, FINGERTIPS, JOINTS_PER_HAND};

    /// Frame 600x600 with the board covering (0,0)-(400,600): every string
    /// band is 100px tall, every fret band 100px wide.
    fn detector() -> ChordDetector {
        let region = Region { x1: 0.0, y1: 0.0, x2: 400.0, y2: 600.0 };
        let fretboard =
            Fretboard::new(region, Grid::new(6, 4).unwrap(), Orientation::StringsTopDown).unwrap();
        ChordDetector::new(fretboard, ChordTable::open_chords(), FINGERTIPS.to_vec(), (600, 600))
    }

    /// A hand whose fingertips sit in the centres of the given cells.
    fn hand_on(cells: &[(u8, u8)]) -> Hand {
        let mut landmarks = vec![Landmark { x: 0.99, y: 0.99 }; JOINTS_PER_HAND];
        for (joint, (string, fret)) in FINGERTIPS.iter().zip(cells) {
            let center = Point::new(*fret as f32 * 100.0 - 50.0, *string as f32 * 100.0 - 50.0);
            landmarks[*joint] = Landmark { x: center.x / 600.0, y: center.y / 600.0 };
        }
        Hand::new(landmarks)
    }

    #[test]
    fn test_detects_c_major() {
        let mut detector = detector();
        let detection = detector.observe(&[hand_on(&[(2, 1), (4, 2), (5, 3)])]);
        assert_eq!(detection.label, "C major");
        assert_eq!(detection.observation.fingertips.len(), 3);
        assert!(detection.observation.cells.contains(&Cell::new(5, 3)));
    }

    #[test]
    fn test_no_hands_is_unknown() {
        let mut detector = detector();
        assert_eq!(detector.observe(&[]).label, "Unknown");
    }

    #[test]
    fn test_each_frame_stands_alone() {
        let mut detector = detector();
        assert_eq!(detector.observe(&[hand_on(&[(3, 2), (1, 2), (2, 3)])]).label, "D major");
        assert_eq!(detector.observe(&[hand_on(&[(1, 1)])]).label, "Unknown");
        assert_eq!(detector.observe(&[hand_on(&[(4, 2), (3, 2), (2, 2)])]).label, "A major");
    }

    #[test]
    fn test_two_hands_combine() {
        let mut detector = detector();
        let left = hand_on(&[(5, 2), (6, 3)]);
        let right = hand_on(&[(1, 3)]);
        assert_eq!(detector.observe(&[left, right]).label, "G major");
    }
}
