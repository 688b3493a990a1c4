// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Hand landmarks and per-frame fingertip observations.

use super::fretboard::{Cell, Fretboard, Point};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Number of joints reported per hand by the landmark model.
pub const JOINTS_PER_HAND: usize = 21;

/// Joint indices of the index, middle, ring and pinky fingertips.
pub const FINGERTIPS: [usize; 4] = [8, 12, 16, 20];

/// A joint position normalized to the frame (0.0 to 1.0 on each axis).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    /// Scale to pixel coordinates of a `width` x `height` frame.
    pub fn to_pixel(self, width: u32, height: u32) -> Point {
        Point::new(self.x * width as f32, self.y * height as f32)
    }
}

/// One detected hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub landmarks: Vec<Landmark>,
    #[serde(default)]
    pub handedness: Option<String>,
    #[serde(default)]
    pub score: Option<f32>,
}

impl Hand {
    #[cfg(test)]
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self {
            landmarks,
            handedness: None,
            score: None,
        }
    }
}

/// A fingertip that landed on the fretboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fingertip {
    pub position: Point,
    pub cell: Cell,
}

/// Occupied cells for a single frame. Built fresh every frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameObservation {
    pub cells: BTreeSet<Cell>,
    pub fingertips: Vec<Fingertip>,
}

impl FrameObservation {
    /// Project the selected joints of every hand through the fretboard.
    ///
    /// Joints outside the region, or missing from a short landmark list,
    /// contribute nothing.
    pub fn from_hands(
        hands: &[Hand],
        fretboard: &Fretboard,
        frame_size: (u32, u32),
        joints: &[usize],
    ) -> Self {
        let (width, height) = frame_size;
        let mut observation = Self::default();

        for hand in hands {
            for &joint in joints {
                let Some(landmark) = hand.landmarks.get(joint) else {
                    continue;
                };
                let position = landmark.to_pixel(width, height);
                if let Some(cell) = fretboard.project(position) {
                    observation.cells.insert(cell);
                    observation.fingertips.push(Fingertip { position, cell });
                }
            }
        }

        observation
    }
}
