// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Chord shapes and the chord matcher.
//!
//! A [`ChordTable`] is an ordered list of [`ChordShape`]s. Matching walks the
//! table in declaration order and returns the first chord whose required
//! cells are all occupied, so the order of the table is part of its meaning.

use super::fretboard::{Cell, Grid};
use crate::error::FretcamError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// A named chord and the cells that must be held down to play it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordShape {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl ChordShape {
    pub fn new(name: impl Into<String>, cells: &[(u8, u8)]) -> Self {
        Self {
            name: name.into(),
            cells: cells.iter().copied().map(Cell::from).collect(),
        }
    }

    /// True if every required cell is occupied. Extra occupied cells are fine.
    pub fn is_satisfied_by(&self, occupied: &BTreeSet<Cell>) -> bool {
        self.cells.iter().all(|cell| occupied.contains(cell))
    }
}

/// Ordered chord definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChordTable {
    chords: Vec<ChordShape>,
}

impl ChordTable {
    /// Label reported when no chord matches.
    pub const UNKNOWN: &'static str = "Unknown";

    pub fn new(chords: Vec<ChordShape>) -> Self {
        Self { chords }
    }

    /// The six open chords, in their canonical matching order.
    pub fn open_chords() -> Self {
        Self::new(vec![
            ChordShape::new("C major", &[(2, 1), (4, 2), (5, 3)]),
            ChordShape::new("G major", &[(5, 2), (6, 3), (1, 3)]),
            ChordShape::new("E minor", &[(5, 2), (4, 2)]),
            ChordShape::new("D major", &[(3, 2), (1, 2), (2, 3)]),
            ChordShape::new("A major", &[(4, 2), (3, 2), (2, 2)]),
            ChordShape::new("E major", &[(5, 2), (4, 2), (3, 1)]),
        ])
    }

    pub fn chords(&self) -> &[ChordShape] {
        &self.chords
    }

    pub fn len(&self) -> usize {
        self.chords.len()
    }

    /// Check that every chord is non-empty, uniquely named and fits the grid.
    pub fn validate(&self, grid: Grid) -> Result<(), FretcamError> {
        let mut seen = HashSet::new();
        for chord in &self.chords {
            if !seen.insert(chord.name.as_str()) {
                return Err(FretcamError::DuplicateChord(chord.name.clone()));
            }
            if chord.cells.is_empty() {
                return Err(FretcamError::EmptyChord(chord.name.clone()));
            }
            if let Some(cell) = chord.cells.iter().find(|c| !grid.contains(**c)) {
                return Err(FretcamError::CellOutOfRange {
                    chord: chord.name.clone(),
                    string: cell.string,
                    fret: cell.fret,
                    strings: grid.strings,
                    frets: grid.frets,
                });
            }
        }
        Ok(())
    }

    /// Return the first chord satisfied by the occupied cells.
    pub fn find(&self, occupied: &BTreeSet<Cell>) -> Option<&ChordShape> {
        self.chords.iter().find(|chord| chord.is_satisfied_by(occupied))
    }

    /// Label of the first satisfied chord, or [`ChordTable::UNKNOWN`].
    pub fn detect(&self, occupied: &BTreeSet<Cell>) -> &str {
        self.find(occupied)
            .map(|chord| chord.name.as_str())
            .unwrap_or(Self::UNKNOWN)
    }
}

impl Default for ChordTable {
    fn default() -> Self {
        Self::open_chords()
    }
}
