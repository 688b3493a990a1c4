// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Fretboard geometry and the grid projector.
//!
//! A [`Fretboard`] is a calibrated pixel [`Region`] partitioned into string
//! bands and fret bands. Projecting a pixel [`Point`] through it yields the
//! 1-based [`Cell`] under that point, or `None` when the point lies outside
//! the region.

use crate::error::FretcamError;
use serde::{Deserialize, Serialize};

/// A 2D point in pixel coordinates of a single video frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned pixel rectangle with `x1 <= x2` and `y1 <= y2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Region {
    /// Build a region from two opposite corners given in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x1: a.x.min(b.x),
            y1: a.y.min(b.y),
            x2: a.x.max(b.x),
            y2: a.y.max(b.y),
        }
    }

    /// Return the region if it has positive width and height.
    pub fn validated(self) -> Result<Self, FretcamError> {
        // `!(a > b)` also rejects NaN corners.
        if !(self.x2 > self.x1) || !(self.y2 > self.y1) {
            return Err(FretcamError::DegenerateRegion {
                x1: self.x1,
                y1: self.y1,
                x2: self.x2,
                y2: self.y2,
            });
        }
        Ok(self)
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Half-open containment: lower edges are inside, upper edges are not.
    pub fn contains(&self, p: Point) -> bool {
        self.x1 <= p.x && p.x < self.x2 && self.y1 <= p.y && p.y < self.y2
    }
}

/// Grid resolution, fixed for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub strings: u8,
    pub frets: u8,
}

impl Grid {
    pub fn new(strings: u8, frets: u8) -> Result<Self, FretcamError> {
        if strings == 0 || frets == 0 {
            return Err(FretcamError::InvalidGrid { strings, frets });
        }
        Ok(Self { strings, frets })
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (1..=self.strings).contains(&cell.string) && (1..=self.frets).contains(&cell.fret)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self { strings: 6, frets: 4 }
    }
}

/// One (string, fret) intersection, both 1-based.
///
/// Serialized as a `[string, fret]` pair so chord tables stay compact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(u8, u8)", into = "(u8, u8)")]
pub struct Cell {
    pub string: u8,
    pub fret: u8,
}

impl Cell {
    pub fn new(string: u8, fret: u8) -> Self {
        Self { string, fret }
    }
}

impl From<(u8, u8)> for Cell {
    fn from((string, fret): (u8, u8)) -> Self {
        Self { string, fret }
    }
}

impl From<Cell> for (u8, u8) {
    fn from(cell: Cell) -> Self {
        (cell.string, cell.fret)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "S{}F{}", self.string, self.fret)
    }
}

/// Which screen axis carries the strings, and where string 1 sits.
///
/// Frets always run along the other axis with fret 1 nearest the region's
/// left edge (horizontal strings) or top edge (vertical strings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Horizontal string bands, string 1 at the top.
    #[default]
    StringsTopDown,
    /// Horizontal string bands, string 1 at the bottom.
    StringsBottomUp,
    /// Vertical string bands, string 1 at the left.
    StringsLeftRight,
    /// Vertical string bands, string 1 at the right.
    StringsRightLeft,
}

impl Orientation {
    /// True when strings are horizontal bands (stacked along y).
    pub fn strings_horizontal(self) -> bool {
        matches!(self, Self::StringsTopDown | Self::StringsBottomUp)
    }

    fn strings_descending(self) -> bool {
        matches!(self, Self::StringsBottomUp | Self::StringsRightLeft)
    }
}

/// 1-based band index of a fraction in [0, 1) split into `bands` parts.
fn band_index(fraction: f32, bands: u8) -> u8 {
    let index = (fraction * bands as f32).floor() as u8;
    // Guards f32 rounding for fractions a hair below 1.0.
    index.min(bands - 1) + 1
}

/// A calibrated region, its grid and the axis convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fretboard {
    region: Region,
    grid: Grid,
    orientation: Orientation,
}

impl Fretboard {
    /// Validates both the region and the grid before accepting them.
    pub fn new(region: Region, grid: Grid, orientation: Orientation) -> Result<Self, FretcamError> {
        let region = region.validated()?;
        let grid = Grid::new(grid.strings, grid.frets)?;
        Ok(Self {
            region,
            grid,
            orientation,
        })
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Project a pixel point onto the grid.
    ///
    /// Points outside the half-open region `[x1, x2) x [y1, y2)` are rejected.
    pub fn project(&self, p: Point) -> Option<Cell> {
        if !self.region.contains(p) {
            return None;
        }

        let fx = (p.x - self.region.x1) / self.region.width();
        let fy = (p.y - self.region.y1) / self.region.height();
        let (string_fraction, fret_fraction) = if self.orientation.strings_horizontal() {
            (fy, fx)
        } else {
            (fx, fy)
        };

        let mut string = band_index(string_fraction, self.grid.strings);
        if self.orientation.strings_descending() {
            string = self.grid.strings + 1 - string;
        }
        let fret = band_index(fret_fraction, self.grid.frets);

        Some(Cell { string, fret })
    }

    /// Line segments separating string bands, including both outer edges.
    pub fn string_lines(&self) -> Vec<(Point, Point)> {
        let r = self.region;
        let n = self.grid.strings;
        (0..=n)
            .map(|i| {
                let t = i as f32 / n as f32;
                if self.orientation.strings_horizontal() {
                    let y = r.y1 + t * r.height();
                    (Point::new(r.x1, y), Point::new(r.x2, y))
                } else {
                    let x = r.x1 + t * r.width();
                    (Point::new(x, r.y1), Point::new(x, r.y2))
                }
            })
            .collect()
    }

    /// Line segments separating fret bands, including both outer edges.
    pub fn fret_lines(&self) -> Vec<(Point, Point)> {
        let r = self.region;
        let n = self.grid.frets;
        (0..=n)
            .map(|j| {
                let t = j as f32 / n as f32;
                if self.orientation.strings_horizontal() {
                    let x = r.x1 + t * r.width();
                    (Point::new(x, r.y1), Point::new(x, r.y2))
                } else {
                    let y = r.y1 + t * r.height();
                    (Point::new(r.x1, y), Point::new(r.x2, y))
                }
            })
            .collect()
    }

    /// Centre of the band occupied by `string` (1-based), or `None` if out of range.
    pub fn string_band_center(&self, string: u8) -> Option<Point> {
        let n = self.grid.strings;
        if !(1..=n).contains(&string) {
            return None;
        }
        let position = if self.orientation.strings_descending() {
            n - string
        } else {
            string - 1
        };
        let t = (position as f32 + 0.5) / n as f32;
        let r = self.region;
        let center = if self.orientation.strings_horizontal() {
            Point::new((r.x1 + r.x2) / 2.0, r.y1 + t * r.height())
        } else {
            Point::new(r.x1 + t * r.width(), (r.y1 + r.y2) / 2.0)
        };
        Some(center)
    }
}
