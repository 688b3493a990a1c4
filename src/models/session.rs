// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session configuration.
//!
//! Everything that stays fixed for a run: grid resolution, orientation, how
//! the region is established, detector thresholds and the chord table.

use super::chord::ChordTable;
use super::fretboard::{Grid, Orientation, Region};
use super::hand::{FINGERTIPS, JOINTS_PER_HAND};
use crate::error::FretcamError;
use serde::{Deserialize, Serialize};

/// Region placement as fractions of the frame size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Proportions {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Proportions {
    /// A short, wide box in the lower-left part of the frame.
    fn default() -> Self {
        Self {
            x: 0.1,
            y: 0.65,
            width: 0.4,
            height: 0.18,
        }
    }
}

impl Proportions {
    pub fn validate(&self) -> Result<(), FretcamError> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !(in_unit(self.x) && in_unit(self.y) && in_unit(self.width) && in_unit(self.height)) {
            return Err(FretcamError::InvalidProportions(format!(
                "all values must be within [0, 1], got {:?}",
                self
            )));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(FretcamError::InvalidProportions(
                "width and height must be positive".to_string(),
            ));
        }
        if self.x + self.width > 1.0 || self.y + self.height > 1.0 {
            return Err(FretcamError::InvalidProportions(
                "region extends past the frame edge".to_string(),
            ));
        }
        Ok(())
    }
}

/// How the fretboard region is established at startup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RegionMode {
    /// Fixed fractions of the frame size.
    Fixed(Proportions),
    /// Drag a rectangle over the live preview before playing.
    Interactive,
    /// A region in pixels, typically exported after an interactive calibration.
    Explicit(Region),
}

impl Default for RegionMode {
    fn default() -> Self {
        Self::Fixed(Proportions::default())
    }
}

/// Complete session settings for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub grid: Grid,
    pub orientation: Orientation,
    pub region: RegionMode,
    pub detection_confidence: f32,
    pub tracking_confidence: f32,
    /// Flip frames horizontally before detection and display.
    pub mirror: bool,
    /// Landmark joints treated as fingertips.
    pub fingertips: Vec<usize>,
    pub chords: ChordTable,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grid: Grid::default(),
            orientation: Orientation::default(),
            region: RegionMode::default(),
            detection_confidence: 0.7,
            tracking_confidence: 0.7,
            mirror: true,
            fingertips: FINGERTIPS.to_vec(),
            chords: ChordTable::open_chords(),
        }
    }
}

impl SessionConfig {
    /// Check every setting that could break the per-frame loop.
    pub fn validate(&self) -> Result<(), FretcamError> {
        let grid = Grid::new(self.grid.strings, self.grid.frets)?;
        self.chords.validate(grid)?;

        for (name, value) in [
            ("detection", self.detection_confidence),
            ("tracking", self.tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(FretcamError::InvalidConfidence { name, value });
            }
        }

        if let Some(joint) = self.fingertips.iter().find(|j| **j >= JOINTS_PER_HAND) {
            return Err(FretcamError::MalformedLandmarks(format!(
                "fingertip joint {} is out of range (hands have {} joints)",
                joint, JOINTS_PER_HAND
            )));
        }

        match self.region {
            RegionMode::Fixed(proportions) => proportions.validate(),
            RegionMode::Explicit(region) => region.validated().map(|_| ()),
            RegionMode::Interactive => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chord::ChordShape;

    #[test]
    fn test_default_config_is_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid, Grid { strings: 6, frets: 4 });
        assert_eq!(config.fingertips, vec![8, 12, 16, 20]);
        assert_eq!(config.chords.len(), 6);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "grid:\n  strings: 4\n  frets: 5\nregion:\n  mode: interactive\nchords:\n  - name: Ukulele C\n    cells: [[1, 3]]\n";
        let config: SessionConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.grid, Grid { strings: 4, frets: 5 });
        assert_eq!(config.region, RegionMode::Interactive);
        assert_eq!(config.orientation, Orientation::StringsTopDown);
        assert!(config.mirror);
        assert_eq!(config.chords.chords()[0], ChordShape::new("Ukulele C", &[(1, 3)]));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_region_mode_tags() {
        let fixed: RegionMode =
            serde_json::from_str(r#"{"mode":"fixed","x":0.2,"y":0.5,"width":0.5,"height":0.25}"#)
                .unwrap();
        assert_eq!(
            fixed,
            RegionMode::Fixed(Proportions { x: 0.2, y: 0.5, width: 0.5, height: 0.25 })
        );

        let explicit: RegionMode =
            serde_json::from_str(r#"{"mode":"explicit","x1":20,"y1":50,"x2":80,"y2":200}"#)
                .unwrap();
        assert_eq!(
            explicit,
            RegionMode::Explicit(Region { x1: 20.0, y1: 50.0, x2: 80.0, y2: 200.0 })
        );
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let config = SessionConfig { detection_confidence: 1.5, ..Default::default() };
        assert!(matches!(
            config.validate(),
            Err(FretcamError::InvalidConfidence { name: "detection", .. })
        ));

        let config = SessionConfig { fingertips: vec![8, 21], ..Default::default() };
        assert!(config.validate().is_err());

        let config = SessionConfig {
            region: RegionMode::Fixed(Proportions { x: 0.8, y: 0.1, width: 0.4, height: 0.1 }),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SessionConfig {
            region: RegionMode::Explicit(Region { x1: 5.0, y1: 5.0, x2: 5.0, y2: 9.0 }),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SessionConfig { grid: Grid { strings: 0, frets: 4 }, ..Default::default() };
        assert!(matches!(config.validate(), Err(FretcamError::InvalidGrid { .. })));
    }
}
