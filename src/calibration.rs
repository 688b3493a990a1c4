// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Region calibration.
//!
//! The fretboard region is either derived from fixed proportions of the frame
//! size, loaded as explicit pixels, or dragged out by the operator on a live
//! preview. The interactive [`Calibrator`] is owned by the calibration phase
//! and hands a validated [`Region`] to the playing phase on confirmation.

use crate::error::FretcamError;
use crate::models::fretboard::{Point, Region};
use crate::models::session::{Proportions, RegionMode};

/// Compute a pixel region from frame proportions.
///
/// Offsets and sizes are truncated to whole pixels, and the far corner is
/// the truncated offset plus the truncated size. The products are taken in
/// `f64` so that 720 * 0.65 lands on 468 rather than just below it.
pub fn fixed_region(proportions: Proportions, frame_size: (u32, u32)) -> Result<Region, FretcamError> {
    proportions.validate()?;
    let (width, height) = (f64::from(frame_size.0), f64::from(frame_size.1));

    let x1 = (width * proportions.x).floor();
    let y1 = (height * proportions.y).floor();
    let x2 = x1 + (width * proportions.width).floor();
    let y2 = y1 + (height * proportions.height).floor();

    Region {
        x1: x1 as f32,
        y1: y1 as f32,
        x2: x2 as f32,
        y2: y2 as f32,
    }
    .validated()
}

/// Resolve a region without operator input.
///
/// Returns `Ok(None)` for [`RegionMode::Interactive`], which needs a
/// [`Calibrator`] session instead.
pub fn resolve(mode: RegionMode, frame_size: (u32, u32)) -> Result<Option<Region>, FretcamError> {
    match mode {
        RegionMode::Fixed(proportions) => fixed_region(proportions, frame_size).map(Some),
        RegionMode::Explicit(region) => region.validated().map(Some),
        RegionMode::Interactive => Ok(None),
    }
}

/// Interactive drag-to-select state.
///
/// Pointer positions are clamped to the frame. A new press discards the
/// previous rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Calibrator {
    frame_size: (u32, u32),
    anchor: Option<Point>,
    cursor: Option<Point>,
    dragging: bool,
}

impl Calibrator {
    pub fn new(frame_size: (u32, u32)) -> Self {
        Self {
            frame_size,
            anchor: None,
            cursor: None,
            dragging: false,
        }
    }

    fn clamp(&self, p: Point) -> Point {
        Point::new(
            p.x.clamp(0.0, self.frame_size.0 as f32),
            p.y.clamp(0.0, self.frame_size.1 as f32),
        )
    }

    /// Start a new drag at `p`.
    pub fn press(&mut self, p: Point) {
        let p = self.clamp(p);
        self.anchor = Some(p);
        self.cursor = Some(p);
        self.dragging = true;
    }

    /// Move the free corner while a drag is in progress.
    pub fn drag(&mut self, p: Point) {
        if self.dragging {
            self.cursor = Some(self.clamp(p));
        }
    }

    /// Finish the drag at `p`. The rectangle stays pending until confirmed.
    pub fn release(&mut self, p: Point) {
        if self.dragging {
            self.cursor = Some(self.clamp(p));
            self.dragging = false;
        }
    }

    /// The live rectangle, normalized, whether or not it is degenerate.
    pub fn rectangle(&self) -> Option<Region> {
        match (self.anchor, self.cursor) {
            (Some(a), Some(b)) => Some(Region::from_corners(a, b)),
            _ => None,
        }
    }

    /// True when [`Calibrator::confirm`] would succeed.
    pub fn can_confirm(&self) -> bool {
        !self.dragging && self.rectangle().is_some_and(|r| r.validated().is_ok())
    }

    /// Commit the current rectangle.
    ///
    /// Consumes the calibrator; on failure the caller keeps its own copy and
    /// can carry on dragging.
    pub fn confirm(self) -> Result<Region, FretcamError> {
        let region = self.rectangle().unwrap_or(Region {
            x1: 0.0,
            y1: 0.0,
            x2: 0.0,
            y2: 0.0,
        });
        region.validated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_region_truncates() {
        let region = fixed_region(Proportions::default(), (640, 480)).unwrap();
        // 640*0.1 = 64, 640*0.4 = 256, 480*0.65 = 312, 480*0.18 = 86.4 -> 86
        assert_eq!(region, Region { x1: 64.0, y1: 312.0, x2: 320.0, y2: 398.0 });
    }

    #[test]
    fn test_fixed_region_common_webcam_sizes() {
        let cases = [
            ((1280, 720), Region { x1: 128.0, y1: 468.0, x2: 640.0, y2: 597.0 }),
            ((1920, 1080), Region { x1: 192.0, y1: 702.0, x2: 960.0, y2: 896.0 }),
            ((320, 240), Region { x1: 32.0, y1: 156.0, x2: 160.0, y2: 199.0 }),
        ];
        for (frame_size, expected) in cases {
            assert_eq!(fixed_region(Proportions::default(), frame_size).unwrap(), expected);
        }
    }

    #[test]
    fn test_fixed_region_too_small_frame() {
        let tiny = Proportions { x: 0.0, y: 0.0, width: 0.1, height: 0.1 };
        assert!(fixed_region(tiny, (5, 5)).is_err());
    }

    #[test]
    fn test_resolve_modes() {
        assert!(resolve(RegionMode::Interactive, (640, 480)).unwrap().is_none());
        let explicit = Region { x1: 1.0, y1: 2.0, x2: 3.0, y2: 4.0 };
        assert_eq!(
            resolve(RegionMode::Explicit(explicit), (640, 480)).unwrap(),
            Some(explicit)
        );
        assert!(resolve(RegionMode::default(), (640, 480)).unwrap().is_some());
    }

    #[test]
    fn test_drag_in_any_direction_is_normalized() {
        let mut calibrator = Calibrator::new((640, 480));
        calibrator.press(Point::new(80.0, 200.0));
        calibrator.drag(Point::new(50.0, 100.0));
        assert!(calibrator.dragging);
        assert!(!calibrator.can_confirm());
        calibrator.release(Point::new(20.0, 50.0));

        assert!(calibrator.can_confirm());
        let region = calibrator.confirm().unwrap();
        assert_eq!(region, Region { x1: 20.0, y1: 50.0, x2: 80.0, y2: 200.0 });
    }

    #[test]
    fn test_live_rectangle_tracks_drag() {
        let mut calibrator = Calibrator::new((640, 480));
        assert_eq!(calibrator.rectangle(), None);
        calibrator.press(Point::new(10.0, 10.0));
        calibrator.drag(Point::new(30.0, 40.0));
        assert_eq!(
            calibrator.rectangle(),
            Some(Region { x1: 10.0, y1: 10.0, x2: 30.0, y2: 40.0 })
        );
    }

    #[test]
    fn test_drag_without_press_is_ignored() {
        let mut calibrator = Calibrator::new((640, 480));
        calibrator.drag(Point::new(30.0, 40.0));
        calibrator.release(Point::new(50.0, 60.0));
        assert_eq!(calibrator.rectangle(), None);
        assert!(calibrator.confirm().is_err());
    }

    #[test]
    fn test_click_without_drag_cannot_confirm() {
        let mut calibrator = Calibrator::new((640, 480));
        calibrator.press(Point::new(30.0, 40.0));
        calibrator.release(Point::new(30.0, 40.0));
        assert!(!calibrator.can_confirm());
        assert!(matches!(
            calibrator.confirm(),
            Err(FretcamError::DegenerateRegion { .. })
        ));
    }

    #[test]
    fn test_new_press_replaces_rectangle_and_clamps() {
        let mut calibrator = Calibrator::new((640, 480));
        calibrator.press(Point::new(10.0, 10.0));
        calibrator.release(Point::new(100.0, 100.0));

        calibrator.press(Point::new(-20.0, 300.0));
        calibrator.release(Point::new(900.0, 500.0));
        assert_eq!(
            calibrator.confirm().unwrap(),
            Region { x1: 0.0, y1: 300.0, x2: 640.0, y2: 480.0 }
        );
    }
}
