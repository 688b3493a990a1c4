// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! The window runs a single cooperative loop: every repaint reads one frame,
//! then either feeds the calibration preview or runs detection and draws the
//! fretboard overlay. Any frame or detector failure ends the session.

use crate::calibration::{self, Calibrator};
use crate::detector::ChordDetector;
use crate::io::landmarks::LandmarkSource;
use crate::io::media::{self, Frame, FrameSource};
use crate::io::serialization;
use crate::models::fretboard::{Fretboard, Region};
use crate::models::session::{RegionMode, SessionConfig};
use crate::ui::{canvas, chord_panel, overlay, status};
use anyhow::Result;
use std::path::PathBuf;

/// Where the session is in its lifecycle.
enum Phase {
    /// Operator is dragging out the fretboard region.
    Calibrating(Calibrator),
    /// Region confirmed; detecting chords every frame.
    Playing(ChordDetector),
    /// Session over; the window is closing.
    Stopped,
}

/// What the keyboard asks for this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyCommand {
    None,
    /// End the whole session. During calibration this does not fall back
    /// to a default region.
    Quit,
    /// Commit the dragged region.
    Confirm,
}

/// Escape quits from any phase; Enter only means something while calibrating.
fn key_command(phase: &Phase, escape: bool, enter: bool) -> KeyCommand {
    match phase {
        Phase::Stopped => KeyCommand::None,
        _ if escape => KeyCommand::Quit,
        Phase::Calibrating(_) if enter => KeyCommand::Confirm,
        _ => KeyCommand::None,
    }
}

/// Main application state.
pub struct FretcamApp {
    frames: Box<dyn FrameSource>,
    landmarks: Box<dyn LandmarkSource>,
    config: SessionConfig,
    phase: Phase,

    /// Where to write the configuration once calibration is confirmed
    save_calibration: Option<PathBuf>,

    /// Texture holding the latest frame
    texture: Option<egui::TextureHandle>,

    /// Overlay for the latest frame
    primitives: Vec<overlay::Primitive>,

    /// Chord detected in the latest frame
    chord: Option<String>,

    frame_count: u64,
}

impl FretcamApp {
    /// Create the application, resolving the region unless it must be dragged out.
    pub fn new(
        frames: Box<dyn FrameSource>,
        landmarks: Box<dyn LandmarkSource>,
        config: SessionConfig,
        save_calibration: Option<PathBuf>,
    ) -> Result<Self> {
        let frame_size = frames.dimensions();
        let phase = match calibration::resolve(config.region, frame_size)? {
            Some(region) => {
                log::info!("Fretboard region fixed at {:?}", region);
                Phase::Playing(Self::detector(&config, region, frame_size)?)
            }
            None => {
                log::info!("Waiting for interactive calibration");
                Phase::Calibrating(Calibrator::new(frame_size))
            }
        };

        Ok(Self {
            frames,
            landmarks,
            config,
            phase,
            save_calibration,
            texture: None,
            primitives: Vec::new(),
            chord: None,
            frame_count: 0,
        })
    }

    fn detector(config: &SessionConfig, region: Region, frame_size: (u32, u32)) -> Result<ChordDetector> {
        let fretboard = Fretboard::new(region, config.grid, config.orientation)?;
        Ok(ChordDetector::new(
            fretboard,
            config.chords.clone(),
            config.fingertips.clone(),
            frame_size,
        ))
    }

    /// End the session and ask the window to close.
    fn stop(&mut self, ctx: &egui::Context) {
        self.phase = Phase::Stopped;
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    /// Read the next frame, mirrored if configured.
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let Some(mut frame) = self.frames.read()? else {
            return Ok(None);
        };
        if self.config.mirror {
            media::mirror(&mut frame);
        }
        self.frame_count += 1;
        Ok(Some(frame))
    }

    /// Upload a frame into the display texture.
    fn show_frame(&mut self, ctx: &egui::Context, frame: &Frame) {
        let size = [frame.width() as usize, frame.height() as usize];
        let image = egui::ColorImage::from_rgba_unmultiplied(size, frame.as_raw());
        match self.texture {
            Some(ref mut texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture("frame", image, egui::TextureOptions::LINEAR));
            }
        }
    }

    /// Hand the confirmed region over to a new detector.
    fn finish_calibration(&mut self) -> Result<()> {
        let calibrator = match std::mem::replace(&mut self.phase, Phase::Stopped) {
            Phase::Calibrating(calibrator) if calibrator.can_confirm() => calibrator,
            other => {
                self.phase = other;
                return Ok(());
            }
        };

        let region = calibrator.confirm()?;
        log::info!("Calibration confirmed: {:?}", region);

        if let Some(ref path) = self.save_calibration {
            let saved = SessionConfig {
                region: RegionMode::Explicit(region),
                ..self.config.clone()
            };
            if let Err(e) = serialization::export_config(&saved, path) {
                log::warn!("Could not save calibration: {:#}", e);
            }
        }

        self.phase = Phase::Playing(Self::detector(&self.config, region, self.frames.dimensions())?);
        Ok(())
    }

    fn status_text(&self) -> &'static str {
        match self.phase {
            Phase::Calibrating(_) => "Calibrating",
            Phase::Playing(_) => "Playing",
            Phase::Stopped => "Stopped",
        }
    }

    fn region(&self) -> Option<Region> {
        match &self.phase {
            Phase::Calibrating(calibrator) => calibrator.rectangle(),
            Phase::Playing(detector) => Some(detector.fretboard().region()),
            Phase::Stopped => None,
        }
    }

    /// Process one frame for the current phase.
    fn step(&mut self, ctx: &egui::Context) -> Result<()> {
        if matches!(self.phase, Phase::Stopped) {
            return Ok(());
        }

        let Some(frame) = self.next_frame()? else {
            log::info!("Frame source ended");
            self.stop(ctx);
            return Ok(());
        };
        self.show_frame(ctx, &frame);

        match self.phase {
            Phase::Calibrating(ref calibrator) => {
                self.primitives = overlay::calibration(calibrator);
            }
            Phase::Playing(ref mut detector) => {
                let hands = self.landmarks.detect(&frame)?;
                let detection = detector.observe(&hands);

                let mut primitives = overlay::fretboard(detector.fretboard());
                primitives.extend(overlay::fingertips(&detection.observation));
                primitives.push(overlay::chord_label(&detection.label));
                self.primitives = primitives;
                self.chord = Some(detection.label);
            }
            Phase::Stopped => {}
        }
        Ok(())
    }

    fn handle_keys(&mut self, ctx: &egui::Context) -> Result<()> {
        let (escape, enter) = ctx.input(|i| {
            (i.key_pressed(egui::Key::Escape), i.key_pressed(egui::Key::Enter))
        });

        match key_command(&self.phase, escape, enter) {
            KeyCommand::Quit => {
                if matches!(self.phase, Phase::Calibrating(_)) {
                    log::info!("Calibration aborted");
                }
                self.stop(ctx);
            }
            KeyCommand::Confirm => self.finish_calibration()?,
            KeyCommand::None => {}
        }
        Ok(())
    }

    fn handle_canvas(&mut self, action: canvas::CanvasAction) {
        let Phase::Calibrating(ref mut calibrator) = self.phase else {
            return;
        };
        match action {
            canvas::CanvasAction::DragStarted(p) => calibrator.press(p),
            canvas::CanvasAction::Dragged(p) => calibrator.drag(p),
            canvas::CanvasAction::DragStopped(p) => calibrator.release(p),
            canvas::CanvasAction::None => {}
        }
    }
}

impl eframe::App for FretcamApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Err(e) = self.handle_keys(ctx).and_then(|_| self.step(ctx)) {
            log::error!("Session ended: {:#}", e);
            self.stop(ctx);
        }

        // Status bar (bottom)
        let status = status::Status {
            phase: self.status_text(),
            frame_size: self.frames.dimensions(),
            region: self.region(),
            orientation: self.config.orientation,
            frames: self.frame_count,
        };
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            status::show(ui, &status);
        });

        // Chord table (right side)
        egui::SidePanel::right("chords")
            .default_width(200.0)
            .show(ctx, |ui| {
                chord_panel::show(ui, &self.config.chords, self.chord.as_deref());
            });

        // Main canvas (center)
        let frame_size = self.frames.dimensions();
        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| canvas::show(ui, &self.texture, frame_size, &self.primitives))
            .inner;
        self.handle_canvas(canvas_action);

        // Poll the next frame straight away
        if !matches!(self.phase, Phase::Stopped) {
            ctx.request_repaint();
        }
    }
}

impl Drop for FretcamApp {
    fn drop(&mut self) {
        log::info!("Session ended after {} frames", self.frame_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chord::ChordTable;
    use crate::models::fretboard::{Grid, Orientation};

    fn playing() -> Phase {
        let region = Region { x1: 0.0, y1: 0.0, x2: 400.0, y2: 600.0 };
        let fretboard =
            Fretboard::new(region, Grid::default(), Orientation::StringsTopDown).unwrap();
        Phase::Playing(ChordDetector::new(
            fretboard,
            ChordTable::open_chords(),
            Vec::new(),
            (600, 600),
        ))
    }

    #[test]
    fn test_escape_during_calibration_quits() {
        let calibrating = Phase::Calibrating(Calibrator::new((640, 480)));
        assert_eq!(key_command(&calibrating, true, false), KeyCommand::Quit);
        // Escape wins over a simultaneous Enter
        assert_eq!(key_command(&calibrating, true, true), KeyCommand::Quit);
        assert_eq!(key_command(&calibrating, false, true), KeyCommand::Confirm);
        assert_eq!(key_command(&calibrating, false, false), KeyCommand::None);
    }

    #[test]
    fn test_keys_while_playing_and_stopped() {
        let playing = playing();
        assert_eq!(key_command(&playing, true, false), KeyCommand::Quit);
        assert_eq!(key_command(&playing, false, true), KeyCommand::None);
        assert_eq!(key_command(&Phase::Stopped, true, true), KeyCommand::None);
    }
}
