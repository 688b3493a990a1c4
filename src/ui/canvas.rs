// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for the live frame and its overlay.
//!
//! The frame is scaled to fit the available space and centred. Overlay
//! primitives arrive in frame pixel coordinates and are mapped onto the
//! displayed image; pointer drags are mapped back the other way.

use super::overlay::{Primitive, Rgb};
use crate::models::fretboard::Point;

/// Result of canvas interaction, in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasAction {
    None,
    DragStarted(Point),
    Dragged(Point),
    DragStopped(Point),
}

/// Screen placement of the displayed frame.
#[derive(Debug, Clone, Copy)]
struct Placement {
    rect: egui::Rect,
    scale: f32,
}

impl Placement {
    fn to_screen(&self, p: Point) -> egui::Pos2 {
        egui::pos2(
            self.rect.min.x + p.x * self.scale,
            self.rect.min.y + p.y * self.scale,
        )
    }

    fn to_frame(&self, pos: egui::Pos2) -> Point {
        Point::new(
            (pos.x - self.rect.min.x) / self.scale,
            (pos.y - self.rect.min.y) / self.scale,
        )
    }
}

/// Drag state of the canvas for one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Drag {
    Idle,
    /// Carries where the button went down.
    Started(Option<egui::Pos2>),
    Moved,
    Stopped,
}

/// Map a drag to frame coordinates.
///
/// egui only reports a drag once the pointer has moved past its threshold,
/// so the anchor comes from the press origin rather than the current pointer.
fn drag_action(placement: &Placement, drag: Drag, pointer: Option<egui::Pos2>) -> CanvasAction {
    match drag {
        Drag::Idle => CanvasAction::None,
        Drag::Started(origin) => origin
            .or(pointer)
            .map_or(CanvasAction::None, |pos| CanvasAction::DragStarted(placement.to_frame(pos))),
        Drag::Moved => pointer
            .map_or(CanvasAction::None, |pos| CanvasAction::Dragged(placement.to_frame(pos))),
        Drag::Stopped => pointer
            .map_or(CanvasAction::None, |pos| CanvasAction::DragStopped(placement.to_frame(pos))),
    }
}

fn color(rgb: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

/// Display the frame with its overlay and report pointer drags.
pub fn show(
    ui: &mut egui::Ui,
    texture: &Option<egui::TextureHandle>,
    frame_size: (u32, u32),
    primitives: &[Primitive],
) -> CanvasAction {
    let mut action = CanvasAction::None;
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        let Some(texture) = texture else {
            ui.centered_and_justified(|ui| {
                ui.label(egui::RichText::new("Waiting for camera...").color(egui::Color32::WHITE));
            });
            return;
        };

        // Fit the frame inside the available space, keeping its aspect ratio
        let available = ui.available_size();
        let (img_width, img_height) = (frame_size.0 as f32, frame_size.1 as f32);
        let scale = (available.x / img_width).min(available.y / img_height);
        let display = egui::vec2(img_width * scale, img_height * scale);
        let offset = (available - display) / 2.0;

        let placement = Placement {
            rect: egui::Rect::from_min_size(ui.min_rect().min + offset, display),
            scale,
        };

        ui.painter().image(
            texture.id(),
            placement.rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        let response = ui.allocate_rect(placement.rect, egui::Sense::drag());
        // The release frame may no longer carry an interaction position
        let pointer = response
            .interact_pointer_pos()
            .or_else(|| ui.input(|i| i.pointer.interact_pos()));
        let drag = if response.drag_started() {
            Drag::Started(ui.input(|i| i.pointer.press_origin()))
        } else if response.drag_stopped() {
            Drag::Stopped
        } else if response.dragged() {
            Drag::Moved
        } else {
            Drag::Idle
        };
        action = drag_action(&placement, drag, pointer);

        let painter = ui.painter();
        for primitive in primitives {
            paint(painter, &placement, primitive);
        }
    });

    action
}

fn paint(painter: &egui::Painter, placement: &Placement, primitive: &Primitive) {
    match primitive {
        Primitive::Line { from, to, color: rgb, width } => {
            painter.line_segment(
                [placement.to_screen(*from), placement.to_screen(*to)],
                egui::Stroke::new(*width, color(*rgb)),
            );
        }
        Primitive::Circle { center, radius, color: rgb } => {
            painter.circle_filled(
                placement.to_screen(*center),
                radius * placement.scale,
                color(*rgb),
            );
        }
        Primitive::Rect { region, color: rgb, width } => {
            let rect = egui::Rect::from_min_max(
                placement.to_screen(Point::new(region.x1, region.y1)),
                placement.to_screen(Point::new(region.x2, region.y2)),
            );
            painter.rect_stroke(rect, 0.0, egui::Stroke::new(*width, color(*rgb)));
        }
        Primitive::Text { position, text, color: rgb, size } => {
            painter.text(
                placement.to_screen(*position),
                egui::Align2::LEFT_BOTTOM,
                text,
                egui::FontId::proportional(size * placement.scale.max(0.5)),
                color(*rgb),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_roundtrip() {
        let placement = Placement {
            rect: egui::Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(320.0, 240.0)),
            scale: 0.5,
        };
        let p = Point::new(100.0, 60.0);
        let screen = placement.to_screen(p);
        assert_eq!(screen, egui::pos2(60.0, 50.0));

        let back = placement.to_frame(screen);
        assert!((back.x - p.x).abs() < 1e-4);
        assert!((back.y - p.y).abs() < 1e-4);
    }

    #[test]
    fn test_drag_starts_at_press_origin() {
        let placement = Placement {
            rect: egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(640.0, 480.0)),
            scale: 1.0,
        };
        let origin = Some(egui::pos2(100.0, 200.0));
        let pointer = Some(egui::pos2(106.0, 203.0));

        assert_eq!(
            drag_action(&placement, Drag::Started(origin), pointer),
            CanvasAction::DragStarted(Point::new(100.0, 200.0))
        );
        assert_eq!(
            drag_action(&placement, Drag::Started(None), pointer),
            CanvasAction::DragStarted(Point::new(106.0, 203.0))
        );
        assert_eq!(
            drag_action(&placement, Drag::Moved, pointer),
            CanvasAction::Dragged(Point::new(106.0, 203.0))
        );
        assert_eq!(
            drag_action(&placement, Drag::Stopped, None),
            CanvasAction::None
        );
        assert_eq!(drag_action(&placement, Drag::Idle, pointer), CanvasAction::None);
    }
}
