// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Status bar below the canvas.

use crate::models::fretboard::{Orientation, Region};

/// What the status bar reports for the current frame.
pub struct Status<'a> {
    pub phase: &'a str,
    pub frame_size: (u32, u32),
    pub region: Option<Region>,
    pub orientation: Orientation,
    pub frames: u64,
}

fn region_text(region: Option<Region>) -> String {
    match region {
        Some(r) => format!("({:.0}, {:.0})-({:.0}, {:.0})", r.x1, r.y1, r.x2, r.y2),
        None => "not set".to_string(),
    }
}

/// Display the status bar.
pub fn show(ui: &mut egui::Ui, status: &Status) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label(status.phase);
        ui.separator();
        ui.label(format!("{}x{}", status.frame_size.0, status.frame_size.1));
        ui.separator();
        ui.label(format!("Region: {}", region_text(status.region)));
        ui.separator();
        ui.label(format!("{:?}", status.orientation));
        ui.separator();
        ui.label(format!("Frame {}", status.frames));
        ui.separator();
        ui.label(egui::RichText::new("Esc to quit").italics().weak());
    });
}
