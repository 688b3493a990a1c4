// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Chord table panel.
//!
//! Lists every known chord in matching order with the cells it needs,
//! highlighting the chord detected in the current frame.

use crate::models::chord::{ChordShape, ChordTable};

/// Cells of a chord as a compact `S2F1 S4F2 S5F3` string.
pub fn describe(chord: &ChordShape) -> String {
    chord
        .cells
        .iter()
        .map(|cell| cell.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Display the chord table.
pub fn show(ui: &mut egui::Ui, table: &ChordTable, detected: Option<&str>) {
    ui.heading("Chords");
    ui.label(egui::RichText::new("First match in this order wins").italics().weak());
    ui.separator();

    egui::ScrollArea::vertical().show(ui, |ui| {
        for chord in table.chords() {
            let active = detected == Some(chord.name.as_str());
            let name = if active {
                egui::RichText::new(&chord.name)
                    .strong()
                    .color(egui::Color32::from_rgb(0, 255, 0))
            } else {
                egui::RichText::new(&chord.name)
            };
            ui.label(name);
            ui.label(egui::RichText::new(describe(chord)).monospace().weak());
            ui.add_space(4.0);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let table = ChordTable::open_chords();
        assert_eq!(describe(&table.chords()[0]), "S2F1 S4F2 S5F3");
    }
}
