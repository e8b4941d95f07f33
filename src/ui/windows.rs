//! egui rendering of the tile grid. Pure consumer of [`UiFrame`].

use egui::{Align2, CentralPanel, Color32, CornerRadius, FontId, Rect, TopBottomPanel, pos2, vec2};

use crate::ui::viewdata::{TileKind, UiFrame};

const CELL: f32 = 70.0;
const SUBCELL: f32 = 24.0;
const MARGIN: f32 = 10.0;

/// === Main window ===
pub fn main_window(ctx: &egui::Context, frame: &UiFrame) {
    TopBottomPanel::top("top").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading("Tonnetz Lens");
            match &frame.midi_port {
                Some(port) => ui.label(format!("MIDI: {port}")),
                None => ui.label("MIDI: (no input)"),
            };
            ui.label(format!("{} held", frame.held_count));
        });
    });

    CentralPanel::default().show(ctx, |ui| {
        let origin = ui.min_rect().min;
        let painter = ui.painter();
        for tile in &frame.tiles {
            let cell = pos2(
                origin.x + MARGIN + tile.col as f32 * CELL,
                origin.y + MARGIN + tile.row as f32 * CELL,
            );
            let rect = match tile.kind {
                TileKind::Main => Rect::from_min_size(cell, vec2(CELL, CELL)),
                TileKind::Up => {
                    Rect::from_min_size(cell + vec2(CELL - SUBCELL, 0.0), vec2(SUBCELL, SUBCELL))
                }
                TileKind::Down => Rect::from_min_size(
                    cell + vec2(CELL - SUBCELL, CELL - SUBCELL),
                    vec2(SUBCELL, SUBCELL),
                ),
            };
            painter.rect_filled(rect, CornerRadius::same(2), tile_color(tile.note));
            painter.rect_stroke(
                rect,
                CornerRadius::same(2),
                (1.0, marker_color(tile.top, tile.bass)),
                egui::StrokeKind::Inside,
            );
            if matches!(tile.kind, TileKind::Main) {
                painter.text(
                    rect.center() - vec2(0.0, 10.0),
                    Align2::CENTER_CENTER,
                    &tile.label,
                    FontId::proportional(18.0),
                    Color32::WHITE,
                );
                painter.text(
                    rect.center() + vec2(0.0, 14.0),
                    Align2::CENTER_CENTER,
                    format!("{:.0}c", tile.cents),
                    FontId::proportional(11.0),
                    Color32::GRAY,
                );
                if tile.held_midi.len() > 1 {
                    painter.text(
                        rect.left_top() + vec2(4.0, 4.0),
                        Align2::LEFT_TOP,
                        format!("{}", tile.held_midi.len()),
                        FontId::proportional(10.0),
                        Color32::LIGHT_GRAY,
                    );
                }
            }
        }
    });
}

/// Note intensity maps to brightness; idle tiles stay near-black.
fn tile_color(note: f64) -> Color32 {
    let v = (note.clamp(0.0, 1.0) * 200.0) as u8;
    Color32::from_rgb(v / 4, v / 2, 40 + v / 2)
}

/// Border tint: top marker leans green, bass marker leans red.
fn marker_color(top: f64, bass: f64) -> Color32 {
    let g = 60 + (top.clamp(0.0, 1.0) * 195.0) as u8;
    let r = 60 + (bass.clamp(0.0, 1.0) * 195.0) as u8;
    Color32::from_rgb(r, g, 70)
}
