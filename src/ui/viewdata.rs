//! Frame data handed from the tick worker to the UI thread.
//!
//! Everything the renderer needs is flattened into plain values here; the
//! UI never touches the aggregator or the lattice directly.

use crate::core::lattice::{Lattice, TileVariant};

#[derive(Clone, Debug, PartialEq)]
pub enum TileKind {
    Main,
    Up,
    Down,
}

impl From<TileVariant> for TileKind {
    fn from(v: TileVariant) -> Self {
        match v {
            TileVariant::Main => TileKind::Main,
            TileVariant::Up => TileKind::Up,
            TileVariant::Down => TileKind::Down,
        }
    }
}

/// One tile, ready to draw.
#[derive(Clone, Debug)]
pub struct TileView {
    pub row: usize,
    pub col: usize,
    pub kind: TileKind,
    pub label: String,
    pub cents: f64,
    pub note: f64,
    pub top: f64,
    pub bass: f64,
    /// MIDI values of the fully-held matching pitches, ascending.
    pub held_midi: Vec<f64>,
}

#[derive(Clone, Debug, Default)]
pub struct UiFrame {
    pub rows: usize,
    pub cols: usize,
    pub tiles: Vec<TileView>,
    pub held_count: usize,
    pub tick: u64,
    pub midi_port: Option<String>,
}

impl UiFrame {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_lattice(
        lattice: &Lattice,
        held_count: usize,
        tick: u64,
        midi_port: Option<String>,
    ) -> Self {
        let tiles = lattice
            .tiles
            .iter()
            .map(|t| TileView {
                row: t.row,
                col: t.col,
                kind: t.variant.into(),
                label: t.name.label(),
                cents: t.class.cents(),
                note: t.intensity.note,
                top: t.intensity.top,
                bass: t.intensity.bass,
                held_midi: t.held.iter().map(|p| p.midi).collect(),
            })
            .collect();
        Self {
            rows: lattice.params().rows,
            cols: lattice.params().cols,
            tiles,
            held_count,
            tick,
            midi_port,
        }
    }
}
