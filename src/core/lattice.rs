//! Tonnetz lattice of pitch-class tiles.
//!
//! Each tile sits at integer generator coordinates `(g3, g5)`, counts of
//! tempered fifths and thirds, plus an integer offset pair for the
//! enharmonic-neighbor variants (factor-7 / factor-11 shifts). From the
//! current [`TuningInfo`] a tile derives its pitch class and a spelled name
//! (letter, accidentals, comma marks); each frame it folds the shared pitch
//! state into one intensity triple.

use crate::core::pitch::{EPSILON, Pitch, PitchClass};
use crate::core::pitch_state::PitchInfo;
use crate::core::tuning::TuningInfo;

/// The seven letter names ordered by ascending fifths.
pub const LETTER_CYCLE: [char; 7] = ['F', 'C', 'G', 'D', 'A', 'E', 'B'];

/// Accidental or comma runs longer than this switch from repeated glyphs to
/// a glyph-plus-count form ("###" would be "#3").
const MAX_GLYPH_RUN: i32 = 2;

/// Lattice geometry and naming parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatticeParams {
    pub rows: usize,
    pub cols: usize,
    /// Factor-5 (horizontal) lattice offset.
    pub offset_x: i32,
    /// Factor-3 (vertical) lattice offset.
    pub offset_y: i32,
    /// Factor-7 offset applied to every tile (the ± variants add to it).
    pub offset_z: i32,
    /// Pitch-class match window in semitones.
    pub tolerance: f64,
    /// Position of the `(0, 0)` tile in the letter cycle; 1 anchors on C.
    pub anchor_offset: i32,
    /// Fifths spanned by one factor-5 step in the letter cycle. 4 in the
    /// standard diatonic mapping; configurable for other topologies.
    pub letter_span: i32,
}

impl Default for LatticeParams {
    fn default() -> Self {
        Self {
            rows: 13,
            cols: 9,
            offset_x: 0,
            offset_y: 0,
            offset_z: 0,
            tolerance: 0.05,
            anchor_offset: 1,
            letter_span: 4,
        }
    }
}

/// Which of the three per-cell tiles this is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileVariant {
    Main,
    /// Enharmonic neighbor one factor-7 step up.
    Up,
    /// Enharmonic neighbor one factor-7 step down.
    Down,
}

/// Spelled tile name: letter, accidental run, comma run.
#[derive(Clone, Debug, PartialEq)]
pub struct TileName {
    pub letter: char,
    pub accidentals: String,
    pub comma: String,
}

impl TileName {
    pub fn label(&self) -> String {
        format!("{}{}{}", self.letter, self.accidentals, self.comma)
    }
}

/// Aggregated per-tile intensities for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TileIntensity {
    pub note: f64,
    pub top: f64,
    pub bass: f64,
}

#[derive(Clone, Debug)]
pub struct Tile {
    pub g3: i32,
    pub g5: i32,
    /// `(o7, o11)` factor offsets; `(0, 0)` for plain tiles.
    pub offset: (i32, i32),
    pub variant: TileVariant,
    pub row: usize,
    pub col: usize,
    pub class: PitchClass,
    pub name: TileName,
    pub tolerance: f64,
    pub intensity: TileIntensity,
    /// Fully-held pitches matching this tile, ascending, for stack display.
    pub held: Vec<Pitch>,
}

impl Tile {
    pub fn new(
        g3: i32,
        g5: i32,
        offset: (i32, i32),
        variant: TileVariant,
        row: usize,
        col: usize,
        tuning: &TuningInfo,
        params: &LatticeParams,
    ) -> Self {
        let mut tile = Self {
            g3,
            g5,
            offset,
            variant,
            row,
            col,
            class: PitchClass::default(),
            name: TileName {
                letter: 'C',
                accidentals: String::new(),
                comma: String::new(),
            },
            tolerance: params.tolerance,
            intensity: TileIntensity::default(),
            held: Vec::new(),
        };
        tile.retune(tuning, params);
        tile
    }

    /// Recompute every tuning-dependent field. The only mutation path for a
    /// tile besides per-frame intensity aggregation.
    pub fn retune(&mut self, tuning: &TuningInfo, params: &LatticeParams) {
        let (o7, o11) = self.offset;
        let semis = f64::from(self.g3) * tuning.semis_factor3()
            + f64::from(self.g5) * tuning.semis_factor5()
            + f64::from(o7) * tuning.semis_factor7()
            + f64::from(o11) * tuning.semis_factor11();
        self.class = PitchClass::from_pitch(Pitch::new(semis));
        self.name = derive_name(self.g3, self.g5, tuning, params);
        self.tolerance = params.tolerance;
    }

    /// Fold the frame's pitch state into this tile: max over every pitch
    /// matching the tile's class within its tolerance, plus the sorted list
    /// of fully-held matches. Empty input leaves an all-zero aggregate.
    pub fn update_intensities(&mut self, pitch_state: &[(Pitch, PitchInfo)]) {
        let mut agg = TileIntensity::default();
        self.held.clear();
        for &(pitch, info) in pitch_state {
            if !self.class.matches(pitch, self.tolerance) {
                continue;
            }
            agg.note = agg.note.max(info.note);
            agg.top = agg.top.max(info.top);
            agg.bass = agg.bass.max(info.bass);
            if info.note == 1.0 {
                self.held.push(pitch);
            }
        }
        self.held.sort_by(|a, b| a.total_cmp(b));
        self.intensity = agg;
    }
}

/// Letter index and signed accidental count for a position on the chain of
/// fifths. Euclidean division keeps both sign-correct for negative input.
fn spell(num_generators: i32) -> (char, i32) {
    let letter = LETTER_CYCLE[num_generators.rem_euclid(7) as usize];
    let accidentals = num_generators.div_euclid(7);
    (letter, accidentals)
}

/// Render a signed count as a glyph run: up to two glyphs verbatim, then a
/// single glyph with a decimal count ("b", "bb", "b3", ...).
fn glyph_run(positive: char, negative: char, count: i32) -> String {
    let glyph = if count >= 0 { positive } else { negative };
    let magnitude = count.abs();
    if magnitude == 0 {
        String::new()
    } else if magnitude <= MAX_GLYPH_RUN {
        std::iter::repeat(glyph).take(magnitude as usize).collect()
    } else {
        format!("{glyph}{magnitude}")
    }
}

fn derive_name(g3: i32, g5: i32, tuning: &TuningInfo, params: &LatticeParams) -> TileName {
    let num_generators = params.anchor_offset + g3 + params.letter_span * g5;
    let (letter, accidental_count) = spell(num_generators);

    // When the factor-5 interval diverges from what the fifth chain would
    // generate, each factor-5 step carries one comma of residual.
    let generated = tuning.generated_factor5_semis(params.letter_span);
    let residual = tuning.semis_factor5() - generated;
    let comma_count = if residual.abs() > EPSILON && g5 != 0 {
        if residual > 0.0 { g5 } else { -g5 }
    } else {
        0
    };

    TileName {
        letter,
        accidentals: glyph_run('#', 'b', accidental_count),
        comma: glyph_run('+', '-', comma_count),
    }
}

/// The tile container. Rebuilt when the grid geometry changes, retuned in
/// place when only the tuning changes.
#[derive(Debug, Clone)]
pub struct Lattice {
    params: LatticeParams,
    tuning: TuningInfo,
    pub tiles: Vec<Tile>,
}

impl Lattice {
    pub fn new(tuning: TuningInfo, params: LatticeParams) -> Self {
        let tiles = build_tiles(&tuning, &params);
        Self {
            params,
            tuning,
            tiles,
        }
    }

    pub fn params(&self) -> &LatticeParams {
        &self.params
    }

    pub fn tuning(&self) -> &TuningInfo {
        &self.tuning
    }

    /// Swap in a new tuning; every tile recomputes its class and name.
    pub fn retune(&mut self, tuning: TuningInfo) {
        self.tuning = tuning;
        for tile in &mut self.tiles {
            tile.retune(&self.tuning, &self.params);
        }
    }

    /// Replace the geometry/naming parameters; tiles are rebuilt, not
    /// mutated.
    pub fn set_params(&mut self, params: LatticeParams) {
        self.params = params;
        self.tiles = build_tiles(&self.tuning, &self.params);
    }

    /// Per-frame pass: every tile aggregates the shared pitch state.
    /// Read-only over the snapshot; tiles never touch shared state.
    pub fn update(&mut self, pitch_state: &[(Pitch, PitchInfo)]) {
        for tile in &mut self.tiles {
            tile.update_intensities(pitch_state);
        }
    }
}

fn build_tiles(tuning: &TuningInfo, params: &LatticeParams) -> Vec<Tile> {
    let mut tiles = Vec::with_capacity(params.rows * params.cols * 3);
    let row_center = (params.rows / 2) as i32;
    let col_center = (params.cols / 2) as i32;
    for row in 0..params.rows {
        for col in 0..params.cols {
            // Fifths grow upward, thirds grow rightward.
            let g3 = -(row as i32 - row_center) + params.offset_y;
            let g5 = (col as i32 - col_center) + params.offset_x;
            for (variant, o7) in [
                (TileVariant::Main, 0),
                (TileVariant::Up, 1),
                (TileVariant::Down, -1),
            ] {
                tiles.push(Tile::new(
                    g3,
                    g5,
                    (params.offset_z + o7, 0),
                    variant,
                    row,
                    col,
                    tuning,
                    params,
                ));
            }
        }
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spell_walks_the_fifth_chain() {
        // 0..=6 are the naturals F C G D A E B.
        assert_eq!(spell(0), ('F', 0));
        assert_eq!(spell(1), ('C', 0));
        assert_eq!(spell(6), ('B', 0));
        // One cycle up: sharps.
        assert_eq!(spell(7), ('F', 1));
        assert_eq!(spell(13), ('B', 1));
        // Below zero: flats, sign-aware.
        assert_eq!(spell(-1), ('B', -1));
        assert_eq!(spell(-7), ('F', -1));
        assert_eq!(spell(-8), ('B', -2));
    }

    #[test]
    fn glyph_run_switches_to_numeral_past_two() {
        assert_eq!(glyph_run('#', 'b', 0), "");
        assert_eq!(glyph_run('#', 'b', 1), "#");
        assert_eq!(glyph_run('#', 'b', 2), "##");
        assert_eq!(glyph_run('#', 'b', 3), "#3");
        assert_eq!(glyph_run('#', 'b', -1), "b");
        assert_eq!(glyph_run('#', 'b', -2), "bb");
        assert_eq!(glyph_run('#', 'b', -5), "b5");
    }

    #[test]
    fn origin_tile_is_c_natural_in_twelve_tet() {
        let params = LatticeParams::default();
        let name = derive_name(0, 0, &TuningInfo::twelve_tet(), &params);
        assert_eq!(name.letter, 'C');
        assert_eq!(name.accidentals, "");
        assert_eq!(name.comma, "");
    }

    #[test]
    fn twelve_tet_has_no_comma_marks() {
        let params = LatticeParams::default();
        let tuning = TuningInfo::twelve_tet();
        for g5 in -3..=3 {
            let name = derive_name(0, g5, &tuning, &params);
            assert_eq!(name.comma, "", "g5={g5}");
        }
    }
}
