//! Held-note tracking and per-pitch intensity decay.
//!
//! The [`Aggregator`] is the single owner of the shared pitch state: which
//! pitches are currently held, and a decaying [`PitchInfo`] per pitch that
//! drives the tile visuals. Note events mutate it from the MIDI callback
//! thread, the 60 Hz tick steps it from the worker thread; both run under
//! one mutex (see `app`), the aggregator itself is lock-free and total.

use std::collections::{BTreeMap, HashMap};

use crate::core::pitch::{EPSILON, Pitch, PitchKey};

/// Tick rate of the decay clock.
pub const TICK_HZ: f64 = 60.0;
/// Per-tick decay of `note` intensity once a pitch is released.
pub const NOTE_DECAY_PER_TICK: f64 = 0.01;
/// Per-tick step of the `top`/`bass` markers toward their target.
pub const MARKER_STEP_PER_TICK: f64 = 0.15;

/// Stable identity of one physical note across its lifetime.
pub type NoteId = u64;

/// Three independent intensities in `[0, 1]` for one pitch.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PitchInfo {
    /// Is this exact pitch sounding (1.0 while held, then decaying).
    pub note: f64,
    /// Is this pitch the highest currently-held note.
    pub top: f64,
    /// Is this pitch the lowest currently-held note.
    pub bass: f64,
}

/// Tracks live note identities, the held-pitch set, and the decaying
/// per-pitch state. Keys are quantized pitches ([`PitchKey`]); several MPE
/// note identities may share one key (unisons across channels), and the key
/// stays held while at least one of them is alive.
#[derive(Debug, Default)]
pub struct Aggregator {
    ids: HashMap<NoteId, PitchKey>,
    held: BTreeMap<PitchKey, usize>,
    infos: BTreeMap<PitchKey, PitchInfo>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A note started sounding at `pitch`.
    pub fn note_on(&mut self, id: NoteId, pitch: Pitch) {
        let key = pitch.key();
        if let Some(old) = self.ids.insert(id, key) {
            // Retrigger of a live identity: its previous pitch is gone.
            if old != key {
                self.release_key(old);
                self.hold_key(key);
            }
        } else {
            self.hold_key(key);
        }
        self.sound(key);
    }

    /// A live note glided to a new pitch (per-note pitch bend).
    pub fn note_bend(&mut self, id: NoteId, pitch: Pitch) {
        // An update for an identity we never saw behaves like a note-on.
        self.note_on(id, pitch);
    }

    /// A note identity stopped sounding. Its pitch leaves the held set once
    /// no other identity maps to it; the intensity entry stays and decays.
    pub fn note_off(&mut self, id: NoteId) {
        if let Some(key) = self.ids.remove(&id) {
            self.release_key(key);
        }
    }

    fn hold_key(&mut self, key: PitchKey) {
        *self.held.entry(key).or_insert(0) += 1;
    }

    fn release_key(&mut self, key: PitchKey) {
        if let Some(count) = self.held.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                self.held.remove(&key);
            }
        }
    }

    fn sound(&mut self, key: PitchKey) {
        // `note` snaps to 1.0 immediately; the ordinal markers only move
        // through the tick so a short grace note cannot flash as top/bass.
        self.infos
            .entry(key)
            .and_modify(|info| info.note = 1.0)
            .or_insert(PitchInfo {
                note: 1.0,
                top: 0.0,
                bass: 0.0,
            });
    }

    /// One 60 Hz step: refresh held intensities, decay released ones, move
    /// the top/bass markers toward their targets, drop dead entries.
    ///
    /// Built as a two-pass rebuild (next state computed for every entry,
    /// then the map is replaced) instead of erasing while iterating.
    pub fn tick(&mut self) {
        let max_held = self.held.last_key_value().map(|(k, _)| *k);
        let min_held = self.held.first_key_value().map(|(k, _)| *k);

        let next: BTreeMap<PitchKey, PitchInfo> = self
            .infos
            .iter()
            .map(|(&key, &info)| {
                let held = self.held.contains_key(&key);
                let note = if held {
                    1.0
                } else {
                    (info.note - NOTE_DECAY_PER_TICK).max(0.0)
                };
                let top = step_marker(info.top, held && Some(key) == max_held);
                let bass = step_marker(info.bass, held && Some(key) == min_held);
                (key, PitchInfo { note, top, bass })
            })
            // The decay never lands exactly on zero in floating point;
            // anything below the pitch epsilon counts as silent.
            .filter(|(_, info)| info.note > EPSILON)
            .collect();
        self.infos = next;
    }

    /// Read-only copy of the pitch state for per-tile aggregation.
    pub fn snapshot(&self) -> Vec<(Pitch, PitchInfo)> {
        self.infos
            .iter()
            .map(|(key, info)| (key.pitch(), *info))
            .collect()
    }

    pub fn is_held(&self, key: PitchKey) -> bool {
        self.held.contains_key(&key)
    }

    pub fn held_count(&self) -> usize {
        self.held.len()
    }

    pub fn info(&self, key: PitchKey) -> Option<PitchInfo> {
        self.infos.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Internal consistency: every held pitch has a state entry and all
    /// intensities stay inside `[0, 1]`.
    pub fn check_invariants(&self) -> Result<(), String> {
        for key in self.held.keys() {
            if !self.infos.contains_key(key) {
                return Err(format!("held pitch {key:?} missing from state map"));
            }
        }
        for (key, info) in &self.infos {
            for (name, v) in [("note", info.note), ("top", info.top), ("bass", info.bass)] {
                if !(0.0..=1.0).contains(&v) {
                    return Err(format!("{name} intensity {v} out of range for {key:?}"));
                }
            }
        }
        Ok(())
    }
}

fn step_marker(current: f64, toward_one: bool) -> f64 {
    if toward_one {
        (current + MARKER_STEP_PER_TICK).min(1.0)
    } else {
        (current - MARKER_STEP_PER_TICK).max(0.0)
    }
}
