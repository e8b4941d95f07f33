//! MPE note tracking over raw MIDI bytes.
//!
//! Single-zone "legacy mode": all 16 channels are member channels and each
//! carries its own pitch bend, so one channel per note gives per-note bend.
//! The parser turns raw messages into [`NoteMessage`]s with a stable
//! identity per physical note and a continuous frequency that follows the
//! channel's bend.

use crate::core::pitch_state::NoteId;

/// Pitch-bend center value (14-bit).
const BEND_CENTER: i32 = 8192;

/// Discrete note events delivered to the aggregator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NoteMessage {
    Added { id: NoteId, freq_hz: f64 },
    Bent { id: NoteId, freq_hz: f64 },
    Released { id: NoteId },
}

/// Per-channel bend state plus the set of sounding notes per channel.
#[derive(Debug)]
pub struct MpeState {
    bend_range_semis: f64,
    bend_semis: [f64; 16],
    held: [Vec<u8>; 16],
}

impl MpeState {
    pub fn new(bend_range_semis: f64) -> Self {
        Self {
            bend_range_semis,
            bend_semis: [0.0; 16],
            held: std::array::from_fn(|_| Vec::new()),
        }
    }

    /// Parse one MIDI message, appending resulting note events to `out`.
    /// Unknown and non-note messages are ignored.
    pub fn handle(&mut self, bytes: &[u8], out: &mut Vec<NoteMessage>) {
        let Some(&status) = bytes.first() else {
            return;
        };
        let channel = (status & 0x0F) as usize;
        match status & 0xF0 {
            0x90 if bytes.len() >= 3 && bytes[2] > 0 => {
                let note = bytes[1] & 0x7F;
                if !self.held[channel].contains(&note) {
                    self.held[channel].push(note);
                }
                out.push(NoteMessage::Added {
                    id: note_id(channel, note),
                    freq_hz: self.freq_hz(channel, note),
                });
            }
            0x80 | 0x90 if bytes.len() >= 3 => {
                // 0x90 with velocity 0 is a note-off.
                let note = bytes[1] & 0x7F;
                self.held[channel].retain(|&n| n != note);
                out.push(NoteMessage::Released {
                    id: note_id(channel, note),
                });
            }
            0xE0 if bytes.len() >= 3 => {
                let raw = i32::from(bytes[1] & 0x7F) | (i32::from(bytes[2] & 0x7F) << 7);
                self.bend_semis[channel] =
                    f64::from(raw - BEND_CENTER) / f64::from(BEND_CENTER) * self.bend_range_semis;
                // Every sounding note on the channel glides with the bend.
                for &note in &self.held[channel] {
                    out.push(NoteMessage::Bent {
                        id: note_id(channel, note),
                        freq_hz: self.freq_hz(channel, note),
                    });
                }
            }
            _ => {}
        }
    }

    fn freq_hz(&self, channel: usize, note: u8) -> f64 {
        let midi = f64::from(note) + self.bend_semis[channel];
        440.0 * ((midi - 69.0) / 12.0).exp2()
    }
}

fn note_id(channel: usize, note: u8) -> NoteId {
    ((channel as NoteId) << 8) | NoteId::from(note)
}
