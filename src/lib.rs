//! Tonnetz Lens: a live MPE tonnetz viewer.
//!
//! Incoming MIDI/MPE notes are mapped to continuous pitches, matched
//! against a lattice of tempered pitch classes under a configurable
//! generator-chain tuning, and rendered as tiles whose intensity decays at
//! a fixed 60 Hz tick.

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod midi;
pub mod ui;
