//! midir input adapter: routes live MIDI into the shared aggregator.
//!
//! The midir callback thread is one of the two actors touching the shared
//! pitch state (the other is the 60 Hz tick worker); every message is
//! applied under the aggregator mutex in one scoped acquisition.

use std::sync::{Arc, Mutex};

use midir::{Ignore, MidiInput, MidiInputConnection};
use thiserror::Error;
use tracing::{info, warn};

use crate::core::pitch::Pitch;
use crate::core::pitch_state::Aggregator;
use crate::midi::mpe::{MpeState, NoteMessage};

#[derive(Debug, Error)]
pub enum MidiError {
    #[error("failed to initialize MIDI input: {0}")]
    Init(#[from] midir::InitError),
    #[error("no MIDI input port available")]
    NoPort,
    #[error("no MIDI input port matching \"{0}\"")]
    NoMatch(String),
    #[error("failed to read port name: {0}")]
    PortName(#[from] midir::PortInfoError),
    #[error("failed to connect to MIDI input: {0}")]
    Connect(String),
}

/// Keeps the midir connection alive; dropping it disconnects.
pub struct NoteSource {
    _conn: MidiInputConnection<()>,
    pub port_name: String,
}

/// Names of all MIDI input ports currently visible.
pub fn list_ports() -> Result<Vec<String>, MidiError> {
    let midi_in = MidiInput::new("tonnetz-lens")?;
    midi_in
        .ports()
        .iter()
        .map(|p| midi_in.port_name(p).map_err(MidiError::from))
        .collect()
}

/// Connect to a MIDI input port and feed its note stream into `shared`.
///
/// `port_hint` selects the first port whose name contains it
/// (case-insensitive); without a hint the first port is used.
pub fn connect(
    port_hint: Option<&str>,
    bend_range_semis: f64,
    shared: Arc<Mutex<Aggregator>>,
) -> Result<NoteSource, MidiError> {
    let mut midi_in = MidiInput::new("tonnetz-lens")?;
    midi_in.ignore(Ignore::All);

    let ports = midi_in.ports();
    let port = match port_hint {
        Some(hint) => {
            let needle = hint.to_lowercase();
            ports
                .iter()
                .find(|p| {
                    midi_in
                        .port_name(p)
                        .map(|name| name.to_lowercase().contains(&needle))
                        .unwrap_or(false)
                })
                .ok_or_else(|| MidiError::NoMatch(hint.to_string()))?
        }
        None => ports.first().ok_or(MidiError::NoPort)?,
    };
    let port_name = midi_in.port_name(port)?;
    info!(port = %port_name, "connecting MIDI input");

    let mut mpe = MpeState::new(bend_range_semis);
    let mut messages = Vec::new();
    let conn = midi_in
        .connect(
            port,
            "tonnetz-lens-in",
            move |_stamp, bytes, _| {
                messages.clear();
                mpe.handle(bytes, &mut messages);
                if messages.is_empty() {
                    return;
                }
                let mut agg = shared.lock().unwrap_or_else(|e| e.into_inner());
                for &msg in &messages {
                    apply(&mut agg, msg);
                }
            },
            (),
        )
        .map_err(|e| MidiError::Connect(e.to_string()))?;

    Ok(NoteSource {
        _conn: conn,
        port_name,
    })
}

/// Apply one note event, filtering out frequencies the pitch domain cannot
/// represent before they reach the core.
pub fn apply(agg: &mut Aggregator, msg: NoteMessage) {
    match msg {
        NoteMessage::Added { id, freq_hz } => match Pitch::from_freq_hz(freq_hz) {
            Some(pitch) => agg.note_on(id, pitch),
            None => warn!(freq_hz, "dropping note-on with invalid frequency"),
        },
        NoteMessage::Bent { id, freq_hz } => match Pitch::from_freq_hz(freq_hz) {
            Some(pitch) => agg.note_bend(id, pitch),
            None => warn!(freq_hz, "dropping bend with invalid frequency"),
        },
        NoteMessage::Released { id } => agg.note_off(id),
    }
}
