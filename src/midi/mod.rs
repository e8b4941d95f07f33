pub mod input;
pub mod mpe;

pub use input::{MidiError, NoteSource, connect, list_ports};
pub use mpe::{MpeState, NoteMessage};
