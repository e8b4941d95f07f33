pub mod lattice;
pub mod pitch;
pub mod pitch_state;
pub mod tuning;
