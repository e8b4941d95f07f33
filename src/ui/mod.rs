pub mod viewdata;
pub mod windows;
