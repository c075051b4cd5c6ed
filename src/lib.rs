//! daygrid: terminal month calendar for appointments, events and goals

pub mod cli;
pub mod services;
pub mod tui;
pub mod types;
