//! TUI widgets

pub mod appointment_form;
pub mod banner;
pub mod calendar;
pub mod day_detail;
pub mod form_field;
pub mod goal_form;
pub mod help;
pub mod quit_confirm;
pub mod spinner;
