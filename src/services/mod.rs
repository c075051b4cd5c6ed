//! Calendar logic: grid, items, navigation, forms and data access

pub mod client;
pub mod config;
pub mod detail;
pub mod forms;
pub mod grid;
pub mod index;
pub mod loader;
pub mod navigation;

pub use client::{CalendarClient, MockClient};
pub use config::Config;
pub use detail::DetailPanel;
pub use grid::{build_month_grid, DayCell, MonthGrid};
pub use index::ItemIndex;
pub use loader::{load_month, RetryPolicy};
pub use navigation::{CalendarState, NavEvent};
