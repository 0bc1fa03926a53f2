//! Application state and actions

mod action;
mod selection;
mod state;

pub use action::Action;
pub use selection::SelectionState;
pub use state::{AppState, ModalChoice, PaneRects, ReportData, ReportState, Section};
