//! Terminal UI for epscope
//!
//! This crate provides the application state, keybindings, event handling,
//! and UI components for the epscope console.

pub mod app;
pub mod config;
pub mod tui;
pub mod ui;

pub use app::{Action, AppState, ModalChoice, Section, SelectionState};
pub use config::{KeyBinding, KeyBindings, KeyContext};
pub use tui::{Event, EventHandler, Tui};
pub use ui::Theme;
pub use ui::components::{HelpOverlay, LogLine, LogView, ReloadModal, StatusBar};
pub use ui::screens::{AboutScreen, DiagnosticsScreen, ReportScreen, RunOutputScreen};
