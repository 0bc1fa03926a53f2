mod help_overlay;
mod level_filter;
mod log_view;
mod reload_modal;
mod status_bar;

pub use help_overlay::HelpOverlay;
pub use level_filter::LevelFilterRow;
pub use log_view::{LogLine, LogView};
pub use reload_modal::ReloadModal;
pub use status_bar::{StatusBar, viewer_hints};
