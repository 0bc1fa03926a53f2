use crate::app::Section;

/// All possible actions in the application (command pattern)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    // Application
    Quit,
    ToggleHelp,

    // Section switching
    SelectSection(Section),
    NextSection,
    PrevSection,

    // Viewer navigation (applies to the visible log pane)
    LineUp,
    LineDown,
    PageUp,
    PageDown,
    Home,
    End,
    FastForward,
    FastBackward,
    FocusLog(bool),

    // Level filter checkboxes (first-seen order)
    ToggleLevel(usize),

    // Run lifecycle
    StartRun,
    ClearResults,
    ReloadResults,
    OpenHtmlReport,

    // Startup reload modal
    ModalLeft,
    ModalRight,
    ModalConfirm,
    ModalDismiss,

    // Render request (resize etc.)
    Render,
}
