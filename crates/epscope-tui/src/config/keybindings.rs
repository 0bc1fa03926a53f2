use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use crate::app::{Action, Section};

/// A key combination
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn shift(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::SHIFT,
        }
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Context for keybindings
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyContext {
    Global,
    /// A section with a log pane (Stdout, eplusout.err)
    Viewer,
    /// The eplusout.err section additionally owns the filter checkboxes
    Diagnostics,
    /// The startup reload modal captures everything while visible
    Modal,
}

/// Keybinding configuration
pub struct KeyBindings {
    bindings: HashMap<KeyContext, HashMap<KeyBinding, Action>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        let mut bindings = HashMap::new();

        // Global bindings
        let mut global = HashMap::new();
        global.insert(KeyBinding::new(KeyCode::Char('q')), Action::Quit);
        global.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        global.insert(KeyBinding::new(KeyCode::Char('?')), Action::ToggleHelp);
        global.insert(KeyBinding::new(KeyCode::Char('[')), Action::PrevSection);
        global.insert(KeyBinding::new(KeyCode::Char(']')), Action::NextSection);
        global.insert(
            KeyBinding::new(KeyCode::F(1)),
            Action::SelectSection(Section::RunOutput),
        );
        global.insert(
            KeyBinding::new(KeyCode::F(2)),
            Action::SelectSection(Section::Diagnostics),
        );
        global.insert(
            KeyBinding::new(KeyCode::F(3)),
            Action::SelectSection(Section::Reports),
        );
        global.insert(
            KeyBinding::new(KeyCode::F(4)),
            Action::SelectSection(Section::About),
        );
        bindings.insert(KeyContext::Global, global);

        // Log pane navigation plus the run lifecycle
        let mut viewer = HashMap::new();
        viewer.insert(KeyBinding::new(KeyCode::Up), Action::LineUp);
        viewer.insert(KeyBinding::new(KeyCode::Char('k')), Action::LineUp);
        viewer.insert(KeyBinding::new(KeyCode::Down), Action::LineDown);
        viewer.insert(KeyBinding::new(KeyCode::Char('j')), Action::LineDown);
        viewer.insert(KeyBinding::new(KeyCode::PageUp), Action::PageUp);
        viewer.insert(KeyBinding::new(KeyCode::PageDown), Action::PageDown);
        viewer.insert(KeyBinding::new(KeyCode::Home), Action::Home);
        viewer.insert(KeyBinding::new(KeyCode::End), Action::End);
        viewer.insert(KeyBinding::new(KeyCode::Tab), Action::FastForward);
        viewer.insert(KeyBinding::shift(KeyCode::BackTab), Action::FastBackward);
        viewer.insert(KeyBinding::new(KeyCode::BackTab), Action::FastBackward);
        viewer.insert(KeyBinding::new(KeyCode::Char('r')), Action::StartRun);
        viewer.insert(KeyBinding::new(KeyCode::Char('o')), Action::OpenHtmlReport);
        viewer.insert(KeyBinding::new(KeyCode::Char('c')), Action::ClearResults);
        viewer.insert(KeyBinding::shift(KeyCode::Char('R')), Action::ReloadResults);
        bindings.insert(KeyContext::Viewer, viewer);

        // Diagnostics: digits toggle the level checkboxes in first-seen order
        let mut diagnostics = HashMap::new();
        for digit in 1..=9u32 {
            let code = KeyCode::Char(char::from_digit(digit, 10).unwrap_or('1'));
            diagnostics.insert(KeyBinding::new(code), Action::ToggleLevel(digit as usize - 1));
        }
        bindings.insert(KeyContext::Diagnostics, diagnostics);

        // Reload modal
        let mut modal = HashMap::new();
        modal.insert(KeyBinding::new(KeyCode::Left), Action::ModalLeft);
        modal.insert(KeyBinding::new(KeyCode::Right), Action::ModalRight);
        modal.insert(KeyBinding::new(KeyCode::Char('h')), Action::ModalLeft);
        modal.insert(KeyBinding::new(KeyCode::Char('l')), Action::ModalRight);
        modal.insert(KeyBinding::new(KeyCode::Enter), Action::ModalConfirm);
        modal.insert(KeyBinding::new(KeyCode::Esc), Action::ModalDismiss);
        bindings.insert(KeyContext::Modal, modal);

        Self { bindings }
    }

    /// Look up action for key event in given context
    ///
    /// The viewer sections consult their own bindings first, then the shared
    /// viewer bindings, then the global ones. The modal consults only itself
    /// plus Quit.
    pub fn get_action(&self, context: KeyContext, key: &KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(key);

        if context == KeyContext::Modal {
            if let Some(action) = self.lookup(&KeyContext::Modal, &binding) {
                return Some(action);
            }
            return match binding.code {
                KeyCode::Char('q') => Some(Action::Quit),
                _ => None,
            };
        }

        if context == KeyContext::Diagnostics
            && let Some(action) = self.lookup(&KeyContext::Diagnostics, &binding)
        {
            return Some(action);
        }

        if matches!(context, KeyContext::Viewer | KeyContext::Diagnostics)
            && let Some(action) = self.lookup(&KeyContext::Viewer, &binding)
        {
            return Some(action);
        }

        self.lookup(&KeyContext::Global, &binding)
    }

    fn lookup(&self, context: &KeyContext, binding: &KeyBinding) -> Option<Action> {
        self.bindings.get(context)?.get(binding).cloned()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn viewer_navigation_and_global_fallback() {
        let bindings = KeyBindings::new();

        assert_eq!(
            bindings.get_action(KeyContext::Viewer, &key(KeyCode::Char('j'))),
            Some(Action::LineDown)
        );
        assert_eq!(
            bindings.get_action(KeyContext::Viewer, &key(KeyCode::Tab)),
            Some(Action::FastForward)
        );
        assert_eq!(
            bindings.get_action(KeyContext::Viewer, &key(KeyCode::Char('q'))),
            Some(Action::Quit)
        );
    }

    #[test]
    fn digits_toggle_checkboxes_only_in_diagnostics() {
        let bindings = KeyBindings::new();

        assert_eq!(
            bindings.get_action(KeyContext::Diagnostics, &key(KeyCode::Char('2'))),
            Some(Action::ToggleLevel(1))
        );
        assert_eq!(
            bindings.get_action(KeyContext::Viewer, &key(KeyCode::Char('2'))),
            None
        );
    }

    #[test]
    fn modal_captures_input_but_still_quits() {
        let bindings = KeyBindings::new();

        assert_eq!(
            bindings.get_action(KeyContext::Modal, &key(KeyCode::Enter)),
            Some(Action::ModalConfirm)
        );
        assert_eq!(
            bindings.get_action(KeyContext::Modal, &key(KeyCode::Char('j'))),
            None
        );
        assert_eq!(
            bindings.get_action(KeyContext::Modal, &key(KeyCode::Char('q'))),
            Some(Action::Quit)
        );
    }
}
