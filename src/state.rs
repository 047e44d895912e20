//! Application-level UI state.
//!
//! The shell owns the only [`UiShell`] and therefore every write. Pages get a
//! [`UiView`] and can only read the latest snapshot. Built on
//! [`tokio::sync::watch`] so readers always see the most recent value.

use tokio::sync::watch;

use crate::theme::{Color, Palette, Theme, ThemeMode};

/// Everything the shell shares with pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub theme: Theme,
}

/// A write the shell applies on behalf of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeChange {
    Color(Color),
    Mode(ThemeMode),
}

/// Writer side. Held by the REPL loop only.
#[derive(Debug)]
pub struct UiShell {
    tx: watch::Sender<UiState>,
    color_output: bool,
}

impl UiShell {
    pub fn new(initial: UiState, color_output: bool) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx, color_output }
    }

    /// Hand out a read-only view.
    pub fn view(&self) -> UiView {
        UiView {
            rx: self.tx.subscribe(),
            color_output: self.color_output,
        }
    }

    pub fn apply(&self, change: &ThemeChange) {
        self.tx.send_modify(|state| match change {
            ThemeChange::Color(color) => state.theme.color = *color,
            ThemeChange::Mode(mode) => state.theme.mode = *mode,
        });
    }

    pub fn state(&self) -> UiState {
        self.tx.borrow().clone()
    }
}

/// Reader side. Cheap to clone, one per page.
#[derive(Debug, Clone)]
pub struct UiView {
    rx: watch::Receiver<UiState>,
    color_output: bool,
}

impl UiView {
    pub fn snapshot(&self) -> UiState {
        self.rx.borrow().clone()
    }

    /// Palette for the current theme, plain when colour output is off.
    pub fn palette(&self) -> Palette {
        Palette::new(self.snapshot().theme, self.color_output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_sees_shell_writes() {
        let shell = UiShell::new(UiState::default(), false);
        let view = shell.view();

        shell.apply(&ThemeChange::Mode(ThemeMode::Dark));
        shell.apply(&ThemeChange::Color("#7352FF".parse().unwrap()));

        let state = view.snapshot();
        assert_eq!(state.theme.mode, ThemeMode::Dark);
        assert_eq!(state.theme.color.to_string(), "#7352FF");
        assert_eq!(shell.state(), state);
    }

    #[test]
    fn cloned_views_share_state() {
        let shell = UiShell::new(UiState::default(), false);
        let a = shell.view();
        let b = a.clone();
        shell.apply(&ThemeChange::Mode(ThemeMode::Dark));
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn palette_respects_color_flag() {
        let shell = UiShell::new(UiState::default(), false);
        assert_eq!(shell.view().palette().heading("x"), "x");

        let shell = UiShell::new(UiState::default(), true);
        assert_ne!(shell.view().palette().heading("x"), "x");
    }
}
