//! Interactive terminal surface built on ratatui.

use std::io;
use std::sync::Once;

use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{self, EnterAlternateScreen};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use ratatui::{DefaultTerminal, Terminal};

use rec_common::error::{RecError, RecResult};

use crate::session::{PickerSurface, PickerView};
use crate::state::PickerKey;

const HELP: &str = "up/k  down/j  enter/space select  q quit";

static RESTORE_HOOK: Once = Once::new();

/// Full-screen picker on the controlling terminal.
///
/// Raw mode and the alternate screen are held only between `begin` and
/// `end`, so log output between sessions lands on the normal screen.
pub struct TerminalSurface {
    terminal: Option<DefaultTerminal>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        install_restore_hook();
        Self { terminal: None }
    }
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

/// Chain a panic hook that gives the terminal back. Installed at most once
/// per process; returns whether this call installed it.
fn install_restore_hook() -> bool {
    let mut installed = false;
    RESTORE_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            ratatui::restore();
            previous(info);
        }));
        installed = true;
    });
    installed
}

fn open_terminal() -> io::Result<DefaultTerminal> {
    terminal::enable_raw_mode()?;
    let opened = execute!(io::stdout(), EnterAlternateScreen)
        .and_then(|()| Terminal::new(CrosstermBackend::new(io::stdout())));
    if opened.is_err() {
        ratatui::restore();
    }
    opened
}

impl PickerSurface for TerminalSurface {
    fn begin(&mut self, title: &str) -> RecResult<()> {
        let terminal = open_terminal()
            .map_err(|e| RecError::rendering(format!("Cannot open terminal for {title:?}: {e}")))?;
        self.terminal = Some(terminal);
        Ok(())
    }

    fn draw(&mut self, view: &PickerView<'_>) -> RecResult<()> {
        let terminal = self
            .terminal
            .as_mut()
            .ok_or_else(|| RecError::rendering("draw called outside a picker session"))?;

        let cursor = view.state.cursor();
        let lines: Vec<Line> = view
            .rendered_lines()
            .into_iter()
            .enumerate()
            .map(|(pos, text)| {
                if cursor == Some(pos) {
                    Line::styled(text, Style::default().add_modifier(Modifier::BOLD))
                } else {
                    Line::raw(text)
                }
            })
            .collect();

        terminal
            .draw(|frame| {
                let [list_area, help_area] =
                    Layout::vertical([Constraint::Min(1), Constraint::Length(1)])
                        .areas(frame.area());
                let list = Paragraph::new(lines).block(Block::bordered().title(view.title));
                frame.render_widget(list, list_area);
                frame.render_widget(Paragraph::new(HELP), help_area);
            })
            .map_err(|e| RecError::rendering(format!("Failed to draw picker: {e}")))?;
        Ok(())
    }

    fn next_key(&mut self) -> RecResult<PickerKey> {
        let event =
            event::read().map_err(|e| RecError::rendering(format!("Failed to read key: {e}")))?;
        Ok(key_from_event(&event))
    }

    fn end(&mut self) {
        if self.terminal.take().is_some() {
            ratatui::restore();
        }
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        self.end();
    }
}

/// Map a terminal event to picker input. Only key presses count.
pub fn key_from_event(event: &Event) -> PickerKey {
    let Event::Key(key) = event else {
        return PickerKey::Ignored;
    };
    if key.kind != KeyEventKind::Press {
        return PickerKey::Ignored;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => PickerKey::Cancel,
        KeyCode::Up | KeyCode::Char('k') => PickerKey::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => PickerKey::MoveDown,
        KeyCode::Enter | KeyCode::Char(' ') => PickerKey::Confirm,
        KeyCode::Char('q') => PickerKey::Cancel,
        _ => PickerKey::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::{KeyEvent, KeyEventState};

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(key_from_event(&press(KeyCode::Up)), PickerKey::MoveUp);
        assert_eq!(key_from_event(&press(KeyCode::Char('k'))), PickerKey::MoveUp);
        assert_eq!(key_from_event(&press(KeyCode::Down)), PickerKey::MoveDown);
        assert_eq!(key_from_event(&press(KeyCode::Char('j'))), PickerKey::MoveDown);
    }

    #[test]
    fn test_confirm_and_cancel_keys() {
        assert_eq!(key_from_event(&press(KeyCode::Enter)), PickerKey::Confirm);
        assert_eq!(key_from_event(&press(KeyCode::Char(' '))), PickerKey::Confirm);
        assert_eq!(key_from_event(&press(KeyCode::Char('q'))), PickerKey::Cancel);
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(key_from_event(&ctrl_c), PickerKey::Cancel);
    }

    #[test]
    fn test_release_and_other_events_are_ignored() {
        let release = Event::Key(KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(key_from_event(&release), PickerKey::Ignored);
        assert_eq!(key_from_event(&Event::Resize(80, 24)), PickerKey::Ignored);
        assert_eq!(key_from_event(&press(KeyCode::Char('c'))), PickerKey::Ignored);
    }

    #[test]
    fn test_restore_hook_is_installed_once() {
        let _first = TerminalSurface::new();
        let _second = TerminalSurface::default();
        assert!(!install_restore_hook());
    }

    #[test]
    fn test_draw_outside_session_is_rendering_error() {
        let mut surface = TerminalSurface::new();
        let options = vec!["0 > Mic".to_string()];
        let view = PickerView {
            title: "Select audio device",
            options: &options,
            state: Default::default(),
        };
        assert!(matches!(
            surface.draw(&view),
            Err(RecError::Rendering { .. })
        ));
    }
}
