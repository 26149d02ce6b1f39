//! Picker sessions and the rendering seam.

use std::fmt::Display;

use rec_common::error::{RecError, RecResult};

use crate::state::{PickerKey, PickerState};

/// Outcome of one picker session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    Confirmed(T),
    Cancelled,
}

impl<T> Selection<T> {
    pub fn confirmed(self) -> Option<T> {
        match self {
            Self::Confirmed(value) => Some(value),
            Self::Cancelled => None,
        }
    }
}

/// What a surface should show on one redraw.
#[derive(Debug, Clone, Copy)]
pub struct PickerView<'a> {
    pub title: &'a str,
    pub options: &'a [String],
    pub state: PickerState,
}

impl PickerView<'_> {
    /// Option lines prefixed with the cursor marker (`x` on the active line).
    pub fn rendered_lines(&self) -> Vec<String> {
        let cursor = self.state.cursor();
        self.options
            .iter()
            .enumerate()
            .map(|(pos, option)| {
                let marker = if cursor == Some(pos) { 'x' } else { ' ' };
                format!("{marker} {option}")
            })
            .collect()
    }
}

/// Something that can show a picker and report key presses.
pub trait PickerSurface {
    /// Take over the display for a session titled `title`.
    fn begin(&mut self, _title: &str) -> RecResult<()> {
        Ok(())
    }

    /// Redraw the whole view.
    fn draw(&mut self, view: &PickerView<'_>) -> RecResult<()>;

    /// Block until the next key event.
    fn next_key(&mut self) -> RecResult<PickerKey>;

    /// Give the display back. Called after every session, also on error.
    fn end(&mut self) {}
}

/// Run one blocking picker session over `options`.
///
/// Returns the confirmed option or [`Selection::Cancelled`]. Surface errors
/// end the session and are returned as-is.
pub fn run_picker<'a, T, S>(
    surface: &mut S,
    title: &str,
    options: &'a [T],
) -> RecResult<Selection<&'a T>>
where
    T: Display,
    S: PickerSurface + ?Sized,
{
    let lines: Vec<String> = options.iter().map(ToString::to_string).collect();

    surface.begin(title)?;
    let outcome = drive(surface, title, &lines);
    surface.end();

    match outcome? {
        PickerState::Confirmed { cursor } => {
            tracing::debug!(title, cursor, "Picker confirmed");
            options
                .get(cursor)
                .map(Selection::Confirmed)
                .ok_or_else(|| RecError::rendering(format!("cursor {cursor} out of range")))
        }
        _ => {
            tracing::debug!(title, "Picker cancelled");
            Ok(Selection::Cancelled)
        }
    }
}

fn drive<S>(surface: &mut S, title: &str, lines: &[String]) -> RecResult<PickerState>
where
    S: PickerSurface + ?Sized,
{
    let mut state = PickerState::default();
    surface.draw(&PickerView {
        title,
        options: lines,
        state,
    })?;

    loop {
        let key = surface.next_key()?;
        state = state.apply(key, lines.len());
        surface.draw(&PickerView {
            title,
            options: lines,
            state,
        })?;
        if state.is_terminal() {
            return Ok(state);
        }
    }
}
