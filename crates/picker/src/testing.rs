//! Headless surface that replays a fixed key script.

use std::collections::VecDeque;

use rec_common::error::{RecError, RecResult};

use crate::session::{PickerSurface, PickerView};
use crate::state::PickerKey;

/// Replays scripted keys and records every frame it is asked to draw.
///
/// Keys are shared across sessions, so one surface can drive both device
/// pickers of a run. Running out of keys is reported as a rendering error.
#[derive(Debug, Default)]
pub struct ScriptedSurface {
    keys: VecDeque<PickerKey>,
    frames: Vec<Vec<String>>,
    titles: Vec<String>,
    sessions_ended: usize,
    unavailable: bool,
}

impl ScriptedSurface {
    pub fn new(keys: impl IntoIterator<Item = PickerKey>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            ..Self::default()
        }
    }

    /// A surface whose `begin` fails, like a missing terminal.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn frames(&self) -> &[Vec<String>] {
        &self.frames
    }

    /// Title of each session, in order.
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn sessions_ended(&self) -> usize {
        self.sessions_ended
    }

    pub fn remaining_keys(&self) -> usize {
        self.keys.len()
    }
}

impl PickerSurface for ScriptedSurface {
    fn begin(&mut self, title: &str) -> RecResult<()> {
        if self.unavailable {
            return Err(RecError::rendering("no terminal attached"));
        }
        self.titles.push(title.to_string());
        Ok(())
    }

    fn draw(&mut self, view: &PickerView<'_>) -> RecResult<()> {
        self.frames.push(view.rendered_lines());
        Ok(())
    }

    fn next_key(&mut self) -> RecResult<PickerKey> {
        self.keys
            .pop_front()
            .ok_or_else(|| RecError::rendering("key script exhausted"))
    }

    fn end(&mut self) {
        self.sessions_ended += 1;
    }
}
