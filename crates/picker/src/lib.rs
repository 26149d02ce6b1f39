//! rec Picker
//!
//! A single-choice list driven by discrete key events. One call to
//! [`run_picker`] is one session: it blocks until the operator confirms an
//! option or cancels, and returns exactly one [`Selection`].
//!
//! Rendering and key input sit behind [`PickerSurface`]. The real terminal is
//! [`TerminalSurface`]; [`testing::ScriptedSurface`] replays keys for tests.

pub mod session;
pub mod state;
pub mod terminal;
pub mod testing;

pub use session::{run_picker, PickerSurface, PickerView, Selection};
pub use state::{PickerKey, PickerState};
pub use terminal::{key_from_event, TerminalSurface};
