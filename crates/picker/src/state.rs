//! Picker state machine.

/// Discrete input the picker reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKey {
    MoveUp,
    MoveDown,
    Confirm,
    Cancel,
    /// Anything else (resize, unmapped keys). Causes a redraw only.
    Ignored,
}

/// Where a picker session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerState {
    Active { cursor: usize },
    Confirmed { cursor: usize },
    Cancelled,
}

impl Default for PickerState {
    fn default() -> Self {
        Self::Active { cursor: 0 }
    }
}

impl PickerState {
    /// Next state after `key` over a list of `len` options.
    ///
    /// Terminal states absorb every key. Confirm on an empty list does
    /// nothing since there is no entry to deliver.
    pub fn apply(self, key: PickerKey, len: usize) -> Self {
        let Self::Active { cursor } = self else {
            return self;
        };
        match key {
            PickerKey::MoveUp => Self::Active {
                cursor: cursor.saturating_sub(1),
            },
            PickerKey::MoveDown if cursor + 1 < len => Self::Active { cursor: cursor + 1 },
            PickerKey::Confirm if cursor < len => Self::Confirmed { cursor },
            PickerKey::Cancel => Self::Cancelled,
            _ => self,
        }
    }

    /// Highlighted position, if the session has not been cancelled.
    pub fn cursor(&self) -> Option<usize> {
        match self {
            Self::Active { cursor } | Self::Confirmed { cursor } => Some(*cursor),
            Self::Cancelled => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active { .. })
    }
}
