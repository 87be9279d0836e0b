//! Cyclic cursor over the reference points.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("At least one reference point is required (got 0).")]
    NoPoints,
}

/// Cursor in `[0, len)`; starts at 0 and wraps in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
    cursor: usize,
    len: usize,
}

impl Navigator {
    pub fn new(len: usize) -> Result<Self, NavigationError> {
        if len == 0 {
            return Err(NavigationError::NoPoints);
        }
        Ok(Self { cursor: 0, len })
    }

    pub fn advance(&mut self) -> usize {
        self.cursor = (self.cursor + 1) % self.len;
        self.cursor
    }

    pub fn retreat(&mut self) -> usize {
        self.cursor = (self.cursor + self.len - 1) % self.len;
        self.cursor
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}
