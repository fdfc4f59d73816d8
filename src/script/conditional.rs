use super::ScriptError;
use crate::result::{Error, Result};

const NO_FALSE: usize = usize::MAX;

/// Tracks the open IF/NOTIF frames of a script
///
/// Only the frame count and the position of the first false frame are stored. Operations run
/// while no frame is false, and ELSE flips the top frame only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalStack {
    size: usize,
    first_false: usize,
}

impl ConditionalStack {
    /// Creates an empty conditional stack
    pub fn new() -> ConditionalStack {
        ConditionalStack {
            size: 0,
            first_false: NO_FALSE,
        }
    }

    /// Opens a frame for IF or NOTIF
    pub fn open(&mut self, value: bool) {
        if self.first_false == NO_FALSE && !value {
            self.first_false = self.size;
        }
        self.size += 1;
    }

    /// Flips the top frame for ELSE
    pub fn negate(&mut self) -> Result<()> {
        if self.size == 0 {
            return Err(Error::ScriptError(ScriptError::UnbalancedConditional));
        }
        if self.first_false == NO_FALSE {
            self.first_false = self.size - 1;
        } else if self.first_false == self.size - 1 {
            self.first_false = NO_FALSE;
        }
        Ok(())
    }

    /// Closes the top frame for ENDIF
    pub fn close(&mut self) -> Result<()> {
        if self.size == 0 {
            return Err(Error::ScriptError(ScriptError::UnbalancedConditional));
        }
        self.size -= 1;
        if self.first_false == self.size {
            self.first_false = NO_FALSE;
        }
        Ok(())
    }

    /// Removes all frames
    pub fn clear(&mut self) {
        self.size = 0;
        self.first_false = NO_FALSE;
    }

    /// Returns whether no frames are open
    pub fn closed(&self) -> bool {
        self.size == 0
    }

    /// Returns whether operations at this point execute
    pub fn succeeded(&self) -> bool {
        self.first_false == NO_FALSE
    }

    /// Number of open frames
    pub fn len(&self) -> usize {
        self.size
    }
}

impl Default for ConditionalStack {
    fn default() -> ConditionalStack {
        ConditionalStack::new()
    }
}
